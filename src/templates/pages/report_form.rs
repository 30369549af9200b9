use crate::domain::SPECIES_OPTIONS;
use crate::templates::components::{alert, button, flash};
use crate::templates::desktop_layout;
use maud::{html, Markup, PreEscaped};

/// Field values echoed back when a submission is rejected.
#[derive(Debug, Clone, Default)]
pub struct ReportFormVm {
    pub name: String,
    pub species: String,
    pub description: String,
    pub contact_info: String,
    pub latitude: String,
    pub longitude: String,
    pub address: String,
    pub flash: Option<String>,
    pub error: Option<String>,
}

// Device location and photo picking happen in the browser; the photo is
// shipped as base64 in a hidden field so the form stays urlencoded.
const FORM_SCRIPT: &str = r#"
function lookupAddress(source) {
  var lat = document.getElementById('latitude').value;
  var lon = document.getElementById('longitude').value;
  if (lat === '' || lon === '') return;
  var q = new URLSearchParams({ lat: lat, lon: lon, source: source });
  htmx.ajax('GET', '/location/address?' + q.toString(), { target: '#location-result', swap: 'outerHTML' });
}
function useDeviceLocation() {
  if (!navigator.geolocation) return;
  navigator.geolocation.getCurrentPosition(function (pos) {
    document.getElementById('latitude').value = pos.coords.latitude;
    document.getElementById('longitude').value = pos.coords.longitude;
    lookupAddress('device');
  });
}
function readPhoto(input) {
  var out = document.getElementById('image_base64');
  out.value = '';
  if (!input.files || !input.files[0]) return;
  var reader = new FileReader();
  reader.onload = function () {
    out.value = String(reader.result).split(',')[1] || '';
  };
  reader.readAsDataURL(input.files[0]);
}
"#;

pub fn report_form_page(vm: &ReportFormVm) -> Markup {
    desktop_layout(
        "Report Missing Pet",
        true,
        html! {
            main class="container" {
                h1 { "Report Missing Pet" }
                @if let Some(msg) = &vm.flash {
                    (flash(msg))
                }
                @if let Some(msg) = &vm.error {
                    (alert(msg))
                }

                form class="stacked" method="post" action="/pets" {
                    fieldset {
                        legend { "Pet Information" }
                        label for="name" { "Pet Name" }
                        input type="text" id="name" name="name" value=(vm.name) required;

                        label for="species" { "Species" }
                        select id="species" name="species" {
                            @for choice in SPECIES_OPTIONS {
                                option value=(choice) selected[vm.species == choice] { (choice) }
                            }
                        }

                        label for="description" { "Description" }
                        textarea id="description" name="description" rows="4" required { (vm.description) }
                    }

                    fieldset {
                        legend { "Last Seen Location" }
                        label for="latitude" { "Latitude" }
                        input
                            type="number" step="any" min="-90" max="90"
                            id="latitude" name="latitude" value=(vm.latitude) required
                            onchange="lookupAddress('pin')";
                        label for="longitude" { "Longitude" }
                        input
                            type="number" step="any" min="-180" max="180"
                            id="longitude" name="longitude" value=(vm.longitude) required
                            onchange="lookupAddress('pin')";
                        button type="button" class="btn secondary" onclick="useDeviceLocation()" {
                            "Use my location"
                        }
                        div id="location-result" {
                            @if !vm.address.is_empty() {
                                p class="address" { (vm.address) }
                            }
                            input type="hidden" name="address" value=(vm.address);
                        }
                    }

                    fieldset {
                        legend { "Photo" }
                        input type="file" id="photo" accept="image/*" onchange="readPhoto(this)";
                        input type="hidden" id="image_base64" name="image_base64";
                    }

                    fieldset {
                        legend { "Contact Information" }
                        label for="contact_info" { "How can people reach you?" }
                        input type="text" id="contact_info" name="contact_info" value=(vm.contact_info) required;
                    }

                    (button("Submit Report"))
                }
                script { (PreEscaped(FORM_SCRIPT)) }
            }
        },
    )
}
