pub mod detail;
pub mod listing;
pub mod location;
pub mod login;
pub mod profile;
pub mod report_form;
pub mod reset;

pub use detail::detail_page;
pub use listing::listing_page;
pub use location::location_fragment;
pub use login::login_page;
pub use profile::profile_page;
pub use report_form::{report_form_page, ReportFormVm};
pub use reset::{reset_confirm_page, reset_request_page, reset_sent_content, reset_sent_page};
