pub mod filter;
pub mod report;

pub use filter::ReportFeed;
pub use report::{GeoPoint, Report, REPORTED_DATE_FIELD, REPORTS_COLLECTION, SPECIES_OPTIONS};
