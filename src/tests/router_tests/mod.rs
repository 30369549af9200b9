mod auth_flow_tests;
mod listing_tests;
mod report_tests;
