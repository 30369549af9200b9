pub mod blob;
pub mod errors;
pub mod html;

pub use blob::blob_response;
pub use errors::{error_to_response, status_code, ResultResp};
pub use html::{html_response, html_response_with_status, redirect, redirect_with_cookie};
