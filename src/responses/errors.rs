use crate::errors::ServerError;
use crate::repository::ReportError;
use crate::storage::IMAGE_DECODE_FAILED;
use crate::templates::components::error_page;
use astra::{Body, Response, ResponseBuilder};

pub type ResultResp = Result<Response, ServerError>;

pub fn status_code(err: &ServerError) -> u16 {
    match err {
        ServerError::NotFound => 404,
        ServerError::BadRequest(_) => 400,
        ServerError::Unauthorized(_) => 401,
        ServerError::DbError(_) | ServerError::InternalError => 500,
        ServerError::Report(report) => match report {
            ReportError::Unauthenticated => 401,
            // the client sent something that is not a picture
            ReportError::ImageUploadFailed(msg) if msg == IMAGE_DECODE_FAILED => 400,
            ReportError::ImageUploadFailed(_) => 502,
            ReportError::StoreWriteFailed(_) => 500,
            ReportError::FetchFailed(_) => 503,
        },
    }
}

/// Convert a ServerError into an HTML error page
pub fn error_to_response(err: ServerError) -> Response {
    let status = status_code(&err);
    if status >= 500 {
        tracing::error!(status, error = %err, "request failed");
    } else {
        tracing::debug!(status, error = %err, "request rejected");
    }

    let message = match &err {
        ServerError::NotFound => "Not Found".to_string(),
        ServerError::BadRequest(msg) | ServerError::Unauthorized(msg) => msg.clone(),
        ServerError::DbError(_) | ServerError::InternalError => "Internal Server Error".to_string(),
        ServerError::Report(report) => report.to_string(),
    };

    ResponseBuilder::new()
        .status(status)
        .header("Content-Type", "text/html; charset=utf-8")
        .body(Body::from(error_page(status, &message).into_string()))
        .unwrap_or_else(|_| Response::new(Body::from("Internal Server Error")))
}
