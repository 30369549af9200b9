// responses/blob.rs
use crate::errors::ServerError;
use crate::responses::ResultResp;
use astra::{Body, ResponseBuilder};

/// Content type from the stored object's extension.
pub fn content_type_for(key: &str) -> mime::Mime {
    let ext = key.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase());
    match ext.as_deref() {
        Some("jpg") | Some("jpeg") => mime::IMAGE_JPEG,
        Some("png") => mime::IMAGE_PNG,
        Some("gif") => mime::IMAGE_GIF,
        Some("webp") => "image/webp"
            .parse()
            .unwrap_or(mime::APPLICATION_OCTET_STREAM),
        _ => mime::APPLICATION_OCTET_STREAM,
    }
}

/// Serve a stored photo.
pub fn blob_response(bytes: Vec<u8>, key: &str) -> ResultResp {
    let resp = ResponseBuilder::new()
        .status(200)
        .header("Content-Type", content_type_for(key).essence_str())
        .header("Cache-Control", "public, max-age=31536000, immutable")
        .body(Body::from(bytes))
        .map_err(|_| ServerError::InternalError)?;

    Ok(resp)
}
