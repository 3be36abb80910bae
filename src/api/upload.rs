/// Media upload passthrough to the blob store
use crate::{
    api::{extract::JsonBody, method_not_allowed},
    blob_store::PutOptions,
    context::AppContext,
    error::{FeedError, FeedResult},
};
use axum::{extract::State, routing::post, Json, Router};
use base64::{
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
    Engine,
};
use serde::{Deserialize, Serialize};
use tracing::info;

const LENIENT: GeneralPurposeConfig =
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent);
const STANDARD_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::STANDARD, LENIENT);
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::URL_SAFE, LENIENT);

/// Build upload routes
pub fn routes() -> Router<AppContext> {
    Router::new().route(
        "/create-upload-url",
        post(create_upload_url).fallback(method_not_allowed),
    )
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequest {
    pub filename: Option<String>,
    pub content_type: Option<String>,
    /// Base64 file contents
    pub file_data: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub blob_url: String,
}

/// Decode base64 in either alphabet, padding optional, whitespace ignored
pub fn decode_file_data(encoded: &str) -> Option<Vec<u8>> {
    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    STANDARD_LENIENT
        .decode(&compact)
        .or_else(|_| URL_SAFE_LENIENT.decode(&compact))
        .ok()
}

/// POST /create-upload-url
///
/// Despite the name, this uploads the file itself and returns its public URL.
async fn create_upload_url(
    State(ctx): State<AppContext>,
    JsonBody(req): JsonBody<UploadRequest>,
) -> FeedResult<Json<UploadResponse>> {
    let non_empty = |value: Option<String>| value.filter(|v| !v.is_empty());
    let (Some(filename), Some(content_type), Some(file_data)) = (
        non_empty(req.filename),
        non_empty(req.content_type),
        non_empty(req.file_data),
    ) else {
        return Err(FeedError::Validation(
            "Missing filename, contentType, or fileData".to_string(),
        ));
    };

    let data = decode_file_data(&file_data)
        .ok_or_else(|| FeedError::Validation("Invalid base64 fileData".to_string()))?;

    let stored = ctx
        .blob_store
        .put(&filename, data, &PutOptions::public(content_type))
        .await
        .map_err(|e| e.or_fail("Failed to upload file"))?;

    info!("Uploaded {} ({} bytes) to {}", filename, stored.size, stored.url);

    Ok(Json(UploadResponse {
        blob_url: stored.url,
    }))
}
