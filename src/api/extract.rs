/// Request body extraction
use crate::error::FeedError;
use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

/// JSON request body, parsed whatever the `Content-Type` says.
///
/// Anything other than a JSON object that parses into `T` is a 400
/// `{"error": "Invalid JSON body"}`. Arrays are refused even though derived
/// structs would accept them positionally.
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(IntoResponse::into_response)?;

        parse_object(&bytes).map(JsonBody).map_err(|e| {
            debug!("Rejected request body: {}", e);
            FeedError::Validation("Invalid JSON body".to_string()).into_response()
        })
    }
}

fn parse_object<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, serde_json::Error> {
    match serde_json::from_slice(bytes)? {
        value @ Value::Object(_) => serde_json::from_value(value),
        _ => Err(serde::de::Error::custom("expected a JSON object")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Like {
        post_id: Option<String>,
    }

    #[test]
    fn test_parse_object_accepts_object() {
        let like: Like = parse_object(br#"{"postId": "abc", "extra": 1}"#).unwrap();
        assert_eq!(like.post_id.as_deref(), Some("abc"));
    }

    #[test]
    fn test_parse_object_rejects_non_objects() {
        for raw in [r#"["abc"]"#, "[]", r#""abc""#, "null", "42"] {
            assert!(parse_object::<Like>(raw.as_bytes()).is_err(), "{}", raw);
        }
    }
}
