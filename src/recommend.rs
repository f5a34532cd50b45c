use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{Config, ResponseShape};
use crate::message::Item;

/// Shown when a failed request carries no message of its own
pub const GENERIC_ERROR: &str = "An error occurred";
/// Shown when a bare-array backend answers with no items
pub const NO_RESULTS: &str = "No results found";

#[derive(Debug, Error)]
pub enum RecommendError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server returned {status}")]
    Status {
        status: StatusCode,
        message: Option<String>,
    },
    #[error("malformed response: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl RecommendError {
    /// Best-effort text for the transcript: the server's own message when it
    /// sent one, otherwise a generic fallback.
    pub fn user_message(&self) -> String {
        match self {
            RecommendError::Status {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message.clone(),
            _ => GENERIC_ERROR.to_string(),
        }
    }
}

/// A usable answer from the backend
#[derive(Debug, Clone, PartialEq)]
pub enum Recommendation {
    Items(Vec<Item>),
    /// The backend found nothing and said why
    Empty(String),
}

#[derive(Serialize)]
struct RecommendRequest<'a> {
    query: &'a str,
    top_n: u32,
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(default)]
    message: Option<String>,
    data: Vec<Item>,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// Turn a raw HTTP status and body into a recommendation.
pub fn decode_response(
    shape: ResponseShape,
    status: StatusCode,
    body: &str,
) -> Result<Recommendation, RecommendError> {
    if !status.is_success() {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.message);
        return Err(RecommendError::Status { status, message });
    }

    match shape {
        ResponseShape::Envelope => {
            let envelope: Envelope = serde_json::from_str(body)?;
            if envelope.data.is_empty() {
                Ok(Recommendation::Empty(
                    envelope.message.unwrap_or_else(|| NO_RESULTS.to_string()),
                ))
            } else {
                Ok(Recommendation::Items(envelope.data))
            }
        }
        ResponseShape::Array => {
            let items: Vec<Item> = serde_json::from_str(body)?;
            if items.is_empty() {
                Ok(Recommendation::Empty(NO_RESULTS.to_string()))
            } else {
                Ok(Recommendation::Items(items))
            }
        }
    }
}

/// Anything that can answer a free-text query with recommendations
#[async_trait]
pub trait Recommender: Send + Sync {
    async fn recommend(&self, query: &str) -> Result<Recommendation, RecommendError>;
}

#[derive(Clone)]
pub struct RecommendClient {
    client: Client,
    endpoint: String,
    top_n: u32,
    shape: ResponseShape,
}

impl RecommendClient {
    pub fn new(endpoint: &str, top_n: u32, shape: ResponseShape) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.to_string(),
            top_n,
            shape,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.endpoint, config.top_n, config.response_shape)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Recommender for RecommendClient {
    async fn recommend(&self, query: &str) -> Result<Recommendation, RecommendError> {
        let request = RecommendRequest {
            query,
            top_n: self.top_n,
        };

        tracing::info!(endpoint = %self.endpoint, top_n = self.top_n, "sending recommendation request");

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        let result = decode_response(self.shape, status, &body);
        match &result {
            Ok(Recommendation::Items(items)) => {
                tracing::info!(%status, count = items.len(), "received recommendations")
            }
            Ok(Recommendation::Empty(message)) => {
                tracing::info!(%status, %message, "no recommendations")
            }
            Err(e) => tracing::warn!(%status, error = %e, "recommendation request failed"),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PHONE: &str = r#"{"brand_name":"oneplus","model":"Nord CE 3","price":24999,
        "ram_capacity":8,"battery_capacity":5000,"primary_camera_rear":50,"avg_rating":8.2}"#;

    #[test]
    fn test_envelope_with_items() {
        let body = format!(r#"{{"message":"success","data":[{PHONE},{PHONE}]}}"#);
        let result = decode_response(ResponseShape::Envelope, StatusCode::OK, &body).unwrap();
        match result {
            Recommendation::Items(items) => {
                assert_eq!(items.len(), 2);
                assert_eq!(items[0].model, "Nord CE 3");
            }
            other => panic!("expected items, got {:?}", other),
        }
    }

    #[test]
    fn test_envelope_empty_uses_server_message() {
        let body = r#"{"message":"No phones match your query constraints.","data":[]}"#;
        let result = decode_response(ResponseShape::Envelope, StatusCode::OK, body).unwrap();
        assert_eq!(
            result,
            Recommendation::Empty("No phones match your query constraints.".to_string())
        );
    }

    #[test]
    fn test_envelope_missing_data_is_malformed() {
        let err = decode_response(ResponseShape::Envelope, StatusCode::OK, r#"[]"#).unwrap_err();
        assert!(matches!(err, RecommendError::Malformed(_)));
        assert_eq!(err.user_message(), GENERIC_ERROR);
    }

    #[test]
    fn test_bare_array() {
        let body = format!("[{PHONE}]");
        let result = decode_response(ResponseShape::Array, StatusCode::OK, &body).unwrap();
        assert!(matches!(result, Recommendation::Items(ref items) if items.len() == 1));

        let empty = decode_response(ResponseShape::Array, StatusCode::OK, "[]").unwrap();
        assert_eq!(empty, Recommendation::Empty(NO_RESULTS.to_string()));
    }

    #[test]
    fn test_null_brand_keeps_the_rest_of_the_reply() {
        let body = format!(r#"[{PHONE},{{"brand_name":null,"model":"C55","price":9999}}]"#);
        let result = decode_response(ResponseShape::Array, StatusCode::OK, &body).unwrap();
        match result {
            Recommendation::Items(items) => {
                assert_eq!(items.len(), 2);
                assert_eq!(items[1].key(), "C55");
            }
            other => panic!("expected items, got {:?}", other),
        }
    }

    #[test]
    fn test_error_status_carries_server_message() {
        let body = r#"{"message":"No phones match your query constraints."}"#;
        let err = decode_response(ResponseShape::Array, StatusCode::NOT_FOUND, body).unwrap_err();
        assert!(matches!(err, RecommendError::Status { status, .. } if status == StatusCode::NOT_FOUND));
        assert_eq!(err.user_message(), "No phones match your query constraints.");
    }

    #[test]
    fn test_error_status_without_message_falls_back() {
        let err = decode_response(
            ResponseShape::Envelope,
            StatusCode::INTERNAL_SERVER_ERROR,
            "<html>Internal Server Error</html>",
        )
        .unwrap_err();
        assert_eq!(err.user_message(), GENERIC_ERROR);

        let blank = decode_response(ResponseShape::Envelope, StatusCode::BAD_REQUEST, r#"{"message":"  "}"#)
            .unwrap_err();
        assert_eq!(blank.user_message(), GENERIC_ERROR);
    }
}
