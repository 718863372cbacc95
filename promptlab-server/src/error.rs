use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use promptlab_engine::engine::EngineError;
use serde::Serialize;

/// Relay-boundary error: every failure becomes structured JSON, never a
/// crashed process.
#[derive(Debug)]
pub enum ApiError {
    /// Caller mistake: 400 with a message.
    Validation(String),
    /// Upstream/service failure: 500 with a short label and the raw detail.
    Upstream {
        error: &'static str,
        details: String,
    },
}

impl ApiError {
    /// Maps an engine error, labelling upstream failures for the endpoint
    /// that produced them.
    pub fn from_engine(err: EngineError, upstream_label: &'static str) -> Self {
        if err.is_validation() {
            return ApiError::Validation(err.to_string());
        }
        match err {
            EngineError::Upstream(source) => ApiError::Upstream {
                error: upstream_label,
                details: format!("{source:#}"),
            },
            other => ApiError::Upstream {
                error: upstream_label,
                details: other.to_string(),
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Validation(message) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    error: message,
                    details: None,
                },
            ),
            ApiError::Upstream { error, details } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody {
                    error: error.to_string(),
                    details: Some(details),
                },
            ),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use promptlab_core::params::ParamError;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn validation_errors_are_400_with_message_only() {
        let response = ApiError::Validation("at least two results".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(json["error"], "at least two results");
        assert!(json.get("details").is_none());
    }

    #[tokio::test]
    async fn upstream_errors_are_500_with_details() {
        let response = ApiError::Upstream {
            error: "Failed to generate completion",
            details: "status=401 body=...".into(),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json = body_json(response).await;
        assert_eq!(json["error"], "Failed to generate completion");
        assert_eq!(json["details"], "status=401 body=...");
    }

    #[tokio::test]
    async fn engine_validation_maps_to_400() {
        let err = EngineError::InvalidConfig(ParamError::ZeroMaxTokens);
        let response = ApiError::from_engine(err, "Failed to generate completion").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn engine_upstream_maps_to_500_with_label() {
        let err = EngineError::Upstream(anyhow::anyhow!("connection refused"));
        let response = ApiError::from_engine(err, "Failed to generate reflection").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json = body_json(response).await;
        assert_eq!(json["error"], "Failed to generate reflection");
        assert_eq!(json["details"], "connection refused");
    }
}
