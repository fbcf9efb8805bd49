//! The single-endpoint resource dispatcher.
//!
//! Clients POST `{"resource": ..., "data": ...}` to `/` and the resource
//! string selects the operation. Unknown resources and bare GETs get the
//! ping response, which doubles as a health check.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{domain::search::PostMatch, routes::ApiError, AppState};

const PING_MESSAGE: &str = "Hello from Agora!";

const CLASSIFY_RESOURCE: &str = "arxivClassification";
const SEARCH_RESOURCE: &str = "360PiazzaDatabase";

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(ping).post(dispatch))
}

#[derive(Debug, Clone, Deserialize)]
struct ResourceRequest {
    #[serde(default)]
    resource: Option<String>,
    #[serde(default)]
    data: Option<String>,
}

#[derive(Debug, Serialize)]
struct MessageResponse {
    message: String,
}

#[derive(Debug, Serialize)]
struct SearchResponse {
    response: Vec<PostMatch>,
}

fn ping_response() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: PING_MESSAGE.to_string(),
    })
}

#[instrument(name = "GET /", skip_all)]
async fn ping() -> Json<MessageResponse> {
    ping_response()
}

#[instrument(name = "POST /", skip_all, fields(resource = ?request.resource))]
async fn dispatch(
    State(app_state): State<AppState>,
    Json(request): Json<ResourceRequest>,
) -> Result<Response, ApiError> {
    match (request.resource.as_deref(), request.data) {
        (Some(CLASSIFY_RESOURCE), Some(text)) => {
            let category = app_state.classifier().classify(&text).await?;
            Ok(Json(MessageResponse {
                message: category.description.to_string(),
            })
            .into_response())
        }
        (Some(SEARCH_RESOURCE), Some(query)) => {
            let matches = app_state.search_service().search(&query).await?;
            Ok(Json(SearchResponse { response: matches }).into_response())
        }
        _ => Ok(ping_response().into_response()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_tolerates_missing_fields() {
        let request: ResourceRequest = serde_json::from_str("{}").unwrap();
        assert!(request.resource.is_none());
        assert!(request.data.is_none());

        let request: ResourceRequest =
            serde_json::from_str(r#"{"resource": "arxivClassification"}"#).unwrap();
        assert_eq!(request.resource.as_deref(), Some("arxivClassification"));
        assert!(request.data.is_none());
    }

    #[test]
    fn request_ignores_unknown_fields() {
        let request: ResourceRequest =
            serde_json::from_str(r#"{"resource": "x", "data": "y", "extra": 1}"#).unwrap();
        assert_eq!(request.resource.as_deref(), Some("x"));
        assert_eq!(request.data.as_deref(), Some("y"));
    }

    #[test]
    fn ping_body_shape() {
        let body = serde_json::to_value(&MessageResponse {
            message: PING_MESSAGE.to_string(),
        })
        .unwrap();
        assert_eq!(body["message"], "Hello from Agora!");
    }
}
