//! HTTP routing for the mixed content feed.
//!
//! `GET /?count=<limit>&offset=<offset>` returns the JSON array of content
//! items for that page. Both parameters default to 0.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State, rejection::QueryRejection},
    http::{Method, Uri},
    routing::get,
};
use mixfeed_core::{ContentItem, Service};
use serde::Deserialize;

use crate::error::ApiError;

/// Page query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    /// Page size; maps to the service's `limit`.
    #[serde(default)]
    pub count: i64,
    #[serde(default)]
    pub offset: i64,
}

/// Build the application router around `service`.
pub fn router(service: Service) -> Router {
    Router::new().route("/", get(content_items)).with_state(service)
}

async fn content_items(
    State(service): State<Service>, method: Method, uri: Uri, params: Result<Query<PageParams>, QueryRejection>,
) -> Result<Json<Vec<Arc<ContentItem>>>, ApiError> {
    tracing::info!(%method, %uri, "request");

    let Query(params) = params.map_err(|e| ApiError::InvalidInput(e.body_text()))?;
    let items = service.content_items(params.count, params.offset)?;

    Ok(Json(items))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use chrono::Utc;
    use mixfeed_core::{
        Cacher, ConfiguredSequencer, ContentAddress, Error, MixEntry, ProviderHealth, Sequencer, State as Snapshot,
    };
    use tower::ServiceExt;

    struct FixedCacher(Snapshot);

    impl Cacher for FixedCacher {
        fn state(&self) -> Snapshot {
            self.0.clone()
        }
    }

    struct BrokenSequencer;

    impl Sequencer for BrokenSequencer {
        fn sequence(&self, _: &dyn ProviderHealth, _: i64, _: i64) -> Result<Vec<ContentAddress>, Error> {
            Err(Error::Internal("sequencer unavailable".into()))
        }
    }

    fn items(provider: &str, count: usize) -> Vec<ContentItem> {
        (0..count)
            .map(|i| ContentItem {
                id: format!("{provider}-{i}"),
                title: "title".into(),
                source: provider.into(),
                summary: String::new(),
                link: String::new(),
                expiry: Utc::now(),
            })
            .collect()
    }

    fn app() -> Router {
        let snapshot = Snapshot::new().with_items("1", items("1", 10)).with_items("2", items("2", 10));
        let sequencer =
            ConfiguredSequencer::new(vec![MixEntry::new("1", Some("2")), MixEntry::new("2", None)]).unwrap();
        router(Service::new(Arc::new(FixedCacher(snapshot)), Arc::new(sequencer)))
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, String) {
        let response = app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap()).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    fn ids(body: &str) -> Vec<String> {
        let items: Vec<serde_json::Value> = serde_json::from_str(body).unwrap();
        items.iter().map(|item| item["id"].as_str().unwrap().to_string()).collect()
    }

    #[tokio::test]
    async fn test_defaults_to_empty_page() {
        let (status, body) = get(app(), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "[]");
    }

    #[tokio::test]
    async fn test_returns_mixed_page() {
        let (status, body) = get(app(), "/?count=4&offset=1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(ids(&body), ["2-0", "1-1", "2-1", "1-2"]);
    }

    #[tokio::test]
    async fn test_response_is_json() {
        let response =
            app().oneshot(Request::builder().uri("/?count=1").body(Body::empty()).unwrap()).await.unwrap();
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
    }

    #[tokio::test]
    async fn test_item_fields_serialized() {
        let (_, body) = get(app(), "/?count=1").await;
        let items: Vec<serde_json::Value> = serde_json::from_str(&body).unwrap();
        for field in ["id", "title", "source", "summary", "link", "expiry"] {
            assert!(items[0].get(field).is_some(), "missing field {field}");
        }
    }

    #[tokio::test]
    async fn test_max_count_returns_cached_items() {
        let (status, body) = get(app(), "/?count=9223372036854775807").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(ids(&body).len(), 20);
    }

    #[tokio::test]
    async fn test_negative_count_is_bad_request() {
        let (status, body) = get(app(), "/?count=-1").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.starts_with("invalid input parameters: "));
    }

    #[tokio::test]
    async fn test_negative_offset_is_bad_request() {
        let (status, _) = get(app(), "/?count=5&offset=-3").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_non_integer_is_bad_request() {
        let (status, body) = get(app(), "/?count=ten").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.starts_with("invalid input parameters: "));

        let (status, _) = get(app(), "/?offset=1.5").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_internal_failure_is_server_error() {
        let snapshot = Snapshot::new().with_items("1", items("1", 1));
        let app = router(Service::new(Arc::new(FixedCacher(snapshot)), Arc::new(BrokenSequencer)));

        let (status, body) = get(app, "/?count=1").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.starts_with("internal server error: "));
    }

    #[tokio::test]
    async fn test_unknown_path_not_found() {
        let (status, _) = get(app(), "/feed").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
