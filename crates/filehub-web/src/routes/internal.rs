//! Internal notification endpoints.
//!
//! Mutation handlers running outside this process publish file events here
//! after their durable write succeeds.

use axum::{extract::State, http::StatusCode, Json};
use filehub_core::FileEvent;
use serde::Serialize;
use tracing::info;

use crate::state::AppState;

#[derive(Serialize)]
pub struct SubscriberCount {
    pub subscribers: usize,
}

/// Receive a file event and broadcast it to all stream clients.
pub async fn notify(State(state): State<AppState>, Json(event): Json<FileEvent>) -> StatusCode {
    info!(
        kind = %event.kind(),
        file_id = %event.file_id(),
        subscribers = state.broadcaster.subscriber_count(),
        "Received internal notification, broadcasting to stream clients"
    );
    state.notify(&event);
    StatusCode::ACCEPTED
}

/// Number of currently open event streams.
pub async fn subscribers(State(state): State<AppState>) -> Json<SubscriberCount> {
    Json(SubscriberCount {
        subscribers: state.broadcaster.subscriber_count(),
    })
}

#[cfg(test)]
mod tests {
    use crate::config::LiveConfig;
    use crate::create_router;
    use crate::live;
    use crate::state::AppState;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
    };
    use futures::{FutureExt, StreamExt};
    use serde_json::Value;
    use tower::ServiceExt;

    fn notify_request(body: &str) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri("/internal/notify")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_notify_broadcasts() {
        let state = AppState::new(LiveConfig::default());
        let mut a = live::open(state.broadcaster.registry(), 8).unwrap();
        let mut b = live::open(state.broadcaster.registry(), 8).unwrap();

        let body = r#"{"type":"file-added","fileId":"f1","file":{"id":"f1","name":"cat.png","url":"/share?id=f1","size":512,"extension":"image","public":false,"uploadedById":"u1"}}"#;
        let response = create_router(state.clone())
            .oneshot(notify_request(body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);

        for stream in [&mut a, &mut b] {
            let payload = stream.next().await.unwrap();
            let value: Value = serde_json::from_str(&payload).unwrap();
            assert_eq!(value["type"], "file-added");
            assert_eq!(value["fileId"], "f1");
            assert_eq!(value["file"]["name"], "cat.png");
        }
    }

    #[tokio::test]
    async fn test_notify_rejects_unknown_type() {
        let state = AppState::new(LiveConfig::default());
        let response = create_router(state)
            .oneshot(notify_request(r#"{"type":"file-renamed","fileId":"f1"}"#))
            .await
            .unwrap();
        assert!(response.status().is_client_error());
    }

    #[tokio::test]
    async fn test_notify_rejects_mismatched_file_id() {
        let state = AppState::new(LiveConfig::default());
        let mut stream = live::open(state.broadcaster.registry(), 8).unwrap();

        let body = r#"{"type":"file-added","fileId":"A","file":{"id":"B","name":"cat.png","url":"/share?id=B","size":512,"extension":"image","public":false,"uploadedById":"u1"}}"#;
        let response = create_router(state.clone())
            .oneshot(notify_request(body))
            .await
            .unwrap();

        assert!(response.status().is_client_error());
        assert!(stream.next().now_or_never().is_none());
        assert_eq!(state.broadcaster.subscriber_count(), 1);
    }

    #[tokio::test]
    async fn test_subscriber_count() {
        let state = AppState::new(LiveConfig::default());
        let _stream = live::open(state.broadcaster.registry(), 8).unwrap();

        let response = create_router(state)
            .oneshot(
                Request::builder()
                    .uri("/internal/subscribers")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["subscribers"], 1);
    }
}
