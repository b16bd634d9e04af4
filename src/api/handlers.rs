//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use tracing::error;

use super::AppState;
use super::types::{ErrorResponse, OptimizeRequest};
use crate::invest::{AllocationResult, allocate};

type ApiError = (StatusCode, Json<ErrorResponse>);

/// `GET /status` → 200 + `"OK"`
pub async fn get_status() -> Json<&'static str> {
    Json("OK")
}

/// Runs the allocator on the request body.
///
/// `POST /optimize` → 200 + `AllocationResult` JSON
/// precondition failure → 400 + `ErrorResponse`
pub async fn post_optimize(
    State(state): State<Arc<AppState>>,
    Json(request): Json<OptimizeRequest>,
) -> Result<Json<AllocationResult>, ApiError> {
    let params = request.params(state.config.allocation_params());

    let outcome = tokio::task::spawn_blocking(move || {
        allocate(&request.consumption, &request.projects, &params)
    })
    .await
    .map_err(|e| {
        error!(error = %e, "allocation task failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: format!("allocation task failed: {e}"),
            }),
        )
    })?;

    outcome.map(Json).map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
    })
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::Request;
    use tower::util::ServiceExt;

    use super::*;
    use crate::api::router;
    use crate::config::AdvisorConfig;

    fn make_test_state() -> Arc<AppState> {
        Arc::new(AppState {
            config: AdvisorConfig::default(),
        })
    }

    fn post_json(body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/optimize")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn status_returns_ok() {
        let app = router(make_test_state());
        let req = Request::builder()
            .uri("/status")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json, "OK");
    }

    #[tokio::test]
    async fn optimize_returns_plan() {
        let app = router(make_test_state());
        let req = post_json(serde_json::json!({
            "consumption": [4.0, 4.0, 4.0, 4.0],
            "projects": [{
                "id": "pv",
                "name": "Roof",
                "kind": "generation",
                "source": "solar",
                "production": [4.0, 4.0, 4.0, 4.0],
                "capacity_per_share": 1.0,
                "price_per_share": 100.0
            }],
            "max_shares_per_project": 5
        }));
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        let recs = json["recommendations"].as_array().unwrap();
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0]["recommended_shares"], 5);
        assert_eq!(recs[0]["energy_type"], "solar");
        assert!(json.get("energy_metrics").is_some());
        assert!(json.get("summary").is_some());
    }

    #[tokio::test]
    async fn no_projects_returns_400() {
        let app = router(make_test_state());
        let req = post_json(serde_json::json!({
            "consumption": [1.0, 2.0],
            "projects": []
        }));
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(json["error"].as_str().unwrap().contains("no eligible projects"));
    }

    #[tokio::test]
    async fn invalid_share_cap_returns_400() {
        let app = router(make_test_state());
        let req = post_json(serde_json::json!({
            "consumption": [1.0],
            "projects": [{
                "id": "b", "name": "Pack", "kind": "storage",
                "capacity_per_share": 10.0, "price_per_share": 2000.0
            }],
            "max_shares_per_project": 0
        }));
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
