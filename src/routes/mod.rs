use axum::Router;
use sqlx::SqlitePool;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::Config;

mod get_area;
mod health;
mod list_areas;
mod update_area;

pub use update_area::ADMIN_KEY_HEADER;

// ---

/// Build the full application router.
///
/// Area endpoints are nested under `/api`; `/health` stays at the root.
/// Every route accepts cross-origin requests from any origin (no credentials).
pub fn router(pool: SqlitePool, config: Config) -> Router {
    // ---
    let api = Router::new()
        .merge(list_areas::router())
        .merge(get_area::router())
        .merge(update_area::router());

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api", api)
        .merge(health::router())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state((pool, config))
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use crate::{schema, test_config, test_pool, Area};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    const KEY: &str = "test-admin-key";

    async fn seeded_app() -> (Router, SqlitePool) {
        // ---
        let pool = test_pool().await;
        schema::create_schema(&pool).await.unwrap();
        schema::seed_areas(&pool).await.unwrap();
        (router(pool.clone(), test_config()), pool)
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        // ---
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn put(uri: &str, key: Option<&str>, body: &str) -> Request<Body> {
        let mut builder = Request::builder()
            .method("PUT")
            .uri(uri)
            .header("content-type", "application/json");
        if let Some(key) = key {
            builder = builder.header(ADMIN_KEY_HEADER, key);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    async fn snapshot(pool: &SqlitePool) -> Vec<Area> {
        sqlx::query_as("SELECT id, name, status, details, eta FROM areas ORDER BY id")
            .fetch_all(pool)
            .await
            .unwrap()
    }

    fn names(body: &Value) -> Vec<&str> {
        body.as_array()
            .unwrap()
            .iter()
            .map(|a| a["name"].as_str().unwrap())
            .collect()
    }

    const OUTAGE_BODY: &str = r#"{"status":"Outage","details":"Burst pipe","eta":"Unknown"}"#;

    #[tokio::test]
    async fn test_list_returns_all_seeded_areas() {
        // ---
        let (app, _pool) = seeded_app().await;

        let (status, body) = send(&app, get("/api/areas")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(names(&body), vec!["randburg", "rosebank", "soweto"]);
        assert_eq!(
            body[0],
            json!({
                "id": 1,
                "name": "randburg",
                "status": "Outage",
                "details": "Planned Maintenance",
                "eta": "6 PM today"
            })
        );
    }

    #[tokio::test]
    async fn test_empty_search_returns_everything() {
        // ---
        let (app, _pool) = seeded_app().await;

        let (status, body) = send(&app, get("/api/areas?search=")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_search_matches_substring_case_insensitively() {
        // ---
        let (app, _pool) = seeded_app().await;

        let (_, body) = send(&app, get("/api/areas?search=ros")).await;
        assert_eq!(names(&body), vec!["rosebank"]);

        let (_, body) = send(&app, get("/api/areas?search=ROS")).await;
        assert_eq!(names(&body), vec!["rosebank"]);

        // "r" appears in randburg and rosebank only
        let (_, body) = send(&app, get("/api/areas?search=r")).await;
        assert_eq!(names(&body), vec!["randburg", "rosebank"]);

        let (_, body) = send(&app, get("/api/areas?search=WET")).await;
        assert_eq!(names(&body), vec!["soweto"]);
    }

    #[tokio::test]
    async fn test_search_without_match_is_empty_list() {
        // ---
        let (app, _pool) = seeded_app().await;

        let (status, body) = send(&app, get("/api/areas?search=durban")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn test_search_wildcards_are_literal() {
        // ---
        let (app, _pool) = seeded_app().await;

        let (_, body) = send(&app, get("/api/areas?search=%25")).await;
        assert_eq!(body, json!([]));

        let (_, body) = send(&app, get("/api/areas?search=_")).await;
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn test_get_area_ignores_case() {
        // ---
        let (app, _pool) = seeded_app().await;

        let (status, lower) = send(&app, get("/api/areas/rosebank")).await;
        assert_eq!(status, StatusCode::OK);

        let (status, upper) = send(&app, get("/api/areas/ROSEBANK")).await;
        assert_eq!(status, StatusCode::OK);

        assert_eq!(lower, upper);
        assert_eq!(upper["name"], "rosebank");
        assert_eq!(upper["status"], "Normal");
        assert_eq!(upper["details"], "All clear");
        assert_eq!(upper["eta"], "N/A");
    }

    #[tokio::test]
    async fn test_get_unknown_area_is_not_found() {
        // ---
        let (app, _pool) = seeded_app().await;

        let (status, body) = send(&app, get("/api/areas/atlantis")).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "error": "Area not found" }));
    }

    #[tokio::test]
    async fn test_update_changes_status_and_keeps_name() {
        // ---
        let (app, _pool) = seeded_app().await;

        let (status, body) = send(
            &app,
            put("/api/admin/areas/rosebank", Some(KEY), OUTAGE_BODY),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({ "message": "Status updated successfully", "area_name": "rosebank" })
        );

        let (_, area) = send(&app, get("/api/areas/rosebank")).await;
        assert_eq!(
            area,
            json!({
                "id": 2,
                "name": "rosebank",
                "status": "Outage",
                "details": "Burst pipe",
                "eta": "Unknown"
            })
        );
    }

    #[tokio::test]
    async fn test_update_echoes_path_name_as_given() {
        // ---
        let (app, pool) = seeded_app().await;

        let (status, body) = send(
            &app,
            put("/api/admin/areas/SoWeTo", Some(KEY), OUTAGE_BODY),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["area_name"], "SoWeTo");

        let soweto = snapshot(&pool).await.into_iter().find(|a| a.id == 3).unwrap();
        assert_eq!(soweto.name, "soweto");
        assert_eq!(soweto.status, "Outage");
    }

    #[tokio::test]
    async fn test_update_accepts_null_details_and_eta() {
        // ---
        let (app, _pool) = seeded_app().await;

        let (status, _) = send(
            &app,
            put(
                "/api/admin/areas/randburg",
                Some(KEY),
                r#"{"status":"Normal","details":null,"eta":null}"#,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (_, area) = send(&app, get("/api/areas/randburg")).await;
        assert_eq!(area["status"], "Normal");
        assert_eq!(area["details"], Value::Null);
        assert_eq!(area["eta"], Value::Null);
    }

    #[tokio::test]
    async fn test_update_with_bad_key_never_mutates() {
        // ---
        let (app, pool) = seeded_app().await;
        let before = snapshot(&pool).await;

        let attempts = [
            put("/api/admin/areas/rosebank", None, OUTAGE_BODY),
            put("/api/admin/areas/rosebank", Some("wrong"), OUTAGE_BODY),
            put("/api/admin/areas/rosebank", Some(""), OUTAGE_BODY),
            put("/api/admin/areas/rosebank", Some("wrong"), "{}"),
            put("/api/admin/areas/rosebank", None, "not json"),
        ];
        for request in attempts {
            let (status, body) = send(&app, request).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED);
            assert_eq!(body, json!({ "error": "Unauthorized" }));
        }

        assert_eq!(snapshot(&pool).await, before);
    }

    #[tokio::test]
    async fn test_update_with_incomplete_body_is_rejected() {
        // ---
        let (app, pool) = seeded_app().await;
        let before = snapshot(&pool).await;

        let bodies = [
            "",
            "{}",
            r#"{"status":"Outage"}"#,
            r#"{"status":"Outage","details":"Burst pipe"}"#,
            r#"{"details":"Burst pipe","eta":"Unknown"}"#,
        ];
        for body in bodies {
            let (status, response) =
                send(&app, put("/api/admin/areas/rosebank", Some(KEY), body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(response, json!({ "error": "Missing data" }));
        }

        assert_eq!(snapshot(&pool).await, before);
    }

    #[tokio::test]
    async fn test_update_unknown_area_is_not_found() {
        // ---
        let (app, pool) = seeded_app().await;
        let before = snapshot(&pool).await;

        let (status, body) = send(
            &app,
            put("/api/admin/areas/atlantis", Some(KEY), OUTAGE_BODY),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "error": "Area not found" }));
        assert_eq!(snapshot(&pool).await, before);
    }

    #[tokio::test]
    async fn test_storage_failure_is_internal_error() {
        // ---
        let (app, pool) = seeded_app().await;
        sqlx::query("DROP TABLE areas").execute(&pool).await.unwrap();

        let (status, body) = send(&app, get("/api/areas")).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "Internal server error" }));

        // the service keeps answering afterwards
        let (status, _) = send(&app, get("/health")).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_reports_store_state() {
        // ---
        let (app, pool) = seeded_app().await;

        let (status, body) = send(&app, get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "ok" }));

        pool.close().await;

        let (status, body) = send(&app, get("/health")).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body, json!({ "status": "unavailable" }));
    }

    #[tokio::test]
    async fn test_cors_allows_any_origin() {
        // ---
        let (app, _pool) = seeded_app().await;

        let request = Request::builder()
            .uri("/api/areas")
            .header("origin", "http://example.org")
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(
            response.headers()["access-control-allow-origin"],
            "*"
        );

        let preflight = Request::builder()
            .method("OPTIONS")
            .uri("/api/admin/areas/rosebank")
            .header("origin", "http://example.org")
            .header("access-control-request-method", "PUT")
            .header("access-control-request-headers", "x-admin-key,content-type")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(preflight).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()["access-control-allow-origin"],
            "*"
        );
    }
}
