//! Mock data service: the REST contract over the local database.
//!
//! ```text
//! GET    /notes            GET    /meetings
//! POST   /notes            POST   /meetings
//! PUT    /notes/{id}       PUT    /meetings/{id}
//! DELETE /notes/{id}       DELETE /meetings/{id}
//! ```

mod error;
mod meetings;
mod notes;

pub use error::ApiError;

use agenda_core::Database;
use axum::routing::{get, put};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub fn create_router(db: Database) -> Router {
    Router::new()
        .route("/notes", get(notes::list).post(notes::create))
        .route("/notes/{id}", put(notes::update).delete(notes::delete))
        .route("/meetings", get(meetings::list).post(meetings::create))
        .route(
            "/meetings/{id}",
            put(meetings::update).delete(meetings::delete),
        )
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(db)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use tower::ServiceExt;

    fn router() -> Router {
        let db = Database::open_memory().unwrap();
        db.migrate().unwrap();
        create_router(db)
    }

    #[tokio::test]
    async fn list_allows_any_origin() {
        let request = Request::builder()
            .uri("/notes")
            .header(header::ORIGIN, "http://localhost:5173")
            .body(Body::empty())
            .unwrap();

        let response = router().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "*"
        );
    }

    #[tokio::test]
    async fn preflight_for_updates_is_answered() {
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/meetings/m1")
            .header(header::ORIGIN, "http://localhost:5173")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "PUT")
            .body(Body::empty())
            .unwrap();

        let response = router().oneshot(request).await.unwrap();

        assert!(response.status().is_success());
        assert!(response
            .headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_METHODS));
    }

    #[tokio::test]
    async fn unknown_collection_is_not_found() {
        let request = Request::builder()
            .uri("/agendas")
            .body(Body::empty())
            .unwrap();

        let response = router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
