use axum::http::StatusCode;
use sea_orm::DatabaseConnection;

/// Handler for `GET /healthz` — liveness check.
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}

/// Body of `GET /readyz`: 200 when the database answers a ping, 503
/// otherwise. Each service wires this through its own state extractor.
pub async fn db_ready(db: &DatabaseConnection) -> StatusCode {
    match db.ping().await {
        Ok(()) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}
