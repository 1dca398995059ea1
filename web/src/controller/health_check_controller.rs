use axum::http::StatusCode;
use axum::response::IntoResponse;

/// GET whether the API is up
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "API router is up and responding to requests", body = String),
    )
)]
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "healthy")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn health_check_answers_healthy() {
        let response = health_check().await.into_response();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
