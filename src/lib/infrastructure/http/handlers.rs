//! API handler modules

use std::any::Any;

use axum::{
    body::Body,
    http::{Response, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use tracing::error;
use utoipa::OpenApi;

use crate::domain::reminders::ReminderService;

use super::{
    errors::{ErrorResponse, SEND_FAILED},
    open_api::ApiDocs,
    state::AppState,
};

pub mod send_email;
pub mod uptime;

/// Routes served under `/api`
pub fn router<R: ReminderService>() -> Router<AppState<R>> {
    Router::new()
        .route("/openapi.json", get(Json(ApiDocs::openapi())))
        .route(
            "/send-email",
            post(send_email::handler::<R>).fallback(send_email::method_not_allowed),
        )
        .route("/uptime", get(uptime::handler::<R>))
}

/// Catch panics and return a generic 500 error, logging the panic message
pub fn panic_handler(err: Box<dyn Any + Send + 'static>) -> Response<Body> {
    let details = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Internal server error".to_string()
    };

    error!(panic = %details, "handler panicked");

    let error = ErrorResponse {
        error: SEND_FAILED.to_string(),
    };

    (StatusCode::INTERNAL_SERVER_ERROR, Json(error)).into_response()
}

#[cfg(test)]
mod tests {
    use std::panic::{self, AssertUnwindSafe};

    use axum::body::to_bytes;
    use testresult::TestResult;

    use super::*;

    #[tokio::test]
    async fn test_panic_handler() -> TestResult {
        let panic_info = simulate_panic();
        let response = panic_handler(panic_info);

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = to_bytes(response.into_body(), usize::MAX).await?;
        let json = serde_json::from_slice::<serde_json::Value>(&body)?;

        assert_eq!(json, serde_json::json!({ "error": SEND_FAILED }));

        Ok(())
    }

    fn simulate_panic() -> Box<dyn std::any::Any + Send + 'static> {
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            panic!("Something went wrong");
        }));

        if let Err(err) = result {
            err
        } else {
            panic!("The panic did not occur as expected");
        }
    }
}
