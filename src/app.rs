use crate::handlers;
use crate::state::AppState;
use axum::{
    extract::Request,
    http::{header, HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/submit", post(handlers::submit))
        .route("/questions/:id", get(handlers::get_question))
        .route("/api/writepath/profile", post(handlers::create_profile))
        .route(
            "/api/writepath/profile/:user_id",
            get(handlers::get_profile).put(handlers::update_profile),
        )
        .route("/api/writepath/assess", post(handlers::assess))
        .route("/api/writepath/results/:user_id", get(handlers::get_results))
        .route("/api/writepath/generate-plan", post(handlers::generate_plan))
        .route(
            "/api/writepath/plan/progress",
            get(handlers::get_plan_of_progress).put(handlers::update_plan_progress),
        )
        .route("/api/writepath/plan/:user_id", get(handlers::get_plan))
        .route("/api/writenow/question/:user_id", get(handlers::personalized_question))
        .route("/api/writenow/feedback", post(handlers::feedback))
        .route("/api/writenow/sessions/:user_id", get(handlers::practice_sessions))
        .layer(middleware::from_fn(allow_any_origin))
        .with_state(state)
}

async fn allow_any_origin(request: Request, next: Next) -> Response {
    let mut response = if request.method() == Method::OPTIONS {
        StatusCode::NO_CONTENT.into_response()
    } else {
        next.run(request).await
    };

    let headers = response.headers_mut();
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, PUT, OPTIONS"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("content-type"),
    );
    response
}
