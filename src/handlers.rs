use crate::catalog::{DEFAULT_QUESTION_ID, DEFAULT_QUESTION_TEXT};
use crate::errors::AppError;
use crate::models::{AnalyzeRequest, Question, SubmitRequest};
use crate::render::render_practice_page;
use crate::state::AppState;
use crate::upstream::{endpoints, Endpoint, Relayed};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::Html,
    Json,
};
use serde_json::Value;
use tracing::{debug, error};

pub async fn index() -> Html<String> {
    Html(render_practice_page(DEFAULT_QUESTION_ID, DEFAULT_QUESTION_TEXT, None))
}

pub async fn submit(
    State(state): State<AppState>,
    payload: Result<Json<SubmitRequest>, JsonRejection>,
) -> Result<Relayed, AppError> {
    // An unreadable body is treated like an empty one.
    let payload = payload
        .map(|Json(payload)| payload)
        .unwrap_or_else(|rejection| {
            debug!("unreadable submit body: {}", rejection.body_text());
            SubmitRequest::default()
        });
    let answer = payload.answer.filter(|answer| !answer.is_empty());
    let question_id = payload.question_id.and_then(|id| lookup_key(&id).map(|key| (id, key)));
    let (Some(answer), Some((question_id, key))) = (answer, question_id) else {
        return Err(AppError::bad_request("Answer and question ID are required"));
    };

    let body = AnalyzeRequest {
        user_answer: answer,
        reference_answer: state.catalog.reference_answer(&key).to_string(),
        question_id,
    };
    let body = serde_json::to_value(body)
        .map_err(|err| AppError::upstream(endpoints::ANALYZE.failure, err))?;

    relay(&state, &endpoints::ANALYZE, None, Some(&body)).await
}

pub async fn get_question(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Question>, AppError> {
    state
        .catalog
        .question(&id)
        .map(Json)
        .ok_or_else(|| AppError::not_found("Question not found"))
}

pub async fn create_profile(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Relayed, AppError> {
    let Json(body) = body?;
    relay(&state, &endpoints::CREATE_PROFILE, None, Some(&body)).await
}

pub async fn get_profile(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Relayed, AppError> {
    relay(&state, &endpoints::GET_PROFILE, Some(&user_id), None).await
}

pub async fn update_profile(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Relayed, AppError> {
    let Json(body) = body?;
    relay(&state, &endpoints::UPDATE_PROFILE, Some(&user_id), Some(&body)).await
}

pub async fn assess(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Relayed, AppError> {
    let Json(body) = body?;
    relay(&state, &endpoints::ASSESS, None, Some(&body)).await
}

pub async fn get_results(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Relayed, AppError> {
    relay(&state, &endpoints::RESULTS, Some(&user_id), None).await
}

pub async fn generate_plan(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Relayed, AppError> {
    let Json(body) = body?;
    relay(&state, &endpoints::GENERATE_PLAN, None, Some(&body)).await
}

pub async fn get_plan(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Relayed, AppError> {
    relay(&state, &endpoints::GET_PLAN, Some(&user_id), None).await
}

// The static `progress` route shadows `:user_id`; a GET there still reads
// the plan of a user literally named "progress".
pub async fn get_plan_of_progress(State(state): State<AppState>) -> Result<Relayed, AppError> {
    relay(&state, &endpoints::GET_PLAN, Some("progress"), None).await
}

pub async fn update_plan_progress(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Relayed, AppError> {
    let Json(body) = body?;
    relay(&state, &endpoints::PLAN_PROGRESS, None, Some(&body)).await
}

pub async fn personalized_question(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Relayed, AppError> {
    relay(&state, &endpoints::PERSONALIZED_QUESTION, Some(&user_id), None).await
}

pub async fn feedback(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Relayed, AppError> {
    let Json(body) = body?;
    relay(&state, &endpoints::FEEDBACK, None, Some(&body)).await
}

pub async fn practice_sessions(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Relayed, AppError> {
    relay(&state, &endpoints::SESSIONS, Some(&user_id), None).await
}

async fn relay(
    state: &AppState,
    endpoint: &Endpoint,
    user_id: Option<&str>,
    body: Option<&Value>,
) -> Result<Relayed, AppError> {
    state
        .upstream
        .forward(endpoint, user_id, body)
        .await
        .map_err(|err| {
            error!(path = endpoint.template, "{}: {err}", endpoint.failure);
            AppError::upstream(endpoint.failure, err)
        })
}

fn lookup_key(id: &Value) -> Option<String> {
    match id {
        Value::String(text) if !text.is_empty() => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}
