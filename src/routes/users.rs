use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use uuid::Uuid;

use super::{json_body, optional_json_body};
use crate::error::{ApiError, AppError};
use crate::models::journey::{
    JourneyEnvelope, SelectFrameRequest, SelectNumberRequest, StartJourneyRequest,
};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users/start", post(start_journey))
        .route("/users/{user_id}/select-frame", post(select_frame))
        .route("/users/{user_id}/select-number", post(select_number))
}

fn journey_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::validation("Invalid user id"))
}

#[utoipa::path(
    post,
    path = "/api/users/start",
    request_body = StartJourneyRequest,
    responses(
        (status = 201, description = "Journey started", body = JourneyEnvelope),
        (status = 404, description = "Device not found", body = ApiError),
    ),
    tag = "Users"
)]
pub(crate) async fn start_journey(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<JourneyEnvelope>), AppError> {
    let req: StartJourneyRequest = optional_json_body(&body)?;
    let journey = state.journeys.start(req.device_key.as_deref()).await?;
    Ok((
        StatusCode::CREATED,
        Json(JourneyEnvelope::new("User journey started", journey)),
    ))
}

#[utoipa::path(
    post,
    path = "/api/users/{user_id}/select-frame",
    params(("user_id" = Uuid, Path, description = "Journey id returned by start")),
    request_body = SelectFrameRequest,
    responses(
        (status = 200, description = "Frame recorded", body = JourneyEnvelope),
        (status = 400, description = "Missing frame", body = ApiError),
        (status = 404, description = "Journey not found", body = ApiError),
    ),
    tag = "Users"
)]
pub(crate) async fn select_frame(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    payload: Result<Json<SelectFrameRequest>, JsonRejection>,
) -> Result<Json<JourneyEnvelope>, AppError> {
    let id = journey_id(&user_id)?;
    let req = json_body(payload)?;
    let journey = state.journeys.select_frame(id, req.frame.as_deref()).await?;
    Ok(Json(JourneyEnvelope::new("Frame selected successfully", journey)))
}

#[utoipa::path(
    post,
    path = "/api/users/{user_id}/select-number",
    params(("user_id" = Uuid, Path, description = "Journey id returned by start")),
    request_body = SelectNumberRequest,
    responses(
        (status = 201, description = "Copy count recorded", body = JourneyEnvelope),
        (status = 400, description = "Copy count missing or below 1", body = ApiError),
        (status = 404, description = "Journey not found", body = ApiError),
    ),
    tag = "Users"
)]
pub(crate) async fn select_number(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    payload: Result<Json<SelectNumberRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<JourneyEnvelope>), AppError> {
    let id = journey_id(&user_id)?;
    let req = json_body(payload)?;
    let journey = state.journeys.select_number(id, req.no_of_copies).await?;
    Ok((
        StatusCode::CREATED,
        Json(JourneyEnvelope::new("Number of copies saved successfully", journey)),
    ))
}
