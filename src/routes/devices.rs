use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, FromRequest, Multipart, Path, Request, State},
    http::{header::CONTENT_TYPE, StatusCode},
    routing::{get, patch, post},
    Form, Json, Router,
};
use uuid::Uuid;

use super::json_body;
use crate::clients::UploadedFile;
use crate::error::{ApiError, AppError};
use crate::models::device::{
    BackgroundUpdateResponse, Device, DeviceEnvelope, RegisterDeviceRequest,
    RemainingCopiesResponse, RollCountRequest, UpdateUrlRequest,
};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/devices", post(register_device).get(list_devices))
        .route(
            "/devices/{device_key}",
            get(get_device).delete(delete_device),
        )
        .route("/devices/{device_key}/background", patch(update_background))
        .route("/devices/{device_key}/url", patch(update_url))
        // same segment name as the routes above; the value is the internal id here
        .route(
            "/devices/{device_key}/remaining-copies",
            get(remaining_copies),
        )
}

#[utoipa::path(
    post,
    path = "/api/devices",
    request_body = RegisterDeviceRequest,
    responses(
        (status = 201, description = "Device registered", body = DeviceEnvelope),
        (status = 400, description = "Missing fields or address not resolvable", body = ApiError),
        (status = 409, description = "Device key already registered", body = ApiError),
        (status = 500, description = "Geocoder or database failure", body = ApiError),
    ),
    tag = "Devices"
)]
pub(crate) async fn register_device(
    State(state): State<AppState>,
    payload: Result<Json<RegisterDeviceRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<DeviceEnvelope>), AppError> {
    let registration = json_body(payload)?.validate()?;
    let device = state.devices.register(registration).await?;
    Ok((
        StatusCode::CREATED,
        Json(DeviceEnvelope::new("Device registered successfully", device)),
    ))
}

#[utoipa::path(
    get,
    path = "/api/devices",
    responses(
        (status = 200, description = "All devices, newest first", body = Vec<Device>),
        (status = 404, description = "No devices registered", body = ApiError),
    ),
    tag = "Devices"
)]
pub(crate) async fn list_devices(
    State(state): State<AppState>,
) -> Result<Json<Vec<Device>>, AppError> {
    Ok(Json(state.devices.list().await?))
}

#[utoipa::path(
    get,
    path = "/api/devices/{device_key}",
    params(("device_key" = String, Path, description = "Device key")),
    responses(
        (status = 200, description = "The device", body = Device),
        (status = 404, description = "Device not found", body = ApiError),
    ),
    tag = "Devices"
)]
pub(crate) async fn get_device(
    State(state): State<AppState>,
    Path(device_key): Path<String>,
) -> Result<Json<Device>, AppError> {
    Ok(Json(state.devices.get(&device_key).await?))
}

#[utoipa::path(
    delete,
    path = "/api/devices/{device_key}",
    params(("device_key" = String, Path, description = "Device key")),
    responses(
        (status = 200, description = "Device deleted", body = DeviceEnvelope),
        (status = 404, description = "Device not found", body = ApiError),
    ),
    tag = "Devices"
)]
pub(crate) async fn delete_device(
    State(state): State<AppState>,
    Path(device_key): Path<String>,
) -> Result<Json<DeviceEnvelope>, AppError> {
    let device = state.devices.delete(&device_key).await?;
    Ok(Json(DeviceEnvelope::new("Device deleted successfully", device)))
}

#[utoipa::path(
    patch,
    path = "/api/devices/{device_key}/background",
    params(("device_key" = String, Path, description = "Device key")),
    request_body(
        content = crate::models::device::BackgroundUpload,
        content_type = "multipart/form-data"
    ),
    responses(
        (status = 200, description = "Background and/or roll count updated", body = BackgroundUpdateResponse),
        (status = 400, description = "Malformed form or roll count", body = ApiError),
        (status = 404, description = "Device not found", body = ApiError),
        (status = 500, description = "Upload or database failure", body = ApiError),
    ),
    tag = "Devices"
)]
pub(crate) async fn update_background(
    State(state): State<AppState>,
    Path(device_key): Path<String>,
    request: Request,
) -> Result<Json<BackgroundUpdateResponse>, AppError> {
    let (file, no_of_rolls) = read_media_form(request).await?;
    let update = state
        .devices
        .update_media(&device_key, file, no_of_rolls)
        .await?;
    Ok(Json(BackgroundUpdateResponse {
        message: "Background image updated successfully".to_string(),
        device: update.device,
        updated_fields: update.updated,
    }))
}

#[utoipa::path(
    patch,
    path = "/api/devices/{device_key}/url",
    params(("device_key" = String, Path, description = "Device key")),
    request_body = UpdateUrlRequest,
    responses(
        (status = 200, description = "Base URL updated", body = DeviceEnvelope),
        (status = 404, description = "Device not found", body = ApiError),
    ),
    tag = "Devices"
)]
pub(crate) async fn update_url(
    State(state): State<AppState>,
    Path(device_key): Path<String>,
    payload: Result<Json<UpdateUrlRequest>, JsonRejection>,
) -> Result<Json<DeviceEnvelope>, AppError> {
    let req = json_body(payload)?;
    let device = state
        .devices
        .update_base_url(&device_key, req.base_url.as_deref())
        .await?;
    Ok(Json(DeviceEnvelope::new("Device updated successfully", device)))
}

#[utoipa::path(
    get,
    path = "/api/devices/{device_key}/remaining-copies",
    params(("device_key" = Uuid, Path, description = "Internal device id (not the device key)")),
    responses(
        (status = 200, description = "Stored roll count", body = RemainingCopiesResponse),
        (status = 400, description = "Malformed id", body = ApiError),
        (status = 404, description = "Device not found", body = ApiError),
    ),
    tag = "Devices"
)]
pub(crate) async fn remaining_copies(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RemainingCopiesResponse>, AppError> {
    let id = Uuid::parse_str(&id).map_err(|_| AppError::validation("Invalid device id"))?;
    let (device, remaining_copies) = state.devices.remaining_copies(id).await?;
    Ok(Json(RemainingCopiesResponse {
        message: "Remaining copies fetched successfully".to_string(),
        device,
        remaining_copies,
    }))
}

fn parse_rolls(text: &str) -> Result<i64, AppError> {
    text.trim()
        .parse()
        .map_err(|_| AppError::validation("no_of_rolls must be an integer"))
}

/// Pulls the optional file and roll count out of a multipart, urlencoded or JSON body.
/// Only an empty body with no recognised content type is a no-op.
async fn read_media_form(
    request: Request,
) -> Result<(Option<UploadedFile>, Option<i64>), AppError> {
    let content_type = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase();

    if content_type.starts_with("application/json") {
        let Json(body) = Json::<RollCountRequest>::from_request(request, &())
            .await
            .map_err(|e| AppError::validation(e.body_text()))?;
        return Ok((None, body.no_of_rolls));
    }
    if content_type.starts_with("application/x-www-form-urlencoded") {
        let Form(body) = Form::<RollCountRequest>::from_request(request, &())
            .await
            .map_err(|e| AppError::validation(e.body_text()))?;
        return Ok((None, body.no_of_rolls));
    }
    if !content_type.starts_with("multipart/form-data") {
        let body = Bytes::from_request(request, &())
            .await
            .map_err(|e| AppError::validation(e.body_text()))?;
        if body.is_empty() {
            return Ok((None, None));
        }
        tracing::warn!(%content_type, "unsupported background update body");
        return Err(AppError::validation(
            "Expected multipart/form-data, urlencoded or JSON body",
        ));
    }

    let mut multipart = Multipart::from_request(request, &())
        .await
        .map_err(|e| AppError::validation(e.body_text()))?;

    let mut file = None;
    let mut no_of_rolls = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(e.body_text()))?
    {
        let name = field.name().map(str::to_string);
        if let Some(file_name) = field.file_name().map(str::to_string) {
            let content_type = field.content_type().map(str::to_string);
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::validation(e.body_text()))?;
            // browsers send an empty part when no file was picked
            if file_name.is_empty() && bytes.is_empty() {
                continue;
            }
            file = Some(UploadedFile {
                file_name,
                content_type,
                bytes,
            });
        } else if name.as_deref() == Some("no_of_rolls") {
            let text = field
                .text()
                .await
                .map_err(|e| AppError::validation(e.body_text()))?;
            no_of_rolls = Some(parse_rolls(&text)?);
        }
    }

    Ok((file, no_of_rolls))
}
