//! Superhero HTTP routes.
//!
//! | Operation | Method/Path |
//! |---|---|
//! | list | GET /superheroes |
//! | create | POST /superheroes |
//! | listDeleted | GET /superheroes/deleted |
//! | get | GET /superheroes/:id |
//! | edit | GET /superheroes/:id/edit |
//! | update | PUT /superheroes/:id |
//! | softDelete | DELETE /superheroes/:id |
//! | restore | POST /superheroes/:id/restore |
//! | photo | GET /superheroes/:id/photo |

use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartError, DefaultBodyLimit, Multipart, Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use log::info;
use serde::Serialize;
use superhero_core::{core_version, PhotoUpload, Superhero, SuperheroId, SuperheroInput};

use crate::error::ApiError;
use crate::state::{with_service, AppState};

/// Request body ceiling; larger than the photo limit so that oversized
/// photos are reported by validation.
pub const MAX_BODY_BYTES: usize = 8 * 1024 * 1024;

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

#[derive(Debug, Serialize)]
pub struct SuperheroesListResponse {
    pub superheroes: Vec<Superhero>,
    pub total: usize,
}

impl From<Vec<Superhero>> for SuperheroesListResponse {
    fn from(superheroes: Vec<Superhero>) -> Self {
        Self {
            total: superheroes.len(),
            superheroes,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
    pub superhero: Superhero,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Create superhero routes plus `/health`.
pub fn superhero_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/superheroes", get(list_handler).post(create_handler))
        .route("/superheroes/deleted", get(list_deleted_handler))
        .route(
            "/superheroes/:id",
            get(show_handler).put(update_handler).delete(destroy_handler),
        )
        .route("/superheroes/:id/edit", get(edit_handler))
        .route("/superheroes/:id/restore", post(restore_handler))
        .route("/superheroes/:id/photo", get(photo_handler))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: core_version(),
    })
}

async fn list_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SuperheroesListResponse>, ApiError> {
    let superheroes = with_service(state, |service| service.list()).await?;
    Ok(Json(superheroes.into()))
}

async fn list_deleted_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SuperheroesListResponse>, ApiError> {
    let superheroes = with_service(state, |service| service.list_deleted()).await?;
    Ok(Json(superheroes.into()))
}

async fn create_handler(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let input = read_form(multipart).await?;
    let superhero = with_service(state, move |service| service.create(input)).await?;
    info!("event=http_create module=http status=ok id={}", superhero.id);

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "Superhero created successfully.",
            superhero,
        }),
    ))
}

async fn show_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<SuperheroId>,
) -> Result<Json<Superhero>, ApiError> {
    let superhero = with_service(state, move |service| service.get(id)).await?;
    Ok(Json(superhero))
}

async fn edit_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<SuperheroId>,
) -> Result<Json<Superhero>, ApiError> {
    let superhero = with_service(state, move |service| service.edit(id)).await?;
    Ok(Json(superhero))
}

async fn update_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<SuperheroId>,
    multipart: Multipart,
) -> Result<Json<MessageResponse>, ApiError> {
    let input = read_form(multipart).await?;
    let superhero = with_service(state, move |service| service.update(id, input)).await?;

    Ok(Json(MessageResponse {
        message: "Superhero updated successfully.",
        superhero,
    }))
}

async fn destroy_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<SuperheroId>,
) -> Result<Json<MessageResponse>, ApiError> {
    let superhero = with_service(state, move |service| service.soft_delete(id)).await?;

    Ok(Json(MessageResponse {
        message: "Superhero deleted successfully (soft delete).",
        superhero,
    }))
}

async fn restore_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<SuperheroId>,
) -> Result<Json<MessageResponse>, ApiError> {
    let superhero = with_service(state, move |service| service.restore(id)).await?;

    Ok(Json(MessageResponse {
        message: "Superhero restored successfully.",
        superhero,
    }))
}

async fn photo_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<SuperheroId>,
) -> Result<impl IntoResponse, ApiError> {
    let photo = with_service(state, move |service| service.photo(id)).await?;
    Ok(([(header::CONTENT_TYPE, photo.content_type)], photo.bytes))
}

/// Reads `real_name`, `hero_name`, `additional_info` and `photo` parts.
///
/// An empty file part without a file name (an untouched file input) counts
/// as no photo. Unknown parts are ignored.
async fn read_form(mut multipart: Multipart) -> Result<SuperheroInput, ApiError> {
    let mut input = SuperheroInput::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(multipart_error)?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "real_name" | "hero_name" | "additional_info" => {
                let value = field
                    .text()
                    .await
                    .map_err(multipart_error)?;
                match name.as_str() {
                    "real_name" => input.real_name = Some(value),
                    "hero_name" => input.hero_name = Some(value),
                    _ => input.additional_info = Some(value),
                }
            }
            "photo" => {
                let file_name = field
                    .file_name()
                    .filter(|file_name| !file_name.is_empty())
                    .map(str::to_string);
                let content_type = field
                    .content_type()
                    .unwrap_or(FALLBACK_CONTENT_TYPE)
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(multipart_error)?;

                if bytes.is_empty() && file_name.is_none() {
                    continue;
                }
                let upload = PhotoUpload::new(bytes.to_vec(), content_type);
                input.photo = Some(match file_name {
                    Some(file_name) => upload.with_file_name(file_name),
                    None => upload,
                });
            }
            _ => {}
        }
    }

    Ok(input)
}

/// Keeps the multipart status: 413 past the body limit, 400 when malformed.
fn multipart_error(err: MultipartError) -> ApiError {
    ApiError::new(err.status(), err.body_text())
}
