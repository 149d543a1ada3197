use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::JsonRejection,
        DefaultBodyLimit, Multipart, State,
    },
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use shared::{
    error::{ApiError, ErrorCode},
    protocol::{
        AddBackgroundRequest, ImageResponse, ADD_BACKGROUND_ROUTE, IMAGE_FIELD,
        REMOVE_BACKGROUND_ROUTE,
    },
};
use tower_http::cors::CorsLayer;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod api;
mod app_state;
mod compose;
mod config;
mod removal;

use api::{ApiContext, ImageUpload};
use app_state::AppState;
use config::load_settings;
use removal::BorderKeyRemover;

type HttpResult = Result<Json<ImageResponse>, (StatusCode, Json<ImageResponse>)>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = load_settings();
    let remover = BorderKeyRemover::new(settings.key_tolerance, settings.key_feather);
    let api = ApiContext {
        remover: Arc::new(remover),
        max_upload_bytes: settings.max_upload_bytes,
    };
    let app = build_router(Arc::new(AppState { api }), settings.body_limit_bytes());

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(
        %addr,
        max_upload_bytes = settings.max_upload_bytes,
        tolerance = remover.tolerance,
        feather = remover.feather,
        "server listening"
    );
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>, body_limit: usize) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route(REMOVE_BACKGROUND_ROUTE, post(http_remove_background))
        .route(ADD_BACKGROUND_ROUTE, post(http_add_background))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn http_remove_background(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> HttpResult {
    let multipart = multipart.map_err(|_| failure(ApiError::validation("No image provided")))?;
    let upload = read_image_field(multipart).await.map_err(|e| {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            failure(api::too_large(state.api.max_upload_bytes))
        } else {
            failure(ApiError::validation(e.body_text()))
        }
    })?;
    if let Some(upload) = &upload {
        info!(
            filename = upload.filename.as_deref().unwrap_or_default(),
            size_bytes = upload.bytes.len(),
            "remove-background request"
        );
    }

    let ctx = state.api.clone();
    let image = tokio::task::spawn_blocking(move || api::remove_background(&ctx, upload))
        .await
        .map_err(|e| failure(ApiError::internal(e.to_string())))?
        .map_err(failure)?;
    Ok(Json(ImageResponse::ok(image)))
}

async fn http_add_background(
    payload: Result<Json<AddBackgroundRequest>, JsonRejection>,
) -> HttpResult {
    let Json(request) = payload.map_err(|e| failure(ApiError::validation(e.body_text())))?;
    info!(
        color = request.background_color.as_deref().unwrap_or_default(),
        has_image = request.background_image.is_some(),
        "add-background request"
    );

    let image = tokio::task::spawn_blocking(move || api::add_background(&request))
        .await
        .map_err(|e| failure(ApiError::internal(e.to_string())))?
        .map_err(failure)?;
    Ok(Json(ImageResponse::ok(image)))
}

/// First `image` field of the form; other fields are skipped.
async fn read_image_field(mut multipart: Multipart) -> Result<Option<ImageUpload>, MultipartError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }
        let filename = field.file_name().map(str::to_string);
        let bytes = field.bytes().await?;
        return Ok(Some(ImageUpload {
            filename,
            bytes: bytes.to_vec(),
        }));
    }
    Ok(None)
}

fn failure(err: ApiError) -> (StatusCode, Json<ImageResponse>) {
    let status = match err.code {
        ErrorCode::Validation => {
            warn!(message = %err.message, "rejected image request");
            StatusCode::BAD_REQUEST
        }
        ErrorCode::Internal => {
            error!(message = %err.message, "image request failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, Json(ImageResponse::failure(err.message)))
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
