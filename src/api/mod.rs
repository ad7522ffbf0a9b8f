//! HTTP 介面
//!
//! 路由對應衣櫥服務的每個操作，另外提供上傳圖片與前端頁面的靜態檔案服務、
//! PWA manifest 以及健康檢查。

use crate::config::cli::LocalStorage;
use crate::core::wardrobe::{WardrobeService, UPLOAD_DIR};
use crate::utils::error::WardrobeError;
use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

pub mod handlers;
pub mod manifest;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<WardrobeService<LocalStorage>>,
    pub static_dir: PathBuf,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(
        service: WardrobeService<LocalStorage>,
        static_dir: impl Into<PathBuf>,
        max_upload_bytes: usize,
    ) -> Self {
        Self {
            service: Arc::new(service),
            static_dir: static_dir.into(),
            max_upload_bytes,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let uploads_dir = state.service.storage().full_path(UPLOAD_DIR);
    let index = ServeFile::new(state.static_dir.join("index.html"));
    let body_limit = state.max_upload_bytes;

    Router::new()
        .route_service("/", index)
        .route("/manifest.json", get(manifest::serve_manifest))
        .route("/health", get(handlers::health_check))
        .route("/api/data", get(handlers::get_data))
        .route("/api/upload/:clothing_type", post(handlers::upload_clothing))
        .route(
            "/api/remove/:clothing_type/:item_id",
            delete(handlers::remove_clothing),
        )
        .route("/api/clear/:clothing_type", delete(handlers::clear_clothing))
        .route(
            "/api/generate_combinations",
            post(handlers::generate_combinations),
        )
        .route("/api/rate", post(handlers::rate_combination))
        .route("/api/generate_weekly", post(handlers::generate_weekly))
        .route("/api/analytics", get(handlers::get_analytics))
        .nest_service("/static/uploads", ServeDir::new(uploads_dir))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for WardrobeError {
    fn into_response(self) -> Response {
        // 規劃找不到解屬於伺服器端無法完成，其餘輸入問題回 400
        let status = match &self {
            WardrobeError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            e if e.is_client_error() => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!(
                "❌ Request failed: {} (Category: {:?}, Severity: {:?})",
                self,
                self.category(),
                self.severity()
            );
        } else {
            tracing::debug!("Rejected request: {}", self);
        }

        let body = ErrorBody {
            error: self.user_friendly_message(),
        };
        (status, Json(body)).into_response()
    }
}
