use crate::api::AppState;
use crate::core::wardrobe::UploadedFile;
use crate::domain::model::{AnalyticsReport, ClothingItem, ClothingType, Combination, WardrobeData};
use crate::utils::error::{Result, WardrobeError};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub module: String,
    pub version: String,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    fn ok() -> Json<Self> {
        Json(Self { success: true })
    }
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    pub items: Vec<ClothingItem>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct CombinationsResponse {
    pub success: bool,
    pub count: usize,
    pub combinations: Vec<Combination>,
}

#[derive(Debug, Serialize)]
pub struct WeeklyResponse {
    pub success: bool,
    pub outfits: Vec<Combination>,
}

#[derive(Debug, Deserialize)]
pub struct RateRequest {
    pub combination_id: Option<String>,
    pub liked: Option<bool>,
}

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        module: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// GET /api/data
pub async fn get_data(State(state): State<AppState>) -> Result<Json<WardrobeData>> {
    Ok(Json(state.service.load().await?))
}

/// POST /api/upload/:clothing_type
///
/// multipart 欄位 `files` 可重複出現，每個都是一張圖片
pub async fn upload_clothing(
    State(state): State<AppState>,
    Path(clothing_type): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    let kind: ClothingType = clothing_type.parse()?;

    let mut files = Vec::new();
    let mut saw_files_field = false;
    while let Some(field) = multipart.next_field().await.map_err(upload_error)? {
        if field.name() != Some("files") {
            continue;
        }
        saw_files_field = true;

        let file_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await.map_err(upload_error)?;
        files.push(UploadedFile {
            file_name,
            bytes: bytes.to_vec(),
        });
    }

    if !saw_files_field {
        return Err(WardrobeError::UploadError {
            message: "No files provided".to_string(),
        });
    }

    let outcome = state.service.upload(kind, files).await?;
    Ok(Json(UploadResponse {
        success: true,
        items: outcome.items,
        total: outcome.total,
    }))
}

fn upload_error(e: axum::extract::multipart::MultipartError) -> WardrobeError {
    if e.status() == axum::http::StatusCode::PAYLOAD_TOO_LARGE {
        WardrobeError::PayloadTooLarge {
            message: e.body_text(),
        }
    } else {
        WardrobeError::UploadError {
            message: e.body_text(),
        }
    }
}

/// DELETE /api/remove/:clothing_type/:item_id
pub async fn remove_clothing(
    State(state): State<AppState>,
    Path((clothing_type, item_id)): Path<(String, String)>,
) -> Result<Json<SuccessResponse>> {
    let kind: ClothingType = clothing_type.parse()?;
    state.service.remove(kind, &item_id).await?;
    Ok(SuccessResponse::ok())
}

/// DELETE /api/clear/:clothing_type
pub async fn clear_clothing(
    State(state): State<AppState>,
    Path(clothing_type): Path<String>,
) -> Result<Json<SuccessResponse>> {
    let kind: ClothingType = clothing_type.parse()?;
    state.service.clear(kind).await?;
    Ok(SuccessResponse::ok())
}

/// POST /api/generate_combinations
pub async fn generate_combinations(
    State(state): State<AppState>,
) -> Result<Json<CombinationsResponse>> {
    let combinations = state.service.generate_combinations().await?;
    Ok(Json(CombinationsResponse {
        success: true,
        count: combinations.len(),
        combinations,
    }))
}

/// POST /api/rate
pub async fn rate_combination(
    State(state): State<AppState>,
    payload: std::result::Result<Json<RateRequest>, JsonRejection>,
) -> Result<Json<SuccessResponse>> {
    let invalid = || WardrobeError::ValidationError {
        message: "Invalid data".to_string(),
    };

    let Json(request) = payload.map_err(|_| invalid())?;
    let (Some(combination_id), Some(liked)) = (request.combination_id, request.liked) else {
        return Err(invalid());
    };

    state.service.rate(&combination_id, liked).await?;
    Ok(SuccessResponse::ok())
}

/// POST /api/generate_weekly
pub async fn generate_weekly(State(state): State<AppState>) -> Result<Json<WeeklyResponse>> {
    let plan = state.service.generate_weekly().await?;
    Ok(Json(WeeklyResponse {
        success: true,
        outfits: plan.into_outfits(),
    }))
}

/// GET /api/analytics
pub async fn get_analytics(State(state): State<AppState>) -> Result<Json<AnalyticsReport>> {
    Ok(Json(state.service.analytics().await?))
}
