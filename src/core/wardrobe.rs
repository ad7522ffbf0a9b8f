use crate::core::analytics::analyze;
use crate::core::combinations::generate_combinations;
use crate::core::planner::{liked_combinations, PlannerConfig, WeeklyPlanner};
use crate::domain::model::{
    AnalyticsReport, ClothingItem, ClothingType, Combination, WardrobeData, WeeklyPlan,
};
use crate::domain::ports::Storage;
use crate::utils::error::{Result, WardrobeError};
use crate::utils::validation::{secure_filename, validate_image_filename};
use rand::Rng;
use std::io::ErrorKind;
use tokio::sync::Mutex;

/// 上傳圖片存放的子目錄 (相對於資料目錄)
pub const UPLOAD_DIR: &str = "uploads";
pub const UPLOAD_URL_PREFIX: &str = "/static/uploads";

/// 一個待儲存的上傳檔案
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct UploadOutcome {
    pub items: Vec<ClothingItem>,
    pub total: usize,
}

/// 衣櫥服務：透過 `Storage` 讀寫資料快照，呼叫純計算元件後再寫回
pub struct WardrobeService<S: Storage> {
    storage: S,
    data_file: String,
    planner: PlannerConfig,
    // 讀-改-寫 期間持有，避免同時請求互相覆蓋
    write_lock: Mutex<()>,
}

impl<S: Storage> WardrobeService<S> {
    pub fn new(storage: S, data_file: impl Into<String>, planner: PlannerConfig) -> Self {
        Self {
            storage,
            data_file: data_file.into(),
            planner,
            write_lock: Mutex::new(()),
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// 資料檔不存在或無法解析時回傳空白資料；其他讀取錯誤往上回報，
    /// 避免後續寫入把空白資料蓋到原本的檔案上
    pub async fn load(&self) -> Result<WardrobeData> {
        if !self.storage.exists(&self.data_file).await {
            return Ok(WardrobeData::default());
        }

        let bytes = match self.storage.read_file(&self.data_file).await {
            Ok(bytes) => bytes,
            Err(WardrobeError::IoError(e)) if e.kind() == ErrorKind::NotFound => {
                return Ok(WardrobeData::default());
            }
            Err(e) => {
                tracing::error!("❌ Could not read {}: {}", self.data_file, e);
                return Err(e);
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(data) => Ok(data),
            Err(e) => {
                tracing::warn!("⚠️ {} is not valid wardrobe data: {}", self.data_file, e);
                Ok(WardrobeData::default())
            }
        }
    }

    pub async fn save(&self, data: &WardrobeData) -> Result<()> {
        let json = serde_json::to_vec_pretty(data)?;
        self.storage.write_file(&self.data_file, &json).await?;
        tracing::debug!("Saved wardrobe data ({} bytes)", json.len());
        Ok(())
    }

    pub async fn upload(&self, kind: ClothingType, files: Vec<UploadedFile>) -> Result<UploadOutcome> {
        if files.is_empty() || files.iter().all(|f| f.file_name.is_empty()) {
            return Err(WardrobeError::UploadError {
                message: "No files selected".to_string(),
            });
        }

        let _guard = self.write_lock.lock().await;
        let mut data = self.load().await?;
        let mut uploaded = Vec::new();

        for file in files {
            if let Err(e) = validate_image_filename(&file.file_name) {
                tracing::warn!("Skipping {}: {}", file.file_name, e);
                continue;
            }

            let item = match self.store_image(&data, kind, &file).await {
                Ok(item) => item,
                Err(e) => {
                    tracing::warn!("Error saving file {}: {}", file.file_name, e);
                    continue;
                }
            };

            data.items_mut(kind).push(item.clone());
            uploaded.push(item);
        }

        if uploaded.is_empty() {
            return Err(WardrobeError::UploadError {
                message: "No valid files could be uploaded".to_string(),
            });
        }

        self.save(&data).await?;
        let total = data.items(kind).len();
        tracing::info!("📤 Uploaded {} {} (total {})", uploaded.len(), kind, total);

        Ok(UploadOutcome {
            items: uploaded,
            total,
        })
    }

    async fn store_image(
        &self,
        data: &WardrobeData,
        kind: ClothingType,
        file: &UploadedFile,
    ) -> Result<ClothingItem> {
        let mut filename = secure_filename(&file.file_name);
        if filename.is_empty() {
            filename = format!("image_{}.jpg", rand::rng().random_range(1000..=9999));
        }

        let timestamp = chrono::Utc::now().timestamp_millis();
        let mut unique_filename = format!("{}_{}", timestamp, filename);
        let mut path = format!("{}/{}", UPLOAD_DIR, unique_filename);
        // 同一毫秒內上傳同名檔案
        while self.storage.exists(&path).await {
            let salt: u16 = rand::rng().random_range(1000..=9999);
            unique_filename = format!("{}_{}_{}", timestamp, salt, filename);
            path = format!("{}/{}", UPLOAD_DIR, unique_filename);
        }

        self.storage.write_file(&path, &file.bytes).await?;
        if !self.storage.exists(&path).await {
            return Err(WardrobeError::UploadError {
                message: format!("{} was not written", path),
            });
        }

        Ok(ClothingItem {
            id: unique_item_id(data.items(kind), timestamp),
            url: format!("{}/{}", UPLOAD_URL_PREFIX, unique_filename),
            filename: unique_filename,
            original_name: file.file_name.clone(),
        })
    }

    /// 不存在的 id 視為成功
    pub async fn remove(&self, kind: ClothingType, item_id: &str) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut data = self.load().await?;

        let items = data.items_mut(kind);
        if let Some(pos) = items.iter().position(|item| item.id == item_id) {
            let removed = items.remove(pos);
            self.delete_image(&removed).await;
            tracing::info!("🗑️ Removed {} {}", kind, item_id);
        }

        self.save(&data).await
    }

    pub async fn clear(&self, kind: ClothingType) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut data = self.load().await?;

        let removed = std::mem::take(data.items_mut(kind));
        for item in &removed {
            self.delete_image(item).await;
        }
        tracing::info!("🗑️ Cleared {} {}", removed.len(), kind);

        self.save(&data).await
    }

    async fn delete_image(&self, item: &ClothingItem) {
        let path = format!("{}/{}", UPLOAD_DIR, item.filename);
        if let Err(e) = self.storage.delete_file(&path).await {
            tracing::warn!("Could not delete {}: {}", path, e);
        }
    }

    /// 重新產生全部組合並取代舊的組合清單 (偏好紀錄保留)
    pub async fn generate_combinations(&self) -> Result<Vec<Combination>> {
        let _guard = self.write_lock.lock().await;
        let mut data = self.load().await?;

        let combinations = generate_combinations(&data.shirts, &data.pants)?;
        data.combinations = combinations.clone();
        self.save(&data).await?;

        tracing::info!("👕 Generated {} combinations", combinations.len());
        Ok(combinations)
    }

    pub async fn rate(&self, combination_id: &str, liked: bool) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut data = self.load().await?;

        data.preferences.insert(combination_id.to_string(), liked);
        self.save(&data).await?;

        tracing::debug!("Rated {} as {}", combination_id, if liked { "liked" } else { "disliked" });
        Ok(())
    }

    pub async fn generate_weekly(&self) -> Result<WeeklyPlan> {
        let _guard = self.write_lock.lock().await;
        let mut data = self.load().await?;

        let liked = liked_combinations(&data.combinations, &data.preferences);
        tracing::debug!("Planning week from {} liked combinations", liked.len());

        // 搜尋是純 CPU 計算，移到 blocking 執行緒避免卡住 runtime
        let planner_config = self.planner;
        let plan = tokio::task::spawn_blocking(move || {
            WeeklyPlanner::new(planner_config).plan(&liked)
        })
        .await
        .map_err(|e| WardrobeError::TaskError {
            message: e.to_string(),
        })??;

        data.weekly_outfits = plan.outfits().to_vec();
        self.save(&data).await?;

        Ok(plan)
    }

    pub async fn analytics(&self) -> Result<AnalyticsReport> {
        let data = self.load().await?;
        Ok(analyze(&data.shirts, &data.pants, &data.preferences))
    }
}

/// `<millis>_<4 位亂數>`，與同類別現有 id 衝突時重抽
fn unique_item_id(existing: &[ClothingItem], timestamp: i64) -> String {
    let mut rng = rand::rng();
    loop {
        let id = format!("{}_{}", timestamp, rng.random_range(1000..=9999));
        if !existing.iter().any(|item| item.id == id) {
            return id;
        }
    }
}
