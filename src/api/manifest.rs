use axum::Json;
use serde::Serialize;

const ICON_SVG_DATA_URI: &str = "data:image/svg+xml,%3Csvg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 192 192'%3E%3Crect fill='%232c3e50' width='192' height='192'/%3E%3Ctext y='130' font-size='100' fill='white'%3E👔%3C/text%3E%3C/svg%3E";

#[derive(Debug, Clone, Serialize)]
pub struct ManifestIcon {
    pub src: String,
    pub sizes: String,
    #[serde(rename = "type")]
    pub mime_type: String,
}

/// PWA manifest，讓手機可以把衣櫥加到主畫面
#[derive(Debug, Clone, Serialize)]
pub struct WebAppManifest {
    pub name: String,
    pub short_name: String,
    pub description: String,
    pub start_url: String,
    pub display: String,
    pub background_color: String,
    pub theme_color: String,
    pub icons: Vec<ManifestIcon>,
}

impl Default for WebAppManifest {
    fn default() -> Self {
        Self {
            name: "Wardrobe Manager".to_string(),
            short_name: "Wardrobe".to_string(),
            description: "Personal outfit combination manager".to_string(),
            start_url: "/".to_string(),
            display: "standalone".to_string(),
            background_color: "#f8f9fa".to_string(),
            theme_color: "#2c3e50".to_string(),
            icons: vec![ManifestIcon {
                src: ICON_SVG_DATA_URI.to_string(),
                sizes: "192x192".to_string(),
                mime_type: "image/svg+xml".to_string(),
            }],
        }
    }
}

/// GET /manifest.json
pub async fn serve_manifest() -> Json<WebAppManifest> {
    Json(WebAppManifest::default())
}
