use crate::core::planner::PlannerConfig;
use crate::utils::error::Result;

/// 以相對路徑存取位元組的儲存後端 (資料檔與上傳圖片都經由這裡)
pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    fn delete_file(&self, path: &str) -> impl std::future::Future<Output = Result<()>> + Send;
    fn exists(&self, path: &str) -> impl std::future::Future<Output = bool> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn bind_address(&self) -> String;
    fn data_dir(&self) -> &str;
    fn data_file(&self) -> &str;
    fn static_dir(&self) -> &str;
    fn max_upload_bytes(&self) -> usize;
    fn planner(&self) -> PlannerConfig;
}
