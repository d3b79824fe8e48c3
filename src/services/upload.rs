use std::sync::Arc;
use tracing::{debug, error, info};

use crate::api::StorageApi;
use crate::core::models::{SourceFile, UploadTarget};
use crate::error::UploadError;
use crate::utils::id::generate_default_id;
use crate::utils::text::extension_of;

/// 文件上传服务：签名地址 + 直传，不做重试
pub struct UploadClient {
    storage: Arc<dyn StorageApi>,
    cdn_origin: String,
}

impl UploadClient {
    pub fn new(storage: Arc<dyn StorageApi>, cdn_origin: impl Into<String>) -> Self {
        Self {
            storage,
            cdn_origin: cdn_origin.into().trim_end_matches('/').to_string(),
        }
    }

    /// 上传文件并返回公开访问地址
    pub async fn upload(&self, file: &SourceFile) -> Result<String, UploadError> {
        let file_name = format!(
            "{}.{}",
            generate_default_id(),
            extension_of(&file.original_name, "jpg")
        );
        debug!("原始文件名: {}，云端文件名: {}", file.original_name, file_name);

        info!("--- 阶段1: 正在请求签名上传地址... ---");
        let signed_url = self.storage.request_signed_url(&file_name).await?;
        let target = UploadTarget {
            public_url: self.public_url(&file_name),
            file_name,
            signed_url,
        };

        info!("--- 阶段2: 正在上传文件到存储... ---");
        self.storage
            .put_object(&target.signed_url, &file.bytes, &file.mime_type)
            .await
            .map_err(|e| {
                error!("文件上传失败: {}", e);
                e
            })?;

        info!("✅ 文件上传成功: {}", target.public_url);
        Ok(target.public_url)
    }

    pub fn public_url(&self, file_name: &str) -> String {
        format!("{}/{}", self.cdn_origin, file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::FakeStorage;

    fn source() -> SourceFile {
        SourceFile::new(vec![1, 2, 3], "image/png", "selfie.png")
    }

    #[tokio::test]
    async fn test_upload_returns_cdn_url() {
        let storage = Arc::new(FakeStorage::default());
        let client = UploadClient::new(storage.clone(), "https://cdn.example.com/");

        let url = client.upload(&source()).await.unwrap();

        let name = url.strip_prefix("https://cdn.example.com/").unwrap();
        let (id, ext) = name.split_once('.').unwrap();
        assert_eq!(id.len(), 21);
        assert!(id.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_eq!(ext, "png");

        let puts = storage.puts.lock().unwrap();
        assert_eq!(puts.len(), 1);
        assert_eq!(puts[0].0, format!("https://signed.example.com/{}", name));
        assert_eq!(puts[0].1, vec![1u8, 2, 3]);
        assert_eq!(puts[0].2, "image/png");
    }

    #[tokio::test]
    async fn test_upload_defaults_extension() {
        let storage = Arc::new(FakeStorage::default());
        let client = UploadClient::new(storage, "https://cdn.example.com");
        let file = SourceFile::new(vec![0], "image/jpeg", "camera_capture");

        let url = client.upload(&file).await.unwrap();
        assert!(url.ends_with(".jpg"));
    }

    #[tokio::test]
    async fn test_signed_url_failure_skips_transfer() {
        let storage = Arc::new(FakeStorage {
            fail_signed_url: true,
            ..Default::default()
        });
        let client = UploadClient::new(storage.clone(), "https://cdn.example.com");

        let err = client.upload(&source()).await.unwrap_err();
        assert!(matches!(err, UploadError::SignedUrl(_)));
        assert!(storage.puts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_transfer_failure() {
        let storage = Arc::new(FakeStorage {
            fail_transfer: true,
            ..Default::default()
        });
        let client = UploadClient::new(storage, "https://cdn.example.com");

        let err = client.upload(&source()).await.unwrap_err();
        assert!(matches!(err, UploadError::Transfer(_)));
    }
}
