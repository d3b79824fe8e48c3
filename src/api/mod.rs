pub mod client;

use async_trait::async_trait;

use crate::core::models::{FetchedMedia, GenerationJob, GenerationRequest, SubmitResponse};
use crate::error::{DownloadError, PollError, SubmitError, UploadError};

pub use client::ChromaClient;

/// 对象存储：签名地址 + 直传
#[async_trait]
pub trait StorageApi: Send + Sync {
    async fn request_signed_url(&self, file_name: &str) -> Result<String, UploadError>;

    async fn put_object(
        &self,
        signed_url: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<(), UploadError>;
}

/// 生成服务：提交任务和查询状态
#[async_trait]
pub trait GenerationApi: Send + Sync {
    async fn submit_job(
        &self,
        url: &str,
        request: &GenerationRequest,
    ) -> Result<SubmitResponse, SubmitError>;

    async fn fetch_status(&self, url: &str) -> Result<GenerationJob, PollError>;
}

/// 结果文件的下载来源
#[async_trait]
pub trait MediaSource: Send + Sync {
    async fn fetch_media(&self, url: &str) -> Result<FetchedMedia, DownloadError>;
}
