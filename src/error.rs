use serde_json::Value;
use thiserror::Error;

/// 上传阶段错误（获取签名地址 / 直传存储）
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Failed to get signed URL: {0}")]
    SignedUrl(String),
    #[error("Failed to upload file: {0}")]
    Transfer(String),
}

/// 提交任务阶段错误
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("Failed to submit job: HTTP {status}")]
    Submission { status: u16 },
    #[error("Failed to submit job: {0}")]
    Transport(String),
}

/// 轮询阶段错误
///
/// `JobFailed` 表示服务端明确判定任务失败，其余两种是无法得到结果。
#[derive(Debug, Error)]
pub enum PollError {
    #[error("Failed to check status: {0}")]
    PollRequest(String),
    #[error("{0}")]
    JobFailed(String),
    #[error("Job timed out after {polls} polls")]
    PollTimeout { polls: u32 },
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("No image URL in response")]
    ResultMissing { payload: Value },
}

/// 下载策略之间传递的错误，只在降级链内部使用
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("Network response not ok: {0}")]
    Fetch(String),
    #[error("Canvas fallback unavailable: {0}")]
    Unavailable(&'static str),
    #[error("Canvas blob failed: {0}")]
    Encode(String),
    #[error("Failed to write file: {0}")]
    Io(#[from] std::io::Error),
}

/// 整条流水线的错误汇总
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Upload(#[from] UploadError),
    #[error(transparent)]
    Submit(#[from] SubmitError),
    #[error(transparent)]
    Poll(#[from] PollError),
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error("Please upload a photo first.")]
    MissingAsset,
    #[error("Another operation is still running ({0})")]
    Busy(String),
}

impl PipelineError {
    /// 服务端判定任务失败，而不是网络或超时问题
    pub fn is_job_failure(&self) -> bool {
        matches!(self, PipelineError::Poll(PollError::JobFailed(_)))
    }
}

pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
