use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

use crate::utils::text::{extension_of, mime_type_for};

/// 生成服务中视频特效对应的 model 名
pub const VIDEO_MODEL: &str = "video-effects";

/// 待上传的源文件
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub bytes: Vec<u8>,
    pub mime_type: String,
    pub original_name: String,
}

impl SourceFile {
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>, original_name: impl Into<String>) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
            original_name: original_name.into(),
        }
    }

    /// 从本地路径读取文件，MIME 类型按扩展名推断
    pub async fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let original_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mime_type = mime_type_for(&extension_of(&original_name, "jpg")).to_string();
        Ok(Self {
            bytes,
            mime_type,
            original_name,
        })
    }
}

/// 单次上传的目标地址
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadTarget {
    pub file_name: String,
    pub signed_url: String,
    pub public_url: String,
}

/// 特效类型，决定接口地址和请求体形状
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectKind {
    Image,
    Video,
}

impl EffectKind {
    pub fn from_model(model: &str) -> Self {
        if model == VIDEO_MODEL {
            EffectKind::Video
        } else {
            EffectKind::Image
        }
    }

    pub fn endpoint(&self) -> &'static str {
        match self {
            EffectKind::Image => "image-gen",
            EffectKind::Video => "video-gen",
        }
    }
}

/// 部署固定的生成参数，不由用户输入
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectConfig {
    pub api_base_url: String,
    pub user_id: String,
    pub effect_id: String,
    pub model: String,
    pub tool_type: String,
}

impl EffectConfig {
    pub fn kind(&self) -> EffectKind {
        EffectKind::from_model(&self.model)
    }

    pub fn submit_url(&self) -> String {
        format!(
            "{}/{}",
            self.api_base_url.trim_end_matches('/'),
            self.kind().endpoint()
        )
    }

    pub fn status_url(&self, job_id: &str) -> String {
        format!("{}/{}/{}/status", self.submit_url(), self.user_id, job_id)
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ImageGenRequest {
    pub model: String,
    pub tool_type: String,
    pub effect_id: String,
    pub image_url: String,
    pub user_id: String,
    pub remove_watermark: bool,
    pub is_private: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VideoGenRequest {
    pub image_url: Vec<String>,
    pub effect_id: String,
    pub user_id: String,
    pub remove_watermark: bool,
    pub model: String,
    pub is_private: bool,
}

/// 生成请求，按特效类型区分
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum GenerationRequest {
    Image(ImageGenRequest),
    Video(VideoGenRequest),
}

impl GenerationRequest {
    pub fn build(asset_url: &str, config: &EffectConfig) -> Self {
        match config.kind() {
            EffectKind::Video => GenerationRequest::Video(VideoGenRequest {
                image_url: vec![asset_url.to_string()],
                effect_id: config.effect_id.clone(),
                user_id: config.user_id.clone(),
                remove_watermark: true,
                model: VIDEO_MODEL.to_string(),
                is_private: true,
            }),
            EffectKind::Image => GenerationRequest::Image(ImageGenRequest {
                model: config.model.clone(),
                tool_type: config.tool_type.clone(),
                effect_id: config.effect_id.clone(),
                image_url: asset_url.to_string(),
                user_id: config.user_id.clone(),
                remove_watermark: true,
                is_private: true,
            }),
        }
    }

    pub fn kind(&self) -> EffectKind {
        match self {
            GenerationRequest::Image(_) => EffectKind::Image,
            GenerationRequest::Video(_) => EffectKind::Video,
        }
    }
}

/// 提交任务的响应
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub job_id: String,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Queued,
    Processing,
    Completed,
    Failed,
    Error,
    #[default]
    #[serde(other)]
    Unknown,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Error)
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed | Self::Error)
    }
}

/// 结果中的地址字段，按优先级排列
pub const MEDIA_URL_FIELDS: [&str; 3] = ["mediaUrl", "video", "image"];

/// 状态接口返回的任务信息
///
/// `result` 和 `error` 保留原始 JSON，形状由使用方按需解读；
/// 缺少 `status` 时视为未知的非终态。
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GenerationJob {
    #[serde(rename = "jobId", default)]
    pub job_id: String,
    #[serde(default)]
    pub status: JobStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
}

impl GenerationJob {
    /// 结果条目：数组取第一个元素，否则就是结果本身
    pub fn result_item(&self) -> Option<&Value> {
        match self.result.as_ref()? {
            Value::Array(items) => items.first(),
            item => Some(item),
        }
    }

    /// 错误信息：字符串原样返回，其它类型返回 JSON 文本
    pub fn error_message(&self) -> Option<String> {
        match self.error.as_ref()? {
            Value::Null => None,
            Value::String(s) if s.trim().is_empty() => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

/// 下载到的媒体内容
#[derive(Debug, Clone)]
pub struct FetchedMedia {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}
