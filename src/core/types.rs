use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

static VIDEO_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\.(mp4|webm)(\?.*)?$").expect("视频地址正则无效"));

/// 工作流状态，线性推进，任何阶段都可以进入 Error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkflowState {
    #[default]
    Idle,
    Uploading,
    Ready,
    Submitting,
    Polling,
    Complete,
    Error,
}

impl WorkflowState {
    /// 正在执行网络操作，界面应禁用触发按钮
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Uploading | Self::Submitting | Self::Polling)
    }

    pub fn status_text(&self) -> &'static str {
        match self {
            Self::Idle => "IDLE",
            Self::Uploading => "UPLOADING...",
            Self::Ready => "READY",
            Self::Submitting => "SUBMITTING JOB...",
            Self::Polling => "JOB QUEUED...",
            Self::Complete => "COMPLETE",
            Self::Error => "ERROR",
        }
    }
}

impl fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.status_text())
    }
}

/// 会话状态，只由 WorkflowController 写入
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub current_asset_url: Option<String>,
    pub workflow_state: WorkflowState,
}

impl SessionState {
    pub fn reset(&mut self) {
        *self = SessionState::default();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    pub fn from_url(url: &str) -> Self {
        if VIDEO_URL.is_match(url) {
            MediaKind::Video
        } else {
            MediaKind::Image
        }
    }
}
