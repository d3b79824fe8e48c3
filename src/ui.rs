use tracing::{error, info, warn};

use crate::core::types::{MediaKind, WorkflowState};

/// 界面通知接口，核心流程只依赖这个 trait
///
/// 默认实现什么都不做，展示层按需覆盖。
pub trait UiSink: Send + Sync {
    fn on_state_changed(&self, state: WorkflowState);

    /// 轮询中的状态文本，例如 `PROCESSING... (3)`
    fn on_progress(&self, status: &str);

    fn on_error(&self, message: &str);

    fn on_asset_ready(&self, url: &str, kind: MediaKind);

    fn on_preview(&self, _url: &str) {}

    /// 提示类消息（上传前生成、手动下载提示等）
    fn on_notice(&self, _message: &str) {}

    /// 下载按钮的"Downloading..."状态
    fn on_download_busy(&self, _busy: bool) {}

    /// 在新窗口打开地址，供用户手动保存
    fn open_in_new_context(&self, _url: &str) {}
}

/// 把所有通知写进日志的命令行实现
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink;

impl UiSink for ConsoleSink {
    fn on_state_changed(&self, state: WorkflowState) {
        info!("状态: {}", state);
    }

    fn on_progress(&self, status: &str) {
        info!("⏳ {}", status);
    }

    fn on_error(&self, message: &str) {
        error!("Error: {}", message);
    }

    fn on_asset_ready(&self, url: &str, kind: MediaKind) {
        info!("🎉 结果已生成 ({:?}): {}", kind, url);
    }

    fn on_preview(&self, url: &str) {
        info!("预览地址: {}", url);
    }

    fn on_notice(&self, message: &str) {
        warn!("{}", message);
    }

    fn on_download_busy(&self, busy: bool) {
        if busy {
            info!("Downloading...");
        }
    }

    fn open_in_new_context(&self, url: &str) {
        info!("请在浏览器中打开并手动保存: {}", url);
    }
}
