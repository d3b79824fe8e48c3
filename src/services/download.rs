use image::{DynamicImage, ImageFormat};
use std::io::Cursor;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::api::MediaSource;
use crate::core::types::MediaKind;
use crate::error::DownloadError;
use crate::ui::UiSink;
use crate::utils::id::generate_id;

pub const MANUAL_DOWNLOAD_NOTICE: &str =
    "Direct download failed. Opening in new tab - please right click and Save As.";

const RESULT_FILE_PREFIX: &str = "chroma_result_";

/// 界面上已经渲染出来的结果图
#[derive(Debug, Clone)]
pub struct RenderedImage {
    pub image: DynamicImage,
    pub visible: bool,
    pub loaded: bool,
}

impl RenderedImage {
    pub fn new(image: DynamicImage) -> Self {
        Self {
            image,
            visible: true,
            loaded: true,
        }
    }

    fn is_usable(&self) -> bool {
        self.visible && self.loaded && self.image.width() > 0 && self.image.height() > 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// 直接下载成功
    Saved(PathBuf),
    /// 用渲染图重新编码为 PNG
    Reencoded(PathBuf),
    /// 交给用户手动保存
    OpenedExternally,
}

/// 下载期间保持按钮的忙碌状态，离开作用域时恢复
struct BusyGuard<'a> {
    sink: &'a dyn UiSink,
}

impl<'a> BusyGuard<'a> {
    fn new(sink: &'a dyn UiSink) -> Self {
        sink.on_download_busy(true);
        Self { sink }
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.sink.on_download_busy(false);
    }
}

/// 三级降级下载：直接下载 -> 渲染图重编码 -> 手动保存
pub struct DownloadFallbackChain {
    source: Arc<dyn MediaSource>,
    output_dir: PathBuf,
}

impl DownloadFallbackChain {
    pub fn new(source: Arc<dyn MediaSource>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            source,
            output_dir: output_dir.into(),
        }
    }

    /// 尽力下载，不会返回错误
    pub async fn download(
        &self,
        url: &str,
        rendered: Option<&RenderedImage>,
        sink: &dyn UiSink,
    ) -> DownloadOutcome {
        let _busy = BusyGuard::new(sink);

        match self.fetch_and_save(url).await {
            Ok(path) => {
                info!("✅ 已下载到: {}", path.display());
                return DownloadOutcome::Saved(path);
            }
            Err(e) => error!("Download Strategy 1 failed: {}", e),
        }

        match self.reencode_rendered(url, rendered).await {
            Ok(path) => {
                info!("✅ 已通过渲染图保存: {}", path.display());
                return DownloadOutcome::Reencoded(path);
            }
            Err(e) => error!("Download Strategy 2 failed: {}", e),
        }

        warn!("⚠️ 直接下载失败，转为手动保存: {}", url);
        sink.on_notice(MANUAL_DOWNLOAD_NOTICE);
        sink.open_in_new_context(url);
        DownloadOutcome::OpenedExternally
    }

    async fn fetch_and_save(&self, url: &str) -> Result<PathBuf, DownloadError> {
        let media = self.source.fetch_media(url).await?;
        let extension = extension_for(media.content_type.as_deref(), url);
        debug!(
            "下载完成 {} 字节，content-type: {:?}，扩展名: {}",
            media.bytes.len(),
            media.content_type,
            extension
        );
        self.save(&media.bytes, extension).await
    }

    async fn reencode_rendered(
        &self,
        url: &str,
        rendered: Option<&RenderedImage>,
    ) -> Result<PathBuf, DownloadError> {
        if MediaKind::from_url(url) == MediaKind::Video {
            return Err(DownloadError::Unavailable("video assets cannot be re-encoded"));
        }
        let rendered = rendered.ok_or(DownloadError::Unavailable("no rendered image"))?;
        if !rendered.is_usable() {
            return Err(DownloadError::Unavailable("rendered image not ready"));
        }

        let mut buf = Vec::new();
        rendered
            .image
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .map_err(|e| DownloadError::Encode(e.to_string()))?;
        self.save(&buf, "png").await
    }

    async fn save(&self, bytes: &[u8], extension: &str) -> Result<PathBuf, DownloadError> {
        tokio::fs::create_dir_all(&self.output_dir).await?;
        let path = self
            .output_dir
            .join(format!("{}{}.{}", RESULT_FILE_PREFIX, generate_id(8), extension));
        tokio::fs::write(&path, bytes).await?;
        Ok(path)
    }
}

/// 按 content-type 和地址后缀推断保存的扩展名
pub fn extension_for(content_type: Option<&str>, url: &str) -> &'static str {
    let content_type = content_type.unwrap_or_default().to_ascii_lowercase();
    let url = url.to_ascii_lowercase();

    if content_type.contains("video") || url.contains(".mp4") || url.contains(".webm") {
        "mp4"
    } else if content_type.contains("png") || url.contains(".png") {
        "png"
    } else if content_type.contains("webp") || url.contains(".webp") {
        "webp"
    } else {
        "jpg"
    }
}
