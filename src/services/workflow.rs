use std::sync::Arc;
use tokio::time::Duration;
use tracing::{debug, error, info, warn};

use crate::api::ChromaClient;
use crate::app::config::AppConfig;
use crate::core::models::SourceFile;
use crate::core::types::{MediaKind, SessionState, WorkflowState};
use crate::error::{PipelineError, PipelineResult};
use crate::services::download::{DownloadFallbackChain, DownloadOutcome, RenderedImage};
use crate::services::poller::JobPoller;
use crate::services::resolver::resolve;
use crate::services::submit::JobSubmitter;
use crate::services::upload::UploadClient;
use crate::ui::UiSink;

/// 串联 上传 -> 提交 -> 轮询 -> 解析 的主流程，持有唯一的会话状态
///
/// 所有写操作都需要 `&mut self`，同一时刻只会有一个任务在跑；
/// 状态仍处于忙碌阶段时再次触发会返回 `PipelineError::Busy`。
pub struct WorkflowController {
    uploader: UploadClient,
    submitter: JobSubmitter,
    poller: JobPoller,
    downloader: DownloadFallbackChain,
    sink: Arc<dyn UiSink>,
    session: SessionState,
    rendered: Option<RenderedImage>,
}

impl WorkflowController {
    pub fn new(
        uploader: UploadClient,
        submitter: JobSubmitter,
        poller: JobPoller,
        downloader: DownloadFallbackChain,
        sink: Arc<dyn UiSink>,
    ) -> Self {
        Self {
            uploader,
            submitter,
            poller,
            downloader,
            sink,
            session: SessionState::default(),
            rendered: None,
        }
    }

    /// 用配置创建连接真实服务的控制器
    pub fn from_config(config: &AppConfig, sink: Arc<dyn UiSink>) -> Self {
        let client = Arc::new(ChromaClient::new(
            config.api_base_url.as_str(),
            config.request_timeout_secs,
            None,
        ));
        let effect = config.effect_config();
        Self::new(
            UploadClient::new(client.clone(), config.cdn_origin.as_str()),
            JobSubmitter::new(client.clone(), effect.clone()),
            JobPoller::with_limits(
                client.clone(),
                effect,
                Duration::from_millis(config.poll_interval_ms),
                config.max_polls,
            ),
            DownloadFallbackChain::new(client, config.output_dir.as_str()),
            sink,
        )
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn state(&self) -> WorkflowState {
        self.session.workflow_state
    }

    pub fn current_asset_url(&self) -> Option<&str> {
        self.session.current_asset_url.as_deref()
    }

    /// 选择文件后立即上传
    pub async fn select_file(&mut self, file: SourceFile) -> PipelineResult<String> {
        self.ensure_idle()?;
        info!("📁 已选择文件: {} ({} 字节)", file.original_name, file.bytes.len());
        self.transition(WorkflowState::Uploading);

        match self.uploader.upload(&file).await {
            Ok(url) => {
                self.session.current_asset_url = Some(url.clone());
                self.rendered = None;
                self.sink.on_preview(&url);
                self.transition(WorkflowState::Ready);
                Ok(url)
            }
            Err(e) => Err(self.fail(e.into())),
        }
    }

    /// 提交生成任务并等待结果
    pub async fn generate(&mut self) -> PipelineResult<String> {
        self.ensure_idle()?;
        let Some(asset_url) = self.session.current_asset_url.clone() else {
            let err = PipelineError::MissingAsset;
            warn!("未上传图片就请求生成");
            self.sink.on_notice(&err.to_string());
            return Err(err);
        };

        match self.run_generation(&asset_url).await {
            Ok(result_url) => {
                self.session.current_asset_url = Some(result_url.clone());
                self.rendered = None;
                self.transition(WorkflowState::Complete);
                self.sink
                    .on_asset_ready(&result_url, MediaKind::from_url(&result_url));
                Ok(result_url)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    async fn run_generation(&mut self, asset_url: &str) -> PipelineResult<String> {
        self.transition(WorkflowState::Submitting);
        let submitted = self.submitter.submit(asset_url).await?;

        self.transition(WorkflowState::Polling);
        let sink = Arc::clone(&self.sink);
        let job = self
            .poller
            .poll(&submitted.job_id, move |attempt| {
                sink.on_progress(&format!("PROCESSING... ({})", attempt + 1));
            })
            .await?;

        let url = resolve(&job)?;
        debug!("任务 {} 的结果地址: {}", job.job_id, url);
        Ok(url)
    }

    /// 界面渲染完结果图后登记，供下载降级使用
    pub fn attach_rendered(&mut self, rendered: RenderedImage) {
        self.rendered = Some(rendered);
    }

    /// 下载当前结果，不改变工作流状态
    ///
    /// 没有可下载的地址或流程仍在执行时返回 `None`。
    pub async fn download(&self) -> Option<DownloadOutcome> {
        if self.state().is_busy() {
            warn!("流程执行中，忽略下载请求");
            return None;
        }
        let url = self.session.current_asset_url.as_deref()?;
        Some(
            self.downloader
                .download(url, self.rendered.as_ref(), self.sink.as_ref())
                .await,
        )
    }

    /// 回到初始状态，清空当前地址
    pub fn reset(&mut self) {
        if self.state().is_busy() {
            warn!("流程执行中，忽略重置请求");
            return;
        }
        self.session.reset();
        self.rendered = None;
        self.sink.on_state_changed(WorkflowState::Idle);
    }

    /// 用户确认错误提示后，有可用地址回到 Ready，否则回到 Idle
    pub fn acknowledge_error(&mut self) {
        if self.state() != WorkflowState::Error {
            return;
        }
        let next = if self.session.current_asset_url.is_some() {
            WorkflowState::Ready
        } else {
            WorkflowState::Idle
        };
        self.transition(next);
    }

    fn ensure_idle(&self) -> PipelineResult<()> {
        let state = self.state();
        if state.is_busy() {
            warn!("上一个操作仍在执行: {}", state);
            return Err(PipelineError::Busy(state.status_text().to_string()));
        }
        Ok(())
    }

    fn transition(&mut self, state: WorkflowState) {
        debug!("状态切换: {} -> {}", self.session.workflow_state, state);
        self.session.workflow_state = state;
        self.sink.on_state_changed(state);
    }

    fn fail(&mut self, err: PipelineError) -> PipelineError {
        error!("❌ 流程失败: {:?}", err);
        self.transition(WorkflowState::Error);
        self.sink.on_error(&err.to_string());
        err
    }
}
