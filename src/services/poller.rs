use std::sync::Arc;
use tokio::time::{Duration, sleep};
use tracing::{debug, error, info, warn};

use crate::api::GenerationApi;
use crate::core::models::{EffectConfig, GenerationJob, JobStatus};
use crate::error::PollError;

/// 轮询间隔 2 秒
pub const POLL_INTERVAL: Duration = Duration::from_millis(2000);
/// 最多轮询 60 次，约 2 分钟
pub const MAX_POLLS: u32 = 60;

const DEFAULT_FAILURE_MESSAGE: &str = "Job processing failed";

/// 任务状态轮询：固定间隔，无退避，无取消
pub struct JobPoller {
    api: Arc<dyn GenerationApi>,
    config: EffectConfig,
    interval: Duration,
    max_polls: u32,
}

impl JobPoller {
    pub fn new(api: Arc<dyn GenerationApi>, config: EffectConfig) -> Self {
        Self::with_limits(api, config, POLL_INTERVAL, MAX_POLLS)
    }

    pub fn with_limits(
        api: Arc<dyn GenerationApi>,
        config: EffectConfig,
        interval: Duration,
        max_polls: u32,
    ) -> Self {
        Self {
            api,
            config,
            interval,
            max_polls,
        }
    }

    /// 轮询直到任务完成
    ///
    /// 每次得到非终态时以从 0 开始的轮次调用 `on_progress`。
    /// 查询本身失败时立即返回 `PollRequest`，不做重试。
    pub async fn poll<F>(&self, job_id: &str, mut on_progress: F) -> Result<GenerationJob, PollError>
    where
        F: FnMut(u32) + Send,
    {
        let url = self.config.status_url(job_id);
        let mut attempt = 0;

        while attempt < self.max_polls {
            let mut job = self.api.fetch_status(&url).await.map_err(|e| {
                error!("❌ 查询任务状态失败: {}", e);
                e
            })?;
            debug!("任务 {} 第 {} 次查询: {:?}", job_id, attempt + 1, job.status);

            if job.status == JobStatus::Completed {
                info!("✅ 任务 {} 已完成", job_id);
                job.job_id = job_id.to_string();
                return Ok(job);
            }

            if job.status.is_failure() {
                let message = job
                    .error_message()
                    .unwrap_or_else(|| DEFAULT_FAILURE_MESSAGE.to_string());
                warn!("❌ 任务 {} 失败: {}", job_id, message);
                return Err(PollError::JobFailed(message));
            }

            on_progress(attempt);
            sleep(self.interval).await;
            attempt += 1;
        }

        error!("❌ 任务 {} 轮询 {} 次仍未结束", job_id, self.max_polls);
        Err(PollError::PollTimeout {
            polls: self.max_polls,
        })
    }
}
