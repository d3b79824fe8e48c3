use std::sync::Arc;
use tracing::{error, info};

use crate::api::GenerationApi;
use crate::core::models::{EffectConfig, GenerationRequest, SubmitResponse};
use crate::error::SubmitError;

/// 构造并提交生成任务
pub struct JobSubmitter {
    api: Arc<dyn GenerationApi>,
    config: EffectConfig,
}

impl JobSubmitter {
    pub fn new(api: Arc<dyn GenerationApi>, config: EffectConfig) -> Self {
        Self { api, config }
    }

    pub async fn submit(&self, asset_url: &str) -> Result<SubmitResponse, SubmitError> {
        let request = GenerationRequest::build(asset_url, &self.config);
        let endpoint = self.config.submit_url();
        info!("📤 正在提交 {:?} 任务: {}", request.kind(), endpoint);

        let response = self.api.submit_job(&endpoint, &request).await.map_err(|e| {
            error!("❌ 提交任务失败: {}", e);
            e
        })?;
        info!("✅ 任务已提交，jobId: {}", response.job_id);
        Ok(response)
    }
}
