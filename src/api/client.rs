use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use std::sync::OnceLock;
use std::time::Duration;
use tracing::{debug, error};
use urlencoding::encode;

use super::{GenerationApi, MediaSource, StorageApi};
use crate::core::models::{FetchedMedia, GenerationJob, GenerationRequest, SubmitResponse};
use crate::error::{DownloadError, PollError, SubmitError, UploadError};

const ACCEPT_ANY: &str = "application/json, text/plain, */*";
const SIGNED_URL_PATH: &str = "/get-emd-upload-url";

/// 共享连接池及其创建时的超时秒数
static BUILT_IN_CLIENT: OnceLock<(u64, reqwest::Client)> = OnceLock::new();

fn build_client(timeout_secs: u64) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .unwrap_or_default()
}

/// 超时与共享连接池一致时复用它，否则返回 `None`
fn shared_client(timeout_secs: u64) -> Option<reqwest::Client> {
    let (shared_timeout, client) =
        BUILT_IN_CLIENT.get_or_init(|| (timeout_secs, build_client(timeout_secs)));
    (*shared_timeout == timeout_secs).then(|| client.clone())
}

/// 基于 reqwest 的服务端客户端，实现存储、生成和下载三个接口
#[derive(Clone, Debug)]
pub struct ChromaClient {
    api_base_url: String,
    client: reqwest::Client,
}

impl ChromaClient {
    /// 不传 client 时优先复用进程内共享的连接池；
    /// 超时与共享池不同则单独创建一个，传入的超时总是生效
    pub fn new(
        api_base_url: impl Into<String>,
        timeout_secs: u64,
        client: Option<reqwest::Client>,
    ) -> Self {
        let client = client
            .or_else(|| shared_client(timeout_secs))
            .unwrap_or_else(|| build_client(timeout_secs));
        Self {
            api_base_url: api_base_url.into().trim_end_matches('/').to_string(),
            client,
        }
    }

    pub fn signed_url_endpoint(&self, file_name: &str) -> String {
        format!(
            "{}{}?fileName={}",
            self.api_base_url,
            SIGNED_URL_PATH,
            encode(file_name)
        )
    }
}

fn status_text(status: reqwest::StatusCode) -> String {
    status
        .canonical_reason()
        .map(|r| format!("{} {}", status.as_u16(), r))
        .unwrap_or_else(|| status.as_u16().to_string())
}

#[async_trait]
impl StorageApi for ChromaClient {
    async fn request_signed_url(&self, file_name: &str) -> Result<String, UploadError> {
        let url = self.signed_url_endpoint(file_name);
        debug!("请求签名地址: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| UploadError::SignedUrl(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            error!("获取签名地址失败: {}", status);
            return Err(UploadError::SignedUrl(status_text(status)));
        }

        let signed_url = response
            .text()
            .await
            .map_err(|e| UploadError::SignedUrl(e.to_string()))?;
        Ok(signed_url.trim().to_string())
    }

    async fn put_object(
        &self,
        signed_url: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<(), UploadError> {
        let response = self
            .client
            .put(signed_url)
            .header(CONTENT_TYPE, content_type)
            .body(bytes.to_vec())
            .send()
            .await
            .map_err(|e| UploadError::Transfer(e.to_string()))?;

        if response.status().is_success() {
            Ok(())
        } else {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            error!("直传存储失败 {}: {}", status, text);
            Err(UploadError::Transfer(status_text(status)))
        }
    }
}

#[async_trait]
impl GenerationApi for ChromaClient {
    async fn submit_job(
        &self,
        url: &str,
        request: &GenerationRequest,
    ) -> Result<SubmitResponse, SubmitError> {
        debug!(
            "提交任务 payload: {}",
            serde_json::to_string(request).unwrap_or_default()
        );
        let response = self
            .client
            .post(url)
            .header(ACCEPT, ACCEPT_ANY)
            .header(CONTENT_TYPE, "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| SubmitError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SubmitError::Submission {
                status: response.status().as_u16(),
            });
        }

        response
            .json::<SubmitResponse>()
            .await
            .map_err(|e| SubmitError::Transport(format!("解析提交响应失败: {}", e)))
    }

    async fn fetch_status(&self, url: &str) -> Result<GenerationJob, PollError> {
        let response = self
            .client
            .get(url)
            .header(ACCEPT, ACCEPT_ANY)
            .send()
            .await
            .map_err(|e| PollError::PollRequest(e.to_string()))?;

        if !response.status().is_success() {
            return Err(PollError::PollRequest(status_text(response.status())));
        }

        response
            .json::<GenerationJob>()
            .await
            .map_err(|e| PollError::PollRequest(format!("解析状态响应失败: {}", e)))
    }
}

#[async_trait]
impl MediaSource for ChromaClient {
    async fn fetch_media(&self, url: &str) -> Result<FetchedMedia, DownloadError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DownloadError::Fetch(e.to_string()))?;

        if !response.status().is_success() {
            return Err(DownloadError::Fetch(status_text(response.status())));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = response
            .bytes()
            .await
            .map_err(|e| DownloadError::Fetch(e.to_string()))?;

        Ok(FetchedMedia {
            bytes: bytes.to_vec(),
            content_type,
        })
    }
}
