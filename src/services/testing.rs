//! 测试用的假实现

use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::api::{GenerationApi, MediaSource, StorageApi};
use crate::core::models::{
    FetchedMedia, GenerationJob, GenerationRequest, JobStatus, SubmitResponse,
};
use crate::core::types::{MediaKind, WorkflowState};
use crate::error::{DownloadError, PollError, SubmitError, UploadError};
use crate::ui::UiSink;

#[derive(Default)]
pub struct FakeStorage {
    pub fail_signed_url: bool,
    pub fail_transfer: bool,
    pub puts: Mutex<Vec<(String, Vec<u8>, String)>>,
}

#[async_trait]
impl StorageApi for FakeStorage {
    async fn request_signed_url(&self, file_name: &str) -> Result<String, UploadError> {
        if self.fail_signed_url {
            return Err(UploadError::SignedUrl("500 Internal Server Error".to_string()));
        }
        Ok(format!("https://signed.example.com/{}", file_name))
    }

    async fn put_object(
        &self,
        signed_url: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<(), UploadError> {
        if self.fail_transfer {
            return Err(UploadError::Transfer("403 Forbidden".to_string()));
        }
        self.puts.lock().unwrap().push((
            signed_url.to_string(),
            bytes.to_vec(),
            content_type.to_string(),
        ));
        Ok(())
    }
}

pub fn job(status: JobStatus) -> GenerationJob {
    GenerationJob {
        job_id: String::new(),
        status,
        result: None,
        error: None,
    }
}

pub fn completed(result: Value) -> GenerationJob {
    GenerationJob {
        result: Some(result),
        ..job(JobStatus::Completed)
    }
}

/// 按顺序返回预设状态，队列耗尽后一直返回 processing
#[derive(Default)]
pub struct FakeGeneration {
    pub submit_status: Option<u16>,
    pub submitted: Mutex<Vec<(String, GenerationRequest)>>,
    pub statuses: Mutex<VecDeque<Result<GenerationJob, PollError>>>,
    pub status_urls: Mutex<Vec<String>>,
    pub status_calls: AtomicUsize,
}

impl FakeGeneration {
    pub fn with_statuses(statuses: Vec<Result<GenerationJob, PollError>>) -> Self {
        Self {
            statuses: Mutex::new(statuses.into()),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GenerationApi for FakeGeneration {
    async fn submit_job(
        &self,
        url: &str,
        request: &GenerationRequest,
    ) -> Result<SubmitResponse, SubmitError> {
        if let Some(status) = self.submit_status {
            return Err(SubmitError::Submission { status });
        }
        self.submitted
            .lock()
            .unwrap()
            .push((url.to_string(), request.clone()));
        Ok(SubmitResponse {
            job_id: "job-42".to_string(),
        })
    }

    async fn fetch_status(&self, url: &str) -> Result<GenerationJob, PollError> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        self.status_urls.lock().unwrap().push(url.to_string());
        self.statuses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(job(JobStatus::Processing)))
    }
}

#[derive(Default)]
pub struct FakeMedia {
    pub media: Option<FetchedMedia>,
    pub calls: AtomicUsize,
}

impl FakeMedia {
    pub fn serving(bytes: &[u8], content_type: Option<&str>) -> Self {
        Self {
            media: Some(FetchedMedia {
                bytes: bytes.to_vec(),
                content_type: content_type.map(str::to_string),
            }),
            ..Default::default()
        }
    }
}

#[async_trait]
impl MediaSource for FakeMedia {
    async fn fetch_media(&self, _url: &str) -> Result<FetchedMedia, DownloadError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.media
            .clone()
            .ok_or_else(|| DownloadError::Fetch("connection refused".to_string()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SinkEvent {
    State(WorkflowState),
    Progress(String),
    Error(String),
    Asset(String, MediaKind),
    Preview(String),
    Notice(String),
    Busy(bool),
    Opened(String),
}

#[derive(Default)]
pub struct RecordingSink {
    pub events: Mutex<Vec<SinkEvent>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<SinkEvent> {
        self.events.lock().unwrap().clone()
    }

    fn push(&self, event: SinkEvent) {
        self.events.lock().unwrap().push(event);
    }
}

impl UiSink for RecordingSink {
    fn on_state_changed(&self, state: WorkflowState) {
        self.push(SinkEvent::State(state));
    }

    fn on_progress(&self, status: &str) {
        self.push(SinkEvent::Progress(status.to_string()));
    }

    fn on_error(&self, message: &str) {
        self.push(SinkEvent::Error(message.to_string()));
    }

    fn on_asset_ready(&self, url: &str, kind: MediaKind) {
        self.push(SinkEvent::Asset(url.to_string(), kind));
    }

    fn on_preview(&self, url: &str) {
        self.push(SinkEvent::Preview(url.to_string()));
    }

    fn on_notice(&self, message: &str) {
        self.push(SinkEvent::Notice(message.to_string()));
    }

    fn on_download_busy(&self, busy: bool) {
        self.push(SinkEvent::Busy(busy));
    }

    fn open_in_new_context(&self, url: &str) {
        self.push(SinkEvent::Opened(url.to_string()));
    }
}
