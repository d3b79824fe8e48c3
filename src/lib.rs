//! 图片特效生成客户端：上传原图、提交任务、轮询结果、下载产物

pub mod api;
pub mod app;
pub mod core;
pub mod error;
pub mod logger;
pub mod services;
pub mod ui;
pub mod utils;

pub use app::AppConfig;
pub use error::{PipelineError, PipelineResult};
pub use services::WorkflowController;
pub use ui::{ConsoleSink, UiSink};
