pub mod download;
pub mod poller;
pub mod resolver;
pub mod submit;
pub mod upload;
pub mod workflow;

#[cfg(test)]
pub(crate) mod testing;

pub use download::{DownloadFallbackChain, DownloadOutcome, RenderedImage};
pub use poller::{JobPoller, MAX_POLLS, POLL_INTERVAL};
pub use resolver::resolve;
pub use submit::JobSubmitter;
pub use upload::UploadClient;
pub use workflow::WorkflowController;
