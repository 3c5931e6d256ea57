//! Background thumbnail decoding.
//!
//! Decoding wallpapers is slow, so it runs on a dedicated thread. Jobs and
//! results travel over unbounded tokio channels; the control thread drains
//! results without blocking.

use std::io;
use std::path::PathBuf;
use std::thread;

use halo_types::ProviderError;
use halo_types::ui::Preview;
use tokio::sync::mpsc;

use crate::collaborators::PreviewDecoder;

#[derive(Debug)]
pub struct PreviewResult {
    pub path: PathBuf,
    pub preview: Result<Preview, ProviderError>,
}

pub struct PreviewWorker {
    jobs: mpsc::UnboundedSender<PathBuf>,
    results: mpsc::UnboundedReceiver<PreviewResult>,
}

impl PreviewWorker {
    /// Start the worker thread. It exits once the worker is dropped.
    pub fn spawn(decoder: Box<dyn PreviewDecoder>) -> io::Result<Self> {
        let (jobs, mut job_rx) = mpsc::unbounded_channel::<PathBuf>();
        let (result_tx, results) = mpsc::unbounded_channel();
        thread::Builder::new()
            .name("halo-previews".to_string())
            .spawn(move || {
                while let Some(path) = job_rx.blocking_recv() {
                    let preview = decoder.decode(&path);
                    if result_tx.send(PreviewResult { path, preview }).is_err() {
                        break;
                    }
                }
                tracing::debug!("preview worker stopped");
            })?;
        Ok(Self { jobs, results })
    }

    pub fn request(&self, path: PathBuf) {
        if self.jobs.send(path).is_err() {
            tracing::warn!("preview worker is gone");
        }
    }

    /// Next finished preview, if any.
    pub fn try_recv(&mut self) -> Option<PreviewResult> {
        self.results.try_recv().ok()
    }
}
