use halo_config::WebSearchConfig;
use halo_engine::UrlOpener;
use halo_types::ProviderError;

use crate::process;

/// Opens URLs in the configured browser, detached.
#[derive(Debug, Clone)]
pub struct BrowserOpener {
    program: String,
    args: Vec<String>,
}

impl BrowserOpener {
    pub fn new(config: &WebSearchConfig) -> Self {
        Self {
            program: config.browser.clone(),
            args: config.browser_args.clone(),
        }
    }

    fn command_args(&self, url: &str) -> Vec<String> {
        let mut args = self.args.clone();
        args.push(url.to_string());
        args
    }
}

impl UrlOpener for BrowserOpener {
    fn open(&mut self, url: &str) -> Result<(), ProviderError> {
        tracing::info!(browser = %self.program, "opening {url}");
        process::spawn_detached(&self.program, &self.command_args(url))
    }
}
