//! Web search prompt.

use halo_config::ShellConfig;
use halo_types::PanelId;
use halo_types::ui::{Edge, LogicalKey, PanelState, PropertyId};
use url::Url;

use crate::anim::Role;
use crate::collaborators::UrlOpener;
use crate::command::ShellCommand;
use crate::lifecycle::{PanelCx, PanelLifecycle};
use crate::list_panel::pop_grapheme;
use crate::timer::Fired;

use super::Panel;

pub struct SearchPanel {
    lifecycle: PanelLifecycle,
    query: String,
    endpoint: String,
    opener: Box<dyn UrlOpener>,
}

impl SearchPanel {
    #[must_use]
    pub fn new(config: &ShellConfig, opener: Box<dyn UrlOpener>) -> Self {
        let driver = super::driver(PanelId::Search, &config.animation)
            .with(PropertyId::Opacity, Role::Fade, 0.0)
            .with(PropertyId::Offset, Role::Slide(Edge::Top), 0.0);
        Self {
            lifecycle: PanelLifecycle::new(driver, config.animation.rest_offset),
            query: String::new(),
            endpoint: config.web_search.url.clone(),
            opener,
        }
    }

    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    fn submit(&mut self, cx: &mut PanelCx<'_>) {
        let query = self.query.trim();
        if query.is_empty() {
            return;
        }
        match search_url(&self.endpoint, query) {
            Ok(url) => {
                if let Err(err) = self.opener.open(url.as_str()) {
                    tracing::warn!("failed to open browser: {err}");
                }
            }
            Err(err) => tracing::warn!(endpoint = %self.endpoint, "invalid search endpoint: {err}"),
        }
        self.query.clear();
        cx.sink.set_filter_text(PanelId::Search, "");
        self.lifecycle.hide(cx);
    }
}

/// `endpoint?q=<query>`, with the query form-encoded.
pub fn search_url(endpoint: &str, query: &str) -> Result<Url, url::ParseError> {
    Url::parse_with_params(endpoint, &[("q", query)])
}

impl Panel for SearchPanel {
    fn id(&self) -> PanelId {
        PanelId::Search
    }

    fn state(&self) -> PanelState {
        self.lifecycle.state()
    }

    fn show(&mut self, cx: &mut PanelCx<'_>) {
        if self.lifecycle.state() == PanelState::Hidden {
            cx.sink.set_filter_text(PanelId::Search, &self.query);
            cx.sink.focus_filter(PanelId::Search);
        }
        self.lifecycle.show(cx);
    }

    fn hide(&mut self, cx: &mut PanelCx<'_>) {
        self.lifecycle.hide(cx);
    }

    fn handle_key(&mut self, key: LogicalKey, cx: &mut PanelCx<'_>) -> Option<ShellCommand> {
        match key {
            LogicalKey::Escape => self.lifecycle.hide(cx),
            LogicalKey::Enter => self.submit(cx),
            LogicalKey::Char(c) => {
                self.query.push(c);
                cx.sink.set_filter_text(PanelId::Search, &self.query);
            }
            LogicalKey::Backspace => {
                if pop_grapheme(&mut self.query) {
                    cx.sink.set_filter_text(PanelId::Search, &self.query);
                }
            }
            LogicalKey::Up | LogicalKey::Down | LogicalKey::Left | LogicalKey::Right => {}
        }
        None
    }

    fn on_timer(&mut self, fired: Fired, cx: &mut PanelCx<'_>) -> Option<ShellCommand> {
        self.lifecycle.on_tick(fired, cx);
        None
    }
}
