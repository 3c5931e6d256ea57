//! Wallpaper picker: a horizontal strip of thumbnails.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use halo_config::ShellConfig;
use halo_types::PanelId;
use halo_types::ui::{Edge, LogicalKey, Orientation, PanelState, Preview, PropertyId};

use crate::anim::Role;
use crate::collaborators::{Candidate, CandidateRef, CandidateSource};
use crate::command::ShellCommand;
use crate::lifecycle::{PanelCx, PanelLifecycle};
use crate::list_panel::{ListEvent, ListPanel};
use crate::refresher::{ListRefresher, plain_item};
use crate::sink::RenderedItem;
use crate::timer::Fired;

use super::Panel;

pub struct WallpaperPanel {
    list: ListPanel,
    wallpapers: Vec<CandidateRef>,
    previews: HashMap<PathBuf, Rc<Preview>>,
}

impl WallpaperPanel {
    /// Build the panel from a one-time directory listing.
    #[must_use]
    pub fn new(config: &ShellConfig, mut source: Box<dyn CandidateSource>) -> Self {
        let driver = super::driver(PanelId::Wallpaper, &config.animation)
            .with(PropertyId::Opacity, Role::Fade, 0.0)
            .with(PropertyId::Offset, Role::Slide(Edge::Bottom), 0.0);
        let list = ListPanel::new(
            PanelLifecycle::new(driver, config.animation.rest_offset),
            ListRefresher::new(PanelId::Wallpaper, &config.list, "No Wallpapers"),
            Orientation::Horizontal,
            config.list.clear_filter_delay(),
        );
        let wallpapers = source.load().unwrap_or_else(|err| {
            tracing::warn!("wallpaper listing failed: {err}");
            Vec::new()
        });
        tracing::info!(count = wallpapers.len(), "wallpapers listed");
        Self {
            list,
            wallpapers,
            previews: HashMap::new(),
        }
    }

    #[must_use]
    pub fn list(&self) -> &ListPanel {
        &self.list
    }

    /// Image paths that still need a thumbnail.
    pub fn preview_paths(&self) -> impl Iterator<Item = &Path> + '_ {
        self.wallpapers
            .iter()
            .filter_map(|w| w.preview_path())
            .filter(|path| !self.previews.contains_key(*path))
    }

    #[must_use]
    pub fn preview(&self, path: &Path) -> Option<&Rc<Preview>> {
        self.previews.get(path)
    }

    /// Store a decoded thumbnail. Re-renders if it belongs to a visible
    /// wallpaper of a shown panel.
    pub fn on_preview(&mut self, path: PathBuf, preview: Preview, cx: &mut PanelCx<'_>) {
        let visible = self
            .list
            .refresher()
            .visible()
            .iter()
            .any(|w| w.preview_path() == Some(path.as_path()));
        self.previews.insert(path, Rc::new(preview));
        if visible && self.state().is_shown() {
            self.list.rerender(cx);
        }
    }

    fn refilter(&mut self, cx: &mut PanelCx<'_>) {
        let text = self.list.filter().to_string();
        self.list.refresh(&self.wallpapers, &text, cx);
    }
}

fn wallpaper_item(candidate: &dyn Candidate, previews: &HashMap<PathBuf, Rc<Preview>>) -> RenderedItem {
    let preview = candidate
        .preview_path()
        .and_then(|path| previews.get(path))
        .cloned();
    plain_item(candidate).with_preview(preview)
}

impl Panel for WallpaperPanel {
    fn id(&self) -> PanelId {
        PanelId::Wallpaper
    }

    fn state(&self) -> PanelState {
        self.list.state()
    }

    fn show(&mut self, cx: &mut PanelCx<'_>) {
        let text = self.list.filter().to_string();
        let previews = &self.previews;
        let render = |c: &dyn Candidate| wallpaper_item(c, previews);
        self.list.show(&self.wallpapers, &text, cx, &render);
    }

    fn hide(&mut self, cx: &mut PanelCx<'_>) {
        self.list.hide(cx);
    }

    fn handle_key(&mut self, key: LogicalKey, cx: &mut PanelCx<'_>) -> Option<ShellCommand> {
        match self.list.handle_key(key, cx) {
            ListEvent::FilterChanged => {
                self.refilter(cx);
                None
            }
            ListEvent::Activate(candidate) => self.list.activate(&candidate, cx),
            ListEvent::None => None,
        }
    }

    fn on_timer(&mut self, fired: Fired, cx: &mut PanelCx<'_>) -> Option<ShellCommand> {
        let previews = &self.previews;
        let render = |c: &dyn Candidate| wallpaper_item(c, previews);
        if self.list.on_timer(fired, cx, &render).is_filter_changed() {
            self.refilter(cx);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::WallpaperPanel;
    use crate::collaborators::CandidateRef;
    use crate::panels::Panel;
    use crate::testing::{FakeCandidate, PanelHarness, VecSource};
    use halo_config::ShellConfig;
    use halo_types::PanelId;
    use halo_types::ui::{FocusCursor, LogicalKey, Preview};
    use std::path::{Path, PathBuf};
    use std::rc::Rc;
    use std::time::Duration;

    const MS: Duration = Duration::from_millis(1);

    fn wallpapers(names: &[&str]) -> Vec<CandidateRef> {
        names
            .iter()
            .map(|name| {
                Rc::new(FakeCandidate::new(*name).with_preview(format!("/walls/{name}")))
                    as CandidateRef
            })
            .collect()
    }

    fn panel(names: &[&str]) -> WallpaperPanel {
        WallpaperPanel::new(
            &ShellConfig::default(),
            Box::new(VecSource::new(wallpapers(names))),
        )
    }

    fn pixel() -> Preview {
        Preview::new(1, 1, vec![[1, 2, 3]]).expect("valid")
    }

    #[test]
    fn lists_preview_paths_until_decoded() {
        let mut h = PanelHarness::new();
        let mut panel = panel(&["a.png", "b.png"]);
        assert_eq!(panel.preview_paths().count(), 2);
        panel.on_preview(PathBuf::from("/walls/a.png"), pixel(), &mut h.cx());
        let pending: Vec<&Path> = panel.preview_paths().collect();
        assert_eq!(pending, [Path::new("/walls/b.png")]);
    }

    #[test]
    fn preview_for_visible_wallpaper_rerenders_when_shown() {
        let mut h = PanelHarness::new();
        let mut panel = panel(&["a.png", "b.png"]);
        panel.show(&mut h.cx());
        h.run(&mut panel, MS * 1000);
        let before = panel.list().refresher().rebuild_count();

        panel.on_preview(PathBuf::from("/walls/a.png"), pixel(), &mut h.cx());
        h.run(&mut panel, MS * 200);
        assert_eq!(panel.list().refresher().rebuild_count(), before + 1);
        assert!(h.sink.items(PanelId::Wallpaper)[0].preview.is_some());
    }

    #[test]
    fn preview_while_hidden_waits_for_show() {
        let mut h = PanelHarness::new();
        let mut panel = panel(&["a.png"]);
        panel.on_preview(PathBuf::from("/walls/a.png"), pixel(), &mut h.cx());
        assert!(h.timers.is_empty());
        panel.show(&mut h.cx());
        assert!(h.sink.items(PanelId::Wallpaper)[0].preview.is_some());
    }

    #[test]
    fn arrows_walk_the_strip() {
        let mut h = PanelHarness::new();
        let mut panel = panel(&["a.png", "b.png", "c.png"]);
        panel.show(&mut h.cx());
        panel.handle_key(LogicalKey::Right, &mut h.cx());
        panel.handle_key(LogicalKey::Right, &mut h.cx());
        assert_eq!(panel.list().cursor(), FocusCursor::List { index: 1 });
    }

    #[test]
    fn empty_directory_shows_placeholder() {
        let mut h = PanelHarness::new();
        let mut panel = panel(&[]);
        panel.show(&mut h.cx());
        assert_eq!(h.sink.placeholder(PanelId::Wallpaper), Some("No Wallpapers"));
    }
}
