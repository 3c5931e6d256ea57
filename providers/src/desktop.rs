//! Installed applications from XDG `.desktop` files.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use halo_engine::{Activation, Candidate, CandidateRef, CandidateSource};
use halo_types::ProviderError;

use crate::process;

/// The subset of a desktop entry the launcher needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesktopEntry {
    pub name: String,
    pub comment: Option<String>,
    /// Command line with field codes already removed.
    pub exec: String,
}

impl Candidate for DesktopEntry {
    fn title(&self) -> &str {
        &self.name
    }

    fn subtitle(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    fn activate(&self) -> Result<Activation, ProviderError> {
        tracing::info!(app = %self.name, "launching");
        process::shell_detached(&self.exec)?;
        Ok(Activation::Done)
    }
}

/// Parse the `[Desktop Entry]` group of a desktop file.
///
/// Returns `None` for non-applications, hidden entries and entries without
/// a name or command.
pub fn parse_desktop_entry(text: &str) -> Option<DesktopEntry> {
    let mut in_entry = false;
    let mut name = None;
    let mut generic_name = None;
    let mut comment = None;
    let mut exec = None;
    let mut is_application = false;

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if line.starts_with('[') {
            in_entry = line == "[Desktop Entry]";
            continue;
        }
        if !in_entry {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let value = value.trim();
        match key.trim() {
            "Type" => is_application = value == "Application",
            "Name" => name = Some(value.to_string()),
            "GenericName" => generic_name = Some(value.to_string()),
            "Comment" => comment = Some(value.to_string()),
            "Exec" => exec = Some(strip_field_codes(value)),
            "NoDisplay" | "Hidden" if value == "true" => return None,
            _ => {}
        }
    }

    if !is_application {
        return None;
    }
    let exec = exec.filter(|exec| !exec.is_empty())?;
    Some(DesktopEntry {
        name: name.filter(|name| !name.is_empty())?,
        comment: comment.or(generic_name),
        exec,
    })
}

/// Remove `%f`, `%U` and friends; `%%` is a literal percent.
fn strip_field_codes(exec: &str) -> String {
    let mut out = String::with_capacity(exec.len());
    let mut chars = exec.chars();
    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        if chars.next() == Some('%') {
            out.push('%');
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Scans application directories in XDG precedence order.
pub struct DesktopApps {
    dirs: Vec<PathBuf>,
}

impl Default for DesktopApps {
    fn default() -> Self {
        Self::new(application_dirs())
    }
}

impl DesktopApps {
    pub fn new(dirs: Vec<PathBuf>) -> Self {
        Self { dirs }
    }
}

/// `$XDG_DATA_HOME/applications` followed by each `$XDG_DATA_DIRS` entry.
pub fn application_dirs() -> Vec<PathBuf> {
    let data_dirs = std::env::var("XDG_DATA_DIRS")
        .ok()
        .filter(|dirs| !dirs.is_empty())
        .unwrap_or_else(|| "/usr/local/share:/usr/share".to_string());
    dirs::data_dir()
        .into_iter()
        .chain(data_dirs.split(':').filter(|d| !d.is_empty()).map(PathBuf::from))
        .map(|dir| dir.join("applications"))
        .collect()
}

impl CandidateSource for DesktopApps {
    /// Entries sorted by name. A desktop-file id seen in an earlier
    /// directory shadows the same id in later ones.
    fn load(&mut self) -> Result<Vec<CandidateRef>, ProviderError> {
        let mut seen = HashSet::new();
        let mut entries = Vec::new();
        for dir in &self.dirs {
            let mut files = Vec::new();
            collect_desktop_files(dir, dir, &mut files);
            files.sort();
            for (id, path) in files {
                if !seen.insert(id) {
                    continue;
                }
                match fs::read_to_string(&path) {
                    Ok(text) => entries.extend(parse_desktop_entry(&text)),
                    Err(err) => tracing::debug!(path = %path.display(), "skipping desktop file: {err}"),
                }
            }
        }
        entries.sort_by_cached_key(|entry| entry.name.to_lowercase());
        tracing::debug!(count = entries.len(), "loaded applications");
        Ok(entries
            .into_iter()
            .map(|entry| Rc::new(entry) as CandidateRef)
            .collect())
    }
}

/// Desktop-file id is the path relative to the applications dir with `/`
/// replaced by `-`.
fn collect_desktop_files(root: &Path, dir: &Path, out: &mut Vec<(String, PathBuf)>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_desktop_files(root, &path, out);
        } else if path.extension().is_some_and(|ext| ext == "desktop") {
            let Ok(relative) = path.strip_prefix(root) else {
                continue;
            };
            let id = relative.to_string_lossy().replace('/', "-");
            out.push((id, path));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{DesktopApps, DesktopEntry, parse_desktop_entry, strip_field_codes};
    use halo_engine::CandidateSource;
    use std::fs;
    use std::path::Path;

    const FIREFOX: &str = "[Desktop Entry]
Type=Application
Name=Firefox
Name[de]=Firefox Webbrowser
GenericName=Web Browser
Exec=firefox %u
Icon=firefox

[Desktop Action new-window]
Name=New Window
Exec=firefox --new-window %u
";

    #[test]
    fn parses_main_group_only() {
        assert_eq!(
            parse_desktop_entry(FIREFOX),
            Some(DesktopEntry {
                name: "Firefox".to_string(),
                comment: Some("Web Browser".to_string()),
                exec: "firefox".to_string(),
            })
        );
    }

    #[test]
    fn hidden_and_non_applications_are_skipped() {
        let hidden = "[Desktop Entry]\nType=Application\nName=Helper\nExec=helper\nNoDisplay=true\n";
        assert_eq!(parse_desktop_entry(hidden), None);
        let link = "[Desktop Entry]\nType=Link\nName=Docs\nURL=https://example.org\n";
        assert_eq!(parse_desktop_entry(link), None);
        let no_exec = "[Desktop Entry]\nType=Application\nName=Broken\n";
        assert_eq!(parse_desktop_entry(no_exec), None);
    }

    #[test]
    fn field_codes_removed() {
        assert_eq!(strip_field_codes("nautilus --new-window %U"), "nautilus --new-window");
        assert_eq!(strip_field_codes("printf 100%% %f"), "printf 100%");
    }

    fn write(dir: &Path, name: &str, title: &str) {
        fs::create_dir_all(dir).unwrap();
        fs::write(
            dir.join(name),
            format!("[Desktop Entry]\nType=Application\nName={title}\nExec={title}\n"),
        )
        .unwrap();
    }

    #[test]
    fn user_entries_shadow_system_ones_and_sort_by_name() {
        let root = tempfile::tempdir().unwrap();
        let user = root.path().join("user");
        let system = root.path().join("system");
        write(&user, "org.mozilla.firefox.desktop", "Firefox Nightly");
        write(&system, "org.mozilla.firefox.desktop", "Firefox");
        write(&system, "files.desktop", "files");
        write(&system.join("kde"), "fish.desktop", "Fish");

        let mut apps = DesktopApps::new(vec![user, system, root.path().join("missing")]);
        let titles: Vec<String> = apps
            .load()
            .unwrap()
            .iter()
            .map(|c| c.title().to_string())
            .collect();
        assert_eq!(titles, ["files", "Firefox Nightly", "Fish"]);
    }
}
