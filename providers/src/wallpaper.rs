//! Wallpapers from a directory, applied with `swww`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use halo_engine::{Activation, Candidate, CandidateRef, CandidateSource, Notification, Notifier, Urgency};
use halo_types::ProviderError;

use crate::notify::CommandNotifier;
use crate::process;

const EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "bmp"];
const CURRENT_LINK: &str = ".current.wall";

pub struct Wallpaper {
    name: String,
    path: PathBuf,
    link: Option<PathBuf>,
    notifier: CommandNotifier,
}

impl Candidate for Wallpaper {
    fn title(&self) -> &str {
        &self.name
    }

    fn preview_path(&self) -> Option<&Path> {
        Some(&self.path)
    }

    fn activate(&self) -> Result<Activation, ProviderError> {
        tracing::info!(wallpaper = %self.name, "applying wallpaper");
        let mut args = vec![
            "img",
            "--transition-fps",
            "144",
            "--transition-duration",
            "1",
            "-t",
            "any",
        ];
        let path = self.path.to_string_lossy();
        args.push(path.as_ref());
        process::spawn_detached("swww", &args)?;

        if let Some(link) = &self.link
            && let Err(source) = relink(link, &self.path)
        {
            return Err(ProviderError::Io {
                path: link.display().to_string(),
                source,
            });
        }

        let notification = Notification::new("Wallpaper", format!("Wallpaper changed to {}", self.name))
            .urgency(Urgency::Low)
            .icon(&self.path);
        if let Err(err) = self.notifier.notify(&notification) {
            tracing::debug!("wallpaper notification skipped: {err}");
        }
        Ok(Activation::Done)
    }
}

/// Point `link` at `target`, replacing whatever was there.
fn relink(link: &Path, target: &Path) -> io::Result<()> {
    if fs::symlink_metadata(link).is_ok() {
        fs::remove_file(link)?;
    }
    #[cfg(unix)]
    {
        std::os::unix::fs::symlink(target, link)
    }
    #[cfg(not(unix))]
    {
        fs::copy(target, link).map(drop)
    }
}

pub struct WallpaperDir {
    dir: PathBuf,
    link: Option<PathBuf>,
    notifier: CommandNotifier,
}

impl WallpaperDir {
    /// `link` defaults to `~/.current.wall`.
    pub fn new(dir: PathBuf, notifier: CommandNotifier) -> Self {
        Self {
            dir,
            link: dirs::home_dir().map(|home| home.join(CURRENT_LINK)),
            notifier,
        }
    }
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| EXTENSIONS.iter().any(|known| ext.eq_ignore_ascii_case(known)))
}

impl CandidateSource for WallpaperDir {
    /// Image files sorted by name. A missing directory is an empty list.
    fn load(&mut self) -> Result<Vec<CandidateRef>, ProviderError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                tracing::info!(dir = %self.dir.display(), "wallpaper directory does not exist");
                return Ok(Vec::new());
            }
            Err(source) => {
                return Err(ProviderError::Io {
                    path: self.dir.display().to_string(),
                    source,
                });
            }
        };
        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|entry| entry.path()))
            .filter(|path| path.is_file() && is_image(path))
            .collect();
        paths.sort();
        Ok(paths
            .into_iter()
            .map(|path| {
                let name = path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_default();
                Rc::new(Wallpaper {
                    name,
                    path,
                    link: self.link.clone(),
                    notifier: self.notifier.clone(),
                }) as CandidateRef
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::{WallpaperDir, relink};
    use crate::notify::CommandNotifier;
    use halo_engine::CandidateSource;
    use std::fs;

    #[test]
    fn lists_images_sorted_by_name() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.JPG", "a.png", "notes.txt", "c.bmp"] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }
        fs::create_dir(dir.path().join("nested.png")).unwrap();

        let mut source = WallpaperDir::new(dir.path().to_path_buf(), CommandNotifier::detect());
        let walls = source.load().unwrap();
        let names: Vec<&str> = walls.iter().map(|w| w.title()).collect();
        assert_eq!(names, ["a.png", "b.JPG", "c.bmp"]);
        assert_eq!(walls[0].preview_path(), Some(dir.path().join("a.png").as_path()));
    }

    #[test]
    fn missing_directory_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let mut source = WallpaperDir::new(dir.path().join("nope"), CommandNotifier::detect());
        assert!(source.load().unwrap().is_empty());
    }

    #[test]
    fn relink_replaces_existing_link() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("first.png");
        let second = dir.path().join("second.png");
        fs::write(&first, b"1").unwrap();
        fs::write(&second, b"2").unwrap();
        let link = dir.path().join(".current.wall");

        relink(&link, &first).unwrap();
        relink(&link, &second).unwrap();
        assert_eq!(fs::read(&link).unwrap(), b"2");
    }
}
