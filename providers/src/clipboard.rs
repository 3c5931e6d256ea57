//! Clipboard history through `cliphist`.

use std::rc::Rc;

use halo_engine::{Activation, Candidate, CandidateRef, CandidateSource};
use halo_types::ProviderError;

use crate::process;

const CLIPHIST: &str = "cliphist";
const WL_COPY: &str = "wl-copy";
const BINARY_MARKER: &str = "[[ binary data";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipEntry {
    pub id: String,
    /// Preview line as printed by `cliphist list`.
    pub text: String,
    pub binary: bool,
}

impl Candidate for ClipEntry {
    fn title(&self) -> &str {
        &self.text
    }

    fn subtitle(&self) -> Option<&str> {
        self.binary.then_some("Image")
    }

    /// Entries match on their raw text only.
    fn match_text(&self) -> String {
        self.text.clone()
    }

    /// Decode the entry and put it back on the clipboard, off the control
    /// thread.
    fn activate(&self) -> Result<Activation, ProviderError> {
        process::resolve(CLIPHIST)?;
        process::resolve(WL_COPY)?;
        let id = self.id.clone();
        process::detach("clipboard-copy", move || {
            process::pipe(CLIPHIST, &["decode", id.as_str()], WL_COPY, &[])
        })?;
        Ok(Activation::Done)
    }
}

pub struct Cliphist {
    limit: usize,
}

impl Cliphist {
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }
}

impl CandidateSource for Cliphist {
    fn load(&mut self) -> Result<Vec<CandidateRef>, ProviderError> {
        let out = process::output(CLIPHIST, &["list"])?;
        Ok(parse_history(&out, self.limit)
            .into_iter()
            .map(|entry| Rc::new(entry) as CandidateRef)
            .collect())
    }
}

/// `cliphist list` prints `<id>\t<preview>` per line, newest first.
fn parse_history(out: &str, limit: usize) -> Vec<ClipEntry> {
    out.lines()
        .filter_map(|line| {
            let Some((id, text)) = line.split_once('\t') else {
                tracing::debug!(line, "skipping malformed cliphist line");
                return None;
            };
            Some(ClipEntry {
                id: id.trim().to_string(),
                text: text.to_string(),
                binary: text.contains(BINARY_MARKER),
            })
        })
        .take(limit)
        .collect()
}
