//! PipeWire volume control through `wpctl`.

use halo_engine::{AudioControl, LevelControl, SinkProbe};
use halo_types::ProviderError;

use crate::process;

const WPCTL: &str = "wpctl";
const DEFAULT_SINK: &str = "@DEFAULT_AUDIO_SINK@";

/// Default sink volume and mute state.
#[derive(Debug, Clone, Copy, Default)]
pub struct Wpctl;

impl Wpctl {
    fn volume(&self) -> Result<(u8, bool), ProviderError> {
        let out = process::output(WPCTL, &["get-volume", DEFAULT_SINK])?;
        parse_volume(&out).ok_or_else(|| ProviderError::parse(WPCTL, out.trim()))
    }
}

impl LevelControl for Wpctl {
    fn read(&mut self) -> Result<u8, ProviderError> {
        self.volume().map(|(level, _)| level)
    }

    fn nudge(&mut self, delta: i16) -> Result<(), ProviderError> {
        if delta == 0 {
            return Ok(());
        }
        let step = percent_step(delta);
        process::spawn_detached(WPCTL, &["set-volume", "-l", "1.0", DEFAULT_SINK, step.as_str()])
    }
}

impl AudioControl for Wpctl {
    fn read_muted(&mut self) -> Result<bool, ProviderError> {
        self.volume().map(|(_, muted)| muted)
    }

    fn toggle_mute(&mut self) -> Result<(), ProviderError> {
        process::spawn_detached(WPCTL, &["set-mute", DEFAULT_SINK, "toggle"])
    }
}

impl SinkProbe for Wpctl {
    fn current_sink(&mut self) -> Result<String, ProviderError> {
        let out = process::output(WPCTL, &["inspect", DEFAULT_SINK])?;
        parse_node_name(&out).ok_or_else(|| ProviderError::parse(WPCTL, out.trim()))
    }
}

/// `"5%+"` / `"5%-"` as understood by wpctl and brightnessctl.
pub(crate) fn percent_step(delta: i16) -> String {
    let sign = if delta > 0 { '+' } else { '-' };
    format!("{}%{sign}", delta.unsigned_abs())
}

/// Parse `Volume: 0.45` or `Volume: 0.45 [MUTED]`.
///
/// Volumes above 1.0 (over-amplified sinks) clamp to 100.
fn parse_volume(out: &str) -> Option<(u8, bool)> {
    let mut parts = out.split_whitespace();
    if parts.next()? != "Volume:" {
        return None;
    }
    let fraction: f32 = parts.next()?.parse().ok()?;
    let level = (fraction * 100.0).round().clamp(0.0, 100.0) as u8;
    let muted = parts.any(|part| part == "[MUTED]");
    Some((level, muted))
}

/// Pull `node.name` out of `wpctl inspect` output.
fn parse_node_name(out: &str) -> Option<String> {
    out.lines().find_map(|line| {
        let line = line.trim_start().trim_start_matches('*').trim();
        let value = line.strip_prefix("node.name")?.trim_start().strip_prefix('=')?;
        let name = value.trim().trim_matches('"');
        (!name.is_empty()).then(|| name.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::{parse_node_name, parse_volume, percent_step};

    #[test]
    fn volume_with_and_without_mute() {
        assert_eq!(parse_volume("Volume: 0.45\n"), Some((45, false)));
        assert_eq!(parse_volume("Volume: 0.30 [MUTED]\n"), Some((30, true)));
    }

    #[test]
    fn volume_clamps_over_amplification() {
        assert_eq!(parse_volume("Volume: 1.50"), Some((100, false)));
    }

    #[test]
    fn garbage_volume_is_rejected() {
        assert_eq!(parse_volume(""), None);
        assert_eq!(parse_volume("Volume: loud"), None);
        assert_eq!(parse_volume("Brightness: 0.5"), None);
    }

    #[test]
    fn node_name_from_inspect() {
        let out = r#"id 56, type PipeWire:Interface:Node
    alsa.card = "0"
  * node.description = "Built-in Audio Analog Stereo"
  * node.name = "alsa_output.pci-0000_00_1f.3.analog-stereo"
    node.nick = "ALC257 Analog"
"#;
        assert_eq!(
            parse_node_name(out).as_deref(),
            Some("alsa_output.pci-0000_00_1f.3.analog-stereo")
        );
        assert_eq!(parse_node_name("id 56, type PipeWire:Interface:Node"), None);
    }

    #[test]
    fn step_formatting() {
        assert_eq!(percent_step(5), "5%+");
        assert_eq!(percent_step(-5), "5%-");
    }
}
