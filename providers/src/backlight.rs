//! Screen brightness through `brightnessctl`.

use halo_engine::LevelControl;
use halo_types::ProviderError;

use crate::audio::percent_step;
use crate::process;

const BRIGHTNESSCTL: &str = "brightnessctl";

#[derive(Debug, Clone, Copy, Default)]
pub struct Brightnessctl;

impl Brightnessctl {
    fn raw(what: &str) -> Result<u32, ProviderError> {
        let out = process::output(BRIGHTNESSCTL, &[what])?;
        out.trim()
            .parse()
            .map_err(|_| ProviderError::parse(BRIGHTNESSCTL, out.trim()))
    }
}

impl LevelControl for Brightnessctl {
    fn read(&mut self) -> Result<u8, ProviderError> {
        let current = Self::raw("get")?;
        let max = Self::raw("max")?;
        to_percent(current, max).ok_or_else(|| ProviderError::parse(BRIGHTNESSCTL, "max 0"))
    }

    fn nudge(&mut self, delta: i16) -> Result<(), ProviderError> {
        if delta == 0 {
            return Ok(());
        }
        process::spawn_detached(BRIGHTNESSCTL, &["set", percent_step(delta).as_str()])
    }
}

fn to_percent(current: u32, max: u32) -> Option<u8> {
    if max == 0 {
        return None;
    }
    let percent = u64::from(current.min(max)) * 100 / u64::from(max);
    Some(percent as u8)
}
