//! power-profiles-daemon through `powerprofilesctl`.

use halo_engine::PowerProfileControl;
use halo_types::{PowerProfile, ProviderError};

use crate::process;

const POWERPROFILESCTL: &str = "powerprofilesctl";

#[derive(Debug, Clone, Copy, Default)]
pub struct PowerProfilesCtl;

impl PowerProfileControl for PowerProfilesCtl {
    fn active(&mut self) -> Result<PowerProfile, ProviderError> {
        let out = process::output(POWERPROFILESCTL, &["get"])?;
        PowerProfile::from_name(&out).ok_or_else(|| ProviderError::parse(POWERPROFILESCTL, out.trim()))
    }

    /// Blocks until the daemon has switched, so a following `active()`
    /// sees the new profile.
    fn set(&mut self, profile: PowerProfile) -> Result<(), ProviderError> {
        tracing::info!(profile = profile.as_str(), "switching power profile");
        process::run(POWERPROFILESCTL, &["set", profile.as_str()])
    }
}
