use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Operating system and architecture of the running process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlatformInfo {
    pub os: &'static str,
    pub arch: &'static str,
}

impl PlatformInfo {
    #[must_use]
    pub fn current() -> Self {
        Self {
            os: std::env::consts::OS,
            arch: std::env::consts::ARCH,
        }
    }

    #[must_use]
    pub fn is_windows(self) -> bool {
        self.os == "windows"
    }

    #[must_use]
    pub fn summary(self) -> String {
        format!("{} {}", self.os, self.arch)
    }
}

/// OS tuning a host can opt into.
///
/// Implementations return `Ok(true)` when the tweak took effect, `Ok(false)`
/// when it does not apply to this platform, and `Err` with a reason when it
/// was attempted and failed.
pub trait PlatformHooks {
    /// Raise the scheduler timer resolution so short waits stay short.
    fn boost_timer_resolution(&mut self) -> Result<bool, String>;

    /// Opt out of compositor DPI scaling so pixels map one-to-one.
    fn enable_hidpi_awareness(&mut self) -> Result<bool, String>;

    /// Undo anything `boost_timer_resolution` changed.
    fn restore(&mut self) {}
}

/// Hooks for hosts that need no tuning.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPlatformHooks;

impl PlatformHooks for NoopPlatformHooks {
    fn boost_timer_resolution(&mut self) -> Result<bool, String> {
        Ok(false)
    }

    fn enable_hidpi_awareness(&mut self) -> Result<bool, String> {
        Ok(false)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformFixReport {
    pub os: String,
    pub timer_boosted: bool,
    pub hidpi_set: bool,
}

/// Applies every hook once. Failures are logged and reported as `false`;
/// they never abort startup.
pub fn apply_platform_fixes(hooks: &mut impl PlatformHooks) -> PlatformFixReport {
    let info = PlatformInfo::current();
    let timer_boosted = hooks.boost_timer_resolution().unwrap_or_else(|reason| {
        warn!(os = info.os, %reason, "timer resolution boost failed; frame timing may be inconsistent");
        false
    });
    let hidpi_set = hooks.enable_hidpi_awareness().unwrap_or_else(|reason| {
        warn!(os = info.os, %reason, "hidpi awareness could not be enabled");
        false
    });
    debug!(platform = %info.summary(), timer_boosted, hidpi_set, "platform fixes applied");
    PlatformFixReport {
        os: info.os.to_owned(),
        timer_boosted,
        hidpi_set,
    }
}

pub fn cleanup_platform(hooks: &mut impl PlatformHooks) {
    hooks.restore();
}

#[cfg(test)]
mod tests {
    use super::{PlatformHooks, apply_platform_fixes};

    struct FailingHooks {
        restored: bool,
    }

    impl PlatformHooks for FailingHooks {
        fn boost_timer_resolution(&mut self) -> Result<bool, String> {
            Err("status 0xC0000001".to_owned())
        }

        fn enable_hidpi_awareness(&mut self) -> Result<bool, String> {
            Ok(true)
        }

        fn restore(&mut self) {
            self.restored = true;
        }
    }

    #[test]
    fn failures_are_reported_not_raised() {
        let mut hooks = FailingHooks { restored: false };
        let report = apply_platform_fixes(&mut hooks);
        assert!(!report.timer_boosted);
        assert!(report.hidpi_set);

        super::cleanup_platform(&mut hooks);
        assert!(hooks.restored);
    }
}
