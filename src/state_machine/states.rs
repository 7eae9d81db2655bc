use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle states of a component instance on a host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum State {
    /// Initial state, also reached again after a successful wipe-out
    Init,
    Installing,
    Installed,
    InstallFailed,
    Starting,
    Started,
    StartFailed,
    Stopping,
    StopFailed,
    Uninstalling,
    Uninstalled,
    UninstallFailed,
    WipingOut,
    WipeoutFailed,
}

impl State {
    pub const ALL: &'static [State] = &[
        Self::Init,
        Self::Installing,
        Self::Installed,
        Self::InstallFailed,
        Self::Starting,
        Self::Started,
        Self::StartFailed,
        Self::Stopping,
        Self::StopFailed,
        Self::Uninstalling,
        Self::Uninstalled,
        Self::UninstallFailed,
        Self::WipingOut,
        Self::WipeoutFailed,
    ];

    /// Check if an operation is running against the component
    pub fn is_in_progress(&self) -> bool {
        matches!(
            self,
            Self::Installing
                | Self::Starting
                | Self::Stopping
                | Self::Uninstalling
                | Self::WipingOut
        )
    }

    /// Check if the last operation failed and may be restarted
    pub fn is_failed(&self) -> bool {
        matches!(
            self,
            Self::InstallFailed
                | Self::StartFailed
                | Self::StopFailed
                | Self::UninstallFailed
                | Self::WipeoutFailed
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Init => "INIT",
            Self::Installing => "INSTALLING",
            Self::Installed => "INSTALLED",
            Self::InstallFailed => "INSTALL_FAILED",
            Self::Starting => "STARTING",
            Self::Started => "STARTED",
            Self::StartFailed => "START_FAILED",
            Self::Stopping => "STOPPING",
            Self::StopFailed => "STOP_FAILED",
            Self::Uninstalling => "UNINSTALLING",
            Self::Uninstalled => "UNINSTALLED",
            Self::UninstallFailed => "UNINSTALL_FAILED",
            Self::WipingOut => "WIPING_OUT",
            Self::WipeoutFailed => "WIPEOUT_FAILED",
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for State {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|state| state.as_str() == s)
            .ok_or_else(|| format!("Invalid state: {s}"))
    }
}

impl Default for State {
    fn default() -> Self {
        Self::Init
    }
}
