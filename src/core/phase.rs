//! Game phases.

use serde::{Deserialize, Serialize};

/// Where the session is in the day/night cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Seating and role assignment.
    Setup,
    /// Moderator review of the assignment before the first night.
    Check,
    FirstNight,
    Day,
    /// Executions are done; dusk housekeeping runs here.
    Dusk,
    Night,
    /// Announcing who died overnight.
    DawnReport,
    GameOver,
}

impl Phase {
    #[must_use]
    pub const fn is_night(self) -> bool {
        matches!(self, Phase::FirstNight | Phase::Night)
    }

    #[must_use]
    pub const fn is_first_night(self) -> bool {
        matches!(self, Phase::FirstNight)
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Phase::Setup => "setup",
            Phase::Check => "check",
            Phase::FirstNight => "first night",
            Phase::Day => "day",
            Phase::Dusk => "dusk",
            Phase::Night => "night",
            Phase::DawnReport => "dawn",
            Phase::GameOver => "game over",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
