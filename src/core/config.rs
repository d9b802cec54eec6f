//! Session configuration.
//!
//! The moderator picks a script and a handful of house settings before the
//! first night. Everything random the engine does is seeded from here.

use serde::{Deserialize, Serialize};

use super::role::RoleId;

/// Trouble Brewing character pool.
pub const TROUBLE_BREWING: &[&str] = &[
    "washerwoman", "librarian", "investigator", "chef", "empath", "fortune_teller",
    "undertaker", "monk", "ravenkeeper", "virgin", "slayer", "soldier", "mayor",
    "butler", "drunk", "recluse", "saint",
    "poisoner", "spy", "scarlet_woman", "baron",
    "imp",
];

/// Bad Moon Rising character pool.
pub const BAD_MOON_RISING: &[&str] = &[
    "grandmother", "sailor", "chambermaid", "exorcist", "innkeeper", "gambler",
    "gossip", "courtier", "professor", "minstrel", "tea_lady", "pacifist", "fool",
    "tinker", "moonchild", "goon", "lunatic",
    "godfather", "devils_advocate", "assassin", "mastermind",
    "zombuul", "pukka", "shabaloth", "po",
];

/// Sects & Violets character pool.
pub const SECTS_AND_VIOLETS: &[&str] = &[
    "clockmaker", "dreamer", "snake_charmer", "mathematician", "flowergirl",
    "town_crier", "oracle", "savant", "seamstress", "philosopher", "artist",
    "juggler", "sage",
    "mutant", "sweetheart", "barber", "klutz",
    "evil_twin", "witch", "cerenovus", "pit_hag",
    "fang_gu", "vigormortis", "no_dashii", "vortox",
];

/// The edition (character pool) being played.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Script {
    #[default]
    TroubleBrewing,
    BadMoonRising,
    SectsAndViolets,
    /// A custom script with its own pool.
    Custom { name: String, roles: Vec<RoleId> },
}

impl Script {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Script::TroubleBrewing => "Trouble Brewing",
            Script::BadMoonRising => "Bad Moon Rising",
            Script::SectsAndViolets => "Sects & Violets",
            Script::Custom { name, .. } => name,
        }
    }

    /// Characters on the script.
    #[must_use]
    pub fn roles(&self) -> Vec<RoleId> {
        let keys = match self {
            Script::TroubleBrewing => TROUBLE_BREWING,
            Script::BadMoonRising => BAD_MOON_RISING,
            Script::SectsAndViolets => SECTS_AND_VIOLETS,
            Script::Custom { roles, .. } => return roles.clone(),
        };
        keys.iter().copied().map(RoleId::new).collect()
    }

    #[must_use]
    pub fn contains(&self, role: &str) -> bool {
        match self {
            Script::TroubleBrewing => TROUBLE_BREWING.contains(&role),
            Script::BadMoonRising => BAD_MOON_RISING.contains(&role),
            Script::SectsAndViolets => SECTS_AND_VIOLETS.contains(&role),
            Script::Custom { roles, .. } => roles.iter().any(|r| r.is(role)),
        }
    }
}

/// How disguise-capable characters (Spy, Recluse) register.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisguiseMode {
    /// Always register as their true character.
    Off,
    /// Roll against `disguise_probability` at each decision point.
    #[default]
    Default,
    /// Always register as the disguise.
    Forced,
}

/// Session-wide settings.
///
/// ## Example
///
/// ```
/// use clocktower_engine::core::{DisguiseMode, Script, SessionConfig};
///
/// let config = SessionConfig::new(Script::BadMoonRising)
///     .with_seed(99)
///     .with_disguise(DisguiseMode::Forced, 1.0);
///
/// assert_eq!(config.seed, 99);
/// assert_eq!(config.disguise_mode, DisguiseMode::Forced);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub script: Script,

    /// Seed for every random decision in the session.
    pub seed: u64,

    pub disguise_mode: DisguiseMode,

    /// Chance a Spy registers as good under `DisguiseMode::Default`.
    pub disguise_probability: f64,

    /// Chance a poisoned information role hears a false answer.
    pub poisoned_fabrication_chance: f64,

    /// Chance a Drunk hears a false answer after the first one.
    pub drunk_repeat_fabrication_chance: f64,

    /// Enforce Djinn antagonism rules even without a Djinn in play.
    pub enforce_antagonism: bool,

    /// A living Vortox forces townsfolk information false.
    pub vortox_forces_falsehood: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            script: Script::default(),
            seed: 0,
            disguise_mode: DisguiseMode::Default,
            disguise_probability: 0.8,
            poisoned_fabrication_chance: 0.95,
            drunk_repeat_fabrication_chance: 0.5,
            enforce_antagonism: false,
            vortox_forces_falsehood: true,
        }
    }
}

impl SessionConfig {
    #[must_use]
    pub fn new(script: Script) -> Self {
        Self {
            script,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn with_disguise(mut self, mode: DisguiseMode, probability: f64) -> Self {
        self.disguise_mode = mode;
        self.disguise_probability = probability;
        self
    }

    #[must_use]
    pub fn with_fabrication_chances(mut self, poisoned: f64, drunk_repeat: f64) -> Self {
        self.poisoned_fabrication_chance = poisoned;
        self.drunk_repeat_fabrication_chance = drunk_repeat;
        self
    }

    #[must_use]
    pub fn with_antagonism(mut self, enforce: bool) -> Self {
        self.enforce_antagonism = enforce;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SessionConfig::default();
        assert_eq!(config.script, Script::TroubleBrewing);
        assert_eq!(config.disguise_mode, DisguiseMode::Default);
        assert!((config.disguise_probability - 0.8).abs() < f64::EPSILON);
        assert!(config.vortox_forces_falsehood);
    }

    #[test]
    fn test_script_pools() {
        assert!(Script::TroubleBrewing.contains("imp"));
        assert!(!Script::TroubleBrewing.contains("zombuul"));
        assert!(Script::BadMoonRising.contains("zombuul"));
        assert_eq!(Script::SectsAndViolets.roles().len(), SECTS_AND_VIOLETS.len());

        let custom = Script::Custom {
            name: "Teensy".into(),
            roles: vec![RoleId::new("chef"), RoleId::new("imp")],
        };
        assert!(custom.contains("chef"));
        assert_eq!(custom.name(), "Teensy");
    }

    #[test]
    fn test_config_serde() {
        let config = SessionConfig::new(Script::SectsAndViolets).with_seed(12);
        let json = serde_json::to_string(&config).unwrap();
        let back: SessionConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }
}
