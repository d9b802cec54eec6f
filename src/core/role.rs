//! Role identity, faction types, and alignment.
//!
//! A `RoleId` is the stable string key used by the registry, the override
//! tables, and the jinx table (`"imp"`, `"fortune_teller"`, ...).

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Identifier of a character.
///
/// ```
/// use clocktower_engine::core::RoleId;
///
/// let imp = RoleId::new("imp");
/// assert_eq!(imp.as_str(), "imp");
/// assert_eq!(imp, "imp");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleId(Cow<'static, str>);

impl RoleId {
    /// Create a role id from a static key without allocating.
    #[must_use]
    pub const fn new(id: &'static str) -> Self {
        Self(Cow::Borrowed(id))
    }

    /// Create a role id from an owned string (e.g. parsed input).
    #[must_use]
    pub fn owned(id: impl Into<String>) -> Self {
        Self(Cow::Owned(id.into()))
    }

    /// The raw key.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this id equals the given key.
    #[must_use]
    pub fn is(&self, key: &str) -> bool {
        self.0 == key
    }
}

impl PartialEq<&str> for RoleId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl PartialEq<str> for RoleId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl std::fmt::Display for RoleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The five character categories.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoleType {
    Townsfolk,
    Outsider,
    Minion,
    Demon,
    Traveler,
}

impl RoleType {
    /// Default alignment of the category. Travelers are assigned an
    /// alignment at the table, so they default to good.
    #[must_use]
    pub const fn default_alignment(self) -> Alignment {
        match self {
            RoleType::Minion | RoleType::Demon => Alignment::Evil,
            _ => Alignment::Good,
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            RoleType::Townsfolk => "Townsfolk",
            RoleType::Outsider => "Outsider",
            RoleType::Minion => "Minion",
            RoleType::Demon => "Demon",
            RoleType::Traveler => "Traveler",
        }
    }
}

impl std::fmt::Display for RoleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Good or evil.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Alignment {
    Good,
    Evil,
}

impl Alignment {
    /// The other side.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Alignment::Good => Alignment::Evil,
            Alignment::Evil => Alignment::Good,
        }
    }

    #[must_use]
    pub const fn is_evil(self) -> bool {
        matches!(self, Alignment::Evil)
    }
}

impl std::fmt::Display for Alignment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Alignment::Good => f.write_str("good"),
            Alignment::Evil => f.write_str("evil"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_id_equality_across_ownership() {
        assert_eq!(RoleId::new("imp"), RoleId::owned("imp"));
        assert!(RoleId::owned(String::from("monk")).is("monk"));
    }

    #[test]
    fn test_role_id_serde_is_plain_string() {
        let json = serde_json::to_string(&RoleId::new("spy")).unwrap();
        assert_eq!(json, "\"spy\"");
        let back: RoleId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, "spy");
    }

    #[test]
    fn test_default_alignment() {
        assert_eq!(RoleType::Demon.default_alignment(), Alignment::Evil);
        assert_eq!(RoleType::Minion.default_alignment(), Alignment::Evil);
        assert_eq!(RoleType::Outsider.default_alignment(), Alignment::Good);
        assert_eq!(Alignment::Good.opposite(), Alignment::Evil);
    }
}
