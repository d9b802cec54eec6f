//! Role definitions: static character data.
//!
//! A `RoleDefinition` holds what a character is (faction, ability text) and
//! when and how it acts at night. Seat-specific state (poisoned, dead,
//! tokens spent) lives on the `Seat`, never here.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{Capability, RoleId, RoleType, SeatId};

use super::effect::{HandlerContext, HandlerOutput};
use super::targeting::TargetSpec;

/// Where a role sits in the night order.
#[derive(Clone, Copy, Debug)]
pub enum NightOrder {
    /// Same value every night.
    Fixed(i32),
    /// Depends on whether it is the first night.
    ByNight(fn(bool) -> i32),
}

impl NightOrder {
    /// Resolve the order for a night. Zero or below means "does not wake".
    #[must_use]
    pub fn resolve(self, first_night: bool) -> i32 {
        match self {
            NightOrder::Fixed(n) => n,
            NightOrder::ByNight(f) => f(first_night),
        }
    }
}

/// Machine-readable tag telling the presentation layer which confirmation
/// dialog fits the action.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionTag {
    /// Nothing to do; do not wake.
    #[default]
    Skip,
    /// Wake, deliver information, no choice.
    Info,
    /// Choose players to learn something about.
    Inspect,
    /// Learn about a death (Ravenkeeper, Undertaker).
    InspectDeath,
    /// Look at the Grimoire.
    Grimoire,
    Kill,
    /// Kill, or choose no one.
    KillOrSkip,
    Poison,
    Protect,
    /// Place a marker (Butler master, Evil Twin, Witch curse).
    Mark,
    /// Change a character (Pit-Hag, Snake Charmer, Professor).
    Transform,
    /// Ability the moderator must adjudicate by hand.
    Manual,
}

impl ActionTag {
    /// Whether the action requires the moderator to pick seats.
    #[must_use]
    pub const fn takes_targets(self) -> bool {
        !matches!(self, ActionTag::Skip | ActionTag::Info | ActionTag::Grimoire)
    }
}

/// How often a character receives information. Drives drunk misinformation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum InfoCadence {
    #[default]
    None,
    /// Learns once (first night, or a one-shot).
    Once,
    /// Learns every night.
    EveryNight,
}

/// The three lines read to a waking player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueLines {
    pub wake: String,
    pub instruction: String,
    pub close: String,
}

impl DialogueLines {
    /// Standard lines built from the display name and the instruction.
    #[must_use]
    pub fn standard(seat: SeatId, name: &str, instruction: impl Into<String>) -> Self {
        Self {
            wake: format!("Wake {seat} ({name})."),
            instruction: instruction.into(),
            close: format!("{seat} ({name}), close your eyes."),
        }
    }
}

/// A night action configuration.
///
/// ## Example
///
/// ```
/// use clocktower_engine::roles::{ActionTag, NightAction, NightOrder, TargetSpec};
///
/// let monk = NightAction::new(NightOrder::Fixed(12), ActionTag::Protect)
///     .with_targets(TargetSpec::exactly(1).not_self().alive())
///     .with_instruction("Choose a player (not yourself): they are safe from the Demon tonight.");
///
/// assert_eq!(monk.order.resolve(false), 12);
/// assert_eq!(monk.targets.min, 1);
/// ```
#[derive(Clone, Debug)]
pub struct NightAction {
    pub order: NightOrder,
    pub action: ActionTag,
    pub targets: TargetSpec,
    /// What the moderator asks of the player.
    pub instruction: &'static str,
    /// Custom dialogue; standard lines are built from `instruction` otherwise.
    pub dialogue: Option<fn(SeatId, bool) -> DialogueLines>,
    /// Pure effect function. `None` means the action changes nothing.
    pub handler: Option<fn(&HandlerContext<'_>) -> HandlerOutput>,
    /// Token the seat must still hold to be queued.
    pub requires: Option<Capability>,
    /// Only queued if the seat died tonight (Ravenkeeper).
    pub only_if_died_tonight: bool,
    /// Check on the chosen character, run before the handler.
    pub role_rule: Option<fn(&HandlerContext<'_>) -> Result<(), String>>,
    /// The handler still runs when the actor is poisoned or drunk.
    pub works_while_impaired: bool,
}

impl NightAction {
    #[must_use]
    pub fn new(order: NightOrder, action: ActionTag) -> Self {
        Self {
            order,
            action,
            targets: TargetSpec::none(),
            instruction: "",
            dialogue: None,
            handler: None,
            requires: None,
            only_if_died_tonight: false,
            role_rule: None,
            works_while_impaired: false,
        }
    }

    #[must_use]
    pub fn with_targets(mut self, targets: TargetSpec) -> Self {
        self.targets = targets;
        self
    }

    #[must_use]
    pub fn with_instruction(mut self, instruction: &'static str) -> Self {
        self.instruction = instruction;
        self
    }

    #[must_use]
    pub fn with_dialogue(mut self, dialogue: fn(SeatId, bool) -> DialogueLines) -> Self {
        self.dialogue = Some(dialogue);
        self
    }

    #[must_use]
    pub fn with_handler(mut self, handler: fn(&HandlerContext<'_>) -> HandlerOutput) -> Self {
        self.handler = Some(handler);
        self
    }

    #[must_use]
    pub fn requiring(mut self, cap: Capability) -> Self {
        self.requires = Some(cap);
        self
    }

    #[must_use]
    pub fn only_if_died_tonight(mut self) -> Self {
        self.only_if_died_tonight = true;
        self
    }

    #[must_use]
    pub fn with_role_rule(mut self, rule: fn(&HandlerContext<'_>) -> Result<(), String>) -> Self {
        self.role_rule = Some(rule);
        self
    }

    #[must_use]
    pub fn working_while_impaired(mut self) -> Self {
        self.works_while_impaired = true;
        self
    }

    /// Lines to read for a seat performing this action.
    #[must_use]
    pub fn dialogue_for(&self, seat: SeatId, name: &str, first_night: bool) -> DialogueLines {
        match self.dialogue {
            Some(f) => f(seat, first_night),
            None => DialogueLines::standard(seat, name, self.instruction),
        }
    }
}

/// Static character definition.
///
/// ## Example
///
/// ```
/// use clocktower_engine::core::{RoleId, RoleType};
/// use clocktower_engine::roles::{ActionTag, NightAction, NightOrder, RoleDefinition};
///
/// let chef = RoleDefinition::new("chef", "Chef", RoleType::Townsfolk)
///     .with_ability("You start knowing how many pairs of evil players there are.")
///     .with_first_night(NightAction::new(NightOrder::Fixed(36), ActionTag::Info));
///
/// assert_eq!(chef.id, RoleId::new("chef"));
/// assert!(chef.action_for(true).is_some());
/// assert!(chef.action_for(false).is_none());
/// assert!(chef.is_first_night_only());
/// ```
#[derive(Clone, Debug)]
pub struct RoleDefinition {
    pub id: RoleId,
    pub name: &'static str,
    pub role_type: RoleType,
    pub ability: &'static str,
    pub first_night: Option<NightAction>,
    pub other_nights: Option<NightAction>,
    pub info: InfoCadence,
    /// Tokens granted when the role is assigned.
    pub grants: SmallVec<[Capability; 1]>,
    /// Queued while dead (information anchored to the moment of death).
    pub wakes_when_dead: bool,
}

impl RoleDefinition {
    #[must_use]
    pub fn new(id: &'static str, name: &'static str, role_type: RoleType) -> Self {
        Self {
            id: RoleId::new(id),
            name,
            role_type,
            ability: "",
            first_night: None,
            other_nights: None,
            info: InfoCadence::None,
            grants: SmallVec::new(),
            wakes_when_dead: false,
        }
    }

    #[must_use]
    pub fn with_ability(mut self, ability: &'static str) -> Self {
        self.ability = ability;
        self
    }

    #[must_use]
    pub fn with_first_night(mut self, action: NightAction) -> Self {
        self.first_night = Some(action);
        self
    }

    #[must_use]
    pub fn with_other_nights(mut self, action: NightAction) -> Self {
        self.other_nights = Some(action);
        self
    }

    /// Same action on every night.
    #[must_use]
    pub fn with_every_night(self, action: NightAction) -> Self {
        self.with_first_night(action.clone()).with_other_nights(action)
    }

    #[must_use]
    pub fn with_info(mut self, cadence: InfoCadence) -> Self {
        self.info = cadence;
        self
    }

    #[must_use]
    pub fn granting(mut self, cap: Capability) -> Self {
        self.grants.push(cap);
        self
    }

    #[must_use]
    pub fn waking_when_dead(mut self) -> Self {
        self.wakes_when_dead = true;
        self
    }

    /// The action for a night. The first night falls back to nothing, not
    /// to the other-nights config: a role without a first-night entry does
    /// not wake on the first night.
    #[must_use]
    pub fn action_for(&self, first_night: bool) -> Option<&NightAction> {
        if first_night {
            self.first_night.as_ref()
        } else {
            self.other_nights.as_ref()
        }
    }

    /// Has a first-night action and no other-nights action.
    #[must_use]
    pub fn is_first_night_only(&self) -> bool {
        self.first_night.is_some() && self.other_nights.is_none()
    }

    /// Whether the character is evil by default.
    #[must_use]
    pub fn is_evil(&self) -> bool {
        self.role_type.default_alignment().is_evil()
    }
}
