//! What the moderator says and sees when a seat wakes.
//!
//! `night_info` looks up the acting role in a `RenderTable` and runs its
//! render function. Information roles return two channels: the line read
//! to the player, and the moderator guidance. When the answer is
//! fabricated, only the guidance carries the true value.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::context::SessionContext;
use crate::core::{Board, RoleId, RoleType, Seat, SeatId};
use crate::error::{EngineError, EngineResult};
use crate::roles::{ActionChoice, ActionTag, DialogueLines, NightAction, RoleDefinition, RoleRegistry};

use super::misinfo::{fake_count, fake_verdict, should_fabricate, FakeReason};
use super::registration::{registration, RegistrationResult};

/// Everything shown for one turn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NightInfo {
    pub seat: SeatId,
    pub role: Option<RoleId>,
    pub action: ActionTag,
    /// Moderator-only text. May include the true answer.
    pub guidance: String,
    /// Line read to the player. Never contains a suppressed true answer.
    pub spoken: String,
    pub dialogue: Option<DialogueLines>,
    pub fabricated: Option<FakeReason>,
    /// True answer, for cross-checking. Moderator only.
    pub truth: Option<String>,
    /// Nothing to do: the seat does not wake.
    pub skip: bool,
}

/// The body of a render: guidance and spoken line.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Revelation {
    pub guidance: String,
    pub spoken: String,
    pub fabricated: Option<FakeReason>,
    pub truth: Option<String>,
    /// The seat has nothing to do tonight after all.
    pub skip: bool,
}

impl Revelation {
    /// An instruction with no hidden answer.
    #[must_use]
    pub fn instruct(guidance: impl Into<String>, spoken: impl Into<String>) -> Self {
        Self {
            guidance: guidance.into(),
            spoken: spoken.into(),
            ..Self::default()
        }
    }

    /// The seat stays asleep; only the moderator sees why.
    #[must_use]
    pub fn rest(guidance: impl Into<String>) -> Self {
        Self {
            guidance: guidance.into(),
            skip: true,
            ..Self::default()
        }
    }

    /// Information told to the player. `shown` is what they hear; the truth
    /// reaches the guidance only when the answer is fabricated.
    #[must_use]
    pub fn told(shown: String, truth: String, fabricated: Option<FakeReason>) -> Self {
        let guidance = match fabricated {
            Some(reason) => format!("Tell them: {shown}\n[FABRICATED: {reason}; true answer: {truth}]"),
            None => format!("Tell them: {shown}"),
        };
        Self {
            guidance,
            spoken: shown,
            fabricated,
            truth: Some(truth),
            skip: false,
        }
    }

    /// The answer must be false but every possible answer is true. Nothing
    /// is spoken; the moderator decides what to tell them.
    #[must_use]
    pub fn unfakeable(truth: String, reason: FakeReason) -> Self {
        Self {
            guidance: format!(
                "No false answer is possible: choose what to tell them\n[FABRICATED: {reason}; true answer: {truth}]"
            ),
            spoken: String::new(),
            fabricated: Some(reason),
            truth: Some(truth),
            skip: false,
        }
    }

    /// Append a moderator-only note.
    #[must_use]
    pub fn with_note(mut self, note: impl AsRef<str>) -> Self {
        if !self.guidance.is_empty() {
            self.guidance.push('\n');
        }
        self.guidance.push_str(note.as_ref());
        self
    }

    /// Put a moderator-only note first.
    #[must_use]
    pub fn with_preface(mut self, note: impl AsRef<str>) -> Self {
        self.guidance = format!("{}\n{}", note.as_ref(), self.guidance);
        self
    }
}

/// What a render function sees.
pub struct RenderCtx<'a> {
    pub seats: &'a [Seat],
    pub seat: &'a Seat,
    /// Role being acted out (the displayed role for a masked seat).
    pub role: &'a RoleId,
    pub def: &'a RoleDefinition,
    pub action: Option<&'a NightAction>,
    pub choice: &'a ActionChoice,
    pub first_night: bool,
    pub registry: &'a RoleRegistry,
    pub session: &'a mut SessionContext,
}

impl<'a> RenderCtx<'a> {
    /// "Seat 3 (Empath)".
    #[must_use]
    pub fn label(&self, seat: &Seat) -> String {
        self.registry.seat_label(seat)
    }

    #[must_use]
    pub fn name(&self, role: &RoleId) -> String {
        self.registry.name_of(role).to_string()
    }

    /// Instruction text of tonight's action.
    #[must_use]
    pub fn instruction(&self) -> &'static str {
        self.action.map_or("", |a| a.instruction)
    }

    /// The i-th chosen target.
    #[must_use]
    pub fn target(&self, i: usize) -> Option<&'a Seat> {
        let seats = self.seats;
        self.choice.targets.get(i).and_then(|id| seats.seat(*id))
    }

    #[must_use]
    pub fn has_targets(&self) -> bool {
        !self.choice.targets.is_empty()
    }

    /// How `subject` registers to this role.
    pub fn registration(&mut self, subject: &Seat) -> RegistrationResult {
        registration(self.seats, subject, Some(self.role), self.session, self.registry)
    }

    /// Whether tonight's answer for this seat is false.
    pub fn fabrication(&mut self) -> Option<FakeReason> {
        should_fabricate(self.seat, self.role, self.session, self.registry)
    }

    /// Other seats, in table order.
    pub fn others(&self) -> impl Iterator<Item = &'a Seat> + '_ {
        let me = self.seat.id;
        self.seats.iter().filter(move |s| s.id != me)
    }

    /// A number for the player, fabricated when required.
    pub fn count(&mut self, truth: u32, max: u32, phrase: fn(u32) -> String) -> Revelation {
        let reason = self.fabrication();
        let shown = match reason {
            Some(_) => fake_count(truth, max, &mut self.session.rng),
            None => truth,
        };
        Revelation::told(phrase(shown), phrase(truth), reason)
    }

    /// A yes/no for the player, fabricated when required.
    pub fn verdict(&mut self, truth: bool, yes: &str, no: &str) -> Revelation {
        let reason = self.fabrication();
        let shown = match reason {
            Some(r) => fake_verdict(truth, r, &mut self.session.rng),
            None => truth,
        };
        let say = |v: bool| if v { yes.to_string() } else { no.to_string() };
        Revelation::told(say(shown), say(truth), reason)
    }
}

/// A role's render function.
pub type RenderFn = fn(&mut RenderCtx<'_>) -> Revelation;

/// Role id → render function.
#[derive(Clone, Debug, Default)]
pub struct RenderTable {
    renderers: FxHashMap<RoleId, RenderFn>,
}

impl RenderTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every shipped renderer.
    #[must_use]
    pub fn standard() -> Self {
        let mut table = Self::new();
        super::render::register_all(&mut table);
        table
    }

    pub fn register(&mut self, role: &'static str, render: RenderFn) {
        self.renderers.insert(RoleId::new(role), render);
    }

    #[must_use]
    pub fn get(&self, role: &RoleId) -> Option<RenderFn> {
        self.renderers.get(role).copied()
    }

    #[must_use]
    pub fn contains(&self, role: &str) -> bool {
        self.renderers.contains_key(&RoleId::owned(role))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.renderers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.renderers.is_empty()
    }
}

/// Render the turn of `seat`.
///
/// Call once with no choice to get the instruction, and again with the
/// moderator's choice for roles whose answer depends on their targets.
/// Starts a new decision point: registrations are rolled afresh.
///
/// ## Example
///
/// ```
/// use clocktower_engine::context::SessionContext;
/// use clocktower_engine::core::{RoleId, Seat, SeatId};
/// use clocktower_engine::info::{night_info, RenderTable};
/// use clocktower_engine::roles::{ActionChoice, RoleRegistry};
///
/// let registry = RoleRegistry::standard();
/// let table = RenderTable::standard();
/// let mut session = SessionContext::default();
/// session.begin_night();
/// let seats = vec![
///     Seat::new(SeatId::new(0)).with_role(RoleId::new("imp")),
///     Seat::new(SeatId::new(1)).with_role(RoleId::new("empath")),
///     Seat::new(SeatId::new(2)).with_role(RoleId::new("chef")),
/// ];
///
/// let info = night_info(&seats, SeatId::new(1), &ActionChoice::nothing(), &mut session, &registry, &table).unwrap();
/// assert_eq!(info.spoken, "1 of your alive neighbours is evil");
/// assert!(info.fabricated.is_none());
/// ```
pub fn night_info(
    seats: &[Seat],
    seat: SeatId,
    choice: &ActionChoice,
    session: &mut SessionContext,
    registry: &RoleRegistry,
    table: &RenderTable,
) -> EngineResult<NightInfo> {
    let actor = seats.seat(seat).ok_or(EngineError::UnknownSeat(seat))?;
    session.begin_decision();

    let Some(role) = actor.effective_role() else {
        return Ok(skipped(actor, None, "has no character that wakes tonight"));
    };
    let def = registry.require(role)?;
    let first_night = session.is_first_night();
    let action = def.action_for(first_night);

    let mut ctx = RenderCtx {
        seats,
        seat: actor,
        role,
        def,
        action,
        choice,
        first_night,
        registry,
        session,
    };
    let mut body = match (table.get(role), action) {
        (Some(render), _) => render(&mut ctx),
        (None, Some(action)) => generic(&ctx, action),
        (None, None) => return Ok(skipped(actor, Some(role), "does not wake tonight")),
    };

    if actor.has_role("drunk") && first_night {
        body = body.with_preface(format!(
            "{} is the Drunk and believes they are the {}.",
            actor.id,
            def.name
        ));
    }

    Ok(NightInfo {
        seat,
        role: Some(role.clone()),
        action: action.map_or(ActionTag::Skip, |a| a.action),
        guidance: body.guidance,
        spoken: body.spoken,
        dialogue: action.map(|a| a.dialogue_for(seat, def.name, first_night)),
        fabricated: body.fabricated,
        truth: body.truth,
        skip: body.skip,
    })
}

fn skipped(actor: &Seat, role: Option<&RoleId>, why: &str) -> NightInfo {
    NightInfo {
        seat: actor.id,
        role: role.cloned(),
        action: ActionTag::Skip,
        guidance: format!("{} {why}.", actor.id),
        spoken: String::new(),
        dialogue: None,
        fabricated: None,
        truth: None,
        skip: true,
    }
}

/// Fallback for roles without their own renderer.
fn generic(ctx: &RenderCtx<'_>, action: &NightAction) -> Revelation {
    match action.action {
        ActionTag::Manual => Revelation::instruct(
            format!(
                "Resolve the {} ability by hand: {}",
                ctx.def.name, action.instruction
            ),
            action.instruction,
        ),
        _ => Revelation::instruct(action.instruction, action.instruction),
    }
}

/// Seats with their characters, for the moderator.
pub(crate) fn roster(ctx: &RenderCtx<'_>, seats: &[&Seat]) -> String {
    if seats.is_empty() {
        return "none".to_string();
    }
    seats.iter().map(|s| ctx.label(s)).collect::<Vec<_>>().join(", ")
}

/// Seat numbers only, for the player.
pub(crate) fn seat_list(seats: &[&Seat]) -> String {
    seats.iter().map(|s| s.id.to_string()).collect::<Vec<_>>().join(", ")
}

/// Whether a type is one of the good categories.
pub(crate) fn is_good_type(role_type: Option<RoleType>) -> bool {
    matches!(role_type, Some(RoleType::Townsfolk | RoleType::Outsider))
}
