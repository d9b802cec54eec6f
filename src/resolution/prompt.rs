//! Moderator decisions that pause resolution.
//!
//! A prompt is data, not control flow: the outcome that raised it is
//! already applied, and the session refuses to advance until the moderator
//! answers through [`answer_prompt`](super::answer_prompt).

use serde::{Deserialize, Serialize};

use crate::core::SeatId;
use crate::roles::KillRequest;

/// Which on-death choice a prompt asks for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeathChoiceKind {
    /// The chosen player dies tonight if good.
    Moonchild,
    /// The chosen player is drunk from now on.
    Sweetheart,
    /// If the chosen player is evil, good loses.
    Klutz,
}

/// A decision the moderator owes before the night can move on.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PendingPrompt {
    /// The Demon attacked the Mayor: pick who dies instead, or the Mayor.
    MayorRedirect { kill: KillRequest },
    /// The Imp killed itself: pick the Minion who becomes the Imp.
    StarPass { from: SeatId, candidates: Vec<SeatId> },
    /// A dying character's choice.
    DeathChoice { source: SeatId, kind: DeathChoiceKind },
    /// The Pit-Hag made a Demon: the moderator may kill anyone tonight.
    PitHagDemonCreated { seat: SeatId },
}

impl PendingPrompt {
    /// What to ask the moderator.
    #[must_use]
    pub fn question(&self) -> String {
        match self {
            PendingPrompt::MayorRedirect { kill } => format!(
                "The Demon attacked the Mayor ({}). Choose who dies instead, or nobody to let the Mayor die.",
                kill.target
            ),
            PendingPrompt::StarPass { from, candidates } => format!(
                "{from} passed the Demon. Choose the new Imp from: {}.",
                candidates.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
            ),
            PendingPrompt::DeathChoice { source, kind } => match kind {
                DeathChoiceKind::Moonchild => {
                    format!("{source} was the Moonchild. Which player did they choose?")
                }
                DeathChoiceKind::Sweetheart => {
                    format!("{source} was the Sweetheart. Which player becomes drunk?")
                }
                DeathChoiceKind::Klutz => format!("{source} was the Klutz. Which player did they choose?"),
            },
            PendingPrompt::PitHagDemonCreated { seat } => format!(
                "The Pit-Hag created a Demon ({seat}). Choose any players who die tonight."
            ),
        }
    }
}

impl std::fmt::Display for PendingPrompt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.question())
    }
}

/// The moderator's answer to a prompt.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PromptAnswer {
    Seat(SeatId),
    Seats(Vec<SeatId>),
    /// Decline: no redirect, no choice, no deaths.
    Nobody,
}

impl PromptAnswer {
    /// Chosen seats, in order.
    #[must_use]
    pub fn seats(&self) -> Vec<SeatId> {
        match self {
            PromptAnswer::Seat(seat) => vec![*seat],
            PromptAnswer::Seats(seats) => seats.clone(),
            PromptAnswer::Nobody => Vec::new(),
        }
    }
}
