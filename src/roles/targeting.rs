//! Target specifications for night actions.
//!
//! - `TargetSpec`: how many seats, and which filters apply
//! - `TargetFilter`: one eligibility rule
//!
//! Validation runs before any state change; a rejected choice leaves the
//! board untouched.

use smallvec::SmallVec;

use crate::context::SessionContext;
use crate::core::{Board, Seat, SeatId};
use crate::error::{EngineError, EngineResult};

/// Everything an eligibility rule may look at.
pub struct TargetCheck<'a> {
    pub seats: &'a [Seat],
    pub actor: &'a Seat,
    pub target: &'a Seat,
    /// Targets chosen so far, in order, including `target`.
    pub selected: &'a [SeatId],
    pub session: &'a SessionContext,
}

/// A single eligibility rule.
#[derive(Clone, Copy, Debug)]
pub enum TargetFilter {
    /// Target must not be the acting seat.
    NotSelf,
    /// Target must be alive.
    Alive,
    /// Target must be dead.
    Dead,
    /// Targets must be pairwise distinct.
    Distinct,
    /// Role-specific rule.
    Custom(fn(&TargetCheck<'_>) -> Result<(), String>),
}

impl TargetFilter {
    fn check(&self, ctx: &TargetCheck<'_>) -> Result<(), String> {
        match self {
            TargetFilter::NotSelf if ctx.target.id == ctx.actor.id => {
                Err("cannot choose yourself".to_string())
            }
            TargetFilter::Alive if ctx.target.is_dead => Err("must choose a living player".to_string()),
            TargetFilter::Dead if !ctx.target.is_dead => Err("must choose a dead player".to_string()),
            TargetFilter::Distinct
                if ctx.selected.iter().filter(|id| **id == ctx.target.id).count() > 1 =>
            {
                Err("cannot choose the same player twice".to_string())
            }
            TargetFilter::Custom(f) => f(ctx),
            _ => Ok(()),
        }
    }
}

/// How many seats an action takes, and which ones are legal.
///
/// ## Example
///
/// ```
/// use clocktower_engine::roles::TargetSpec;
///
/// let spec = TargetSpec::exactly(2).distinct();
/// assert_eq!((spec.min, spec.max), (2, 2));
///
/// let optional = TargetSpec::up_to(1);
/// assert_eq!((optional.min, optional.max), (0, 1));
/// ```
#[derive(Clone, Debug)]
pub struct TargetSpec {
    pub min: u8,
    pub max: u8,
    pub filters: SmallVec<[TargetFilter; 3]>,
}

impl TargetSpec {
    /// No targets.
    #[must_use]
    pub fn none() -> Self {
        Self::range(0, 0)
    }

    #[must_use]
    pub fn exactly(n: u8) -> Self {
        Self::range(n, n)
    }

    #[must_use]
    pub fn up_to(n: u8) -> Self {
        Self::range(0, n)
    }

    #[must_use]
    pub fn range(min: u8, max: u8) -> Self {
        Self {
            min,
            max: max.max(min),
            filters: SmallVec::new(),
        }
    }

    #[must_use]
    pub fn with_filter(mut self, filter: TargetFilter) -> Self {
        self.filters.push(filter);
        self
    }

    #[must_use]
    pub fn not_self(self) -> Self {
        self.with_filter(TargetFilter::NotSelf)
    }

    #[must_use]
    pub fn alive(self) -> Self {
        self.with_filter(TargetFilter::Alive)
    }

    #[must_use]
    pub fn dead(self) -> Self {
        self.with_filter(TargetFilter::Dead)
    }

    #[must_use]
    pub fn distinct(self) -> Self {
        self.with_filter(TargetFilter::Distinct)
    }

    #[must_use]
    pub fn custom(self, rule: fn(&TargetCheck<'_>) -> Result<(), String>) -> Self {
        self.with_filter(TargetFilter::Custom(rule))
    }

    /// Validate a selection: count first, then every filter on every target.
    pub fn validate(
        &self,
        seats: &[Seat],
        actor: &Seat,
        targets: &[SeatId],
        session: &SessionContext,
    ) -> EngineResult<()> {
        let got = targets.len();
        if got < usize::from(self.min) || got > usize::from(self.max) {
            return Err(EngineError::TargetCount {
                min: self.min,
                max: self.max,
                got,
            });
        }

        for (i, id) in targets.iter().enumerate() {
            let target = seats.seat(*id).ok_or(EngineError::UnknownSeat(*id))?;
            let ctx = TargetCheck {
                seats,
                actor,
                target,
                selected: &targets[..=i],
                session,
            };
            for filter in &self.filters {
                filter.check(&ctx).map_err(|reason| EngineError::IneligibleTarget {
                    seat: *id,
                    reason,
                })?;
            }
        }
        Ok(())
    }
}
