//! Match state and the battle engine.
//!
//! A [`Match`] is an immutable snapshot. Every accepted operation returns a
//! new snapshot with `revision` bumped by one; rejected operations leave the
//! caller's snapshot untouched and return a [`MatchError`].
//!
//! # Phases
//!
//! ```text
//! AwaitingFirstParticipant ──join──▶ AwaitingSecondParticipant ──join──▶ Player1Turn
//!                                                                          │    ▲
//!                                                                      act │    │ act
//!                                                                          ▼    │
//!                                                                        Player2Turn
//!
//! Player1Turn/Player2Turn ──act (target health <= 0)──▶ Player1Won | Player2Won
//! ```

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::combatant::{Action, Combatant};
use super::roll::RandomSource;
use super::rules::BattleRules;
use super::traits::{resolve_or_default, AttributeLookup};

/// Match state machine states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPhase {
    /// Created, nobody has joined
    #[default]
    AwaitingFirstParticipant,
    /// Player 1 is in, seeking an opponent
    AwaitingSecondParticipant,
    Player1Turn,
    Player2Turn,
    Player1Won,
    Player2Won,
}

impl MatchPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AwaitingFirstParticipant => "awaiting_first_participant",
            Self::AwaitingSecondParticipant => "awaiting_second_participant",
            Self::Player1Turn => "player1_turn",
            Self::Player2Turn => "player2_turn",
            Self::Player1Won => "player1_won",
            Self::Player2Won => "player2_won",
        }
    }

    /// Check if match is over (cannot change).
    pub fn is_terminal(&self) -> bool {
        self.winner().is_some()
    }

    /// Check if match still has an open participant slot.
    pub fn is_seeking(&self) -> bool {
        matches!(
            self,
            Self::AwaitingFirstParticipant | Self::AwaitingSecondParticipant
        )
    }

    /// Seat that may act in this phase.
    pub fn turn_owner(&self) -> Option<Seat> {
        match self {
            Self::Player1Turn => Some(Seat::Player1),
            Self::Player2Turn => Some(Seat::Player2),
            Self::AwaitingFirstParticipant
            | Self::AwaitingSecondParticipant
            | Self::Player1Won
            | Self::Player2Won => None,
        }
    }

    pub fn winner(&self) -> Option<Seat> {
        match self {
            Self::Player1Won => Some(Seat::Player1),
            Self::Player2Won => Some(Seat::Player2),
            Self::AwaitingFirstParticipant
            | Self::AwaitingSecondParticipant
            | Self::Player1Turn
            | Self::Player2Turn => None,
        }
    }
}

impl fmt::Display for MatchPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One of the two participant slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Seat {
    Player1,
    Player2,
}

impl Seat {
    pub fn other(self) -> Self {
        match self {
            Self::Player1 => Self::Player2,
            Self::Player2 => Self::Player1,
        }
    }

    fn turn(self) -> MatchPhase {
        match self {
            Self::Player1 => MatchPhase::Player1Turn,
            Self::Player2 => MatchPhase::Player2Turn,
        }
    }

    fn victory(self) -> MatchPhase {
        match self {
            Self::Player1 => MatchPhase::Player1Won,
            Self::Player2 => MatchPhase::Player2Won,
        }
    }
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Player1 => write!(f, "player 1"),
            Self::Player2 => write!(f, "player 2"),
        }
    }
}

/// Match errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchError {
    /// Match is absent, finished, or not in a phase that allows the operation
    InvalidMatch,
    /// Second joiner is the same participant as the first
    DuplicateParticipant,
    /// Actor does not hold the turn; carries the seat that does
    WrongTurn(Seat),
    /// Action index out of range, or no opponent to strike
    InvalidAction,
}

impl fmt::Display for MatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidMatch => write!(f, "Not a valid match"),
            Self::DuplicateParticipant => write!(f, "Can't have the same player twice"),
            Self::WrongTurn(seat) => write!(f, "It's {}'s turn", seat),
            Self::InvalidAction => write!(f, "Action or opponent invalid"),
        }
    }
}

impl std::error::Error for MatchError {}

/// Computed effect of one action use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appliance {
    pub seat: Seat,
    pub action: String,
    pub multiplier: f64,
    pub applied_power: f64,
    /// Target health before the lower clamp; decides the win
    pub target_health_raw: i32,
    pub decisive: bool,
}

/// What a given viewer can do with a match right now.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchView<'a> {
    /// A slot is open and this viewer may take it
    Joinable,
    /// Viewer holds the turn and may pick one of these
    YourTurn(&'a [Action]),
    /// Viewer is a participant waiting on the other side
    Waiting,
    /// Viewer is not a participant
    Spectator,
    Finished { winner: Seat },
}

/// Persisted match record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    /// Unique match ID
    pub id: String,

    /// When match was created
    pub created_at: DateTime<Utc>,

    pub phase: MatchPhase,

    /// Participant identities, filled in by join
    pub player1: Option<String>,
    pub player2: Option<String>,

    pub combatant1: Option<Combatant>,
    pub combatant2: Option<Combatant>,

    /// Bumped on every accepted mutation
    pub revision: u64,
}

impl Match {
    /// Create a new match awaiting its first participant.
    ///
    /// Each reference is resolved through `lookup`; absent references and
    /// failed lookups get the built-in combatant for that slot.
    pub fn create<L: AttributeLookup + ?Sized>(
        created_at: DateTime<Utc>,
        lookup: &L,
        combatant1_ref: Option<&str>,
        combatant2_ref: Option<&str>,
    ) -> Self {
        let combatant1 = resolve_or_default(lookup, combatant1_ref, Combatant::default_first);
        let combatant2 = resolve_or_default(lookup, combatant2_ref, Combatant::default_second);

        let id = Uuid::new_v4().to_string();
        tracing::debug!(match_id = %id, "match created");

        Self {
            id,
            created_at,
            phase: MatchPhase::AwaitingFirstParticipant,
            player1: None,
            player2: None,
            combatant1: Some(combatant1),
            combatant2: Some(combatant2),
            revision: 0,
        }
    }

    /// Participant in a seat.
    pub fn player(&self, seat: Seat) -> Option<&str> {
        match seat {
            Seat::Player1 => self.player1.as_deref(),
            Seat::Player2 => self.player2.as_deref(),
        }
    }

    pub fn combatant(&self, seat: Seat) -> Option<&Combatant> {
        match seat {
            Seat::Player1 => self.combatant1.as_ref(),
            Seat::Player2 => self.combatant2.as_ref(),
        }
    }

    fn combatant_slot(&mut self, seat: Seat) -> &mut Option<Combatant> {
        match seat {
            Seat::Player1 => &mut self.combatant1,
            Seat::Player2 => &mut self.combatant2,
        }
    }

    /// Seat held by an identity, if any.
    pub fn seat_of(&self, identity: &str) -> Option<Seat> {
        if self.player1.as_deref() == Some(identity) {
            Some(Seat::Player1)
        } else if self.player2.as_deref() == Some(identity) {
            Some(Seat::Player2)
        } else {
            None
        }
    }

    pub fn winner(&self) -> Option<Seat> {
        self.phase.winner()
    }

    pub fn is_terminal(&self) -> bool {
        self.phase.is_terminal()
    }

    /// Take the next open participant slot.
    pub fn join(&self, identity: &str) -> Result<Self, MatchError> {
        let mut next = self.clone();

        match self.phase {
            MatchPhase::AwaitingFirstParticipant => {
                next.player1 = Some(identity.to_string());
                next.phase = MatchPhase::AwaitingSecondParticipant;
            }
            MatchPhase::AwaitingSecondParticipant => {
                if self.player1.as_deref() == Some(identity) {
                    return Err(MatchError::DuplicateParticipant);
                }
                next.player2 = Some(identity.to_string());
                next.phase = MatchPhase::Player1Turn;
            }
            MatchPhase::Player1Turn
            | MatchPhase::Player2Turn
            | MatchPhase::Player1Won
            | MatchPhase::Player2Won => return Err(MatchError::InvalidMatch),
        }

        next.revision += 1;
        tracing::debug!(match_id = %self.id, identity, phase = %next.phase, "participant joined");
        Ok(next)
    }

    /// Resolve one action by the participant holding the turn.
    pub fn act<R: RandomSource + ?Sized>(
        &self,
        identity: &str,
        action_index: usize,
        rules: &BattleRules,
        rng: &mut R,
    ) -> Result<(Self, Appliance), MatchError> {
        let seat = match self.phase {
            MatchPhase::Player1Turn => Seat::Player1,
            MatchPhase::Player2Turn => Seat::Player2,
            MatchPhase::AwaitingFirstParticipant
            | MatchPhase::AwaitingSecondParticipant
            | MatchPhase::Player1Won
            | MatchPhase::Player2Won => return Err(MatchError::InvalidMatch),
        };

        if self.player(seat) != Some(identity) {
            return Err(MatchError::WrongTurn(seat));
        }

        let mut actor = self
            .combatant(seat)
            .cloned()
            .ok_or(MatchError::InvalidAction)?;
        let action = actor
            .action(action_index)
            .cloned()
            .ok_or(MatchError::InvalidAction)?;
        let mut target = self
            .combatant(seat.other())
            .cloned()
            .ok_or(MatchError::InvalidAction)?;

        let (min, max) = action.random_range;
        let multiplier = rng.draw(min, max);
        let applied_power = multiplier * action.power;

        // Defense absorbs the hit first; whatever it cannot cover comes off health.
        let defense_before = f64::from(target.defense);
        target.defense = bound_stat(floor_stat(defense_before - applied_power), rules.max_defense);
        let target_health_raw =
            floor_stat(f64::from(target.health) + defense_before - applied_power).min(rules.max_health);
        target.health = target_health_raw.max(0);

        actor.defense = bound_stat(
            floor_stat(f64::from(actor.defense) + multiplier * action.defense_gain),
            rules.max_defense,
        );
        actor.health = bound_stat(
            floor_stat(f64::from(actor.health) + multiplier * action.health_gain),
            rules.max_health,
        );

        let decisive = target_health_raw <= 0;

        let mut next = self.clone();
        next.phase = if decisive {
            seat.victory()
        } else {
            seat.other().turn()
        };
        *next.combatant_slot(seat) = Some(actor);
        *next.combatant_slot(seat.other()) = Some(target);
        next.revision += 1;

        tracing::debug!(
            match_id = %self.id,
            seat = %seat,
            action = %action.name,
            multiplier,
            applied_power,
            phase = %next.phase,
            "action resolved"
        );

        let appliance = Appliance {
            seat,
            action: action.name,
            multiplier,
            applied_power,
            target_health_raw,
            decisive,
        };

        Ok((next, appliance))
    }

    /// Decide what `identity` may do with this match.
    pub fn view_for(&self, identity: &str) -> MatchView<'_> {
        let seat = self.seat_of(identity);

        match self.phase {
            MatchPhase::AwaitingFirstParticipant => MatchView::Joinable,
            MatchPhase::AwaitingSecondParticipant => match seat {
                Some(_) => MatchView::Waiting,
                None => MatchView::Joinable,
            },
            MatchPhase::Player1Turn | MatchPhase::Player2Turn => {
                let owner = self.phase.turn_owner();
                match seat {
                    Some(seat) if Some(seat) == owner => self
                        .combatant(seat)
                        .map(|c| MatchView::YourTurn(&c.actions))
                        .unwrap_or(MatchView::Waiting),
                    Some(_) => MatchView::Waiting,
                    None => MatchView::Spectator,
                }
            }
            MatchPhase::Player1Won => MatchView::Finished {
                winner: Seat::Player1,
            },
            MatchPhase::Player2Won => MatchView::Finished {
                winner: Seat::Player2,
            },
        }
    }
}

/// Round toward negative infinity before any clamping.
fn floor_stat(value: f64) -> i32 {
    value.floor() as i32
}

/// Cap from above, then floor at zero. Never panics, even for a negative cap.
fn bound_stat(value: i32, cap: i32) -> i32 {
    value.min(cap).max(0)
}
