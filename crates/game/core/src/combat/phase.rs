//! Per-combatant combat state machine.
//!
//! ```text
//! Idle -> Engaged -> Resolving -> Engaged
//!            |                      |
//!            +-> Idle (disengage) <-+
//! any -> Dead (terminal)
//! ```

use strum::Display;

use crate::error::{CoreError, ErrorSeverity};

/// Where a combatant stands in the fight lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum CombatPhase {
    #[default]
    Idle,
    Engaged,
    /// Inside an exchange.
    Resolving,
    Dead,
}

/// Rejected phase transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PhaseError {
    #[error("cannot {action} while {phase}")]
    Invalid {
        action: &'static str,
        phase: CombatPhase,
    },

    #[error("combatant is dead")]
    Dead,
}

impl CoreError for PhaseError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Invalid { .. } => ErrorSeverity::Internal,
            Self::Dead => ErrorSeverity::Recoverable,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Invalid { .. } => "PHASE_INVALID",
            Self::Dead => "PHASE_DEAD",
        }
    }
}

impl CombatPhase {
    pub const fn is_dead(self) -> bool {
        matches!(self, CombatPhase::Dead)
    }

    pub const fn is_fighting(self) -> bool {
        matches!(self, CombatPhase::Engaged | CombatPhase::Resolving)
    }

    /// Idle or Engaged to Engaged. Returns true when newly engaged.
    pub fn engage(&mut self) -> Result<bool, PhaseError> {
        match *self {
            CombatPhase::Idle => {
                *self = CombatPhase::Engaged;
                Ok(true)
            }
            CombatPhase::Engaged | CombatPhase::Resolving => Ok(false),
            CombatPhase::Dead => Err(PhaseError::Dead),
        }
    }

    pub fn begin_exchange(&mut self) -> Result<(), PhaseError> {
        match *self {
            CombatPhase::Engaged => {
                *self = CombatPhase::Resolving;
                Ok(())
            }
            CombatPhase::Dead => Err(PhaseError::Dead),
            phase => Err(PhaseError::Invalid {
                action: "begin an exchange",
                phase,
            }),
        }
    }

    /// Resolving back to Engaged. A combatant that died meanwhile stays dead.
    pub fn end_exchange(&mut self) {
        if *self == CombatPhase::Resolving {
            *self = CombatPhase::Engaged;
        }
    }

    /// Back to Idle. Returns true when a fight was actually left.
    pub fn disengage(&mut self) -> Result<bool, PhaseError> {
        match *self {
            CombatPhase::Engaged | CombatPhase::Resolving => {
                *self = CombatPhase::Idle;
                Ok(true)
            }
            CombatPhase::Idle => Ok(false),
            CombatPhase::Dead => Err(PhaseError::Dead),
        }
    }

    /// Enters the terminal state. Returns false if already dead.
    pub fn die(&mut self) -> bool {
        let was_alive = !self.is_dead();
        *self = CombatPhase::Dead;
        was_alive
    }
}
