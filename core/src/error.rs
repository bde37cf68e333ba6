use std::{fmt, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Currencies held by the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    /// Soft currency earned from kills.
    Gold,
    /// Premium currency.
    Gems,
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gold => f.write_str("gold"),
            Self::Gems => f.write_str("gems"),
        }
    }
}

/// Reasons a player-facing action may be rejected.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ActionError {
    /// The player cannot afford the action.
    #[error("not enough {currency}: need {required}, have {available}")]
    InsufficientFunds {
        /// Currency that fell short.
        currency: Currency,
        /// Price of the action.
        required: u64,
        /// Balance at the time of the request.
        available: u64,
    },
    /// No free slot remains in the merge grid.
    #[error("merge grid is full")]
    GridFull,
    /// The request referenced something that does not exist.
    #[error("no such {0}")]
    InvalidReference(&'static str),
    /// The skill is still recharging.
    #[error("skill ready in {}s", whole_seconds(.remaining))]
    SkillOnCooldown {
        /// Cooldown left before the skill may be used.
        remaining: Duration,
    },
    /// Progress requirement not yet met.
    #[error("unlocks at stage {stage}")]
    Locked {
        /// Best stage required.
        stage: u32,
    },
    /// The reward was already collected for this period.
    #[error("already claimed")]
    AlreadyClaimed,
    /// The quest target has not been reached.
    #[error("quest not complete")]
    Incomplete,
}

fn whole_seconds(remaining: &Duration) -> u64 {
    let millis = remaining.as_millis();
    u64::try_from(millis.div_ceil(1_000)).unwrap_or(u64::MAX)
}
