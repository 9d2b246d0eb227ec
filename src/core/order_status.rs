//! Order status state machine.
//!
//! Orders only move forward: `PLACED → COLLECTED → PAID`. `PAID` is terminal. The allowed
//! pairs are listed in [`ALLOWED_TRANSITIONS`]; every other `(current, requested)` pair,
//! including staying in place, is rejected. Nothing here touches storage.

use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fulfillment status of an order, in lifecycle order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    /// Order taken, jars not handed over yet
    Placed,
    /// Client collected the jars
    Collected,
    /// Order settled
    Paid,
}

/// The complete list of permitted status changes.
pub const ALLOWED_TRANSITIONS: [(OrderStatus, OrderStatus); 2] = [
    (OrderStatus::Placed, OrderStatus::Collected),
    (OrderStatus::Collected, OrderStatus::Paid),
];

impl OrderStatus {
    /// All statuses, in lifecycle order.
    pub const ALL: [Self; 3] = [Self::Placed, Self::Collected, Self::Paid];

    /// Value stored in the `orders.status` column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Placed => "PLACED",
            Self::Collected => "COLLECTED",
            Self::Paid => "PAID",
        }
    }

    /// Label shown to the beekeeper.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Placed => "Commandée",
            Self::Collected => "Récupérée",
            Self::Paid => "Payée",
        }
    }

    /// Whether moving from `self` to `requested` is allowed.
    #[must_use]
    pub fn can_transition_to(self, requested: Self) -> bool {
        ALLOWED_TRANSITIONS.contains(&(self, requested))
    }

    /// The single status this one may move to, `None` once paid.
    #[must_use]
    pub fn next(self) -> Option<Self> {
        ALLOWED_TRANSITIONS
            .iter()
            .find(|(from, _)| *from == self)
            .map(|(_, to)| *to)
    }

    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Paid)
    }
}

/// Checks `(current, requested)` against the transition table.
///
/// # Errors
/// Returns `Error::InvalidStatusTransition` carrying both states when the pair is not allowed.
pub fn check_transition(current: OrderStatus, requested: OrderStatus) -> Result<()> {
    if current.can_transition_to(requested) {
        Ok(())
    } else {
        Err(Error::InvalidStatusTransition {
            from: current,
            to: requested,
        })
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::invalid_argument(format!("Unknown order status '{s}'")))
    }
}
