//! Status effects the core asks entities to apply or reports on.

use serde::{Deserialize, Serialize};

/// Timed statuses exchanged with the outer world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusEffect {
    /// Movement impairment applied to a holder carrying occupants.
    Slowed,
    /// Granted to a holder while an occupant is nearly processed.
    Satiated,
    /// Holder-side processing accelerant; the core only reads it.
    Accelerant,
}
