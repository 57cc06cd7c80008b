/// Batch phase definitions for persisting one category
///
/// A batch moves `Validating -> WritingVehicles -> WritingParts -> Committed`.
/// Any non-terminal phase may fall into `Aborted`.
use std::fmt;

/// Represents where a category batch is in the persistence process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BatchPhase {
    /// Checking the batch for duplicate vehicle identifiers
    Validating,

    /// Inserting vehicle rows inside the first transaction
    WritingVehicles,

    /// Inserting part rows inside the second transaction
    WritingParts,

    /// Both transactions committed
    Committed,

    /// The batch failed; see the accompanying error for how far it got
    Aborted,
}

impl BatchPhase {
    /// Returns true if no further transition is possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Committed | Self::Aborted)
    }

    /// Returns the phase that follows on success, if any
    pub fn next(&self) -> Option<Self> {
        match self {
            Self::Validating => Some(Self::WritingVehicles),
            Self::WritingVehicles => Some(Self::WritingParts),
            Self::WritingParts => Some(Self::Committed),
            Self::Committed | Self::Aborted => None,
        }
    }

    /// Checks whether moving from `self` to `to` is a legal transition
    pub fn can_transition_to(&self, to: Self) -> bool {
        if self.is_terminal() {
            return false;
        }
        to == Self::Aborted || self.next() == Some(to)
    }
}

impl fmt::Display for BatchPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Validating => "validating",
            Self::WritingVehicles => "writing_vehicles",
            Self::WritingParts => "writing_parts",
            Self::Committed => "committed",
            Self::Aborted => "aborted",
        };
        f.write_str(name)
    }
}
