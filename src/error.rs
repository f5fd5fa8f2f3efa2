//! Error types for ragdoll construction.
//!
//! Runtime irregularities (missing live handles, pointer timing) are not errors;
//! they are logged and reported through outcome values. Only malformed part
//! tables fail, and they fail at assembly time.

use std::fmt;

use crate::core::part::PartId;

/// Failure to build a ragdoll from its part table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RagdollError {
    /// Following parent links returns to a part already on the path.
    CyclicJointGraph { cycle: Vec<PartId> },
    /// A part names a parent that is not in the table.
    UnknownParent { part: PartId, parent: PartId },
    /// Two table entries share an id.
    DuplicatePart(PartId),
    /// The table (after optional parts were filtered) has no parts.
    EmptyTable,
    /// Angular limits are inverted or attached to a fixed joint.
    InvalidLimits { part: PartId },
}

impl fmt::Display for RagdollError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::CyclicJointGraph { cycle } => {
                let path: Vec<&str> = cycle.iter().map(PartId::as_str).collect();
                write!(f, "cyclic joint graph: {}", path.join(" -> "))
            }
            Self::UnknownParent { part, parent } => {
                write!(f, "part '{part}' references unknown parent '{parent}'")
            }
            Self::DuplicatePart(id) => write!(f, "duplicate part id '{id}'"),
            Self::EmptyTable => write!(f, "part table is empty"),
            Self::InvalidLimits { part } => write!(f, "invalid joint limits on part '{part}'"),
        }
    }
}

impl std::error::Error for RagdollError {}

/// Convenient Result alias for assembly operations.
pub type Result<T> = std::result::Result<T, RagdollError>;
