/// Validated newtype wrapper for agent identifiers.
///
/// Agent ids are positive integers. Zero is rejected at construction time via
/// [`TryFrom<u32>`], and the serde `Deserialize` impl re-runs the same check so
/// an invalid id cannot enter the type system from an untrusted network file.
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors produced when constructing an [`AgentId`] from an invalid integer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdError {
    /// Agent ids start at 1; zero is reserved.
    Zero,
    /// The value does not fit in the 32-bit id space.
    OutOfRange {
        /// The rejected value.
        got: u64,
    },
}

impl fmt::Display for IdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Zero => f.write_str("invalid agent id: expected a positive integer, got 0"),
            Self::OutOfRange { got } => {
                write!(f, "invalid agent id: {got} exceeds the 32-bit id space")
            }
        }
    }
}

impl std::error::Error for IdError {}

// ---------------------------------------------------------------------------
// AgentId
// ---------------------------------------------------------------------------

/// Unique positive identifier of an agent within one network instance.
///
/// Ordering follows the numeric value; canonical cycle forms and the final
/// cluster map both rely on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AgentId(u32);

impl AgentId {
    /// Returns the raw integer value.
    pub fn get(self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for AgentId {
    type Error = IdError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        if value == 0 {
            Err(IdError::Zero)
        } else {
            Ok(Self(value))
        }
    }
}

impl TryFrom<usize> for AgentId {
    type Error = IdError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        let raw = u32::try_from(value).map_err(|_| IdError::OutOfRange { got: value as u64 })?;
        Self::try_from(raw)
    }
}

impl From<AgentId> for u32 {
    fn from(id: AgentId) -> Self {
        id.0
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for AgentId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.0)
    }
}

impl<'de> Deserialize<'de> for AgentId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = u32::deserialize(deserializer)?;
        Self::try_from(raw).map_err(de::Error::custom)
    }
}
