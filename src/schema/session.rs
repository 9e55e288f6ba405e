//! Differential-evolution session state: which pair is under test and who is live.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Evaluation phase of the current generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DeState {
    /// The incumbent `s0` is live.
    #[default]
    #[serde(rename = "active_s0")]
    EvaluatingS0,
    /// The challenger `s_new` is live.
    #[serde(rename = "active_snew")]
    EvaluatingSNew,
}

impl DeState {
    pub fn as_str(self) -> &'static str {
        match self {
            DeState::EvaluatingS0 => "active_s0",
            DeState::EvaluatingSNew => "active_snew",
        }
    }
}

impl fmt::Display for DeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A state name that is neither phase of the scheduler.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("DE state '{0}' not recognized")]
pub struct UnknownStateError(pub String);

impl FromStr for DeState {
    type Err = UnknownStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active_s0" => Ok(DeState::EvaluatingS0),
            "active_snew" => Ok(DeState::EvaluatingSNew),
            other => Err(UnknownStateError(other.to_string())),
        }
    }
}

/// Indices of the candidate pair and the scheduler phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeSession {
    /// Incumbent under test for survival.
    pub s0_index: usize,
    /// Slot holding the freshly mutated challenger.
    pub snew_index: usize,
    /// Current phase.
    pub state: DeState,
}

impl DeSession {
    /// Start a session evaluating `s0_index` first.
    pub fn new(s0_index: usize, snew_index: usize) -> Self {
        Self {
            s0_index,
            snew_index,
            state: DeState::EvaluatingS0,
        }
    }

    /// Rebuild a session from its indices and a state name such as `"active_snew"`.
    pub fn from_parts(
        s0_index: usize,
        snew_index: usize,
        state: &str,
    ) -> Result<Self, UnknownStateError> {
        Ok(Self {
            s0_index,
            snew_index,
            state: state.parse()?,
        })
    }
}
