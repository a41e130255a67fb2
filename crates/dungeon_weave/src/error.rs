//! Error types and result alias for the crate.
//!
//! This module defines [`enum@crate::error::Error`] and the crate-wide [Result] alias.
//! Variants cover invalid configuration, catalog problems, an empty root pass,
//! geometry-oracle failures, and a phase-carrying wrapper used to report which
//! generation phase a fatal error escaped from.
use thiserror::Error;

use crate::generate::Phase;

pub type Result<T> = std::result::Result<T, Error>;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("catalog error: {0}")]
    Catalog(String),

    #[error("root phase placed no blocks after {passes} passes; height field or distance bound leaves no eligible samples")]
    EmptyRoots { passes: usize },

    #[error("geometry oracle failure: {0}")]
    Oracle(String),

    #[error("generation failed during {phase}: {source}")]
    Generation {
        phase: Phase,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Wraps a fatal error with the phase it escaped from. Already-wrapped
    /// errors keep their original phase.
    pub(crate) fn in_phase(self, phase: Phase) -> Self {
        match self {
            Error::Generation { .. } => self,
            other => Error::Generation {
                phase,
                source: Box::new(other),
            },
        }
    }

    /// The phase a generation failure occurred in, if this is one.
    pub fn phase(&self) -> Option<Phase> {
        match self {
            Error::Generation { phase, .. } => Some(*phase),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_phase_wraps_once() {
        let err = Error::Oracle("boom".into()).in_phase(Phase::Stairs);
        assert_eq!(err.phase(), Some(Phase::Stairs));

        let rewrapped = err.in_phase(Phase::Props);
        assert_eq!(rewrapped.phase(), Some(Phase::Stairs));
    }

    #[test]
    fn non_generation_errors_carry_no_phase() {
        assert_eq!(Error::Catalog("empty id".into()).phase(), None);
        assert_eq!(Error::InvalidConfig("bad".into()).phase(), None);
    }
}
