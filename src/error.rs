use std::fmt;

use thiserror::Error;

use crate::session::PlayerId;

/// One failed setup check. Setup reports every failing check, not just the first.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum SetupError {
    #[error("Please enter a name for {0}.")]
    MissingName(PlayerId),
    #[error("Please enter a valid 6-digit number with no repeated digits for {0}.")]
    InvalidSecret(PlayerId),
    #[error("Game has already been set up")]
    AlreadyStarted,
}

/// Non-empty list of setup failures, in check order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupErrors(Vec<SetupError>);

impl SetupErrors {
    pub(crate) fn from_vec(errors: Vec<SetupError>) -> Option<Self> {
        if errors.is_empty() {
            None
        } else {
            Some(Self(errors))
        }
    }

    pub(crate) fn single(error: SetupError) -> Self {
        Self(vec![error])
    }

    pub fn iter(&self) -> impl Iterator<Item = &SetupError> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`: a `SetupErrors` holds at least one error.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn contains(&self, error: &SetupError) -> bool {
        self.0.contains(error)
    }
}

impl fmt::Display for SetupErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for SetupErrors {}

impl<'a> IntoIterator for &'a SetupErrors {
    type Item = &'a SetupError;
    type IntoIter = std::slice::Iter<'a, SetupError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Rejected guess submission. The session is left untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("'{0}' is not a valid 6-digit number with no repeated digits")]
    InvalidGuess(String),
    #[error("Game has not started yet")]
    NotStarted,
    #[error("Game already ended, no new guesses are accepted")]
    AlreadyFinished,
}

/// Condition that honest play cannot produce. Reported alongside the CPU move.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    #[error(
        "No candidate is consistent with the {guesses_observed} feedback(s) observed so far; guessing at random"
    )]
    EmptyBeliefState { guesses_observed: usize },
}
