use std::fmt;
use std::str::FromStr;

use crate::error::GameError;

/// Number of digits in every secret and guess.
pub const CODE_LENGTH: usize = 6;

/// A 6-digit number with pairwise-distinct digits. Leading zeros are allowed.
///
/// Secrets and guesses share this type. The only ways to build one go through
/// validation, so a `DigitCode` in hand always satisfies the distinct-digit rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DigitCode([u8; CODE_LENGTH]);

impl DigitCode {
    /// Builds a code from its zero-padded decimal value, e.g. `12345` is `012345`.
    /// Returns `None` when the value has more than six digits or repeats a digit.
    #[must_use]
    pub fn from_number(value: u32) -> Option<Self> {
        if value >= 1_000_000 {
            return None;
        }
        let mut digits = [0u8; CODE_LENGTH];
        let mut rest = value;
        for slot in digits.iter_mut().rev() {
            *slot = (rest % 10) as u8;
            rest /= 10;
        }
        Self::from_digits(digits)
    }

    /// Returns `None` when any digit is above 9 or appears twice.
    #[must_use]
    pub fn from_digits(digits: [u8; CODE_LENGTH]) -> Option<Self> {
        let mut seen = [false; 10];
        for &d in &digits {
            let slot = seen.get_mut(usize::from(d))?;
            if *slot {
                return None;
            }
            *slot = true;
        }
        Some(Self(digits))
    }

    /// For callers that only ever pick unused digits below ten.
    pub(crate) const fn from_distinct_digits(digits: [u8; CODE_LENGTH]) -> Self {
        Self(digits)
    }

    #[must_use]
    pub fn digits(&self) -> &[u8; CODE_LENGTH] {
        &self.0
    }

    #[must_use]
    pub fn contains(&self, digit: u8) -> bool {
        self.0.contains(&digit)
    }
}

impl fmt::Display for DigitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for d in self.0 {
            write!(f, "{d}")?;
        }
        Ok(())
    }
}

impl FromStr for DigitCode {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != CODE_LENGTH || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(GameError::InvalidGuess(s.to_string()));
        }
        let mut digits = [0u8; CODE_LENGTH];
        for (slot, b) in digits.iter_mut().zip(s.bytes()) {
            *slot = b - b'0';
        }
        Self::from_digits(digits).ok_or_else(|| GameError::InvalidGuess(s.to_string()))
    }
}

impl TryFrom<&str> for DigitCode {
    type Error = GameError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Exactly six characters, all decimal digits, none repeated.
///
/// Used for both setup secrets and in-game guesses. The input is checked as
/// given; callers trim user input first.
#[must_use]
pub fn is_valid_digit_code(s: &str) -> bool {
    s.parse::<DigitCode>().is_ok()
}
