use std::sync::OnceLock;

use rand::Rng;

use crate::code::{CODE_LENGTH, DigitCode};

/// 10 * 9 * 8 * 7 * 6 * 5
pub const UNIVERSE_SIZE: usize = 151_200;

static UNIVERSE: OnceLock<Vec<DigitCode>> = OnceLock::new();

/// Every valid code, ascending by numeric value (`012345` first, `987654` last).
///
/// Built on first use and shared afterwards. Callers that need to mutate the
/// set clone it.
pub fn all_candidates() -> &'static [DigitCode] {
    UNIVERSE.get_or_init(|| {
        let mut codes = Vec::with_capacity(UNIVERSE_SIZE);
        codes.extend((0..1_000_000).filter_map(DigitCode::from_number));
        crate::debug_log!("Candidate universe built: {} codes", codes.len());
        codes
    })
}

/// Draws random digits, keeping each one not seen yet, until six are collected.
pub fn random_secret<R: Rng + ?Sized>(rng: &mut R) -> DigitCode {
    let mut digits = [0u8; CODE_LENGTH];
    let mut seen = [false; 10];
    let mut filled = 0;
    while filled < CODE_LENGTH {
        let d: u8 = rng.random_range(0..10);
        if !seen[usize::from(d)] {
            seen[usize::from(d)] = true;
            digits[filled] = d;
            filled += 1;
        }
    }
    DigitCode::from_distinct_digits(digits)
}
