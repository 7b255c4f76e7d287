use std::fmt;

use rand::Rng;

use crate::code::{CODE_LENGTH, DigitCode};
use crate::universe::{all_candidates, random_secret};

/// Result of scoring one guess against one secret.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Feedback {
    /// Right digit, right position.
    pub hits: u8,
    /// Right digit, wrong position.
    pub blows: u8,
}

impl Feedback {
    #[must_use]
    pub const fn new(hits: u8, blows: u8) -> Self {
        Self { hits, blows }
    }

    #[must_use]
    pub const fn is_win(self) -> bool {
        self.hits as usize == CODE_LENGTH
    }
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "H: {} | B: {}", self.hits, self.blows)
    }
}

/// Scores `guess` against `secret` in one left-to-right pass.
///
/// Digits are distinct within each code, so "occurs anywhere" never counts a
/// digit twice.
#[must_use]
pub fn get_feedback(guess: &DigitCode, secret: &DigitCode) -> Feedback {
    let mut feedback = Feedback::default();
    for (g, s) in guess.digits().iter().zip(secret.digits()) {
        if g == s {
            feedback.hits += 1;
        } else if secret.contains(*g) {
            feedback.blows += 1;
        }
    }
    feedback
}

/// Keeps the candidates that would have produced `feedback` had they been the secret.
///
/// `guess` itself only survives a winning feedback, since it scores all hits
/// against itself.
#[must_use]
pub fn filter_candidates(
    candidates: &[DigitCode],
    guess: &DigitCode,
    feedback: Feedback,
) -> Vec<DigitCode> {
    candidates
        .iter()
        .filter(|candidate| get_feedback(guess, candidate) == feedback)
        .copied()
        .collect()
}

/// Where the computer's guess came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuessChoice {
    /// First candidate still consistent with every observation.
    Candidate(DigitCode),
    /// Belief state was empty; a random code was drawn instead.
    Fallback(DigitCode),
}

impl GuessChoice {
    #[must_use]
    pub fn code(self) -> DigitCode {
        match self {
            Self::Candidate(code) | Self::Fallback(code) => code,
        }
    }

    #[must_use]
    pub fn is_fallback(self) -> bool {
        matches!(self, Self::Fallback(_))
    }
}

/// The computer's set of codes still consistent with all feedback it received.
#[derive(Clone, Debug)]
pub struct BeliefState {
    candidates: Vec<DigitCode>,
    observations: usize,
}

impl BeliefState {
    /// Starts from the full candidate universe.
    #[must_use]
    pub fn new() -> Self {
        Self::from_candidates(all_candidates().to_vec())
    }

    #[must_use]
    pub fn from_candidates(candidates: Vec<DigitCode>) -> Self {
        Self {
            candidates,
            observations: 0,
        }
    }

    /// Narrows the set to codes consistent with `feedback` for `guess`.
    pub fn observe(&mut self, guess: &DigitCode, feedback: Feedback) {
        let before = self.candidates.len();
        self.candidates = filter_candidates(&self.candidates, guess, feedback);
        self.observations += 1;
        crate::debug_log!(
            "BeliefState::observe() - {} ({}) narrowed {} -> {}",
            guess,
            feedback,
            before,
            self.candidates.len()
        );
    }

    #[must_use]
    pub fn candidates(&self) -> &[DigitCode] {
        &self.candidates
    }

    #[must_use]
    pub fn contains(&self, code: &DigitCode) -> bool {
        self.candidates.contains(code)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Number of feedbacks folded in so far.
    #[must_use]
    pub fn observations(&self) -> usize {
        self.observations
    }
}

impl Default for BeliefState {
    fn default() -> Self {
        Self::new()
    }
}

/// Picks the first remaining candidate, or a random code if none remain.
pub fn next_guess<R: Rng + ?Sized>(belief: &BeliefState, rng: &mut R) -> GuessChoice {
    match belief.candidates().first() {
        Some(code) => GuessChoice::Candidate(*code),
        None => GuessChoice::Fallback(random_secret(rng)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::universe::UNIVERSE_SIZE;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn code(s: &str) -> DigitCode {
        s.parse().unwrap()
    }

    #[test]
    fn test_feedback_known_scenarios() {
        let secret = code("123456");
        assert_eq!(get_feedback(&code("123457"), &secret), Feedback::new(5, 0));
        assert_eq!(get_feedback(&code("654321"), &secret), Feedback::new(0, 6));
        assert_eq!(get_feedback(&secret, &secret), Feedback::new(6, 0));
        assert_eq!(get_feedback(&code("213456"), &secret), Feedback::new(4, 2));
        assert_eq!(get_feedback(&code("789012"), &secret), Feedback::new(0, 2));
    }

    #[test]
    fn test_feedback_bounds_and_exact_match() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..2_000 {
            let guess = random_secret(&mut rng);
            let secret = random_secret(&mut rng);
            let feedback = get_feedback(&guess, &secret);
            assert!(feedback.hits + feedback.blows <= 6);
            assert_eq!(feedback.is_win(), guess == secret);
            assert_eq!(get_feedback(&secret, &secret), Feedback::new(6, 0));
        }
    }

    #[test]
    fn test_feedback_display() {
        assert_eq!(Feedback::new(2, 3).to_string(), "H: 2 | B: 3");
    }

    #[test]
    fn test_filter_keeps_true_secret() {
        let secret = code("402817");
        let guess = code("012345");
        let feedback = get_feedback(&guess, &secret);
        let filtered = filter_candidates(all_candidates(), &guess, feedback);
        assert!(filtered.contains(&secret));
        assert!(!filtered.contains(&guess));
        assert!(filtered.len() < UNIVERSE_SIZE);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let secret = code("975310");
        let guess = code("012345");
        let feedback = get_feedback(&guess, &secret);
        let once = filter_candidates(all_candidates(), &guess, feedback);
        let twice = filter_candidates(&once, &guess, feedback);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_filter_with_winning_feedback_keeps_only_guess() {
        let guess = code("012345");
        let filtered = filter_candidates(all_candidates(), &guess, Feedback::new(6, 0));
        assert_eq!(filtered, vec![guess]);
    }

    #[test]
    fn test_filter_impossible_feedback_empties() {
        // Six distinct digits out of ten always share at least two with another code.
        let filtered = filter_candidates(all_candidates(), &code("012345"), Feedback::new(0, 0));
        assert!(filtered.is_empty());
    }

    #[test]
    fn test_belief_state_narrows_but_keeps_secret() {
        let secret = code("246789");
        let mut belief = BeliefState::new();
        assert_eq!(belief.len(), UNIVERSE_SIZE);

        let guess = code("012345");
        let feedback = get_feedback(&guess, &secret);
        assert_eq!(feedback, Feedback::new(0, 2));
        belief.observe(&guess, feedback);

        assert!(belief.len() < UNIVERSE_SIZE);
        assert!(!belief.is_empty());
        assert!(belief.contains(&secret));
        assert_eq!(belief.observations(), 1);
    }

    #[test]
    fn test_belief_state_converges_on_secret() {
        let secret = code("863129");
        let mut belief = BeliefState::new();
        let mut rng = StdRng::seed_from_u64(0);
        let mut previous = belief.len();
        for _ in 0..20 {
            let guess = next_guess(&belief, &mut rng);
            assert!(!guess.is_fallback());
            let feedback = get_feedback(&guess.code(), &secret);
            if feedback.is_win() {
                assert_eq!(guess.code(), secret);
                return;
            }
            belief.observe(&guess.code(), feedback);
            assert!(belief.len() <= previous);
            assert!(belief.contains(&secret));
            previous = belief.len();
        }
        panic!("Secret not found within 20 guesses");
    }

    #[test]
    fn test_next_guess_picks_first_candidate() {
        let belief = BeliefState::new();
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            next_guess(&belief, &mut rng),
            GuessChoice::Candidate(code("012345"))
        );
    }

    #[test]
    fn test_next_guess_falls_back_when_empty() {
        let belief = BeliefState::from_candidates(Vec::new());
        let mut rng = StdRng::seed_from_u64(1);
        let choice = next_guess(&belief, &mut rng);
        assert!(choice.is_fallback());
        assert!(crate::code::is_valid_digit_code(&choice.code().to_string()));
    }
}
