//! Session controller: turn order, win detection and the computer's automatic reply.
//!
//! A [`Session`] moves through three phases:
//! - `Setup`: names and secrets are not accepted yet, guesses are rejected
//! - `InProgress`: players alternate guesses, starting with player one
//! - `Finished`: terminal, the winner is fixed and guesses are rejected
//!
//! In [`GameMode::HumanVsCpu`] player two is the computer. After every
//! non-winning human guess the session plays the computer's turn before
//! returning, so callers only ever submit human guesses.

use std::fmt;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::code::DigitCode;
use crate::error::{GameError, InvariantViolation, SetupError, SetupErrors};
use crate::solver::{BeliefState, Feedback, GuessChoice, get_feedback, next_guess};
use crate::universe::random_secret;
use crate::{debug_log, info_log};

/// Name given to the computer when setup leaves it blank.
pub const DEFAULT_CPU_NAME: &str = "CPU";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlayerId {
    One,
    Two,
}

impl PlayerId {
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::One => Self::Two,
            Self::Two => Self::One,
        }
    }

    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::One => 0,
            Self::Two => 1,
        }
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::One => f.write_str("Player 1"),
            Self::Two => f.write_str("Player 2"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerKind {
    Human,
    Cpu,
}

#[derive(Clone, Debug)]
pub struct Player {
    name: String,
    secret: DigitCode,
    kind: PlayerKind,
}

impl Player {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn kind(&self) -> PlayerKind {
        self.kind
    }

    #[must_use]
    pub fn is_cpu(&self) -> bool {
        self.kind == PlayerKind::Cpu
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum GameMode {
    #[default]
    HumanVsHuman,
    HumanVsCpu,
}

impl GameMode {
    #[must_use]
    pub fn is_cpu(self) -> bool {
        self == Self::HumanVsCpu
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Setup,
    InProgress,
    Finished,
}

/// Raw setup input as typed by the players. Player two's secret is ignored
/// against the computer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionSetup {
    pub player1_name: String,
    pub player1_secret: String,
    pub player2_name: String,
    pub player2_secret: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GuessRecord {
    pub guess: DigitCode,
    pub feedback: Feedback,
}

/// The computer's automatic turn, played right after a human guess.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CpuMove {
    pub guess: DigitCode,
    pub feedback: Feedback,
    pub winner: Option<PlayerId>,
    /// Set when the guess had to be drawn at random.
    pub diagnostic: Option<InvariantViolation>,
    /// Candidates left for the human's secret after this move.
    pub remaining_candidates: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TurnOutcome {
    pub player: PlayerId,
    pub guess: DigitCode,
    pub feedback: Feedback,
    pub winner: Option<PlayerId>,
    pub cpu_move: Option<CpuMove>,
}

pub struct Session {
    mode: GameMode,
    phase: Phase,
    players: Option<[Player; 2]>,
    belief: Option<BeliefState>,
    turn: PlayerId,
    winner: Option<PlayerId>,
    history: [Vec<GuessRecord>; 2],
    rng: StdRng,
}

impl Session {
    /// New session in the `Setup` phase, seeded from the OS.
    #[must_use]
    pub fn new(mode: GameMode) -> Self {
        Self::with_rng(mode, StdRng::from_os_rng())
    }

    /// Same as [`Session::new`] but reproducible: the computer's secret and any
    /// fallback guesses depend only on `seed`.
    #[must_use]
    pub fn with_seed(mode: GameMode, seed: u64) -> Self {
        Self::with_rng(mode, StdRng::seed_from_u64(seed))
    }

    fn with_rng(mode: GameMode, rng: StdRng) -> Self {
        Self {
            mode,
            phase: Phase::Setup,
            players: None,
            belief: None,
            turn: PlayerId::One,
            winner: None,
            history: [Vec::new(), Vec::new()],
            rng,
        }
    }

    /// Validates `setup` and moves to `InProgress`.
    ///
    /// Every failing check is reported. On failure the session stays in `Setup`.
    pub fn start(&mut self, setup: &SessionSetup) -> Result<(), SetupErrors> {
        if self.phase != Phase::Setup {
            return Err(SetupErrors::single(SetupError::AlreadyStarted));
        }

        let vs_cpu = self.mode.is_cpu();
        let name1 = setup.player1_name.trim();
        let name2 = match setup.player2_name.trim() {
            "" if vs_cpu => DEFAULT_CPU_NAME,
            name => name,
        };

        let mut errors = Vec::new();
        if name1.is_empty() {
            errors.push(SetupError::MissingName(PlayerId::One));
        }
        if name2.is_empty() {
            errors.push(SetupError::MissingName(PlayerId::Two));
        }
        let secret1 = setup.player1_secret.parse::<DigitCode>().ok();
        if secret1.is_none() {
            errors.push(SetupError::InvalidSecret(PlayerId::One));
        }
        // The computer's secret is drawn only after everything else is valid.
        let secret2 = if vs_cpu {
            None
        } else {
            let secret = setup.player2_secret.parse::<DigitCode>().ok();
            if secret.is_none() {
                errors.push(SetupError::InvalidSecret(PlayerId::Two));
            }
            secret
        };

        if let Some(errors) = SetupErrors::from_vec(errors) {
            info_log!("Session::start() - setup rejected: {} error(s)", errors.len());
            return Err(errors);
        }

        let human = |name: &str, secret| Player {
            name: name.to_string(),
            secret,
            kind: PlayerKind::Human,
        };
        let players = match (secret1, secret2) {
            (Some(secret1), Some(secret2)) => [human(name1, secret1), human(name2, secret2)],
            (Some(secret1), None) => [
                human(name1, secret1),
                Player {
                    name: name2.to_string(),
                    secret: random_secret(&mut self.rng),
                    kind: PlayerKind::Cpu,
                },
            ],
            (None, _) => {
                return Err(SetupErrors::single(SetupError::InvalidSecret(PlayerId::One)));
            }
        };

        self.players = Some(players);
        if vs_cpu {
            self.belief = Some(BeliefState::new());
        }
        self.phase = Phase::InProgress;
        info_log!(
            "Session::start() - {:?} game started: {} vs {}",
            self.mode,
            name1,
            name2
        );
        Ok(())
    }

    /// Scores `guess` for the player whose turn it is.
    ///
    /// A malformed guess, or a guess outside `InProgress`, is rejected without
    /// touching the session. Against the computer, a non-winning guess is
    /// followed by the computer's own move, reported in `cpu_move`.
    pub fn submit_guess(&mut self, guess: &str) -> Result<TurnOutcome, GameError> {
        match self.phase {
            Phase::Setup => return Err(GameError::NotStarted),
            Phase::Finished => return Err(GameError::AlreadyFinished),
            Phase::InProgress => {}
        }
        let secrets = self.secrets().ok_or(GameError::NotStarted)?;
        let guess: DigitCode = guess.parse()?;

        let player = self.turn;
        let feedback = self.play(player, guess, &secrets[player.opponent().index()]);
        let mut outcome = TurnOutcome {
            player,
            guess,
            feedback,
            winner: self.winner,
            cpu_move: None,
        };

        if self.phase == Phase::InProgress && self.is_cpu_turn() {
            let target = secrets[self.turn.opponent().index()];
            outcome.cpu_move = Some(self.play_cpu_turn(&target));
        }
        Ok(outcome)
    }

    /// Scores and records one guess, then either ends the game or passes the turn.
    fn play(&mut self, player: PlayerId, guess: DigitCode, secret: &DigitCode) -> Feedback {
        let feedback = get_feedback(&guess, secret);
        self.history[player.index()].push(GuessRecord { guess, feedback });
        debug_log!("Session::play() - {} guessed {}: {}", player, guess, feedback);

        if feedback.is_win() {
            self.phase = Phase::Finished;
            self.winner = Some(player);
            info_log!(
                "Session::play() - {} wins after {} guess(es)",
                player,
                self.history[player.index()].len()
            );
        } else {
            self.turn = player.opponent();
        }
        feedback
    }

    /// Plays the computer's move against `target`, the human's secret.
    fn play_cpu_turn(&mut self, target: &DigitCode) -> CpuMove {
        let cpu = self.turn;
        let (choice, observed) = match &self.belief {
            Some(belief) => (next_guess(belief, &mut self.rng), belief.observations()),
            None => (GuessChoice::Fallback(random_secret(&mut self.rng)), 0),
        };

        let diagnostic = choice.is_fallback().then(|| {
            let violation = InvariantViolation::EmptyBeliefState {
                guesses_observed: observed,
            };
            log::warn!("{violation}");
            violation
        });

        let guess = choice.code();
        let feedback = self.play(cpu, guess, target);
        if !feedback.is_win()
            && let Some(belief) = self.belief.as_mut()
        {
            belief.observe(&guess, feedback);
        }

        CpuMove {
            guess,
            feedback,
            winner: self.winner,
            diagnostic,
            remaining_candidates: self.remaining_candidates().unwrap_or(0),
        }
    }

    #[must_use]
    pub fn mode(&self) -> GameMode {
        self.mode
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Whose turn it is. Meaningless once the game has finished.
    #[must_use]
    pub fn current_player(&self) -> PlayerId {
        self.turn
    }

    #[must_use]
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.as_ref().map(|players| &players[id.index()])
    }

    #[must_use]
    pub fn winner(&self) -> Option<PlayerId> {
        self.winner
    }

    /// Guesses made by `id`, oldest first.
    #[must_use]
    pub fn history(&self, id: PlayerId) -> &[GuessRecord] {
        &self.history[id.index()]
    }

    /// Size of the computer's belief state; `None` outside computer games.
    #[must_use]
    pub fn remaining_candidates(&self) -> Option<usize> {
        self.belief.as_ref().map(BeliefState::len)
    }

    /// A player's secret, available only once the game is over.
    #[must_use]
    pub fn revealed_secret(&self, id: PlayerId) -> Option<DigitCode> {
        if self.phase != Phase::Finished {
            return None;
        }
        self.player(id).map(|player| player.secret)
    }

    fn secrets(&self) -> Option<[DigitCode; 2]> {
        self.players
            .as_ref()
            .map(|[one, two]| [one.secret, two.secret])
    }

    fn is_cpu_turn(&self) -> bool {
        self.player(self.turn).is_some_and(Player::is_cpu)
    }
}

/// Creates a session and starts it in one step.
pub fn create_session(setup: &SessionSetup, mode: GameMode) -> Result<Session, SetupErrors> {
    let mut session = Session::new(mode);
    session.start(setup)?;
    Ok(session)
}
