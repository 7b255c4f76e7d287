// Library interface for hits-and-blows
// This allows integration tests to access internal modules

pub mod cli;
pub mod code;
pub mod error;
pub mod game_state;
pub mod logging;
pub mod session;
pub mod solver;
pub mod tui;
pub mod universe;

// Re-export commonly used functions for easier testing
pub use code::{CODE_LENGTH, DigitCode, is_valid_digit_code};
pub use error::{GameError, InvariantViolation, SetupError, SetupErrors};
pub use game_state::{GameConfig, GameInterface, LoopSummary, UserAction, game_loop};
pub use session::{
    CpuMove, GameMode, GuessRecord, Phase, Player, PlayerId, PlayerKind, Session, SessionSetup,
    TurnOutcome, create_session,
};
pub use solver::{BeliefState, Feedback, GuessChoice, filter_candidates, get_feedback, next_guess};
pub use universe::{UNIVERSE_SIZE, all_candidates, random_secret};
