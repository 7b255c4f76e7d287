use clap::Parser;
use crate::code::is_valid_digit_code;
use crate::error::{GameError, SetupErrors};
use crate::game_state::{GameConfig, GameInterface, UserAction};
use crate::session::{GameMode, PlayerId, Session, SessionSetup, TurnOutcome};
use std::io::BufRead;
use std::path::PathBuf;

/// Hits and Blows: guess your opponent's 6-digit number
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Play against the computer (it takes player 2)
    #[arg(long)]
    pub cpu: bool,

    /// Use the plain line-based interface instead of the terminal UI
    #[arg(long)]
    pub cli: bool,

    /// Seed for the computer's secret, for reproducible games
    #[arg(long)]
    pub seed: Option<u64>,

    /// Where to write the log (defaults to the user cache directory)
    #[arg(long = "log-file")]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    #[must_use]
    pub fn game_config(&self) -> GameConfig {
        GameConfig {
            mode: if self.cpu {
                GameMode::HumanVsCpu
            } else {
                GameMode::HumanVsHuman
            },
            seed: self.seed,
        }
    }
}

#[must_use]
pub fn parse_cli() -> Cli {
    Cli::parse()
}

// UI Input/Output functions

pub enum GuessInput {
    Valid(String),
    Invalid,
    Exit,
    NewGame,
}

/// Reads one trimmed line. `None` on end of input or a read error.
fn read_trimmed_line<R: BufRead>(reader: &mut R) -> Option<String> {
    let mut input = String::new();
    match reader.read_line(&mut input) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(input.trim().to_string()),
    }
}

/// Prompts for a setup field. `None` when the user types `exit` or input ends.
fn prompt_field<R: BufRead>(reader: &mut R, prompt: &str) -> Option<String> {
    println!("{prompt}");
    let input = read_trimmed_line(reader)?;
    if input.eq_ignore_ascii_case("exit") {
        None
    } else {
        Some(input)
    }
}

pub fn read_setup<R: BufRead>(reader: &mut R, mode: GameMode) -> Option<SessionSetup> {
    println!("\nSet up a new game (type 'exit' to quit).");
    let mut setup = SessionSetup {
        player1_name: prompt_field(reader, "Player 1 name:")?,
        player1_secret: prompt_field(reader, "Player 1 secret number (6 distinct digits):")?,
        ..SessionSetup::default()
    };
    if mode.is_cpu() {
        println!("Player 2 is the computer.");
    } else {
        setup.player2_name = prompt_field(reader, "Player 2 name:")?;
        setup.player2_secret =
            prompt_field(reader, "Player 2 secret number (6 distinct digits):")?;
    }
    Some(setup)
}

pub fn display_setup_errors(errors: &SetupErrors) {
    for error in errors {
        println!("{error}");
    }
}

pub fn display_game_started(session: &Session) {
    let name = move |id: PlayerId| session.player(id).map_or("?", |p| p.name());
    println!(
        "\nGame started: {} vs {}",
        name(PlayerId::One),
        name(PlayerId::Two)
    );
}

pub fn read_guess<R: BufRead>(reader: &mut R, session: &Session) -> GuessInput {
    if session.winner().is_some() {
        println!("\nGame over. Enter 'next' to start a new game or 'exit' to quit:");
    } else {
        let name = session
            .player(session.current_player())
            .map_or("?", |p| p.name());
        println!(
            "\n{name}'s turn! Enter your guess (6 distinct digits, or 'exit' to quit, or 'next' to start a new game):"
        );
    }
    let Some(input) = read_trimmed_line(reader) else {
        return GuessInput::Exit;
    };

    match input.to_lowercase().as_str() {
        "exit" => GuessInput::Exit,
        "next" => GuessInput::NewGame,
        _ if is_valid_digit_code(&input) || session.winner().is_some() => {
            GuessInput::Valid(input)
        }
        _ => {
            println!("Invalid guess. Please enter a 6-digit number with no repeated digits.");
            GuessInput::Invalid
        }
    }
}

pub fn display_guess_error(error: &GameError) {
    println!("{error}");
}

pub fn display_turn_outcome(session: &Session, outcome: &TurnOutcome) {
    let name = move |id: PlayerId| session.player(id).map_or("?", |p| p.name());
    println!("{}: {} | {}", name(outcome.player), outcome.guess, outcome.feedback);
    if outcome.winner.is_none() {
        println!(
            "Hits: {}, Blows: {}",
            outcome.feedback.hits, outcome.feedback.blows
        );
    }
    if let Some(cpu_move) = &outcome.cpu_move {
        if let Some(diagnostic) = &cpu_move.diagnostic {
            println!("Warning: {diagnostic}");
        }
        println!(
            "{}: {} | {} ({} candidates left)",
            name(outcome.player.opponent()),
            cpu_move.guess,
            cpu_move.feedback,
            cpu_move.remaining_candidates
        );
    }
}

pub fn display_winner(session: &Session, winner: PlayerId) {
    let Some(player) = session.player(winner) else {
        return;
    };
    println!("Congratulations, {}! You guessed the number!!", player.name());
    if let Some(secret) = session.revealed_secret(winner) {
        println!("{}'s number was {secret}.", player.name());
    }
}

pub fn display_exit_message() {
    println!("Exiting.");
}

pub fn display_new_game_message() {
    println!("New game started.");
}

/// CLI implementation of the GameInterface trait
/// This struct wraps a BufRead reader and implements the game interface for CLI interaction
pub struct CliInterface<R: BufRead> {
    reader: R,
}

impl<R: BufRead> CliInterface<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> GameInterface for CliInterface<R> {
    fn read_setup(&mut self, mode: GameMode) -> Option<SessionSetup> {
        read_setup(&mut self.reader, mode)
    }

    fn display_setup_errors(&mut self, errors: &SetupErrors) {
        display_setup_errors(errors);
    }

    fn display_game_started(&mut self, session: &Session) {
        display_game_started(session);
    }

    fn read_guess(&mut self, session: &Session) -> Option<UserAction> {
        match read_guess(&mut self.reader, session) {
            GuessInput::Valid(guess) => Some(UserAction::Guess(guess)),
            GuessInput::Exit => Some(UserAction::Exit),
            GuessInput::NewGame => Some(UserAction::NewGame),
            GuessInput::Invalid => None,
        }
    }

    fn display_guess_error(&mut self, error: &GameError) {
        display_guess_error(error);
    }

    fn display_turn_outcome(&mut self, session: &Session, outcome: &TurnOutcome) {
        display_turn_outcome(session, outcome);
    }

    fn display_winner(&mut self, session: &Session, winner: PlayerId) {
        display_winner(session, winner);
    }

    fn display_new_game_message(&mut self) {
        display_new_game_message();
    }

    fn display_exit_message(&mut self) {
        display_exit_message();
    }
}
