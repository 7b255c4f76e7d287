use crate::error::{GameError, SetupErrors};
use crate::info_log;
use crate::session::{GameMode, PlayerId, Session, SessionSetup, TurnOutcome};

/// Options that shape every session the loop creates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GameConfig {
    pub mode: GameMode,
    /// Base seed for reproducible games; each new game offsets it by one.
    pub seed: Option<u64>,
}

impl GameConfig {
    fn new_session(&self, game_index: u64) -> Session {
        match self.seed {
            Some(seed) => Session::with_seed(self.mode, seed.wrapping_add(game_index)),
            None => Session::new(self.mode),
        }
    }
}

/// What a run of [`game_loop`] amounted to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoopSummary {
    /// Games that got past setup.
    pub games_started: usize,
    /// Winner of each game that was played to the end, in order.
    pub winners: Vec<PlayerId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserAction {
    Guess(String),
    NewGame,
    Exit,
}

/// Front-end seam. The loop drives the session and the interface only reads
/// input and shows results.
pub trait GameInterface {
    /// Collects names and secrets. `None` means the user wants to quit.
    fn read_setup(&mut self, mode: GameMode) -> Option<SessionSetup>;
    fn display_setup_errors(&mut self, errors: &SetupErrors);
    fn display_game_started(&mut self, session: &Session);
    /// Reads the next command for the current player. `None` means the input
    /// was unusable and has already been reported.
    fn read_guess(&mut self, session: &Session) -> Option<UserAction>;
    fn display_guess_error(&mut self, error: &GameError);
    fn display_turn_outcome(&mut self, session: &Session, outcome: &TurnOutcome);
    fn display_winner(&mut self, session: &Session, winner: PlayerId);
    fn display_new_game_message(&mut self);
    fn display_exit_message(&mut self);
}

pub fn game_loop<I: GameInterface>(config: &GameConfig, interface: &mut I) -> LoopSummary {
    let mut summary = LoopSummary::default();
    let mut game_index = 0;
    'games: loop {
        let mut session = config.new_session(game_index);
        game_index += 1;

        loop {
            let Some(setup) = interface.read_setup(config.mode) else {
                interface.display_exit_message();
                return summary;
            };
            match session.start(&setup) {
                Ok(()) => break,
                Err(errors) => interface.display_setup_errors(&errors),
            }
        }
        summary.games_started += 1;
        interface.display_game_started(&session);

        loop {
            let Some(action) = interface.read_guess(&session) else {
                continue;
            };
            match action {
                UserAction::Exit => {
                    info_log!("game_loop() - exit requested");
                    interface.display_exit_message();
                    return summary;
                }
                UserAction::NewGame => {
                    info_log!("game_loop() - new game requested");
                    interface.display_new_game_message();
                    continue 'games;
                }
                UserAction::Guess(guess) => match session.submit_guess(&guess) {
                    Ok(outcome) => {
                        interface.display_turn_outcome(&session, &outcome);
                        if let Some(winner) = session.winner() {
                            summary.winners.push(winner);
                            interface.display_winner(&session, winner);
                        }
                    }
                    Err(e) => interface.display_guess_error(&e),
                },
            }
        }
    }
}
