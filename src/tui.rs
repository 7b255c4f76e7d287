//! TUI (Terminal User Interface) module for Hits and Blows
//!
//! This module provides an interactive terminal interface using Ratatui.
//!
//! # Screens
//! - Setup form: player names and secret numbers, secrets masked
//! - Board: one guess-history panel per player, turn indicator and results
//!
//! # State Machine
//! The UI follows these state transitions:
//! - `Setup` → `EnteringGuess` → (winning guess) → `GameOver`
//! - `GameOver` → `Setup` on a new game

use crate::code::{CODE_LENGTH, is_valid_digit_code};
use crate::error::{GameError, SetupErrors};
use crate::game_state::{GameInterface, UserAction};
use crate::session::{DEFAULT_CPU_NAME, GameMode, PlayerId, Session, SessionSetup, TurnOutcome};
use crate::{debug_log, info_log};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use std::io;

const MAX_NAME_LENGTH: usize = 20;
const EVENT_POLL_TIMEOUT_MS: u64 = 100;
const ASCII_CONTROL_CHAR_THRESHOLD: u32 = 32;

// Style constants for consistent UI
const HEADER_STYLE: Style = Style::new().fg(Color::Cyan).add_modifier(Modifier::BOLD);
const ERROR_STYLE: Style = Style::new().fg(Color::Red);
const SUCCESS_STYLE: Style = Style::new().fg(Color::Green).add_modifier(Modifier::BOLD);
const INFO_STYLE: Style = Style::new().fg(Color::Yellow).add_modifier(Modifier::BOLD);
const MESSAGE_STYLE: Style = Style::new().fg(Color::Cyan);

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum SetupField {
    Player1Name,
    Player1Secret,
    Player2Name,
    Player2Secret,
}

impl SetupField {
    fn label(self) -> &'static str {
        match self {
            Self::Player1Name => "Player 1 name",
            Self::Player1Secret => "Player 1 number",
            Self::Player2Name => "Player 2 name",
            Self::Player2Secret => "Player 2 number",
        }
    }

    fn is_secret(self) -> bool {
        matches!(self, Self::Player1Secret | Self::Player2Secret)
    }

    /// Fields shown for `mode`, in tab order.
    fn for_mode(mode: GameMode) -> &'static [SetupField] {
        if mode.is_cpu() {
            &[Self::Player1Name, Self::Player1Secret, Self::Player2Name]
        } else {
            &[
                Self::Player1Name,
                Self::Player1Secret,
                Self::Player2Name,
                Self::Player2Secret,
            ]
        }
    }
}

#[derive(Debug)]
enum TuiState {
    Setup { field_index: usize },
    EnteringGuess,
    /// Winner decided - message stored in interface.message
    GameOver,
}

/// One player's column on the board.
#[derive(Debug, Default, Clone)]
struct HistoryPanel {
    title: String,
    rows: Vec<String>,
}

/// Context for rendering the UI - groups related parameters to avoid too many function arguments.
struct RenderContext<'a> {
    state: &'a TuiState,
    mode: GameMode,
    setup: &'a SessionSetup,
    panels: &'a [HistoryPanel; 2],
    current_input: &'a str,
    turn_indicator: &'a str,
    message: &'a str,
    error_lines: &'a [String],
    status: &'a str,
}

/// Main TUI interface component.
///
/// Manages terminal rendering, input handling, and game state display.
pub struct TuiInterface {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    state: TuiState,
    mode: GameMode,
    setup: SessionSetup,
    panels: [HistoryPanel; 2],
    current_input: String,
    turn_indicator: String,
    message: String,
    error_lines: Vec<String>,
    status: String,
}

impl TuiInterface {
    pub fn new() -> Result<Self, io::Error> {
        info_log!("TuiInterface::new() - Initializing TUI");
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, cursor::Hide)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        info_log!("Terminal setup complete: raw mode, alternate screen, cursor hidden");

        Ok(Self {
            terminal,
            state: TuiState::Setup { field_index: 0 },
            mode: GameMode::default(),
            setup: SessionSetup::default(),
            panels: Default::default(),
            current_input: String::new(),
            turn_indicator: String::new(),
            message: String::new(),
            error_lines: Vec::new(),
            status: "Ready to start".to_string(),
        })
    }

    pub fn cleanup(&mut self) -> Result<(), io::Error> {
        disable_raw_mode()?;
        execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            cursor::Show
        )?;
        Ok(())
    }

    /// Draw the current UI state to the terminal.
    fn draw(&mut self) -> Result<(), io::Error> {
        let ctx = RenderContext {
            state: &self.state,
            mode: self.mode,
            setup: &self.setup,
            panels: &self.panels,
            current_input: &self.current_input,
            turn_indicator: &self.turn_indicator,
            message: &self.message,
            error_lines: &self.error_lines,
            status: &self.status,
        };

        self.terminal.draw(|f| {
            Self::render_static(f, &ctx);
        })?;
        Ok(())
    }

    /// Log and handle draw errors appropriately
    fn draw_or_log(&mut self) {
        if let Err(e) = self.draw() {
            debug_log!("Draw error: {}", e);
        }
    }

    /// Render the complete UI layout using the provided context.
    fn render_static(f: &mut Frame, ctx: &RenderContext) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Title
                Constraint::Min(10),   // Setup form or board
                Constraint::Length(7), // Info panel
                Constraint::Length(3), // Status line
                Constraint::Length(3), // Instructions
            ])
            .split(f.area());

        Self::render_title(f, chunks[0], ctx.mode);
        match ctx.state {
            TuiState::Setup { field_index } => {
                Self::render_setup(f, chunks[1], ctx.setup, ctx.mode, *field_index);
            }
            TuiState::EnteringGuess | TuiState::GameOver => {
                Self::render_board(f, chunks[1], ctx);
            }
        }
        Self::render_info(f, chunks[2], ctx.message, ctx.error_lines);
        Self::render_status(f, chunks[3], ctx.status);
        Self::render_instructions(f, chunks[4], ctx.state);
    }

    fn render_title(f: &mut Frame, area: Rect, mode: GameMode) {
        let text = if mode.is_cpu() {
            "HITS AND BLOWS - vs CPU"
        } else {
            "HITS AND BLOWS"
        };
        let title = Paragraph::new(text)
            .style(HEADER_STYLE)
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(title, area);
    }

    fn render_setup(
        f: &mut Frame,
        area: Rect,
        setup: &SessionSetup,
        mode: GameMode,
        field_index: usize,
    ) {
        let mut lines = Vec::new();
        for (i, field) in SetupField::for_mode(mode).iter().enumerate() {
            let value = Self::field_value(setup, *field);
            let shown = if field.is_secret() {
                "*".repeat(value.chars().count())
            } else {
                value.to_string()
            };
            let selected = i == field_index;
            let style = if selected {
                INFO_STYLE
            } else {
                Style::default()
            };
            let marker = if selected { "> " } else { "  " };
            lines.push(Line::from(vec![
                Span::styled(format!("{marker}{:<16}", field.label()), style),
                Span::styled(
                    format!(" {shown:<width$} ", width = CODE_LENGTH),
                    Style::default().fg(Color::White).bg(Color::DarkGray),
                ),
            ]));
            lines.push(Line::from(""));
        }
        if mode.is_cpu() {
            lines.push(Line::from(format!(
                "  Player 2 is the computer (blank name: {DEFAULT_CPU_NAME})."
            )));
        }

        let paragraph =
            Paragraph::new(lines).block(Block::default().title("Setup").borders(Borders::ALL));
        f.render_widget(paragraph, area);
    }

    fn render_board(f: &mut Frame, area: Rect, ctx: &RenderContext) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(4)])
            .split(area);

        let mut input_spans = vec![Span::styled(ctx.turn_indicator, HEADER_STYLE)];
        if matches!(ctx.state, TuiState::EnteringGuess) {
            input_spans.push(Span::raw("  "));
            for i in 0..CODE_LENGTH {
                let digit = ctx.current_input.chars().nth(i).unwrap_or(' ');
                input_spans.push(Span::styled(
                    format!(" {digit} "),
                    Style::default().fg(Color::White).bg(Color::DarkGray),
                ));
                input_spans.push(Span::raw(" "));
            }
        }
        let input = Paragraph::new(Line::from(input_spans))
            .block(Block::default().title("Turn").borders(Borders::ALL));
        f.render_widget(input, rows[0]);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[1]);
        for (panel, column) in ctx.panels.iter().zip(columns.iter()) {
            Self::render_history(f, *column, panel);
        }
    }

    fn render_history(f: &mut Frame, area: Rect, panel: &HistoryPanel) {
        let block = Block::default()
            .title(panel.title.as_str())
            .borders(Borders::ALL);
        // Most recent guesses win when the panel is too short
        let visible = block.inner(area).height as usize;
        let skip = panel.rows.len().saturating_sub(visible);
        let lines: Vec<Line> = panel
            .rows
            .iter()
            .skip(skip)
            .map(|row| Line::from(row.as_str()))
            .collect();
        f.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn render_info(f: &mut Frame, area: Rect, message: &str, error_lines: &[String]) {
        let mut lines = Vec::new();

        if !message.is_empty() {
            let style = if message.starts_with("Congratulations") {
                SUCCESS_STYLE
            } else {
                MESSAGE_STYLE
            };
            lines.push(Line::from(vec![Span::styled(message, style)]));
        }

        for error in error_lines {
            lines.push(Line::from(vec![Span::styled(error.as_str(), ERROR_STYLE)]));
        }

        let paragraph = Paragraph::new(lines)
            .block(Block::default().title("Information").borders(Borders::ALL))
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
    }

    fn render_instructions(f: &mut Frame, area: Rect, state: &TuiState) {
        let text = match state {
            TuiState::Setup { .. } => {
                "TAB/↓: Next field | ↑: Previous field | ENTER: Next / Start | ESC: Quit"
            }
            TuiState::EnteringGuess => "Type 6 distinct digits | ENTER: Submit | ESC: Quit",
            TuiState::GameOver => "N: New Game | ESC: Quit",
        };

        let paragraph = Paragraph::new(text)
            .style(Style::default().fg(Color::Gray))
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(paragraph, area);
    }

    fn render_status(f: &mut Frame, area: Rect, status: &str) {
        let status_text = if status.is_empty() { "Ready" } else { status };
        let paragraph = Paragraph::new(status_text)
            .style(HEADER_STYLE)
            .block(Block::default().borders(Borders::ALL).title("Status"));
        f.render_widget(paragraph, area);
    }

    fn field_value(setup: &SessionSetup, field: SetupField) -> &str {
        match field {
            SetupField::Player1Name => &setup.player1_name,
            SetupField::Player1Secret => &setup.player1_secret,
            SetupField::Player2Name => &setup.player2_name,
            SetupField::Player2Secret => &setup.player2_secret,
        }
    }

    fn field_value_mut(&mut self, field: SetupField) -> &mut String {
        match field {
            SetupField::Player1Name => &mut self.setup.player1_name,
            SetupField::Player1Secret => &mut self.setup.player1_secret,
            SetupField::Player2Name => &mut self.setup.player2_name,
            SetupField::Player2Secret => &mut self.setup.player2_secret,
        }
    }

    /// Waits briefly for a key press. Non-key events and garbage characters
    /// from terminal escape sequences are dropped.
    fn next_key(&mut self) -> Result<Option<KeyEvent>, io::Error> {
        if !event::poll(std::time::Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            return Ok(None);
        }

        match event::read()? {
            Event::Key(key) => {
                // Only process Press events, ignore Release and Repeat to avoid double input
                if key.kind != event::KeyEventKind::Press {
                    return Ok(None);
                }
                if let KeyCode::Char(c) = key.code
                    && (c == '\u{FFFD}' || (c as u32) < ASCII_CONTROL_CHAR_THRESHOLD)
                {
                    debug_log!("next_key() - Ignoring invalid character: {:?}", c);
                    return Ok(None);
                }
                if Self::has_modifier_keys(&key) {
                    debug_log!("next_key() - Ignoring key with modifier: {:?}", key.modifiers);
                    return Ok(None);
                }
                Ok(Some(key))
            }
            other => {
                debug_log!("next_key() - Ignoring event: {:?}", other);
                Ok(None)
            }
        }
    }

    fn has_modifier_keys(key: &KeyEvent) -> bool {
        key.modifiers.contains(event::KeyModifiers::ALT)
            || key.modifiers.contains(event::KeyModifiers::CONTROL)
    }

    /// Returns `Some(true)` when the form is submitted, `Some(false)` on quit.
    fn handle_setup_input(&mut self, key: KeyEvent) -> Option<bool> {
        let TuiState::Setup { field_index } = self.state else {
            return None;
        };
        let fields = SetupField::for_mode(self.mode);
        let field = fields[field_index];

        match key.code {
            KeyCode::Esc => return Some(false),
            KeyCode::Tab | KeyCode::Down => {
                self.state = TuiState::Setup {
                    field_index: (field_index + 1) % fields.len(),
                };
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.state = TuiState::Setup {
                    field_index: (field_index + fields.len() - 1) % fields.len(),
                };
            }
            KeyCode::Enter if field_index + 1 == fields.len() => {
                info_log!("handle_setup_input() - Setup form submitted");
                return Some(true);
            }
            KeyCode::Enter => {
                self.state = TuiState::Setup {
                    field_index: field_index + 1,
                };
            }
            KeyCode::Backspace => {
                self.field_value_mut(field).pop();
            }
            KeyCode::Char(c) if field.is_secret() => {
                let value = self.field_value_mut(field);
                if c.is_ascii_digit() && value.len() < CODE_LENGTH {
                    value.push(c);
                } else if !c.is_ascii_digit() {
                    self.error_lines =
                        vec![format!("Only digits are allowed! ('{c}' is not a digit)")];
                }
            }
            KeyCode::Char(c) => {
                let value = self.field_value_mut(field);
                if value.chars().count() < MAX_NAME_LENGTH {
                    value.push(c);
                }
            }
            _ => {
                debug_log!("handle_setup_input() - Ignoring key: {:?}", key.code);
            }
        }
        None
    }

    fn handle_guess_input(&mut self, key: KeyEvent) -> Option<UserAction> {
        self.error_lines.clear();

        match key.code {
            KeyCode::Char(c) if c.is_ascii_digit() && self.current_input.len() < CODE_LENGTH => {
                if self.current_input.contains(c) {
                    self.error_lines = vec![format!("Digit '{c}' is already in your guess!")];
                } else {
                    self.current_input.push(c);
                }
            }
            KeyCode::Backspace if !self.current_input.is_empty() => {
                self.current_input.pop();
            }
            KeyCode::Enter if is_valid_digit_code(&self.current_input) => {
                let guess = std::mem::take(&mut self.current_input);
                info_log!("handle_guess_input() - Submitting guess: '{}'", guess);
                return Some(UserAction::Guess(guess));
            }
            KeyCode::Enter => {
                self.error_lines =
                    vec!["Please enter a valid 6-digit number with no repeated digits.".to_string()];
            }
            KeyCode::Esc => {
                info_log!("handle_guess_input() - ESC pressed, returning Exit");
                return Some(UserAction::Exit);
            }
            KeyCode::Char(c) if !c.is_ascii_digit() => {
                self.error_lines =
                    vec![format!("Only digits are allowed! ('{c}' is not a digit)")];
            }
            _ => {
                debug_log!("handle_guess_input() - Ignoring key: {:?}", key.code);
            }
        }
        None
    }

    fn handle_game_over_input(key: KeyEvent) -> Option<UserAction> {
        match key.code {
            KeyCode::Char('n' | 'N') => Some(UserAction::NewGame),
            KeyCode::Esc => Some(UserAction::Exit),
            _ => None,
        }
    }

    /// Rebuilds the history panels and turn indicator from the session.
    fn sync_from_session(&mut self, session: &Session) {
        for id in [PlayerId::One, PlayerId::Two] {
            let name = session.player(id).map_or("?", |p| p.name());
            let panel = &mut self.panels[id.index()];
            panel.title = format!("{name}'s guesses");
            panel.rows = session
                .history(id)
                .iter()
                .map(|record| format!("{} | {}", record.guess, record.feedback))
                .collect();
        }

        if session.winner().is_none() {
            let name = session
                .player(session.current_player())
                .map_or("?", |p| p.name());
            self.turn_indicator = format!("{name}'s turn!");
        } else {
            self.turn_indicator = "Game over".to_string();
        }
        if let Some(remaining) = session.remaining_candidates() {
            self.status = format!("CPU candidates remaining: {remaining}");
        }
    }
}

impl GameInterface for TuiInterface {
    fn read_setup(&mut self, mode: GameMode) -> Option<SessionSetup> {
        self.mode = mode;
        self.state = TuiState::Setup { field_index: 0 };
        self.status = "Enter player names and secret numbers".to_string();

        loop {
            if self.draw().is_err() {
                info_log!("read_setup() - Draw failed, quitting");
                return None;
            }
            let key = match self.next_key() {
                Ok(Some(key)) => key,
                Ok(None) => continue,
                Err(_e) => {
                    info_log!("read_setup() - Error handling input, quitting");
                    return None;
                }
            };
            match self.handle_setup_input(key) {
                Some(true) => return Some(self.setup.clone()),
                Some(false) => return None,
                None => {}
            }
        }
    }

    fn display_setup_errors(&mut self, errors: &SetupErrors) {
        self.error_lines = errors.iter().map(ToString::to_string).collect();
        self.status = "Please fix the highlighted problems".to_string();
        self.draw_or_log();
    }

    fn display_game_started(&mut self, session: &Session) {
        self.state = TuiState::EnteringGuess;
        self.setup = SessionSetup::default();
        self.error_lines.clear();
        self.current_input.clear();
        self.message = "Game started!".to_string();
        self.status = "Game in progress".to_string();
        self.sync_from_session(session);
        self.draw_or_log();
    }

    fn read_guess(&mut self, session: &Session) -> Option<UserAction> {
        self.sync_from_session(session);
        loop {
            if self.draw().is_err() {
                info_log!("read_guess() - Draw failed, returning Exit");
                return Some(UserAction::Exit);
            }

            let key = match self.next_key() {
                Ok(Some(key)) => key,
                Ok(None) => continue,
                Err(_e) => {
                    info_log!("read_guess() - Error handling input, returning Exit");
                    return Some(UserAction::Exit);
                }
            };
            let action = match self.state {
                TuiState::EnteringGuess => self.handle_guess_input(key),
                TuiState::GameOver => Self::handle_game_over_input(key),
                TuiState::Setup { .. } => None,
            };
            if let Some(action) = action {
                info_log!("read_guess() - Action received: {:?}", action);
                return Some(action);
            }
        }
    }

    fn display_guess_error(&mut self, error: &GameError) {
        self.error_lines = vec![error.to_string()];
        self.draw_or_log();
    }

    fn display_turn_outcome(&mut self, session: &Session, outcome: &TurnOutcome) {
        self.sync_from_session(session);
        self.error_lines.clear();
        self.message = format!(
            "Hits: {}, Blows: {}",
            outcome.feedback.hits, outcome.feedback.blows
        );
        if let Some(cpu_move) = &outcome.cpu_move {
            self.message.push_str(&format!(
                " | CPU guessed {}: {}",
                cpu_move.guess, cpu_move.feedback
            ));
            if let Some(diagnostic) = &cpu_move.diagnostic {
                self.error_lines.push(diagnostic.to_string());
            }
        }
        self.draw_or_log();
    }

    fn display_winner(&mut self, session: &Session, winner: PlayerId) {
        self.state = TuiState::GameOver;
        self.sync_from_session(session);
        let name = session.player(winner).map_or("?", |p| p.name());
        self.message = format!("Congratulations, {name}! You guessed the number!!");
        self.status = match session.revealed_secret(winner) {
            Some(secret) => format!("Game Over - {name}'s number was {secret}"),
            None => "Game Over".to_string(),
        };
        self.draw_or_log();
    }

    fn display_new_game_message(&mut self) {
        self.panels = Default::default();
        self.current_input.clear();
        self.turn_indicator.clear();
        self.error_lines.clear();
        self.message = "New game started.".to_string();
        self.state = TuiState::Setup { field_index: 0 };
        self.draw_or_log();
    }

    fn display_exit_message(&mut self) {
        self.message = "Exiting...".to_string();
        self.status = "Exiting application...".to_string();
        self.draw_or_log();
    }
}

impl Drop for TuiInterface {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}
