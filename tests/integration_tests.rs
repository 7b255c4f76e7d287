// Integration tests for the hits-and-blows application
// These tests verify that all modules work together correctly

use hits_and_blows::cli::CliInterface;
use hits_and_blows::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::io::Cursor;

fn code(s: &str) -> DigitCode {
    s.parse().unwrap()
}

fn setup(name1: &str, secret1: &str, name2: &str, secret2: &str) -> SessionSetup {
    SessionSetup {
        player1_name: name1.to_string(),
        player1_secret: secret1.to_string(),
        player2_name: name2.to_string(),
        player2_secret: secret2.to_string(),
    }
}

#[test]
fn test_feedback_reference_scenarios() {
    let secret = code("123456");
    assert_eq!(get_feedback(&code("123457"), &secret), Feedback::new(5, 0));
    assert_eq!(get_feedback(&code("654321"), &secret), Feedback::new(0, 6));
    assert_eq!(get_feedback(&secret, &secret), Feedback::new(6, 0));
}

#[test]
fn test_exact_guess_finishes_session_with_guesser_as_winner() {
    let mut session = create_session(
        &setup("Alice", "654321", "Bob", "123456"),
        GameMode::HumanVsHuman,
    )
    .unwrap();

    let outcome = session.submit_guess("123456").unwrap();
    assert_eq!(outcome.feedback, Feedback::new(6, 0));
    assert_eq!(outcome.winner, Some(PlayerId::One));
    assert_eq!(session.phase(), Phase::Finished);
    assert_eq!(session.submit_guess("654321"), Err(GameError::AlreadyFinished));
}

#[test]
fn test_malformed_secret_keeps_session_in_setup() {
    let mut session = Session::new(GameMode::HumanVsHuman);
    let errors = session
        .start(&setup("Alice", "112345", "Bob", "654321"))
        .unwrap_err();

    assert!(errors.contains(&SetupError::InvalidSecret(PlayerId::One)));
    assert!(errors.to_string().contains("Player 1"));
    assert_eq!(session.phase(), Phase::Setup);

    // The same session can still be started with corrected input
    session
        .start(&setup("Alice", "012345", "Bob", "654321"))
        .unwrap();
    assert_eq!(session.phase(), Phase::InProgress);
}

#[test]
fn test_soundness_over_random_games() {
    let mut rng = StdRng::seed_from_u64(2024);
    for _ in 0..5 {
        let secret = random_secret(&mut rng);
        let mut belief = BeliefState::new();
        for _ in 0..3 {
            let guess = random_secret(&mut rng);
            let feedback = get_feedback(&guess, &secret);
            if feedback.is_win() {
                break;
            }
            let before = belief.len();
            belief.observe(&guess, feedback);
            assert!(belief.len() <= before);
            assert!(belief.contains(&secret));

            // Same observation again changes nothing
            let size = belief.len();
            belief.observe(&guess, feedback);
            assert_eq!(belief.len(), size);
        }
    }
}

#[test]
fn test_first_filter_shrinks_but_never_empties() {
    let secret = code("246789");
    let guess = all_candidates()[0];
    let feedback = get_feedback(&guess, &secret);
    let filtered = filter_candidates(all_candidates(), &guess, feedback);

    assert!(!filtered.is_empty());
    assert!(filtered.len() < UNIVERSE_SIZE);
    assert!(filtered.contains(&secret));
}

#[test]
fn test_cpu_solves_every_secret_it_is_given() {
    let mut rng = StdRng::seed_from_u64(99);
    for _ in 0..3 {
        let secret = random_secret(&mut rng);
        let mut belief = BeliefState::new();
        let mut guesses = 0;
        loop {
            let choice = next_guess(&belief, &mut rng);
            assert!(!choice.is_fallback());
            guesses += 1;
            let feedback = get_feedback(&choice.code(), &secret);
            if feedback.is_win() {
                break;
            }
            belief.observe(&choice.code(), feedback);
            assert!(guesses < 20, "CPU failed to converge on {secret}");
        }
    }
}

#[test]
fn test_cpu_session_history_matches_feedback() {
    let mut session = Session::with_seed(GameMode::HumanVsCpu, 17);
    session.start(&setup("Alice", "357910", "", "")).unwrap();

    let human_secret = code("357910");
    for guess in ["012345", "678901"] {
        let Ok(outcome) = session.submit_guess(guess) else {
            panic!("Guess rejected");
        };
        if outcome.winner.is_some() {
            return;
        }
        let cpu_move = outcome.cpu_move.unwrap();
        assert_eq!(cpu_move.feedback, get_feedback(&cpu_move.guess, &human_secret));
        if cpu_move.winner.is_some() {
            return;
        }
    }

    for record in session.history(PlayerId::Two) {
        assert_eq!(record.feedback, get_feedback(&record.guess, &human_secret));
    }
    assert_eq!(session.history(PlayerId::One).len(), 2);
    assert_eq!(session.history(PlayerId::Two).len(), 2);
}

#[test]
fn test_end_to_end_cli_two_player_game() {
    // Alice guesses Bob's number on her second try
    let input = "Alice\n123456\nBob\n654321\n012345\n987654\n654321\nexit\n";
    let mut interface = CliInterface::new(Cursor::new(input));

    let summary = game_loop(&GameConfig::default(), &mut interface);
    assert_eq!(summary.games_started, 1);
    assert_eq!(summary.winners, vec![PlayerId::One]);
}

#[test]
fn test_end_to_end_cli_with_invalid_inputs() {
    let input = "\n12\nBob\n654321\nAlice\n123456\nBob\n654321\n111111\nabcdef\nnext\nexit\n";
    let mut interface = CliInterface::new(Cursor::new(input));

    // Setup errors, two rejected guesses, then `next` and `exit` at the new setup
    let summary = game_loop(&GameConfig::default(), &mut interface);
    assert_eq!(summary.games_started, 1);
    assert!(summary.winners.is_empty());
}

#[test]
fn test_end_to_end_cli_against_cpu() {
    let input = "Alice\n024681\n135790\n975310\n";
    let mut interface = CliInterface::new(Cursor::new(input));
    let config = GameConfig {
        mode: GameMode::HumanVsCpu,
        seed: Some(3),
    };

    // Input runs out, which is treated as exit
    let summary = game_loop(&config, &mut interface);
    assert_eq!(summary.games_started, 1);
    assert!(!summary.winners.contains(&PlayerId::Two));
}

#[test]
fn test_validation_predicate_shared_by_setup_and_play() {
    for input in ["12345", "1234567", "112345", "12a456", ""] {
        assert!(!is_valid_digit_code(input));
        let mut session = Session::new(GameMode::HumanVsHuman);
        assert!(session.start(&setup("A", input, "B", "012345")).is_err());
    }

    let mut session = create_session(
        &setup("A", "123456", "B", "012345"),
        GameMode::HumanVsHuman,
    )
    .unwrap();
    assert_eq!(
        session.submit_guess("112345"),
        Err(GameError::InvalidGuess("112345".to_string()))
    );
}
