use hits_and_blows::cli::{CliInterface, parse_cli};
use hits_and_blows::game_state::game_loop;
use hits_and_blows::logging::init_logging;
use hits_and_blows::tui::TuiInterface;
use std::io;

fn main() {
    let cli = parse_cli();
    let log_path = init_logging(cli.log_file.clone());
    log::info!(
        "Starting hits-and-blows (cpu: {}, cli: {}, seed: {:?}, log: {:?})",
        cli.cpu,
        cli.cli,
        cli.seed,
        log_path
    );
    let config = cli.game_config();

    if cli.cli {
        let stdin = io::stdin();
        let mut interface = CliInterface::new(stdin.lock());
        let summary = game_loop(&config, &mut interface);
        log::info!("Session ended: {summary:?}");
        return;
    }

    match TuiInterface::new() {
        Ok(mut interface) => {
            let summary = game_loop(&config, &mut interface);
            log::info!("Session ended: {summary:?}");
        }
        Err(e) => {
            log::error!("Failed to initialize terminal UI: {e}");
            eprintln!("Failed to initialize terminal UI: {e}. Try --cli.");
        }
    }
}
