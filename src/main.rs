// Tile Scroll - Main Entry Point
//
// Loads `scroller_config.toml` (creating it with defaults if missing), starts
// a scroll session and presents it in a window until Escape, the gamepad
// Start button or the close button ends it.

use std::process::ExitCode;
use tile_scroll::app::{AppConfig, Session, CONFIG_FILE};
use tile_scroll::display::{run_window, Screen};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("Tile Scroll v{}", env!("CARGO_PKG_VERSION"));
    println!("==============================");
    println!();

    let config = AppConfig::load_or_default(CONFIG_FILE);
    println!("Configuration loaded from '{}'", CONFIG_FILE);
    println!(
        "  Mode: {:?}, speed {}, range {}..={}",
        config.display.mode, config.scroll.speed, config.scroll.min_pos, config.scroll.max_pos
    );
    println!();

    let session = match Session::start(&config, Screen::new()) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    println!(
        "Press {} (or {} on a gamepad) to exit.",
        config.input.cancel_key, config.input.cancel_button
    );
    println!();

    match run_window(&config, session) {
        Ok(()) => {
            println!("Display window closed.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
