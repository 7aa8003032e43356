// Headless scroll
//
// Runs a scroll session without a window for a fixed number of frames and
// saves the final frame as a capture. Uses `scroller_config.toml` if present.
//
// Run with: cargo run --example headless_scroll [frames]

use tile_scroll::app::{save_screenshot, AppConfig, Session, CONFIG_FILE};
use tile_scroll::Screen;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let frames: u64 = match std::env::args().nth(1) {
        Some(arg) => arg.parse()?,
        None => 100,
    };

    let config = AppConfig::load(CONFIG_FILE).unwrap_or_default();
    let mut session = Session::start(&config, Screen::new())?;

    for _ in 0..frames {
        let Some(report) = session.step()? else {
            break;
        };
        if !report.blits.is_empty() {
            println!(
                "tick {:4}  position {:4}  offset {:3}  rows {:?}",
                report.tick,
                report.motion.to,
                report.display_offset,
                report
                    .blits
                    .iter()
                    .map(|b| (b.source_row, b.dest_row))
                    .collect::<Vec<_>>()
            );
        }
    }

    session.scan_out()?;
    let path = save_screenshot(session.device(), &config.capture)?;
    println!("Saved {}", path.display());
    Ok(())
}
