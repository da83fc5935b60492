// Entry point for the Minesweeper TUI application
// Initializes logging, configuration and language settings, then launches the UI

use std::error::Error;

use xtmines::xtm_config::load_or_create_config;
use xtmines::xtm_lang::Lang;
use xtmines::xtm_log;
use xtmines::xtm_ui::run as run_ui;

fn main() -> Result<(), Box<dyn Error>> {
    // Logging is best effort; the game runs without it
    if let Ok(Some(path)) = xtm_log::init() {
        log::info!("{} v{} logging to {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"), path.display());
    }

    // Load or create user preferences (icons, indicator, language)
    let mut cfg = load_or_create_config();

    let mut lang = Lang::new(&cfg.language);

    run_ui(&mut cfg, &mut lang)
}
