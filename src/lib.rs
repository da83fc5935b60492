// Minesweeper in the terminal
// The game-logic core (xtm_tile, xtm_board) has no rendering dependency;
// the remaining modules make up the terminal front end

pub mod xtm_board; // Grid, mine placement, adjacency, win/loss
pub mod xtm_color; // Terminal colour adaptation and tile glyphs
pub mod xtm_config; // Persisted user preferences
pub mod xtm_lang; // Localized UI strings
pub mod xtm_log; // File-backed logging bootstrap
pub mod xtm_tile; // Single cell state machine
pub mod xtm_ui; // Terminal rendering and event handling
