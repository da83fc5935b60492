// Game board: owns every tile, places mines, derives adjacency counts
// and decides win/loss from the reveal notifications tiles hand back

use log::{debug, info};
use rand::prelude::*;
use thiserror::Error;

use crate::xtm_tile::{Click, Indicator, Tile, TileEvent};

pub const GRID_WIDTH: usize = 30; // tiles per row
pub const GRID_HEIGHT: usize = 16; // tiles per column
pub const NUMBER_OF_MINES: usize = 99;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BoardError {
    #[error("grid must have at least one tile (got {width}x{height})")]
    EmptyGrid { width: usize, height: usize },
    #[error("{mines} mines do not fit in {cells} tiles")]
    TooManyMines { mines: usize, cells: usize },
    #[error("layout has {found} mines, expected {expected}")]
    LayoutMismatch { expected: usize, found: usize },
    #[error("mine at ({x}, {y}) is outside the grid")]
    OutOfBounds { x: usize, y: usize },
    #[error("mine at ({x}, {y}) listed twice")]
    DuplicateMine { x: usize, y: usize },
}

/// Grid dimensions and mine count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardSize {
    width: usize,
    height: usize,
    mines: usize,
}

impl BoardSize {
    /// 30x16 with 99 mines
    pub const EXPERT: BoardSize = BoardSize {
        width: GRID_WIDTH,
        height: GRID_HEIGHT,
        mines: NUMBER_OF_MINES,
    };

    /// Rejects sizes that would make random placement spin forever
    pub fn new(width: usize, height: usize, mines: usize) -> Result<Self, BoardError> {
        if width == 0 || height == 0 {
            return Err(BoardError::EmptyGrid { width, height });
        }
        let cells = width * height;
        if mines >= cells {
            return Err(BoardError::TooManyMines { mines, cells });
        }
        Ok(BoardSize { width, height, mines })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn mines(&self) -> usize {
        self.mines
    }

    pub fn cells(&self) -> usize {
        self.width * self.height
    }
}

impl Default for BoardSize {
    fn default() -> Self {
        BoardSize::EXPERT
    }
}

/// End-of-game notification for the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Won,
    Lost,
}

impl Outcome {
    pub fn won(self) -> bool {
        self == Outcome::Won
    }
}

/// The board has no game-over flag of its own: once an Outcome has been
/// returned, the caller is expected to stop forwarding clicks until restart().
pub struct Board<R: Rng = StdRng> {
    size: BoardSize,
    tiles: Vec<Tile>, // row-major, y * width + x
    revealed_safe: usize,
    total_safe: usize,
    rng: R,
}

impl Board<StdRng> {
    /// Board seeded from the operating system
    pub fn from_entropy(size: BoardSize) -> Self {
        Board::new(size, StdRng::from_entropy())
    }
}

impl<R: Rng> Board<R> {
    /// Allocate every tile once and lay out a random minefield
    pub fn new(size: BoardSize, rng: R) -> Self {
        let mut board = Board::allocate(size, rng);
        board.initialize();
        board
    }

    /// Board with a caller-chosen mine layout given as (x, y) pairs.
    /// `restart()` still draws fresh layouts from `rng`.
    pub fn from_layout(size: BoardSize, mines: &[(usize, usize)], rng: R) -> Result<Self, BoardError> {
        if mines.len() != size.mines {
            return Err(BoardError::LayoutMismatch {
                expected: size.mines,
                found: mines.len(),
            });
        }
        let mut board = Board::allocate(size, rng);
        board.reset_progress();
        for &(x, y) in mines {
            let tile = board.tile_mut(x, y).ok_or(BoardError::OutOfBounds { x, y })?;
            if tile.is_mine() {
                return Err(BoardError::DuplicateMine { x, y });
            }
            tile.set_mine(true);
        }
        board.calculate_adjacent_mines();
        Ok(board)
    }

    fn allocate(size: BoardSize, rng: R) -> Self {
        Board {
            size,
            tiles: vec![Tile::new(); size.cells()],
            revealed_safe: 0,
            total_safe: size.cells() - size.mines,
            rng,
        }
    }

    pub fn size(&self) -> BoardSize {
        self.size
    }

    pub fn width(&self) -> usize {
        self.size.width
    }

    pub fn height(&self) -> usize {
        self.size.height
    }

    pub fn revealed_safe_count(&self) -> usize {
        self.revealed_safe
    }

    pub fn total_safe_count(&self) -> usize {
        self.total_safe
    }

    /// Tiles currently carrying a flag (question marks excluded)
    pub fn flagged_count(&self) -> usize {
        self.tiles
            .iter()
            .filter(|t| t.indicator() == Indicator::Flagged)
            .count()
    }

    /// Convert (x, y) coordinates to flat array index
    fn index(&self, x: usize, y: usize) -> Option<usize> {
        if x < self.size.width && y < self.size.height {
            Some(y * self.size.width + x)
        } else {
            None
        }
    }

    pub fn tile(&self, x: usize, y: usize) -> Option<&Tile> {
        match self.index(x, y) {
            Some(i) => Some(&self.tiles[i]),
            None => {
                debug!("Invalid tile location: ({}, {})", x, y);
                None
            }
        }
    }

    pub fn tile_mut(&mut self, x: usize, y: usize) -> Option<&mut Tile> {
        match self.index(x, y) {
            Some(i) => Some(&mut self.tiles[i]),
            None => {
                debug!("Invalid tile location: ({}, {})", x, y);
                None
            }
        }
    }

    /// Forward a UI click to the tile at (x, y) and react to what it reports
    pub fn click(&mut self, x: usize, y: usize, click: Click) -> Option<Outcome> {
        let event = self.tile_mut(x, y)?.on_click(click)?;
        let TileEvent::Revealed { stepped_on_mine } = event;
        self.on_tile_revealed(stepped_on_mine)
    }

    /// Reaction to a tile's reveal notification.
    /// A mine uncovers every remaining tile silently and loses; otherwise the
    /// game is won once the last safe tile is out.
    pub fn on_tile_revealed(&mut self, stepped_on_mine: bool) -> Option<Outcome> {
        if stepped_on_mine {
            for tile in self.tiles.iter_mut().filter(|t| !t.is_revealed()) {
                tile.reveal(true);
            }
            info!("Mine stepped on after {} safe reveals", self.revealed_safe);
            return Some(Outcome::Lost);
        }

        self.revealed_safe += 1;
        if self.revealed_safe == self.total_safe {
            info!("All {} safe tiles revealed", self.total_safe);
            return Some(Outcome::Won);
        }
        None
    }

    /// Wipe every tile and lay out a new minefield; nothing is reallocated
    pub fn restart(&mut self) {
        for tile in self.tiles.iter_mut() {
            tile.reset();
        }
        self.initialize();
        info!(
            "New game: {}x{} with {} mines",
            self.size.width, self.size.height, self.size.mines
        );
    }

    fn reset_progress(&mut self) {
        self.total_safe = self.size.cells() - self.size.mines;
        self.revealed_safe = 0;
    }

    fn initialize(&mut self) {
        self.reset_progress();
        self.place_mines();
        self.calculate_adjacent_mines();
    }

    /// Uniform sampling with duplicate rejection; terminates because
    /// BoardSize guarantees at least one tile stays free
    fn place_mines(&mut self) {
        let (w, h) = (self.size.width, self.size.height);
        let mut placed = 0;
        while placed < self.size.mines {
            let x = self.rng.gen_range(0..w);
            let y = self.rng.gen_range(0..h);
            let tile = &mut self.tiles[y * w + x];
            if !tile.is_mine() {
                tile.set_mine(true);
                placed += 1;
            }
        }
    }

    /// Store the neighbouring mine count on every safe tile; mine tiles keep 0
    fn calculate_adjacent_mines(&mut self) {
        let (w, h) = (self.size.width, self.size.height);
        for y in 0..h {
            for x in 0..w {
                if self.tiles[y * w + x].is_mine() {
                    continue;
                }
                let mut count = 0u8;
                for ny in y.saturating_sub(1)..=(y + 1).min(h - 1) {
                    for nx in x.saturating_sub(1)..=(x + 1).min(w - 1) {
                        if (nx, ny) != (x, y) && self.tiles[ny * w + nx].is_mine() {
                            count += 1;
                        }
                    }
                }
                self.tiles[y * w + x].set_adjacent_mines(count);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xtm_tile::MarkState;
    use rand_chacha::ChaCha8Rng;

    fn rng(seed: u64) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(seed)
    }

    fn mine_total<R: Rng>(board: &Board<R>) -> usize {
        board.tiles.iter().filter(|t| t.is_mine()).count()
    }

    fn all_positions(w: usize, h: usize) -> Vec<(usize, usize)> {
        (0..h).flat_map(|y| (0..w).map(move |x| (x, y))).collect()
    }

    #[test]
    fn test_default_size_is_expert() {
        let size = BoardSize::default();
        assert_eq!(size.width(), 30);
        assert_eq!(size.height(), 16);
        assert_eq!(size.mines(), 99);
        assert_eq!(size.cells(), 480);
    }

    #[test]
    fn test_size_rejects_full_grid() {
        assert_eq!(
            BoardSize::new(3, 3, 9),
            Err(BoardError::TooManyMines { mines: 9, cells: 9 })
        );
        assert_eq!(
            BoardSize::new(0, 5, 0),
            Err(BoardError::EmptyGrid { width: 0, height: 5 })
        );
        assert!(BoardSize::new(3, 3, 8).is_ok());
    }

    #[test]
    fn test_mine_count_invariant() {
        for (w, h, m) in [(30, 16, 99), (9, 9, 10), (3, 3, 8), (1, 2, 1), (5, 1, 0)] {
            let size = BoardSize::new(w, h, m).unwrap();
            for seed in 0..5 {
                let board = Board::new(size, rng(seed));
                assert_eq!(mine_total(&board), m, "{}x{} seed {}", w, h, seed);
                assert_eq!(board.total_safe_count(), w * h - m);
                assert_eq!(board.revealed_safe_count(), 0);
            }
        }
    }

    #[test]
    fn test_adjacency_fixed_layout() {
        let size = BoardSize::new(3, 3, 2).unwrap();
        let board = Board::from_layout(size, &[(0, 0), (2, 2)], rng(1)).unwrap();

        // row-major expected counts, mines marked as None
        let expected = [
            [None, Some(1), Some(0)],
            [Some(1), Some(2), Some(1)],
            [Some(0), Some(1), None],
        ];
        for y in 0..3 {
            for x in 0..3 {
                let tile = board.tile(x, y).unwrap();
                match expected[y][x] {
                    None => assert!(tile.is_mine()),
                    Some(n) => {
                        assert!(!tile.is_mine());
                        assert_eq!(tile.adjacent_mines(), n, "tile ({}, {})", x, y);
                    }
                }
            }
        }
    }

    #[test]
    fn test_adjacency_matches_neighbour_scan() {
        let board = Board::new(BoardSize::EXPERT, rng(7));
        let (w, h) = (board.width() as i64, board.height() as i64);
        for (x, y) in all_positions(board.width(), board.height()) {
            let tile = board.tile(x, y).unwrap();
            if tile.is_mine() {
                continue;
            }
            let mut expected = 0;
            for dy in -1i64..=1 {
                for dx in -1i64..=1 {
                    let (nx, ny) = (x as i64 + dx, y as i64 + dy);
                    if (dx, dy) != (0, 0) && nx >= 0 && ny >= 0 && nx < w && ny < h {
                        if board.tile(nx as usize, ny as usize).unwrap().is_mine() {
                            expected += 1;
                        }
                    }
                }
            }
            assert_eq!(tile.adjacent_mines(), expected, "tile ({}, {})", x, y);
        }
    }

    #[test]
    fn test_tile_lookup_bounds() {
        let mut board = Board::new(BoardSize::EXPERT, rng(3));
        assert!(board.tile(0, 0).is_some());
        assert!(board.tile(29, 15).is_some());
        assert!(board.tile(30, 0).is_none());
        assert!(board.tile(0, 16).is_none());
        assert!(board.tile_mut(usize::MAX, 0).is_none());
        assert_eq!(board.click(30, 16, Click::Primary), None);
    }

    #[test]
    fn test_win_fires_once_after_last_safe_tile() {
        let size = BoardSize::new(3, 3, 2).unwrap();
        let mut board = Board::from_layout(size, &[(0, 0), (2, 2)], rng(2)).unwrap();
        let safe: Vec<_> = all_positions(3, 3)
            .into_iter()
            .filter(|&(x, y)| !board.tile(x, y).unwrap().is_mine())
            .collect();

        let mut outcomes = Vec::new();
        for (i, &(x, y)) in safe.iter().enumerate() {
            let outcome = board.click(x, y, Click::Primary);
            if i + 1 < safe.len() {
                assert_eq!(outcome, None, "won early at ({}, {})", x, y);
            }
            outcomes.extend(outcome);
        }
        assert_eq!(outcomes, vec![Outcome::Won]);
        assert_eq!(board.revealed_safe_count(), board.total_safe_count());
        assert!(!board.tile(0, 0).unwrap().is_revealed());
    }

    #[test]
    fn test_repeat_click_does_not_count_twice() {
        let size = BoardSize::new(3, 3, 2).unwrap();
        let mut board = Board::from_layout(size, &[(0, 0), (2, 2)], rng(2)).unwrap();
        board.click(1, 1, Click::Primary);
        board.click(1, 1, Click::Primary);
        assert_eq!(board.revealed_safe_count(), 1);
    }

    #[test]
    fn test_loss_reveals_everything() {
        let size = BoardSize::new(3, 3, 2).unwrap();
        let mut board = Board::from_layout(size, &[(0, 0), (2, 2)], rng(4)).unwrap();
        board.click(1, 0, Click::Primary);
        board.click(0, 1, Click::Secondary);

        assert_eq!(board.click(2, 2, Click::Primary), Some(Outcome::Lost));
        assert!(board.tiles.iter().all(|t| t.is_revealed()));
        assert_eq!(board.tile(2, 2).unwrap().indicator(), Indicator::Exploded);
        assert_eq!(board.tile(0, 0).unwrap().indicator(), Indicator::Mine);
        assert_eq!(board.tile(0, 1).unwrap().indicator(), Indicator::Number(1));
        // the sweep does not feed back into the safe counter
        assert_eq!(board.revealed_safe_count(), 1);
    }

    #[test]
    fn test_restart_resets_everything() {
        let mut board = Board::new(BoardSize::EXPERT, rng(11));
        let (mx, my) = all_positions(30, 16)
            .into_iter()
            .find(|&(x, y)| board.tile(x, y).unwrap().is_mine())
            .unwrap();
        let (sx, sy) = all_positions(30, 16)
            .into_iter()
            .find(|&(x, y)| !board.tile(x, y).unwrap().is_mine())
            .unwrap();
        board.click(sx, sy, Click::Primary);
        board.click(mx, my, Click::Primary);

        board.restart();
        assert_eq!(board.revealed_safe_count(), 0);
        assert_eq!(mine_total(&board), 99);
        assert_eq!(board.flagged_count(), 0);
        for tile in &board.tiles {
            assert!(!tile.is_revealed());
            assert!(tile.is_enabled());
            assert_eq!(tile.mark_state(), MarkState::Unmarked);
        }
    }

    #[test]
    fn test_restart_after_layout_draws_random_field() {
        let size = BoardSize::new(4, 4, 3).unwrap();
        let mut board = Board::from_layout(size, &[(0, 0), (1, 0), (2, 0)], rng(5)).unwrap();
        board.restart();
        assert_eq!(mine_total(&board), 3);
    }

    #[test]
    fn test_layout_validation() {
        let size = BoardSize::new(3, 3, 2).unwrap();
        assert_eq!(
            Board::from_layout(size, &[(0, 0)], rng(0)).err(),
            Some(BoardError::LayoutMismatch { expected: 2, found: 1 })
        );
        assert_eq!(
            Board::from_layout(size, &[(0, 0), (3, 0)], rng(0)).err(),
            Some(BoardError::OutOfBounds { x: 3, y: 0 })
        );
        assert_eq!(
            Board::from_layout(size, &[(1, 1), (1, 1)], rng(0)).err(),
            Some(BoardError::DuplicateMine { x: 1, y: 1 })
        );
    }

    #[test]
    fn test_flagged_count_ignores_question_marks() {
        let size = BoardSize::new(3, 3, 1).unwrap();
        let mut board = Board::from_layout(size, &[(1, 1)], rng(0)).unwrap();
        board.click(0, 0, Click::Secondary);
        board.click(2, 2, Click::Secondary);
        board.click(2, 2, Click::Secondary);
        assert_eq!(board.flagged_count(), 1);
    }

    #[test]
    fn test_same_seed_same_layout() {
        let a = Board::new(BoardSize::EXPERT, rng(42));
        let b = Board::new(BoardSize::EXPERT, rng(42));
        let mines = |board: &Board<ChaCha8Rng>| -> Vec<bool> { board.tiles.iter().map(|t| t.is_mine()).collect() };
        assert_eq!(mines(&a), mines(&b));
    }
}
