// Single grid cell: mine/reveal/mark state and its own click transitions
// The tile never talks to the board directly; reveals are reported back as a TileEvent

use log::warn;

/// Secondary-button mark cycle: Unmarked -> Flagged -> Questioned -> Unmarked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MarkState {
    #[default]
    Unmarked,
    Flagged,
    Questioned,
}

impl MarkState {
    /// Next state in the cycle
    pub fn next(self) -> Self {
        match self {
            MarkState::Unmarked => MarkState::Flagged,
            MarkState::Flagged => MarkState::Questioned,
            MarkState::Questioned => MarkState::Unmarked,
        }
    }
}

/// What the UI should draw for a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Indicator {
    #[default]
    Hidden,
    Flagged,
    Questioned,
    Empty,
    Number(u8), // 1..=8
    Mine,       // unexploded, shown by the loss sweep
    Exploded,   // the mine that was stepped on
}

/// Pointer button forwarded by the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Click {
    Primary,
    Secondary,
}

/// Notification produced by a reveal that the board has to react to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileEvent {
    Revealed { stepped_on_mine: bool },
}

#[derive(Debug, Clone, Default)]
pub struct Tile {
    mine: bool,
    revealed: bool,
    disabled: bool,
    mark: MarkState,
    adjacent: u8, // expected [0, 8]
    indicator: Indicator,
}

impl Tile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_mine(&self) -> bool {
        self.mine
    }

    pub fn set_mine(&mut self, mine: bool) {
        self.mine = mine;
    }

    pub fn adjacent_mines(&self) -> u8 {
        self.adjacent
    }

    /// Stored as given; range is only checked when the tile is drawn
    pub fn set_adjacent_mines(&mut self, count: u8) {
        self.adjacent = count;
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub fn set_revealed(&mut self, revealed: bool) {
        self.revealed = revealed;
    }

    pub fn mark_state(&self) -> MarkState {
        self.mark
    }

    /// Disabled tiles ignore all clicks
    pub fn is_enabled(&self) -> bool {
        !self.disabled
    }

    pub fn indicator(&self) -> Indicator {
        self.indicator
    }

    /// Expose the tile's content and lock it against further input.
    ///
    /// `game_over_sweep` is set when the board uncovers the rest of the grid after
    /// a loss: mines then show as unexploded and no event is returned, so the
    /// sweep cannot re-enter the board's game-over handling.
    pub fn reveal(&mut self, game_over_sweep: bool) -> Option<TileEvent> {
        let mut stepped_on_mine = false;

        self.indicator = if self.mine {
            if game_over_sweep {
                Indicator::Mine
            } else {
                stepped_on_mine = true;
                Indicator::Exploded
            }
        } else {
            match self.adjacent {
                0 => Indicator::Empty,
                n @ 1..=8 => Indicator::Number(n),
                n => {
                    warn!("Invalid adjacent mines value: {}", n);
                    Indicator::Hidden
                }
            }
        };
        self.disabled = true;
        self.revealed = true;

        if game_over_sweep {
            return None;
        }
        Some(TileEvent::Revealed { stepped_on_mine })
    }

    /// Back to the freshly-constructed state
    pub fn reset(&mut self) {
        *self = Tile::default();
    }

    /// Route a pointer button to the matching transition
    pub fn on_click(&mut self, click: Click) -> Option<TileEvent> {
        if self.disabled {
            return None;
        }
        match click {
            Click::Primary => self.reveal(false),
            Click::Secondary => {
                self.cycle_mark();
                None
            }
        }
    }

    fn cycle_mark(&mut self) {
        self.mark = self.mark.next();
        self.indicator = match self.mark {
            MarkState::Unmarked => Indicator::Hidden,
            MarkState::Flagged => Indicator::Flagged,
            MarkState::Questioned => Indicator::Questioned,
        };
    }
}
