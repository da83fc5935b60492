// Terminal colours and per-indicator glyphs
// Colours follow the Windows Terminal "Campbell" scheme wherever the terminal can show it

use ratatui::style::Color;
use std::sync::OnceLock;
use term_color_support::ColorSupport;

use crate::xtm_tile::Indicator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Depth {
    TrueColor,
    Indexed256,
    Basic,
}

fn terminal_depth() -> Depth {
    static DEPTH: OnceLock<Depth> = OnceLock::new();
    *DEPTH.get_or_init(|| {
        let support = ColorSupport::stdout();
        if support.has_16m {
            Depth::TrueColor
        } else if support.has_256 {
            Depth::Indexed256
        } else {
            Depth::Basic
        }
    })
}

/// (RGB, 256-colour index) sampled from Campbell; None for non-ANSI colours
fn campbell(color: Color) -> Option<((u8, u8, u8), u8)> {
    match color {
        Color::Black => Some(((12, 12, 12), 232)),
        Color::Red => Some(((197, 15, 31), 160)),
        Color::Green => Some(((19, 161, 14), 28)),
        Color::Yellow => Some(((193, 156, 0), 178)),
        Color::Blue => Some(((0, 55, 218), 20)),
        Color::Magenta => Some(((136, 23, 152), 90)),
        Color::Cyan => Some(((58, 150, 221), 38)),
        Color::Gray => Some(((204, 204, 204), 250)),
        Color::DarkGray => Some(((118, 118, 118), 243)),
        Color::LightRed => Some(((231, 72, 86), 203)),
        Color::LightGreen => Some(((22, 198, 12), 46)),
        Color::LightYellow => Some(((249, 241, 165), 229)),
        Color::LightBlue => Some(((59, 120, 255), 63)),
        Color::LightMagenta => Some(((180, 0, 158), 163)),
        Color::LightCyan => Some(((97, 214, 214), 116)),
        Color::White => Some(((242, 242, 242), 255)),
        _ => None,
    }
}

fn adapt_to(color: Color, depth: Depth) -> Color {
    match (campbell(color), depth) {
        (Some(((r, g, b), _)), Depth::TrueColor) => Color::Rgb(r, g, b),
        (Some((_, index)), Depth::Indexed256) => Color::Indexed(index),
        _ => color,
    }
}

/// Extension for picking the closest colour the current terminal supports
pub trait Adapt {
    fn adapted(self) -> Color;
}

impl Adapt for Color {
    fn adapted(self) -> Color {
        adapt_to(self, terminal_depth())
    }
}

/// Glyph and foreground colour for every tile indicator
#[derive(Debug, Clone)]
pub struct Palette {
    ascii: bool,
    pub board_bg: Color,
    pub cursor_bg: Color,
    pub press_bg: Color,
    pub indicator_fg: Color,
    pub menu_key_fg: Color,
    pub menu_key_bg_hover: Color,
    pub menu_key_bg_pressed: Color,
    pub menu_key_fg_pressed: Color,
}

impl Palette {
    pub fn new(ascii: bool) -> Self {
        Palette {
            ascii,
            board_bg: Color::DarkGray.adapted(),
            cursor_bg: Color::LightBlue.adapted(),
            press_bg: Color::Gray.adapted(),
            indicator_fg: Color::Yellow.adapted(),
            menu_key_fg: Color::Yellow.adapted(),
            menu_key_bg_hover: Color::LightBlue.adapted(),
            menu_key_bg_pressed: Color::Green.adapted(),
            menu_key_fg_pressed: Color::Black.adapted(),
        }
    }

    pub fn glyph(&self, indicator: Indicator) -> (&'static str, Color) {
        let a = self.ascii;
        match indicator {
            Indicator::Hidden => (if a { "#" } else { "■" }, Color::Gray.adapted()),
            Indicator::Flagged => (if a { "F" } else { "⚑" }, Color::Red.adapted()),
            Indicator::Questioned => ("?", Color::LightYellow.adapted()),
            Indicator::Empty => (" ", Color::Gray.adapted()),
            Indicator::Number(n) => number_glyph(n),
            Indicator::Mine => (if a { "*" } else { "☼" }, Color::Black.adapted()),
            Indicator::Exploded => (if a { "X" } else { "☼" }, Color::LightRed.adapted()),
        }
    }
}

fn number_glyph(n: u8) -> (&'static str, Color) {
    const DIGITS: [&str; 9] = ["0", "1", "2", "3", "4", "5", "6", "7", "8"];
    let color = match n {
        1 => Color::LightBlue,
        2 => Color::LightGreen,
        3 => Color::LightRed,
        4 => Color::Blue,
        5 => Color::Red,
        6 => Color::Cyan,
        7 => Color::Black,
        _ => Color::Gray,
    };
    (DIGITS.get(n as usize).copied().unwrap_or("?"), color.adapted())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adapt_depths() {
        assert_eq!(adapt_to(Color::Red, Depth::TrueColor), Color::Rgb(197, 15, 31));
        assert_eq!(adapt_to(Color::Red, Depth::Indexed256), Color::Indexed(160));
        assert_eq!(adapt_to(Color::Red, Depth::Basic), Color::Red);
        assert_eq!(adapt_to(Color::Rgb(1, 2, 3), Depth::TrueColor), Color::Rgb(1, 2, 3));
    }

    #[test]
    fn test_number_glyphs() {
        let palette = Palette::new(false);
        for n in 1..=8u8 {
            assert_eq!(palette.glyph(Indicator::Number(n)).0, n.to_string());
        }
    }

    #[test]
    fn test_ascii_glyphs_are_ascii() {
        let palette = Palette::new(true);
        for ind in [
            Indicator::Hidden,
            Indicator::Flagged,
            Indicator::Questioned,
            Indicator::Empty,
            Indicator::Mine,
            Indicator::Exploded,
        ] {
            assert!(palette.glyph(ind).0.is_ascii(), "{:?}", ind);
        }
    }
}
