// Terminal UI shell: draws the board, routes mouse/keyboard input to tiles
// and shows the game-over dialog that restarts or quits

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent,
    MouseEventKind,
};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use log::info;
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Span, Spans, Text};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::{Frame, Terminal};
use std::error::Error;
use std::io;
use std::time::{Duration, Instant};
use unicode_width::UnicodeWidthStr;

use crate::xtm_board::{Board, BoardSize, Outcome};
use crate::xtm_color::{Adapt, Palette};
use crate::xtm_config::{Config, save_config};
use crate::xtm_lang::Lang;
use crate::xtm_tile::{Click, Indicator};

/// Top menu entries, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuAction {
    Help,
    New,
    Icons,
    Language,
}

const MENU_ITEMS: [(&str, MenuAction); 4] = [
    ("F1", MenuAction::Help),
    ("F2", MenuAction::New),
    ("F3", MenuAction::Icons),
    ("F4", MenuAction::Language),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

// Runtime UI variables grouped so they can be passed around as one value
#[derive(Debug, Default)]
struct UiState {
    cursor: (usize, usize),
    left_press: Option<(usize, usize)>,
    outcome: Option<Outcome>,
    modal_yes: bool, // focused button of the game-over dialog
    showing_help: bool,
    hover_index: Option<usize>,
    clicked_index: Option<usize>,
    click_instant: Option<Instant>,
    exit_hovered: bool,
    menu_rects: Vec<Rect>,
    exit_rect: Option<Rect>,
    board_rect: Option<Rect>,
    yes_rect: Option<Rect>,
    no_rect: Option<Rect>,
    close_rect: Option<Rect>,
}

impl UiState {
    fn new(board: &Board) -> Self {
        UiState {
            cursor: (board.width() / 2, board.height() / 2),
            modal_yes: true,
            ..UiState::default()
        }
    }

    fn move_cursor(&mut self, dx: isize, dy: isize, board: &Board) {
        let nx = (self.cursor.0 as isize + dx).clamp(0, board.width() as isize - 1) as usize;
        let ny = (self.cursor.1 as isize + dy).clamp(0, board.height() as isize - 1) as usize;
        self.cursor = (nx, ny);
    }

    /// Board cell under a terminal position, if any
    fn cell_at(&self, column: u16, row: u16, board: &Board) -> Option<(usize, usize)> {
        let brect = self.board_rect?;
        let inner = inner_rect(brect);
        if !rect_contains(inner, column, row) {
            return None;
        }
        let cx = ((column - inner.x) / 2) as usize;
        let cy = (row - inner.y) as usize;
        (cx < board.width() && cy < board.height()).then_some((cx, cy))
    }

    fn menu_at(&self, column: u16, row: u16) -> Option<usize> {
        self.menu_rects.iter().position(|r| rect_contains(*r, column, row))
    }
}

/// Everything the event handlers mutate, bundled to keep signatures short
struct Session<'a> {
    board: Board,
    ui: UiState,
    cfg: &'a mut Config,
    lang: &'a mut Lang,
    palette: Palette,
}

impl Session<'_> {
    fn click(&mut self, x: usize, y: usize, click: Click) {
        if let Some(outcome) = self.board.click(x, y, click) {
            info!("Game over at ({}, {}): {:?}", x, y, outcome);
            self.ui.outcome = Some(outcome);
            self.ui.modal_yes = true;
            self.ui.left_press = None;
        }
    }

    fn restart(&mut self) {
        self.board.restart();
        self.ui.outcome = None;
        self.ui.left_press = None;
        self.ui.modal_yes = true;
    }

    fn menu(&mut self, action: MenuAction) {
        match action {
            MenuAction::Help => self.ui.showing_help = true,
            MenuAction::New => self.restart(),
            MenuAction::Icons => {
                self.cfg.ascii_icons = !self.cfg.ascii_icons;
                self.palette = Palette::new(self.cfg.ascii_icons);
                save_config(self.cfg);
            }
            MenuAction::Language => {
                self.cfg.language = self.lang.toggle().to_string();
                save_config(self.cfg);
            }
        }
    }

    fn on_key(&mut self, code: KeyCode) -> Flow {
        if self.ui.outcome.is_some() {
            match code {
                KeyCode::Left | KeyCode::Right | KeyCode::Tab => self.ui.modal_yes = !self.ui.modal_yes,
                KeyCode::Char('y') | KeyCode::Char('Y') => self.restart(),
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => return Flow::Exit,
                KeyCode::Enter | KeyCode::Char(' ') => {
                    if self.ui.modal_yes {
                        self.restart();
                    } else {
                        return Flow::Exit;
                    }
                }
                _ => {}
            }
            return Flow::Continue;
        }
        if self.ui.showing_help {
            self.ui.showing_help = false;
            return Flow::Continue;
        }
        let (x, y) = self.ui.cursor;
        match code {
            KeyCode::F(1) => self.menu(MenuAction::Help),
            KeyCode::F(2) => self.menu(MenuAction::New),
            KeyCode::F(3) => self.menu(MenuAction::Icons),
            KeyCode::F(4) => self.menu(MenuAction::Language),
            KeyCode::Esc => return Flow::Exit,
            KeyCode::Left => self.ui.move_cursor(-1, 0, &self.board),
            KeyCode::Right => self.ui.move_cursor(1, 0, &self.board),
            KeyCode::Up => self.ui.move_cursor(0, -1, &self.board),
            KeyCode::Down => self.ui.move_cursor(0, 1, &self.board),
            KeyCode::Char(' ') | KeyCode::Enter => self.click(x, y, Click::Primary),
            KeyCode::Char('f') | KeyCode::Char('F') => self.click(x, y, Click::Secondary),
            _ => {}
        }
        Flow::Continue
    }

    fn on_mouse(&mut self, me: MouseEvent) -> Flow {
        let (col, row) = (me.column, me.row);
        let in_rect = |r: Option<Rect>| r.is_some_and(|r| rect_contains(r, col, row));

        if self.ui.outcome.is_some() {
            match me.kind {
                MouseEventKind::Moved => {
                    if in_rect(self.ui.yes_rect) {
                        self.ui.modal_yes = true;
                    } else if in_rect(self.ui.no_rect) {
                        self.ui.modal_yes = false;
                    }
                }
                MouseEventKind::Down(MouseButton::Left) => {
                    if in_rect(self.ui.yes_rect) {
                        self.restart();
                    } else if in_rect(self.ui.no_rect) {
                        return Flow::Exit;
                    }
                }
                _ => {}
            }
            return Flow::Continue;
        }

        if self.ui.showing_help {
            if let MouseEventKind::Down(MouseButton::Left) = me.kind {
                self.ui.showing_help = false;
            }
            return Flow::Continue;
        }

        match me.kind {
            MouseEventKind::Moved => {
                self.ui.hover_index = self.ui.menu_at(col, row);
                self.ui.exit_hovered = in_rect(self.ui.exit_rect);
                if let Some(cell) = self.ui.cell_at(col, row, &self.board) {
                    self.ui.cursor = cell;
                }
            }
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(i) = self.ui.menu_at(col, row) {
                    self.ui.clicked_index = Some(i);
                    self.ui.click_instant = Some(Instant::now());
                    self.menu(MENU_ITEMS[i].1);
                } else if in_rect(self.ui.exit_rect) {
                    return Flow::Exit;
                } else if let Some(cell) = self.ui.cell_at(col, row, &self.board) {
                    self.ui.cursor = cell;
                    self.ui.left_press = Some(cell);
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                // reveal only when released over the tile that was pressed
                if let Some(pressed) = self.ui.left_press.take() {
                    if self.ui.cell_at(col, row, &self.board) == Some(pressed) {
                        self.click(pressed.0, pressed.1, Click::Primary);
                    }
                }
            }
            MouseEventKind::Down(MouseButton::Right) => {
                if let Some((x, y)) = self.ui.cell_at(col, row, &self.board) {
                    self.ui.cursor = (x, y);
                    self.click(x, y, Click::Secondary);
                }
            }
            _ => {}
        }
        Flow::Continue
    }
}

pub fn run(cfg: &mut Config, lang: &mut Lang) -> Result<(), Box<dyn Error>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnableMouseCapture, terminal::EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let board = Board::from_entropy(BoardSize::default());
    let ui = UiState::new(&board);
    let palette = Palette::new(cfg.ascii_icons);
    let size = board.size();
    info!("Started {}x{} board with {} mines", size.width(), size.height(), size.mines());

    let mut session = Session { board, ui, cfg, lang, palette };
    let result = event_loop(&mut terminal, &mut session);

    // restore the terminal even when the loop failed
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), DisableMouseCapture, terminal::LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    save_config(session.cfg);
    result
}

fn event_loop<B: Backend>(terminal: &mut Terminal<B>, s: &mut Session) -> Result<(), Box<dyn Error>> {
    let tick_rate = Duration::from_millis(200);
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| draw(f, &s.board, &mut s.ui, s.cfg, s.lang, &s.palette))?;

        let timeout = tick_rate.checked_sub(last_tick.elapsed()).unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            let flow = match event::read()? {
                Event::Key(KeyEvent { code, kind: KeyEventKind::Press, .. }) => s.on_key(code),
                Event::Mouse(me) => s.on_mouse(me),
                _ => Flow::Continue,
            };
            if flow == Flow::Exit {
                info!("Exit requested");
                return Ok(());
            }
        }

        // clear click feedback after short duration
        if let Some(t0) = s.ui.click_instant {
            if t0.elapsed() > Duration::from_millis(200) {
                s.ui.clicked_index = None;
                s.ui.click_instant = None;
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }
    }
}

fn draw<B: Backend>(f: &mut Frame<B>, board: &Board, ui: &mut UiState, cfg: &Config, lang: &Lang, palette: &Palette) {
    let size = f.size();
    let a = &lang.assets;
    let min_twidth = 80u16.max(board.width() as u16 * 2 + 3);
    let min_theight = board.height() as u16 + 8;
    if size.width < min_twidth || size.height < min_theight {
        let warn_lines = vec![
            Spans::from(Span::raw(a.tsmsg_line1)),
            Spans::from(Span::raw(Lang::fill(a.tsmsg_line2, &[&min_twidth, &min_theight]))),
        ];
        let warn = Paragraph::new(Text::from(warn_lines))
            .block(Block::default().borders(Borders::ALL).title(a.tsmsg_title))
            .alignment(Alignment::Center);
        f.render_widget(Clear, size);
        let w = 40u16.min(size.width.saturating_sub(2));
        let h = 5u16.min(size.height.saturating_sub(2));
        f.render_widget(warn, center_rect(w, h, size));
        ui.board_rect = None;
        ui.menu_rects.clear();
        ui.exit_rect = None;
        return;
    }

    // layout: top menu row, center board, bottom status
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(6), Constraint::Length(3)].as_ref())
        .split(size);

    draw_menu(f, chunks[0], ui, lang, palette);
    draw_status(f, chunks[2], board, ui, lang, palette);
    draw_board(f, chunks[1], board, ui, cfg, lang, palette);

    ui.yes_rect = None;
    ui.no_rect = None;
    ui.close_rect = None;
    if ui.showing_help {
        draw_help(f, size, ui, lang);
    }
    if let Some(outcome) = ui.outcome {
        draw_game_over(f, size, outcome, ui, lang);
    }
}

fn label_of(action: MenuAction, lang: &Lang) -> &'static str {
    let a = &lang.assets;
    match action {
        MenuAction::Help => a.menu_help,
        MenuAction::New => a.menu_new,
        MenuAction::Icons => a.menu_icons,
        MenuAction::Language => a.menu_language,
    }
}

fn key_styles(pressed: bool, hovered: bool, palette: &Palette) -> (Style, Style) {
    if pressed {
        let s = Style::default().bg(palette.menu_key_bg_pressed).fg(palette.menu_key_fg_pressed);
        (s.add_modifier(Modifier::BOLD), s)
    } else if hovered {
        let s = Style::default().bg(palette.menu_key_bg_hover).fg(palette.menu_key_fg_pressed);
        (s.add_modifier(Modifier::BOLD), s)
    } else {
        (Style::default().fg(palette.menu_key_fg).add_modifier(Modifier::BOLD), Style::default())
    }
}

fn draw_menu<B: Backend>(f: &mut Frame<B>, area: Rect, ui: &mut UiState, lang: &Lang, palette: &Palette) {
    let mut spans: Vec<Span> = vec![Span::raw(" ")];
    let mut x = area.x + 2; // border + padding
    ui.menu_rects.clear();
    for (i, (key, action)) in MENU_ITEMS.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("   "));
            x += 3;
        }
        let rest = format!(": {}", label_of(*action, lang));
        let width = (key.width() + rest.as_str().width()) as u16;
        ui.menu_rects.push(Rect::new(x, area.y + 1, width, 1));
        x += width;

        let (key_style, rest_style) = key_styles(Some(i) == ui.clicked_index, Some(i) == ui.hover_index, palette);
        spans.push(Span::styled(key.to_string(), key_style));
        spans.push(Span::styled(rest, rest_style));
    }
    let menu = Paragraph::new(Spans::from(spans))
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Left);
    f.render_widget(menu, area);
}

fn draw_status<B: Backend>(f: &mut Frame<B>, area: Rect, board: &Board, ui: &mut UiState, lang: &Lang, palette: &Palette) {
    let a = &lang.assets;
    let left_text = Lang::fill(a.status_flags_fmt, &[&board.flagged_count(), &board.size().mines()]);
    let right_key = "Esc";
    let right_rest = format!(": {}", a.menu_exit);
    let inner_w = area.width.saturating_sub(2) as usize;
    let left_w = left_text.as_str().width();
    let right_w = right_key.width() + right_rest.as_str().width();
    let mid_spaces = if inner_w > left_w + right_w + 1 { inner_w - left_w - right_w - 1 } else { 1 };

    let exit_x = area.x + 1 + (left_w + mid_spaces) as u16;
    ui.exit_rect = Some(Rect::new(exit_x, area.y + 1, right_w as u16, 1));

    let (key_style, rest_style) = key_styles(false, ui.exit_hovered, palette);
    let spans = vec![
        Span::raw(left_text),
        Span::raw(" ".repeat(mid_spaces)),
        Span::styled(right_key, key_style),
        Span::styled(right_rest, rest_style),
        Span::raw(" "),
    ];
    let status = Paragraph::new(Text::from(Spans::from(spans)))
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Left);
    f.render_widget(status, area);
}

fn draw_board<B: Backend>(
    f: &mut Frame<B>,
    area: Rect,
    board: &Board,
    ui: &mut UiState,
    cfg: &Config,
    lang: &Lang,
    palette: &Palette,
) {
    let (w, h) = (board.width(), board.height());
    let board_area = center_rect((w * 2) as u16 + 3, h as u16 + 2, area);
    ui.board_rect = Some(board_area);

    let mut lines = Vec::with_capacity(h);
    for y in 0..h {
        let mut spans = Vec::with_capacity(w + 1);
        for x in 0..w {
            let Some(tile) = board.tile(x, y) else { continue };
            let indicator = tile.indicator();
            let (glyph, fg) = palette.glyph(indicator);
            let mut style = Style::default().fg(fg).bg(palette.board_bg);
            if ui.outcome.is_none() && ui.cursor == (x, y) {
                style = style.bg(palette.cursor_bg);
            }
            // pressed look while the left button is held on a closed tile
            if ui.left_press == Some((x, y)) && tile.is_enabled() && indicator == Indicator::Hidden {
                style = style.bg(palette.press_bg).fg(palette.press_bg);
            }
            if cfg.show_indicator && ui.outcome.is_none() && ui.cursor == (x, y) {
                spans.push(Span::styled("▸", style.fg(palette.indicator_fg).add_modifier(Modifier::BOLD)));
                spans.push(Span::styled(glyph, style));
            } else {
                spans.push(Span::styled(format!(" {}", glyph), style));
            }
        }
        // right-side padding column in the board background
        spans.push(Span::styled(" ", Style::default().bg(palette.board_bg)));
        lines.push(Spans::from(spans));
    }
    let paragraph = Paragraph::new(Text::from(lines))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(lang.assets.app_title)
                .title_alignment(Alignment::Center),
        )
        .alignment(Alignment::Left);
    f.render_widget(paragraph, board_area);
}

fn button<B: Backend>(f: &mut Frame<B>, rect: Rect, label: &str, focused: bool) {
    let style = if focused {
        Style::default().bg(Color::White.adapted()).fg(Color::Black.adapted()).add_modifier(Modifier::BOLD)
    } else {
        Style::default().bg(Color::Gray.adapted()).fg(Color::Black.adapted())
    };
    let btn = Paragraph::new(Spans::from(Span::styled(format!(" {} ", label), style)))
        .alignment(Alignment::Center)
        .block(Block::default());
    f.render_widget(btn, rect);
}

fn draw_help<B: Backend>(f: &mut Frame<B>, size: Rect, ui: &mut UiState, lang: &Lang) {
    let a = &lang.assets;
    let hb = center_rect(48, 10, size);
    f.render_widget(Clear, hb);
    f.render_widget(Block::default().borders(Borders::ALL).title(a.menu_help), hb);
    let inner = inner_rect(hb);
    let lines: Vec<Spans> = [a.help_controls, a.help_move, a.help_reveal, a.help_mark, "", a.help_goal]
        .into_iter()
        .map(|l| Spans::from(Span::raw(l)))
        .collect();
    f.render_widget(Paragraph::new(Text::from(lines)).alignment(Alignment::Left), inner);

    let btn_w = 9u16;
    let rect = Rect::new(inner.x + inner.width.saturating_sub(btn_w) / 2, inner.y + inner.height.saturating_sub(1), btn_w, 1);
    ui.close_rect = Some(rect);
    button(f, rect, a.btn_close, true);
}

fn draw_game_over<B: Backend>(f: &mut Frame<B>, size: Rect, outcome: Outcome, ui: &mut UiState, lang: &Lang) {
    let a = &lang.assets;
    let gb = bottom_centered_block(44, 8, size);
    f.render_widget(Clear, gb);
    f.render_widget(Block::default().borders(Borders::ALL).title(a.over_title), gb);
    let inner = inner_rect(gb);
    let message = if outcome.won() { a.over_won } else { a.over_lost };
    let lines = vec![
        Spans::from(Span::raw("")),
        Spans::from(Span::raw(message)),
        Spans::from(Span::raw(a.over_again)),
    ];
    f.render_widget(Paragraph::new(Text::from(lines)).alignment(Alignment::Center), inner);

    let btn_w = 9u16;
    let gap = 4u16;
    let by = inner.y + inner.height.saturating_sub(1);
    let bx = inner.x + inner.width.saturating_sub(btn_w * 2 + gap) / 2;
    let yes = Rect::new(bx, by, btn_w, 1);
    let no = Rect::new(bx + btn_w + gap, by, btn_w, 1);
    ui.yes_rect = Some(yes);
    ui.no_rect = Some(no);
    button(f, yes, a.btn_yes, ui.modal_yes);
    button(f, no, a.btn_no, !ui.modal_yes);
}

fn rect_contains(r: Rect, column: u16, row: u16) -> bool {
    column >= r.x && column < r.x + r.width && row >= r.y && row < r.y + r.height
}

fn inner_rect(r: Rect) -> Rect {
    Rect::new(r.x + 1, r.y + 1, r.width.saturating_sub(2), r.height.saturating_sub(2))
}

fn center_rect(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}

fn bottom_centered_block(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + r.height.saturating_sub(height);
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_contains_edges() {
        let r = Rect::new(2, 3, 4, 2);
        assert!(rect_contains(r, 2, 3));
        assert!(rect_contains(r, 5, 4));
        assert!(!rect_contains(r, 6, 4));
        assert!(!rect_contains(r, 5, 5));
        assert!(!rect_contains(r, 1, 3));
    }

    #[test]
    fn test_cell_at_maps_two_columns_per_tile() {
        let board = Board::from_entropy(BoardSize::new(4, 3, 1).unwrap());
        let mut ui = UiState::new(&board);
        ui.board_rect = Some(Rect::new(10, 5, 4 * 2 + 3, 3 + 2));

        assert_eq!(ui.cell_at(11, 6, &board), Some((0, 0)));
        assert_eq!(ui.cell_at(12, 6, &board), Some((0, 0)));
        assert_eq!(ui.cell_at(13, 6, &board), Some((1, 0)));
        assert_eq!(ui.cell_at(18, 8, &board), Some((3, 2)));
        // right padding column and border
        assert_eq!(ui.cell_at(19, 8, &board), None);
        assert_eq!(ui.cell_at(10, 6, &board), None);
    }

    #[test]
    fn test_cursor_clamps_to_board() {
        let board = Board::from_entropy(BoardSize::new(4, 3, 1).unwrap());
        let mut ui = UiState::new(&board);
        ui.cursor = (0, 0);
        ui.move_cursor(-1, -1, &board);
        assert_eq!(ui.cursor, (0, 0));
        ui.move_cursor(10, 10, &board);
        assert_eq!(ui.cursor, (3, 2));
    }

    #[test]
    fn test_center_rect_fits_area() {
        let area = Rect::new(0, 0, 10, 4);
        let r = center_rect(20, 2, area);
        assert_eq!(r.width, 10);
        assert_eq!(r.y, 1);
    }
}
