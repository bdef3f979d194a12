//! Pairs-matching game played on a `rows` x `cols` board.

use std::time::Instant;

use crossterm::event::{Event, KeyCode, KeyEventKind, MouseButton, MouseEventKind};
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use tracing::{debug, info};

use crate::components::{Component, ComponentContext};
use crate::constants::REVEAL_DELAY;
use crate::error::{DeskError, Result};
use crate::layout::rect_contains;
use crate::storage::Storage;
use crate::ui::UiFrame;
use crate::window::PanelId;

const CARD_WIDTH: u16 = 5;
const CARD_GAP: u16 = 1;
const CARD_ROW_HEIGHT: u16 = 2;
const GRID_TOP: u16 = 2;
const CLOSE_LABEL: &str = "[ close ]";

pub fn best_score_key(rows: u16, cols: u16) -> String {
    format!("memoryBest_{rows}x{cols}")
}

/// Uniform index in `0..bound` from the OS random source.
fn random_below(bound: usize) -> Result<usize> {
    let mut bytes = [0u8; 8];
    getrandom::getrandom(&mut bytes)?;
    Ok((u64::from_le_bytes(bytes) % bound as u64) as usize)
}

/// Fisher–Yates shuffle.
pub fn shuffle<T>(items: &mut [T]) -> Result<()> {
    for i in (1..items.len()).rev() {
        let j = random_below(i + 1)?;
        items.swap(i, j);
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Card {
    pub pair: u16,
    pub face_up: bool,
    pub matched: bool,
}

impl Card {
    fn label(&self) -> String {
        if self.face_up || self.matched {
            let symbol = (b'A' + (self.pair % 26) as u8) as char;
            format!("[ {symbol} ]")
        } else {
            "[ ? ]".to_string()
        }
    }
}

pub struct MemoryGame {
    panel: PanelId,
    rows: u16,
    cols: u16,
    cards: Vec<Card>,
    cursor: usize,
    flipped: Vec<usize>,
    resolve_at: Option<Instant>,
    attempts: u32,
    matched_pairs: usize,
    completed: bool,
    storage: Storage,
    card_rects: Vec<Rect>,
    close_rect: Option<Rect>,
}

impl MemoryGame {
    pub fn new(panel: PanelId, rows: u16, cols: u16, storage: Storage) -> Result<Self> {
        validate(rows, cols)?;
        let pairs = rows as usize * cols as usize / 2;
        let mut deck: Vec<u16> = (0..pairs as u16).flat_map(|p| [p, p]).collect();
        shuffle(&mut deck)?;
        let cursor = random_below(deck.len())?;
        Self::from_deck(panel, rows, cols, deck, storage).map(|mut game| {
            game.cursor = cursor;
            game
        })
    }

    /// Build a game with a fixed card order.
    pub fn from_deck(
        panel: PanelId,
        rows: u16,
        cols: u16,
        deck: Vec<u16>,
        storage: Storage,
    ) -> Result<Self> {
        validate(rows, cols)?;
        if deck.len() != rows as usize * cols as usize {
            return Err(DeskError::InvalidBoard { rows, cols });
        }
        debug!(panel = %panel, rows, cols, "memory game started");
        Ok(Self {
            panel,
            rows,
            cols,
            cards: deck
                .into_iter()
                .map(|pair| Card {
                    pair,
                    face_up: false,
                    matched: false,
                })
                .collect(),
            cursor: 0,
            flipped: Vec::with_capacity(2),
            resolve_at: None,
            attempts: 0,
            matched_pairs: 0,
            completed: false,
            storage,
            card_rects: Vec::new(),
            close_rect: None,
        })
    }

    pub fn panel(&self) -> PanelId {
        self.panel
    }

    pub fn size(&self) -> (u16, u16) {
        (self.rows, self.cols)
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn is_pending(&self) -> bool {
        self.resolve_at.is_some()
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn best(&self) -> Option<u32> {
        self.storage
            .get(&best_score_key(self.rows, self.cols))
            .and_then(|raw| raw.parse().ok())
    }

    /// Move horizontally, wrapping around the whole deck.
    pub fn move_horizontal(&mut self, step: isize) {
        let len = self.cards.len() as isize;
        self.cursor = (self.cursor as isize + step).rem_euclid(len) as usize;
    }

    /// Move by whole rows, clamping to the first or last card.
    pub fn move_vertical(&mut self, step: isize) {
        let last = self.cards.len() as isize - 1;
        let target = self.cursor as isize + step * self.cols as isize;
        self.cursor = target.clamp(0, last) as usize;
    }

    pub fn flip(&mut self, index: usize) -> bool {
        self.flip_at(index, Instant::now())
    }

    /// Turn a card face up. Ignored while two cards await resolution, for
    /// cards already showing and after completion.
    pub fn flip_at(&mut self, index: usize, now: Instant) -> bool {
        if self.completed || self.resolve_at.is_some() || self.flipped.len() >= 2 {
            return false;
        }
        let Some(card) = self.cards.get_mut(index) else {
            return false;
        };
        if card.face_up || card.matched {
            return false;
        }
        card.face_up = true;
        self.flipped.push(index);
        if self.flipped.len() == 2 {
            self.attempts += 1;
            self.resolve_at = Some(now + REVEAL_DELAY);
        }
        true
    }

    fn resolve(&mut self) {
        self.resolve_at = None;
        let &[a, b] = self.flipped.as_slice() else {
            self.flipped.clear();
            return;
        };
        self.flipped.clear();
        if self.cards[a].pair == self.cards[b].pair {
            for i in [a, b] {
                self.cards[i].matched = true;
            }
            self.matched_pairs += 1;
        } else {
            for i in [a, b] {
                self.cards[i].face_up = false;
            }
        }
        if self.matched_pairs * 2 == self.cards.len() {
            self.complete();
        }
    }

    fn complete(&mut self) {
        self.completed = true;
        let key = best_score_key(self.rows, self.cols);
        let improved = self.best().is_none_or(|best| self.attempts < best);
        if improved {
            self.storage.set(&key, self.attempts.to_string());
        }
        info!(panel = %self.panel, attempts = self.attempts, improved, "memory game completed");
    }

    fn card_at(&self, column: u16, row: u16) -> Option<usize> {
        self.card_rects
            .iter()
            .position(|rect| rect_contains(*rect, column, row))
    }
}

/// Even, non-empty boards whose pair ids and laid-out grid fit in `u16`.
fn validate(rows: u16, cols: u16) -> Result<()> {
    let cells = rows as u32 * cols as u32;
    let grid_width = cols.checked_mul(CARD_WIDTH + CARD_GAP);
    // status line, card rows, then the completion and close lines
    let grid_height = rows
        .checked_mul(CARD_ROW_HEIGHT)
        .and_then(|h| h.checked_add(GRID_TOP + 2));
    if cells == 0
        || cells % 2 != 0
        || cells / 2 > u32::from(u16::MAX)
        || grid_width.is_none()
        || grid_height.is_none()
    {
        return Err(DeskError::InvalidBoard { rows, cols });
    }
    Ok(())
}

impl Component for MemoryGame {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, ctx: &ComponentContext) {
        self.card_rects.clear();
        self.close_rect = None;
        if area.width == 0 || area.height == 0 {
            return;
        }
        let best = self
            .best()
            .map_or_else(|| "-".to_string(), |b| b.to_string());
        let status = format!("Attempts: {}  Best: {best}", self.attempts);
        frame.set_string(area.x, area.y, &status, Style::default());

        for (index, card) in self.cards.iter().enumerate() {
            let row = (index / self.cols as usize) as u16;
            let col = (index % self.cols as usize) as u16;
            let rect = Rect {
                x: area.x.saturating_add(col * (CARD_WIDTH + CARD_GAP)),
                y: area.y.saturating_add(GRID_TOP + row * CARD_ROW_HEIGHT),
                width: CARD_WIDTH,
                height: 1,
            };
            let mut style = if card.matched {
                Style::default().fg(crate::theme::card_matched())
            } else if card.face_up {
                Style::default().fg(crate::theme::card_face())
            } else {
                Style::default().fg(crate::theme::card_back())
            };
            if index == self.cursor && ctx.focused() {
                style = style.add_modifier(Modifier::REVERSED);
            }
            frame.set_string(rect.x, rect.y, &card.label(), style);
            self.card_rects.push(rect.intersection(area));
        }

        if self.completed {
            let y = area.y.saturating_add(GRID_TOP + self.rows * CARD_ROW_HEIGHT);
            let message = format!("Completed in {} attempts!", self.attempts);
            frame.set_string(area.x, y, &message, Style::default().add_modifier(Modifier::BOLD));
            let rect = Rect {
                x: area.x,
                y: y.saturating_add(1),
                width: CLOSE_LABEL.len() as u16,
                height: 1,
            }
            .intersection(area);
            frame.set_string(rect.x, rect.y, CLOSE_LABEL, Style::default().fg(crate::theme::accent()));
            if !rect.is_empty() {
                self.close_rect = Some(rect);
            }
        }
    }

    fn handle_event(&mut self, event: &Event, _ctx: &ComponentContext) -> bool {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => match key.code {
                KeyCode::Left => self.move_horizontal(-1),
                KeyCode::Right => self.move_horizontal(1),
                KeyCode::Up => self.move_vertical(-1),
                KeyCode::Down => self.move_vertical(1),
                KeyCode::Enter | KeyCode::Char(' ') => {
                    self.flip(self.cursor);
                }
                _ => return false,
            },
            Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                let Some(index) = self.card_at(mouse.column, mouse.row) else {
                    return false;
                };
                self.cursor = index;
                self.flip(index);
            }
            _ => return false,
        }
        true
    }

    fn tick(&mut self, now: Instant) {
        if let Some(deadline) = self.resolve_at
            && now >= deadline
        {
            self.resolve();
        }
    }

    fn close_markers(&self) -> Vec<Rect> {
        self.close_rect.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::buffer::Buffer;

    fn game(rows: u16, cols: u16, deck: Vec<u16>) -> MemoryGame {
        MemoryGame::from_deck(PanelId::new(1), rows, cols, deck, Storage::in_memory()).unwrap()
    }

    #[test]
    fn odd_or_empty_boards_are_rejected() {
        let storage = Storage::in_memory();
        assert!(matches!(
            MemoryGame::new(PanelId::new(1), 3, 3, storage.clone()),
            Err(DeskError::InvalidBoard { rows: 3, cols: 3 })
        ));
        assert!(MemoryGame::new(PanelId::new(1), 0, 4, storage.clone()).is_err());
        assert!(MemoryGame::from_deck(PanelId::new(1), 2, 2, vec![0, 0], storage).is_err());
    }

    #[test]
    fn boards_too_large_to_lay_out_are_rejected() {
        let storage = Storage::in_memory();
        assert!(matches!(
            MemoryGame::from_deck(PanelId::new(1), 2, 20_000, Vec::new(), storage.clone()),
            Err(DeskError::InvalidBoard { rows: 2, cols: 20_000 })
        ));
        assert!(MemoryGame::new(PanelId::new(1), 40_000, 2, storage.clone()).is_err());
        assert!(MemoryGame::new(PanelId::new(1), 2, 10_922, storage).is_ok());
    }

    #[test]
    fn rendering_near_the_buffer_edge_clips_cards() {
        let mut g = game(2, 4, vec![0, 1, 2, 3, 0, 1, 2, 3]);
        let t0 = Instant::now();
        for index in 0..4 {
            g.flip_at(index, t0);
            g.flip_at(index + 4, t0);
            g.tick(t0 + REVEAL_DELAY);
        }
        assert!(g.is_completed());
        let area = Rect::new(u16::MAX - 8, u16::MAX - 4, 8, 4);
        let mut buffer = Buffer::empty(area);
        let mut frame = UiFrame::from_parts(area, &mut buffer);
        g.render(&mut frame, area, &ComponentContext::default());
        assert!(
            g.card_rects
                .iter()
                .all(|rect| rect.is_empty() || area.intersection(*rect) == *rect)
        );
    }

    #[test]
    fn new_deck_holds_each_pair_twice() {
        let game = MemoryGame::new(PanelId::new(1), 4, 4, Storage::in_memory()).unwrap();
        let mut pairs: Vec<u16> = game.cards().iter().map(|c| c.pair).collect();
        pairs.sort_unstable();
        let expected: Vec<u16> = (0..8).flat_map(|p| [p, p]).collect();
        assert_eq!(pairs, expected);
        assert!(game.cursor() < 16);
    }

    #[test]
    fn horizontal_wraps_and_vertical_clamps() {
        let mut g = game(2, 4, vec![0, 1, 2, 3, 0, 1, 2, 3]);
        g.move_horizontal(-1);
        assert_eq!(g.cursor(), 7);
        g.move_horizontal(1);
        assert_eq!(g.cursor(), 0);
        g.move_vertical(-1);
        assert_eq!(g.cursor(), 0);
        g.move_horizontal(2);
        g.move_vertical(1);
        assert_eq!(g.cursor(), 6);
        g.move_vertical(1);
        assert_eq!(g.cursor(), 7);
    }

    #[test]
    fn mismatch_turns_back_after_delay() {
        let mut g = game(2, 2, vec![0, 1, 0, 1]);
        let t0 = Instant::now();
        assert!(g.flip_at(0, t0));
        assert!(!g.flip_at(0, t0));
        assert!(g.flip_at(1, t0));
        assert_eq!(g.attempts(), 1);
        assert!(g.is_pending());
        assert!(!g.flip_at(2, t0));

        g.tick(t0 + REVEAL_DELAY / 2);
        assert!(g.cards()[0].face_up);
        g.tick(t0 + REVEAL_DELAY);
        assert!(!g.is_pending());
        assert!(!g.cards()[0].face_up);
        assert!(!g.cards()[1].face_up);
    }

    #[test]
    fn matching_all_pairs_completes_and_records_best() {
        let storage = Storage::in_memory();
        let mut g =
            MemoryGame::from_deck(PanelId::new(1), 2, 2, vec![0, 1, 0, 1], storage.clone())
                .unwrap();
        let t0 = Instant::now();
        // one miss, then two hits
        g.flip_at(0, t0);
        g.flip_at(1, t0);
        g.tick(t0 + REVEAL_DELAY);
        for (a, b) in [(0, 2), (1, 3)] {
            g.flip_at(a, t0);
            g.flip_at(b, t0);
            g.tick(t0 + REVEAL_DELAY);
        }
        assert!(g.is_completed());
        assert_eq!(g.attempts(), 3);
        assert_eq!(storage.get("memoryBest_2x2").as_deref(), Some("3"));
        assert!(!g.flip_at(0, t0));

        // a worse score leaves the best untouched
        storage.set("memoryBest_2x2", "2");
        let mut worse =
            MemoryGame::from_deck(PanelId::new(2), 2, 2, vec![0, 0, 1, 1], storage.clone())
                .unwrap();
        for (a, b) in [(0, 2), (0, 1), (2, 3)] {
            worse.flip_at(a, t0);
            worse.flip_at(b, t0);
            worse.tick(t0 + REVEAL_DELAY);
        }
        assert!(worse.is_completed());
        assert_eq!(storage.get("memoryBest_2x2").as_deref(), Some("2"));
    }

    #[test]
    fn completion_exposes_close_marker() {
        let mut g = game(2, 2, vec![0, 0, 1, 1]);
        let t0 = Instant::now();
        for (a, b) in [(0, 1), (2, 3)] {
            g.flip_at(a, t0);
            g.flip_at(b, t0);
            g.tick(t0 + REVEAL_DELAY);
        }
        let area = Rect::new(1, 2, 40, 12);
        let mut buffer = Buffer::empty(Rect::new(0, 0, 42, 15));
        let mut frame = UiFrame::from_parts(Rect::new(0, 0, 42, 15), &mut buffer);
        g.render(&mut frame, area, &ComponentContext::new(true));
        let markers = g.close_markers();
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].y, 2 + GRID_TOP + 2 * CARD_ROW_HEIGHT + 1);
        let text = crate::ui::buffer_row(&buffer, markers[0].y);
        assert!(text.contains(CLOSE_LABEL));
    }

    #[test]
    fn click_flips_card_under_pointer() {
        let mut g = game(2, 2, vec![0, 1, 0, 1]);
        let area = Rect::new(0, 0, 30, 8);
        let mut buffer = Buffer::empty(area);
        let mut frame = UiFrame::from_parts(area, &mut buffer);
        g.render(&mut frame, area, &ComponentContext::new(true));
        let press = Event::Mouse(crossterm::event::MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: CARD_WIDTH + CARD_GAP + 1,
            row: GRID_TOP,
            modifiers: crossterm::event::KeyModifiers::NONE,
        });
        assert!(g.handle_event(&press, &ComponentContext::new(true)));
        assert_eq!(g.cursor(), 1);
        assert!(g.cards()[1].face_up);
    }
}
