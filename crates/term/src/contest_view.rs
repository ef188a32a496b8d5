//! ContestScreen: lays out every participant of a round into a framebuffer.
//!
//! This module is pure (no I/O) and is unit-tested through the framebuffer.
//!
//! Fields are drawn mirrored, since field X counts from the right wall. Each
//! participant gets a column of [`PLAYFIELD_WIDTH`] cells: the field, then two
//! score lines and the routine's name below it. A scrolling `ROUND nnn` banner
//! runs along the top row. When a round starts, a tiling wipe covers the
//! screen for `1 + 2 * TILE_SIZE` frames, during which the contest is paused.

use tetcon_core::player::sanitize;
use tetcon_core::{Field, Piece, Score};
use tetcon_engine::{Entry, ViewConfig};
use tetcon_types::PIECE_WIDTH;

use crate::fb::{CellStyle, FrameBuffer, Rgb};

pub const PLAYFIELD_POS_X: i32 = 4;
pub const PLAYFIELD_POS_Y: i32 = 1;
pub const PLAYFIELD_WIDTH: i32 = 19;
pub const TILE_SIZE: i32 = 6;

const CHR_VOID: char = ' ';
const CHR_FRAME: char = '#';
const CHR_BLOCK: char = '@';
const CHR_PIECE: char = 'X';

const BG_GLYPHS: [char; 4] = ['-', '/', '|', '\\'];
const GAME_OVER_TEXT: &str = "GAMEOVER";

const FRAME_STYLE: CellStyle = CellStyle::fg(Rgb::new(150, 150, 160));
const BLOCK_STYLE: CellStyle = CellStyle::fg(Rgb::new(110, 170, 240));
const PIECE_STYLE: CellStyle = CellStyle::fg(Rgb::new(250, 210, 80)).bold();
const TEXT_STYLE: CellStyle = CellStyle::fg(Rgb::new(220, 220, 220));
const BG_STYLE: CellStyle = CellStyle::fg(Rgb::new(70, 70, 90)).dim();
const BANNER_STYLE: CellStyle = CellStyle::fg(Rgb::new(240, 240, 240)).bold();
const TILE_STYLE: CellStyle = CellStyle::fg(Rgb::new(90, 90, 110));
const GAME_OVER_STYLE: CellStyle = CellStyle::fg(Rgb::new(240, 80, 80)).bold();

pub struct ContestScreen {
    fb: FrameBuffer,
    /// Rendered frames; drives the GAMEOVER blink.
    frame: u32,
    bg_ofs: i32,
    banner_ofs: i32,
    /// Round start wipe step, 0 when idle.
    effect: i32,
}

impl ContestScreen {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            fb: FrameBuffer::new(width, height),
            frame: 0,
            bg_ofs: 0,
            banner_ofs: 0,
            effect: 0,
        }
    }

    pub fn from_config(view: &ViewConfig) -> Self {
        Self::new(view.width, view.height)
    }

    pub fn framebuffer(&self) -> &FrameBuffer {
        &self.fb
    }

    pub fn framebuffer_mut(&mut self) -> &mut FrameBuffer {
        &mut self.fb
    }

    pub fn start_round_effect(&mut self) {
        self.effect = 1;
    }

    pub fn is_animating(&self) -> bool {
        self.effect > 0
    }

    /// Render one frame of round `round`.
    pub fn render(&mut self, round: u32, entries: &[Entry<'_>]) {
        self.fb.clear();

        let wiping = self.is_animating();
        if !wiping {
            self.draw_background();
            self.draw_banner(round);
        }

        let blink_on = (self.frame & 0x1f) < 0x18;
        let mut captions = Vec::new();
        for (i, entry) in entries.iter().enumerate() {
            let loc = (PLAYFIELD_POS_X + i as i32 * PLAYFIELD_WIDTH, PLAYFIELD_POS_Y);
            let game_over = !entry.is_playing() && blink_on;
            self.draw_playfield(loc, game_over, entry);
            if game_over {
                let size = entry.field().size();
                let text_len = GAME_OVER_TEXT.len() as i32;
                captions.push((loc.0 + size.x / 2 - text_len / 2, loc.1 + size.y / 2));
            }
        }

        if wiping {
            self.draw_wipe();
        }
        for (x, y) in captions {
            self.fb.overlay_str(x, y, GAME_OVER_TEXT, GAME_OVER_STYLE);
        }

        self.frame = self.frame.wrapping_add(1);
    }

    /// Diagonal line of one glyph sweeping upwards across the screen.
    fn draw_background(&mut self) {
        self.bg_ofs += 1;
        let w = self.fb.width() as i32;
        let h = self.fb.height() as i32;
        if h == 0 {
            return;
        }
        let glyph = BG_GLYPHS[(self.bg_ofs & 3) as usize];
        for x in 0..w {
            let y = h - (self.bg_ofs + (w - x)) % h;
            self.fb.put_char(x, y, glyph, BG_STYLE);
        }
    }

    fn draw_banner(&mut self, round: u32) {
        let content = format!("ROUND {:03}      ", round);
        let size = content.len() as i32;
        let w = self.fb.width() as i32;

        let mut x = -(self.banner_ofs % size);
        while x < w {
            self.fb.put_str(x, 0, &content, BANNER_STYLE);
            x += size;
        }
        self.banner_ofs += 1;
    }

    fn draw_playfield(&mut self, loc: (i32, i32), game_over: bool, entry: &Entry<'_>) {
        let field = entry.field();
        let size = field.size();

        // Screen position of bordered cell (0, 0).
        let origin = (loc.0 + size.x - 1, loc.1 + 1 + size.y - 1);
        self.draw_field(origin, field);
        self.draw_piece(origin, entry.ctrl_piece());
        self.draw_piece(origin, entry.next_piece());

        let stats = (loc.0, loc.1 + 1 + size.y);
        self.draw_stats(stats, game_over, entry.score());
        self.fb
            .put_str(stats.0, stats.1 + 2, &sanitize(entry.name), TEXT_STYLE);
    }

    fn draw_field(&mut self, origin: (i32, i32), field: &Field) {
        let size = field.size();
        let (ox, oy) = origin;

        for x in 0..size.x {
            self.fb.put_char(ox - x, oy, CHR_FRAME, FRAME_STYLE);
        }

        // Only the rows that land on screen.
        let first = (oy - self.fb.height() as i32 + 1).max(1);
        let last = oy.min(size.y - 2);
        for y in first..=last {
            self.fb.put_char(ox, oy - y, CHR_FRAME, FRAME_STYLE);
            for x in 1..size.x - 1 {
                let (ch, style) = if field.cell(x, y) {
                    (CHR_BLOCK, BLOCK_STYLE)
                } else {
                    (CHR_VOID, TEXT_STYLE)
                };
                self.fb.put_char(ox - x, oy - y, ch, style);
            }
            self.fb.put_char(ox - (size.x - 1), oy - y, CHR_FRAME, FRAME_STYLE);
        }

        // Ceiling, open above the spawn columns.
        let gap = (size.x - PIECE_WIDTH) / 2;
        for x in 0..size.x {
            if x < gap || gap + PIECE_WIDTH <= x {
                self.fb
                    .put_char(ox - x, oy - (size.y - 1), CHR_FRAME, FRAME_STYLE);
            }
        }
    }

    fn draw_piece(&mut self, origin: (i32, i32), piece: &Piece) {
        if piece.is_void() {
            return;
        }
        for (dy, row) in piece.bitmap().iter().enumerate() {
            for dx in 0..PIECE_WIDTH {
                if row & (1 << dx) != 0 {
                    let x = origin.0 - (piece.pos.x + dx);
                    let y = origin.1 - (piece.pos.y + dy as i32);
                    self.fb.put_char(x, y, CHR_PIECE, PIECE_STYLE);
                }
            }
        }
    }

    fn draw_stats(&mut self, at: (i32, i32), game_over: bool, score: &Score) {
        let (x, y) = at;
        if game_over {
            let line = score.line_ratio();
            self.put_text(x, y, &format!("P/{:3}%", score.piece_ratio()));
            self.put_text(x, y + 1, &format!("Lx{}.{:02}", line / 100, line % 100));
        } else {
            self.put_text(x, y, &format!("P:{:4}", score.pieces()));
            self.put_text(x, y + 1, &format!("L:{:4}", score.lines()));
            self.put_text(x + 7, y, &format!("R:{:3}%", score.recover_ratio()));
            self.put_text(x + 7, y + 1, &format!("X:{:4}", score.penalties()));
        }
    }

    fn put_text(&mut self, x: i32, y: i32, text: &str) {
        self.fb.put_str(x, y, text, TEXT_STYLE);
    }

    fn draw_wipe(&mut self) {
        if self.effect >= 1 + 2 * TILE_SIZE {
            self.effect = 0;
            return;
        }

        let tile: Vec<String> = (0..TILE_SIZE)
            .map(|y| {
                let len = (2 * TILE_SIZE - (y + self.effect - 1)).clamp(0, TILE_SIZE) as usize;
                let mut row = CHR_FRAME.to_string().repeat(len);
                row.push_str(&" ".repeat(TILE_SIZE as usize - len));
                row
            })
            .collect();

        let w = self.fb.width() as i32;
        let h = self.fb.height() as i32;
        for ty in (0..h).step_by(TILE_SIZE as usize) {
            for tx in (0..w).step_by(TILE_SIZE as usize) {
                for (dy, row) in tile.iter().enumerate() {
                    self.fb.overlay_str(tx, ty + dy as i32, row, TILE_STYLE);
                }
            }
        }

        self.effect += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tetcon_core::{Playfield, Xorshift128};
    use tetcon_engine::players::IdlePlayer;

    fn idle_field(started: bool) -> Playfield {
        let mut pf = Playfield::new(10, 18, 10);
        if started {
            pf.start_game(&Xorshift128::new(1), &mut IdlePlayer);
        }
        pf
    }

    fn render(screen: &mut ContestScreen, pf: &Playfield) {
        let entries = [Entry {
            name: "IDLE/1.00",
            playfield: pf,
        }];
        screen.render(1, &entries);
    }

    fn text(screen: &ContestScreen, y: u16) -> String {
        screen.framebuffer().row_text(y)
    }

    #[test]
    fn test_field_frame_is_mirrored_into_its_column() {
        let pf = idle_field(true);
        let mut screen = ContestScreen::new(79, 25);
        render(&mut screen, &pf);

        // 12x20 bordered field: ground on row 21, ceiling on row 2.
        assert_eq!(&text(&screen, 21)[4..16], "############");
        assert_eq!(&text(&screen, 10)[4..5], "#");
        assert_eq!(&text(&screen, 10)[15..16], "#");
        let ceiling = text(&screen, 2);
        assert_eq!(&ceiling[4..8], "####");
        assert_eq!(&ceiling[12..16], "####");
    }

    #[test]
    fn test_blocks_and_pieces_use_their_glyphs() {
        let mut pf = idle_field(true);
        let mut player = IdlePlayer;
        while pf.score().pieces() < 2 {
            pf.tick(&mut player);
        }
        let mut screen = ContestScreen::new(79, 25);
        render(&mut screen, &pf);

        let body: String = (1..21).map(|y| text(&screen, y)).collect();
        assert!(body.contains(CHR_BLOCK));
        assert!(body.contains(CHR_PIECE));
    }

    #[test]
    fn test_score_lines_and_name() {
        let pf = idle_field(true);
        let mut screen = ContestScreen::new(79, 25);
        render(&mut screen, &pf);

        assert!(text(&screen, 22)[4..].starts_with("P:   0"));
        assert!(text(&screen, 23)[4..].starts_with("L:   0"));
        assert!(text(&screen, 23)[11..].starts_with("X:   0"));
        assert!(text(&screen, 24)[4..].starts_with("IDLE/1.00"));
    }

    #[test]
    fn test_finished_participant_blinks_game_over() {
        let pf = idle_field(false);
        let mut screen = ContestScreen::new(79, 25);
        render(&mut screen, &pf);

        assert!(text(&screen, 11)[6..].starts_with(GAME_OVER_TEXT));
        assert!(text(&screen, 22)[4..].starts_with("P/  0%"));
        assert!(text(&screen, 23)[4..].starts_with("Lx0.00"));

        // Hidden for the last 8 frames of every 32.
        for _ in 0..0x18 {
            render(&mut screen, &pf);
        }
        assert!(!text(&screen, 11).contains(GAME_OVER_TEXT));
        assert!(text(&screen, 22)[4..].starts_with("P:"));
    }

    #[test]
    fn test_banner_scrolls_one_cell_per_frame() {
        let pf = idle_field(true);
        let mut screen = ContestScreen::new(79, 25);
        render(&mut screen, &pf);
        assert!(text(&screen, 0).starts_with("ROUND 001      ROUND 001"));
        render(&mut screen, &pf);
        assert!(text(&screen, 0).starts_with("OUND 001      ROUND 001"));
    }

    #[test]
    fn test_round_wipe_runs_for_fixed_frames() {
        let pf = idle_field(true);
        let mut screen = ContestScreen::new(79, 25);
        screen.start_round_effect();
        assert!(screen.is_animating());

        render(&mut screen, &pf);
        assert_eq!(text(&screen, 0), "#".repeat(79));

        let mut frames = 1;
        while screen.is_animating() {
            render(&mut screen, &pf);
            frames += 1;
        }
        assert_eq!(frames, 1 + 2 * TILE_SIZE);
        render(&mut screen, &pf);
        assert!(text(&screen, 0).starts_with("ROUND"));
    }

    #[test]
    fn test_participants_are_side_by_side() {
        let a = idle_field(true);
        let b = idle_field(true);
        let entries = [
            Entry {
                name: "A",
                playfield: &a,
            },
            Entry {
                name: "B",
                playfield: &b,
            },
        ];
        let mut screen = ContestScreen::new(79, 25);
        screen.render(1, &entries);

        let names = text(&screen, 24);
        assert_eq!(&names[4..5], "A");
        assert_eq!(&names[23..24], "B");
    }
}
