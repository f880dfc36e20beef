//! Terminal rendering.
//!
//! A [`Frame`] is first rasterized into a [`Canvas`] of character cells
//! scaled to the terminal size, then written out with crossterm. Keeping the
//! two apart lets the layout be tested without a terminal.

use std::io::Write;

use crossterm::style::{self, Color, Print};
use crossterm::{QueueableCommand, cursor, terminal};

use shadowswap_core::game_trait::GameMetadata;
use shadowswap_core::geometry::Rect;
use shadowswap_core::render::Frame;

use shadow_swap::RunStats;

use crate::theme::Theme;

/// Rows reserved above the play field for the HUD.
pub const HUD_ROWS: u16 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub glyph: char,
    pub fg: [u8; 3],
    pub bg: [u8; 3],
}

/// A grid of terminal cells, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    pub cols: u16,
    pub rows: u16,
    cells: Vec<Cell>,
}

impl Canvas {
    pub fn new(cols: u16, rows: u16, bg: [u8; 3]) -> Self {
        let blank = Cell {
            glyph: ' ',
            fg: bg,
            bg,
        };
        Self {
            cols,
            rows,
            cells: vec![blank; cols as usize * rows as usize],
        }
    }

    pub fn get(&self, col: u16, row: u16) -> Option<&Cell> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        self.cells.get(row as usize * self.cols as usize + col as usize)
    }

    pub fn row(&self, row: u16) -> &[Cell] {
        let start = row as usize * self.cols as usize;
        self.cells.get(start..start + self.cols as usize).unwrap_or(&[])
    }

    fn set(&mut self, col: u16, row: u16, glyph: char, fg: [u8; 3]) {
        if col < self.cols && row < self.rows {
            let cell = &mut self.cells[row as usize * self.cols as usize + col as usize];
            cell.glyph = glyph;
            cell.fg = fg;
        }
    }

    /// Write `text` starting at `col`, clipped to the canvas.
    pub fn put_text(&mut self, col: u16, row: u16, text: &str, fg: [u8; 3]) {
        for (i, ch) in text.chars().enumerate() {
            let Ok(offset) = u16::try_from(i) else {
                break;
            };
            self.set(col.saturating_add(offset), row, ch, fg);
        }
    }

    /// Write `text` centred horizontally on `row`.
    pub fn put_centered(&mut self, row: u16, text: &str, fg: [u8; 3]) {
        let len = u16::try_from(text.chars().count()).unwrap_or(u16::MAX);
        self.put_text(self.cols.saturating_sub(len) / 2, row, text, fg);
    }

    /// The text of one row, for assertions and debugging.
    pub fn row_text(&self, row: u16) -> String {
        self.row(row).iter().map(|c| c.glyph).collect()
    }
}

/// Glyph for a partially transparent sprite. Fully opaque sprites keep
/// their own glyph.
pub fn shade_glyph(opacity: u8, solid: char) -> char {
    match opacity {
        u8::MAX => solid,
        192.. => '▓',
        112.. => '▒',
        _ => '░',
    }
}

/// Cell span `[start, end)` covering `[lo, hi)` world units at `scale`
/// cells per unit, clipped to `[0, limit)`. Every visible rect covers at
/// least one cell.
fn span(lo: f32, hi: f32, scale: f32, limit: u16) -> Option<(u16, u16)> {
    let start = (lo * scale).floor();
    let end = (hi * scale).ceil().max(start + 1.0);
    let limit = f32::from(limit);
    if end <= 0.0 || start >= limit {
        return None;
    }
    Some((start.max(0.0) as u16, end.min(limit) as u16))
}

fn cells_for(
    rect: &Rect,
    frame: &Frame,
    cols: u16,
    field_rows: u16,
) -> Option<(u16, u16, u16, u16)> {
    let sx = f32::from(cols) / frame.width;
    let sy = f32::from(field_rows) / frame.height;
    let (c0, c1) = span(rect.left(), rect.right(), sx, cols)?;
    let (r0, r1) = span(rect.top(), rect.bottom(), sy, field_rows)?;
    Some((c0, c1, r0 + HUD_ROWS, r1 + HUD_ROWS))
}

/// Scale `frame` into a `cols` x `rows` canvas: HUD on the first row, the
/// play field below, the banner centred over the field.
pub fn rasterize(frame: &Frame, theme: &Theme, cols: u16, rows: u16) -> Canvas {
    let mut canvas = Canvas::new(cols, rows, theme.background(frame.world));
    let field_rows = rows.saturating_sub(HUD_ROWS);

    if field_rows > 0 && frame.width > 0.0 && frame.height > 0.0 {
        for cmd in &frame.commands {
            let Some((c0, c1, r0, r1)) = cells_for(&cmd.rect, frame, cols, field_rows) else {
                continue;
            };
            let sprite = theme.sprite(cmd.appearance);
            let glyph = shade_glyph(cmd.opacity, sprite.glyph);
            for row in r0..r1 {
                for col in c0..c1 {
                    canvas.set(col, row, glyph, sprite.color);
                }
            }
        }
    }

    let hud = &frame.hud;
    canvas.put_text(1, 0, &hud.level_label, theme.hud_text);
    let keys_len = u16::try_from(hud.keys_label.chars().count()).unwrap_or(u16::MAX);
    let keys_col = cols.saturating_sub(keys_len.saturating_add(1));
    canvas.put_text(keys_col, 0, &hud.keys_label, theme.hud_text);
    if let Some(banner) = &hud.banner {
        canvas.put_centered(HUD_ROWS + field_rows / 2, banner, theme.banner_text);
    }
    canvas
}

fn rgb(c: [u8; 3]) -> Color {
    Color::Rgb {
        r: c[0],
        g: c[1],
        b: c[2],
    }
}

/// Write the whole canvas, changing colours only where they differ.
pub fn draw<W: Write>(out: &mut W, canvas: &Canvas) -> std::io::Result<()> {
    for row in 0..canvas.rows {
        out.queue(cursor::MoveTo(0, row))?;
        let mut current: Option<([u8; 3], [u8; 3])> = None;
        for cell in canvas.row(row) {
            if current != Some((cell.fg, cell.bg)) {
                out.queue(style::SetForegroundColor(rgb(cell.fg)))?;
                out.queue(style::SetBackgroundColor(rgb(cell.bg)))?;
                current = Some((cell.fg, cell.bg));
            }
            out.queue(Print(cell.glyph))?;
        }
    }
    out.queue(style::ResetColor)?;
    out.flush()
}

/// Lines of the title screen.
pub fn title_lines(meta: &GameMetadata) -> Vec<String> {
    vec![
        format!("~  {}  ~", meta.name.to_uppercase()),
        String::new(),
        meta.description.clone(),
        format!("{} levels", meta.level_count),
        String::new(),
        "← → / A D : Move    SPACE / ↑ / W : Jump".to_string(),
        "TAB / S : Swap world    P : Pause    Q : Quit".to_string(),
        String::new(),
        "Press ENTER or SPACE to start".to_string(),
    ]
}

/// Lines of the victory screen.
pub fn victory_lines(stats: &RunStats) -> Vec<String> {
    vec![
        "You finished all levels!".to_string(),
        String::new(),
        format!("Keys collected: {}", stats.keys_collected),
        format!("World swaps:    {}", stats.world_swaps),
        format!("Deaths:         {}", stats.deaths),
        String::new(),
        "Press any key to exit".to_string(),
    ]
}

/// Clear the screen and draw `lines` centred, the first one highlighted.
pub fn draw_screen<W: Write>(out: &mut W, lines: &[String], theme: &Theme) -> std::io::Result<()> {
    let (cols, rows) = terminal::size()?;
    let canvas = screen_canvas(lines, theme, cols, rows);
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    draw(out, &canvas)
}

/// Lay out a full-screen text page on a `cols` x `rows` canvas.
pub fn screen_canvas(lines: &[String], theme: &Theme, cols: u16, rows: u16) -> Canvas {
    let mut canvas = Canvas::new(cols, rows, theme.shadow_background);
    let height = u16::try_from(lines.len()).unwrap_or(u16::MAX);
    let top = rows.saturating_sub(height) / 2;
    for (i, line) in lines.iter().enumerate() {
        let Ok(offset) = u16::try_from(i) else {
            break;
        };
        let fg = if i == 0 {
            theme.banner_text
        } else {
            theme.hud_text
        };
        canvas.put_centered(top.saturating_add(offset), line, fg);
    }
    canvas
}
