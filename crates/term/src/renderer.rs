//! TerminalRenderer: flushes a framebuffer to a real terminal.
//!
//! The first frame, and any frame after a resize or `invalidate`, is written in
//! full. After that only spans of changed cells go out. Line-clear flashes and
//! particles change scattered cells on a row, so spans separated by a short
//! unchanged gap are merged: reprinting a few cells is cheaper than another
//! cursor move. The encoder tracks the terminal's cursor and style and only
//! emits the attributes that actually differ.

use std::io::{self, Write};

use anyhow::Result;

use crossterm::{
    cursor,
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal, QueueableCommand,
};

use crate::fb::{CellStyle, FrameBuffer, Rgb};

/// Unchanged cells that may be reprinted to join two changed spans.
pub const SPAN_MERGE_GAP: u16 = 4;

/// What one flush wrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlushStats {
    pub full: bool,
    pub spans: usize,
    pub cells: usize,
}

pub struct TerminalRenderer {
    stdout: io::Stdout,
    shown: FrameBuffer,
    valid: bool,
    buf: Vec<u8>,
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            shown: FrameBuffer::new(0, 0),
            valid: false,
            buf: Vec::with_capacity(64 * 1024),
        }
    }

    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.buf.clear();
        self.buf.queue(terminal::EnterAlternateScreen)?;
        self.buf.queue(cursor::Hide)?;
        self.buf.queue(terminal::DisableLineWrap)?;
        self.flush_buf()?;
        self.valid = false;
        Ok(())
    }

    pub fn exit(&mut self) -> Result<()> {
        self.buf.clear();
        self.buf.queue(ResetColor)?;
        self.buf.queue(SetAttribute(Attribute::Reset))?;
        self.buf.queue(terminal::EnableLineWrap)?;
        self.buf.queue(cursor::Show)?;
        self.buf.queue(terminal::LeaveAlternateScreen)?;
        self.flush_buf()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Force the next draw to be a full redraw (terminal resized).
    pub fn invalidate(&mut self) {
        self.valid = false;
    }

    /// Bring the terminal up to date with `fb`.
    ///
    /// The shown frame is copied into a buffer reused across frames, so
    /// steady-state draws do not allocate.
    pub fn draw(&mut self, fb: &FrameBuffer) -> Result<FlushStats> {
        self.buf.clear();
        let same_size = self.shown.width() == fb.width() && self.shown.height() == fb.height();
        let stats = if self.valid && same_size {
            encode_diff_into(&self.shown, fb, &mut self.buf)?
        } else {
            encode_full_into(fb, &mut self.buf)?
        };
        if !self.buf.is_empty() {
            self.flush_buf()?;
        }

        self.shown.copy_from(fb);
        self.valid = true;
        Ok(stats)
    }

    fn flush_buf(&mut self) -> Result<()> {
        self.stdout.write_all(&self.buf)?;
        self.stdout.flush()?;
        Ok(())
    }
}

/// Encode a full-frame redraw into `out`.
pub fn encode_full_into(fb: &FrameBuffer, out: &mut Vec<u8>) -> Result<FlushStats> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let mut enc = Encoder::new(out, fb.width());
    for y in 0..fb.height() {
        enc.print_span(fb, 0, y, fb.width())?;
    }
    enc.finish()?;

    Ok(FlushStats {
        full: true,
        spans: fb.height() as usize,
        cells: fb.cells().len(),
    })
}

/// Encode only what changed between `prev` and `next` into `out`.
///
/// Both frames must have the same size. Nothing is written when they are
/// identical.
pub fn encode_diff_into(
    prev: &FrameBuffer,
    next: &FrameBuffer,
    out: &mut Vec<u8>,
) -> Result<FlushStats> {
    let mut stats = FlushStats::default();
    let mut enc = Encoder::new(out, next.width());

    for y in 0..next.height() {
        for_each_changed_span(prev, next, y, SPAN_MERGE_GAP, |x, len| {
            stats.spans += 1;
            stats.cells += len as usize;
            enc.print_span(next, x, y, len)
        })?;
    }

    if stats.spans > 0 {
        enc.finish()?;
    }
    Ok(stats)
}

/// Tracks what the terminal currently shows for cursor and style.
struct Encoder<'a> {
    out: &'a mut Vec<u8>,
    width: u16,
    cursor: Option<(u16, u16)>,
    style: Option<CellStyle>,
}

impl<'a> Encoder<'a> {
    fn new(out: &'a mut Vec<u8>, width: u16) -> Self {
        Self {
            out,
            width,
            cursor: None,
            style: None,
        }
    }

    fn print_span(&mut self, fb: &FrameBuffer, x: u16, y: u16, len: u16) -> Result<()> {
        if self.cursor != Some((x, y)) {
            self.out.queue(cursor::MoveTo(x, y))?;
        }
        for cx in x..x.saturating_add(len) {
            let cell = fb.get(cx, y).unwrap_or_default();
            self.set_style(cell.style)?;
            self.out.queue(Print(cell.ch))?;
        }
        let end = x.saturating_add(len);
        // The last column leaves the cursor parked, not advanced.
        self.cursor = (end < self.width).then_some((end, y));
        Ok(())
    }

    fn set_style(&mut self, next: CellStyle) -> Result<()> {
        if self.style == Some(next) {
            return Ok(());
        }
        // Bold and dim can only be turned off by a full attribute reset.
        let reset = match self.style {
            Some(cur) => (cur.bold && !next.bold) || (cur.dim && !next.dim),
            None => true,
        };
        let cur = self.style.filter(|_| !reset);

        if reset {
            self.out.queue(SetAttribute(Attribute::Reset))?;
        }
        if cur.map(|c| c.fg) != Some(next.fg) {
            self.out.queue(SetForegroundColor(rgb_to_color(next.fg)))?;
        }
        if cur.map(|c| c.bg) != Some(next.bg) {
            self.out.queue(SetBackgroundColor(rgb_to_color(next.bg)))?;
        }
        if next.bold && !cur.is_some_and(|c| c.bold) {
            self.out.queue(SetAttribute(Attribute::Bold))?;
        }
        if next.dim && !cur.is_some_and(|c| c.dim) {
            self.out.queue(SetAttribute(Attribute::Dim))?;
        }
        self.style = Some(next);
        Ok(())
    }

    fn finish(self) -> Result<()> {
        self.out.queue(ResetColor)?;
        self.out.queue(SetAttribute(Attribute::Reset))?;
        Ok(())
    }
}

fn rgb_to_color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}

/// Call `f(x, len)` for each span of row `y` that differs between the frames.
///
/// Spans whose unchanged gap is at most `merge_gap` cells are reported as one.
fn for_each_changed_span(
    prev: &FrameBuffer,
    next: &FrameBuffer,
    y: u16,
    merge_gap: u16,
    mut f: impl FnMut(u16, u16) -> Result<()>,
) -> Result<()> {
    let differs = |x: u16| prev.get(x, y) != next.get(x, y);
    let w = next.width();

    let mut open: Option<(u16, u16)> = None;
    for x in (0..w).filter(|&x| differs(x)) {
        open = match open {
            Some((start, end)) if x - end <= merge_gap => Some((start, x + 1)),
            Some((start, end)) => {
                f(start, end - start)?;
                Some((x, x + 1))
            }
            None => Some((x, x + 1)),
        };
    }
    if let Some((start, end)) = open {
        f(start, end - start)?;
    }
    Ok(())
}
