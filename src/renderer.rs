use crossterm::{queue, style::Print};
use log::debug;
use std::io::{stdout, BufWriter, Stdout, Write};

const ROW_TERMINATOR: char = '\n';

/// Writes quantized frames as text, one line per pixel row
pub struct Renderer<W: Write> {
    out: W,
    frames_rendered: u64,
}

impl Renderer<BufWriter<Stdout>> {
    /// Renderer writing to standard output
    pub fn stdout() -> Self {
        Self::new(BufWriter::new(stdout()))
    }
}

impl<W: Write> Renderer<W> {
    /// Create a renderer over any writer
    pub fn new(out: W) -> Self {
        Self { out, frames_rendered: 0 }
    }

    /// Render one frame.
    ///
    /// A newline follows every `width` characters, then the frame ends with
    /// two more newlines whether or not the last row was already closed, so
    /// a frame whose last pixel ends a row is followed by three newlines.
    pub fn render_frame<I>(&mut self, chars: I, width: u32) -> std::io::Result<()>
    where
        I: IntoIterator<Item = char>,
    {
        let width = width as usize;
        let mut written = 0usize;

        for (position, character) in chars.into_iter().enumerate() {
            queue!(self.out, Print(character))?;
            if width != 0 && (position + 1) % width == 0 {
                queue!(self.out, Print(ROW_TERMINATOR))?;
            }
            written = position + 1;
        }

        queue!(self.out, Print(ROW_TERMINATOR), Print(ROW_TERMINATOR))?;
        self.out.flush()?;

        self.frames_rendered += 1;
        debug!("Frame {} rendered: {} pixels, width {}", self.frames_rendered, written, width);
        Ok(())
    }

    /// Number of frames rendered so far
    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    /// Unwrap the underlying writer
    pub fn into_inner(self) -> W {
        self.out
    }
}
