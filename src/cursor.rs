use crate::config::Configuration;
use crate::error::{ErrorKind, InfoError};
use std::io::Read;

/// Sentinel held as the current byte once the source is exhausted.
pub const EOF: u8 = 0;

/// UTF-8 byte order mark, dropped when it opens the stream.
const BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// Bytes that can start or continue a token. Anything below `!` is spacing or control.
#[inline]
pub fn is_printable(b: u8) -> bool {
    b > b' '
}

/// Closing delimiters of element parameters and parenthesized groups.
#[inline]
pub fn is_terminator(b: u8) -> bool {
    b == b']' || b == b')'
}

/// A byte-at-a-time reader over any [`Read`] source.
///
/// Input is pulled through a fixed buffer and every byte consumed is charged
/// against the configured read budget. The cursor also owns the scratch
/// buffer that token parsers accumulate into; text leaves the cursor only as
/// owned `String`s.
pub struct Cursor<R> {
    source: R,
    buffer: Vec<u8>,
    pos: usize,
    len: usize,
    chr: u8,
    eof: bool,
    started: bool,
    line: usize,
    column: usize,
    budget: usize,
    limit_mb: usize,
    scratch: Vec<u8>,
    scratch_limit: usize,
}

impl<R> Cursor<R> {
    #[inline]
    pub fn chr(&self) -> u8 {
        self.chr
    }

    #[inline]
    pub fn is_eof(&self) -> bool {
        self.eof
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn column(&self) -> usize {
        self.column
    }

    /// Builds an error located at the current byte.
    pub fn error(&self, kind: ErrorKind) -> InfoError {
        InfoError::new(kind, self.line, self.column)
    }

    // === Scratch buffer ===

    pub fn clear_scratch(&mut self) {
        self.scratch.clear();
    }

    pub fn push(&mut self, b: u8) -> Result<(), InfoError> {
        if self.scratch.len() >= self.scratch_limit {
            return Err(self.error(ErrorKind::TokenTooLong {
                limit: self.scratch_limit,
            }));
        }
        self.scratch.push(b);
        Ok(())
    }

    /// Appends the current byte to the scratch buffer.
    pub fn push_chr(&mut self) -> Result<(), InfoError> {
        self.push(self.chr)
    }

    pub fn prepend(&mut self, b: u8) -> Result<(), InfoError> {
        self.push(b)?;
        self.scratch.rotate_right(1);
        Ok(())
    }

    pub fn scratch(&self) -> &[u8] {
        &self.scratch
    }

    pub fn scratch_text(&self) -> String {
        String::from_utf8_lossy(&self.scratch).into_owned()
    }
}

impl<R: Read> Cursor<R> {
    pub fn new(source: R, config: &Configuration) -> Self {
        Self {
            source,
            buffer: vec![0; config.buffer_size],
            pos: 0,
            len: 0,
            chr: EOF,
            eof: false,
            started: false,
            line: 1,
            column: 0,
            budget: config.read_limit_bytes(),
            limit_mb: config.read_limit_mb,
            scratch: Vec::with_capacity(config.builder_initial),
            scratch_limit: config.builder_size,
        }
    }

    /// Advances one byte. Returns `false` once the source is exhausted, after
    /// which the current byte is [`EOF`].
    pub fn next(&mut self) -> Result<bool, InfoError> {
        if self.eof {
            return Ok(false);
        }

        if self.pos >= self.len {
            self.refill()?;

            if self.len == 0 {
                self.eof = true;
                self.chr = EOF;
                return Ok(false);
            }
        }

        if self.budget == 0 {
            return Err(self.error(ErrorKind::ReadLimitExceeded {
                limit_mb: self.limit_mb,
            }));
        }
        self.budget -= 1;

        if self.chr == b'\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }

        self.chr = self.buffer[self.pos];
        self.pos += 1;

        Ok(true)
    }

    fn refill(&mut self) -> Result<(), InfoError> {
        self.len = self.fill()?;
        self.pos = 0;

        if !self.started {
            self.started = true;
            if self.buffer[..self.len].starts_with(&BOM) {
                self.pos = BOM.len();
                if self.pos == self.len {
                    self.len = self.fill()?;
                    self.pos = 0;
                }
            }
        }
        Ok(())
    }

    fn fill(&mut self) -> Result<usize, InfoError> {
        loop {
            match self.source.read(&mut self.buffer) {
                Ok(n) => return Ok(n),
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    return Err(self.error(ErrorKind::Io {
                        message: e.to_string(),
                    }))
                }
            }
        }
    }

    /// Advances one byte where the document cannot legally end.
    pub fn expect(&mut self) -> Result<(), InfoError> {
        if self.next()? {
            Ok(())
        } else {
            Err(self.error(ErrorKind::UnexpectedEof))
        }
    }

    /// Consumes the current byte unless it is `b`.
    pub fn skip_unless(&mut self, b: u8) -> Result<(), InfoError> {
        if self.chr != b {
            self.next()?;
        }
        Ok(())
    }

    /// Moves to the newline ending the current line, without consuming it.
    pub fn skip_line(&mut self) -> Result<(), InfoError> {
        while self.chr != b'\n' && self.next()? {}
        Ok(())
    }

    /// Skips spacing and control bytes, stopping at a newline.
    pub fn skip_spacing(&mut self) -> Result<(), InfoError> {
        while !is_printable(self.chr) {
            if self.chr == b'\n' || !self.next()? {
                break;
            }
        }
        Ok(())
    }

    /// Moves to the first printable byte of the next content line and returns
    /// that line's indentation depth, or `-1` at end of file.
    ///
    /// A tab is one level and four spaces are one level; a shorter run of
    /// spaces is dropped when a tab or newline follows it. Lines starting with
    /// `#` are comments and are skipped whole. Any other control byte ends the
    /// scan so the caller can reject it.
    pub fn next_content_line(&mut self) -> Result<i32, InfoError> {
        let mut depth = 0;
        let mut spaces = 0;

        while self.next()? {
            match self.chr {
                b'#' => {
                    self.skip_line()?;
                    depth = 0;
                    spaces = 0;
                }
                b if is_printable(b) => break,
                b' ' => {
                    spaces += 1;
                    if spaces == 4 {
                        depth += 1;
                        spaces = 0;
                    }
                }
                b'\t' => {
                    depth += 1;
                    spaces = 0;
                }
                b'\n' => {
                    depth = 0;
                    spaces = 0;
                }
                b'\r' => {}
                _ => break,
            }
        }

        Ok(if self.eof { -1 } else { depth })
    }
}
