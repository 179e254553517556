//! `P5` header parsing.
//!
//! ```text
//! P5 <ws> width <ws> height <ws> maxval <single ws byte> raster...
//! ```
//!
//! `<ws>` is any run of ASCII whitespace and `#` comments (which run to the
//! end of the line).

use std::io::{ErrorKind, Read};

use relax_core::CodecError;

use crate::{MAGIC, MAX_SAMPLE};

/// Parsed header of a binary graymap.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PgmHeader {
    /// Columns.
    pub width: usize,
    /// Rows.
    pub height: usize,
    /// Largest sample value, `1..=255`.
    pub maxval: u16,
}

impl PgmHeader {
    /// Number of samples in the raster.
    pub fn sample_count(&self) -> usize {
        self.width * self.height
    }
}

/// Read and validate a header, leaving `r` positioned at the first raster
/// byte.
pub fn read_header(r: &mut dyn Read) -> Result<PgmHeader, CodecError> {
    let mut magic = [0u8; 2];
    r.read_exact(&mut magic).map_err(|e| eof_as_header(e, "missing magic number"))?;
    if &magic != MAGIC {
        return Err(if magic[0] == b'P' && magic[1].is_ascii_digit() {
            CodecError::Unsupported {
                reason: format!("netpbm variant P{} (only P5 is read)", magic[1] as char),
            }
        } else {
            CodecError::InvalidHeader {
                reason: "not a PGM file".into(),
            }
        });
    }

    let mut tokens = Tokens { r };
    let width = tokens.number("width")?;
    let height = tokens.number("height")?;
    let maxval = tokens.number("maxval")?;

    if width == 0 || height == 0 {
        return Err(CodecError::InvalidHeader {
            reason: format!("empty image {width}x{height}"),
        });
    }
    if width.checked_mul(height).is_none() {
        return Err(CodecError::InvalidHeader {
            reason: format!("image {width}x{height} is too large"),
        });
    }
    if maxval == 0 {
        return Err(CodecError::InvalidHeader {
            reason: "maxval must be positive".into(),
        });
    }
    if maxval > usize::from(MAX_SAMPLE) {
        return Err(CodecError::Unsupported {
            reason: format!("maxval {maxval} needs two bytes per sample"),
        });
    }

    Ok(PgmHeader {
        width,
        height,
        maxval: maxval as u16,
    })
}

/// Byte-at-a-time tokenizer over the header.
///
/// Reads one byte past each number; that byte must be whitespace (or the
/// start of a comment, except after `maxval`).
struct Tokens<'a> {
    r: &'a mut dyn Read,
}

impl Tokens<'_> {
    fn byte(&mut self, what: &str) -> Result<u8, CodecError> {
        let mut b = [0u8; 1];
        self.r
            .read_exact(&mut b)
            .map_err(|e| eof_as_header(e, &format!("header ends before {what}")))?;
        Ok(b[0])
    }

    fn skip_comment(&mut self, what: &str) -> Result<(), CodecError> {
        while self.byte(what)? != b'\n' {}
        Ok(())
    }

    fn number(&mut self, what: &'static str) -> Result<usize, CodecError> {
        let mut b = self.byte(what)?;
        loop {
            match b {
                b'#' => self.skip_comment(what)?,
                b if b.is_ascii_whitespace() => {}
                _ => break,
            }
            b = self.byte(what)?;
        }

        let mut value: usize = 0;
        let mut digits = 0;
        while b.is_ascii_digit() {
            value = value
                .checked_mul(10)
                .and_then(|v| v.checked_add(usize::from(b - b'0')))
                .ok_or_else(|| CodecError::InvalidHeader {
                    reason: format!("{what} overflows"),
                })?;
            digits += 1;
            b = self.byte(what)?;
        }
        if digits == 0 {
            return Err(CodecError::InvalidHeader {
                reason: format!("expected {what}, found byte 0x{b:02x}"),
            });
        }

        match b {
            b if b.is_ascii_whitespace() => Ok(value),
            b'#' if what != "maxval" => {
                self.skip_comment(what)?;
                Ok(value)
            }
            _ => Err(CodecError::InvalidHeader {
                reason: format!("{what} is not followed by whitespace"),
            }),
        }
    }
}

fn eof_as_header(e: std::io::Error, reason: &str) -> CodecError {
    if e.kind() == ErrorKind::UnexpectedEof {
        CodecError::InvalidHeader {
            reason: reason.to_string(),
        }
    } else {
        CodecError::Io(e)
    }
}
