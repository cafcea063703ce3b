//! Image export of a finished transformation
//!
//! [`PngExporter`] draws the output text onto a white card and encodes it as
//! PNG. Export is only offered once the reveal has completed; see
//! [`export_completed`].

use std::io::Cursor;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use font8x8::{UnicodeFonts, BASIC_FONTS, LATIN_FONTS};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};

use crate::error::ExportError;
use crate::reveal::RevealSnapshot;

/// Canvas width in pixels
pub const CARD_WIDTH: u32 = 600;

/// Space between the card edge and the text
pub const CARD_PADDING: u32 = 32;

const GLYPH_SIZE: u32 = 8;
const GLYPH_SCALE: u32 = 2;
const LINE_GAP: u32 = 8;
const CELL: u32 = GLYPH_SIZE * GLYPH_SCALE;
const LINE_HEIGHT: u32 = CELL + LINE_GAP;

const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);
const INK: Rgba<u8> = Rgba([33, 37, 41, 255]);
const SIGNATURE_INK: Rgba<u8> = Rgba([90, 90, 110, 255]);

/// A rendered text block handed to an exporter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBlock {
    pub text: String,
    /// Persona signature drawn under the text
    pub signature: Option<String>,
}

impl TextBlock {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            signature: None,
        }
    }

    pub fn with_signature(mut self, signature: impl Into<String>) -> Self {
        self.signature = Some(signature.into());
        self
    }
}

/// Turns a text block into image bytes
pub trait ExportAdapter: Send + Sync {
    fn capture(&self, block: &TextBlock) -> Result<Vec<u8>, ExportError>;

    /// File extension for produced images (without the dot)
    fn extension(&self) -> &str {
        "png"
    }
}

/// Bitmap-font PNG renderer
#[derive(Debug, Clone, Copy, Default)]
pub struct PngExporter;

impl PngExporter {
    pub fn new() -> Self {
        Self
    }

    fn columns() -> usize {
        ((CARD_WIDTH - 2 * CARD_PADDING) / CELL) as usize
    }
}

impl ExportAdapter for PngExporter {
    fn capture(&self, block: &TextBlock) -> Result<Vec<u8>, ExportError> {
        let columns = Self::columns();
        let body = wrap_text(&block.text, columns);
        let signature = block
            .signature
            .as_deref()
            .map(|s| format!("- {}", s.trim()))
            .filter(|s| s.len() > 2);

        let mut line_count = body.len() as u32;
        if signature.is_some() {
            line_count += 2;
        }
        let height = 2 * CARD_PADDING + line_count.max(1) * LINE_HEIGHT - LINE_GAP;

        let mut img = RgbaImage::from_pixel(CARD_WIDTH, height, BACKGROUND);

        for (row, line) in body.iter().enumerate() {
            let y = CARD_PADDING + row as u32 * LINE_HEIGHT;
            draw_line(&mut img, line, CARD_PADDING, y, INK);
        }

        if let Some(signature) = signature {
            let row = body.len() as u32 + 1;
            let y = CARD_PADDING + row * LINE_HEIGHT;
            let chars = signature.chars().count().min(columns) as u32;
            let x = CARD_WIDTH - CARD_PADDING - chars * CELL;
            draw_line(&mut img, &signature, x, y, SIGNATURE_INK);
        }

        let mut bytes = Vec::new();
        DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .map_err(|e| ExportError::Encode(e.to_string()))?;

        tracing::debug!(bytes = bytes.len(), height, "Rendered export image");
        Ok(bytes)
    }
}

/// Break `text` into lines of at most `columns` chars
///
/// Wraps at whitespace, splits words longer than a line, and keeps blank
/// lines from the source.
fn wrap_text(text: &str, columns: usize) -> Vec<String> {
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut current = String::new();
        let mut current_len = 0;

        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();

            while word.len() > columns {
                if current_len > 0 {
                    lines.push(std::mem::take(&mut current));
                    current_len = 0;
                }
                let rest = word.split_off(columns);
                lines.push(word.into_iter().collect());
                word = rest;
            }

            let needed = if current_len == 0 {
                word.len()
            } else {
                current_len + 1 + word.len()
            };
            if needed > columns {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            if current_len > 0 {
                current.push(' ');
                current_len += 1;
            }
            current.extend(word.iter());
            current_len += word.len();
        }

        lines.push(current);
    }

    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines
}

fn glyph(c: char) -> [u8; 8] {
    BASIC_FONTS
        .get(c)
        .or_else(|| LATIN_FONTS.get(c))
        .or_else(|| BASIC_FONTS.get('?'))
        .unwrap_or([0; 8])
}

fn draw_line(img: &mut RgbaImage, line: &str, x: u32, y: u32, color: Rgba<u8>) {
    for (i, c) in line.chars().enumerate() {
        let origin_x = x + i as u32 * CELL;
        if origin_x + CELL > img.width() {
            break;
        }
        for (row, bits) in glyph(c).iter().enumerate() {
            for col in 0..GLYPH_SIZE {
                if bits & (1 << col) == 0 {
                    continue;
                }
                let px = origin_x + col * GLYPH_SCALE;
                let py = y + row as u32 * GLYPH_SCALE;
                for dy in 0..GLYPH_SCALE {
                    for dx in 0..GLYPH_SCALE {
                        if px + dx < img.width() && py + dy < img.height() {
                            img.put_pixel(px + dx, py + dy, color);
                        }
                    }
                }
            }
        }
    }
}

/// Capture the revealed output, refusing anything but a completed reveal
pub fn export_completed(
    adapter: &dyn ExportAdapter,
    snapshot: &RevealSnapshot,
    signature: Option<&str>,
) -> Result<Vec<u8>, ExportError> {
    if !snapshot.is_completed() {
        return Err(ExportError::NotReady);
    }
    if snapshot.revealed_text.trim().is_empty() {
        return Err(ExportError::Empty);
    }

    let mut block = TextBlock::new(snapshot.revealed_text.clone());
    if let Some(signature) = signature {
        block = block.with_signature(signature);
    }
    adapter.capture(&block)
}

/// File name for an exported transformation
///
/// First five words of the text, lowercased and slugged, plus a timestamp.
pub fn export_filename(text: &str, timestamp: NaiveDateTime) -> String {
    let words: Vec<String> = text
        .split_whitespace()
        .map(|w| {
            w.chars()
                .filter(|c| c.is_ascii_alphanumeric())
                .collect::<String>()
                .to_ascii_lowercase()
        })
        .filter(|w| !w.is_empty())
        .take(5)
        .collect();

    let stem = if words.is_empty() {
        "transformation".to_string()
    } else {
        words.join("-")
    };

    format!("{}-{}.png", stem, timestamp.format("%Y%m%d-%H%M%S"))
}

/// Write `bytes` to `dir/filename`, creating `dir` if needed
pub fn save_export(dir: &Path, filename: &str, bytes: &[u8]) -> Result<PathBuf, ExportError> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(filename);
    std::fs::write(&path, bytes)?;
    tracing::info!("Saved export to {}", path.display());
    Ok(path)
}
