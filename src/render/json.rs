//! JSON rendering of outlines and normalized blocks.

use std::io::Write;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::model::{DocumentOutline, TextBlock};

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Wrapper matching the `{"blocks": [...]}` dump layout.
#[derive(Serialize)]
struct BlockDump<'a> {
    blocks: &'a [TextBlock],
}

/// Convert an outline to `{"title": ..., "outline": [...]}`.
///
/// Non-ASCII text is written as-is, not escaped.
pub fn to_json(outline: &DocumentOutline, format: JsonFormat) -> Result<String> {
    serialize(outline, format)
}

/// Convert normalized blocks to `{"blocks": [...]}`.
pub fn blocks_to_json(blocks: &[TextBlock], format: JsonFormat) -> Result<String> {
    serialize(&BlockDump { blocks }, format)
}

/// Write an outline as UTF-8 JSON to any writer, then flush it.
///
/// Buffered writers are flushed here so a failed final write is reported
/// instead of being lost on drop.
pub fn write_json<W: Write>(
    outline: &DocumentOutline,
    format: JsonFormat,
    mut writer: W,
) -> Result<()> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_writer_pretty(&mut writer, outline),
        JsonFormat::Compact => serde_json::to_writer(&mut writer, outline),
    };
    result.map_err(|e| {
        if e.is_io() {
            Error::Io(e.into())
        } else {
            Error::Render(format!("JSON serialization error: {}", e))
        }
    })?;
    writer.flush()?;
    Ok(())
}

fn serialize<T: Serialize + ?Sized>(value: &T, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(value),
        JsonFormat::Compact => serde_json::to_string(value),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}
