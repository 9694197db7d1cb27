//! OCR through the `tesseract` command-line tool.

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use crate::error::{Error, Result};
use crate::model::OcrData;

use super::{ImageData, OcrEngine};

/// TSV row level for individual words.
const WORD_LEVEL: &str = "5";

/// Runs `tesseract stdin stdout tsv` and parses the word table.
#[derive(Debug, Clone)]
pub struct TesseractEngine {
    binary: PathBuf,
    language: Option<String>,
}

impl TesseractEngine {
    /// Use `tesseract` from `PATH`.
    pub fn new() -> Self {
        Self {
            binary: PathBuf::from("tesseract"),
            language: None,
        }
    }

    /// Use a specific tesseract binary.
    pub fn with_binary(mut self, binary: impl Into<PathBuf>) -> Self {
        self.binary = binary.into();
        self
    }

    /// Set the recognition language (e.g., "eng+jpn").
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Check that the binary can be executed.
    pub fn is_available(&self) -> bool {
        Command::new(&self.binary)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.arg("stdin").arg("stdout");
        if let Some(ref lang) = self.language {
            cmd.arg("-l").arg(lang);
        }
        cmd.arg("tsv");
        cmd
    }
}

impl Default for TesseractEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl OcrEngine for TesseractEngine {
    fn name(&self) -> &str {
        "tesseract"
    }

    fn supports(&self, image: &ImageData) -> bool {
        image.format.is_encoded()
    }

    fn recognize(&self, image: &ImageData) -> Result<OcrData> {
        let mut child = self
            .command()
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| Error::Ocr(format!("failed to start {}: {}", self.binary.display(), e)))?;

        // tesseract reads the whole image before producing output. It may
        // exit early on a bad image, so the child is always reaped and its
        // exit status takes precedence over a broken pipe.
        let written = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(&image.data),
            None => Ok(()),
        };

        let output = child.wait_with_output()?;
        if !output.status.success() {
            return Err(Error::Ocr(format!(
                "tesseract exited with {} on image {}: {}",
                output.status,
                image.name,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        written?;

        parse_tsv(&String::from_utf8_lossy(&output.stdout))
    }
}

/// Parse tesseract's TSV output into word arrays.
///
/// Only word-level rows are kept. Rows are located by header name, so
/// column order does not matter.
pub fn parse_tsv(tsv: &str) -> Result<OcrData> {
    let mut lines = tsv.lines();
    let header: Vec<&str> = match lines.next() {
        Some(line) => line.split('\t').collect(),
        None => return Ok(OcrData::new()),
    };

    let column = |name: &str| {
        header
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| Error::Ocr(format!("TSV header is missing column '{}'", name)))
    };
    let level = header.iter().position(|h| h.trim() == "level");
    let left = column("left")?;
    let top = column("top")?;
    let height = column("height")?;
    let text = column("text")?;

    let mut data = OcrData::new();
    for line in lines {
        let fields: Vec<&str> = line.split('\t').collect();
        if let Some(level) = level {
            if fields.get(level).map(|l| l.trim()) != Some(WORD_LEVEL) {
                continue;
            }
        }

        let number = |index: usize| -> i32 {
            fields
                .get(index)
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(0)
        };
        data.push(
            fields.get(text).copied().unwrap_or(""),
            number(left),
            number(top),
            number(height),
        );
    }

    Ok(data)
}
