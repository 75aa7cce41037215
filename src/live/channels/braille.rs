//! Braille channel - renders to a fixed number of display cells

use anyhow::{Context, Result};
use std::io::{self, Stdout, Write};
use std::sync::Mutex;

use crate::live::channel::OutputChannel;

/// Default cell count of a refreshable display
pub const DEFAULT_CELLS: usize = 40;

pub struct BrailleChannel<W: Write + Send = Stdout> {
    cells: usize,
    writer: Mutex<W>,
}

impl BrailleChannel<Stdout> {
    pub fn stdout(cells: usize) -> Self {
        Self::with_writer(cells, io::stdout())
    }
}

impl<W: Write + Send> BrailleChannel<W> {
    pub fn with_writer(cells: usize, writer: W) -> Self {
        Self {
            cells: cells.max(1),
            writer: Mutex::new(writer),
        }
    }

    pub fn cells(&self) -> usize {
        self.cells
    }

    pub fn into_writer(self) -> W {
        self.writer.into_inner().unwrap_or_else(|e| e.into_inner())
    }
}

impl<W: Write + Send> OutputChannel for BrailleChannel<W> {
    fn name(&self) -> &str {
        "braille"
    }

    fn present(&self, text: &str) -> Result<()> {
        let line = fit_to_cells(text, self.cells);
        let mut writer = self
            .writer
            .lock()
            .map_err(|_| anyhow::anyhow!("braille writer poisoned"))?;
        writeln!(writer, "⠿ {}", line).context("Failed to write braille output")?;
        writer.flush()?;
        Ok(())
    }
}

/// Truncate to `cells` characters, marking the cut with "..."
fn fit_to_cells(text: &str, cells: usize) -> String {
    if text.chars().count() <= cells {
        return text.to_string();
    }
    let keep = cells.saturating_sub(3);
    let mut out: String = text.chars().take(keep).collect();
    out.push_str("...");
    out
}
