//! Speech channel - terminal stand-in for a speech synthesizer

use anyhow::{Context, Result};
use std::io::{self, Stdout, Write};
use std::sync::Mutex;
use tracing::debug;

use crate::live::channel::OutputChannel;

/// Writes each utterance on its own line
pub struct SpeechChannel<W: Write + Send = Stdout> {
    writer: Mutex<W>,
}

impl SpeechChannel<Stdout> {
    pub fn stdout() -> Self {
        Self::with_writer(io::stdout())
    }
}

impl<W: Write + Send> SpeechChannel<W> {
    pub fn with_writer(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    pub fn into_writer(self) -> W {
        self.writer.into_inner().unwrap_or_else(|e| e.into_inner())
    }
}

impl<W: Write + Send> OutputChannel for SpeechChannel<W> {
    fn name(&self) -> &str {
        "speech"
    }

    fn present(&self, text: &str) -> Result<()> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|_| anyhow::anyhow!("speech writer poisoned"))?;
        writeln!(writer, "🔊 {}", text).context("Failed to write speech output")?;
        writer.flush()?;
        debug!(channel = "speech", chars = text.chars().count(), "Presented");
        Ok(())
    }
}
