use std::io::Write;

use anyhow::Context as _;

use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{StickyError, StickyResult};
use crate::sticky::state::{PlaceholderStyle, StickyState};

/// Configuration provided to a [`FrameSink`] before the first record.
#[derive(Clone, Debug, PartialEq)]
pub struct SinkConfig {
    /// Tick rate of the replay.
    pub fps: Fps,
    /// Sticky element names, in mount order.
    pub stickies: Vec<String>,
}

/// State of one sticky element after one tick.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FrameRecord {
    /// Tick that produced the state.
    pub frame: FrameIndex,
    /// Start of that tick, in seconds.
    pub time_secs: f64,
    /// Sticky element name.
    pub sticky: String,
    /// The element's state after the tick.
    pub state: StickyState,
    /// Placeholder style for that state.
    pub placeholder: PlaceholderStyle,
    /// Inline CSS of the content (`state.style` rendered).
    pub css: String,
}

/// Consumer of replay records.
///
/// Ordering contract: records arrive in non-decreasing `frame` order and, within a frame, in
/// sticky mount order.
pub trait FrameSink {
    /// Called once before any record is pushed.
    fn begin(&mut self, cfg: SinkConfig) -> StickyResult<()>;
    /// Push one record.
    fn push_frame(&mut self, record: &FrameRecord) -> StickyResult<()>;
    /// Called once after the last record.
    fn end(&mut self) -> StickyResult<()>;
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    records: Vec<FrameRecord>,
}

impl InMemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// The configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<&SinkConfig> {
        self.cfg.as_ref()
    }

    /// Captured records in arrival order.
    pub fn records(&self) -> &[FrameRecord] {
        &self.records
    }

    /// Records of one sticky element.
    pub fn records_for<'a>(&'a self, sticky: &'a str) -> impl Iterator<Item = &'a FrameRecord> {
        self.records.iter().filter(move |r| r.sticky == sticky)
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> StickyResult<()> {
        self.cfg = Some(cfg);
        self.records.clear();
        Ok(())
    }

    fn push_frame(&mut self, record: &FrameRecord) -> StickyResult<()> {
        self.records.push(record.clone());
        Ok(())
    }

    fn end(&mut self) -> StickyResult<()> {
        Ok(())
    }
}

/// Writes one JSON object per record, newline separated.
#[derive(Debug)]
pub struct JsonLinesSink<W: Write> {
    out: W,
    written: u64,
}

impl<W: Write> JsonLinesSink<W> {
    /// Wrap a writer. Buffering is the caller's choice.
    pub fn new(out: W) -> Self {
        Self { out, written: 0 }
    }

    /// Number of records written so far.
    pub fn written(&self) -> u64 {
        self.written
    }

    /// Recover the writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> FrameSink for JsonLinesSink<W> {
    fn begin(&mut self, _cfg: SinkConfig) -> StickyResult<()> {
        self.written = 0;
        Ok(())
    }

    fn push_frame(&mut self, record: &FrameRecord) -> StickyResult<()> {
        serde_json::to_writer(&mut self.out, record)
            .map_err(|e| StickyError::serde(format!("encode frame record: {e}")))?;
        self.out.write_all(b"\n").context("write frame record")?;
        self.written += 1;
        Ok(())
    }

    fn end(&mut self) -> StickyResult<()> {
        self.out.flush().context("flush frame records")?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/replay/sink.rs"]
mod tests;
