use std::fmt;

use ndarray::ArrayView2;
use serde::Serialize;
use stack_view_core::{EntryId, ViewSink};
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FrameStats {
    pub min: f32,
    pub max: f32,
    pub mean: f32,
}

impl FrameStats {
    /// `None` for empty frames.
    pub fn new(frame: ArrayView2<'_, f32>) -> Option<Self> {
        let mut values = frame.iter().copied();
        let first = values.next()?;

        let (mut min, mut max, mut sum) = (first, first, first as f64);
        for value in values {
            min = min.min(value);
            max = max.max(value);
            sum += value as f64;
        }
        Some(Self {
            min,
            max,
            mean: (sum / frame.len() as f64) as f32,
        })
    }
}

/// What gets printed for every frame the stack emits.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameSummary {
    pub entry: EntryId,
    pub shape: [usize; 2],
    #[serde(flatten)]
    pub stats: Option<FrameStats>,
}

impl FrameSummary {
    pub fn new(entry: EntryId, frame: ArrayView2<'_, f32>) -> Self {
        let (rows, cols) = frame.dim();
        Self {
            entry,
            shape: [rows, cols],
            stats: FrameStats::new(frame),
        }
    }
}

impl fmt::Display for FrameSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}x{}", self.entry, self.shape[0], self.shape[1])?;
        match self.stats {
            Some(FrameStats { min, max, mean }) => {
                write!(f, " min={min} max={max} mean={mean}")
            }
            None => f.write_str(" empty"),
        }
    }
}

/// Prints a summary of every frame to stdout.
#[derive(Debug, Default)]
pub struct PrintSink {
    pub values: bool,
    pub json: bool,
    pub received: usize,
}

impl PrintSink {
    pub fn new(values: bool, json: bool) -> Self {
        Self {
            values,
            json,
            received: 0,
        }
    }
}

impl ViewSink<f32> for PrintSink {
    fn update_view(&mut self, id: EntryId, frame: ArrayView2<'_, f32>) {
        self.received += 1;
        let summary = FrameSummary::new(id, frame);

        if self.json {
            match serde_json::to_string(&summary) {
                Ok(line) => println!("{line}"),
                Err(err) => warn!(%err, entry = %id, "Failed to serialize frame summary"),
            }
        } else {
            println!("{summary}");
        }
        if self.values {
            println!("{frame}");
        }
    }
}
