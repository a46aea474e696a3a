#![warn(clippy::complexity)]
#![warn(clippy::correctness)]
#![warn(clippy::perf)]
#![warn(clippy::style)]
#![warn(clippy::suspicious)]
#![warn(clippy::print_stdout)]
#![warn(clippy::print_stderr)]
// #![warn(clippy::pedantic)]
// #![warn(clippy::unwrap_used)]

//! Synchronized 2D views into stacks of N-dimensional arrays.
//!
//! Arrays are registered in an [EntryCollection], their dimensions are named
//! by an [AxisOrder] and an [ImageStack] keeps one cursor per tracked axis,
//! handing the resulting frames to a [ViewSink].

pub mod axis;
pub mod config;
pub mod cursor;
pub mod entry;
pub mod error;
pub mod grid;
pub mod indexer;
pub mod sink;
pub mod slice;
pub mod stack;

pub use axis::{default_axis_order, AxesOrderSpec, AxisLabel, AxisOrder, AxisOrderResolver};
pub use config::StackConfig;
pub use cursor::{CursorRegistry, CursorState, TrackedAxis};
pub use entry::{ArrayEntry, EntryCollection, EntryId};
pub use error::Error;
pub use grid::GridShape;
pub use indexer::{DimensionIndexer, DimensionRef};
pub use sink::{FrameRecorder, NoopSink, ViewSink};
pub use slice::SliceExtractor;
pub use stack::{FrameApply, FrameFn, ImageStack};
