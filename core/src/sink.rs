//! Receivers for recomputed frames

use ndarray::{Array2, ArrayView2};

use crate::entry::EntryId;

/// Receives the frame of an entry whenever it has been recomputed.
///
/// This is where a renderer uploads the frame to its display surface.
pub trait ViewSink<A> {
    fn update_view(&mut self, id: EntryId, frame: ArrayView2<'_, A>);
}

impl<A, F> ViewSink<A> for F
where
    F: FnMut(EntryId, ArrayView2<'_, A>),
{
    fn update_view(&mut self, id: EntryId, frame: ArrayView2<'_, A>) {
        self(id, frame)
    }
}

/// Keeps a copy of every frame it receives, in order.
#[derive(Debug, Clone)]
pub struct FrameRecorder<A> {
    frames: Vec<(EntryId, Array2<A>)>,
}

impl<A> Default for FrameRecorder<A> {
    fn default() -> Self {
        Self { frames: Vec::new() }
    }
}

impl<A> FrameRecorder<A> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> &[(EntryId, Array2<A>)] {
        &self.frames
    }

    /// The most recent frame received for `id`.
    pub fn latest(&self, id: EntryId) -> Option<&Array2<A>> {
        self.frames
            .iter()
            .rev()
            .find(|(x, _)| *x == id)
            .map(|(_, frame)| frame)
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }
}

impl<A: Clone> ViewSink<A> for FrameRecorder<A> {
    fn update_view(&mut self, id: EntryId, frame: ArrayView2<'_, A>) {
        self.frames.push((id, frame.to_owned()));
    }
}

/// Discards all frames.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl<A> ViewSink<A> for NoopSink {
    fn update_view(&mut self, _id: EntryId, _frame: ArrayView2<'_, A>) {}
}
