use ndarray::{ArrayView2, Axis, Ix2};

use crate::{
    axis::AxisLabel,
    cursor::CursorState,
    entry::{ArrayEntry, EntryId},
    error::Error,
    indexer::{resolve_in, DimensionIndexer, DimensionRef},
};

/// Produces 2D views of entries at a given cursor position.
#[derive(Debug)]
pub struct SliceExtractor<'a, A> {
    indexer: DimensionIndexer<'a, A>,
    display_axes: Option<[AxisLabel; 2]>,
}

impl<'a, A> SliceExtractor<'a, A> {
    pub fn new(entries: &'a [ArrayEntry<A>]) -> Self {
        Self {
            indexer: DimensionIndexer::new(entries),
            display_axes: None,
        }
    }

    /// Transposes frames whose remaining axes are `display_axes` reversed,
    /// so rows and columns mean the same for every entry.
    pub fn oriented(mut self, display_axes: [AxisLabel; 2]) -> Self {
        self.display_axes = Some(display_axes);
        self
    }

    /// The 2D view of entry `id` with every cursor axis reduced to its current index.
    pub fn extract(&self, id: EntryId, cursor: &CursorState) -> Result<ArrayView2<'a, A>, Error> {
        self.extract_with(id, cursor.selection())
    }

    /// Like [extract](Self::extract), but with dimensions given by label or position.
    ///
    /// ```text
    /// // shape [1000, 30, 512, 512], axis order "tzxy"
    /// extract_with(id, [('t'.into(), 100), ('z'.into(), 3)])  // [512, 512]
    /// extract_with(id, [(0.into(), 100), (1.into(), 3)])      // the same
    /// ```
    pub fn extract_with(
        &self,
        id: EntryId,
        selection: impl IntoIterator<Item = (DimensionRef, usize)>,
    ) -> Result<ArrayView2<'a, A>, Error> {
        let entry = self.indexer.entry(id)?;
        let (frame, [first, second]) = extract_2d(entry, selection)?;

        let labels = entry.axis_order().labels();
        match self.display_axes {
            Some([rows, cols]) if labels[first] == cols && labels[second] == rows => {
                Ok(frame.reversed_axes())
            }
            _ => Ok(frame),
        }
    }
}

/// The frame together with the positions of its two axes in `entry`.
fn extract_2d<'a, A>(
    entry: &'a ArrayEntry<A>,
    selection: impl IntoIterator<Item = (DimensionRef, usize)>,
) -> Result<(ArrayView2<'a, A>, [usize; 2]), Error> {
    let mut reduced: Vec<Option<usize>> = vec![None; entry.ndim()];

    for (dim, index) in selection {
        let pos = match resolve_in(entry, dim) {
            Ok(pos) => pos,
            // Entries without this axis are unaffected by its cursor
            Err(Error::UnknownAxisLabel { .. }) => continue,
            Err(err) => return Err(err),
        };
        let len = entry.shape()[pos];
        if index >= len {
            return Err(Error::IndexOutOfRange {
                axis: dim.to_string(),
                value: index,
                max: len.saturating_sub(1),
            });
        }
        reduced[pos] = Some(index);
    }

    let kept: Vec<usize> = (0..reduced.len()).filter(|x| reduced[*x].is_none()).collect();
    let ndim = kept.len();
    let kept = match kept.as_slice() {
        [first, second] => [*first, *second],
        _ => {
            return Err(Error::DimensionalityError {
                entry: entry.id(),
                ndim,
            })
        }
    };

    let mut view = entry.data().view();
    // Back to front, so positions of the remaining axes don't shift
    for (pos, index) in reduced.iter().enumerate().rev() {
        if let Some(index) = index {
            view = view.index_axis_move(Axis(pos), *index);
        }
    }

    let frame = view
        .into_dimensionality::<Ix2>()
        .map_err(|_| Error::DimensionalityError {
            entry: entry.id(),
            ndim,
        })?;
    Ok((frame, kept))
}
