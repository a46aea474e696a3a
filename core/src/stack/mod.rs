
use std::{collections::BTreeMap, fmt};

use ndarray::{Array2, ArrayView2};
use tracing::{debug, instrument};

use crate::{
    axis::{AxisLabel, AxisOrder, AxisOrderResolver},
    config::StackConfig,
    cursor::{CursorRegistry, CursorState, TrackedAxis},
    entry::{ArrayEntry, EntryCollection, EntryId},
    error::Error,
    grid::GridShape,
    indexer::DimensionRef,
    slice::SliceExtractor,
    sink::ViewSink,
};

pub type FrameFn<A> = Box<dyn Fn(ArrayView2<'_, A>) -> Array2<A>>;

/// Transformation applied to frames before they are handed to the sink.
pub enum FrameApply<A> {
    All(FrameFn<A>),
    PerEntry(BTreeMap<EntryId, FrameFn<A>>),
}

impl<A> FrameApply<A> {
    pub fn all(f: impl Fn(ArrayView2<'_, A>) -> Array2<A> + 'static) -> Self {
        FrameApply::All(Box::new(f))
    }

    fn get(&self, id: EntryId) -> Option<&FrameFn<A>> {
        match self {
            FrameApply::All(f) => Some(f),
            FrameApply::PerEntry(map) => map.get(&id),
        }
    }
}

impl<A> fmt::Debug for FrameApply<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameApply::All(_) => f.write_str("FrameApply::All"),
            FrameApply::PerEntry(map) => f
                .debug_tuple("FrameApply::PerEntry")
                .field(&map.keys().collect::<Vec<_>>())
                .finish(),
        }
    }
}

/// A grid of N-dimensional arrays, viewed one 2D frame at a time.
///
/// Every tracked axis has a cursor shared by all arrays. Moving a cursor
/// recomputes the frame of every array and hands it to the [ViewSink].
/// The last two axes of the baseline order are displayed, any other axis
/// without a cursor stays at index 0. Frames of entries that store the
/// display axes the other way around are transposed to match.
pub struct ImageStack<A, S> {
    entries: Vec<ArrayEntry<A>>,
    registry: CursorRegistry,
    baseline: AxisOrder,
    display_axes: [AxisLabel; 2],
    pinned: Vec<AxisLabel>,
    grid_shape: GridShape,
    frame_apply: Option<FrameApply<A>>,
    sink: S,
}

impl<A, S: ViewSink<A>> ImageStack<A, S> {
    /// Validates the arrays against `config` and emits the initial frames.
    #[instrument(skip_all, fields(arrays = collection.len()))]
    pub fn new(
        collection: EntryCollection<A>,
        config: StackConfig,
        sink: S,
    ) -> Result<Self, Error> {
        let resolved = AxisOrderResolver::resolve(&collection, config.axes_order.as_ref())?;
        let baseline = resolved.baseline().clone();
        let display_axes = baseline
            .display_axes()
            .ok_or(Error::UnsupportedDimensionality {
                ndim: resolved.ndim(),
            })?;
        let slider_axes = slider_labels(&collection, &resolved, config.slider_axes.as_deref())?;

        let grid_shape = GridShape::fitting(config.grid_shape, collection.len());
        let entries = collection.into_entries(resolved.into_orders());

        let mut registry = CursorRegistry::new();
        for label in slider_axes {
            registry.track(label, &entries)?;
        }

        let pinned = baseline
            .labels()
            .iter()
            .copied()
            .filter(|x| !display_axes.contains(x) && !registry.is_tracked(*x))
            .collect();

        let mut stack = Self {
            entries,
            registry,
            baseline,
            display_axes,
            pinned,
            grid_shape,
            frame_apply: None,
            sink,
        };
        debug!(
            baseline = %stack.baseline,
            pinned = ?stack.pinned,
            grid_shape = ?stack.grid_shape,
            "Created image stack"
        );

        stack.refresh()?;
        Ok(stack)
    }

    /// Moves the cursor of `label` and emits the new frame of every array.
    ///
    /// Returns the arrays that have the axis `label`. Fails without changing
    /// the cursor if `value` exceeds [max_index](Self::max_index).
    pub fn set_index(
        &mut self,
        label: impl Into<AxisLabel>,
        value: usize,
    ) -> Result<Vec<EntryId>, Error> {
        let label = label.into();
        let candidate = self.registry.preview(label, value)?;
        let frames = frames_at(&self.entries, self.display_axes, &self.pinned, &candidate)?;

        let affected = self.registry.set_index(label, value, &self.entries)?;
        emit(&mut self.sink, self.frame_apply.as_ref(), frames);

        Ok(affected)
    }

    /// Emits the frames of all arrays at the current cursor again.
    pub fn refresh(&mut self) -> Result<(), Error> {
        let frames = frames_at(
            &self.entries,
            self.display_axes,
            &self.pinned,
            self.registry.state(),
        )?;
        emit(&mut self.sink, self.frame_apply.as_ref(), frames);
        Ok(())
    }

    /// Sets the transformation for future frames and emits the current ones transformed.
    pub fn set_frame_apply(&mut self, frame_apply: Option<FrameApply<A>>) -> Result<(), Error> {
        if let Some(FrameApply::PerEntry(map)) = &frame_apply {
            for id in map.keys() {
                if !self.entries.iter().any(|x| x.id() == *id) {
                    return Err(Error::ArrayNotFound { entry: *id });
                }
            }
        }
        self.frame_apply = frame_apply;
        self.refresh()
    }
}

impl<A, S> ImageStack<A, S> {
    /// The current frame of `id`, without [FrameApply].
    ///
    /// Rows follow the first display axis and columns the second, whatever
    /// the axis order of the entry.
    pub fn frame(&self, id: EntryId) -> Result<ArrayView2<'_, A>, Error> {
        SliceExtractor::new(&self.entries)
            .oriented(self.display_axes)
            .extract_with(id, selection(self.registry.state(), &self.pinned))
    }

    pub fn max_index(&self, label: impl Into<AxisLabel>) -> Result<usize, Error> {
        self.registry.max_index(label.into())
    }

    pub fn current_index(&self, label: impl Into<AxisLabel>) -> Result<usize, Error> {
        self.registry.current_index(label.into())
    }

    pub fn cursor(&self) -> &CursorState {
        self.registry.state()
    }

    pub fn tracked(&self) -> impl Iterator<Item = TrackedAxis> + '_ {
        self.registry.tracked()
    }

    pub fn entries(&self) -> &[ArrayEntry<A>] {
        &self.entries
    }

    pub fn ids(&self) -> impl Iterator<Item = EntryId> + '_ {
        self.entries.iter().map(|x| x.id())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn baseline(&self) -> &AxisOrder {
        &self.baseline
    }

    pub fn display_axes(&self) -> [AxisLabel; 2] {
        self.display_axes
    }

    /// Axes held at index 0 because they are neither displayed nor tracked.
    pub fn pinned_axes(&self) -> &[AxisLabel] {
        &self.pinned
    }

    pub fn grid_shape(&self) -> GridShape {
        self.grid_shape
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}

impl<A, S> fmt::Debug for ImageStack<A, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageStack")
            .field("arrays", &self.entries.len())
            .field("baseline", &self.baseline)
            .field("cursor", self.registry.state())
            .field("pinned", &self.pinned)
            .field("grid_shape", &self.grid_shape)
            .field("frame_apply", &self.frame_apply)
            .finish_non_exhaustive()
    }
}

/// Resolves the configured slider axes to labels, defaulting to time.
fn slider_labels<A>(
    collection: &EntryCollection<A>,
    resolved: &AxisOrderResolver,
    axes: Option<&[DimensionRef]>,
) -> Result<Vec<AxisLabel>, Error> {
    let baseline = resolved.baseline();
    let axes = match axes {
        Some(axes) => axes,
        None if baseline.contains(AxisLabel::TIME) => return Ok(vec![AxisLabel::TIME]),
        None => return Ok(Vec::new()),
    };

    // Not empty, resolving the orders checks that
    let first = collection.ids().next().ok_or(Error::EmptyCollection)?;

    let mut labels = Vec::with_capacity(axes.len());
    for axis in axes {
        let label = match *axis {
            DimensionRef::Index(dim) => {
                if !resolved.is_uniform() {
                    return Err(Error::AmbiguousDimensionIndex { dim });
                }
                let order = &resolved.orders()[0];
                *order
                    .labels()
                    .get(dim)
                    .ok_or(Error::DimensionOutOfBounds {
                        entry: first,
                        dim,
                        ndim: order.len(),
                    })?
            }
            DimensionRef::Label(label) => {
                if !baseline.contains(label) {
                    return Err(Error::UnknownAxisLabel {
                        entry: first,
                        label,
                    });
                }
                label
            }
        };
        if !labels.contains(&label) {
            labels.push(label);
        }
    }
    Ok(labels)
}

fn selection<'a>(
    state: &'a CursorState,
    pinned: &'a [AxisLabel],
) -> impl Iterator<Item = (DimensionRef, usize)> + 'a {
    state
        .selection()
        .chain(pinned.iter().map(|x| (DimensionRef::Label(*x), 0)))
}

fn frames_at<'a, A>(
    entries: &'a [ArrayEntry<A>],
    display_axes: [AxisLabel; 2],
    pinned: &[AxisLabel],
    state: &CursorState,
) -> Result<Vec<(EntryId, ArrayView2<'a, A>)>, Error> {
    let extractor = SliceExtractor::new(entries).oriented(display_axes);
    entries
        .iter()
        .map(|entry| {
            extractor
                .extract_with(entry.id(), selection(state, pinned))
                .map(|frame| (entry.id(), frame))
        })
        .collect()
}

fn emit<A, S: ViewSink<A>>(
    sink: &mut S,
    frame_apply: Option<&FrameApply<A>>,
    frames: Vec<(EntryId, ArrayView2<'_, A>)>,
) {
    let count = frames.len();
    for (id, frame) in frames {
        match frame_apply.and_then(|x| x.get(id)) {
            Some(f) => sink.update_view(id, f(frame).view()),
            None => sink.update_view(id, frame),
        }
    }
    debug!(count, "Emitted frames");
}
