use miette::Diagnostic;
use thiserror::Error;

use crate::{axis::AxisLabel, entry::EntryId};

#[derive(Debug, Error, Diagnostic, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("No default axis order for {ndim}-dimensional data")]
    #[diagnostic(
        code(stack_view::unsupported_dimensionality),
        help("Pass an explicit axis order, defaults exist for 2, 3 and 4 dimensions")
    )]
    UnsupportedDimensionality { ndim: usize },

    #[error("Axis order '{found}' of entry {entry} does not describe the axes '{expected}'")]
    #[diagnostic(code(stack_view::axis_set_mismatch))]
    AxisSetMismatch {
        entry: EntryId,
        found: String,
        expected: String,
    },

    #[error(
        "Axis order '{order}' has {} axes, but the data has {ndim} dimensions",
        .order.chars().count()
    )]
    #[diagnostic(code(stack_view::axis_order_length))]
    AxisOrderLength { order: String, ndim: usize },

    #[error("Axis order '{order}' names axis '{label}' more than once")]
    #[diagnostic(code(stack_view::duplicate_axis_label))]
    DuplicateAxisLabel { order: String, label: AxisLabel },

    #[error("At least one array is required")]
    #[diagnostic(code(stack_view::empty_collection))]
    EmptyCollection,

    #[error("Axis '{label}' is not part of the axis order of entry {entry}")]
    #[diagnostic(code(stack_view::unknown_axis_label))]
    UnknownAxisLabel { entry: EntryId, label: AxisLabel },

    #[error("Axis '{label}' is not tracked")]
    #[diagnostic(code(stack_view::axis_not_tracked))]
    AxisNotTracked { label: AxisLabel },

    #[error("Axis '{label}' has length 0 in entry {entry}")]
    #[diagnostic(code(stack_view::empty_axis))]
    EmptyAxis { entry: EntryId, label: AxisLabel },

    #[error("Entry {entry} not found")]
    #[diagnostic(code(stack_view::array_not_found))]
    ArrayNotFound { entry: EntryId },

    #[error("Dimension {dim} out of bounds for {ndim}-dimensional entry {entry}")]
    #[diagnostic(code(stack_view::dimension_out_of_bounds))]
    DimensionOutOfBounds {
        entry: EntryId,
        dim: usize,
        ndim: usize,
    },

    #[error("Dimension {dim} is ambiguous, the arrays do not share one axis order")]
    #[diagnostic(
        code(stack_view::ambiguous_dimension_index),
        help("Refer to the axis by its label instead")
    )]
    AmbiguousDimensionIndex { dim: usize },

    #[error("Index {value} out of range for axis '{axis}' (max: {max})")]
    #[diagnostic(code(stack_view::index_out_of_range))]
    IndexOutOfRange {
        axis: String,
        value: usize,
        max: usize,
    },

    #[error("Slice of entry {entry} has {ndim} dimensions, expected 2")]
    #[diagnostic(code(stack_view::dimensionality))]
    DimensionalityError { entry: EntryId, ndim: usize },
}
