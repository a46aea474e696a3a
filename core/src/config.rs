use serde::{Deserialize, Serialize};

use crate::{axis::AxesOrderSpec, grid::GridShape, indexer::DimensionRef};

/// Everything an [ImageStack](crate::stack::ImageStack) needs besides its data.
///
/// ```json
/// {
///     "axes_order": { "0": "tzxy", "1": "ztxy" },
///     "slider_axes": ["t", "z"],
///     "grid_shape": { "rows": 1, "cols": 2 }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StackConfig {
    /// `None` derives the order from the number of dimensions.
    pub axes_order: Option<AxesOrderSpec>,
    /// Axes that get a cursor. `None` tracks time, if the data has a time axis.
    pub slider_axes: Option<Vec<DimensionRef>>,
    pub grid_shape: Option<GridShape>,
}

impl StackConfig {
    pub fn with_axes_order(mut self, axes_order: impl Into<AxesOrderSpec>) -> Self {
        self.axes_order = Some(axes_order.into());
        self
    }

    pub fn with_slider_axes<D: Into<DimensionRef>>(
        mut self,
        axes: impl IntoIterator<Item = D>,
    ) -> Self {
        self.slider_axes = Some(axes.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_grid_shape(mut self, grid_shape: impl Into<GridShape>) -> Self {
        self.grid_shape = Some(grid_shape.into());
        self
    }
}
