use derive_more::Constructor;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Layout of the frames of a stack, for the renderer to place its views.
#[derive(Constructor, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridShape {
    pub rows: usize,
    pub cols: usize,
}

impl GridShape {
    /// Roughly square grid for `count` frames, rows first.
    pub fn for_count(count: usize) -> Self {
        let sr = (count as f64).sqrt();
        Self {
            rows: sr.ceil() as usize,
            cols: sr.round() as usize,
        }
    }

    /// Saturates at `usize::MAX`.
    pub fn cells(&self) -> usize {
        self.rows.saturating_mul(self.cols)
    }

    /// `requested` if it has room for `count` frames, otherwise [for_count](Self::for_count).
    pub fn fitting(requested: Option<GridShape>, count: usize) -> Self {
        match requested {
            Some(shape) if shape.cells() >= count => shape,
            Some(shape) => {
                let fallback = Self::for_count(count);
                warn!(
                    ?shape,
                    count,
                    ?fallback,
                    "Grid shape too small for the number of arrays, using computed shape"
                );
                fallback
            }
            None => Self::for_count(count),
        }
    }
}

impl From<(usize, usize)> for GridShape {
    fn from((rows, cols): (usize, usize)) -> Self {
        GridShape { rows, cols }
    }
}
