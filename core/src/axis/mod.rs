mod resolver;

use std::{collections::BTreeSet, fmt, str::FromStr};

use derive_more::{Display, From};
use serde::{Deserialize, Serialize};

use crate::error::Error;

pub use resolver::{AxesOrderSpec, AxisOrderResolver};

/// A single semantic axis, e.g. `t` for time or `z` for the z-plane.
#[derive(
    Display, From, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct AxisLabel(char);

impl AxisLabel {
    pub const TIME: AxisLabel = AxisLabel('t');
    pub const Z: AxisLabel = AxisLabel('z');
    pub const X: AxisLabel = AxisLabel('x');
    pub const Y: AxisLabel = AxisLabel('y');

    pub const fn new(label: char) -> Self {
        Self(label)
    }

    pub fn as_char(self) -> char {
        self.0
    }
}

/// Positional meaning of every dimension of one array, e.g. `tzxy`.
///
/// Labels are unique within an order. Two orders describe the same axes if
/// their [label sets](AxisOrder::label_set) are equal, regardless of order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AxisOrder(Vec<AxisLabel>);

impl AxisOrder {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn labels(&self) -> &[AxisLabel] {
        &self.0
    }

    pub fn index_of(&self, label: AxisLabel) -> Option<usize> {
        self.0.iter().position(|x| *x == label)
    }

    pub fn contains(&self, label: AxisLabel) -> bool {
        self.0.contains(&label)
    }

    pub fn label_set(&self) -> BTreeSet<AxisLabel> {
        self.0.iter().copied().collect()
    }

    /// The last two labels, which stay full-range when slicing.
    pub fn display_axes(&self) -> Option<[AxisLabel; 2]> {
        match self.0.as_slice() {
            [.., a, b] => Some([*a, *b]),
            _ => None,
        }
    }
}

impl FromStr for AxisOrder {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut labels: Vec<AxisLabel> = Vec::with_capacity(s.len());
        for c in s.chars() {
            let label = AxisLabel(c);
            if labels.contains(&label) {
                return Err(Error::DuplicateAxisLabel {
                    order: s.to_string(),
                    label,
                });
            }
            labels.push(label);
        }
        Ok(Self(labels))
    }
}

impl fmt::Display for AxisOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for label in &self.0 {
            write!(f, "{label}")?;
        }
        Ok(())
    }
}

/// Axis order assumed for `ndim`-dimensional data when none is given.
pub fn default_axis_order(ndim: usize) -> Option<AxisOrder> {
    let order = match ndim {
        2 => "xy",
        3 => "txy",
        4 => "tzxy",
        // 5 => "tczxy",
        _ => return None,
    };
    order.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_orders() {
        assert_eq!(default_axis_order(2).unwrap().to_string(), "xy");
        assert_eq!(default_axis_order(3).unwrap().to_string(), "txy");
        assert_eq!(default_axis_order(4).unwrap().to_string(), "tzxy");
        assert!(default_axis_order(1).is_none());
        assert!(default_axis_order(5).is_none());
    }

    #[test]
    fn index_of_label() {
        let order: AxisOrder = "xyt".parse().unwrap();
        assert_eq!(order.index_of(AxisLabel::TIME), Some(2));
        assert_eq!(order.index_of(AxisLabel::X), Some(0));
        assert_eq!(order.index_of(AxisLabel::Z), None);
    }

    #[test]
    fn rejects_repeated_labels() {
        let err = "ttxy".parse::<AxisOrder>().unwrap_err();
        assert_eq!(
            err,
            Error::DuplicateAxisLabel {
                order: "ttxy".to_string(),
                label: AxisLabel::TIME,
            }
        );
    }

    #[test]
    fn display_axes_are_last_two() {
        let order: AxisOrder = "tzxy".parse().unwrap();
        assert_eq!(order.display_axes(), Some([AxisLabel::X, AxisLabel::Y]));
        let order: AxisOrder = "t".parse().unwrap();
        assert_eq!(order.display_axes(), None);
    }
}
