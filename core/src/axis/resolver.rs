use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{default_axis_order, AxisOrder};
use crate::{
    entry::{EntryCollection, EntryId},
    error::Error,
};

/// How the caller describes the axes of the arrays.
///
/// Deserializes from either a plain string (`"tzxy"`) or a map of entry
/// index to string (`{"0": "tzxy", "1": "ztxy"}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AxesOrderSpec {
    /// The same order for every array.
    Uniform(String),
    /// Orders for specific arrays, the rest use the default order.
    PerEntry(BTreeMap<EntryId, String>),
}

impl From<&str> for AxesOrderSpec {
    fn from(order: &str) -> Self {
        AxesOrderSpec::Uniform(order.to_string())
    }
}

/// Validated axis orders for a whole collection.
#[derive(Debug, Clone)]
pub struct AxisOrderResolver {
    ndim: usize,
    baseline: AxisOrder,
    orders: Vec<AxisOrder>,
}

impl AxisOrderResolver {
    pub fn resolve<A>(
        entries: &EntryCollection<A>,
        spec: Option<&AxesOrderSpec>,
    ) -> Result<Self, Error> {
        let ndims = entries.ndims();
        let first_ndim = *ndims.first().ok_or(Error::EmptyCollection)?;

        // Each order is checked against its own array, so arrays of different
        // ndim surface as differing label sets below
        let orders = match spec {
            None => ndims
                .iter()
                .map(|&ndim| {
                    default_axis_order(ndim).ok_or(Error::UnsupportedDimensionality { ndim })
                })
                .collect::<Result<Vec<_>, _>>()?,
            Some(AxesOrderSpec::Uniform(order)) => ndims
                .iter()
                .map(|&ndim| parse_checked(order, ndim))
                .collect::<Result<Vec<_>, _>>()?,
            Some(AxesOrderSpec::PerEntry(map)) => {
                for id in map.keys() {
                    if !entries.contains(*id) {
                        return Err(Error::ArrayNotFound { entry: *id });
                    }
                }

                let mut orders = Vec::with_capacity(entries.len());
                for (id, &ndim) in entries.ids().zip(&ndims) {
                    let order = match map.get(&id) {
                        Some(order) => parse_checked(order, ndim)?,
                        None => default_axis_order(ndim)
                            .ok_or(Error::UnsupportedDimensionality { ndim })?,
                    };
                    orders.push(order);
                }
                orders
            }
        };

        let baseline = match (spec, default_axis_order(first_ndim)) {
            (Some(AxesOrderSpec::PerEntry(_)), Some(default)) => default,
            // Not empty, checked above
            _ => orders[0].clone(),
        };
        let ndim = baseline.len();

        let expected = baseline.label_set();
        for (id, order) in entries.ids().zip(&orders) {
            if order.label_set() != expected {
                return Err(Error::AxisSetMismatch {
                    entry: id,
                    found: order.to_string(),
                    expected: baseline.to_string(),
                });
            }
        }

        debug!(ndim, baseline = %baseline, "Resolved axis orders");

        Ok(Self {
            ndim,
            baseline,
            orders,
        })
    }

    pub fn ndim(&self) -> usize {
        self.ndim
    }

    /// The order all other orders are checked against.
    pub fn baseline(&self) -> &AxisOrder {
        &self.baseline
    }

    pub fn orders(&self) -> &[AxisOrder] {
        &self.orders
    }

    /// True if every entry uses exactly the same order.
    pub fn is_uniform(&self) -> bool {
        self.orders.windows(2).all(|x| x[0] == x[1])
    }

    pub fn into_orders(self) -> Vec<AxisOrder> {
        self.orders
    }
}

fn parse_checked(order: &str, ndim: usize) -> Result<AxisOrder, Error> {
    let parsed: AxisOrder = order.parse()?;
    if parsed.len() != ndim {
        return Err(Error::AxisOrderLength {
            order: order.to_string(),
            ndim,
        });
    }
    Ok(parsed)
}
