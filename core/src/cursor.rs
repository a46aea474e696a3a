use std::collections::BTreeMap;

use tracing::debug;

use crate::{
    axis::AxisLabel,
    entry::{ArrayEntry, EntryId},
    error::Error,
    indexer::{resolve_in, DimensionRef},
};

/// Current index of every tracked axis.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CursorState {
    indices: BTreeMap<AxisLabel, usize>,
}

impl CursorState {
    pub fn get(&self, label: AxisLabel) -> Option<usize> {
        self.indices.get(&label).copied()
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (AxisLabel, usize)> + '_ {
        self.indices.iter().map(|(k, v)| (*k, *v))
    }

    /// The cursor as input for [SliceExtractor](crate::slice::SliceExtractor).
    pub fn selection(&self) -> impl Iterator<Item = (DimensionRef, usize)> + '_ {
        self.iter().map(|(k, v)| (DimensionRef::Label(k), v))
    }

    fn insert(&mut self, label: AxisLabel, index: usize) {
        self.indices.insert(label, index);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackedAxis {
    pub label: AxisLabel,
    pub current_index: usize,
    pub max_index: usize,
}

/// Owns the cursor of every tracked axis and the bounds they may move in.
///
/// Bounds are the smallest extent of the axis over all entries, so every
/// cursor position is valid for every entry.
#[derive(Debug, Default)]
pub struct CursorRegistry {
    // Tracking order
    bounds: Vec<(AxisLabel, usize)>,
    state: CursorState,
}

impl CursorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts tracking `label` at index 0, returns its max index.
    pub fn track<A>(
        &mut self,
        label: AxisLabel,
        entries: &[ArrayEntry<A>],
    ) -> Result<usize, Error> {
        if let Ok(max) = self.max_index(label) {
            return Ok(max);
        }

        let mut max_index: Option<usize> = None;
        for entry in entries {
            let pos = match resolve_in(entry, DimensionRef::Label(label)) {
                Ok(pos) => pos,
                Err(Error::UnknownAxisLabel { .. }) => continue,
                Err(err) => return Err(err),
            };
            let max = entry.shape()[pos]
                .checked_sub(1)
                .ok_or(Error::EmptyAxis {
                    entry: entry.id(),
                    label,
                })?;
            max_index = Some(max_index.map_or(max, |x| x.min(max)));
        }
        let max_index = max_index.ok_or(Error::AxisNotTracked { label })?;

        self.bounds.push((label, max_index));
        self.state.insert(label, 0);
        debug!(%label, max_index, "Tracking axis");

        Ok(max_index)
    }

    pub fn is_tracked(&self, label: AxisLabel) -> bool {
        self.bounds.iter().any(|(x, _)| *x == label)
    }

    pub fn max_index(&self, label: AxisLabel) -> Result<usize, Error> {
        self.bounds
            .iter()
            .find(|(x, _)| *x == label)
            .map(|(_, max)| *max)
            .ok_or(Error::AxisNotTracked { label })
    }

    pub fn current_index(&self, label: AxisLabel) -> Result<usize, Error> {
        self.state.get(label).ok_or(Error::AxisNotTracked { label })
    }

    pub fn state(&self) -> &CursorState {
        &self.state
    }

    pub fn tracked(&self) -> impl Iterator<Item = TrackedAxis> + '_ {
        self.bounds.iter().map(|(label, max_index)| TrackedAxis {
            label: *label,
            current_index: self.state.get(*label).unwrap_or_default(),
            max_index: *max_index,
        })
    }

    pub fn check(&self, label: AxisLabel, value: usize) -> Result<(), Error> {
        let max = self.max_index(label)?;
        if value > max {
            return Err(Error::IndexOutOfRange {
                axis: label.to_string(),
                value,
                max,
            });
        }
        Ok(())
    }

    /// The state `set_index(label, value)` would produce, without committing it.
    pub fn preview(&self, label: AxisLabel, value: usize) -> Result<CursorState, Error> {
        self.check(label, value)?;
        let mut state = self.state.clone();
        state.insert(label, value);
        Ok(state)
    }

    /// Moves the cursor of `label` to `value`.
    ///
    /// Returns the entries whose axis order contains `label`. On error the
    /// state is left untouched.
    pub fn set_index<A>(
        &mut self,
        label: AxisLabel,
        value: usize,
        entries: &[ArrayEntry<A>],
    ) -> Result<Vec<EntryId>, Error> {
        self.check(label, value)?;
        self.state.insert(label, value);
        debug!(%label, value, "Cursor moved");

        Ok(entries
            .iter()
            .filter(|x| x.axis_order().contains(label))
            .map(|x| x.id())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use ndarray::{ArrayD, IxDyn};

    use super::*;
    use crate::{
        axis::{AxesOrderSpec, AxisOrderResolver},
        entry::EntryCollection,
    };

    fn entries(shapes: &[&[usize]], spec: Option<AxesOrderSpec>) -> Vec<ArrayEntry<f32>> {
        let entries: EntryCollection<f32> = shapes
            .iter()
            .map(|shape| ArrayD::zeros(IxDyn(shape)))
            .collect();
        let orders = AxisOrderResolver::resolve(&entries, spec.as_ref())
            .unwrap()
            .into_orders();
        entries.into_entries(orders)
    }

    #[test]
    fn max_index_is_smallest_extent() {
        let entries = entries(&[&[10, 4, 8, 8], &[7, 6, 8, 8]], None);
        let mut registry = CursorRegistry::new();

        assert_eq!(registry.track(AxisLabel::TIME, &entries).unwrap(), 6);
        assert_eq!(registry.track(AxisLabel::Z, &entries).unwrap(), 3);
        assert_eq!(registry.current_index(AxisLabel::TIME).unwrap(), 0);
        assert_eq!(registry.current_index(AxisLabel::Z).unwrap(), 0);
    }

    #[test]
    fn max_index_follows_each_entrys_order() {
        let mut collection = EntryCollection::new();
        let first = collection.push(ArrayD::<f32>::zeros(IxDyn(&[3, 4, 9])));
        collection.push(ArrayD::zeros(IxDyn(&[12, 3, 4])));
        let spec = AxesOrderSpec::PerEntry([(first, "xyt".to_string())].into());
        let orders = AxisOrderResolver::resolve(&collection, Some(&spec))
            .unwrap()
            .into_orders();
        let entries = collection.into_entries(orders);
        let mut registry = CursorRegistry::new();

        assert_eq!(registry.track(AxisLabel::TIME, &entries).unwrap(), 8);
    }

    #[test]
    fn tracking_unknown_axis() {
        let entries = entries(&[&[10, 8, 8]], None);
        let mut registry = CursorRegistry::new();

        assert_eq!(
            registry.track(AxisLabel::Z, &entries).unwrap_err(),
            Error::AxisNotTracked { label: AxisLabel::Z }
        );
        assert!(!registry.is_tracked(AxisLabel::Z));
    }

    #[test]
    fn tracking_empty_axis() {
        let entries = entries(&[&[10, 8, 8], &[0, 8, 8]], None);
        let mut registry = CursorRegistry::new();

        assert_eq!(
            registry.track(AxisLabel::TIME, &entries).unwrap_err(),
            Error::EmptyAxis {
                entry: entries[1].id(),
                label: AxisLabel::TIME,
            }
        );
    }

    #[test]
    fn set_index_within_bounds() {
        let entries = entries(&[&[10, 8, 8], &[10, 8, 8]], None);
        let mut registry = CursorRegistry::new();
        registry.track(AxisLabel::TIME, &entries).unwrap();

        for value in 0..=9 {
            let affected = registry
                .set_index(AxisLabel::TIME, value, &entries)
                .unwrap();
            assert_eq!(affected, [entries[0].id(), entries[1].id()]);
            assert_eq!(registry.current_index(AxisLabel::TIME).unwrap(), value);
        }
    }

    #[test]
    fn set_index_out_of_range_keeps_state() {
        let entries = entries(&[&[10, 8, 8]], None);
        let mut registry = CursorRegistry::new();
        registry.track(AxisLabel::TIME, &entries).unwrap();
        registry.set_index(AxisLabel::TIME, 5, &entries).unwrap();
        let before = registry.state().clone();

        for value in [10, 11, usize::MAX] {
            assert_eq!(
                registry
                    .set_index(AxisLabel::TIME, value, &entries)
                    .unwrap_err(),
                Error::IndexOutOfRange {
                    axis: "t".to_string(),
                    value,
                    max: 9,
                }
            );
            assert_eq!(registry.state(), &before);
        }
    }

    #[test]
    fn set_index_untracked() {
        let entries = entries(&[&[10, 4, 8, 8]], None);
        let mut registry = CursorRegistry::new();
        registry.track(AxisLabel::TIME, &entries).unwrap();

        assert_eq!(
            registry.set_index(AxisLabel::Z, 1, &entries).unwrap_err(),
            Error::AxisNotTracked { label: AxisLabel::Z }
        );
        assert_eq!(registry.state().get(AxisLabel::Z), None);
    }

    #[test]
    fn preview_does_not_commit() {
        let entries = entries(&[&[10, 8, 8]], None);
        let mut registry = CursorRegistry::new();
        registry.track(AxisLabel::TIME, &entries).unwrap();

        let preview = registry.preview(AxisLabel::TIME, 4).unwrap();
        assert_eq!(preview.get(AxisLabel::TIME), Some(4));
        assert_eq!(registry.current_index(AxisLabel::TIME).unwrap(), 0);
    }

    #[test]
    fn tracked_axes_in_tracking_order() {
        let entries = entries(&[&[10, 4, 8, 8]], None);
        let mut registry = CursorRegistry::new();
        registry.track(AxisLabel::Z, &entries).unwrap();
        registry.track(AxisLabel::TIME, &entries).unwrap();
        registry.set_index(AxisLabel::TIME, 2, &entries).unwrap();

        let tracked: Vec<_> = registry.tracked().collect();
        assert_eq!(
            tracked,
            [
                TrackedAxis {
                    label: AxisLabel::Z,
                    current_index: 0,
                    max_index: 3,
                },
                TrackedAxis {
                    label: AxisLabel::TIME,
                    current_index: 2,
                    max_index: 9,
                },
            ]
        );
    }
}
