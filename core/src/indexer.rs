use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    axis::AxisLabel,
    entry::{ArrayEntry, EntryId},
    error::Error,
};

/// Reference to a dimension, either by position or by axis label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DimensionRef {
    Index(usize),
    Label(AxisLabel),
}

impl From<usize> for DimensionRef {
    fn from(dim: usize) -> Self {
        DimensionRef::Index(dim)
    }
}

impl From<AxisLabel> for DimensionRef {
    fn from(label: AxisLabel) -> Self {
        DimensionRef::Label(label)
    }
}

impl From<char> for DimensionRef {
    fn from(label: char) -> Self {
        DimensionRef::Label(AxisLabel::new(label))
    }
}

impl fmt::Display for DimensionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DimensionRef::Index(dim) => write!(f, "{dim}"),
            DimensionRef::Label(label) => write!(f, "{label}"),
        }
    }
}

/// Translates [DimensionRef]s into positional indices of specific entries.
#[derive(Debug)]
pub struct DimensionIndexer<'a, A> {
    entries: &'a [ArrayEntry<A>],
}

impl<'a, A> DimensionIndexer<'a, A> {
    pub fn new(entries: &'a [ArrayEntry<A>]) -> Self {
        Self { entries }
    }

    pub fn entry(&self, id: EntryId) -> Result<&'a ArrayEntry<A>, Error> {
        self.entries
            .iter()
            .find(|x| x.id() == id)
            .ok_or(Error::ArrayNotFound { entry: id })
    }

    pub fn resolve(&self, id: EntryId, dim: impl Into<DimensionRef>) -> Result<usize, Error> {
        resolve_in(self.entry(id)?, dim.into())
    }
}

/// Positional index of `dim` within a single entry.
pub(crate) fn resolve_in<A>(entry: &ArrayEntry<A>, dim: DimensionRef) -> Result<usize, Error> {
    match dim {
        DimensionRef::Index(dim) => {
            if dim < entry.ndim() {
                Ok(dim)
            } else {
                Err(Error::DimensionOutOfBounds {
                    entry: entry.id(),
                    dim,
                    ndim: entry.ndim(),
                })
            }
        }
        DimensionRef::Label(label) => {
            entry
                .axis_order()
                .index_of(label)
                .ok_or(Error::UnknownAxisLabel {
                    entry: entry.id(),
                    label,
                })
        }
    }
}

#[cfg(test)]
mod tests {
    use ndarray::{ArrayD, IxDyn};

    use super::*;
    use crate::{axis::AxesOrderSpec, axis::AxisOrderResolver, entry::EntryCollection};

    fn entries() -> Vec<ArrayEntry<f32>> {
        let mut entries = EntryCollection::new();
        entries.push(ArrayD::zeros(IxDyn(&[5, 3, 4])));
        let second = entries.push(ArrayD::zeros(IxDyn(&[3, 4, 5])));
        let spec = AxesOrderSpec::PerEntry([(second, "xyt".to_string())].into());
        let orders = AxisOrderResolver::resolve(&entries, Some(&spec))
            .unwrap()
            .into_orders();
        entries.into_entries(orders)
    }

    #[test]
    fn resolves_labels_per_entry() {
        let entries = entries();
        let indexer = DimensionIndexer::new(&entries);
        let (a, b) = (entries[0].id(), entries[1].id());

        assert_eq!(indexer.resolve(a, 't').unwrap(), 0);
        assert_eq!(indexer.resolve(b, 't').unwrap(), 2);
        assert_eq!(indexer.resolve(b, AxisLabel::X).unwrap(), 0);
    }

    #[test]
    fn integer_refs_are_positional() {
        let entries = entries();
        let indexer = DimensionIndexer::new(&entries);
        let b = entries[1].id();

        assert_eq!(indexer.resolve(b, 1usize).unwrap(), 1);
        assert_eq!(
            indexer.resolve(b, 3usize).unwrap_err(),
            Error::DimensionOutOfBounds {
                entry: b,
                dim: 3,
                ndim: 3,
            }
        );
    }

    #[test]
    fn unknown_label() {
        let entries = entries();
        let indexer = DimensionIndexer::new(&entries);
        let a = entries[0].id();

        assert_eq!(
            indexer.resolve(a, 'z').unwrap_err(),
            Error::UnknownAxisLabel {
                entry: a,
                label: AxisLabel::Z,
            }
        );
    }

    #[test]
    fn unknown_entry() {
        let entries = entries();
        let indexer = DimensionIndexer::new(&entries[..1]);
        let b = entries[1].id();

        assert_eq!(
            indexer.resolve(b, 't').unwrap_err(),
            Error::ArrayNotFound { entry: b }
        );
    }

    #[test]
    fn parses_from_json() {
        let dims: Vec<DimensionRef> = serde_json::from_str(r#"["t", 1]"#).unwrap();
        assert_eq!(dims, [DimensionRef::from('t'), DimensionRef::Index(1)]);
    }
}
