use std::fmt;

use derive_more::Display;
use ndarray::ArrayD;
use serde::{de, Deserialize, Deserializer, Serialize};

use crate::axis::AxisOrder;

/// Identity of an array within a collection, assigned on [EntryCollection::push].
///
/// Two arrays holding equal data are still distinct entries.
#[derive(Display, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[display(fmt = "#{}", _0)]
#[serde(transparent)]
pub struct EntryId(usize);

impl EntryId {
    pub fn index(self) -> usize {
        self.0
    }
}

// Also accepts strings, since map keys in configs are strings
impl<'de> Deserialize<'de> for EntryId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntryIdVisitor;

        impl<'de> de::Visitor<'de> for EntryIdVisitor {
            type Value = EntryId;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an entry index")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                usize::try_from(v)
                    .map(EntryId)
                    .map_err(|_| E::invalid_value(de::Unexpected::Unsigned(v), &self))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                v.trim()
                    .parse()
                    .map(EntryId)
                    .map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
            }
        }

        deserializer.deserialize_any(EntryIdVisitor)
    }
}

/// Arrays registered for display, before their axis orders are known.
#[derive(Debug, Clone)]
pub struct EntryCollection<A> {
    arrays: Vec<ArrayD<A>>,
}

impl<A> Default for EntryCollection<A> {
    fn default() -> Self {
        Self { arrays: Vec::new() }
    }
}

impl<A> EntryCollection<A> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, data: ArrayD<A>) -> EntryId {
        self.arrays.push(data);
        EntryId(self.arrays.len() - 1)
    }

    pub fn len(&self) -> usize {
        self.arrays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arrays.is_empty()
    }

    pub fn contains(&self, id: EntryId) -> bool {
        id.0 < self.arrays.len()
    }

    pub fn ids(&self) -> impl Iterator<Item = EntryId> + '_ {
        (0..self.arrays.len()).map(EntryId)
    }

    pub fn ndims(&self) -> Vec<usize> {
        self.arrays.iter().map(|x| x.ndim()).collect()
    }

    /// Pairs every array with its resolved axis order.
    ///
    /// `orders` must hold one order per array, in registration order.
    pub(crate) fn into_entries(self, orders: Vec<AxisOrder>) -> Vec<ArrayEntry<A>> {
        debug_assert_eq!(self.arrays.len(), orders.len());
        self.arrays
            .into_iter()
            .zip(orders)
            .enumerate()
            .map(|(i, (data, axis_order))| ArrayEntry {
                id: EntryId(i),
                data,
                axis_order,
            })
            .collect()
    }
}

impl<A> FromIterator<ArrayD<A>> for EntryCollection<A> {
    fn from_iter<T: IntoIterator<Item = ArrayD<A>>>(iter: T) -> Self {
        Self {
            arrays: iter.into_iter().collect(),
        }
    }
}

/// One source array together with the meaning of each of its dimensions.
#[derive(Debug)]
pub struct ArrayEntry<A> {
    id: EntryId,
    data: ArrayD<A>,
    axis_order: AxisOrder,
}

impl<A> ArrayEntry<A> {
    pub fn id(&self) -> EntryId {
        self.id
    }

    pub fn data(&self) -> &ArrayD<A> {
        &self.data
    }

    pub fn axis_order(&self) -> &AxisOrder {
        &self.axis_order
    }

    pub fn ndim(&self) -> usize {
        self.data.ndim()
    }

    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }
}

#[cfg(test)]
mod tests {
    use ndarray::IxDyn;

    use super::*;

    #[test]
    fn ids_follow_registration_order() {
        let mut entries = EntryCollection::new();
        let a = entries.push(ArrayD::<f32>::zeros(IxDyn(&[2, 3])));
        let b = entries.push(ArrayD::<f32>::zeros(IxDyn(&[2, 3])));

        assert_ne!(a, b);
        assert_eq!(a.index(), 0);
        assert_eq!(b.index(), 1);
        assert!(entries.contains(b));
        assert_eq!(entries.ids().collect::<Vec<_>>(), [a, b]);
        assert_eq!(a.to_string(), "#0");
    }
}
