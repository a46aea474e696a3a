//! Sources for the arrays shown by the CLI

use std::{fs::File, io::{BufReader, Read}, path::Path};

use byteorder::{LittleEndian, ReadBytesExt};
use color_eyre::eyre::{self, WrapErr};
use ndarray::{Array, ArrayD, IxDyn};
use tracing::debug;

use crate::args::Shape;

/// Counts up from zero, offset by the array's position so arrays are distinguishable.
pub fn synthesize(shapes: &[Shape]) -> eyre::Result<Vec<ArrayD<f32>>> {
    shapes
        .iter()
        .enumerate()
        .map(|(i, shape)| {
            let len = element_count(shape)?;
            let start = i as f32 * len as f32;
            Array::range(start, start + len as f32, 1.0)
                .into_shape(IxDyn(&shape.0))
                .wrap_err_with(|| format!("Creating array of shape {shape}"))
        })
        .collect()
}

pub fn read_raw_file(path: &Path, shapes: &[Shape]) -> eyre::Result<Vec<ArrayD<f32>>> {
    let file = File::open(path).wrap_err_with(|| format!("Opening {}", path.display()))?;
    read_raw(BufReader::new(file), shapes)
}

/// Reads one C-ordered array per shape, stored back to back as little-endian f32.
pub fn read_raw(mut reader: impl Read, shapes: &[Shape]) -> eyre::Result<Vec<ArrayD<f32>>> {
    shapes
        .iter()
        .map(|shape| {
            let mut data = vec![0.0; element_count(shape)?];
            reader
                .read_f32_into::<LittleEndian>(&mut data)
                .wrap_err_with(|| format!("Reading array of shape {shape}"))?;
            debug!(%shape, "Read raw array");
            ArrayD::from_shape_vec(IxDyn(&shape.0), data)
                .wrap_err_with(|| format!("Creating array of shape {shape}"))
        })
        .collect()
}

fn element_count(shape: &Shape) -> eyre::Result<usize> {
    shape
        .element_count()
        .ok_or_else(|| eyre::eyre!("Shape {shape} has too many elements"))
}
