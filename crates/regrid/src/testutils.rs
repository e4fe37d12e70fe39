use approx::relative_eq;

use crate::{RasterNum, SourceGrid, sourcegrid::ScalarField};

pub const NOD: f64 = f64::NAN;

pub fn create_vec<T: RasterNum>(data: &[f64]) -> Vec<T> {
    data.iter().map(|&v| T::from_f64(v)).collect()
}

/// Element wise comparison where NaN only matches NaN
pub fn compare_fp_vectors<T: RasterNum>(a: &[T], b: &[T]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    a.iter().zip(b.iter()).all(|(a, b)| {
        if a.is_nan() || b.is_nan() {
            return a.is_nan() == b.is_nan();
        }

        relative_eq!(a.to_f64().unwrap_or(f64::NAN), b.to_f64().unwrap_or(f64::NAN))
    })
}

/// Grid of `rows` x `cols` cells spaced 200m apart with every cell valid and water.
pub fn grid_200m<T: RasterNum>(rows: usize, cols: usize) -> SourceGrid<T> {
    let xc = (0..cols).map(|i| i as f64 * 200.0).collect();
    let yc = (0..rows).map(|i| i as f64 * 200.0).collect();

    SourceGrid::new(xc, yc).expect("valid grid")
}

/// Field with `frames` frames where every cell holds `frame * 100 + row * cols + col`
pub fn indexed_field<T: RasterNum>(frames: usize, rows: usize, cols: usize) -> ScalarField<T> {
    let data = (0..frames)
        .flat_map(|f| (0..rows * cols).map(move |i| T::from_f64((f * 100 + i) as f64)))
        .collect();

    ScalarField::new(frames, rows, cols, data).expect("valid field")
}
