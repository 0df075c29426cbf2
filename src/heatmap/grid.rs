use std::cmp::Ordering;

use crate::error::{HeatmapError, Result};
use crate::topo::Sample;


/// Flat samples folded into rows of latitude and columns of longitude.
///
/// Samples must be in row-major order: longitude varies fastest, every run of
/// `columns` samples shares one latitude. The latitude direction is not
/// prescribed; row 0 is whatever latitude comes first and is drawn at the top.
#[derive(Debug)]
pub struct SampleGrid<'a> {
    samples: &'a [Sample],
    rows: usize,
    columns: usize,
}

impl<'a> SampleGrid<'a> {
    pub fn from_samples(samples: &'a [Sample]) -> Result<Self> {
        if samples.is_empty() {
            return Err(HeatmapError::InvalidGrid("no samples".to_string()));
        }

        let rows = distinct_count(samples.iter().map(|s| s.lat));
        let columns = distinct_count(samples.iter().map(|s| s.lng));

        if samples.len() != rows * columns {
            return Err(HeatmapError::InvalidGrid(format!(
                "{} samples cannot fill {} latitudes x {} longitudes",
                samples.len(),
                rows,
                columns
            )));
        }

        for (index, sample) in samples.iter().enumerate() {
            let row_head = &samples[index - index % columns];
            let column_head = &samples[index % columns];

            if sample.lat != row_head.lat || sample.lng != column_head.lng {
                return Err(HeatmapError::InvalidGrid(format!(
                    "sample {} at ({}, {}) is out of row-major order",
                    index, sample.lat, sample.lng
                )));
            }
        }

        Ok(SampleGrid { samples, rows, columns })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn cell(&self, column: usize, row: usize) -> &Sample {
        &self.samples[column + self.columns * row]
    }
}

fn distinct_count(values: impl Iterator<Item = f64>) -> usize {
    let mut values: Vec<f64> = values.collect();
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    values.dedup();
    values.len()
}

/// Pixel boundaries of `count` equally sized cells over `extent` pixels.
///
/// Every edge is rounded from its exact fractional position, so the error never
/// exceeds half a pixel and the last edge is always `extent`.
pub fn cell_edges(count: usize, extent: u32) -> Vec<u32> {
    let cell_size = extent as f64 / count as f64;

    (0..=count)
        .map(|k| ((k as f64 * cell_size).round() as u32).min(extent))
        .collect()
}
