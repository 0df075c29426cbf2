mod color;
mod grid;

use std::path::Path;

use image::{Rgb, RgbImage};
use tracing::debug;

use crate::error::{HeatmapError, Result};
use crate::topo::Sample;
use crate::utils::{encode_image, write_atomically, OutputFormat};

pub use color::ColorScale;
pub use grid::SampleGrid;

use grid::cell_edges;

/// Largest raster `render` will allocate, 16384 x 16384 pixels (768 MiB of RGB).
pub const MAX_PIXELS: u64 = 16384 * 16384;


/// Paints every grid cell as a flat rectangle colored by its altitude.
pub fn render(samples: &[Sample], width: u32, height: u32) -> Result<RgbImage> {
    if width == 0 || height == 0 {
        return Err(HeatmapError::Config(format!(
            "image dimensions must be positive, got {}x{}",
            width, height
        )));
    }
    match (width as u64).checked_mul(height as u64) {
        Some(pixels) if pixels <= MAX_PIXELS => {}
        _ => {
            return Err(HeatmapError::Config(format!(
                "image of {}x{} exceeds the limit of {} pixels",
                width, height, MAX_PIXELS
            )))
        }
    }

    let grid = SampleGrid::from_samples(samples)?;
    let scale = ColorScale::from_samples(samples)
        .ok_or_else(|| HeatmapError::InvalidGrid("no samples".to_string()))?;
    debug!(rows = grid.rows(), columns = grid.columns(), ?scale, "rendering heatmap");

    let x_edges = cell_edges(grid.columns(), width);
    let y_edges = cell_edges(grid.rows(), height);

    let mut img = RgbImage::from_pixel(width, height, Rgb([255, 0, 0]));

    for row in 0..grid.rows() {
        for column in 0..grid.columns() {
            let color = scale.color(grid.cell(column, row).altitude);

            for y in y_edges[row]..y_edges[row + 1] {
                for x in x_edges[column]..x_edges[column + 1] {
                    img.put_pixel(x, y, color);
                }
            }
        }
    }

    Ok(img)
}

pub fn render_encoded(samples: &[Sample], width: u32, height: u32, format: OutputFormat) -> Result<Vec<u8>> {
    let img = render(samples, width, height)?;
    encode_image(img, format)
}

/// Renders into `path`. The format follows the file extension; the file is
/// replaced in one step and left untouched when anything fails.
pub fn generate_map(samples: &[Sample], width: u32, height: u32, path: &Path) -> Result<()> {
    let format = OutputFormat::from_path(path)?;
    let bytes = render_encoded(samples, width, height, format)?;
    write_atomically(path, &bytes)
}
