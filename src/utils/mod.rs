use image::{DynamicImage, ImageOutputFormat, RgbImage};
use std::io::{Cursor, Write};
use std::path::Path;
use tempfile::NamedTempFile;

use crate::error::{HeatmapError, Result};

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;
    use image::{Rgb, RgbImage};
    use crate::test::with_temp_dir;
    use crate::utils::{encode_image, write_atomically, OutputFormat};

    #[test]
    fn format_follows_extension() {
        assert_eq!(OutputFormat::Png, OutputFormat::from_path(Path::new("eesti.png")).unwrap());
        assert_eq!(OutputFormat::Png, OutputFormat::from_path(Path::new("WORLD.PNG")).unwrap());
        assert_eq!(OutputFormat::Bmp, OutputFormat::from_path(Path::new("out/world.bmp")).unwrap());
        assert!(OutputFormat::from_path(Path::new("world.jpg")).is_err());
        assert!(OutputFormat::from_path(Path::new("world")).is_err());
    }

    #[test]
    fn encodes_png_and_bmp_signatures() {
        let img = RgbImage::from_pixel(3, 2, Rgb([0, 10, 0]));

        let png = encode_image(img.clone(), OutputFormat::Png).unwrap();
        assert_eq!(&[0x89, b'P', b'N', b'G'], &png[..4]);

        let bmp = encode_image(img, OutputFormat::Bmp).unwrap();
        assert_eq!(b"BM", &bmp[..2]);
    }

    #[test]
    fn write_atomically_replaces_existing_file() {
        with_temp_dir(|dir| {
            let path = dir.join("out.bin");
            fs::write(&path, b"old contents that are longer").unwrap();

            write_atomically(&path, b"new").unwrap();

            assert_eq!(b"new".to_vec(), fs::read(&path).unwrap());
            assert_eq!(1, fs::read_dir(&dir).unwrap().count());
        }).unwrap();
    }

    #[test]
    fn write_atomically_fails_for_missing_directory() {
        with_temp_dir(|dir| {
            let path = dir.join("missing").join("out.bin");
            assert!(write_atomically(&path, b"data").is_err());
        }).unwrap();
    }
}

/// Lossless image formats the heatmap can be written as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Png,
    Bmp,
}

impl OutputFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match ext.as_deref() {
            Some("png") => Ok(OutputFormat::Png),
            Some("bmp") => Ok(OutputFormat::Bmp),
            _ => Err(HeatmapError::Config(format!(
                "cannot tell a lossless image format from {}, use .png or .bmp",
                path.display()
            ))),
        }
    }
}

impl From<OutputFormat> for ImageOutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Png => ImageOutputFormat::Png,
            OutputFormat::Bmp => ImageOutputFormat::Bmp,
        }
    }
}

pub fn encode_image(img: RgbImage, format: OutputFormat) -> Result<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());

    match DynamicImage::ImageRgb8(img).write_to(&mut buf, format) {
        Ok(_) => Ok(buf.into_inner()),
        Err(err) => Err(HeatmapError::Config(format!("cannot encode {:?}: {}", format, err))),
    }
}

/// Writes through a temporary sibling file that is renamed over `path`, so
/// readers only ever see the old or the complete new contents.
pub fn write_atomically(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| HeatmapError::io(dir, e))?;
    tmp.write_all(bytes).map_err(|e| HeatmapError::io(tmp.path(), e))?;
    tmp.as_file().sync_all().map_err(|e| HeatmapError::io(tmp.path(), e))?;
    tmp.persist(path).map_err(|e| HeatmapError::io(path, e.error))?;

    Ok(())
}
