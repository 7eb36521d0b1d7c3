//! Reader for the IDX binary format used by MNIST and its derivatives.
//!
//! # Image file layout
//! ```text
//! bytes  0-3:   magic = 2051 (0x00000803, big-endian u32)
//! bytes  4-7:   N     (number of images)
//! bytes  8-11:  rows  (image height in pixels)
//! bytes 12-15:  cols  (image width in pixels)
//! bytes 16..:   N * rows * cols bytes, row-major, uint8
//! ```
//!
//! # Label file layout
//! ```text
//! bytes  0-3:   magic = 2049 (0x00000801, big-endian u32)
//! bytes  4-7:   N     (number of labels)
//! bytes  8..:   N bytes, one class index each
//! ```

use std::path::Path;

use log::debug;

use crate::error::{Error, Result};
use crate::math::matrix::Matrix;

pub const IMAGE_MAGIC: u32 = 2051;
pub const LABEL_MAGIC: u32 = 2049;

/// Decoded contents of a single IDX file.
#[derive(Debug, Clone)]
pub enum IdxFile {
    /// One row per image, pixels scaled to `[0, 1]`.
    Images { features: Matrix, rows: usize, cols: usize },
    Labels(Vec<u8>),
}

/// A feature matrix with its labels, as consumed by `Network`.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub features: Matrix,
    pub labels: Vec<u8>,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

fn read_u32(bytes: &[u8], offset: usize, what: &str) -> Result<u32> {
    bytes.get(offset..offset + 4)
        .map(|b| u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
        .ok_or_else(|| Error::Idx(format!(
            "file too short to hold {} at byte {} ({} bytes total)", what, offset, bytes.len()
        )))
}

/// Decodes either kind of IDX file, dispatching on the magic number.
pub fn parse_idx(bytes: &[u8]) -> Result<IdxFile> {
    let magic = read_u32(bytes, 0, "magic number")?;
    let count = read_u32(bytes, 4, "item count")? as usize;

    match magic {
        IMAGE_MAGIC => {
            let rows = read_u32(bytes, 8, "row count")? as usize;
            let cols = read_u32(bytes, 12, "column count")? as usize;
            let n_pixels = rows.checked_mul(cols)
                .ok_or_else(|| Error::Idx(format!("rows * cols overflows (rows={}, cols={})", rows, cols)))?;
            let needed = count.checked_mul(n_pixels)
                .and_then(|n| n.checked_add(16))
                .ok_or_else(|| Error::Idx(format!("{} images of {} pixels overflows", count, n_pixels)))?;
            if bytes.len() < needed {
                return Err(Error::Idx(format!(
                    "header declares {} images of {}x{} pixels ({} bytes), but file is only {} bytes",
                    count, rows, cols, needed, bytes.len()
                )));
            }

            let pixels: Vec<f64> = bytes[16..needed].iter().map(|&px| px as f64 / 255.0).collect();
            let features = Matrix::from_flat(count, n_pixels, &pixels)?;
            debug!("decoded {} images of {}x{}", count, rows, cols);
            Ok(IdxFile::Images { features, rows, cols })
        }
        LABEL_MAGIC => {
            let needed = 8 + count;
            if bytes.len() < needed {
                return Err(Error::Idx(format!(
                    "header declares {} labels, but file is only {} bytes", count, bytes.len()
                )));
            }
            debug!("decoded {} labels", count);
            Ok(IdxFile::Labels(bytes[8..needed].to_vec()))
        }
        other => Err(Error::Idx(format!(
            "unknown magic number {} (expected {} for images or {} for labels)",
            other, IMAGE_MAGIC, LABEL_MAGIC
        ))),
    }
}

pub fn parse_images(bytes: &[u8]) -> Result<Matrix> {
    match parse_idx(bytes)? {
        IdxFile::Images { features, .. } => Ok(features),
        IdxFile::Labels(_) => Err(Error::Idx("expected an image file, found a label file".to_owned())),
    }
}

pub fn parse_labels(bytes: &[u8]) -> Result<Vec<u8>> {
    match parse_idx(bytes)? {
        IdxFile::Labels(labels) => Ok(labels),
        IdxFile::Images { .. } => Err(Error::Idx("expected a label file, found an image file".to_owned())),
    }
}

pub fn load_images<P: AsRef<Path>>(path: P) -> Result<Matrix> {
    parse_images(&std::fs::read(path)?)
}

pub fn load_labels<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
    parse_labels(&std::fs::read(path)?)
}

/// Loads an image file and its label file, checking they describe the same
/// number of examples.
pub fn load_dataset<P: AsRef<Path>, Q: AsRef<Path>>(images: P, labels: Q) -> Result<Dataset> {
    let features = load_images(images)?;
    let labels = load_labels(labels)?;
    if features.rows != labels.len() {
        return Err(Error::Idx(format!(
            "image file holds {} examples but label file holds {}", features.rows, labels.len()
        )));
    }
    Ok(Dataset { features, labels })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image_bytes(count: u32, rows: u32, cols: u32, pixels: &[u8]) -> Vec<u8> {
        let mut bytes = Vec::new();
        for v in [IMAGE_MAGIC, count, rows, cols] {
            bytes.extend_from_slice(&v.to_be_bytes());
        }
        bytes.extend_from_slice(pixels);
        bytes
    }

    fn label_bytes(labels: &[u8]) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&LABEL_MAGIC.to_be_bytes());
        bytes.extend_from_slice(&(labels.len() as u32).to_be_bytes());
        bytes.extend_from_slice(labels);
        bytes
    }

    #[test]
    fn images_are_flattened_and_normalised() {
        let bytes = image_bytes(2, 2, 2, &[0, 255, 51, 102, 255, 255, 0, 0]);
        let features = parse_images(&bytes).unwrap();
        assert_eq!(features.shape(), (2, 4));
        assert_eq!(features.data[0], vec![0.0, 1.0, 0.2, 0.4]);
        assert_eq!(features.data[1], vec![1.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn labels_are_read_verbatim() {
        assert_eq!(parse_labels(&label_bytes(&[7, 2, 1, 0])).unwrap(), vec![7, 2, 1, 0]);
    }

    #[test]
    fn unknown_magic_is_rejected() {
        let mut bytes = label_bytes(&[1]);
        bytes[3] = 0x42;
        assert!(matches!(parse_idx(&bytes), Err(Error::Idx(_))));
    }

    #[test]
    fn truncated_files_are_rejected() {
        let bytes = image_bytes(3, 2, 2, &[0; 8]);
        assert!(matches!(parse_images(&bytes), Err(Error::Idx(_))));
        assert!(matches!(parse_labels(&[0, 0, 8]), Err(Error::Idx(_))));
    }

    #[test]
    fn kind_mismatch_is_rejected() {
        assert!(parse_images(&label_bytes(&[1, 2])).is_err());
        assert!(parse_labels(&image_bytes(1, 1, 1, &[9])).is_err());
    }
}
