//! .pcls binary format read/write implementation.
//!
//! # Format Specification
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────────┐
//! │ HEADER (32 bytes)                                                  │
//! ├────────────────────────────────────────────────────────────────────┤
//! │  0-3:   Magic "PCLS" (4 bytes)                                     │
//! │  4-5:   version (u16 LE)                                           │
//! │  6-7:   flags (u16 LE)                                             │
//! │  8-11:  num_samples (u32 LE)                                       │
//! │ 12-15:  points_per_sample (u32 LE)                                 │
//! │ 16-19:  num_classes (u32 LE)                                       │
//! │ 20-31:  reserved (12 bytes)                                        │
//! ├────────────────────────────────────────────────────────────────────┤
//! │ POINTS (sample-major)                                              │
//! │  For each sample, for each point: (f32 x, f32 y, f32 z) LE         │
//! ├────────────────────────────────────────────────────────────────────┤
//! │ LABELS                                                             │
//! │  For each sample: u32 LE                                           │
//! └────────────────────────────────────────────────────────────────────┘
//! ```

use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use super::header::{PointSetHeader, HEADER_SIZE, PCLS_VERSION};
use crate::dataset::{PointCloudDataset, PointSample};
use crate::error::{PclsIoError, Result};

/// Bytes per stored point (three f32).
const POINT_BYTES: usize = 12;

/// Bytes per stored label (one u32).
const LABEL_BYTES: usize = 4;

/// Save a dataset to a writer in .pcls format.
pub fn save_point_sets<W: Write>(dataset: &PointCloudDataset, writer: &mut W) -> Result<()> {
    let header = PointSetHeader::new(
        dataset.len() as u32,
        dataset.num_points() as u32,
        dataset.num_classes() as u32,
    );
    writer.write_all(&header.to_bytes())?;

    for sample in dataset.samples() {
        for point in &sample.points {
            for coord in point {
                writer.write_all(&coord.to_le_bytes())?;
            }
        }
    }

    for sample in dataset.samples() {
        writer.write_all(&(sample.label as u32).to_le_bytes())?;
    }

    Ok(())
}

/// Load a dataset from a reader in .pcls format.
///
/// # Errors
/// Returns `InvalidFormat` on bad magic or truncated data, and
/// `LabelOutOfRange` if a label exceeds the declared class count.
pub fn load_point_sets<R: Read>(reader: &mut R) -> Result<PointCloudDataset> {
    let mut header_bytes = [0u8; HEADER_SIZE];
    reader.read_exact(&mut header_bytes)?;
    let header = PointSetHeader::from_bytes(&header_bytes);

    if !header.is_valid() {
        return Err(PclsIoError::InvalidFormat {
            message: "invalid magic bytes (expected PCLS)",
        });
    }
    if header.version != PCLS_VERSION {
        return Err(PclsIoError::UnsupportedVersion {
            got: header.version,
        });
    }

    let num_samples = header.num_samples as usize;
    let points_per_sample = header.points_per_sample as usize;
    let num_classes = header.num_classes as usize;

    let sample_bytes = points_per_sample
        .checked_mul(POINT_BYTES)
        .ok_or(PclsIoError::InvalidFormat {
            message: "point count overflows the address space",
        })?;
    let label_len = num_samples
        .checked_mul(LABEL_BYTES)
        .ok_or(PclsIoError::InvalidFormat {
            message: "sample count overflows the address space",
        })?;

    // Grown as samples arrive; the header counts are untrusted.
    let mut points_per = Vec::new();
    for _ in 0..num_samples {
        let point_bytes = read_block(reader, sample_bytes)?;
        let points: Vec<[f32; 3]> = point_bytes
            .chunks_exact(12)
            .map(|chunk| {
                let coord = |offset: usize| {
                    f32::from_le_bytes([
                        chunk[offset],
                        chunk[offset + 1],
                        chunk[offset + 2],
                        chunk[offset + 3],
                    ])
                };
                [coord(0), coord(4), coord(8)]
            })
            .collect();
        points_per.push(points);
    }

    let label_bytes = read_block(reader, label_len)?;

    let samples = points_per
        .into_iter()
        .zip(label_bytes.chunks_exact(4))
        .map(|(points, chunk)| {
            let label = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]) as usize;
            PointSample::new(points, label)
        })
        .collect();

    PointCloudDataset::new(samples, num_classes)
}

/// Read exactly `len` bytes, allocating only as data arrives.
fn read_block<R: Read>(reader: &mut R, len: usize) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    reader.by_ref().take(len as u64).read_to_end(&mut bytes)?;
    if bytes.len() != len {
        return Err(PclsIoError::InvalidFormat {
            message: "unexpected end of data",
        });
    }
    Ok(bytes)
}

/// Save a dataset to a file path.
pub fn save_to_file<P: AsRef<Path>>(dataset: &PointCloudDataset, path: P) -> Result<()> {
    let mut writer = BufWriter::new(std::fs::File::create(path)?);
    save_point_sets(dataset, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Load a dataset from a file path.
pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<PointCloudDataset> {
    let mut reader = BufReader::new(std::fs::File::open(path)?);
    load_point_sets(&mut reader)
}
