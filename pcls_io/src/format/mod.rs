//! Point-set container format.
//!
//! Split files are stored in the `.pcls` binary format: a fixed header
//! followed by sample-major xyz coordinates and one label per sample.
//!
//! # Example
//!
//! ```no_run
//! use pcls_io::{format, PointCloudDataset};
//!
//! let dataset = PointCloudDataset::synthetic(40, 1024, 10, 0);
//! format::save_to_file(&dataset, "data/mnist/train.pcls")?;
//! let loaded = format::load_from_file("data/mnist/train.pcls")?;
//! assert_eq!(loaded.len(), 40);
//! # Ok::<(), pcls_io::PclsIoError>(())
//! ```

pub mod header;
pub mod pointset;

pub use header::{compute_file_size, PointSetHeader, HEADER_SIZE, PCLS_MAGIC, PCLS_VERSION};
pub use pointset::{load_from_file, load_point_sets, save_point_sets, save_to_file};
