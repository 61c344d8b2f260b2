//! # hp-root
//!
//! Read-only access to ROOT files: the directory tree, key metadata and
//! TH1/TH2/TH3 histograms. Payloads compressed with zlib, LZ4, ZSTD or XZ
//! are inflated transparently.
//!
//! ## Example
//!
//! ```no_run
//! use hp_root::RootFile;
//!
//! let f = RootFile::open("data.root").unwrap();
//! for entry in f.walk().unwrap() {
//!     println!("{} ({})", entry.path, entry.key.class_name);
//! }
//! let h = f.get_histogram("signal/m_ll").unwrap();
//! println!("bins: {}, entries: {}", h.x_axis.n_bins, h.entries);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod datasource;
pub mod decompress;
pub mod directory;
pub mod error;
pub mod file;
#[cfg(any(test, feature = "fixtures"))]
pub mod fixture;
pub mod histogram;
pub mod key;
pub mod objects;
pub mod rbuffer;
pub mod walk;

pub use error::{Result, RootError};
pub use file::RootFile;
pub use histogram::{HistAxis, Histogram, UNSET_EXTREMUM};
pub use key::KeyInfo;
pub use walk::{WalkEntry, walk};
