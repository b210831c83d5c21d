//! Document storage log for bookshelf
//!
//! Every collection shares a single append-only record file at
//! `<data_dir>/data/documents.dat`. Inserts and updates both append a full
//! copy of the document; the latest record for a document id wins on replay.
//!
//! # Guarantees
//!
//! - Append-only, no in-place updates
//! - CRC32 checksum on every record, verified on every read
//! - fsync before a write is acknowledged
//! - Corruption is never skipped: replay fails instead

mod checksum;
mod errors;
mod reader;
mod record;
mod writer;

pub use checksum::compute_checksum;
pub use errors::{StorageError, StorageErrorCode, StorageResult};
pub use reader::StorageReader;
pub use record::DocumentRecord;
pub use writer::StorageWriter;

use std::path::{Path, PathBuf};

/// Name of the subdirectory holding the record file.
pub const DATA_SUBDIR: &str = "data";

/// Name of the record file.
pub const STORAGE_FILE: &str = "documents.dat";

/// Returns the record file location for a data directory.
pub fn storage_path(data_dir: &Path) -> PathBuf {
    data_dir.join(DATA_SUBDIR).join(STORAGE_FILE)
}
