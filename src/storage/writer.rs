//! Append-only storage writer with fsync enforcement.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use super::errors::{StorageError, StorageResult};
use super::reader::StorageReader;
use super::record::DocumentRecord;

/// Appends document records to `documents.dat`.
///
/// Multiple records for the same document may exist; the latest wins.
pub struct StorageWriter {
    storage_path: PathBuf,
    file: File,
    current_offset: u64,
}

impl StorageWriter {
    /// Opens or creates the storage file under `data_dir`.
    ///
    /// Creates `<data_dir>/data/documents.dat` and parent directories if needed.
    pub fn open(data_dir: &Path) -> StorageResult<Self> {
        let storage_path = super::storage_path(data_dir);

        if let Some(parent) = storage_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                StorageError::write_failed(
                    format!("Failed to create data directory: {}", parent.display()),
                    e,
                )
            })?;
        }

        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&storage_path)
            .map_err(|e| {
                StorageError::write_failed(
                    format!("Failed to open storage file: {}", storage_path.display()),
                    e,
                )
            })?;

        let current_offset = file
            .metadata()
            .map_err(|e| StorageError::io_error("Failed to read file metadata", e))?
            .len();

        Ok(Self {
            storage_path,
            file,
            current_offset,
        })
    }

    /// Opens the writer and replays every existing record in file order.
    ///
    /// Replay happens before the writer is handed out so a corrupted log
    /// never accepts new writes.
    pub fn open_with_replay(
        data_dir: &Path,
        mut apply: impl FnMut(DocumentRecord) -> StorageResult<()>,
    ) -> StorageResult<Self> {
        let writer = Self::open(data_dir)?;
        if writer.current_offset > 0 {
            let mut reader = StorageReader::open(&writer.storage_path)?;
            while let Some(record) = reader.read_next()? {
                apply(record)?;
            }
        }
        Ok(writer)
    }

    pub fn path(&self) -> &Path {
        &self.storage_path
    }

    pub fn current_offset(&self) -> u64 {
        self.current_offset
    }

    /// Writes a document record and fsyncs it.
    ///
    /// Returns the byte offset where the record was written. On failure the
    /// file is cut back to the end of the last complete record.
    pub fn write(&mut self, record: &DocumentRecord) -> StorageResult<u64> {
        let serialized = record.serialize();
        let offset = self.current_offset;

        if let Err(e) = self.append(&serialized, &record.document_id) {
            self.discard_partial();
            return Err(e);
        }

        self.current_offset += serialized.len() as u64;

        Ok(offset)
    }

    fn append(&mut self, serialized: &[u8], document_id: &str) -> StorageResult<()> {
        self.file.write_all(serialized).map_err(|e| {
            StorageError::write_failed(format!("Failed to write document: {}", document_id), e)
        })?;

        self.file.sync_all().map_err(|e| {
            StorageError::write_failed(
                format!("fsync failed after writing document: {}", document_id),
                e,
            )
        })
    }

    /// Truncates bytes written past `current_offset`
    fn discard_partial(&mut self) {
        let result = self
            .file
            .set_len(self.current_offset)
            .and_then(|_| self.file.sync_all());
        if let Err(e) = result {
            tracing::error!(
                path = %self.storage_path.display(),
                offset = self.current_offset,
                error = %e,
                "failed to discard partial record"
            );
        }
    }
}
