//! Sequential storage reader with strict corruption detection.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use super::errors::{StorageError, StorageResult};
use super::record::{DocumentRecord, MIN_RECORD_SIZE};

/// Reads document records in file order.
///
/// Validates checksums on every read. Any corruption is reported, never skipped.
pub struct StorageReader {
    storage_path: PathBuf,
    reader: BufReader<File>,
    current_offset: u64,
    file_size: u64,
}

impl StorageReader {
    /// Opens the storage file for reading.
    pub fn open(storage_path: &Path) -> StorageResult<Self> {
        let file = File::open(storage_path).map_err(|e| {
            StorageError::read_failed(
                format!("Failed to open storage file: {}", storage_path.display()),
                e,
            )
        })?;

        let file_size = file
            .metadata()
            .map_err(|e| StorageError::read_failed("Failed to read file metadata", e))?
            .len();

        Ok(Self {
            storage_path: storage_path.to_path_buf(),
            reader: BufReader::new(file),
            current_offset: 0,
            file_size,
        })
    }

    /// Opens storage from a data directory.
    pub fn open_from_data_dir(data_dir: &Path) -> StorageResult<Self> {
        Self::open(&super::storage_path(data_dir))
    }

    pub fn path(&self) -> &Path {
        &self.storage_path
    }

    pub fn current_offset(&self) -> u64 {
        self.current_offset
    }

    /// Reads the next record from storage.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(record))` if a record was read
    /// - `Ok(None)` at end of file
    /// - `Err(SHELF_DATA_CORRUPTION)` on checksum failure or truncation
    pub fn read_next(&mut self) -> StorageResult<Option<DocumentRecord>> {
        if self.current_offset >= self.file_size {
            return Ok(None);
        }

        let remaining = self.file_size - self.current_offset;
        if remaining < MIN_RECORD_SIZE as u64 {
            return Err(StorageError::corruption_at_offset(
                self.current_offset,
                format!(
                    "Truncated storage: {} bytes remaining, minimum record size is {}",
                    remaining, MIN_RECORD_SIZE
                ),
            ));
        }

        let mut len_buf = [0u8; 4];
        self.reader.read_exact(&mut len_buf).map_err(|e| {
            StorageError::corruption_at_offset(
                self.current_offset,
                format!("Failed to read record length: {}", e),
            )
        })?;
        let record_length = u32::from_le_bytes(len_buf) as u64;

        if record_length < MIN_RECORD_SIZE as u64 {
            return Err(StorageError::corruption_at_offset(
                self.current_offset,
                format!("Invalid record length: {}", record_length),
            ));
        }

        if record_length > remaining {
            return Err(StorageError::corruption_at_offset(
                self.current_offset,
                format!(
                    "Record length {} exceeds remaining file size {}",
                    record_length, remaining
                ),
            ));
        }

        let mut record_buf = vec![0u8; record_length as usize];
        record_buf[0..4].copy_from_slice(&len_buf);
        self.reader.read_exact(&mut record_buf[4..]).map_err(|e| {
            StorageError::corruption_at_offset(
                self.current_offset,
                format!("Failed to read record body: {}", e),
            )
        })?;

        let (record, bytes_consumed) = DocumentRecord::deserialize(&record_buf)
            .map_err(|e| StorageError::corruption_at_offset(self.current_offset, e.to_string()))?;

        self.current_offset += bytes_consumed as u64;

        Ok(Some(record))
    }

    /// Reads all remaining records. Any corruption causes immediate failure.
    pub fn read_all(&mut self) -> StorageResult<Vec<DocumentRecord>> {
        let mut records = Vec::new();
        while let Some(record) = self.read_next()? {
            records.push(record);
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_records(path: &Path, records: &[DocumentRecord]) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        let bytes: Vec<u8> = records.iter().flat_map(|r| r.serialize()).collect();
        fs::write(path, bytes).unwrap();
    }

    #[test]
    fn test_reads_records_in_file_order() {
        let temp_dir = TempDir::new().unwrap();
        let path = crate::storage::storage_path(temp_dir.path());
        write_records(
            &path,
            &[
                DocumentRecord::new("books", "a", b"{}".to_vec()),
                DocumentRecord::new("books", "b", b"{}".to_vec()),
            ],
        );

        let mut reader = StorageReader::open(&path).unwrap();
        let records = reader.read_all().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].document_id, "a");
        assert_eq!(records[1].document_id, "b");
        assert!(reader.read_next().unwrap().is_none());
    }

    #[test]
    fn test_trailing_garbage_is_corruption() {
        let temp_dir = TempDir::new().unwrap();
        let path = crate::storage::storage_path(temp_dir.path());
        write_records(&path, &[DocumentRecord::new("books", "a", b"{}".to_vec())]);

        let mut bytes = fs::read(&path).unwrap();
        bytes.extend_from_slice(&[1, 2, 3]);
        fs::write(&path, bytes).unwrap();

        let mut reader = StorageReader::open(&path).unwrap();
        assert!(reader.read_next().unwrap().is_some());
        let err = reader.read_next().unwrap_err();
        assert!(err.is_corruption());
    }

    #[test]
    fn test_missing_file_is_read_failure() {
        let temp_dir = TempDir::new().unwrap();
        let err = StorageReader::open_from_data_dir(temp_dir.path())
            .err()
            .unwrap();
        assert!(!err.is_corruption());
    }
}
