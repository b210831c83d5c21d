//! Document storage record format
//!
//! ```text
//! +------------------+
//! | Record Length    | (u32 LE, includes itself and the checksum)
//! +------------------+
//! | Collection ID    | (length-prefixed string)
//! +------------------+
//! | Document ID      | (length-prefixed string)
//! +------------------+
//! | Document Body    | (length-prefixed JSON bytes)
//! +------------------+
//! | Checksum         | (u32 LE)
//! +------------------+
//! ```
//!
//! Checksum covers all bytes except the checksum itself.

use std::io::{self, Read};

/// Smallest possible record: length + three empty prefixed fields + checksum.
pub(crate) const MIN_RECORD_SIZE: usize = 4 + 4 + 4 + 4 + 4;

/// One full version of a document as stored on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRecord {
    /// Owning collection name
    pub collection_id: String,
    /// Document primary key (hex ObjectId)
    pub document_id: String,
    /// Serialized JSON document
    pub document_body: Vec<u8>,
}

impl DocumentRecord {
    pub fn new(
        collection_id: impl Into<String>,
        document_id: impl Into<String>,
        document_body: Vec<u8>,
    ) -> Self {
        Self {
            collection_id: collection_id.into(),
            document_id: document_id.into(),
            document_body,
        }
    }

    fn serialize_body(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(
            12 + self.collection_id.len() + self.document_id.len() + self.document_body.len(),
        );

        buf.extend_from_slice(&(self.collection_id.len() as u32).to_le_bytes());
        buf.extend_from_slice(self.collection_id.as_bytes());

        buf.extend_from_slice(&(self.document_id.len() as u32).to_le_bytes());
        buf.extend_from_slice(self.document_id.as_bytes());

        buf.extend_from_slice(&(self.document_body.len() as u32).to_le_bytes());
        buf.extend_from_slice(&self.document_body);

        buf
    }

    /// Serialize the complete record to bytes.
    pub fn serialize(&self) -> Vec<u8> {
        let body = self.serialize_body();
        let record_length = (4 + body.len() + 4) as u32;

        let mut record = Vec::with_capacity(record_length as usize);
        record.extend_from_slice(&record_length.to_le_bytes());
        record.extend_from_slice(&body);

        let checksum = super::checksum::compute_checksum(&record);
        record.extend_from_slice(&checksum.to_le_bytes());

        record
    }

    /// Deserialize a record from bytes, verifying checksum.
    ///
    /// Returns the record and the number of bytes consumed.
    pub fn deserialize(data: &[u8]) -> io::Result<(Self, usize)> {
        if data.len() < MIN_RECORD_SIZE {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "Record too short",
            ));
        }

        let record_length = u32::from_le_bytes([data[0], data[1], data[2], data[3]]) as usize;

        if record_length < MIN_RECORD_SIZE {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Invalid record length: {}", record_length),
            ));
        }

        if data.len() < record_length {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!(
                    "Record truncated: expected {} bytes, got {}",
                    record_length,
                    data.len()
                ),
            ));
        }

        let checksum_offset = record_length - 4;
        let stored_checksum = u32::from_le_bytes([
            data[checksum_offset],
            data[checksum_offset + 1],
            data[checksum_offset + 2],
            data[checksum_offset + 3],
        ]);
        let computed_checksum = super::checksum::compute_checksum(&data[0..checksum_offset]);

        if computed_checksum != stored_checksum {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "Checksum mismatch: computed {:08x}, stored {:08x}",
                    computed_checksum, stored_checksum
                ),
            ));
        }

        let mut cursor = io::Cursor::new(&data[4..checksum_offset]);

        fn read_bytes<R: Read>(reader: &mut R) -> io::Result<Vec<u8>> {
            let mut len_buf = [0u8; 4];
            reader.read_exact(&mut len_buf)?;
            let len = u32::from_le_bytes(len_buf) as usize;

            let mut buf = vec![0u8; len];
            reader.read_exact(&mut buf)?;
            Ok(buf)
        }

        fn read_string<R: Read>(reader: &mut R) -> io::Result<String> {
            String::from_utf8(read_bytes(reader)?).map_err(|e| {
                io::Error::new(io::ErrorKind::InvalidData, format!("Invalid UTF-8: {}", e))
            })
        }

        let collection_id = read_string(&mut cursor)?;
        let document_id = read_string(&mut cursor)?;
        let document_body = read_bytes(&mut cursor)?;

        Ok((
            Self {
                collection_id,
                document_id,
                document_body,
            },
            record_length,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> DocumentRecord {
        DocumentRecord::new(
            "books",
            "65a1b2c3d4e5f6a7b8c9d0e1",
            br#"{"title":"Title1","author":"Author1"}"#.to_vec(),
        )
    }

    #[test]
    fn test_record_roundtrip() {
        let record = sample_record();
        let serialized = record.serialize();
        let (deserialized, consumed) = DocumentRecord::deserialize(&serialized).unwrap();

        assert_eq!(record, deserialized);
        assert_eq!(consumed, serialized.len());
    }

    #[test]
    fn test_checksum_detects_corruption() {
        let mut serialized = sample_record().serialize();
        let mid = serialized.len() / 2;
        serialized[mid] ^= 0xFF;

        let err = DocumentRecord::deserialize(&serialized).unwrap_err();
        assert!(err.to_string().contains("Checksum mismatch"));
    }

    #[test]
    fn test_truncated_record_rejected() {
        let serialized = sample_record().serialize();
        let err = DocumentRecord::deserialize(&serialized[..serialized.len() - 3]).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_deserialize_consumes_only_first_record() {
        let first = sample_record();
        let second = DocumentRecord::new("books", "other", b"{}".to_vec());

        let mut bytes = first.serialize();
        bytes.extend_from_slice(&second.serialize());

        let (decoded, consumed) = DocumentRecord::deserialize(&bytes).unwrap();
        assert_eq!(decoded, first);

        let (decoded, _) = DocumentRecord::deserialize(&bytes[consumed..]).unwrap();
        assert_eq!(decoded, second);
    }
}
