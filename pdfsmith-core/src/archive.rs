//! Packaging of multi-file results into a single ZIP download

use crate::error::Result;
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

/// Ordered collection of named buffers.
///
/// Entries keep insertion order and carry a fixed timestamp, so the same
/// entries always serialize to the same bytes.
#[derive(Debug, Default, Clone)]
pub struct Archive {
    entries: Vec<(String, Vec<u8>)>,
}

impl Archive {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>, bytes: Vec<u8>) {
        self.entries.push((name.into(), bytes));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serializes every entry, deflate-compressed, into an in-memory ZIP.
    pub fn to_zip(&self) -> Result<Vec<u8>> {
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(DateTime::default());

        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, bytes) in &self.entries {
            zip.start_file(name.as_str(), options)?;
            zip.write_all(bytes)?;
        }
        Ok(zip.finish()?.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use zip::ZipArchive;

    #[test]
    fn test_entries_keep_order() {
        let mut archive = Archive::new();
        archive.push("Page_1.jpg", b"one".to_vec());
        archive.push("Page_2.jpg", b"two".to_vec());
        archive.push("Page_10.jpg", b"ten".to_vec());

        let bytes = archive.to_zip().unwrap();
        let mut zip = ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(zip.len(), 3);

        let names: Vec<String> = (0..zip.len())
            .map(|i| zip.by_index(i).unwrap().name().to_string())
            .collect();
        assert_eq!(names, vec!["Page_1.jpg", "Page_2.jpg", "Page_10.jpg"]);

        let mut content = String::new();
        zip.by_name("Page_10.jpg")
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "ten");
    }

    #[test]
    fn test_serialization_is_deterministic() {
        let mut archive = Archive::new();
        archive.push("Page_1.png", vec![7u8; 4096]);
        archive.push("Page_2.png", vec![9u8; 4096]);

        assert_eq!(archive.to_zip().unwrap(), archive.to_zip().unwrap());
    }

    #[test]
    fn test_empty_archive_is_valid_zip() {
        let archive = Archive::new();
        assert!(archive.is_empty());
        let bytes = archive.to_zip().unwrap();
        let zip = ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(zip.len(), 0);
    }
}
