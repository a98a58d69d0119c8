//! In-memory storage backend for tests.

use std::io::{Cursor, Read, Write};
use std::sync::Arc;

use ahash::AHashMap;
use parking_lot::RwLock;

use crate::error::{CallaError, Result};
use crate::storage::{Storage, StorageInput, StorageOutput};

type FileMap = Arc<RwLock<AHashMap<String, Arc<Vec<u8>>>>>;

/// Storage backend keeping all files in a shared in-memory map.
///
/// Cloning produces a handle onto the same file map, so a writer and a
/// reader created from clones observe each other's files.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    files: FileMap,
}

impl MemoryStorage {
    /// Create an empty in-memory storage.
    pub fn new() -> Self {
        MemoryStorage::default()
    }
}

impl Storage for MemoryStorage {
    fn open_input(&self, name: &str) -> Result<Box<dyn StorageInput>> {
        let files = self.files.read();
        let data = files
            .get(name)
            .cloned()
            .ok_or_else(|| CallaError::storage(format!("file not found: {name}")))?;
        Ok(Box::new(MemoryInput {
            size: data.len() as u64,
            cursor: Cursor::new(data),
        }))
    }

    fn create_output(&self, name: &str) -> Result<Box<dyn StorageOutput>> {
        Ok(Box::new(MemoryOutput {
            files: self.files.clone(),
            name: name.to_string(),
            buffer: Vec::new(),
        }))
    }

    fn file_exists(&self, name: &str) -> bool {
        self.files.read().contains_key(name)
    }

    fn delete_file(&self, name: &str) -> Result<()> {
        self.files
            .write()
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| CallaError::storage(format!("file not found: {name}")))
    }

    fn list_files(&self, prefix: &str) -> Result<Vec<String>> {
        let mut names: Vec<String> = self
            .files
            .read()
            .keys()
            .filter(|n| n.starts_with(prefix))
            .cloned()
            .collect();
        names.sort();
        Ok(names)
    }
}

struct MemoryInput {
    cursor: Cursor<Arc<Vec<u8>>>,
    size: u64,
}

impl Read for MemoryInput {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let position = self.cursor.position() as usize;
        let data = self.cursor.get_ref();
        let remaining = &data[position.min(data.len())..];
        let n = remaining.len().min(buf.len());
        buf[..n].copy_from_slice(&remaining[..n]);
        self.cursor.set_position((position + n) as u64);
        Ok(n)
    }
}

impl StorageInput for MemoryInput {
    fn size(&self) -> Result<u64> {
        Ok(self.size)
    }
}

struct MemoryOutput {
    files: FileMap,
    name: String,
    buffer: Vec<u8>,
}

impl MemoryOutput {
    fn commit(&mut self) {
        self.files
            .write()
            .insert(self.name.clone(), Arc::new(self.buffer.clone()));
    }
}

impl Write for MemoryOutput {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl StorageOutput for MemoryOutput {
    fn flush_and_sync(&mut self) -> Result<()> {
        self.commit();
        Ok(())
    }
}

impl Drop for MemoryOutput {
    fn drop(&mut self) {
        self.commit();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let storage = MemoryStorage::new();

        let mut output = storage.create_output("index/shard-0").unwrap();
        output.write_all(&[1, 2, 3]).unwrap();
        output.flush_and_sync().unwrap();
        drop(output);

        let mut input = storage.open_input("index/shard-0").unwrap();
        assert_eq!(input.size().unwrap(), 3);
        let mut buf = Vec::new();
        input.read_to_end(&mut buf).unwrap();
        assert_eq!(buf, vec![1, 2, 3]);
    }

    #[test]
    fn test_clone_shares_files() {
        let storage = MemoryStorage::new();
        let clone = storage.clone();

        let mut output = storage.create_output("a").unwrap();
        output.write_all(b"shared").unwrap();
        drop(output);

        assert!(clone.file_exists("a"));
    }

    #[test]
    fn test_missing_file() {
        let storage = MemoryStorage::new();
        assert!(storage.open_input("missing").is_err());
        assert!(storage.delete_file("missing").is_err());
    }
}
