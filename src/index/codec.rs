//! Binary shard serialization.
//!
//! One shard per file, fixed-width little-endian integers, explicit
//! length prefixes, no delimiters:
//!
//! ```text
//! Shard := entry_count:i32, Entry{entry_count}
//! Entry := term_id:i32, posting_count:i32, doc_id:i32{posting_count}
//! ```
//!
//! Encoding and decoding round-trip exactly. Decoding fails with
//! [`CallaError::CorruptShard`] when a declared count does not match the
//! bytes available instead of reading out of bounds.

use std::io::{Read, Write};
use std::sync::Arc;

use crate::error::{CallaError, Result};
use crate::index::{PostingEntry, Shard};
use crate::storage::Storage;
use crate::storage::structured::{StructReader, StructWriter};

/// Serialize a shard to an output stream.
pub fn write_shard<W: Write>(shard: &Shard, writer: &mut StructWriter<W>) -> Result<()> {
    writer.write_i32(shard.entries.len() as i32)?;
    for entry in &shard.entries {
        writer.write_i32(entry.term_id)?;
        writer.write_i32(entry.postings.len() as i32)?;
        for &doc_id in &entry.postings {
            writer.write_i32(doc_id)?;
        }
    }
    Ok(())
}

/// Deserialize a shard from an input stream.
pub fn read_shard<R: Read>(reader: &mut StructReader<R>) -> Result<Shard> {
    let entry_count = read_count(reader, "entry count")?;

    let mut entries = Vec::with_capacity(entry_count.min(4_096));
    for _ in 0..entry_count {
        let term_id = read_value(reader, "term id")?;
        let posting_count = read_count(reader, "posting count")?;

        // The declared count is untrusted until the bytes are read, so
        // the reservation is capped.
        let mut postings = Vec::with_capacity(posting_count.min(4_096));
        for _ in 0..posting_count {
            postings.push(read_value(reader, "doc id")?);
        }
        entries.push(PostingEntry { term_id, postings });
    }

    Ok(Shard { entries })
}

/// Write a shard to a storage file, flushed and synced.
pub fn write_shard_file(storage: &Arc<dyn Storage>, name: &str, shard: &Shard) -> Result<()> {
    let output = storage.create_output(name)?;
    let mut writer = StructWriter::new(output);
    write_shard(shard, &mut writer)?;
    writer.get_mut().flush_and_sync()?;
    Ok(())
}

/// Read a shard from a storage file.
pub fn read_shard_file(storage: &Arc<dyn Storage>, name: &str) -> Result<Shard> {
    let input = storage.open_input(name)?;
    let mut reader = StructReader::new(input);
    read_shard(&mut reader)
}

fn read_value<R: Read>(reader: &mut StructReader<R>, what: &str) -> Result<i32> {
    reader.read_i32().map_err(|err| match err {
        CallaError::Io(io) if io.kind() == std::io::ErrorKind::UnexpectedEof => {
            CallaError::corrupt_shard(format!("truncated before {what}"))
        }
        other => other,
    })
}

fn read_count<R: Read>(reader: &mut StructReader<R>, what: &str) -> Result<usize> {
    let count = read_value(reader, what)?;
    if count < 0 {
        return Err(CallaError::corrupt_shard(format!("negative {what}: {count}")));
    }
    Ok(count as usize)
}
