//! Splitting record sets into bounded chunks.
//!
//! [`chunk_records_by_group`] keeps records that share a key in the same
//! chunk; [`chunk_records`] slices without looking at keys.

use crate::{Result, SortError};
use std::mem;

/// Splits records into chunks of exactly `max_chunk_len` records, except
/// possibly the last. Input order is preserved.
pub fn chunk_records<T>(records: Vec<T>, max_chunk_len: usize) -> Result<Vec<Vec<T>>> {
    ensure_chunk_bound(max_chunk_len)?;

    let mut chunks = Vec::new();
    let mut chunk = Vec::new();
    for record in records {
        chunk.push(record);
        if chunk.len() == max_chunk_len {
            chunks.push(mem::take(&mut chunk));
        }
    }
    if !chunk.is_empty() {
        chunks.push(chunk);
    }
    Ok(chunks)
}

/// Splits records into chunks of at most `max_chunk_len` records without
/// separating records that share a group key.
///
/// With `already_grouped` set, records are taken as-is and a group is any
/// maximal stretch of equal keys; chunk order follows input order. Otherwise
/// the records are first reordered by key; the reorder is stable, so records
/// keep their original order within each group. Chunks are packed greedily:
/// a group goes into the current chunk when it fits, else the chunk is
/// sealed and the group starts the next one. A single group larger than
/// `max_chunk_len` fits nowhere and fails with
/// [`SortError::ChunkTooSmall`] naming both sizes.
pub fn chunk_records_by_group<T, K, KeyFn>(
    records: Vec<T>,
    max_chunk_len: usize,
    already_grouped: bool,
    group_key: KeyFn,
) -> Result<Vec<Vec<T>>>
where
    K: Ord,
    KeyFn: Fn(&T) -> K,
{
    ensure_chunk_bound(max_chunk_len)?;

    let mut records = records;
    if !already_grouped {
        records.sort_by(|a, b| group_key(a).cmp(&group_key(b)));
    }

    let mut chunks = Vec::new();
    let mut chunk: Vec<T> = Vec::new();
    let mut group: Vec<T> = Vec::new();
    let mut current_key: Option<K> = None;

    for record in records {
        let key = group_key(&record);
        let starts_new_group = !matches!(current_key.as_ref(), Some(current) if *current == key);
        if starts_new_group {
            place_group(&mut chunks, &mut chunk, &mut group, max_chunk_len)?;
            current_key = Some(key);
        }
        group.push(record);
    }
    place_group(&mut chunks, &mut chunk, &mut group, max_chunk_len)?;
    if !chunk.is_empty() {
        chunks.push(chunk);
    }
    Ok(chunks)
}

// Groups move into a chunk whole; a chunk without room for the whole group
// is sealed first.
fn place_group<T>(
    chunks: &mut Vec<Vec<T>>,
    chunk: &mut Vec<T>,
    group: &mut Vec<T>,
    max_chunk_len: usize,
) -> Result<()> {
    if group.is_empty() {
        return Ok(());
    }
    if group.len() > max_chunk_len {
        return Err(SortError::ChunkTooSmall {
            group_len: group.len(),
            max_chunk_len,
        });
    }
    if !chunk.is_empty() && chunk.len() + group.len() > max_chunk_len {
        chunks.push(mem::take(chunk));
    }
    chunk.append(group);
    Ok(())
}

fn ensure_chunk_bound(max_chunk_len: usize) -> Result<()> {
    if max_chunk_len == 0 {
        return Err(SortError::invalid_config("max-chunk-len must be >= 1"));
    }
    Ok(())
}
