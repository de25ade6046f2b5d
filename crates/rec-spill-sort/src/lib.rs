//! Record sorting with bounded memory.
//!
//! Inputs that fit the caller's memory budget are sorted in one pass with
//! [`sort_in_memory`]; larger inputs go through [`SortJob`], which spills
//! sorted runs to temporary storage and merges them back in key order.
//! [`select_engine`] routes between the two from a byte estimate of the
//! input. [`chunk_records_by_group`] splits record sets into bounded chunks
//! without separating records that share a key.

pub mod chunk;
pub mod error;
pub mod sort;

pub use crate::chunk::{chunk_records, chunk_records_by_group};
pub use crate::error::{Result, SortError};
pub use crate::sort::{
    natural_order, select_engine, sort_in_memory, EngineKind, RecordCodec, RecordSource,
    SortConfig, SortJob, SortReport, DEFAULT_IN_MEMORY_THRESHOLD_BYTES, DEFAULT_RUN_SIZE,
};
