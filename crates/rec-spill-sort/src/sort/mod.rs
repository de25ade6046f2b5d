mod config;
mod external;
mod memory;
mod merge;
mod run_format;
mod run_reader;
mod run_writer;
mod runs;
mod select;
mod traits;

pub use config::{SortConfig, DEFAULT_IN_MEMORY_THRESHOLD_BYTES, DEFAULT_RUN_SIZE};
pub use external::{SortJob, SortReport};
pub use memory::sort_in_memory;
pub use select::{select_engine, EngineKind};
pub use traits::{natural_order, RecordCodec, RecordSource};
