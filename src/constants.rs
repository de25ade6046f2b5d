pub const DEFAULT_CHUNK_PREFIX: &str = "chunk_";
pub const DEFAULT_KEY_DELIMITER: char = '\t';
pub const CHUNK_FILE_EXTENSION: &str = "txt";
