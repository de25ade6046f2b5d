use crate::{
    cli::ChunkArgs,
    constants::CHUNK_FILE_EXTENSION,
    io::{line_reader::LineReader, line_writer::LineWriter},
    utils::util::{format_number_with_commas, Result},
};
use rec_spill_sort::{chunk_records, chunk_records_by_group, RecordSource};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Splits the input file's records across numbered chunk files.
///
/// With `--key-field` set, records sharing a key never straddle a chunk
/// boundary; without it the file is sliced purely by position. Chunk files
/// land in the output directory as `<prefix>NNNN.txt` in chunk order.
pub fn chunk(args: ChunkArgs) -> Result<()> {
    let mut reader = LineReader::from_path(args.input.as_path())?;
    let mut records: Vec<Vec<u8>> = Vec::new();
    while let Some(record) = reader.next_record()? {
        records.push(record);
    }
    let records_read = records.len();

    let chunks = match args.key_field {
        Some(key_field) => {
            let delimiter = args.delimiter as u8;
            chunk_records_by_group(records, args.max_records, args.grouped, |record: &Vec<u8>| {
                field_key(record.as_slice(), key_field, delimiter)
            })?
        }
        None => chunk_records(records, args.max_records)?,
    };

    fs::create_dir_all(args.output_dir.as_path()).map_err(|error| {
        crate::sortx_error!(
            "Failed to create output directory {}: {}",
            args.output_dir.display(),
            error
        )
    })?;

    for (chunk_index, chunk) in chunks.iter().enumerate() {
        let path = chunk_file_path(args.output_dir.as_path(), args.prefix.as_str(), chunk_index);
        let mut writer = LineWriter::from_path(path.as_path())?;
        for record in chunk {
            writer.write_record(record.as_slice())?;
        }
        writer.finish()?;
    }

    log::info!(
        "Split {} records into {} chunks under {}",
        format_number_with_commas(records_read),
        chunks.len(),
        args.output_dir.display()
    );
    Ok(())
}

/// Extracts the 1-based key field from a delimited record. Records without
/// that many fields key on the empty byte string, so they all group
/// together; field 0 is below the valid range and also keys on the empty
/// byte string.
fn field_key(record: &[u8], key_field: usize, delimiter: u8) -> Vec<u8> {
    let Some(field_index) = key_field.checked_sub(1) else {
        return Vec::new();
    };
    record
        .split(|byte| *byte == delimiter)
        .nth(field_index)
        .map(|field| field.to_vec())
        .unwrap_or_default()
}

fn chunk_file_path(output_dir: &Path, prefix: &str, chunk_index: usize) -> PathBuf {
    output_dir.join(format!("{prefix}{chunk_index:04}.{CHUNK_FILE_EXTENSION}"))
}
