use crate::{
    cli::SortArgs,
    io::{line_codec::LineCodec, line_reader::LineReader, line_writer::LineWriter},
    utils::util::{format_number_with_commas, Result},
};
use rec_spill_sort::{SortConfig, SortError, SortJob, SortReport};
use std::{
    cmp::Ordering,
    fs,
    path::Path,
};

/// Sorts the input file's records into the requested destination.
///
/// The engine choice is driven by the input file's on-disk size: at or below
/// `--max-mem` bytes the whole file sorts in memory, above it records spill
/// into sorted runs and merge back. File size only approximates the encoded
/// record bytes, so `--max-mem` is a routing knob, not a hard memory cap.
pub fn sort(args: SortArgs) -> Result<()> {
    let estimated_input_bytes = fs::metadata(args.input.as_path())
        .map_err(|error| {
            crate::sortx_error!(
                "Failed to read metadata for {}: {}",
                args.input.display(),
                error
            )
        })?
        .len();
    log::debug!(
        "Input {} estimated at {} bytes",
        args.input.display(),
        estimated_input_bytes
    );

    let report = if args.in_place {
        sort_in_place(&args, estimated_input_bytes)?
    } else if let Some(output) = args.output.as_ref() {
        // Opening the output truncates it, which would destroy an input
        // given as its own destination.
        if output == &args.input {
            return Err(crate::sortx_error!(
                "Output {} is the input file; use --in-place to sort a file onto itself",
                output.display()
            ));
        }
        let writer = LineWriter::from_path(output.as_path())?;
        run_sort_job(&args, estimated_input_bytes, writer)?
    } else {
        let writer = LineWriter::from_stdout();
        run_sort_job(&args, estimated_input_bytes, writer)?
    };

    log::info!(
        "Sorted {} records, emitted {} ({} engine, {} spill runs)",
        format_number_with_commas(report.records_read),
        format_number_with_commas(report.records_emitted),
        report.engine.name(),
        report.runs_written
    );
    Ok(())
}

fn run_sort_job(
    args: &SortArgs,
    estimated_input_bytes: u64,
    mut writer: LineWriter,
) -> Result<SortReport> {
    let config = SortConfig::new(
        args.run_size,
        args.max_mem,
        args.unique,
        args.tmp_dir.clone(),
    )?;
    let job = SortJob::new(config, LineCodec, line_order(args.reverse))?;
    let mut source = LineReader::from_path(args.input.as_path())?;

    let emit = |record: &Vec<u8>| {
        writer
            .write_record(record.as_slice())
            .map_err(SortError::from)
    };
    let report = if args.force_external {
        job.execute_external(&mut source, emit)?
    } else {
        job.execute(&mut source, emit, estimated_input_bytes)?
    };

    writer.finish()?;
    Ok(report)
}

// Capture-free closures coerce to one fn type, so both directions share a
// single SortJob instantiation.
fn line_order(reverse: bool) -> fn(&Vec<u8>, &Vec<u8>) -> Ordering {
    if reverse {
        |a, b| b.cmp(a)
    } else {
        |a, b| a.cmp(b)
    }
}

/// Sorts into a staging file next to the input, then renames it over the
/// input only after the sort fully succeeded. A failed sort leaves the input
/// untouched.
fn sort_in_place(args: &SortArgs, estimated_input_bytes: u64) -> Result<SortReport> {
    let input_dir = match args.input.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let staged = tempfile::Builder::new()
        .prefix(".sortx-")
        .suffix(".tmp")
        .tempfile_in(input_dir)
        .map_err(|error| {
            crate::sortx_error!(
                "Failed to create staging file in {}: {}",
                input_dir.display(),
                error
            )
        })?;

    let writer = LineWriter::from_path(staged.path())?;
    let report = run_sort_job(args, estimated_input_bytes, writer)?;

    staged.persist(args.input.as_path()).map_err(|error| {
        crate::sortx_error!(
            "Failed to replace {} with sorted output: {}",
            args.input.display(),
            error
        )
    })?;
    Ok(report)
}
