use std::io::Write;

use anyhow::{Context, Result};
use skipstore_core::SkipIndex;
use tracing::info;

use crate::args::Args;

/// Load the data file, exercise the index and report to `out`
pub fn run<W: Write>(args: &Args, out: &mut W) -> Result<()> {
    let config = args.index_config()?;
    let index: SkipIndex<i64, String> = SkipIndex::new(config)?;

    let report = index
        .load(&args.file)
        .with_context(|| format!("failed to load {}", args.file.display()))?;
    info!(
        "Loaded {} records ({} duplicates, {} skipped)",
        report.inserted, report.duplicates, report.skipped
    );
    writeln!(out, "size = {}", index.size())?;

    for key in [1, 5] {
        match index.search(&key) {
            Some(value) => writeln!(out, "Found key: {key}, value: {value}")?,
            None => writeln!(out, "Not found key: {key}")?,
        }
    }

    write!(out, "{index}")?;

    let store_file = &index.config().store_file;
    let written = index
        .dump()
        .with_context(|| format!("failed to dump to {}", store_file.display()))?;
    writeln!(out, "Dumped {written} records to {}", store_file.display())?;

    for key in [3, 9] {
        writeln!(out, "delete {key}: {:?}", index.delete(&key))?;
    }
    writeln!(out, "size = {}", index.size())?;

    Ok(())
}
