use crate::backup::RunResult;
use std::io::{self, Write};

/// Print the end-of-run summary block
pub fn write_summary<W: Write>(result: &RunResult, out: &mut W) -> io::Result<()> {
    let failed = result.failed_files();

    if failed.is_empty() {
        writeln!(out, "All files renamed successfully.")?;
        return Ok(());
    }

    writeln!(
        out,
        "{} of {} files not renamed.",
        failed.len(),
        result.total_files
    )?;
    writeln!(out, "The following files were not renamed:")?;
    writeln!(out)?;
    for name in failed {
        writeln!(out, "{name}")?;
    }

    Ok(())
}

/// Failure reasons, one line per failed entry
pub fn write_failure_details<W: Write>(result: &RunResult, out: &mut W) -> io::Result<()> {
    for (name, failure) in result.failures() {
        writeln!(out, "  {}: {failure}", name.to_string_lossy())?;
    }
    Ok(())
}
