// Table writers for sweep results.

use std::io;
use std::path::Path;

use csv::{Terminator, WriterBuilder};

use crate::error::Result;
use crate::sweep::{SizeResult, TemperatureResult};

/// Write `L chi std` lines, space separated, no header.
pub fn write_size_table<W: io::Write>(writer: W, rows: &[SizeResult]) -> Result<()> {
    let mut wtr = WriterBuilder::new()
        .delimiter(b' ')
        .has_headers(false)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(writer);
    for r in rows {
        wtr.write_record(&[r.size.to_string(), r.mean.to_string(), r.std.to_string()])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_size_table_to_path<P: AsRef<Path>>(path: P, rows: &[SizeResult]) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_size_table(io::BufWriter::new(file), rows)
}

/// Headered CSV, one row per temperature.
pub fn write_temperature_csv<W: io::Write>(writer: W, rows: &[TemperatureResult]) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_writer(writer);
    wtr.write_record([
        "temperature",
        "mean_energy",
        "mean_msquare",
        "specific_heat",
        "susceptibility",
        "acceptance_ratio",
    ])?;
    for r in rows {
        wtr.write_record(&[
            r.temperature.to_string(),
            r.mean_energy.to_string(),
            r.mean_msquare.to_string(),
            r.specific_heat.to_string(),
            r.susceptibility.to_string(),
            r.acceptance_ratio.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_temperature_csv_to_path<P: AsRef<Path>>(path: P, rows: &[TemperatureResult]) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_temperature_csv(io::BufWriter::new(file), rows)
}
