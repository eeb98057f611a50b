//! Space-delimited CSV reading and writing of dataset records.
use std::io;

use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use toponet_core::Position;

use crate::error::DatasetError;
use crate::preprocess::Target;
use crate::record::{DatasetRecord, header};

/// Cell delimiter of every dataset file.
pub const DELIMITER: u8 = b' ';

/// Writes `records` under a `X1 Y1 … Cn` header.
///
/// Writes nothing at all when `records` is empty.
///
/// # Errors
///
/// - [`DatasetError::AgentCount`] if a record's positions and labels differ
///   in length, or records disagree on the agent count.
/// - [`DatasetError::Csv`] / [`DatasetError::Io`] on write failure.
pub fn write_dataset<W: io::Write>(
    writer: W,
    records: &[DatasetRecord],
) -> Result<(), DatasetError> {
    let Some(first) = records.first() else {
        return Ok(());
    };
    let agents = first.agents();

    let mut out = WriterBuilder::new().delimiter(DELIMITER).from_writer(writer);
    out.write_record(header(agents))?;
    for (i, record) in records.iter().enumerate() {
        check_width(i + 1, record, agents)?;
        out.write_record(record.to_row())?;
    }
    out.flush()?;
    Ok(())
}

/// Writes the coordinates `X1 Y1 … Yn` of `records` followed by the columns
/// of `target`.
///
/// Writes nothing at all when `records` is empty.
///
/// # Errors
///
/// - [`DatasetError::AgentCount`] as for [`write_dataset`].
/// - The errors of [`Target::cells`].
/// - [`DatasetError::Csv`] / [`DatasetError::Io`] on write failure.
pub fn write_targets<W: io::Write>(
    writer: W,
    records: &[DatasetRecord],
    target: Target,
) -> Result<(), DatasetError> {
    let Some(first) = records.first() else {
        return Ok(());
    };
    let agents = first.agents();
    for (i, record) in records.iter().enumerate() {
        check_width(i + 1, record, agents)?;
    }
    let cells = target.cells(records)?;

    let mut columns = header(agents);
    columns.truncate(2 * agents);
    columns.extend(target.columns(agents));

    let mut out = WriterBuilder::new().delimiter(DELIMITER).from_writer(writer);
    out.write_record(columns)?;
    for (record, targets) in records.iter().zip(cells) {
        let mut row = record.to_row();
        row.truncate(2 * agents);
        row.extend(targets.iter().map(u32::to_string));
        out.write_record(row)?;
    }
    out.flush()?;
    Ok(())
}

/// Reads records written by [`write_dataset`].
///
/// The agent count is taken from the header. Empty input yields no records.
///
/// # Errors
///
/// - [`DatasetError::Header`] if the header is not a dataset header.
/// - [`DatasetError::RaggedRow`] if a row's width differs from the header.
/// - [`DatasetError::InvalidCell`] if a coordinate is not a number or a label
///   is not a non-negative integer.
/// - [`DatasetError::Csv`] on malformed CSV.
pub fn read_dataset<R: io::Read>(reader: R) -> Result<Vec<DatasetRecord>, DatasetError> {
    let mut input = ReaderBuilder::new()
        .delimiter(DELIMITER)
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let columns = input.headers()?.clone();
    if columns.is_empty() {
        return Ok(Vec::new());
    }
    let agents = parse_header(&columns)?;

    let mut records = Vec::new();
    for (i, row) in input.records().enumerate() {
        records.push(parse_row(i + 1, &row?, &columns, agents)?);
    }
    tracing::debug!(records = records.len(), agents, "dataset read");
    Ok(records)
}

fn check_width(record: usize, r: &DatasetRecord, agents: usize) -> Result<(), DatasetError> {
    for found in [r.positions.len(), r.labels.len()] {
        if found != agents {
            return Err(DatasetError::AgentCount {
                record,
                expected: agents,
                found,
            });
        }
    }
    Ok(())
}

fn parse_header(columns: &StringRecord) -> Result<usize, DatasetError> {
    let width = columns.len();
    if width % 3 != 0 {
        return Err(DatasetError::Header {
            detail: format!("{width} columns is not a multiple of three"),
        });
    }
    let agents = width / 3;
    let expected = header(agents);
    if let Some((got, want)) = columns
        .iter()
        .zip(&expected)
        .find(|(got, want)| *got != want.as_str())
    {
        return Err(DatasetError::Header {
            detail: format!("found column {got:?} where {want:?} was expected"),
        });
    }
    Ok(agents)
}

fn parse_row(
    row: usize,
    cells: &StringRecord,
    columns: &StringRecord,
    agents: usize,
) -> Result<DatasetRecord, DatasetError> {
    if cells.len() != columns.len() {
        return Err(DatasetError::RaggedRow {
            row,
            expected: columns.len(),
            found: cells.len(),
        });
    }

    let cell = |i: usize| -> (&str, &str) {
        (
            cells.get(i).unwrap_or_default(),
            columns.get(i).unwrap_or_default(),
        )
    };
    let invalid = |i: usize, expected: &'static str| {
        let (value, column) = cell(i);
        DatasetError::InvalidCell {
            row,
            column: column.to_owned(),
            value: value.to_owned(),
            expected,
        }
    };
    let coordinate = |i: usize| -> Result<f64, DatasetError> {
        cell(i)
            .0
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| invalid(i, "coordinate"))
    };

    let mut positions = Vec::with_capacity(agents);
    for k in 0..agents {
        positions.push(Position::new(coordinate(2 * k)?, coordinate(2 * k + 1)?));
    }

    let mut labels = Vec::with_capacity(agents);
    for k in 0..agents {
        let i = 2 * agents + k;
        labels.push(parse_label(cell(i).0).ok_or_else(|| invalid(i, "label"))?);
    }

    Ok(DatasetRecord { positions, labels })
}

/// Accepts integral labels, including the `3.0` form some tools write.
fn parse_label(raw: &str) -> Option<u32> {
    if let Ok(label) = raw.parse::<u32>() {
        return Some(label);
    }
    let value = raw.parse::<f64>().ok()?;
    let in_range = value.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(&value);
    in_range.then_some(value as u32)
}
