//! Batch → JSON document traversal
//!
//! Output shape: one outer array, one inner array per row, one value per
//! output column. Batches are visited in the order given, rows in storage
//! order, and columns in output-column order (never source-channel order),
//! so identical input always yields identical bytes.

use arrow_array::{Array, RecordBatch};
use arrow_schema::DataType;
use resultwire_common::{ValueEncodeError, ValueErrorKind};
use std::io::{self, Write};

use super::column::OutputColumn;
use super::generator::JsonGenerator;
use super::resolver::ResolvedEncoders;
use super::type_encoders::CellError;

/// Why a traversal stopped early
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    /// A single cell could not be rendered
    #[error(transparent)]
    Value(#[from] ValueEncodeError),

    /// Writing to the generator failed
    #[error("JSON generation failed: {0}")]
    Generation(#[from] io::Error),

    /// A batch does not carry a column the encoders were resolved for
    #[error("{0}")]
    MissingChannel(String),
}

/// Write every row of `batches` into `generator` as a JSON array of rows
///
/// Returns the number of rows written. The document is left open on error;
/// callers must discard it.
pub fn write_batches_to_json<W: Write>(
    generator: &mut JsonGenerator<W>,
    columns: &[OutputColumn],
    resolved: &ResolvedEncoders,
    batches: &[RecordBatch],
) -> Result<usize, EncodeError> {
    let mut rows_written = 0;

    generator.write_start_array()?;
    for (batch_idx, batch) in batches.iter().enumerate() {
        // Look up each channel once per batch, not once per cell
        let arrays = resolved
            .channels()
            .iter()
            .map(|&channel| {
                batch.columns().get(channel).map(|c| c.as_ref()).ok_or_else(|| {
                    EncodeError::MissingChannel(format!(
                        "batch {} has {} columns but channel {} was requested",
                        batch_idx,
                        batch.num_columns(),
                        channel
                    ))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        if batch.num_rows() > 0 {
            check_array_types(columns, resolved.types(), &arrays, batch_idx)?;
        }

        for row_idx in 0..batch.num_rows() {
            generator.write_start_array()?;
            for (column_idx, (encoder, array)) in resolved.encoders().iter().zip(&arrays).enumerate() {
                encoder
                    .encode(generator, *array, row_idx)
                    .map_err(|err| match err {
                        CellError::Generation(e) => EncodeError::Generation(e),
                        CellError::Value(kind) => {
                            value_error(columns, batch_idx, row_idx, column_idx, kind)
                        }
                    })?;
            }
            generator.write_end_array()?;
            rows_written += 1;
        }
    }
    generator.write_end_array()?;
    generator.flush()?;

    Ok(rows_written)
}

/// Every channel must hold the declared type, whatever its cells contain.
/// A mismatch is reported at the first row of the batch.
fn check_array_types(
    columns: &[OutputColumn],
    declared: &[DataType],
    arrays: &[&dyn Array],
    batch_idx: usize,
) -> Result<(), EncodeError> {
    for (column_idx, (expected, array)) in declared.iter().zip(arrays).enumerate() {
        if !array.data_type().equals_datatype(expected) {
            let kind = ValueErrorKind::TypeMismatch {
                expected: expected.to_string(),
                actual: array.data_type().to_string(),
            };
            return Err(value_error(columns, batch_idx, 0, column_idx, kind));
        }
    }
    Ok(())
}

fn value_error(
    columns: &[OutputColumn],
    batch_index: usize,
    row_index: usize,
    column_index: usize,
    kind: ValueErrorKind,
) -> EncodeError {
    let column = columns.get(column_index);
    EncodeError::Value(ValueEncodeError {
        batch_index,
        row_index,
        column_index,
        column_name: column.map(|c| c.name().to_string()).unwrap_or_default(),
        data_type: column.map(|c| c.data_type().to_string()).unwrap_or_default(),
        kind,
    })
}
