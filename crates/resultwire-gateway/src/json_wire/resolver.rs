//! Type encoder resolution
//!
//! Turns the output column list of a result-set into one [`TypeEncoder`] per
//! column plus the batch channel each column reads from. Producers resolve once
//! per result-set and reuse the result for every subsequent batch group.

use arrow_schema::DataType;
use resultwire_common::{Result, ResultWireError};

use super::column::OutputColumn;
use super::type_encoders::TypeEncoder;

/// Per-column strategies and source channels, in output-column order
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedEncoders {
    encoders: Vec<TypeEncoder>,
    channels: Vec<usize>,
    /// Declared types the encoders were resolved for
    types: Vec<DataType>,
}

impl ResolvedEncoders {
    pub fn encoders(&self) -> &[TypeEncoder] {
        &self.encoders
    }

    pub fn channels(&self) -> &[usize] {
        &self.channels
    }

    /// Declared types, in output-column order
    pub fn types(&self) -> &[DataType] {
        &self.types
    }

    pub fn column_count(&self) -> usize {
        self.encoders.len()
    }

    /// Fails if `columns` no longer has the shape these encoders were built for
    pub fn check_shape(&self, columns: &[OutputColumn]) -> Result<()> {
        if columns.len() != self.types.len() {
            return Err(ResultWireError::invariant(format!(
                "output columns changed from {} to {} columns within one result set",
                self.types.len(),
                columns.len()
            )));
        }
        for (idx, (column, resolved)) in columns.iter().zip(&self.types).enumerate() {
            if column.data_type() != resolved {
                return Err(ResultWireError::invariant(format!(
                    "output column {} ('{}') changed type from {} to {} within one result set",
                    idx,
                    column.name(),
                    resolved,
                    column.data_type()
                )));
            }
        }
        Ok(())
    }
}

/// Resolves the encoding strategy for a column list
pub trait EncoderResolver {
    fn resolve(&self, columns: &[OutputColumn]) -> Result<ResolvedEncoders>;
}

/// Default resolver keyed on declared Arrow types
#[derive(Debug, Clone, Copy, Default)]
pub struct ArrowTypeResolver;

impl EncoderResolver for ArrowTypeResolver {
    fn resolve(&self, columns: &[OutputColumn]) -> Result<ResolvedEncoders> {
        create_type_encoders(columns)
    }
}

/// Build encoders and channels for `columns`
pub fn create_type_encoders(columns: &[OutputColumn]) -> Result<ResolvedEncoders> {
    let encoders = columns
        .iter()
        .map(|column| {
            TypeEncoder::for_type(column.data_type()).map_err(|detail| {
                ResultWireError::UnsupportedType {
                    column: column.name().to_string(),
                    data_type: detail,
                }
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(ResolvedEncoders {
        encoders,
        channels: columns.iter().map(OutputColumn::source_channel).collect(),
        types: columns.iter().map(|column| column.data_type().clone()).collect(),
    })
}
