//! Output column descriptors

use arrow_schema::{DataType, Schema};

/// A declared result column and where its data lives inside a batch
///
/// Position in the output list is the column's identity; `source_channel` is
/// only the storage location and may be in any order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputColumn {
    name: String,
    data_type: DataType,
    source_channel: usize,
}

impl OutputColumn {
    pub fn new(name: impl Into<String>, data_type: DataType, source_channel: usize) -> Self {
        Self {
            name: name.into(),
            data_type,
            source_channel,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data_type(&self) -> &DataType {
        &self.data_type
    }

    pub fn source_channel(&self) -> usize {
        self.source_channel
    }
}

/// One output column per schema field, channel = field index
pub fn output_columns_from_schema(schema: &Schema) -> Vec<OutputColumn> {
    schema
        .fields()
        .iter()
        .enumerate()
        .map(|(channel, field)| OutputColumn::new(field.name().clone(), field.data_type().clone(), channel))
        .collect()
}
