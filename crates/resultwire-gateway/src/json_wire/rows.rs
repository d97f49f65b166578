//! Row sources handed to producers by the result-batching layer

use arrow_array::RecordBatch;

use super::column::OutputColumn;

/// What a producer needs to know about the rows of one call
pub trait RowSource {
    /// No rows to send this round
    fn is_empty(&self) -> bool;

    /// Output columns, absent when upstream has not described the result yet
    fn output_columns(&self) -> Option<&[OutputColumn]>;

    /// Batches to encode, in delivery order
    fn batches(&self) -> &[RecordBatch];
}

/// The rows fetched for one produce call
#[derive(Debug, Clone, Default)]
pub struct QueryResultRows {
    columns: Option<Vec<OutputColumn>>,
    batches: Vec<RecordBatch>,
}

impl QueryResultRows {
    pub fn new(columns: Vec<OutputColumn>, batches: Vec<RecordBatch>) -> Self {
        Self {
            columns: Some(columns),
            batches,
        }
    }

    /// Nothing fetched and no column description
    pub fn empty() -> Self {
        Self::default()
    }

    /// Batches without a column description (upstream inconsistency)
    pub fn without_columns(batches: Vec<RecordBatch>) -> Self {
        Self {
            columns: None,
            batches,
        }
    }

    pub fn total_rows(&self) -> usize {
        self.batches.iter().map(RecordBatch::num_rows).sum()
    }
}

impl RowSource for QueryResultRows {
    fn is_empty(&self) -> bool {
        self.batches.iter().all(|batch| batch.num_rows() == 0)
    }

    fn output_columns(&self) -> Option<&[OutputColumn]> {
        self.columns.as_deref()
    }

    fn batches(&self) -> &[RecordBatch] {
        &self.batches
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow_array::Int32Array;
    use arrow_schema::{DataType, Field, Schema};
    use std::sync::Arc;

    fn int_batch(values: Vec<i32>) -> RecordBatch {
        let schema = Schema::new(vec![Field::new("v", DataType::Int32, true)]);
        RecordBatch::try_new(Arc::new(schema), vec![Arc::new(Int32Array::from(values))]).unwrap()
    }

    #[test]
    fn test_empty_batches_count_as_empty() {
        assert!(QueryResultRows::empty().is_empty());

        let columns = vec![OutputColumn::new("v", DataType::Int32, 0)];
        let rows = QueryResultRows::new(columns, vec![int_batch(vec![]), int_batch(vec![])]);
        assert!(rows.is_empty());
        assert_eq!(rows.total_rows(), 0);
    }

    #[test]
    fn test_rows_present() {
        let columns = vec![OutputColumn::new("v", DataType::Int32, 0)];
        let rows = QueryResultRows::new(columns, vec![int_batch(vec![]), int_batch(vec![1, 2])]);
        assert!(!rows.is_empty());
        assert_eq!(rows.total_rows(), 2);
        assert_eq!(rows.output_columns().map(|c| c.len()), Some(1));
    }

    #[test]
    fn test_without_columns() {
        let rows = QueryResultRows::without_columns(vec![int_batch(vec![1])]);
        assert!(!rows.is_empty());
        assert!(rows.output_columns().is_none());
    }
}
