//! Arrow → JSON value encoders
//!
//! One [`TypeEncoder`] is resolved per output column from its declared Arrow
//! type. Encoding a cell writes exactly one JSON value into a
//! [`JsonGenerator`], reading straight from the Arrow array without an
//! intermediate `serde_json::Value`.
//!
//! ## Supported Types
//!
//! | Arrow Type                  | JSON                                  |
//! |-----------------------------|---------------------------------------|
//! | Null                        | `null`                                |
//! | Boolean                     | `true` / `false`                      |
//! | Int8-Int64, UInt8-UInt64    | number                                |
//! | Float32/Float64             | number, `"NaN"` / `"Infinity"`        |
//! | Utf8/LargeUtf8/Utf8View     | string                                |
//! | Binary variants             | base64 string                         |
//! | Date32/Date64               | `"YYYY-MM-DD"`                        |
//! | Time32/Time64               | `"HH:MM:SS[.fff]"`                    |
//! | Timestamp                   | `"YYYY-MM-DD HH:MM:SS[.fff][ zone]"`  |
//! | Decimal128                  | string with `scale` fraction digits   |
//! | List variants               | array                                 |
//! | Struct                      | array of field values                 |
//! | Map                         | object, keys rendered as strings      |
//!
//! Anything else is rejected at resolution time. A map cell whose keys render
//! to the same text twice is a value error, since JSON object keys are unique.

use arrow_array::timezone::Tz;
use arrow_array::{
    Array, BinaryArray, BinaryViewArray, BooleanArray, Date32Array, Date64Array, Decimal128Array,
    FixedSizeBinaryArray, FixedSizeListArray, Float32Array, Float64Array, Int16Array, Int32Array,
    Int64Array, Int8Array, LargeBinaryArray, LargeListArray, LargeStringArray, ListArray, MapArray,
    StringArray, StringViewArray, StructArray, Time32MillisecondArray, Time32SecondArray,
    Time64MicrosecondArray, Time64NanosecondArray, TimestampMicrosecondArray,
    TimestampMillisecondArray, TimestampNanosecondArray, TimestampSecondArray, UInt16Array,
    UInt32Array, UInt64Array, UInt8Array,
};
use arrow_schema::{DataType, TimeUnit};
use base64::{prelude::BASE64_STANDARD, Engine};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use resultwire_common::ValueErrorKind;
use std::collections::HashSet;
use std::fmt;
use std::io::{self, Write};
use std::sync::Arc;

use super::generator::JsonGenerator;

/// Days from 0001-01-01 (CE day 1) to 1970-01-01
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Failure while writing a single cell
#[derive(Debug)]
pub enum CellError {
    /// The value cannot be rendered for its declared type
    Value(ValueErrorKind),
    /// The generator or its buffer failed
    Generation(io::Error),
}

impl From<io::Error> for CellError {
    fn from(err: io::Error) -> Self {
        CellError::Generation(err)
    }
}

/// Time zone attached to a timestamp column
#[derive(Debug, Clone)]
pub struct ZoneEncoder {
    name: Arc<str>,
    tz: Tz,
}

impl ZoneEncoder {
    fn parse(name: &Arc<str>) -> Result<Self, String> {
        let tz = name
            .parse::<Tz>()
            .map_err(|e| format!("invalid time zone '{}': {}", name, e))?;
        Ok(Self {
            name: Arc::clone(name),
            tz,
        })
    }
}

impl PartialEq for ZoneEncoder {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

/// Encoding strategy for one declared column type
#[derive(Debug, Clone, PartialEq)]
pub enum TypeEncoder {
    Null,
    Boolean,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float32,
    Float64,
    Utf8,
    LargeUtf8,
    Utf8View,
    Binary,
    LargeBinary,
    BinaryView,
    FixedSizeBinary,
    Date32,
    Date64,
    Time32(TimeUnit),
    Time64(TimeUnit),
    Timestamp {
        unit: TimeUnit,
        zone: Option<ZoneEncoder>,
    },
    Decimal128 {
        scale: i8,
    },
    List(Box<TypeEncoder>),
    LargeList(Box<TypeEncoder>),
    FixedSizeList(Box<TypeEncoder>),
    /// Field encoders in field order
    Struct(Vec<TypeEncoder>),
    Map {
        key: Box<TypeEncoder>,
        value: Box<TypeEncoder>,
    },
}

impl TypeEncoder {
    /// Pick the strategy for a declared type
    ///
    /// Returns a description of the offending (possibly nested) type when no
    /// strategy exists.
    pub fn for_type(data_type: &DataType) -> Result<Self, String> {
        let encoder = match data_type {
            DataType::Null => TypeEncoder::Null,
            DataType::Boolean => TypeEncoder::Boolean,

            DataType::Int8 => TypeEncoder::Int8,
            DataType::Int16 => TypeEncoder::Int16,
            DataType::Int32 => TypeEncoder::Int32,
            DataType::Int64 => TypeEncoder::Int64,
            DataType::UInt8 => TypeEncoder::UInt8,
            DataType::UInt16 => TypeEncoder::UInt16,
            DataType::UInt32 => TypeEncoder::UInt32,
            DataType::UInt64 => TypeEncoder::UInt64,

            DataType::Float32 => TypeEncoder::Float32,
            DataType::Float64 => TypeEncoder::Float64,

            DataType::Utf8 => TypeEncoder::Utf8,
            DataType::LargeUtf8 => TypeEncoder::LargeUtf8,
            DataType::Utf8View => TypeEncoder::Utf8View,

            DataType::Binary => TypeEncoder::Binary,
            DataType::LargeBinary => TypeEncoder::LargeBinary,
            DataType::BinaryView => TypeEncoder::BinaryView,
            DataType::FixedSizeBinary(_) => TypeEncoder::FixedSizeBinary,

            DataType::Date32 => TypeEncoder::Date32,
            DataType::Date64 => TypeEncoder::Date64,
            DataType::Time32(unit @ (TimeUnit::Second | TimeUnit::Millisecond)) => {
                TypeEncoder::Time32(*unit)
            }
            DataType::Time64(unit @ (TimeUnit::Microsecond | TimeUnit::Nanosecond)) => {
                TypeEncoder::Time64(*unit)
            }
            DataType::Timestamp(unit, tz) => TypeEncoder::Timestamp {
                unit: *unit,
                zone: tz.as_ref().map(ZoneEncoder::parse).transpose()?,
            },

            DataType::Decimal128(_, scale) => TypeEncoder::Decimal128 { scale: *scale },

            DataType::List(field) => TypeEncoder::List(Box::new(Self::for_type(field.data_type())?)),
            DataType::LargeList(field) => {
                TypeEncoder::LargeList(Box::new(Self::for_type(field.data_type())?))
            }
            DataType::FixedSizeList(field, _) => {
                TypeEncoder::FixedSizeList(Box::new(Self::for_type(field.data_type())?))
            }
            DataType::Struct(fields) => TypeEncoder::Struct(
                fields
                    .iter()
                    .map(|field| Self::for_type(field.data_type()))
                    .collect::<Result<_, _>>()?,
            ),
            DataType::Map(entries, _) => {
                let (key_type, value_type) = match entries.data_type() {
                    DataType::Struct(kv) if kv.len() == 2 => (kv[0].data_type(), kv[1].data_type()),
                    other => return Err(format!("map entries must be a key/value struct, found {}", other)),
                };
                let key = Self::for_type(key_type)?;
                if !key.is_valid_map_key() {
                    return Err(format!("map key type {} cannot be a JSON object key", key_type));
                }
                TypeEncoder::Map {
                    key: Box::new(key),
                    value: Box::new(Self::for_type(value_type)?),
                }
            }

            other => return Err(other.to_string()),
        };
        Ok(encoder)
    }

    fn is_valid_map_key(&self) -> bool {
        matches!(
            self,
            TypeEncoder::Boolean
                | TypeEncoder::Int8
                | TypeEncoder::Int16
                | TypeEncoder::Int32
                | TypeEncoder::Int64
                | TypeEncoder::UInt8
                | TypeEncoder::UInt16
                | TypeEncoder::UInt32
                | TypeEncoder::UInt64
                | TypeEncoder::Utf8
                | TypeEncoder::LargeUtf8
                | TypeEncoder::Utf8View
        )
    }

    /// Write the value at `row_idx` of `array` as exactly one JSON value
    pub fn encode<W: Write>(
        &self,
        generator: &mut JsonGenerator<W>,
        array: &dyn Array,
        row_idx: usize,
    ) -> Result<(), CellError> {
        if matches!(self, TypeEncoder::Null) || array.is_null(row_idx) {
            generator.write_null()?;
            return Ok(());
        }

        match self {
            TypeEncoder::Null => generator.write_null()?,
            TypeEncoder::Boolean => {
                generator.write_bool(downcast::<BooleanArray>(array, "Boolean")?.value(row_idx))?
            }

            // Integer types
            TypeEncoder::Int8 => {
                generator.write_i64(downcast::<Int8Array>(array, "Int8")?.value(row_idx).into())?
            }
            TypeEncoder::Int16 => {
                generator.write_i64(downcast::<Int16Array>(array, "Int16")?.value(row_idx).into())?
            }
            TypeEncoder::Int32 => {
                generator.write_i64(downcast::<Int32Array>(array, "Int32")?.value(row_idx).into())?
            }
            TypeEncoder::Int64 => {
                generator.write_i64(downcast::<Int64Array>(array, "Int64")?.value(row_idx))?
            }
            TypeEncoder::UInt8 => {
                generator.write_u64(downcast::<UInt8Array>(array, "UInt8")?.value(row_idx).into())?
            }
            TypeEncoder::UInt16 => {
                generator.write_u64(downcast::<UInt16Array>(array, "UInt16")?.value(row_idx).into())?
            }
            TypeEncoder::UInt32 => {
                generator.write_u64(downcast::<UInt32Array>(array, "UInt32")?.value(row_idx).into())?
            }
            TypeEncoder::UInt64 => {
                generator.write_u64(downcast::<UInt64Array>(array, "UInt64")?.value(row_idx))?
            }

            // Float types
            TypeEncoder::Float32 => {
                generator.write_f32(downcast::<Float32Array>(array, "Float32")?.value(row_idx))?
            }
            TypeEncoder::Float64 => {
                generator.write_f64(downcast::<Float64Array>(array, "Float64")?.value(row_idx))?
            }

            // String types
            TypeEncoder::Utf8 => {
                generator.write_string(downcast::<StringArray>(array, "Utf8")?.value(row_idx))?
            }
            TypeEncoder::LargeUtf8 => generator
                .write_string(downcast::<LargeStringArray>(array, "LargeUtf8")?.value(row_idx))?,
            TypeEncoder::Utf8View => generator
                .write_string(downcast::<StringViewArray>(array, "Utf8View")?.value(row_idx))?,

            // Binary types
            TypeEncoder::Binary => {
                encode_base64(generator, downcast::<BinaryArray>(array, "Binary")?.value(row_idx))?
            }
            TypeEncoder::LargeBinary => encode_base64(
                generator,
                downcast::<LargeBinaryArray>(array, "LargeBinary")?.value(row_idx),
            )?,
            TypeEncoder::BinaryView => encode_base64(
                generator,
                downcast::<BinaryViewArray>(array, "BinaryView")?.value(row_idx),
            )?,
            TypeEncoder::FixedSizeBinary => encode_base64(
                generator,
                downcast::<FixedSizeBinaryArray>(array, "FixedSizeBinary")?.value(row_idx),
            )?,

            // Date/Time
            TypeEncoder::Date32 => {
                let days = downcast::<Date32Array>(array, "Date32")?.value(row_idx);
                let date = UNIX_EPOCH_DAYS_FROM_CE
                    .checked_add(days)
                    .and_then(NaiveDate::from_num_days_from_ce_opt)
                    .ok_or_else(|| out_of_range(days, "date"))?;
                generator.write_string(&date.format("%Y-%m-%d").to_string())?
            }
            TypeEncoder::Date64 => {
                let millis = downcast::<Date64Array>(array, "Date64")?.value(row_idx);
                let date = DateTime::from_timestamp_millis(millis)
                    .ok_or_else(|| out_of_range(millis, "date"))?
                    .date_naive();
                generator.write_string(&date.format("%Y-%m-%d").to_string())?
            }
            TypeEncoder::Time32(unit) | TypeEncoder::Time64(unit) => {
                let time = time_value(array, *unit, row_idx)?;
                generator.write_string(&time.format(time_format(*unit)).to_string())?
            }
            TypeEncoder::Timestamp { unit, zone } => {
                let instant = timestamp_value(array, *unit, row_idx)?;
                let format = timestamp_format(*unit);
                let rendered = match zone {
                    None => instant.naive_utc().format(format).to_string(),
                    Some(zone) => format!(
                        "{} {}",
                        instant.with_timezone(&zone.tz).format(format),
                        zone.name
                    ),
                };
                generator.write_string(&rendered)?
            }

            // Decimal
            TypeEncoder::Decimal128 { scale } => {
                let value = downcast::<Decimal128Array>(array, "Decimal128")?.value(row_idx);
                generator.write_string(&format_decimal128(value, *scale))?
            }

            // Nested
            TypeEncoder::List(element) => {
                let values = downcast::<ListArray>(array, "List")?.value(row_idx);
                encode_elements(generator, element, values.as_ref())?
            }
            TypeEncoder::LargeList(element) => {
                let values = downcast::<LargeListArray>(array, "LargeList")?.value(row_idx);
                encode_elements(generator, element, values.as_ref())?
            }
            TypeEncoder::FixedSizeList(element) => {
                let values = downcast::<FixedSizeListArray>(array, "FixedSizeList")?.value(row_idx);
                encode_elements(generator, element, values.as_ref())?
            }
            TypeEncoder::Struct(fields) => {
                let row = downcast::<StructArray>(array, "Struct")?;
                if row.num_columns() != fields.len() {
                    return Err(CellError::Value(ValueErrorKind::TypeMismatch {
                        expected: format!("Struct with {} fields", fields.len()),
                        actual: row.data_type().to_string(),
                    }));
                }
                generator.write_start_array()?;
                for (field, column) in fields.iter().zip(row.columns()) {
                    field.encode(generator, column.as_ref(), row_idx)?;
                }
                generator.write_end_array()?
            }
            TypeEncoder::Map { key, value } => {
                let entries = downcast::<MapArray>(array, "Map")?.value(row_idx);
                let (keys, values) = (entries.column(0), entries.column(1));
                let mut seen = HashSet::with_capacity(entries.len());
                generator.write_start_object()?;
                for entry in 0..entries.len() {
                    if keys.is_null(entry) {
                        return Err(CellError::Value(ValueErrorKind::NullMapKey));
                    }
                    let rendered = key.render_key(keys.as_ref(), entry)?;
                    if seen.contains(&rendered) {
                        return Err(CellError::Value(ValueErrorKind::DuplicateMapKey { key: rendered }));
                    }
                    generator.write_field_name(&rendered)?;
                    seen.insert(rendered);
                    value.encode(generator, values.as_ref(), entry)?;
                }
                generator.write_end_object()?
            }
        }
        Ok(())
    }

    /// Render a non-null map key as object key text
    fn render_key(&self, array: &dyn Array, row_idx: usize) -> Result<String, CellError> {
        let mut buffer = itoa::Buffer::new();
        let key = match self {
            TypeEncoder::Boolean => downcast::<BooleanArray>(array, "Boolean")?
                .value(row_idx)
                .to_string(),
            TypeEncoder::Int8 => buffer.format(downcast::<Int8Array>(array, "Int8")?.value(row_idx)).to_string(),
            TypeEncoder::Int16 => buffer.format(downcast::<Int16Array>(array, "Int16")?.value(row_idx)).to_string(),
            TypeEncoder::Int32 => buffer.format(downcast::<Int32Array>(array, "Int32")?.value(row_idx)).to_string(),
            TypeEncoder::Int64 => buffer.format(downcast::<Int64Array>(array, "Int64")?.value(row_idx)).to_string(),
            TypeEncoder::UInt8 => buffer.format(downcast::<UInt8Array>(array, "UInt8")?.value(row_idx)).to_string(),
            TypeEncoder::UInt16 => buffer.format(downcast::<UInt16Array>(array, "UInt16")?.value(row_idx)).to_string(),
            TypeEncoder::UInt32 => buffer.format(downcast::<UInt32Array>(array, "UInt32")?.value(row_idx)).to_string(),
            TypeEncoder::UInt64 => buffer.format(downcast::<UInt64Array>(array, "UInt64")?.value(row_idx)).to_string(),
            TypeEncoder::Utf8 => downcast::<StringArray>(array, "Utf8")?.value(row_idx).to_string(),
            TypeEncoder::LargeUtf8 => downcast::<LargeStringArray>(array, "LargeUtf8")?
                .value(row_idx)
                .to_string(),
            TypeEncoder::Utf8View => downcast::<StringViewArray>(array, "Utf8View")?
                .value(row_idx)
                .to_string(),
            other => {
                return Err(CellError::Value(ValueErrorKind::TypeMismatch {
                    expected: "scalar map key".to_string(),
                    actual: format!("{:?}", other),
                }))
            }
        };
        Ok(key)
    }
}

fn downcast<'a, T: Array + 'static>(array: &'a dyn Array, expected: &str) -> Result<&'a T, CellError> {
    array.as_any().downcast_ref::<T>().ok_or_else(|| {
        CellError::Value(ValueErrorKind::TypeMismatch {
            expected: expected.to_string(),
            actual: array.data_type().to_string(),
        })
    })
}

fn out_of_range<V: fmt::Display>(value: V, target: &'static str) -> CellError {
    CellError::Value(ValueErrorKind::OutOfRange {
        value: value.to_string(),
        target,
    })
}

#[inline]
fn encode_base64<W: Write>(generator: &mut JsonGenerator<W>, value: &[u8]) -> io::Result<()> {
    generator.write_string(&BASE64_STANDARD.encode(value))
}

fn encode_elements<W: Write>(
    generator: &mut JsonGenerator<W>,
    element: &TypeEncoder,
    values: &dyn Array,
) -> Result<(), CellError> {
    generator.write_start_array()?;
    for idx in 0..values.len() {
        element.encode(generator, values, idx)?;
    }
    generator.write_end_array()?;
    Ok(())
}

// ============= Temporal Helpers =============

fn timestamp_format(unit: TimeUnit) -> &'static str {
    match unit {
        TimeUnit::Second => "%Y-%m-%d %H:%M:%S",
        TimeUnit::Millisecond => "%Y-%m-%d %H:%M:%S%.3f",
        TimeUnit::Microsecond => "%Y-%m-%d %H:%M:%S%.6f",
        TimeUnit::Nanosecond => "%Y-%m-%d %H:%M:%S%.9f",
    }
}

fn time_format(unit: TimeUnit) -> &'static str {
    match unit {
        TimeUnit::Second => "%H:%M:%S",
        TimeUnit::Millisecond => "%H:%M:%S%.3f",
        TimeUnit::Microsecond => "%H:%M:%S%.6f",
        TimeUnit::Nanosecond => "%H:%M:%S%.9f",
    }
}

fn timestamp_value(array: &dyn Array, unit: TimeUnit, row_idx: usize) -> Result<DateTime<Utc>, CellError> {
    match unit {
        TimeUnit::Second => {
            let secs = downcast::<TimestampSecondArray>(array, "Timestamp(Second)")?.value(row_idx);
            DateTime::from_timestamp(secs, 0).ok_or_else(|| out_of_range(secs, "timestamp"))
        }
        TimeUnit::Millisecond => {
            let millis =
                downcast::<TimestampMillisecondArray>(array, "Timestamp(Millisecond)")?.value(row_idx);
            DateTime::from_timestamp_millis(millis).ok_or_else(|| out_of_range(millis, "timestamp"))
        }
        TimeUnit::Microsecond => {
            let micros =
                downcast::<TimestampMicrosecondArray>(array, "Timestamp(Microsecond)")?.value(row_idx);
            DateTime::from_timestamp_micros(micros).ok_or_else(|| out_of_range(micros, "timestamp"))
        }
        TimeUnit::Nanosecond => {
            let nanos =
                downcast::<TimestampNanosecondArray>(array, "Timestamp(Nanosecond)")?.value(row_idx);
            Ok(DateTime::from_timestamp_nanos(nanos))
        }
    }
}

fn time_value(array: &dyn Array, unit: TimeUnit, row_idx: usize) -> Result<NaiveTime, CellError> {
    // (whole seconds since midnight, sub-second nanos)
    let (raw, secs, nanos): (i64, i64, i64) = match unit {
        TimeUnit::Second => {
            let v = downcast::<Time32SecondArray>(array, "Time32(Second)")?.value(row_idx) as i64;
            (v, v, 0)
        }
        TimeUnit::Millisecond => {
            let v = downcast::<Time32MillisecondArray>(array, "Time32(Millisecond)")?.value(row_idx) as i64;
            (v, v.div_euclid(1_000), v.rem_euclid(1_000) * 1_000_000)
        }
        TimeUnit::Microsecond => {
            let v = downcast::<Time64MicrosecondArray>(array, "Time64(Microsecond)")?.value(row_idx);
            (v, v.div_euclid(1_000_000), v.rem_euclid(1_000_000) * 1_000)
        }
        TimeUnit::Nanosecond => {
            let v = downcast::<Time64NanosecondArray>(array, "Time64(Nanosecond)")?.value(row_idx);
            (v, v.div_euclid(1_000_000_000), v.rem_euclid(1_000_000_000))
        }
    };
    if raw < 0 {
        return Err(out_of_range(raw, "time"));
    }
    u32::try_from(secs)
        .ok()
        .and_then(|secs| NaiveTime::from_num_seconds_from_midnight_opt(secs, nanos as u32))
        .ok_or_else(|| out_of_range(raw, "time"))
}

// ============= Decimal128 =============

/// Decimal text with exactly `scale` fraction digits (negative scale multiplies)
fn format_decimal128(value: i128, scale: i8) -> String {
    let mut buffer = itoa::Buffer::new();
    let digits = buffer.format(value.unsigned_abs());
    let mut out = String::with_capacity(digits.len() + 3);
    if value < 0 {
        out.push('-');
    }

    if scale <= 0 {
        out.push_str(digits);
        if value != 0 {
            out.extend(std::iter::repeat('0').take(scale.unsigned_abs() as usize));
        }
        return out;
    }

    let scale = scale as usize;
    if digits.len() <= scale {
        // Value is less than 1, pad with zeros
        out.push_str("0.");
        out.extend(std::iter::repeat('0').take(scale - digits.len()));
        out.push_str(digits);
    } else {
        let (integer_part, decimal_part) = digits.split_at(digits.len() - scale);
        out.push_str(integer_part);
        out.push('.');
        out.push_str(decimal_part);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow_array::builder::{
        BooleanBuilder, FixedSizeListBuilder, Int32Builder, LargeListBuilder, ListBuilder, MapBuilder,
        StringBuilder,
    };
    use arrow_array::{ArrayRef, NullArray};
    use arrow_schema::{Field, Fields};

    fn encode_one(encoder: &TypeEncoder, array: &dyn Array, row_idx: usize) -> Result<String, CellError> {
        let mut generator = JsonGenerator::new(Vec::new());
        encoder.encode(&mut generator, array, row_idx)?;
        Ok(String::from_utf8(generator.into_inner()).unwrap())
    }

    fn value_kind(result: Result<String, CellError>) -> ValueErrorKind {
        match result {
            Err(CellError::Value(kind)) => kind,
            other => panic!("expected value error, got {:?}", other),
        }
    }

    #[test]
    fn test_for_type_rejects_unsupported() {
        assert!(TypeEncoder::for_type(&DataType::Float16).is_err());
        assert!(TypeEncoder::for_type(&DataType::Time32(TimeUnit::Microsecond)).is_err());
        let nested = DataType::List(Arc::new(Field::new("item", DataType::Float16, true)));
        assert_eq!(TypeEncoder::for_type(&nested).unwrap_err(), "Float16");
    }

    #[test]
    fn test_for_type_rejects_bad_time_zone() {
        let data_type = DataType::Timestamp(TimeUnit::Second, Some("Mars/Olympus".into()));
        assert!(TypeEncoder::for_type(&data_type).unwrap_err().contains("Mars/Olympus"));
    }

    #[test]
    fn test_encode_scalars() {
        let ints = Int32Array::from(vec![Some(42), None, Some(-7)]);
        assert_eq!(encode_one(&TypeEncoder::Int32, &ints, 0).unwrap(), "42");
        assert_eq!(encode_one(&TypeEncoder::Int32, &ints, 1).unwrap(), "null");
        assert_eq!(encode_one(&TypeEncoder::Int32, &ints, 2).unwrap(), "-7");

        let big = UInt64Array::from(vec![u64::MAX]);
        assert_eq!(encode_one(&TypeEncoder::UInt64, &big, 0).unwrap(), "18446744073709551615");

        let floats = Float64Array::from(vec![2.5, f64::NAN]);
        assert_eq!(encode_one(&TypeEncoder::Float64, &floats, 0).unwrap(), "2.5");
        assert_eq!(encode_one(&TypeEncoder::Float64, &floats, 1).unwrap(), "\"NaN\"");

        let bools = BooleanArray::from(vec![true]);
        assert_eq!(encode_one(&TypeEncoder::Boolean, &bools, 0).unwrap(), "true");

        let text = StringArray::from(vec!["say \"hi\""]);
        assert_eq!(encode_one(&TypeEncoder::Utf8, &text, 0).unwrap(), r#""say \"hi\"""#);
    }

    #[test]
    fn test_encode_binary_as_base64() {
        let values: Vec<&[u8]> = vec![b"hello"];
        let array = BinaryArray::from(values);
        assert_eq!(encode_one(&TypeEncoder::Binary, &array, 0).unwrap(), "\"aGVsbG8=\"");
    }

    #[test]
    fn test_encode_temporal() {
        let dates = Date32Array::from(vec![19_000]);
        assert_eq!(encode_one(&TypeEncoder::Date32, &dates, 0).unwrap(), "\"2022-01-08\"");

        let micros = TimestampMicrosecondArray::from(vec![1_600_000_000_123_456]);
        let naive = TypeEncoder::for_type(&DataType::Timestamp(TimeUnit::Microsecond, None)).unwrap();
        assert_eq!(
            encode_one(&naive, &micros, 0).unwrap(),
            "\"2020-09-13 12:26:40.123456\""
        );

        let zoned_type = DataType::Timestamp(TimeUnit::Microsecond, Some("+02:00".into()));
        let zoned = TypeEncoder::for_type(&zoned_type).unwrap();
        let micros = micros.with_timezone("+02:00");
        assert_eq!(
            encode_one(&zoned, &micros, 0).unwrap(),
            "\"2020-09-13 14:26:40.123456 +02:00\""
        );

        let times = Time64MicrosecondArray::from(vec![3_723_000_001]);
        assert_eq!(
            encode_one(&TypeEncoder::Time64(TimeUnit::Microsecond), &times, 0).unwrap(),
            "\"01:02:03.000001\""
        );
    }

    #[test]
    fn test_out_of_range_date_is_value_error() {
        let dates = Date32Array::from(vec![i32::MAX]);
        let kind = value_kind(encode_one(&TypeEncoder::Date32, &dates, 0));
        assert_eq!(kind.code(), "OUT_OF_RANGE");

        let times = Time32SecondArray::from(vec![-1]);
        let kind = value_kind(encode_one(&TypeEncoder::Time32(TimeUnit::Second), &times, 0));
        assert!(matches!(kind, ValueErrorKind::OutOfRange { target: "time", .. }));
    }

    #[test]
    fn test_type_mismatch_is_value_error() {
        let text = StringArray::from(vec!["1"]);
        let kind = value_kind(encode_one(&TypeEncoder::Int64, &text, 0));
        assert_eq!(
            kind,
            ValueErrorKind::TypeMismatch {
                expected: "Int64".into(),
                actual: "Utf8".into()
            }
        );
    }

    #[test]
    fn test_format_decimal128() {
        assert_eq!(format_decimal128(12345, 2), "123.45");
        assert_eq!(format_decimal128(-5, 3), "-0.005");
        assert_eq!(format_decimal128(0, 2), "0.00");
        assert_eq!(format_decimal128(12, -2), "1200");
        assert_eq!(format_decimal128(i128::MIN, 0), i128::MIN.to_string());

        let array = Decimal128Array::from(vec![1999])
            .with_precision_and_scale(10, 2)
            .unwrap();
        let encoder = TypeEncoder::Decimal128 { scale: 2 };
        assert_eq!(encode_one(&encoder, &array, 0).unwrap(), "\"19.99\"");
    }

    #[test]
    fn test_encode_list_with_null_elements() {
        let mut builder = ListBuilder::new(Int32Builder::new());
        builder.values().append_value(1);
        builder.values().append_null();
        builder.append(true);
        builder.append(false);
        let array = builder.finish();

        let encoder = TypeEncoder::for_type(array.data_type()).unwrap();
        assert_eq!(encode_one(&encoder, &array, 0).unwrap(), "[1,null]");
        assert_eq!(encode_one(&encoder, &array, 1).unwrap(), "null");
    }

    #[test]
    fn test_encode_struct_as_array() {
        let ids: ArrayRef = Arc::new(Int32Array::from(vec![7]));
        let names: ArrayRef = Arc::new(StringArray::from(vec!["x"]));
        let array = StructArray::from(vec![
            (Arc::new(Field::new("id", DataType::Int32, false)), ids),
            (Arc::new(Field::new("name", DataType::Utf8, false)), names),
        ]);

        let encoder = TypeEncoder::for_type(array.data_type()).unwrap();
        assert_eq!(encode_one(&encoder, &array, 0).unwrap(), r#"[7,"x"]"#);
    }

    #[test]
    fn test_encode_map_as_object() {
        let mut builder = MapBuilder::new(None, StringBuilder::new(), Int32Builder::new());
        builder.keys().append_value("a");
        builder.values().append_value(1);
        builder.keys().append_value("b");
        builder.values().append_null();
        builder.append(true).unwrap();
        let array = builder.finish();

        let encoder = TypeEncoder::for_type(array.data_type()).unwrap();
        assert_eq!(encode_one(&encoder, &array, 0).unwrap(), r#"{"a":1,"b":null}"#);
    }

    #[test]
    fn test_map_with_unsupported_key_type_is_rejected() {
        let entries = Field::new(
            "entries",
            DataType::Struct(Fields::from(vec![
                Field::new("key", DataType::Float64, false),
                Field::new("value", DataType::Int32, true),
            ])),
            false,
        );
        let data_type = DataType::Map(Arc::new(entries), false);
        assert!(TypeEncoder::for_type(&data_type).is_err());
    }

    #[test]
    fn test_encode_null_type_and_non_finite_floats() {
        assert_eq!(encode_one(&TypeEncoder::Null, &NullArray::new(1), 0).unwrap(), "null");

        let floats = Float32Array::from(vec![1.5, f32::INFINITY, f32::NEG_INFINITY]);
        assert_eq!(encode_one(&TypeEncoder::Float32, &floats, 0).unwrap(), "1.5");
        assert_eq!(encode_one(&TypeEncoder::Float32, &floats, 1).unwrap(), "\"Infinity\"");
        assert_eq!(encode_one(&TypeEncoder::Float32, &floats, 2).unwrap(), "\"-Infinity\"");
    }

    #[test]
    fn test_encode_string_variants() {
        let large = LargeStringArray::from(vec!["big"]);
        assert_eq!(encode_one(&TypeEncoder::LargeUtf8, &large, 0).unwrap(), "\"big\"");

        let view = StringViewArray::from(vec!["a view that is longer than twelve bytes"]);
        assert_eq!(
            encode_one(&TypeEncoder::Utf8View, &view, 0).unwrap(),
            "\"a view that is longer than twelve bytes\""
        );
    }

    #[test]
    fn test_encode_binary_variants_as_base64() {
        let large = LargeBinaryArray::from(vec![b"hi".as_ref()]);
        assert_eq!(encode_one(&TypeEncoder::LargeBinary, &large, 0).unwrap(), "\"aGk=\"");

        let view = BinaryViewArray::from(vec![b"hi".as_ref()]);
        assert_eq!(encode_one(&TypeEncoder::BinaryView, &view, 0).unwrap(), "\"aGk=\"");

        let fixed = FixedSizeBinaryArray::try_from_iter(vec![vec![1u8, 2, 3]].into_iter()).unwrap();
        let encoder = TypeEncoder::for_type(fixed.data_type()).unwrap();
        assert_eq!(encode_one(&encoder, &fixed, 0).unwrap(), "\"AQID\"");
    }

    #[test]
    fn test_encode_date64() {
        let dates = Date64Array::from(vec![1_641_600_000_000]);
        assert_eq!(encode_one(&TypeEncoder::Date64, &dates, 0).unwrap(), "\"2022-01-08\"");
    }

    #[test]
    fn test_time_fraction_digits_follow_unit() {
        let seconds = Time32SecondArray::from(vec![3_723]);
        assert_eq!(
            encode_one(&TypeEncoder::Time32(TimeUnit::Second), &seconds, 0).unwrap(),
            "\"01:02:03\""
        );

        let millis = Time32MillisecondArray::from(vec![3_723_004]);
        assert_eq!(
            encode_one(&TypeEncoder::Time32(TimeUnit::Millisecond), &millis, 0).unwrap(),
            "\"01:02:03.004\""
        );

        let nanos = Time64NanosecondArray::from(vec![3_723_000_000_007]);
        assert_eq!(
            encode_one(&TypeEncoder::Time64(TimeUnit::Nanosecond), &nanos, 0).unwrap(),
            "\"01:02:03.000000007\""
        );
    }

    #[test]
    fn test_timestamp_fraction_digits_follow_unit() {
        let encoder = |unit| TypeEncoder::for_type(&DataType::Timestamp(unit, None)).unwrap();

        let seconds = TimestampSecondArray::from(vec![1_600_000_000]);
        assert_eq!(
            encode_one(&encoder(TimeUnit::Second), &seconds, 0).unwrap(),
            "\"2020-09-13 12:26:40\""
        );

        let millis = TimestampMillisecondArray::from(vec![1_600_000_000_123]);
        assert_eq!(
            encode_one(&encoder(TimeUnit::Millisecond), &millis, 0).unwrap(),
            "\"2020-09-13 12:26:40.123\""
        );

        let nanos = TimestampNanosecondArray::from(vec![1_600_000_000_123_456_789]);
        assert_eq!(
            encode_one(&encoder(TimeUnit::Nanosecond), &nanos, 0).unwrap(),
            "\"2020-09-13 12:26:40.123456789\""
        );
    }

    #[test]
    fn test_encode_large_and_fixed_size_lists() {
        let mut large = LargeListBuilder::new(Int32Builder::new());
        large.values().append_value(1);
        large.values().append_value(2);
        large.append(true);
        let large = large.finish();
        let encoder = TypeEncoder::for_type(large.data_type()).unwrap();
        assert_eq!(encode_one(&encoder, &large, 0).unwrap(), "[1,2]");

        let mut fixed = FixedSizeListBuilder::new(Int32Builder::new(), 2);
        fixed.values().append_value(3);
        fixed.values().append_null();
        fixed.append(true);
        let fixed = fixed.finish();
        let encoder = TypeEncoder::for_type(fixed.data_type()).unwrap();
        assert_eq!(encode_one(&encoder, &fixed, 0).unwrap(), "[3,null]");
    }

    #[test]
    fn test_encode_struct_with_null_field() {
        let ids: ArrayRef = Arc::new(Int32Array::from(vec![None]));
        let names: ArrayRef = Arc::new(StringArray::from(vec!["x"]));
        let array = StructArray::from(vec![
            (Arc::new(Field::new("id", DataType::Int32, true)), ids),
            (Arc::new(Field::new("name", DataType::Utf8, false)), names),
        ]);

        let encoder = TypeEncoder::for_type(array.data_type()).unwrap();
        assert_eq!(encode_one(&encoder, &array, 0).unwrap(), r#"[null,"x"]"#);
    }

    #[test]
    fn test_map_keys_render_as_strings() {
        let mut ints = MapBuilder::new(None, Int32Builder::new(), StringBuilder::new());
        ints.keys().append_value(1);
        ints.values().append_value("a");
        ints.keys().append_value(-2);
        ints.values().append_value("b");
        ints.append(true).unwrap();
        let ints = ints.finish();
        let encoder = TypeEncoder::for_type(ints.data_type()).unwrap();
        assert_eq!(encode_one(&encoder, &ints, 0).unwrap(), r#"{"1":"a","-2":"b"}"#);

        let mut bools = MapBuilder::new(None, BooleanBuilder::new(), Int32Builder::new());
        bools.keys().append_value(true);
        bools.values().append_value(1);
        bools.append(true).unwrap();
        let bools = bools.finish();
        let encoder = TypeEncoder::for_type(bools.data_type()).unwrap();
        assert_eq!(encode_one(&encoder, &bools, 0).unwrap(), r#"{"true":1}"#);
    }

    #[test]
    fn test_duplicate_map_key_is_value_error() {
        let mut builder = MapBuilder::new(None, StringBuilder::new(), Int32Builder::new());
        builder.keys().append_value("a");
        builder.values().append_value(1);
        builder.keys().append_value("a");
        builder.values().append_value(2);
        builder.append(true).unwrap();
        let array = builder.finish();

        let encoder = TypeEncoder::for_type(array.data_type()).unwrap();
        let kind = value_kind(encode_one(&encoder, &array, 0));
        assert_eq!(kind, ValueErrorKind::DuplicateMapKey { key: "a".into() });
        assert_eq!(kind.code(), "DUPLICATE_MAP_KEY");
    }
}
