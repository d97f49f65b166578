//! Streaming JSON generator
//!
//! Writes JSON tokens straight into an `io::Write` without building an
//! intermediate `serde_json::Value` tree. Punctuation and number formatting go
//! through serde_json's [`CompactFormatter`], so the output is byte-identical to
//! what `serde_json::to_vec` would produce for the same document.
//!
//! The generator tracks nesting so that commas land in the right place and so
//! callers can ask whether the document is complete before handing it out.

use serde_json::ser::{CompactFormatter, Formatter};
use std::io::{self, Write};

#[derive(Debug, Clone, Copy)]
enum Scope {
    Array { first: bool },
    Object { first: bool, awaiting_value: bool },
}

/// Token-level JSON writer
pub struct JsonGenerator<W: Write> {
    writer: W,
    formatter: CompactFormatter,
    scopes: Vec<Scope>,
    root_written: bool,
}

impl<W: Write> JsonGenerator<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            formatter: CompactFormatter,
            scopes: Vec::with_capacity(8),
            root_written: false,
        }
    }

    /// True once a single top-level value has been written and closed
    pub fn is_complete(&self) -> bool {
        self.root_written && self.scopes.is_empty()
    }

    /// Current nesting depth (0 at top level)
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn write_start_array(&mut self) -> io::Result<()> {
        self.begin_value()?;
        self.formatter.begin_array(&mut self.writer)?;
        self.scopes.push(Scope::Array { first: true });
        Ok(())
    }

    pub fn write_end_array(&mut self) -> io::Result<()> {
        match self.scopes.pop() {
            Some(Scope::Array { .. }) => {
                self.formatter.end_array(&mut self.writer)?;
                self.end_value()
            }
            other => Err(misuse(format!("end of array inside {:?}", other))),
        }
    }

    pub fn write_start_object(&mut self) -> io::Result<()> {
        self.begin_value()?;
        self.formatter.begin_object(&mut self.writer)?;
        self.scopes.push(Scope::Object {
            first: true,
            awaiting_value: false,
        });
        Ok(())
    }

    pub fn write_end_object(&mut self) -> io::Result<()> {
        match self.scopes.pop() {
            Some(Scope::Object {
                awaiting_value: false,
                ..
            }) => {
                self.formatter.end_object(&mut self.writer)?;
                self.end_value()
            }
            other => Err(misuse(format!("end of object inside {:?}", other))),
        }
    }

    /// Write an object key; the next value written becomes its value
    pub fn write_field_name(&mut self, name: &str) -> io::Result<()> {
        let first = match self.scopes.last_mut() {
            Some(Scope::Object {
                first,
                awaiting_value,
            }) if !*awaiting_value => {
                let was_first = *first;
                *first = false;
                *awaiting_value = true;
                was_first
            }
            other => return Err(misuse(format!("field name inside {:?}", other))),
        };
        self.formatter.begin_object_key(&mut self.writer, first)?;
        serde_json::to_writer(&mut self.writer, name)?;
        self.formatter.end_object_key(&mut self.writer)?;
        self.formatter.begin_object_value(&mut self.writer)
    }

    pub fn write_null(&mut self) -> io::Result<()> {
        self.begin_value()?;
        self.formatter.write_null(&mut self.writer)?;
        self.end_value()
    }

    pub fn write_bool(&mut self, value: bool) -> io::Result<()> {
        self.begin_value()?;
        self.formatter.write_bool(&mut self.writer, value)?;
        self.end_value()
    }

    pub fn write_i64(&mut self, value: i64) -> io::Result<()> {
        self.begin_value()?;
        self.formatter.write_i64(&mut self.writer, value)?;
        self.end_value()
    }

    pub fn write_u64(&mut self, value: u64) -> io::Result<()> {
        self.begin_value()?;
        self.formatter.write_u64(&mut self.writer, value)?;
        self.end_value()
    }

    /// Finite values become JSON numbers; NaN and infinities become strings
    pub fn write_f32(&mut self, value: f32) -> io::Result<()> {
        if !value.is_finite() {
            return self.write_non_finite(value.is_nan(), value.is_sign_negative());
        }
        self.begin_value()?;
        self.formatter.write_f32(&mut self.writer, value)?;
        self.end_value()
    }

    /// Finite values become JSON numbers; NaN and infinities become strings
    pub fn write_f64(&mut self, value: f64) -> io::Result<()> {
        if !value.is_finite() {
            return self.write_non_finite(value.is_nan(), value.is_sign_negative());
        }
        self.begin_value()?;
        self.formatter.write_f64(&mut self.writer, value)?;
        self.end_value()
    }

    /// Write an escaped JSON string
    pub fn write_string(&mut self, value: &str) -> io::Result<()> {
        self.begin_value()?;
        serde_json::to_writer(&mut self.writer, value)?;
        self.end_value()
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    /// Give back the underlying writer
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_non_finite(&mut self, is_nan: bool, negative: bool) -> io::Result<()> {
        let text = match (is_nan, negative) {
            (true, _) => "NaN",
            (false, false) => "Infinity",
            (false, true) => "-Infinity",
        };
        self.write_string(text)
    }

    fn begin_value(&mut self) -> io::Result<()> {
        match self.scopes.last_mut() {
            None if self.root_written => Err(misuse("second top-level value".to_string())),
            None => Ok(()),
            Some(Scope::Array { first }) => {
                let was_first = *first;
                *first = false;
                self.formatter.begin_array_value(&mut self.writer, was_first)
            }
            Some(Scope::Object {
                awaiting_value: true,
                ..
            }) => Ok(()),
            Some(scope @ Scope::Object { .. }) => {
                Err(misuse(format!("value without field name inside {:?}", scope)))
            }
        }
    }

    fn end_value(&mut self) -> io::Result<()> {
        match self.scopes.last_mut() {
            None => {
                self.root_written = true;
                Ok(())
            }
            Some(Scope::Array { .. }) => self.formatter.end_array_value(&mut self.writer),
            Some(Scope::Object { awaiting_value, .. }) => {
                *awaiting_value = false;
                self.formatter.end_object_value(&mut self.writer)
            }
        }
    }
}

fn misuse(message: String) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, format!("malformed JSON document: {}", message))
}
