//Copyright 2024 Felix Engl
//
//Licensed under the Apache License, Version 2.0 (the "License");
//you may not use this file except in compliance with the License.
//You may obtain a copy of the License at
//
//    http://www.apache.org/licenses/LICENSE-2.0
//
//Unless required by applicable law or agreed to in writing, software
//distributed under the License is distributed on an "AS IS" BASIS,
//WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//See the License for the specific language governing permissions and
//limitations under the License.

use std::io;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::TextCleaningError;

/// A single cell of a [`Table`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// A missing entry, like an empty field in a csv.
    Missing,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl Value {
    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(value) => Some(value),
            _ => None,
        }
    }

    /// Coerces the value to its string form.
    /// Every scalar has one, a missing value maps to the empty string.
    pub fn to_text(&self) -> String {
        match self {
            Value::Missing => String::new(),
            Value::Text(value) => value.clone(),
            Value::Int(value) => value.to_string(),
            Value::Float(value) => value.to_string(),
            Value::Bool(value) => value.to_string(),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

/// A table of named columns over rows of [`Value`]s.
/// All columns always have the same length.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    columns: IndexMap<String, Vec<Value>>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table from `(name, values)` pairs.
    /// Fails if the columns do not share a single length.
    pub fn from_columns<I, S>(columns: I) -> Result<Self, TextCleaningError>
    where
        I: IntoIterator<Item = (S, Vec<Value>)>,
        S: Into<String>,
    {
        let mut table = Self::new();
        for (name, values) in columns {
            table.insert_column(name, values)?;
        }
        Ok(table)
    }

    /// Reads a table from a csv.
    /// The header row names the columns, empty fields become [`Value::Missing`].
    pub fn from_csv_reader<R: io::Read>(
        mut reader: csv::Reader<R>,
    ) -> Result<Self, TextCleaningError> {
        let headers = reader.headers()?.clone();
        let mut columns: IndexMap<String, Vec<Value>> = headers
            .iter()
            .map(|header| (header.to_string(), Vec::new()))
            .collect();
        for record in reader.records() {
            let record = record?;
            for (idx, field) in record.iter().enumerate() {
                if let Some((_, values)) = columns.get_index_mut(idx) {
                    values.push(if field.is_empty() {
                        Value::Missing
                    } else {
                        Value::Text(field.to_string())
                    });
                }
            }
        }
        Ok(Self { columns })
    }

    pub fn insert_column<S: Into<String>>(
        &mut self,
        name: S,
        values: Vec<Value>,
    ) -> Result<(), TextCleaningError> {
        let name = name.into();
        if !self.columns.is_empty() && values.len() != self.row_count() {
            return Err(TextCleaningError::ColumnLengthMismatch {
                column: name,
                expected: self.row_count(),
                found: values.len(),
            });
        }
        self.columns.insert(name, values);
        Ok(())
    }

    /// Replaces the values of an existing column.
    pub fn replace_column(
        &mut self,
        name: &str,
        values: Vec<Value>,
    ) -> Result<(), TextCleaningError> {
        if values.len() != self.row_count() {
            return Err(TextCleaningError::ColumnLengthMismatch {
                column: name.to_string(),
                expected: self.row_count(),
                found: values.len(),
            });
        }
        match self.columns.get_mut(name) {
            Some(slot) => {
                *slot = values;
                Ok(())
            }
            None => Err(TextCleaningError::ColumnNotFound(name.to_string())),
        }
    }

    pub fn column(&self, name: &str) -> Option<&[Value]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.columns
            .first()
            .map(|(_, values)| values.len())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    /// Keeps only the rows marked with `true`, preserving their order.
    pub(crate) fn retain_rows(&mut self, keep: &[bool]) {
        for values in self.columns.values_mut() {
            let mut marks = keep.iter().copied();
            values.retain(|_| marks.next().unwrap_or(false));
        }
    }
}
