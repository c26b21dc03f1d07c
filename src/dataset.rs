use serde_json::{Map, Value};

use crate::error::{GridError, GridResult};

pub const VALUES_KEY: &str = "values";
pub const RECIPIENTS_KEY: &str = "mailaddr";

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub label: String,
    pub value: Value,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    fields: Vec<Field>,
}

impl Row {
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    pub fn from_value(value: &Value) -> Self {
        let fields = match value {
            Value::Object(map) => map
                .iter()
                .map(|(label, value)| Field {
                    label: label.clone(),
                    value: value.clone(),
                })
                .collect(),
            Value::Array(items) => items
                .iter()
                .enumerate()
                .map(|(idx, value)| Field {
                    label: idx.to_string(),
                    value: value.clone(),
                })
                .collect(),
            scalar => vec![Field {
                label: String::new(),
                value: scalar.clone(),
            }],
        };
        Self { fields }
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    rows: Vec<Row>,
}

impl Dataset {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    /// Build a dataset from the `values` member of a payload.
    ///
    /// Besides a plain array this accepts a string holding the JSON array, and
    /// an object whose member values are the rows.
    pub fn from_values(values: &Value) -> GridResult<Self> {
        match values {
            Value::Array(items) => Ok(Self::new(items.iter().map(Row::from_value).collect())),
            Value::Object(map) => Ok(Self::new(map.values().map(Row::from_value).collect())),
            Value::String(embedded) => {
                let inner: Value = serde_json::from_str(embedded)?;
                match inner {
                    Value::String(_) => Err(GridError::InvalidValues("a nested string")),
                    other => Self::from_values(&other),
                }
            }
            other => Err(GridError::InvalidValues(json_type_name(other))),
        }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn header_labels(&self) -> Vec<&str> {
        self.rows
            .first()
            .map(|row| row.fields().iter().map(|f| f.label.as_str()).collect())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Payload {
    pub dataset: Dataset,
    pub recipients: Vec<String>,
}

impl Payload {
    pub fn parse(body: &str) -> GridResult<Self> {
        let document: Value = serde_json::from_str(body)?;
        match &document {
            Value::Object(map) => Self::from_map(map),
            other => Err(GridError::InvalidPayload(json_type_name(other))),
        }
    }

    fn from_map(map: &Map<String, Value>) -> GridResult<Self> {
        let values = map.get(VALUES_KEY).ok_or(GridError::MissingValues)?;
        let dataset = Dataset::from_values(values)?;
        let recipients = map
            .get(RECIPIENTS_KEY)
            .map(parse_recipients)
            .unwrap_or_default();
        Ok(Self {
            dataset,
            recipients,
        })
    }
}

fn parse_recipients(value: &Value) -> Vec<String> {
    let text = |v: &Value| match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    match value {
        Value::Array(items) => items.iter().map(text).collect(),
        Value::Null => Vec::new(),
        single => vec![text(single)],
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
