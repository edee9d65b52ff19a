use anyhow::{anyhow, Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// One cell of a result row, copied as-is into coordinate arrays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Null,
    Bool(bool),
    Number(Number),
    Text(String),
}

impl Cell {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    /// Type a raw text cell: empty is null, then bool, integer, float, text.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() {
            return Cell::Null;
        }
        match raw {
            "true" => return Cell::Bool(true),
            "false" => return Cell::Bool(false),
            _ => {}
        }
        if let Ok(i) = raw.parse::<i64>() {
            return Cell::Number(Number::from(i));
        }
        if let Some(n) = raw.parse::<f64>().ok().and_then(Number::from_f64) {
            return Cell::Number(n);
        }
        Cell::Text(raw.to_string())
    }
}

impl From<f64> for Cell {
    fn from(v: f64) -> Self {
        Number::from_f64(v).map(Cell::Number).unwrap_or(Cell::Null)
    }
}

impl From<i64> for Cell {
    fn from(v: i64) -> Self {
        Cell::Number(Number::from(v))
    }
}

impl From<&str> for Cell {
    fn from(v: &str) -> Self {
        Cell::Text(v.to_string())
    }
}

pub type Row = Vec<Cell>;

/// One logical data series: the rows sharing one tag combination.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeriesGroup {
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub rows: Vec<Row>,
    #[serde(default)]
    pub tags: Option<IndexMap<String, String>>,
}

impl SeriesGroup {
    pub fn new(rows: Vec<Row>) -> Self {
        Self {
            total: Some(rows.len() as u64),
            rows,
            tags: None,
        }
    }

    pub fn with_tags(mut self, tags: IndexMap<String, String>) -> Self {
        self.tags = Some(tags);
        self
    }

    /// Legend name: value of the first tag, or `default` when untagged.
    pub fn name_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.tags
            .as_ref()
            .and_then(|tags| tags.values().next())
            .map(String::as_str)
            .unwrap_or(default)
    }
}

/// Tabular result of one data query. All groups share `headers`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    #[serde(default)]
    pub headers: Vec<String>,
    #[serde(default)]
    pub all_data_series: Vec<SeriesGroup>,
    #[serde(default)]
    pub total: Option<u64>,
}

impl QueryResult {
    pub fn new(headers: Vec<String>, all_data_series: Vec<SeriesGroup>) -> Self {
        let total = all_data_series.iter().map(|g| g.rows.len() as u64).sum();
        Self {
            headers,
            all_data_series,
            total: Some(total),
        }
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// A column is numeric when it holds at least one number and nothing
    /// but numbers and nulls.
    pub fn is_numeric_column(&self, index: usize) -> bool {
        let mut seen_number = false;
        for cell in self.all_data_series.iter().flat_map(|g| g.rows.iter()).filter_map(|r| r.get(index)) {
            match cell {
                Cell::Number(_) => seen_number = true,
                Cell::Null => {}
                _ => return false,
            }
        }
        seen_number
    }
}

/// Parse a query response: either one result object or an array of them.
pub fn from_json(value: Value) -> Result<Vec<QueryResult>> {
    match value {
        Value::Array(_) => serde_json::from_value(value).context("Failed to parse query result array"),
        Value::Object(_) => {
            let result: QueryResult =
                serde_json::from_value(value).context("Failed to parse query result")?;
            Ok(vec![result])
        }
        _ => Err(anyhow!("Query response must be a JSON object or array of objects")),
    }
}

pub fn from_json_str(input: &str) -> Result<Vec<QueryResult>> {
    let value: Value = serde_json::from_str(input).context("Query response is not valid JSON")?;
    from_json(value)
}
