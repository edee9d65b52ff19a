use crate::data::{Cell, QueryResult, Row, SeriesGroup};
use anyhow::{anyhow, Context, Result};
use indexmap::IndexMap;
use std::io::{self, Read};

/// Read a CSV document into a query result.
///
/// Without `group_by` every row lands in one untagged series group. With it,
/// rows are partitioned by the value of that column (first-appearance order)
/// and each group is tagged `{group_by: value}`.
pub fn read_csv<R: Read>(reader: R, group_by: Option<&str>) -> Result<QueryResult> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = rdr
        .headers()
        .context("Failed to read CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let group_idx = match group_by {
        Some(col) => Some(
            headers
                .iter()
                .position(|h| h == col)
                .ok_or_else(|| anyhow!("Group-by column '{}' not found", col))?,
        ),
        None => None,
    };

    let mut groups: IndexMap<String, Vec<Row>> = IndexMap::new();
    for (line, record) in rdr.records().enumerate() {
        let record = record.with_context(|| format!("Failed to read CSV record {}", line + 1))?;
        let row: Row = record.iter().map(Cell::parse).collect();
        let key = match group_idx {
            Some(idx) => record.get(idx).unwrap_or_default().to_string(),
            None => String::new(),
        };
        groups.entry(key).or_default().push(row);
    }

    let series = groups
        .into_iter()
        .map(|(key, rows)| {
            let group = SeriesGroup::new(rows);
            match group_by {
                Some(col) => {
                    let mut tags = IndexMap::new();
                    tags.insert(col.to_string(), key);
                    group.with_tags(tags)
                }
                None => group,
            }
        })
        .collect();

    Ok(QueryResult::new(headers, series))
}

pub fn read_csv_from_stdin(group_by: Option<&str>) -> Result<QueryResult> {
    read_csv(io::stdin().lock(), group_by)
}
