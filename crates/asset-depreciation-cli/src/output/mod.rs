pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::{Map, Value};

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// The payload of a `ComputationOutput` envelope, or the value itself.
pub(crate) fn result_of(value: &Value) -> &Value {
    value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value)
}

/// A result split into its scalar fields and its periodic rows.
pub(crate) struct Sections {
    pub scalars: Vec<(String, Value)>,
    pub rows: Vec<Map<String, Value>>,
}

/// Separate a result object into scalar fields and period rows.
///
/// Schedules and budget-year reports carry a `rows` array; population totals
/// carry a `months` object keyed by month number, flattened here into rows
/// with a leading `month` column.
pub(crate) fn sections(result: &Map<String, Value>) -> Sections {
    let mut scalars = Vec::new();
    let mut rows = Vec::new();

    for (key, val) in result {
        match (key.as_str(), val) {
            ("rows", Value::Array(items)) => {
                rows.extend(items.iter().filter_map(|v| v.as_object().cloned()));
            }
            ("months", Value::Object(months)) => {
                for (month, entry) in by_month(months) {
                    let mut row = Map::new();
                    row.insert("month".into(), Value::String(month.clone()));
                    if let Value::Object(fields) = entry {
                        row.extend(fields.clone());
                    }
                    rows.push(row);
                }
            }
            _ => scalars.push((key.clone(), val.clone())),
        }
    }

    Sections { scalars, rows }
}

/// Column headers taken from the first row, in field order.
pub(crate) fn row_headers(rows: &[Map<String, Value>]) -> Vec<String> {
    rows.first()
        .map(|first| first.keys().cloned().collect())
        .unwrap_or_default()
}

/// Month entries in calendar order; JSON object keys sort as strings.
pub(crate) fn by_month(months: &Map<String, Value>) -> Vec<(&String, &Value)> {
    let mut entries: Vec<_> = months.iter().collect();
    entries.sort_by_key(|(k, _)| k.parse::<u32>().unwrap_or(u32::MAX));
    entries
}
