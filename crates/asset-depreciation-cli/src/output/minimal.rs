use serde_json::Value;

use super::{by_month, result_of};

/// Fields that answer the question each command asks, most specific first.
const ANSWER_KEYS: [&str; 7] = [
    "gain_loss",
    "book_value",
    "closing_book_value",
    "total_depreciation",
    "monthly_depreciation",
    "salvage_value",
    "budget_year",
];

/// Print just the headline figure of a computation.
///
/// Multi-row results (schedules, budget-year reports, population totals)
/// print one line per row: its label and its closing value.
pub fn print_minimal(value: &Value) {
    let result = result_of(value);

    let Value::Object(map) = result else {
        println!("{}", format_minimal(result));
        return;
    };

    if let Some(Value::Array(rows)) = map.get("rows") {
        for row in rows {
            println!("{}", row_line(row));
        }
        return;
    }

    if let Some(Value::Object(months)) = map.get("months") {
        for (month, entry) in by_month(months) {
            let total = entry.get("total_book_value").unwrap_or(&Value::Null);
            println!("{}\t{}", month, format_minimal(total));
        }
        return;
    }

    for key in ANSWER_KEYS {
        if let Some(val) = map.get(key).filter(|v| !v.is_null()) {
            println!("{}", format_minimal(val));
            return;
        }
    }

    if let Some((key, val)) = map.iter().next() {
        println!("{}: {}", key, format_minimal(val));
    }
}

fn row_line(row: &Value) -> String {
    let label = ["budget_year", "month_end"]
        .iter()
        .find_map(|k| row.get(*k))
        .map(format_minimal)
        .unwrap_or_default();
    let value = ["closing_book_value", "book_value"]
        .iter()
        .find_map(|k| row.get(*k))
        .map(format_minimal)
        .unwrap_or_default();
    format!("{}\t{}", label, value)
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
