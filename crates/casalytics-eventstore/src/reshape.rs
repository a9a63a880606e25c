//! Reshaping raw tabular rows into typed metric values.
//!
//! The store's JSON output is loosely typed: 64-bit integers arrive as
//! strings, properties are not schema-enforced, and partial rows are normal
//! rather than exceptional. Coercion here is defensive — a missing or
//! non-numeric count becomes 0, never an error.

use serde_json::Value;

use casalytics_core::insights::MetricRow;

/// Column aliases shared by every tabular template.
pub const LABEL_COLUMN: &str = "label";
pub const COUNT_COLUMN: &str = "hits";

/// Best-effort integer coercion: native ints, floats (truncated), and
/// numeric strings all count; anything else is 0.
pub fn coerce_count(value: Option<&Value>) -> i64 {
    match value {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        Some(Value::String(s)) => s
            .trim()
            .parse::<i64>()
            .ok()
            .or_else(|| s.trim().parse::<f64>().ok().map(|f| f as i64))
            .unwrap_or(0),
        _ => 0,
    }
}

fn coerce_label(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

/// Convert `label`/`hits` rows into `MetricRow`s, preserving row order —
/// the query layer already sorted them.
pub fn metric_rows(rows: &[Value]) -> Vec<MetricRow> {
    rows.iter()
        .map(|row| MetricRow {
            label: coerce_label(row.get(LABEL_COLUMN)),
            count: coerce_count(row.get(COUNT_COLUMN)),
        })
        .collect()
}

/// First-row integer column from a single-row aggregate query.
pub fn scalar(rows: &[Value], column: &str) -> i64 {
    coerce_count(rows.first().and_then(|row| row.get(column)))
}

/// First-row float column; same defensive policy as [`coerce_count`].
pub fn scalar_f64(rows: &[Value], column: &str) -> f64 {
    match rows.first().and_then(|row| row.get(column)) {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn string_counts_are_coerced_to_integers() {
        let rows = vec![
            json!({"label": "São Paulo", "hits": "120"}),
            json!({"label": "Rio de Janeiro", "hits": "45"}),
        ];
        let reshaped = metric_rows(&rows);
        assert_eq!(reshaped.len(), 2);
        assert_eq!(reshaped[0], MetricRow::new("São Paulo", 120));
        assert_eq!(reshaped[1], MetricRow::new("Rio de Janeiro", 45));
    }

    #[test]
    fn row_order_is_preserved() {
        let rows = vec![
            json!({"label": "b", "hits": 1}),
            json!({"label": "a", "hits": 9}),
        ];
        let labels: Vec<String> = metric_rows(&rows).into_iter().map(|r| r.label).collect();
        assert_eq!(labels, vec!["b", "a"]);
    }

    #[test]
    fn malformed_counts_become_zero() {
        assert_eq!(coerce_count(Some(&json!("not a number"))), 0);
        assert_eq!(coerce_count(Some(&json!(null))), 0);
        assert_eq!(coerce_count(None), 0);
        assert_eq!(coerce_count(Some(&json!({"nested": true}))), 0);
    }

    #[test]
    fn float_counts_truncate() {
        assert_eq!(coerce_count(Some(&json!(12.9))), 12);
        assert_eq!(coerce_count(Some(&json!("12.9"))), 12);
    }

    #[test]
    fn numeric_labels_render_as_text() {
        let rows = vec![json!({"label": 3, "hits": 7})];
        assert_eq!(metric_rows(&rows)[0], MetricRow::new("3", 7));
    }

    #[test]
    fn scalar_reads_the_first_row_only() {
        let rows = vec![json!({"hits": "42"}), json!({"hits": "7"})];
        assert_eq!(scalar(&rows, "hits"), 42);
        assert_eq!(scalar(&[], "hits"), 0);
        assert_eq!(scalar(&rows, "missing"), 0);
    }

    #[test]
    fn scalar_f64_parses_strings() {
        let rows = vec![json!({"avg_seconds": "184.25"})];
        assert_eq!(scalar_f64(&rows, "avg_seconds"), 184.25);
        assert_eq!(scalar_f64(&[], "avg_seconds"), 0.0);
    }
}
