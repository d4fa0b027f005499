//! Turns nested report maps into flat, numeric series ready for charting.
//!
//! Reports come from the upstream API as loosely typed JSON: totals may be
//! numbers or decimal strings and whole sections may be missing. Everything
//! here fails soft. Malformed structure yields an empty series and unreadable
//! numbers become zero, with each replacement recorded as a [`Coercion`] so
//! callers can tell dirty input from a genuine zero.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::models::{Coercion, Normalized, SeriesPoint, Transaction};

const UNNAMED: &str = "Unnamed";

/// A number read from report data, flagged when the raw value was unusable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParsedNumber {
    pub value: f64,
    pub was_coerced: bool,
}

impl ParsedNumber {
    fn exact(value: f64) -> Self {
        Self {
            value,
            was_coerced: false,
        }
    }

    fn coerced() -> Self {
        Self {
            value: 0.0,
            was_coerced: true,
        }
    }
}

/// Read a total or amount. Numbers pass through, strings are parsed as
/// decimal floats, anything else (including `null`) becomes `0`.
/// The result is always finite.
pub fn parse_number(value: &Value) -> ParsedNumber {
    match value {
        Value::Number(n) => n
            .as_f64()
            .filter(|v| v.is_finite())
            .map(ParsedNumber::exact)
            .unwrap_or_else(ParsedNumber::coerced),
        Value::String(s) => parse_decimal(s),
        _ => ParsedNumber::coerced(),
    }
}

/// Parse a decimal string such as `"123.45"` or `" -7 "`.
pub fn parse_decimal(s: &str) -> ParsedNumber {
    match s.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => ParsedNumber::exact(v),
        _ => ParsedNumber::coerced(),
    }
}

/// How flattened subcategory points are named.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SubcategoryNaming {
    /// Just the subcategory, e.g. `Groceries`.
    #[default]
    Unqualified,
    /// Category and subcategory, e.g. `Food / Groceries`.
    Qualified,
}

impl SubcategoryNaming {
    pub fn name(&self, category: &str, subcategory: &str) -> String {
        match self {
            Self::Unqualified => subcategory.to_string(),
            Self::Qualified => format!("{} / {}", category, subcategory),
        }
    }
}

/// One category total per entry of a month's category map.
///
/// Accepts both `{ "Food": { "subcategories": {...}, "color_code": "#f00" } }`
/// and the bare `{ "Food": { "Groceries": {...}, "Dining": {...} } }` form.
pub fn normalize_category_report(data: &Value) -> Normalized {
    let Some(categories) = data.as_object() else {
        debug!("Category report is not an object, returning empty series");
        return Normalized::default();
    };

    let mut collector = Collector::default();
    let mut points = Vec::with_capacity(categories.len());

    for (key, value) in categories {
        let Some(category) = CategoryParts::read(value) else {
            debug!(category = %key, "Skipping category that is not an object");
            continue;
        };
        let name = category.name.unwrap_or(key).to_string();

        let mut total = 0.0;
        let mut transactions: Option<Vec<Transaction>> = None;
        for (sub, entry) in category.subcategories {
            let path = format!("{}/{}", key, sub);
            total += collector.number(entry.get("total"), || format!("{}/total", path));
            if let Some(list) = collector.transactions(entry, &path) {
                transactions.get_or_insert_with(Vec::new).extend(list);
            }
        }

        let total = collector.finite_sum(total, || format!("{}/total", key));

        points.push(SeriesPoint {
            name,
            total,
            color: category.color,
            transactions,
        });
    }

    collector.finish(points)
}

/// One point per subcategory, flattening the category level away.
///
/// A JSON array is taken to be an already flattened series and goes through
/// [`normalize_series`] instead.
pub fn normalize_subcategory_report(data: &Value, naming: SubcategoryNaming) -> Normalized {
    let categories = match data {
        Value::Array(_) => return normalize_series(data),
        Value::Object(categories) => categories,
        _ => {
            debug!("Subcategory report is neither an object nor a list");
            return Normalized::default();
        }
    };

    let mut collector = Collector::default();
    let mut points = Vec::new();

    for (key, value) in categories {
        let Some(category) = CategoryParts::read(value) else {
            debug!(category = %key, "Skipping category that is not an object");
            continue;
        };

        for (sub, entry) in category.subcategories {
            let path = format!("{}/{}", key, sub);
            let total = collector.number(entry.get("total"), || format!("{}/total", path));
            let transactions = collector.transactions(entry, &path);
            points.push(SeriesPoint {
                name: naming.name(key, sub),
                total,
                color: color_of(entry),
                transactions,
            });
        }
    }

    collector.finish(points)
}

/// Pass-through for data that is already a flat list of series points.
/// Only the numbers are coerced, so running it on its own output is a no-op.
pub fn normalize_series(data: &Value) -> Normalized {
    let Some(items) = data.as_array() else {
        debug!("Series data is not a list, returning empty series");
        return Normalized::default();
    };

    let mut collector = Collector::default();
    let mut points = Vec::with_capacity(items.len());

    for (index, item) in items.iter().enumerate() {
        let Some(entry) = item.as_object() else {
            debug!(index, "Skipping series item that is not an object");
            continue;
        };
        let name = entry
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or(UNNAMED)
            .to_string();
        let path = format!("[{}]", index);
        let total = collector.number(entry.get("total"), || format!("{}/total", path));
        let transactions = collector.transactions(entry, &path);

        points.push(SeriesPoint {
            name,
            total,
            color: color_of(entry),
            transactions,
        });
    }

    collector.finish(points)
}

/// A category entry split into its optional display name, color and
/// subcategory map.
struct CategoryParts<'a> {
    name: Option<&'a str>,
    color: Option<String>,
    subcategories: Vec<(&'a str, &'a Map<String, Value>)>,
}

impl<'a> CategoryParts<'a> {
    fn read(value: &'a Value) -> Option<Self> {
        let entry = value.as_object()?;

        // A `subcategories` object holding its own total is a subcategory
        // that happens to carry that name, not the wrapper.
        if let Some(Value::Object(subcategories)) = entry.get("subcategories") {
            if !is_leaf(subcategories) {
                return Some(Self {
                    name: entry
                        .get("name")
                        .and_then(Value::as_str)
                        .filter(|n| !n.is_empty()),
                    color: color_of(entry),
                    subcategories: object_entries(subcategories),
                });
            }
        }

        Some(Self {
            name: None,
            color: color_of(entry),
            subcategories: object_entries(entry),
        })
    }
}

fn is_leaf(entry: &Map<String, Value>) -> bool {
    entry.contains_key("total") || entry.contains_key("transactions")
}

fn object_entries(map: &Map<String, Value>) -> Vec<(&str, &Map<String, Value>)> {
    map.iter()
        .filter_map(|(k, v)| v.as_object().map(|o| (k.as_str(), o)))
        .collect()
}

fn color_of(entry: &Map<String, Value>) -> Option<String> {
    ["color_code", "color"]
        .iter()
        .filter_map(|key| entry.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .find(|c| !c.is_empty())
        .map(str::to_string)
}

#[derive(Default)]
struct Collector {
    coercions: Vec<Coercion>,
}

impl Collector {
    fn number(&mut self, value: Option<&Value>, field: impl FnOnce() -> String) -> f64 {
        let parsed = parse_number(value.unwrap_or(&Value::Null));
        if parsed.was_coerced {
            self.coercions.push(Coercion {
                field: field(),
                raw: value.map_or_else(|| "missing".to_string(), Value::to_string),
            });
        }
        parsed.value
    }

    /// Totals that overflow while summing are replaced by zero.
    fn finite_sum(&mut self, sum: f64, field: impl FnOnce() -> String) -> f64 {
        if sum.is_finite() {
            return sum;
        }
        self.coercions.push(Coercion {
            field: field(),
            raw: sum.to_string(),
        });
        0.0
    }

    fn transactions(
        &mut self,
        entry: &Map<String, Value>,
        path: &str,
    ) -> Option<Vec<Transaction>> {
        let list = entry.get("transactions")?.as_array()?;
        let transactions = list
            .iter()
            .enumerate()
            .filter_map(|(i, tx)| {
                let tx = tx.as_object()?;
                Some(Transaction {
                    name: tx
                        .get("name")
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_string(),
                    amount: self.number(tx.get("amount"), || {
                        format!("{}/transactions[{}]/amount", path, i)
                    }),
                    transaction_date: tx
                        .get("transaction_date")
                        .and_then(Value::as_str)
                        .map(str::to_string),
                })
            })
            .collect();
        Some(transactions)
    }

    fn finish(self, points: Vec<SeriesPoint>) -> Normalized {
        if !self.coercions.is_empty() {
            warn!(
                count = self.coercions.len(),
                first = %self.coercions[0].field,
                "Unreadable numbers in report data were replaced by zero"
            );
        }
        Normalized {
            points,
            coercions: self.coercions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::report::sort_descending;
    use serde_json::json;

    fn food_and_rent() -> Value {
        json!({
            "Food": {
                "Groceries": { "total": "100.00", "transactions": [] },
                "Dining": { "total": 50, "transactions": [] }
            },
            "Rent": {
                "Rent": { "total": 1000, "transactions": [] }
            }
        })
    }

    #[test]
    fn test_parse_number_numeric_string() {
        let parsed = parse_number(&json!("123.45"));
        assert_eq!(parsed.value, 123.45);
        assert!(!parsed.was_coerced);
    }

    #[test]
    fn test_parse_number_passes_numbers_through() {
        assert_eq!(parse_number(&json!(42)).value, 42.0);
        assert_eq!(parse_number(&json!(-12.5)).value, -12.5);
        assert_eq!(parse_decimal("  7.25 ").value, 7.25);
    }

    #[test]
    fn test_parse_number_is_total() {
        let inputs = [
            json!("abc"),
            json!(""),
            json!(null),
            json!(true),
            json!("NaN"),
            json!("inf"),
            json!("-infinity"),
            json!("1,234.56"),
            json!({ "nested": 1 }),
            json!([1, 2]),
        ];
        for input in &inputs {
            let parsed = parse_number(input);
            assert!(parsed.value.is_finite(), "{} produced {}", input, parsed.value);
            assert_eq!(parsed.value, 0.0, "{} should coerce to zero", input);
            assert!(parsed.was_coerced, "{} should be flagged", input);
        }
    }

    #[test]
    fn test_category_report_end_to_end_order() {
        let mut normalized = normalize_category_report(&food_and_rent());
        normalized.sort_descending();

        let summary: Vec<(&str, f64)> = normalized
            .points
            .iter()
            .map(|p| (p.name.as_str(), p.total))
            .collect();
        assert_eq!(summary, vec![("Rent", 1000.0), ("Food", 150.0)]);
        assert!(normalized.coercions.is_empty());
    }

    #[test]
    fn test_category_report_preserves_sum() {
        let data = json!({
            "Food": {
                "Groceries": { "total": "10.10" },
                "Dining": { "total": 20.2 },
                "Snacks": { "total": "0.3" }
            },
            "Transport": {
                "Bus": { "total": 3.3 },
                "Refund": { "total": "-1.1" }
            }
        });
        let normalized = normalize_category_report(&data);
        let expected = 10.10 + 20.2 + 0.3 + 3.3 - 1.1;
        assert!((normalized.grand_total() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_negative_totals_are_not_clamped() {
        let data = json!({ "Refunds": { "Store": { "total": "-40" } } });
        let normalized = normalize_category_report(&data);
        assert_eq!(normalized.points[0].total, -40.0);
    }

    #[test]
    fn test_category_report_wrapped_form_with_color() {
        let data = json!({
            "Food": {
                "color_code": "#ff0000",
                "subcategories": {
                    "Groceries": {
                        "total": 12.5,
                        "transactions": [
                            { "name": "Market", "amount": 12.5, "transaction_date": "2024-01-03" }
                        ]
                    }
                }
            },
            "Misc": {
                "subcategories": { "Other": { "total": 1 } }
            }
        });
        let normalized = normalize_category_report(&data);
        assert_eq!(normalized.points.len(), 2);

        let food = &normalized.points[0];
        assert_eq!(food.name, "Food");
        assert_eq!(food.total, 12.5);
        assert_eq!(food.color.as_deref(), Some("#ff0000"));
        assert_eq!(food.transaction_count(), 1);
        assert_eq!(
            food.transactions.as_ref().unwrap()[0].transaction_date.as_deref(),
            Some("2024-01-03")
        );

        assert_eq!(normalized.points[1].color, None);
    }

    #[test]
    fn test_wrapped_form_with_extra_fields() {
        let data = json!({
            "Food": {
                "id": 7,
                "total": "150.00",
                "color_code": "#ff0000",
                "subcategories": {
                    "Groceries": { "total": "100.00" },
                    "Dining": { "total": 50 }
                }
            }
        });
        let normalized = normalize_category_report(&data);
        assert_eq!(normalized.points.len(), 1);
        assert_eq!(normalized.points[0].total, 150.0);
        assert_eq!(normalized.points[0].color.as_deref(), Some("#ff0000"));
        assert!(normalized.coercions.is_empty());

        let flat = normalize_subcategory_report(&data, SubcategoryNaming::Unqualified);
        let names: Vec<&str> = flat.points.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Groceries", "Dining"]);
    }

    #[test]
    fn test_subcategory_named_subcategories_is_a_leaf() {
        let data = json!({
            "Misc": {
                "subcategories": { "total": 9, "transactions": [] },
                "Other": { "total": 1 }
            }
        });
        let normalized = normalize_category_report(&data);
        assert_eq!(normalized.points[0].total, 10.0);
        assert!(normalized.coercions.is_empty());
    }

    #[test]
    fn test_overflowing_category_total_is_zeroed() {
        let data = json!({
            "Huge": {
                "A": { "total": f64::MAX },
                "B": { "total": f64::MAX }
            }
        });
        let normalized = normalize_category_report(&data);
        assert_eq!(normalized.points[0].total, 0.0);
        assert_eq!(normalized.coercions.len(), 1);
        assert_eq!(normalized.coercions[0].field, "Huge/total");
        assert_eq!(normalized.coercions[0].raw, "inf");

        let encoded = serde_json::to_value(&normalized.points).unwrap();
        assert!(encoded[0]["total"].is_number());
    }

    #[test]
    fn test_zero_entries_are_retained() {
        let data = json!({ "Empty": { "Nothing": { "total": 0, "transactions": [] } } });
        let normalized = normalize_category_report(&data);
        assert_eq!(normalized.points.len(), 1);
        assert_eq!(normalized.points[0].total, 0.0);
        assert!(normalized.coercions.is_empty());
    }

    #[test]
    fn test_malformed_report_is_empty() {
        for data in [json!(null), json!("report"), json!(12), json!([1, 2, 3])] {
            assert!(normalize_category_report(&data).is_empty());
        }
        assert!(normalize_subcategory_report(&json!(null), SubcategoryNaming::default()).is_empty());
        assert!(normalize_series(&json!({ "a": 1 })).is_empty());
    }

    #[test]
    fn test_coercions_are_recorded() {
        let data = json!({
            "Food": {
                "Groceries": { "total": "abc" },
                "Dining": {},
                "Coffee": { "total": 4 }
            }
        });
        let normalized = normalize_category_report(&data);
        assert_eq!(normalized.points[0].total, 4.0);

        let fields: Vec<&str> = normalized
            .coercions
            .iter()
            .map(|c| c.field.as_str())
            .collect();
        assert_eq!(fields, vec!["Food/Groceries/total", "Food/Dining/total"]);
        assert_eq!(normalized.coercions[0].raw, "\"abc\"");
        assert_eq!(normalized.coercions[1].raw, "missing");
    }

    #[test]
    fn test_subcategory_report_flattens() {
        let normalized =
            normalize_subcategory_report(&food_and_rent(), SubcategoryNaming::Unqualified);
        let names: Vec<&str> = normalized.points.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Groceries", "Dining", "Rent"]);
        assert_eq!(normalized.points[0].total, 100.0);

        let qualified =
            normalize_subcategory_report(&food_and_rent(), SubcategoryNaming::Qualified);
        assert_eq!(qualified.points[1].name, "Food / Dining");
        assert_eq!(qualified.points[2].name, "Rent / Rent");
    }

    #[test]
    fn test_subcategory_report_accepts_flat_list() {
        let data = json!([
            { "name": "Salary", "total": "3000.50", "color_code": "#00ff00" },
            { "name": "Interest", "total": 12 }
        ]);
        let normalized = normalize_subcategory_report(&data, SubcategoryNaming::Qualified);
        assert_eq!(normalized.points.len(), 2);
        assert_eq!(normalized.points[0].name, "Salary");
        assert_eq!(normalized.points[0].total, 3000.5);
        assert_eq!(normalized.points[0].color.as_deref(), Some("#00ff00"));
    }

    #[test]
    fn test_series_pass_through_is_idempotent() {
        let first = normalize_series(&json!([
            { "name": "Groceries", "total": "100.25", "transactions": [
                { "name": "Market", "amount": "100.25", "transaction_date": "2024-03-01" }
            ] },
            { "name": "Dining", "total": 50 },
            { "name": "Broken", "total": "n/a" }
        ]));
        let again = normalize_series(&serde_json::to_value(&first.points).unwrap());

        let totals = |n: &Normalized| n.points.iter().map(|p| p.total).collect::<Vec<_>>();
        assert_eq!(totals(&first), totals(&again));
        assert_eq!(first.points, again.points);
        assert_eq!(first.coercions.len(), 1);
        assert!(again.coercions.is_empty());
    }

    #[test]
    fn test_sort_descending_is_stable() {
        let mut points = vec![
            SeriesPoint::new("a", 5.0),
            SeriesPoint::new("b", 10.0),
            SeriesPoint::new("c", 5.0),
            SeriesPoint::new("d", -2.0),
        ];
        sort_descending(&mut points);
        let names: Vec<&str> = points.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a", "c", "d"]);
    }
}
