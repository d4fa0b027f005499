use serde::{Deserialize, Serialize};

/// A single transaction carried along for tooltip/detail display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub name: String,
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_date: Option<String>,
}

/// One renderable chart entry: a pie slice, bar or line point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub name: String,
    /// Sum of the contributing totals. May be negative (refunds, adjustments).
    pub total: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transactions: Option<Vec<Transaction>>,
}

impl SeriesPoint {
    pub fn new(name: impl Into<String>, total: f64) -> Self {
        Self {
            name: name.into(),
            total,
            color: None,
            transactions: None,
        }
    }

    pub fn transaction_count(&self) -> usize {
        self.transactions.as_ref().map_or(0, Vec::len)
    }
}

/// A numeric field that could not be read and was replaced by zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Coercion {
    /// Slash separated location of the field, e.g. `Food/Groceries/total`.
    pub field: String,
    /// The offending value rendered as JSON (`"abc"`, `null`, `true`).
    pub raw: String,
}

/// Output of the report normalizer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Normalized {
    pub points: Vec<SeriesPoint>,
    pub coercions: Vec<Coercion>,
}

impl Normalized {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn grand_total(&self) -> f64 {
        self.points.iter().map(|p| p.total).sum()
    }

    /// Sort points by descending total for pie rendering. The sort is stable,
    /// so equal totals keep their source order.
    pub fn sort_descending(&mut self) {
        sort_descending(&mut self.points);
    }
}

pub fn sort_descending(points: &mut [SeriesPoint]) {
    points.sort_by(|a, b| b.total.total_cmp(&a.total));
}
