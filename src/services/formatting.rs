/// Format an amount for tooltips and legends, e.g. `R$ 1234.50`.
pub fn format_amount(symbol: &str, amount: f64) -> String {
    let symbol = symbol.trim();
    if symbol.is_empty() {
        format!("{:.2}", amount)
    } else {
        format!("{} {:.2}", symbol, amount)
    }
}

/// Tooltip text for a point, only produced when totals are visible.
pub fn tooltip(symbol: &str, amount: f64, show_totals: bool) -> Option<String> {
    show_totals.then(|| format_amount(symbol, amount))
}

/// Whole-number percentage of a share between 0 and 1, e.g. `0.256` -> `26`.
pub fn whole_percent(percent: f64) -> i64 {
    (percent * 100.0).round() as i64
}

/// Pie label text, e.g. `Rent (87%)`.
pub fn slice_label_text(name: &str, percent: f64) -> String {
    format!("{} ({}%)", name, whole_percent(percent))
}
