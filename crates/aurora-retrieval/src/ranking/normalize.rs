/// Min-max normalize into [0, 1].
///
/// When every value is equal the range is zero: all map to 1.0 if that
/// value is positive, otherwise 0.0. Non-finite inputs are treated as 0.
pub fn min_max(values: &[f64]) -> Vec<f64> {
    let clean = |v: f64| if v.is_finite() { v } else { 0.0 };
    let (min, max) = values
        .iter()
        .map(|v| clean(*v))
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if values.is_empty() {
        return Vec::new();
    }

    let range = max - min;
    if range <= f64::EPSILON {
        let fill = if max > 0.0 { 1.0 } else { 0.0 };
        return vec![fill; values.len()];
    }
    values.iter().map(|v| (clean(*v) - min) / range).collect()
}
