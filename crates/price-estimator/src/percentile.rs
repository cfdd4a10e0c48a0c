//! Percentiles with linear interpolation

/// Percentile `p` (0..=1) of ascending `sorted` values.
///
/// k = (n - 1) * p, interpolating between the neighbouring order statistics.
/// Returns `None` for an empty slice.
pub fn percentile(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }

    let p = p.clamp(0.0, 1.0);
    let k = (sorted.len() - 1) as f64 * p;
    let f = k.floor();
    let c = k.ceil();

    if f == c {
        return Some(sorted[k as usize]);
    }

    let lo = sorted[f as usize];
    let hi = sorted[c as usize];
    Some(lo * (c - k) + hi * (k - f))
}

/// Weighted percentile of `(value, weight)` pairs sorted by value.
///
/// Each value sits at the midpoint of its weight mass, rescaled so the first
/// value is at 0 and the last at 1; equal weights reproduce [`percentile`].
pub fn weighted_percentile(sorted: &[(f64, f64)], p: f64) -> Option<f64> {
    match sorted.len() {
        0 => return None,
        1 => return Some(sorted[0].0),
        _ => {}
    }

    let p = p.clamp(0.0, 1.0);
    let first_half = sorted[0].1 / 2.0;
    let last_half = sorted[sorted.len() - 1].1 / 2.0;
    let total: f64 = sorted.iter().map(|(_, w)| w).sum();
    let span = total - first_half - last_half;

    if !(span > 0.0) {
        let values: Vec<f64> = sorted.iter().map(|(v, _)| *v).collect();
        return percentile(&values, p);
    }

    let mut positions = Vec::with_capacity(sorted.len());
    let mut cumulative = 0.0;
    for (_, w) in sorted {
        cumulative += w;
        positions.push((cumulative - w / 2.0 - first_half) / span);
    }

    for i in 0..sorted.len() - 1 {
        let (p0, p1) = (positions[i], positions[i + 1]);
        if p <= p1 {
            if p1 <= p0 {
                return Some(sorted[i + 1].0);
            }
            let t = ((p - p0) / (p1 - p0)).clamp(0.0, 1.0);
            return Some(sorted[i].0 * (1.0 - t) + sorted[i + 1].0 * t);
        }
    }

    Some(sorted[sorted.len() - 1].0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_interpolation() {
        let prices = [100.0, 200.0, 300.0, 400.0];
        assert_eq!(percentile(&prices, 0.5), Some(250.0));
        assert_eq!(percentile(&prices, 0.25), Some(175.0));
        assert_eq!(percentile(&prices, 0.75), Some(325.0));
    }

    #[test]
    fn test_integral_rank_and_edges() {
        let prices = [100.0, 200.0, 300.0];
        assert_eq!(percentile(&prices, 0.5), Some(200.0));
        assert_eq!(percentile(&prices, 0.0), Some(100.0));
        assert_eq!(percentile(&prices, 1.0), Some(300.0));
        assert_eq!(percentile(&[42.0], 0.75), Some(42.0));
        assert_eq!(percentile(&[], 0.5), None);
    }

    #[test]
    fn test_equal_weights_match_unweighted() {
        let pairs = [(100.0, 0.7), (200.0, 0.7), (300.0, 0.7), (400.0, 0.7)];
        for p in [0.0, 0.25, 0.5, 0.75, 1.0] {
            let w = weighted_percentile(&pairs, p).unwrap();
            let u = percentile(&[100.0, 200.0, 300.0, 400.0], p).unwrap();
            assert!((w - u).abs() < 1e-9, "p={p}: {w} vs {u}");
        }
    }

    #[test]
    fn test_heavy_weight_pulls_median() {
        let pairs = [(100.0, 1.0), (200.0, 1.0), (300.0, 6.0)];
        let median = weighted_percentile(&pairs, 0.5).unwrap();
        assert!(median > 200.0);
        assert!(median <= 300.0);
    }

    #[test]
    fn test_weighted_degenerate() {
        assert_eq!(weighted_percentile(&[], 0.5), None);
        assert_eq!(weighted_percentile(&[(5.0, 2.0)], 0.5), Some(5.0));
    }
}
