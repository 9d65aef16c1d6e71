//! Fractal swing detection on the HTF series
//!
//! A bar is a swing high when its high is strictly above the high of every
//! other bar within `period / 2` bars on either side; swing lows mirror this
//! on lows. Only centers with `period / 2` closed bars to their right are
//! evaluated, so an emitted swing is never revised by later bars.

use tracing::debug;

use crate::{mapper, Bar, Lookback, SwingKind, SwingPeriod, SwingSeries};

/// Fractal swing detector over the most recent `lookback` HTF bars
#[derive(Debug, Clone, Copy, Default)]
pub struct FractalDetector {
    pub period: SwingPeriod,
    pub lookback: Lookback,
}

impl FractalDetector {
    pub fn new(period: SwingPeriod, lookback: Lookback) -> Self {
        Self { period, lookback }
    }

    /// Scan the lookback window from the newest confirmed center backwards.
    ///
    /// Output sequences are most-recent-first and rebuilt from scratch on
    /// every call. Candidates whose HTF bar has no base candle are skipped.
    pub fn detect<B: Bar, H: Bar>(&self, base: &[B], htf: &[H], ratio: usize) -> SwingSeries {
        let capacity = self.lookback.get();
        let half = self.period.half_width();
        let window_start = htf.len().saturating_sub(capacity);

        if htf.len() < window_start + self.period.get() {
            return SwingSeries::default();
        }

        let first = window_start + half;
        let last = htf.len() - 1 - half;

        let mut highs = Vec::new();
        let mut lows = Vec::new();

        for i in (first..=last).rev() {
            for kind in [SwingKind::High, SwingKind::Low] {
                let found = match kind {
                    SwingKind::High => &mut highs,
                    SwingKind::Low => &mut lows,
                };
                if found.len() >= capacity || !is_fractal(htf, i, half, kind) {
                    continue;
                }
                match mapper::resolve_swing(base, htf, i, kind, ratio) {
                    Ok(swing) => found.push(swing),
                    Err(err) => debug!(index = i, ?kind, %err, "skipping swing candidate"),
                }
            }
        }

        SwingSeries::new(highs, lows, capacity)
    }
}

/// True if bar `i` is a strict fractal extreme of `kind` with `half` bars on
/// each side. Centers without full neighborhoods never qualify.
pub fn is_fractal<H: Bar>(htf: &[H], i: usize, half: usize, kind: SwingKind) -> bool {
    if i < half || i + half >= htf.len() {
        return false;
    }
    let center = kind.extreme(&htf[i]);
    (i - half..=i + half)
        .filter(|&j| j != i)
        .all(|j| kind.is_beyond(center, kind.extreme(&htf[j])))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detectors::helpers::test_support::TestBar;

    /// Bars with constant 1.0 spread around the given mid prices, one hour apart
    fn bars(mids: &[f64]) -> Vec<TestBar> {
        mids.iter()
            .enumerate()
            .map(|(i, &m)| TestBar::new(i as i64 * 3600, m, m + 1.0, m - 1.0, m))
            .collect()
    }

    fn detector(period: usize, lookback: usize) -> FractalDetector {
        FractalDetector::new(
            SwingPeriod::new(period).unwrap(),
            Lookback::new(lookback).unwrap(),
        )
    }

    #[test]
    fn test_is_fractal_strict() {
        let htf = bars(&[1.0, 2.0, 5.0, 3.0, 4.0, 5.0, 1.0]);
        assert!(is_fractal(&htf, 2, 2, SwingKind::High));
        // equal high two bars to the right with half = 3
        assert!(!is_fractal(&htf, 2, 3, SwingKind::High));
        assert!(is_fractal(&htf, 3, 1, SwingKind::Low));
        assert!(!is_fractal(&htf, 3, 2, SwingKind::Low));
        // no full neighborhood
        assert!(!is_fractal(&htf, 0, 1, SwingKind::Low));
        assert!(!is_fractal(&htf, 6, 1, SwingKind::Low));
    }

    #[test]
    fn test_detect_most_recent_first() {
        let htf = bars(&[5.0, 4.0, 6.0, 3.0, 2.0, 4.0, 8.0, 5.0, 4.0, 6.0, 1.0]);
        let swings = detector(3, 200).detect(&htf, &htf, 1);

        let highs: Vec<usize> = swings.highs().iter().map(|s| s.bar_index).collect();
        let lows: Vec<usize> = swings.lows().iter().map(|s| s.bar_index).collect();
        assert_eq!(highs, vec![9, 6, 2]);
        assert_eq!(lows, vec![8, 4, 1]);
        assert_eq!(swings.highs()[0].price, 7.0);
        assert_eq!(swings.lows()[1].price, 1.0);
    }

    #[test]
    fn test_unconfirmed_center_not_emitted() {
        // last bar is the highest but has no bars to its right yet
        let htf = bars(&[1.0, 2.0, 3.0, 2.0, 1.0, 2.0, 9.0]);
        let swings = detector(5, 200).detect(&htf, &htf, 1);
        let highs: Vec<usize> = swings.highs().iter().map(|s| s.bar_index).collect();
        assert_eq!(highs, vec![2]);

        // two closed bars later it is confirmed
        let htf = bars(&[1.0, 2.0, 3.0, 2.0, 1.0, 2.0, 9.0, 4.0, 3.0]);
        let swings = detector(5, 200).detect(&htf, &htf, 1);
        let highs: Vec<usize> = swings.highs().iter().map(|s| s.bar_index).collect();
        assert_eq!(highs, vec![6, 2]);
    }

    #[test]
    fn test_lookback_window_bounds_scan() {
        let htf = bars(&[1.0, 9.0, 1.0, 2.0, 3.0, 2.0, 1.0, 2.0, 1.0]);
        // window of 6 bars starts at index 3, so the peak at 1 is out of view
        let swings = detector(3, 6).detect(&htf, &htf, 1);
        let highs: Vec<usize> = swings.highs().iter().map(|s| s.bar_index).collect();
        assert_eq!(highs, vec![7, 4]);
    }

    #[test]
    fn test_too_few_bars() {
        let htf = bars(&[1.0, 2.0, 1.0, 2.0]);
        assert!(detector(5, 200).detect(&htf, &htf, 1).is_empty());
        let none: Vec<TestBar> = Vec::new();
        assert!(detector(3, 200).detect(&none, &none, 1).is_empty());
    }

    #[test]
    fn test_unresolved_candidate_skipped() {
        let htf = bars(&[1.0, 3.0, 1.0, 4.0, 1.0]);
        // base series is missing the first peak's candle
        let base: Vec<TestBar> = htf.iter().copied().filter(|b| b.t != 3600).collect();
        let swings = detector(3, 200).detect(&base, &htf, 1);
        let highs: Vec<usize> = swings.highs().iter().map(|s| s.bar_index).collect();
        assert_eq!(highs, vec![3]);
        assert_eq!(swings.lows().len(), 1);
    }

    #[test]
    fn test_display_candle_resolution() {
        // one H1 bar = 4 M15 candles
        let htf = vec![
            TestBar::new(0, 10.0, 11.0, 9.0, 10.0),
            TestBar::new(3600, 10.0, 14.0, 9.5, 13.0),
            TestBar::new(7200, 13.0, 13.5, 8.0, 9.0),
        ];
        let base: Vec<TestBar> = (0..12)
            .map(|i| {
                let h = if i == 6 { 14.0 } else { 10.5 };
                TestBar::new(i * 900, 10.0, h, 9.6, 10.0)
            })
            .collect();

        let swings = detector(3, 200).detect(&base, &htf, 4);
        let high = swings.highs()[0];
        assert_eq!(high.bar_index, 1);
        assert_eq!(high.chart_open_time, 6 * 900);
        assert_eq!(high.display_price, 14.0);
    }
}
