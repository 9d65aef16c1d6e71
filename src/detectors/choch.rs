//! Change of Character (CHoCH) detection
//!
//! A bullish CHoCH is a break above the previous swing high, confirmed by the
//! breaking candle's close, after highs had been declining. A bearish CHoCH
//! mirrors it on lows. When both fire at once the more recent swing decides,
//! and if it only restates the previous trend the pair is read as a
//! liquidity grab instead of a reversal.

use std::cmp::Ordering;

use super::helpers::{close_at, window3};
use crate::{Bar, ChochState, Swing, SwingSeries, TrendDirection};

/// CHoCH state plus the dual-CHoCH liquidity-sweep finding
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChochOutcome {
    pub state: ChochState,
    /// Both structure breaks fired and the later one agrees with the previous trend
    pub dual_liquidity_sweep: bool,
}

impl ChochOutcome {
    pub const CONTINUATION: Self = Self {
        state: ChochState::Continuation,
        dual_liquidity_sweep: false,
    };

    #[inline]
    pub const fn new(state: ChochState) -> Self {
        Self {
            state,
            dual_liquidity_sweep: false,
        }
    }
}

/// Detects character changes from the three most recent highs and lows
#[derive(Debug, Clone, Copy, Default)]
pub struct ChochDetector;

impl ChochDetector {
    pub fn detect<H: Bar>(
        &self,
        swings: &SwingSeries,
        htf: &[H],
        previous: TrendDirection,
        has_previous_trend: bool,
    ) -> ChochOutcome {
        let (Some([sh0, sh1, sh2]), Some([sl0, sl1, sl2])) =
            (window3(swings.highs(), 0), window3(swings.lows(), 0))
        else {
            return ChochOutcome::CONTINUATION;
        };
        let (hh1, ll1) = (&swings.highs()[0], &swings.lows()[0]);
        let (Some(hh1_close), Some(ll1_close)) = (close_at(htf, hh1), close_at(htf, ll1)) else {
            return ChochOutcome::CONTINUATION;
        };

        let bullish_break = sh0 > sh1 && hh1_close > sh1;
        let bearish_break = sl0 < sl1 && ll1_close < sl1;
        let bullish_structure = sh1 < sh2 && bullish_break;
        let bearish_structure = sl1 > sl2 && bearish_break;

        if bullish_structure && bearish_structure {
            if let Some(state) = latest_break(hh1, ll1) {
                return ChochOutcome {
                    state,
                    dual_liquidity_sweep: state.direction() == Some(previous),
                };
            }
        }

        let bullish = bullish_structure
            || (has_previous_trend && previous != TrendDirection::Bullish && bullish_break);
        let bearish = bearish_structure
            || (has_previous_trend && previous != TrendDirection::Bearish && bearish_break);

        match (bullish, bearish) {
            (true, false) => ChochOutcome::new(ChochState::Bullish),
            (false, true) => ChochOutcome::new(ChochState::Bearish),
            (true, true) => latest_break(hh1, ll1).map_or(ChochOutcome::CONTINUATION, ChochOutcome::new),
            (false, false) => ChochOutcome::CONTINUATION,
        }
    }
}

/// Whichever of the newest high and newest low is strictly later wins
fn latest_break(hh1: &Swing, ll1: &Swing) -> Option<ChochState> {
    match hh1.htf_open_time.cmp(&ll1.htf_open_time) {
        Ordering::Greater => Some(ChochState::Bullish),
        Ordering::Less => Some(ChochState::Bearish),
        Ordering::Equal => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detectors::helpers::test_support::{htf_with_closes, series, series_low_latest};

    const HH1_TIME: i64 = 1000;
    const LL1_TIME: i64 = 990;

    fn detect(
        swings: &SwingSeries,
        closes: &[(i64, f64)],
        previous: TrendDirection,
    ) -> ChochOutcome {
        let htf = htf_with_closes(100.0, closes);
        ChochDetector.detect(swings, &htf, previous, previous != TrendDirection::Unclear)
    }

    #[test]
    fn test_bullish_structure_break() {
        // highs declining 110 -> 105, then break to 108 closing at 107
        let s = series(&[108.0, 105.0, 110.0], &[95.0, 94.0, 96.0]);
        let out = detect(&s, &[(HH1_TIME, 107.0), (LL1_TIME, 95.5)], TrendDirection::Unclear);
        assert_eq!(out, ChochOutcome::new(ChochState::Bullish));
    }

    #[test]
    fn test_bullish_break_needs_close_confirmation() {
        let s = series(&[108.0, 105.0, 110.0], &[95.0, 94.0, 96.0]);
        // wick above 105 but closed back below
        let out = detect(&s, &[(HH1_TIME, 104.0), (LL1_TIME, 95.5)], TrendDirection::Unclear);
        assert_eq!(out, ChochOutcome::CONTINUATION);
    }

    #[test]
    fn test_bearish_structure_break() {
        // lows rising 90 -> 95, then break to 92 closing at 93
        let s = series(&[104.0, 106.0, 103.0], &[92.0, 95.0, 90.0]);
        let out = detect(&s, &[(HH1_TIME, 103.0), (LL1_TIME, 93.0)], TrendDirection::Unclear);
        assert_eq!(out, ChochOutcome::new(ChochState::Bearish));
    }

    #[test]
    fn test_previous_direction_variant() {
        // highs were rising (no structure precondition) but the previous
        // trend was bearish, so a confirmed break still counts
        let s = series(&[112.0, 108.0, 104.0], &[95.0, 94.0, 96.0]);
        let closes = [(HH1_TIME, 111.0), (LL1_TIME, 95.5)];
        assert_eq!(
            detect(&s, &closes, TrendDirection::Bearish),
            ChochOutcome::new(ChochState::Bullish)
        );
        // no previous trend: only the structure form applies
        assert_eq!(
            detect(&s, &closes, TrendDirection::Unclear),
            ChochOutcome::CONTINUATION
        );
        // previous trend already bullish: nothing changed
        assert_eq!(
            detect(&s, &closes, TrendDirection::Bullish),
            ChochOutcome::CONTINUATION
        );
    }

    #[test]
    fn test_previous_direction_variant_bearish() {
        // lows were declining (no structure precondition) and the highs did
        // not break, so only the previous-direction form can fire
        let s = series(&[104.0, 106.0, 103.0], &[92.0, 95.0, 98.0]);
        let closes = [(HH1_TIME, 103.0), (LL1_TIME, 93.0)];
        assert_eq!(
            detect(&s, &closes, TrendDirection::Bullish),
            ChochOutcome::new(ChochState::Bearish)
        );
        assert_eq!(
            detect(&s, &closes, TrendDirection::Unclear),
            ChochOutcome::CONTINUATION
        );
        assert_eq!(
            detect(&s, &closes, TrendDirection::Bearish),
            ChochOutcome::CONTINUATION
        );
    }

    /// Both structure conditions hold
    fn dual_highs_lows() -> (Vec<f64>, Vec<f64>) {
        (vec![108.0, 105.0, 110.0], vec![92.0, 95.0, 90.0])
    }

    #[test]
    fn test_dual_choch_later_high_wins() {
        let (h, l) = dual_highs_lows();
        let s = series(&h, &l);
        let closes = [(HH1_TIME, 107.0), (LL1_TIME, 93.0)];

        let out = detect(&s, &closes, TrendDirection::Bullish);
        assert_eq!(out.state, ChochState::Bullish);
        assert!(out.dual_liquidity_sweep);

        let out = detect(&s, &closes, TrendDirection::Bearish);
        assert_eq!(out.state, ChochState::Bullish);
        assert!(!out.dual_liquidity_sweep);
    }

    #[test]
    fn test_dual_choch_later_low_wins() {
        let (h, l) = dual_highs_lows();
        let s = series_low_latest(&h, &l);
        // newest low is now at 1000, newest high at 990
        let closes = [(990, 107.0), (1000, 93.0)];

        let out = detect(&s, &closes, TrendDirection::Bearish);
        assert_eq!(out.state, ChochState::Bearish);
        assert!(out.dual_liquidity_sweep);

        let out = detect(&s, &closes, TrendDirection::Unclear);
        assert_eq!(out, ChochOutcome::new(ChochState::Bearish));
    }

    #[test]
    fn test_single_conditions_both_true_resolved_by_recency() {
        // bullish via structure, bearish only via the previous-direction form
        let s = series(&[108.0, 105.0, 110.0], &[92.0, 95.0, 96.0]);
        let closes = [(HH1_TIME, 107.0), (LL1_TIME, 93.0)];
        let out = detect(&s, &closes, TrendDirection::Bullish);
        assert_eq!(out, ChochOutcome::new(ChochState::Bullish));
    }

    #[test]
    fn test_insufficient_swings() {
        let s = series(&[108.0, 105.0], &[92.0, 95.0, 90.0]);
        assert_eq!(
            detect(&s, &[], TrendDirection::Bearish),
            ChochOutcome::CONTINUATION
        );
    }

    #[test]
    fn test_missing_close_is_continuation() {
        let (h, l) = dual_highs_lows();
        let s = series(&h, &l);
        let htf = htf_with_closes(100.0, &[]);
        let out = ChochDetector.detect(&s, &htf[..50], TrendDirection::Bullish, true);
        assert_eq!(out, ChochOutcome::CONTINUATION);
    }
}
