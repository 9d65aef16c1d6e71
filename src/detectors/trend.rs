//! Three-swing trend classification
//!
//! Rules, first match wins:
//!
//! 1. Primary bullish: higher lows (perfect, or swept-and-recovered) with the
//!    newest low above the previous one.
//! 2. Primary bearish: the mirror on highs.
//! 3. V-shaped lows confirmed by a higher high.
//! 4. ^-shaped highs confirmed by a lower low.
//! 5. Otherwise unclear.

use super::helpers::window3;
use crate::{SwingSeries, TrendDirection, TrendState, TrendStatus};

/// Classifies the trend from three highs and three lows
#[derive(Debug, Clone, Copy, Default)]
pub struct TrendClassifier;

impl TrendClassifier {
    /// Classify the window starting `offset` swings back (0 = current,
    /// 1 = previous). Needs `3 + offset` highs and lows.
    pub fn classify(&self, swings: &SwingSeries, offset: usize) -> TrendState {
        let (Some([sh0, sh1, sh2]), Some([sl0, sl1, sl2])) = (
            window3(swings.highs(), offset),
            window3(swings.lows(), offset),
        ) else {
            return TrendState::UNCLEAR;
        };

        if is_primary_bullish(sl0, sl1, sl2) {
            let status = if sh0 > sh1 {
                TrendStatus::Momentum
            } else {
                TrendStatus::Compression
            };
            return TrendState::new(TrendDirection::Bullish, status);
        }

        if is_primary_bearish(sh0, sh1, sh2) {
            let status = if sl0 < sl1 {
                TrendStatus::Momentum
            } else {
                TrendStatus::Compression
            };
            return TrendState::new(TrendDirection::Bearish, status);
        }

        if sl2 > sl1 && sl1 < sl0 && sh0 > sh1 {
            return TrendState::new(TrendDirection::Bullish, TrendStatus::Momentum);
        }

        if sh2 < sh1 && sh1 > sh0 && sl0 < sl1 {
            return TrendState::new(TrendDirection::Bearish, TrendStatus::Momentum);
        }

        TrendState::UNCLEAR
    }
}

/// Lows `sl0` (newest) .. `sl2` form a bullish base
#[inline]
pub fn is_primary_bullish(sl0: f64, sl1: f64, sl2: f64) -> bool {
    let higher_lows = sl2 < sl1 && sl1 < sl0;
    let swept_and_recovered = sl2 > sl1 && sl0 > sl2;
    (higher_lows || swept_and_recovered) && sl0 > sl1
}

/// Highs `sh0` (newest) .. `sh2` form a bearish ceiling
#[inline]
pub fn is_primary_bearish(sh0: f64, sh1: f64, sh2: f64) -> bool {
    let lower_highs = sh2 > sh1 && sh1 > sh0;
    let swept_and_rejected = sh2 < sh1 && sh0 < sh2;
    (lower_highs || swept_and_rejected) && sh0 < sh1
}
