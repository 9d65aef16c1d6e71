//! Liquidity sweep detection
//!
//! In a bullish trend a sweep is a low that runs the previous low and is then
//! reclaimed; in a bearish trend, a high that runs the previous high and is
//! rejected. Evaluated against the gated trend direction.

use super::helpers::{close_at, window3};
use crate::{Bar, SwingSeries, TrendDirection};

/// Three-swing liquidity sweep check against the gated trend
#[derive(Debug, Clone, Copy, Default)]
pub struct SweepDetector;

impl SweepDetector {
    /// True if the latest swings show a sweep in `direction`. Unclear never sweeps.
    pub fn detect<H: Bar>(&self, swings: &SwingSeries, htf: &[H], direction: TrendDirection) -> bool {
        let (Some([sh0, sh1, sh2]), Some([sl0, sl1, sl2])) =
            (window3(swings.highs(), 0), window3(swings.lows(), 0))
        else {
            return false;
        };

        match direction {
            TrendDirection::Bullish => {
                // LL2 ran below LL3, then the newest low and high both recovered
                let reclaimed = sl1 < sl2 && sl0 > sl1 && sh0 > sh1;
                let ll1_close = close_at(htf, &swings.lows()[0]);
                let new_low_rejected =
                    sl0 < sl1 && (ll1_close.is_some_and(|c| c > sl1) || sh0 > sh1);
                reclaimed || new_low_rejected
            }
            TrendDirection::Bearish => {
                let rejected = sh1 > sh2 && sh0 < sh1 && sl0 < sl1;
                let hh1_close = close_at(htf, &swings.highs()[0]);
                let new_high_rejected =
                    sh0 > sh1 && (hh1_close.is_some_and(|c| c < sh1) || sl0 < sl1);
                rejected || new_high_rejected
            }
            TrendDirection::Unclear => false,
        }
    }
}
