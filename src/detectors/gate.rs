//! Trend gate: a reversal is only published when a CHoCH confirms it
//!
//! | previous | raw     | CHoCH   | published                                   |
//! |----------|---------|---------|---------------------------------------------|
//! | any      | any     | dual    | previous, Momentum (liquidity sweep)        |
//! | Bullish  | Bearish | Bearish | Bearish, raw status                         |
//! | Bullish  | Bearish | other   | Bullish Compression if HH0 > HH3, else Unclear |
//! | Bearish  | Bullish | Bullish | Bullish, raw status                         |
//! | Bearish  | Bullish | other   | Bearish Compression if LL0 < LL3, else Unclear |
//! | other    |         |         | raw                                         |

use tracing::debug;

use super::choch::ChochOutcome;
use crate::{ChochState, Swing, SwingKind, SwingSeries, TrendDirection, TrendState, TrendStatus};

/// Swing offset compared against the newest swing when a reversal is rejected
const FALLBACK_OFFSET: usize = 3;

/// Gated trend plus the sweep finding raised by the gate itself
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateOutcome {
    pub trend: TrendState,
    pub liquidity_sweep: bool,
}

/// Holds a reversal back until a CHoCH in the new direction confirms it
#[derive(Debug, Clone, Copy, Default)]
pub struct TrendGate;

impl TrendGate {
    /// Published trend for `raw` given the previous direction and the CHoCH outcome.
    pub fn resolve(
        &self,
        swings: &SwingSeries,
        raw: TrendState,
        previous: TrendDirection,
        choch: ChochOutcome,
    ) -> GateOutcome {
        if choch.dual_liquidity_sweep {
            return GateOutcome {
                trend: TrendState::new(previous, TrendStatus::Momentum),
                liquidity_sweep: true,
            };
        }

        let trend = match (previous, raw.direction) {
            (TrendDirection::Bullish, TrendDirection::Bearish) => confirm_reversal(
                raw,
                choch.state == ChochState::Bearish,
                TrendDirection::Bullish,
                holds(swings.highs(), SwingKind::High),
            ),
            (TrendDirection::Bearish, TrendDirection::Bullish) => confirm_reversal(
                raw,
                choch.state == ChochState::Bullish,
                TrendDirection::Bearish,
                holds(swings.lows(), SwingKind::Low),
            ),
            _ => raw,
        };

        GateOutcome {
            trend,
            liquidity_sweep: false,
        }
    }
}

fn confirm_reversal(
    raw: TrendState,
    confirmed: bool,
    previous: TrendDirection,
    structure_holds: bool,
) -> TrendState {
    let trend = if confirmed {
        raw
    } else if structure_holds {
        TrendState::new(previous, TrendStatus::Compression)
    } else {
        TrendState::UNCLEAR
    };
    debug!(?previous, raw = %raw, confirmed, structure_holds, gated = %trend, "reversal attempt");
    trend
}

/// Newest swing still beyond the one `FALLBACK_OFFSET` back
fn holds(swings: &[Swing], kind: SwingKind) -> bool {
    match (swings.first(), swings.get(FALLBACK_OFFSET)) {
        (Some(newest), Some(older)) => kind.is_beyond(newest.price, older.price),
        _ => false,
    }
}
