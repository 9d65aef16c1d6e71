//! Bar index mapping between the base and higher timeframe series
//!
//! Both series are ordered oldest-first and indexed by open time. A swing is
//! found on the HTF series, then pinned to the single base-timeframe candle
//! inside that HTF bar which carries the extreme price.

use crate::{Bar, Result, StructureError, Swing, SwingKind};

/// Index of the bar whose open time equals `time`.
///
/// Series are sorted by open time, so this is a binary search.
#[inline]
pub fn index_of_time<B: Bar>(bars: &[B], time: i64) -> Result<usize> {
    bars.binary_search_by_key(&time, |b| b.open_time())
        .map_err(|_| StructureError::NotFound { time })
}

/// Base-timeframe index of the candle carrying the most extreme price of
/// `kind` among `ratio` candles starting at `start`.
///
/// Comparison is strict, so the earliest candle wins a tie. Returns `None`
/// if `start` is outside the series.
pub fn display_index<B: Bar>(base: &[B], start: usize, ratio: usize, kind: SwingKind) -> Option<usize> {
    let first = base.get(start)?;
    let end = start.saturating_add(ratio.max(1)).min(base.len());

    let mut best = start;
    let mut best_price = kind.extreme(first);
    for (offset, candle) in base[start + 1..end].iter().enumerate() {
        let price = kind.extreme(candle);
        if kind.is_beyond(price, best_price) {
            best = start + 1 + offset;
            best_price = price;
        }
    }
    Some(best)
}

/// Build a [`Swing`] for HTF bar `htf_index`, resolved to its display candle.
///
/// Fails with [`StructureError::NotFound`] when the HTF bar's open time has no
/// matching base candle; callers skip such candidates.
pub fn resolve_swing<B: Bar, H: Bar>(
    base: &[B],
    htf: &[H],
    htf_index: usize,
    kind: SwingKind,
    ratio: usize,
) -> Result<Swing> {
    let bar = htf
        .get(htf_index)
        .ok_or(StructureError::InvalidValue("HTF index out of range"))?;
    let time = bar.open_time();
    let start = index_of_time(base, time)?;
    let display = display_index(base, start, ratio, kind).ok_or(StructureError::NotFound { time })?;
    let candle = &base[display];

    Ok(Swing {
        htf_open_time: time,
        chart_open_time: candle.open_time(),
        price: kind.extreme(bar),
        display_price: kind.extreme(candle),
        bar_index: htf_index,
        kind,
    })
}

// ============================================================
// TESTS
// ============================================================
