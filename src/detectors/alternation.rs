//! Strict High/Low alternation of the swing sequence
//!
//! Fractal candidates can produce two highs (or two lows) in a row. Between
//! any such pair the most extreme opposite-kind HTF bar is promoted to a
//! synthetic swing so the merged sequence reads High, Low, High, Low.

use tracing::debug;

use crate::{mapper, Bar, Lookback, Swing, SwingSeries};

/// Rebuilds a swing series so that highs and lows strictly alternate in time
#[derive(Debug, Clone, Copy, Default)]
pub struct AlternationEnforcer {
    pub lookback: Lookback,
}

impl AlternationEnforcer {
    pub fn new(lookback: Lookback) -> Self {
        Self { lookback }
    }

    /// Merge both kinds chronologically, bridge same-kind neighbours, and
    /// split back into most-recent-first sequences capped at `lookback`.
    ///
    /// A pair with no HTF bar strictly between them, or whose times cannot be
    /// found in `htf`, is passed through as is.
    pub fn enforce<B: Bar, H: Bar>(
        &self,
        candidates: &SwingSeries,
        base: &[B],
        htf: &[H],
        ratio: usize,
    ) -> SwingSeries {
        let merged = candidates.chronological();
        let mut ordered: Vec<Swing> = Vec::with_capacity(merged.len() + merged.len() / 2);

        for swing in merged {
            if let Some(prev) = ordered.last().copied() {
                if prev.kind == swing.kind {
                    match bridge(&prev, &swing, base, htf, ratio) {
                        Some(inserted) => ordered.push(inserted),
                        None => debug!(
                            kind = ?swing.kind,
                            left = prev.htf_open_time,
                            right = swing.htf_open_time,
                            "no bar between same-kind swings, passing through"
                        ),
                    }
                }
            }
            ordered.push(swing);
        }

        SwingSeries::from_chronological(&ordered, self.lookback.get())
    }
}

/// Synthesize the opposite-kind swing between two same-kind swings: the most
/// extreme HTF bar strictly between them, first one on a tie.
pub fn bridge<B: Bar, H: Bar>(
    left: &Swing,
    right: &Swing,
    base: &[B],
    htf: &[H],
    ratio: usize,
) -> Option<Swing> {
    let from = mapper::index_of_time(htf, left.htf_open_time).ok()?;
    let to = mapper::index_of_time(htf, right.htf_open_time).ok()?;
    if to <= from + 1 {
        return None;
    }

    let kind = left.kind.opposite();
    let mut best = from + 1;
    for i in from + 2..to {
        if kind.is_beyond(kind.extreme(&htf[i]), kind.extreme(&htf[best])) {
            best = i;
        }
    }

    match mapper::resolve_swing(base, htf, best, kind, ratio) {
        Ok(swing) => Some(swing),
        Err(err) => {
            debug!(index = best, %err, "synthetic swing unresolved");
            None
        }
    }
}
