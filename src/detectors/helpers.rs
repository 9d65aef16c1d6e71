//! Common helpers shared by the structure stages
//!
//! Every stage looks at the same three-swing windows: `[s0, s1, s2]`, newest
//! first, starting `offset` swings back.

use crate::{mapper, Bar, Swing};

/// Minimum swings of each kind the three-swing stages need
pub const MIN_SWINGS: usize = 3;

/// Prices of three consecutive swings starting at `offset`, newest first.
/// `None` if fewer than `offset + 3` swings exist.
#[inline]
pub fn window3(swings: &[Swing], offset: usize) -> Option<[f64; 3]> {
    let w = swings.get(offset..offset + MIN_SWINGS)?;
    Some([w[0].price, w[1].price, w[2].price])
}

/// Close of the HTF candle a swing sits on, looked up by open time
#[inline]
pub fn close_at<H: Bar>(htf: &[H], swing: &Swing) -> Option<f64> {
    mapper::index_of_time(htf, swing.htf_open_time)
        .ok()
        .map(|i| htf[i].close())
}
