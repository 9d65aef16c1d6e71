//! Swing structure pipeline stages
//!
//! Each stage consumes the previous stage's output and is re-run in full on
//! every HTF bar close.
//!
//! - **fractal**: confirmed fractal swing highs/lows on the HTF series
//! - **alternation**: strict High/Low ordering, bridging same-kind pairs
//! - **trend**: three-swing trend classification (Momentum/Compression)
//! - **choch**: Change of Character, including the dual-CHoCH tie-break
//! - **gate**: reversal confirmation state machine
//! - **sweep**: three-swing liquidity sweep check

pub mod helpers;

pub mod alternation;
pub mod choch;
pub mod fractal;
pub mod gate;
pub mod sweep;
pub mod trend;

// Re-export all stages for convenience
pub use alternation::*;
pub use choch::*;
pub use fractal::*;
pub use gate::*;
pub use sweep::*;
pub use trend::*;
