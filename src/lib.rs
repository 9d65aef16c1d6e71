//! # swing-structure - Higher-timeframe swing structure classifier
//!
//! Detects fractal swing highs/lows on a higher timeframe (HTF), keeps them in
//! strict High/Low alternation, and derives a gated trend state, a Change of
//! Character (CHoCH) signal and a liquidity-sweep flag from the latest swings.
//!
//! ## Quick Start
//!
//! ```rust
//! use swing_structure::prelude::*;
//!
//! // Define your bar type
//! struct Candle { t: i64, o: f64, h: f64, l: f64, c: f64 }
//!
//! impl Bar for Candle {
//!     fn open_time(&self) -> i64 { self.t }
//!     fn open(&self) -> f64 { self.o }
//!     fn high(&self) -> f64 { self.h }
//!     fn low(&self) -> f64 { self.l }
//!     fn close(&self) -> f64 { self.c }
//! }
//!
//! // Swings on H4, base chart on M15
//! let mut engine = EngineBuilder::new()
//!     .base_timeframe(Timeframe::M15)
//!     .swing_timeframe(Timeframe::H4)
//!     .build()
//!     .unwrap();
//!
//! // Re-evaluate whenever an H4 bar closes
//! let base: Vec<Candle> = vec![];
//! let htf: Vec<Candle> = vec![];
//! let snapshot = engine.update(&base, &htf).unwrap();
//! assert!(snapshot.is_none());
//! ```

use std::fmt;
use std::str::FromStr;

use tracing::{trace, warn};

pub mod detectors;
pub mod mapper;
pub mod params;

pub mod prelude {
    pub use crate::{
        // Stages
        detectors::*,
        // Mapping
        mapper::{display_index, index_of_time, resolve_swing},
        // Parameters
        params::{get_lookback, get_swing_period, ParamMeta, ParamType, ParameterizedConfig},
        // Parallel
        scan_parallel,
        // Core traits
        Bar,
        BarExt,
        // Data model
        ChochState,
        // Engine
        EngineBuilder,
        Lookback,
        // Errors
        Result,
        ScanError,
        ScanResult,
        SnapshotIterator,
        StructureConfig,
        StructureEngine,
        StructureError,
        StructureSnapshot,
        Swing,
        SwingKind,
        SwingPeriod,
        SwingSeries,
        Timeframe,
        TrendDirection,
        TrendState,
        TrendStatus,
    };
}

// ============================================================
// ERRORS
// ============================================================

pub type Result<T> = std::result::Result<T, StructureError>;

/// Errors that can occur while configuring or running the structure pipeline
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StructureError {
    #[error("Invalid value: {0}")]
    InvalidValue(&'static str),

    #[error("{field} = {value} out of range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Unsupported timeframe: {0}")]
    UnsupportedTimeframe(String),

    #[error("No bar opens at time {time}")]
    NotFound { time: i64 },

    #[error("Invalid bar at index {index}: {reason}")]
    InvalidBar { index: usize, reason: &'static str },
}

// ============================================================
// VALIDATED TYPES
// ============================================================

/// Fractal window width (odd, >= 3)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SwingPeriod(usize);

impl SwingPeriod {
    pub const DEFAULT: Self = Self(5);

    /// Create a new SwingPeriod, validating it is odd and at least 3
    pub fn new(value: usize) -> Result<Self> {
        if value < 3 {
            return Err(StructureError::InvalidValue("Swing period must be >= 3"));
        }
        if value % 2 == 0 {
            return Err(StructureError::InvalidValue("Swing period must be odd"));
        }
        Ok(Self(value))
    }

    #[doc(hidden)]
    pub const fn new_const(value: usize) -> Self {
        Self(value)
    }

    #[inline]
    pub fn get(self) -> usize {
        self.0
    }

    /// Bars required on each side of a fractal center
    #[inline]
    pub fn half_width(self) -> usize {
        self.0 / 2
    }
}

impl Default for SwingPeriod {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl serde::Serialize for SwingPeriod {
    fn serialize<S: serde::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        self.0.serialize(s)
    }
}

impl<'de> serde::Deserialize<'de> for SwingPeriod {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        let value = usize::deserialize(d)?;
        SwingPeriod::new(value).map_err(serde::de::Error::custom)
    }
}

/// Maximum number of swings retained per kind (>= 4)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Lookback(usize);

impl Lookback {
    pub const DEFAULT: Self = Self(200);

    /// Create a new Lookback, validating it is at least 4
    pub fn new(value: usize) -> Result<Self> {
        if value < 4 {
            return Err(StructureError::InvalidValue("Lookback must be >= 4"));
        }
        Ok(Self(value))
    }

    #[doc(hidden)]
    pub const fn new_const(value: usize) -> Self {
        Self(value)
    }

    #[inline]
    pub fn get(self) -> usize {
        self.0
    }
}

impl Default for Lookback {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl serde::Serialize for Lookback {
    fn serialize<S: serde::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        self.0.serialize(s)
    }
}

impl<'de> serde::Deserialize<'de> for Lookback {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        let value = usize::deserialize(d)?;
        Lookback::new(value).map_err(serde::de::Error::custom)
    }
}

// ============================================================
// BAR TRAITS
// ============================================================

/// Closed OHLC bar with its open time (seconds)
pub trait Bar {
    fn open_time(&self) -> i64;
    fn open(&self) -> f64;
    fn high(&self) -> f64;
    fn low(&self) -> f64;
    fn close(&self) -> f64;
}

impl<B: Bar + ?Sized> Bar for &B {
    fn open_time(&self) -> i64 {
        (**self).open_time()
    }

    fn open(&self) -> f64 {
        (**self).open()
    }

    fn high(&self) -> f64 {
        (**self).high()
    }

    fn low(&self) -> f64 {
        (**self).low()
    }

    fn close(&self) -> f64 {
        (**self).close()
    }
}

/// Extension trait with data checks for bars
pub trait BarExt: Bar {
    /// Validate OHLC consistency
    fn validate(&self) -> Result<()> {
        let prices = [self.open(), self.high(), self.low(), self.close()];
        if prices.iter().any(|p| p.is_nan()) {
            return Err(StructureError::InvalidBar {
                index: 0,
                reason: "NaN in OHLC",
            });
        }
        if prices.iter().any(|p| p.is_infinite()) {
            return Err(StructureError::InvalidBar {
                index: 0,
                reason: "Infinite value in OHLC",
            });
        }
        if self.high() < self.low() {
            return Err(StructureError::InvalidBar {
                index: 0,
                reason: "high < low",
            });
        }
        Ok(())
    }
}

impl<T: Bar + ?Sized> BarExt for T {}

fn validate_bars<B: Bar>(bars: &[B]) -> Result<()> {
    for (i, bar) in bars.iter().enumerate() {
        bar.validate().map_err(|e| match e {
            StructureError::InvalidBar { reason, .. } => StructureError::InvalidBar { index: i, reason },
            other => other,
        })?;
    }
    Ok(())
}

// ============================================================
// TIMEFRAMES
// ============================================================

macro_rules! define_timeframes {
    (
        $(
            $variant:ident => ($label:literal, $seconds:expr)
        ),* $(,)?
    ) => {
        /// Supported chart timeframes
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum Timeframe {
            $($variant),*
        }

        impl Timeframe {
            /// Every supported timeframe, finest first
            pub const ALL: &'static [Timeframe] = &[$(Timeframe::$variant),*];

            /// Duration of one bar in seconds. Monthly bars use 30 days.
            #[inline]
            pub const fn seconds(self) -> u64 {
                match self {
                    $(Timeframe::$variant => $seconds),*
                }
            }

            #[inline]
            pub const fn label(self) -> &'static str {
                match self {
                    $(Timeframe::$variant => $label),*
                }
            }
        }
    };
}

const MINUTE: u64 = 60;
const HOUR: u64 = 60 * MINUTE;
const DAY: u64 = 24 * HOUR;

define_timeframes! {
    M1 => ("M1", MINUTE),
    M2 => ("M2", 2 * MINUTE),
    M3 => ("M3", 3 * MINUTE),
    M4 => ("M4", 4 * MINUTE),
    M5 => ("M5", 5 * MINUTE),
    M6 => ("M6", 6 * MINUTE),
    M10 => ("M10", 10 * MINUTE),
    M12 => ("M12", 12 * MINUTE),
    M15 => ("M15", 15 * MINUTE),
    M20 => ("M20", 20 * MINUTE),
    M30 => ("M30", 30 * MINUTE),
    H1 => ("H1", HOUR),
    H2 => ("H2", 2 * HOUR),
    H3 => ("H3", 3 * HOUR),
    H4 => ("H4", 4 * HOUR),
    H6 => ("H6", 6 * HOUR),
    H8 => ("H8", 8 * HOUR),
    H12 => ("H12", 12 * HOUR),
    D1 => ("D1", DAY),
    W1 => ("W1", 7 * DAY),
    MN1 => ("MN1", 30 * DAY),
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Timeframe {
    type Err = StructureError;

    /// Accepts `H4`, `h4` or `PERIOD_H4`.
    fn from_str(s: &str) -> Result<Self> {
        let upper = s.trim().to_ascii_uppercase();
        let label = upper.strip_prefix("PERIOD_").unwrap_or(&upper);
        Timeframe::ALL
            .iter()
            .copied()
            .find(|tf| tf.label() == label)
            .ok_or_else(|| StructureError::UnsupportedTimeframe(s.to_string()))
    }
}

impl serde::Serialize for Timeframe {
    fn serialize<S: serde::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        s.serialize_str(self.label())
    }
}

impl<'de> serde::Deserialize<'de> for Timeframe {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        let label = String::deserialize(d)?;
        label.parse().map_err(serde::de::Error::custom)
    }
}

// ============================================================
// DATA MODEL
// ============================================================

/// Kind of swing point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum SwingKind {
    High,
    Low,
}

impl SwingKind {
    #[inline]
    pub fn opposite(self) -> Self {
        match self {
            SwingKind::High => SwingKind::Low,
            SwingKind::Low => SwingKind::High,
        }
    }

    /// The bar's extreme for this kind (high for highs, low for lows)
    #[inline]
    pub fn extreme<B: Bar + ?Sized>(self, bar: &B) -> f64 {
        match self {
            SwingKind::High => bar.high(),
            SwingKind::Low => bar.low(),
        }
    }

    /// True if `a` lies strictly beyond `b` in this kind's direction
    #[inline]
    pub fn is_beyond(self, a: f64, b: f64) -> bool {
        match self {
            SwingKind::High => a > b,
            SwingKind::Low => a < b,
        }
    }
}

/// A confirmed (or synthesized) swing point on the HTF series
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Swing {
    /// Open time of the HTF bar carrying the swing
    pub htf_open_time: i64,
    /// Open time of the base-timeframe candle carrying the extreme
    pub chart_open_time: i64,
    /// HTF extreme, used for every comparison
    pub price: f64,
    /// Base-timeframe extreme, used only for placement
    pub display_price: f64,
    /// Index into the HTF series
    pub bar_index: usize,
    pub kind: SwingKind,
}

/// Swing highs and lows, each ordered most-recent-first and capped
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SwingSeries {
    highs: Vec<Swing>,
    lows: Vec<Swing>,
}

impl SwingSeries {
    /// Build from most-recent-first sequences, trimming each to `capacity`.
    pub fn new(mut highs: Vec<Swing>, mut lows: Vec<Swing>, capacity: usize) -> Self {
        highs.truncate(capacity);
        lows.truncate(capacity);
        Self { highs, lows }
    }

    /// Split a chronological (oldest-first) sequence back into per-kind
    /// most-recent-first sequences.
    pub fn from_chronological(ordered: &[Swing], capacity: usize) -> Self {
        let pick = |kind: SwingKind| -> Vec<Swing> {
            ordered
                .iter()
                .rev()
                .filter(|s| s.kind == kind)
                .take(capacity)
                .copied()
                .collect()
        };
        Self {
            highs: pick(SwingKind::High),
            lows: pick(SwingKind::Low),
        }
    }

    #[inline]
    pub fn highs(&self) -> &[Swing] {
        &self.highs
    }

    #[inline]
    pub fn lows(&self) -> &[Swing] {
        &self.lows
    }

    #[inline]
    pub fn of_kind(&self, kind: SwingKind) -> &[Swing] {
        match kind {
            SwingKind::High => &self.highs,
            SwingKind::Low => &self.lows,
        }
    }

    /// Price of the swing `offset` places back (0 = most recent)
    #[inline]
    pub fn price(&self, kind: SwingKind, offset: usize) -> Option<f64> {
        self.of_kind(kind).get(offset).map(|s| s.price)
    }

    pub fn len(&self) -> usize {
        self.highs.len() + self.lows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.highs.is_empty() && self.lows.is_empty()
    }

    /// All swings merged oldest-first by HTF time. Highs precede lows on equal times.
    pub fn chronological(&self) -> Vec<Swing> {
        let mut all: Vec<Swing> = self.highs.iter().chain(self.lows.iter()).copied().collect();
        all.sort_by_key(|s| s.htf_open_time);
        all
    }
}

/// Trend direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum TrendDirection {
    Bullish,
    Bearish,
    #[default]
    Unclear,
}

impl TrendDirection {
    #[inline]
    pub fn is_bullish(self) -> bool {
        matches!(self, TrendDirection::Bullish)
    }

    #[inline]
    pub fn is_bearish(self) -> bool {
        matches!(self, TrendDirection::Bearish)
    }
}

/// Trend sub-status: both legs confirm (Momentum) or only one does (Compression)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum TrendStatus {
    Momentum,
    Compression,
    #[default]
    None,
}

/// Direction plus sub-status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct TrendState {
    pub direction: TrendDirection,
    pub status: TrendStatus,
}

impl TrendState {
    pub const UNCLEAR: Self = Self {
        direction: TrendDirection::Unclear,
        status: TrendStatus::None,
    };

    #[inline]
    pub const fn new(direction: TrendDirection, status: TrendStatus) -> Self {
        Self { direction, status }
    }
}

impl fmt::Display for TrendState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            TrendStatus::None => write!(f, "{:?}", self.direction),
            status => write!(f, "{:?} {:?}", self.direction, status),
        }
    }
}

/// Change of Character outcome
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ChochState {
    #[default]
    Continuation,
    Bullish,
    Bearish,
}

impl ChochState {
    /// Direction the structure changed to, if any
    #[inline]
    pub fn direction(self) -> Option<TrendDirection> {
        match self {
            ChochState::Continuation => None,
            ChochState::Bullish => Some(TrendDirection::Bullish),
            ChochState::Bearish => Some(TrendDirection::Bearish),
        }
    }
}

/// Read-only result of one pipeline update
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StructureSnapshot {
    /// Open time of the last closed HTF bar evaluated
    pub htf_open_time: i64,
    /// Published (gated) trend
    pub trend: TrendState,
    /// Un-gated classification of the latest three swings
    pub raw_trend: TrendState,
    /// Classification one swing back
    pub previous_trend: TrendState,
    pub choch: ChochState,
    pub liquidity_sweep: bool,
    /// Most-recent-first
    pub highs: Vec<Swing>,
    /// Most-recent-first
    pub lows: Vec<Swing>,
}

// ============================================================
// CONFIGURATION
// ============================================================

/// Pipeline configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StructureConfig {
    #[serde(default)]
    pub swing_period: SwingPeriod,
    #[serde(default)]
    pub lookback: Lookback,
    pub base_timeframe: Timeframe,
    pub swing_timeframe: Timeframe,
    #[serde(default)]
    pub validate_data: bool,
}

impl Default for StructureConfig {
    fn default() -> Self {
        Self {
            swing_period: SwingPeriod::DEFAULT,
            lookback: Lookback::DEFAULT,
            base_timeframe: Timeframe::M15,
            swing_timeframe: Timeframe::H4,
            validate_data: false,
        }
    }
}

impl StructureConfig {
    /// Base candles per HTF bar. `None` if the swing timeframe is finer than the base.
    pub fn ratio(&self) -> Option<usize> {
        let base = self.base_timeframe.seconds();
        let swing = self.swing_timeframe.seconds();
        (swing >= base).then(|| (swing / base) as usize)
    }
}

// ============================================================
// STRUCTURE ENGINE
// ============================================================

/// Runs the full pipeline over the current bar windows
#[derive(Debug, Clone)]
pub struct StructureEngine {
    config: StructureConfig,
    fractal: FractalDetector,
    enforcer: AlternationEnforcer,
    classifier: TrendClassifier,
    choch: ChochDetector,
    gate: TrendGate,
    sweep: SweepDetector,
    swings: SwingSeries,
}

use detectors::{
    AlternationEnforcer, ChochDetector, FractalDetector, SweepDetector, TrendClassifier, TrendGate,
};

impl StructureEngine {
    pub fn new(config: StructureConfig) -> Self {
        Self {
            fractal: FractalDetector::new(config.swing_period, config.lookback),
            enforcer: AlternationEnforcer::new(config.lookback),
            classifier: TrendClassifier,
            choch: ChochDetector,
            gate: TrendGate,
            sweep: SweepDetector,
            swings: SwingSeries::default(),
            config,
        }
    }

    #[inline]
    pub fn config(&self) -> &StructureConfig {
        &self.config
    }

    /// Swings from the most recent update
    #[inline]
    pub fn swings(&self) -> &SwingSeries {
        &self.swings
    }

    /// Recompute everything from the given windows. `htf` must hold closed
    /// bars only, oldest first; `base` must cover the same span.
    ///
    /// Returns `Ok(None)` when nothing can be computed: a swing timeframe
    /// finer than the base timeframe, or no HTF bars.
    pub fn update<B: Bar, H: Bar>(
        &mut self,
        base: &[B],
        htf: &[H],
    ) -> Result<Option<StructureSnapshot>> {
        let Some(ratio) = self.config.ratio() else {
            return Ok(None);
        };
        let Some(last) = htf.last() else {
            return Ok(None);
        };

        if self.config.validate_data {
            validate_bars(base)?;
            validate_bars(htf)?;
        }

        let candidates = self.fractal.detect(base, htf, ratio);
        self.swings = self.enforcer.enforce(&candidates, base, htf, ratio);
        let swings = &self.swings;

        let previous_trend = self.classifier.classify(swings, 1);
        let raw_trend = self.classifier.classify(swings, 0);
        let choch = self.choch.detect(
            swings,
            htf,
            previous_trend.direction,
            previous_trend.direction != TrendDirection::Unclear,
        );
        let gated = self
            .gate
            .resolve(swings, raw_trend, previous_trend.direction, choch);
        let swept = self.sweep.detect(swings, htf, gated.trend.direction);

        trace!(
            time = last.open_time(),
            highs = swings.highs().len(),
            lows = swings.lows().len(),
            trend = %gated.trend,
            choch = ?choch.state,
            "structure updated"
        );

        Ok(Some(StructureSnapshot {
            htf_open_time: last.open_time(),
            trend: gated.trend,
            raw_trend,
            previous_trend,
            choch: choch.state,
            liquidity_sweep: gated.liquidity_sweep || swept,
            highs: swings.highs().to_vec(),
            lows: swings.lows().to_vec(),
        }))
    }

    /// Replay the pipeline as each HTF bar closes in turn.
    pub fn replay<'a, B: Bar, H: Bar>(
        &'a mut self,
        base: &'a [B],
        htf: &'a [H],
    ) -> SnapshotIterator<'a, B, H> {
        SnapshotIterator::new(self, base, htf)
    }
}

// ============================================================
// SNAPSHOT ITERATOR
// ============================================================

/// Iterator over HTF bar closes, yielding the snapshot after each one
pub struct SnapshotIterator<'a, B: Bar, H: Bar> {
    engine: &'a mut StructureEngine,
    base: &'a [B],
    htf: &'a [H],
    current: usize,
}

impl<'a, B: Bar, H: Bar> SnapshotIterator<'a, B, H> {
    fn new(engine: &'a mut StructureEngine, base: &'a [B], htf: &'a [H]) -> Self {
        Self {
            engine,
            base,
            htf,
            current: 0,
        }
    }
}

impl<'a, B: Bar, H: Bar> Iterator for SnapshotIterator<'a, B, H> {
    type Item = Result<(usize, Option<StructureSnapshot>)>;

    fn next(&mut self) -> Option<Self::Item> {
        let (base, htf) = (self.base, self.htf);
        let index = self.current;
        let closed = htf.get(index)?;
        self.current += 1;

        // base candles up to the end of the HTF bar that just closed
        let span = self.engine.config.swing_timeframe.seconds() as i64;
        let end = closed.open_time() + span;
        let base_len = base.partition_point(|b| b.open_time() < end);

        let result = self
            .engine
            .update(&base[..base_len], &htf[..=index])
            .map(|snapshot| (index, snapshot));
        Some(result)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.htf.len().saturating_sub(self.current);
        (remaining, Some(remaining))
    }
}

impl<'a, B: Bar, H: Bar> ExactSizeIterator for SnapshotIterator<'a, B, H> {}

// ============================================================
// BUILDER
// ============================================================

/// Builder for creating StructureEngine instances
#[derive(Debug, Clone, Default)]
pub struct EngineBuilder {
    config: StructureConfig,
    error: Option<StructureError>,
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing configuration
    pub fn config(mut self, config: StructureConfig) -> Self {
        self.config = config;
        self
    }

    pub fn swing_period(mut self, period: usize) -> Self {
        match SwingPeriod::new(period) {
            Ok(p) => self.config.swing_period = p,
            Err(e) => self.defer(e),
        }
        self
    }

    pub fn lookback(mut self, lookback: usize) -> Self {
        match Lookback::new(lookback) {
            Ok(l) => self.config.lookback = l,
            Err(e) => self.defer(e),
        }
        self
    }

    pub fn base_timeframe(mut self, timeframe: Timeframe) -> Self {
        self.config.base_timeframe = timeframe;
        self
    }

    pub fn swing_timeframe(mut self, timeframe: Timeframe) -> Self {
        self.config.swing_timeframe = timeframe;
        self
    }

    /// Set both timeframes from labels such as `"M15"` / `"PERIOD_H4"`
    pub fn timeframe_labels(mut self, base: &str, swing: &str) -> Self {
        match (base.parse::<Timeframe>(), swing.parse::<Timeframe>()) {
            (Ok(b), Ok(s)) => {
                self.config.base_timeframe = b;
                self.config.swing_timeframe = s;
            }
            (Err(e), _) | (_, Err(e)) => self.defer(e),
        }
        self
    }

    /// Enable/disable data validation
    pub fn validate_data(mut self, enable: bool) -> Self {
        self.config.validate_data = enable;
        self
    }

    fn defer(&mut self, error: StructureError) {
        self.error.get_or_insert(error);
    }

    /// Build the engine
    pub fn build(self) -> Result<StructureEngine> {
        if let Some(error) = self.error {
            return Err(error);
        }
        if self.config.ratio().is_none() {
            warn!(
                base = %self.config.base_timeframe,
                swing = %self.config.swing_timeframe,
                "swing timeframe is finer than the base timeframe; updates will compute nothing"
            );
        }
        Ok(StructureEngine::new(self.config))
    }
}

// ============================================================
// PARALLEL SCANNING
// ============================================================

use rayon::prelude::*;

/// Result of evaluating a single instrument
#[derive(Debug)]
pub struct ScanResult {
    pub symbol: String,
    pub snapshot: Option<StructureSnapshot>,
}

/// Error from evaluating a single instrument
#[derive(Debug)]
pub struct ScanError {
    pub symbol: String,
    pub error: StructureError,
}

/// Evaluate many instruments in parallel, each with a fresh engine
pub fn scan_parallel<'a, B, H, I>(
    config: &StructureConfig,
    instruments: I,
) -> (Vec<ScanResult>, Vec<ScanError>)
where
    B: Bar + Sync + 'a,
    H: Bar + Sync + 'a,
    I: IntoParallelIterator<Item = (&'a str, &'a [B], &'a [H])>,
{
    let results: Vec<_> = instruments
        .into_par_iter()
        .map(|(symbol, base, htf)| {
            StructureEngine::new(*config)
                .update(base, htf)
                .map(|snapshot| ScanResult {
                    symbol: symbol.to_string(),
                    snapshot,
                })
                .map_err(|error| ScanError {
                    symbol: symbol.to_string(),
                    error,
                })
        })
        .collect();

    let mut successes = Vec::new();
    let mut errors = Vec::new();

    for result in results {
        match result {
            Ok(r) => successes.push(r),
            Err(e) => errors.push(e),
        }
    }

    (successes, errors)
}

// ============================================================
// TESTS
// ============================================================
