//! Points accrual for token holders.
//!
//! A holder earns `balance * rate` points for every block since the
//! programme's start block, as long as the balance is positive. The result is
//! recomputed from scratch on every read; nothing here is incremental.

use alloy_primitives::{U256, utils::format_units};
use eyre::{Result, WrapErr};
use serde::Serialize;

/// Default reward rate: points per whole token per block.
pub const DEFAULT_POINTS_RATE: f64 = 0.000_000_000_1;
/// Default block from which holding time is counted.
pub const DEFAULT_START_BLOCK: u64 = 257_810;
/// Decimals of a standard ERC-20 token.
pub const DEFAULT_TOKEN_DECIMALS: u8 = 18;

/// Upper bound (inclusive) of points for level 1.
pub const LEVEL_1_MAX_POINTS: f64 = 35.0;
/// Upper bound (inclusive) of points for level 2.
pub const LEVEL_2_MAX_POINTS: f64 = 350.0;
/// Upper bound (inclusive) of points for level 3.
pub const LEVEL_3_MAX_POINTS: f64 = 3500.0;

/// Cosmetic tier derived from a points total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "u8")]
pub enum Level {
    /// Up to and including 35 points.
    Seedling = 1,
    /// Up to and including 350 points.
    Sprout = 2,
    /// Up to and including 3500 points.
    Tree = 3,
    /// Anything above 3500 points.
    Legend = 4,
}

impl Level {
    /// Bucket a points total. Boundaries are closed on the upper side.
    pub fn from_points(points: f64) -> Self {
        if points <= LEVEL_1_MAX_POINTS {
            Self::Seedling
        } else if points <= LEVEL_2_MAX_POINTS {
            Self::Sprout
        } else if points <= LEVEL_3_MAX_POINTS {
            Self::Tree
        } else {
            Self::Legend
        }
    }

    /// Numeric level, 1 through 4.
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Whether no higher level exists.
    pub const fn is_max(self) -> bool {
        matches!(self, Self::Legend)
    }
}

impl From<Level> for u8 {
    fn from(level: Level) -> Self {
        level.as_u8()
    }
}

/// Fixed parameters of the points programme.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointsParams {
    /// Block from which holding time is counted.
    pub start_block: u64,
    /// Points per whole token per block.
    pub rate: f64,
}

impl Default for PointsParams {
    fn default() -> Self {
        Self { start_block: DEFAULT_START_BLOCK, rate: DEFAULT_POINTS_RATE }
    }
}

impl PointsParams {
    /// Create a new parameter set.
    pub const fn new(start_block: u64, rate: f64) -> Self {
        Self { start_block, rate }
    }

    /// Number of blocks credited to a holder at `current_block`.
    ///
    /// An empty balance earns no holding time at all. A head below the start
    /// block counts as zero elapsed blocks.
    pub fn blocks_held(&self, token_balance: f64, current_block: u64) -> u64 {
        if token_balance > 0.0 { current_block.saturating_sub(self.start_block) } else { 0 }
    }

    /// Score a balance at the given chain height.
    pub fn snapshot(&self, token_balance: f64, current_block: u64) -> PointsSnapshot {
        let blocks_held = self.blocks_held(token_balance, current_block);
        if blocks_held == 0 {
            return PointsSnapshot::empty(token_balance);
        }

        let points = token_balance * self.rate * blocks_held as f64;
        let level = Level::from_points(points);
        PointsSnapshot { balance: token_balance, blocks_held, points, level }
    }
}

/// Derived view of a holder's standing at one chain height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PointsSnapshot {
    /// Balance in whole tokens.
    pub balance: f64,
    /// Blocks credited since the start block.
    pub blocks_held: u64,
    /// Accrued points.
    pub points: f64,
    /// Tier for `points`.
    pub level: Level,
}

impl PointsSnapshot {
    const fn empty(balance: f64) -> Self {
        Self { balance, blocks_held: 0, points: 0.0, level: Level::Seedling }
    }
}

/// Convert a raw token amount (smallest unit) into whole tokens.
pub fn to_token_units(raw: U256, decimals: u8) -> Result<f64> {
    let formatted = format_units(raw, decimals)
        .wrap_err_with(|| format!("cannot format {raw} with {decimals} decimals"))?;
    formatted.parse::<f64>().wrap_err_with(|| format!("invalid token amount {formatted}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_balance_earns_nothing() {
        let params = PointsParams::new(0, 1.0);
        for head in [0, 1, 1_000, u64::MAX] {
            let snap = params.snapshot(0.0, head);
            assert_eq!(snap.blocks_held, 0);
            assert_eq!(snap.points, 0.0);
            assert_eq!(snap.level, Level::Seedling);
        }
    }

    #[test]
    fn points_scale_with_balance_rate_and_blocks() {
        let rate = DEFAULT_POINTS_RATE;
        let params = PointsParams::new(0, rate);
        let snap = params.snapshot(10.0, 1000);
        assert_eq!(snap.blocks_held, 1000);
        assert_eq!(snap.points, 10.0 * rate * 1000.0);
    }

    #[test]
    fn points_do_not_decrease_as_chain_advances() {
        let params = PointsParams::default();
        let mut last = 0.0;
        for head in (DEFAULT_START_BLOCK..DEFAULT_START_BLOCK + 5_000).step_by(250) {
            let points = params.snapshot(1_234_567.0, head).points;
            assert!(points >= last);
            last = points;
        }
    }

    #[test]
    fn head_before_start_block_saturates() {
        let params = PointsParams::new(500, 1.0);
        let snap = params.snapshot(42.0, 100);
        assert_eq!(snap.blocks_held, 0);
        assert_eq!(snap.points, 0.0);
        assert_eq!(snap.balance, 42.0);
    }

    #[test]
    fn level_boundaries_are_closed() {
        assert_eq!(Level::from_points(0.0), Level::Seedling);
        assert_eq!(Level::from_points(35.00), Level::Seedling);
        assert_eq!(Level::from_points(35.01), Level::Sprout);
        assert_eq!(Level::from_points(350.0), Level::Sprout);
        assert_eq!(Level::from_points(350.01), Level::Tree);
        assert_eq!(Level::from_points(3500.00), Level::Tree);
        assert_eq!(Level::from_points(3500.01), Level::Legend);
        assert!(Level::Legend.is_max());
        assert_eq!(u8::from(Level::Tree), 3);
    }

    #[test]
    fn raw_amounts_convert_with_decimals() {
        let ten = U256::from(10u64) * U256::from(10u64).pow(U256::from(18u64));
        assert_eq!(to_token_units(ten, 18).unwrap(), 10.0);
        assert_eq!(to_token_units(U256::ZERO, 18).unwrap(), 0.0);
        assert_eq!(to_token_units(U256::from(1_500u64), 3).unwrap(), 1.5);
    }

    #[test]
    fn snapshot_serializes_level_as_number() {
        let snap = PointsParams::new(0, 1.0).snapshot(1.0, 100);
        let json = serde_json::to_value(snap).unwrap();
        assert_eq!(json["level"], 3);
        assert_eq!(json["blocks_held"], 100);
    }
}
