use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{Result, ScoringError};

pub const MAX_POSITION: u32 = 100;

/// Club championship points for positions 1..=47; every later position pays 1.
const CLUB_POINTS: [u32; 47] = [
    60, 55, 51, 48, 46, 44, 42, 40, 39, 38, 37, 36, 35, 34, 33, 32, 31, 30, 29, 28, 27, 26, 25,
    24, 23, 22, 21, 20, 19, 18, 17, 16, 15, 14, 13, 12, 11, 10, 9, 8, 7, 6, 5, 4, 3, 2, 1,
];

/// A single row of a custom points table.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Validate)]
pub struct PointsAllocation {
    #[validate(range(min = 1, max = 100, message = "position must be between 1 and 100"))]
    pub position: u32,
    pub points: Decimal,
}

/// Maps finishing position to base points for positions 1..=100.
#[derive(Debug, Clone, PartialEq)]
pub struct PointsTable {
    points: Vec<Decimal>,
}

impl Default for PointsTable {
    fn default() -> Self {
        Self::club_default()
    }
}

impl PointsTable {
    pub fn club_default() -> Self {
        let points = (1..=MAX_POSITION)
            .map(|position| {
                let value = CLUB_POINTS
                    .get((position - 1) as usize)
                    .copied()
                    .unwrap_or(1);
                Decimal::from(value)
            })
            .collect();
        Self { points }
    }

    /// Builds a table from explicit allocations. Positions without an allocation pay nothing.
    pub fn from_allocations(allocations: &[PointsAllocation]) -> Result<Self> {
        let mut points = vec![None; MAX_POSITION as usize];

        for allocation in allocations {
            allocation.validate()?;
            if allocation.points.is_sign_negative() {
                return Err(ScoringError::InvalidPointsTable(format!(
                    "position {} has negative points {}",
                    allocation.position, allocation.points
                )));
            }
            let slot = &mut points[(allocation.position - 1) as usize];
            if slot.is_some() {
                return Err(ScoringError::InvalidPointsTable(format!(
                    "position {} is allocated more than once",
                    allocation.position
                )));
            }
            *slot = Some(allocation.points);
        }

        Ok(Self {
            points: points.into_iter().map(|p| p.unwrap_or(Decimal::ZERO)).collect(),
        })
    }

    /// Points for a position, clamping out-of-range positions to 1 or 100.
    pub fn points_for_position(&self, position: u32) -> Decimal {
        let position = position.clamp(1, MAX_POSITION);
        self.points[(position - 1) as usize]
    }

    /// Mean of the points for the `tie_count` positions starting at `position`.
    pub fn shared_points(&self, position: u32, tie_count: u32) -> Decimal {
        if tie_count <= 1 {
            return self.points_for_position(position);
        }
        let total: Decimal = (position..position + tie_count)
            .map(|p| self.points_for_position(p))
            .sum();
        total / Decimal::from(tie_count)
    }
}
