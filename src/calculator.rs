//! Renovation budget estimate
//!
//! A pure function of four inputs: apartment area, housing type, design
//! project and demolition. Amounts are whole rubles; intermediate values are
//! kept in kopecks so the secondary-housing surcharge rounds exactly once.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Work cost per square metre, rubles
pub const BASE_WORK_RATE: u64 = 18_000;
/// Rough materials cost per square metre, rubles
pub const BASE_MATERIAL_RATE: u64 = 12_000;
/// Work surcharge for secondary housing, percent of the base work cost
pub const SECONDARY_WORK_PERCENT: u64 = 115;
/// Demolition cost per square metre (secondary housing only), rubles
pub const DEMOLITION_RATE: u64 = 2_500;
/// Design project cost per square metre, rubles
pub const DESIGN_RATE: u64 = 2_500;
/// Largest area the calculator accepts, square metres
pub const MAX_AREA: u32 = 150;
/// Area the page starts with
pub const DEFAULT_AREA: u32 = 45;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CalculatorError {
    #[error("area {area} m² is out of range (0..={max})")]
    AreaOutOfRange { area: u32, max: u32 },
}

/// Calculator inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculatorInput {
    #[serde(default = "default_area")]
    pub area: u32,
    #[serde(default = "default_new_build")]
    pub is_new_build: bool,
    #[serde(default)]
    pub has_design_project: bool,
    /// Only meaningful for secondary housing
    #[serde(default)]
    pub needs_demolition: bool,
}

fn default_area() -> u32 {
    DEFAULT_AREA
}

fn default_new_build() -> bool {
    true
}

impl Default for CalculatorInput {
    fn default() -> Self {
        Self {
            area: DEFAULT_AREA,
            is_new_build: true,
            has_design_project: false,
            needs_demolition: false,
        }
    }
}

impl CalculatorInput {
    /// Drop the demolition flag on new builds, the page hides that switch
    pub fn normalized(self) -> Self {
        Self {
            needs_demolition: self.needs_demolition && !self.is_new_build,
            ..self
        }
    }
}

/// Derived totals, whole rubles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Estimate {
    pub work: u64,
    pub materials: u64,
    pub design: u64,
    pub total: u64,
}

/// Compute the estimate for the given inputs
pub fn estimate(input: &CalculatorInput) -> Result<Estimate, CalculatorError> {
    if input.area > MAX_AREA {
        return Err(CalculatorError::AreaOutOfRange {
            area: input.area,
            max: MAX_AREA,
        });
    }

    let input = input.normalized();
    let area = u64::from(input.area);

    let mut work = BASE_WORK_RATE * area * 100;
    if !input.is_new_build {
        work = work * SECONDARY_WORK_PERCENT / 100;
        if input.needs_demolition {
            work += DEMOLITION_RATE * area * 100;
        }
    }

    let materials = BASE_MATERIAL_RATE * area * 100;
    let design = if input.has_design_project {
        DESIGN_RATE * area * 100
    } else {
        0
    };

    Ok(Estimate {
        work: round_kopecks(work),
        materials: round_kopecks(materials),
        design: round_kopecks(design),
        total: round_kopecks(work + materials + design),
    })
}

fn round_kopecks(kopecks: u64) -> u64 {
    (kopecks + 50) / 100
}
