use axum::Json;

use crate::{
    calculator::{self, CalculatorInput, Estimate},
    error::AppError,
};

/// Handle /api/calculator
pub async fn handle_calculator(
    Json(input): Json<CalculatorInput>,
) -> Result<Json<Estimate>, AppError> {
    let estimate = calculator::estimate(&input)?;
    tracing::debug!(area = input.area, total = estimate.total, "Estimate computed");
    Ok(Json(estimate))
}
