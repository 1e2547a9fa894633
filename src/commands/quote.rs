use anyhow::Result;
use colored::Colorize;
use lead_relay::{
    calculator::{self, CalculatorInput},
    format::format_rubles,
};

/// Execute the quote command
pub fn execute(area: u32, secondary: bool, design: bool, demolition: bool) -> Result<()> {
    let input = CalculatorInput {
        area,
        is_new_build: !secondary,
        has_design_project: design,
        needs_demolition: demolition,
    };
    if demolition && !secondary {
        println!("{}", "Demolition only applies to secondary housing, ignoring".yellow());
    }

    let estimate = calculator::estimate(&input)?;

    println!("{}", "Estimate:".bold());
    println!(
        "  {}: {} m², {}",
        "Apartment".cyan(),
        area,
        if secondary { "secondary housing" } else { "new build" }
    );
    println!("  {}: {} ₽", "Work".cyan(), format_rubles(estimate.work));
    println!("  {}: {} ₽", "Materials".cyan(), format_rubles(estimate.materials));
    if design {
        println!("  {}: {} ₽", "Design project".cyan(), format_rubles(estimate.design));
    }
    println!("  {}: {} ₽", "Total".green().bold(), format_rubles(estimate.total));

    Ok(())
}
