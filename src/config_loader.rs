use crate::config::Plan;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::info;
use std::fs::File;
use std::path::Path;

/// Load, parse and validate an allocation plan from a YAML file
pub fn load_plan(plan_path: &Path) -> Result<Plan> {
    info!("Loading plan from: {:?}", plan_path);

    let file = File::open(plan_path)
        .wrap_err_with(|| format!("Failed to open plan file '{}'", plan_path.display()))?;

    let plan: Plan = serde_yaml::from_reader(file)
        .wrap_err_with(|| format!("Failed to parse plan file '{}'", plan_path.display()))?;

    plan.validate()
        .wrap_err_with(|| format!("Invalid plan file '{}'", plan_path.display()))?;

    info!(
        "Plan for {}: {} fixed reservation(s), {} request(s)",
        plan.network,
        plan.reservations.len(),
        plan.requests.len()
    );

    Ok(plan)
}
