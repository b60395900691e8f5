use lending_hub_core::ProgramAssumptions;
use tracing::info;

use crate::input;

/// Loan-program assumptions for this run: defaults, or the overrides in
/// `path` (`.yaml`/`.yml` parsed as YAML, anything else as JSON).
pub fn load_assumptions(
    path: Option<&str>,
) -> Result<ProgramAssumptions, Box<dyn std::error::Error>> {
    let Some(path) = path else {
        return Ok(ProgramAssumptions::default());
    };

    let (canonical, contents) = input::file::read_text(path)?;
    let is_yaml = canonical
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

    let assumptions: ProgramAssumptions = if is_yaml {
        serde_yaml::from_str(&contents)
            .map_err(|e| format!("Failed to parse '{}': {}", canonical.display(), e))?
    } else {
        serde_json::from_str(&contents)
            .map_err(|e| format!("Failed to parse '{}': {}", canonical.display(), e))?
    };
    assumptions.validate()?;

    info!(path = %canonical.display(), "loaded program assumptions");
    Ok(assumptions)
}
