use anyhow::{Context, Result, ensure};
use std::fs;
use std::path::Path;
use std::sync::Arc;

use confplan_engine::{CartAction, Catalog};

pub fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

/// Parse a comma-separated seed list. At least one seed is required.
pub fn parse_seeds(s: &str) -> Result<Vec<u64>> {
    let seeds = split_csv(s)
        .iter()
        .map(|token| {
            token
                .parse::<u64>()
                .with_context(|| format!("invalid seed '{token}'"))
        })
        .collect::<Result<Vec<_>>>()?;
    ensure!(!seeds.is_empty(), "at least one seed is required");
    Ok(seeds)
}

/// Load a catalog file, or the embedded default catalog when no path is given.
pub fn load_catalog(path: Option<&Path>) -> Result<Arc<Catalog>> {
    let Some(path) = path else {
        return Ok(Arc::new(Catalog::default_catalog().clone()));
    };
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read catalog {}", path.display()))?;
    let catalog = Catalog::from_json(&json)
        .with_context(|| format!("invalid catalog {}", path.display()))?;
    Ok(Arc::new(catalog))
}

pub fn load_script(path: &Path) -> Result<Vec<CartAction>> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read script {}", path.display()))?;
    CartAction::script_from_json(&json)
        .with_context(|| format!("invalid action script {}", path.display()))
}
