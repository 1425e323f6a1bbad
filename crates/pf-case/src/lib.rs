//! pf-case: case file format and validation.

pub mod schema;
pub mod validate;

pub use schema::*;
pub use validate::{ValidationError, validate_case};

/// Case schema version written by this crate.
pub const LATEST_VERSION: u32 = 1;

pub type CaseResult<T> = Result<T, CaseError>;

#[derive(thiserror::Error, Debug)]
pub enum CaseError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn load_yaml(path: &std::path::Path) -> CaseResult<Case> {
    let content = std::fs::read_to_string(path)?;
    let case: Case = serde_yaml::from_str(&content)?;
    validate_case(&case)?;
    Ok(case)
}

pub fn save_yaml(path: &std::path::Path, case: &Case) -> CaseResult<()> {
    validate_case(case)?;
    let content = serde_yaml::to_string(case)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &std::path::Path) -> CaseResult<Case> {
    let content = std::fs::read_to_string(path)?;
    let case: Case = serde_json::from_str(&content)?;
    validate_case(&case)?;
    Ok(case)
}

pub fn save_json(path: &std::path::Path, case: &Case) -> CaseResult<()> {
    validate_case(case)?;
    let content = serde_json::to_string_pretty(case)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Load by extension: `.json` as JSON, anything else as YAML.
pub fn load(path: &std::path::Path) -> CaseResult<Case> {
    if path.extension().is_some_and(|ext| ext == "json") {
        load_json(path)
    } else {
        load_yaml(path)
    }
}
