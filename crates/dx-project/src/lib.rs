//! dx-project: structured input format for DX coil models.
//!
//! A project lists curves, schedules, performances, operating modes, speeds
//! and coils, cross-referenced by name. Loading validates the graph;
//! `build_coil` and `build_bank` resolve it into `dx_coil` records.

pub mod build;
pub mod schema;
pub mod validate;

pub use build::{build_bank, build_coil, build_curves, build_performance, build_schedules};
pub use schema::*;
pub use validate::{LATEST_VERSION, ValidationError, validate_project};

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Coil error: {0}")]
    Coil(#[from] dx_coil::CoilError),

    #[error("Curve error: {0}")]
    Curve(#[from] dx_curves::CurveError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn load_yaml(path: &std::path::Path) -> ProjectResult<ProjectDef> {
    let content = std::fs::read_to_string(path)?;
    from_yaml_str(&content)
}

/// Parse and validate a project from YAML text.
pub fn from_yaml_str(content: &str) -> ProjectResult<ProjectDef> {
    let project: ProjectDef = serde_yaml::from_str(content)?;
    validate_project(&project)?;
    Ok(project)
}

pub fn save_yaml(path: &std::path::Path, project: &ProjectDef) -> ProjectResult<()> {
    validate_project(project)?;
    let content = serde_yaml::to_string(project)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &std::path::Path) -> ProjectResult<ProjectDef> {
    let content = std::fs::read_to_string(path)?;
    let project: ProjectDef = serde_json::from_str(&content)?;
    validate_project(&project)?;
    Ok(project)
}

pub fn save_json(path: &std::path::Path, project: &ProjectDef) -> ProjectResult<()> {
    validate_project(project)?;
    let content = serde_json::to_string_pretty(project)?;
    std::fs::write(path, content)?;
    Ok(())
}
