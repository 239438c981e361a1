use std::path::Path;

use anyhow::{Context, Result};
use convoy_model::Workspace;

pub mod run;
pub mod targets;

/// Load a workspace file; relative project roots are taken from the file's directory.
pub fn load_workspace(path: &Path) -> Result<Workspace> {
    let mut workspace =
        Workspace::load(path).with_context(|| format!("loading workspace {}", path.display()))?;

    let base = path.parent().unwrap_or_else(|| Path::new("."));
    for project in workspace.projects.values_mut() {
        if let Some(root) = project.root.as_mut().filter(|r| r.is_relative()) {
            *root = base.join(&*root);
        }
    }
    Ok(workspace)
}
