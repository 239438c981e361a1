use std::{path::Path, process::ExitCode};

use anyhow::Result;

use super::load_workspace;

pub fn list(path: &Path) -> Result<ExitCode> {
    let workspace = load_workspace(path)?;
    for target in workspace.targets() {
        let def = workspace.target(&target.project, &target.target)?;
        let configurations: Vec<&str> = def.configurations.keys().map(String::as_str).collect();
        if configurations.is_empty() {
            println!("{target}\t{}", def.builder);
        } else {
            println!("{target}\t{}\t[{}]", def.builder, configurations.join(","));
        }
    }
    Ok(ExitCode::SUCCESS)
}
