//! `flexbuild init` command

use std::path::Path;

use anyhow::{bail, Result};

use crate::cli::InitArgs;
use flexbuild::ops::init_project;
use flexbuild::util::GlobalContext;

/// Determines the project name from the arguments or directory.
pub fn determine_project_name(name: &Option<String>, path: &Path) -> String {
    name.clone().unwrap_or_else(|| {
        path.file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unnamed")
            .to_string()
    })
}

/// Validates a project name; it is also used as module and file name.
pub fn validate_project_name(name: &str) -> Result<(), &'static str> {
    if name.is_empty() {
        return Err("project name cannot be empty");
    }

    if name.starts_with('-') || name.starts_with('.') {
        return Err("project name cannot start with a hyphen or a dot");
    }

    if !name.chars().all(|c| c.is_alphanumeric() || c == '-' || c == '_') {
        return Err("project name contains invalid characters");
    }

    Ok(())
}

pub fn execute(args: InitArgs, ctx: &GlobalContext) -> Result<()> {
    let path = match args.path {
        Some(path) if path.is_absolute() => path,
        Some(path) => ctx.cwd().join(path),
        None => ctx.cwd().to_path_buf(),
    };

    let name = determine_project_name(&args.name, &path);
    if let Err(reason) = validate_project_name(&name) {
        bail!("invalid project name `{}`: {}", name, reason);
    }

    init_project(&path, &name)?;
    eprintln!("     Initialized project `{}`", name);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_determine_project_name() {
        assert_eq!(determine_project_name(&None, &PathBuf::from("/work/shop")), "shop");
        assert_eq!(
            determine_project_name(&Some("kiosk".to_string()), &PathBuf::from("/work/shop")),
            "kiosk"
        );
    }

    #[test]
    fn test_validate_project_name() {
        assert!(validate_project_name("shop_app-2").is_ok());
        assert!(validate_project_name("").is_err());
        assert!(validate_project_name("-x").is_err());
        assert!(validate_project_name("my app").is_err());
    }
}
