//! Implementation of `flexbuild init`.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::core::manifest::generate_default_manifest;
use crate::core::MANIFEST_NAME;

/// Create `flexbuild.toml`, a main class and `.gitignore` in an existing directory.
pub fn init_project(path: &Path, name: &str) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("failed to create directory: {}", path.display()))?;
    }

    let manifest_path = path.join(MANIFEST_NAME);
    if manifest_path.exists() {
        bail!("`{}` already exists in `{}`", MANIFEST_NAME, path.display());
    }

    fs::write(&manifest_path, generate_default_manifest(name))
        .with_context(|| format!("failed to write {}", MANIFEST_NAME))?;

    let src_dir = path.join("src");
    fs::create_dir_all(&src_dir).with_context(|| "failed to create src directory")?;

    let main = src_dir.join("Main.as");
    if !main.exists() {
        let main_content = r#"package {
import flash.display.Sprite;
import flash.text.TextField;

public class Main extends Sprite {
    public function Main() {
        var label:TextField = new TextField();
        label.text = "Hello, flexbuild!";
        addChild(label);
    }
}
}
"#;
        fs::write(&main, main_content).with_context(|| "failed to write src/Main.as")?;
    }

    let gitignore = path.join(".gitignore");
    if !gitignore.exists() {
        fs::write(&gitignore, "# flexbuild output\nout/\n.flexbuild/\n")?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Manifest;
    use tempfile::TempDir;

    #[test]
    fn test_init_existing_dir() {
        let tmp = TempDir::new().unwrap();
        init_project(tmp.path(), "hello").unwrap();

        assert!(tmp.path().join(MANIFEST_NAME).exists());
        assert!(tmp.path().join("src/Main.as").exists());

        let manifest = Manifest::load(&tmp.path().join(MANIFEST_NAME)).unwrap();
        let project = manifest.into_project();
        let module = project.module("hello").unwrap();
        assert!(module.has_main_class("Main"));
    }

    #[test]
    fn test_init_refuses_existing_manifest() {
        let tmp = TempDir::new().unwrap();
        init_project(tmp.path(), "hello").unwrap();
        let err = init_project(tmp.path(), "hello").unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }
}
