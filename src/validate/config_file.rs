//! Reading settings out of an additional mxmlc/compc config file.
//!
//! Only the values that override build configuration settings are read:
//!
//! ```xml
//! <flex-config>
//!   <file-specs><path-element>src/com/acme/Main.mxml</path-element></file-specs>
//!   <output>bin/acme.swf</output>
//!   <target-player>11.1</target-player>
//! </flex-config>
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::debug;

use crate::core::Module;
use crate::util::fs::{is_ancestor, relative_path_inside, resolve_against};

const ROOT: &str = "flex-config";

/// Overriding values found in a config file. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InfoFromConfigFile {
    pub main_class_path: Option<PathBuf>,
    pub output_file_name: Option<String>,
    pub output_folder_path: Option<PathBuf>,
    pub target_player: Option<String>,
}

impl InfoFromConfigFile {
    /// Read the config file at `path`.
    ///
    /// A missing or malformed file yields the empty record.
    pub fn read(path: &Path) -> Self {
        match Self::try_read(path) {
            Ok(info) => info,
            Err(e) => {
                debug!("ignoring config file {}: {:#}", path.display(), e);
                Self::default()
            }
        }
    }

    fn try_read(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let base = path.parent().unwrap_or(Path::new("."));
        Self::parse(&content, base)
    }

    /// Parse config file content; relative paths resolve against `base`.
    pub fn parse(content: &str, base: &Path) -> Result<Self> {
        let mut reader = Reader::from_str(content);
        reader.config_mut().trim_text(true);

        let mut info = InfoFromConfigFile::default();
        let mut stack: Vec<String> = Vec::new();

        loop {
            match reader.read_event().context("malformed config file")? {
                Event::Start(e) => {
                    stack.push(String::from_utf8_lossy(e.name().as_ref()).into_owned());
                }
                Event::End(_) => {
                    stack.pop();
                }
                Event::Text(text) => {
                    let value = text.unescape().context("malformed text in config file")?;
                    let value = value.trim();
                    if value.is_empty() {
                        continue;
                    }
                    let path: Vec<&str> = stack.iter().map(String::as_str).collect();
                    match path.as_slice() {
                        [ROOT, "file-specs", "path-element"] if info.main_class_path.is_none() => {
                            info.main_class_path = Some(resolve_against(base, Path::new(value)));
                        }
                        [ROOT, "output"] => {
                            let output = resolve_against(base, Path::new(value));
                            info.output_file_name = output
                                .file_name()
                                .map(|n| n.to_string_lossy().into_owned());
                            info.output_folder_path = output.parent().map(Path::to_path_buf);
                        }
                        [ROOT, "target-player"] => {
                            info.target_player = Some(value.to_string());
                        }
                        _ => {}
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        Ok(info)
    }

    /// Fully qualified main class, when the main class file lies in a source root of `module`.
    pub fn main_class(&self, module: &Module) -> Option<String> {
        let path = self.main_class_path.as_ref()?;
        let root = module
            .source_roots()
            .iter()
            .filter(|root| is_ancestor(root, path, true))
            .max_by_key(|root| root.components().count())?;
        let relative = relative_path_inside(root, &path.with_extension(""))?;
        Some(relative.replace('/', "."))
    }

    /// Whether the file overrides the output location.
    pub fn overrides_output(&self) -> bool {
        self.output_file_name.is_some() || self.output_folder_path.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const CONFIG: &str = r#"<?xml version="1.0"?>
<flex-config>
  <compiler>
    <source-path><path-element>ignored</path-element></source-path>
  </compiler>
  <file-specs>
    <path-element>src/com/acme/Main.mxml</path-element>
    <path-element>src/Other.as</path-element>
  </file-specs>
  <output>bin/acme.swf</output>
  <target-player>11.1</target-player>
</flex-config>
"#;

    #[test]
    fn test_parse_overrides() {
        let info = InfoFromConfigFile::parse(CONFIG, Path::new("/p")).unwrap();
        assert_eq!(info.main_class_path, Some(PathBuf::from("/p/src/com/acme/Main.mxml")));
        assert_eq!(info.output_file_name.as_deref(), Some("acme.swf"));
        assert_eq!(info.output_folder_path, Some(PathBuf::from("/p/bin")));
        assert_eq!(info.target_player.as_deref(), Some("11.1"));
        assert!(info.overrides_output());
    }

    #[test]
    fn test_main_class_relative_to_source_root() {
        let info = InfoFromConfigFile::parse(CONFIG, Path::new("/p")).unwrap();
        let module = Module::new("app").with_source_root("/p/src");
        assert_eq!(info.main_class(&module).as_deref(), Some("com.acme.Main"));

        let elsewhere = Module::new("lib").with_source_root("/q/src");
        assert_eq!(info.main_class(&elsewhere), None);
    }

    #[test]
    fn test_missing_or_broken_file_is_empty() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(InfoFromConfigFile::read(&tmp.path().join("none.xml")), InfoFromConfigFile::default());

        let broken = tmp.path().join("broken.xml");
        std::fs::write(&broken, "<flex-config><output>a.swf</flex-config>").unwrap();
        assert_eq!(InfoFromConfigFile::read(&broken), InfoFromConfigFile::default());
    }

    #[test]
    fn test_empty_config_has_no_overrides() {
        let info = InfoFromConfigFile::parse("<flex-config/>", Path::new("/p")).unwrap();
        assert_eq!(info, InfoFromConfigFile::default());
        assert!(!info.overrides_output());
    }
}
