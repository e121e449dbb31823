//! Running SDK command-line tools.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::{Context, Result};

/// A tool invocation: program, arguments, extra environment and working
/// directory. Environment entries keep insertion order so the printed form
/// of a command is stable.
#[derive(Debug, Clone)]
pub struct ProcessBuilder {
    program: PathBuf,
    args: Vec<String>,
    env: Vec<(String, String)>,
    cwd: Option<PathBuf>,
}

/// What a finished tool run left behind.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    pub success: bool,
    pub code: Option<i32>,
    /// stdout followed by stderr, as the compilers interleave diagnostics
    /// across both streams.
    pub log: String,
}

impl ProcessBuilder {
    pub fn new(program: impl AsRef<Path>) -> Self {
        ProcessBuilder {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
            env: Vec::new(),
            cwd: None,
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_string_lossy().into_owned());
        self
    }

    pub fn args<I, S>(self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        args.into_iter().fold(self, |pb, a| pb.arg(a))
    }

    /// Set an environment variable, replacing an earlier value for `key`.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        self.env.retain(|(k, _)| *k != key);
        self.env.push((key, value.into()));
        self
    }

    pub fn cwd(mut self, cwd: impl AsRef<Path>) -> Self {
        self.cwd = Some(cwd.as_ref().to_path_buf());
        self
    }

    pub fn get_program(&self) -> &Path {
        &self.program
    }

    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    /// Run to completion with stdin closed.
    pub fn exec(&self) -> Result<ToolOutput> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .envs(self.env.iter().map(|(k, v)| (k, v)))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(cwd) = &self.cwd {
            cmd.current_dir(cwd);
        }

        let output = cmd
            .output()
            .with_context(|| format!("failed to spawn `{}`", self.program.display()))?;

        let mut log = String::from_utf8_lossy(&output.stdout).into_owned();
        log.push_str(&String::from_utf8_lossy(&output.stderr));
        Ok(ToolOutput {
            success: output.status.success(),
            code: output.status.code(),
            log,
        })
    }

    /// Shell-like rendering, quoting words that contain whitespace.
    pub fn display_command(&self) -> String {
        std::iter::once(self.program.display().to_string())
            .chain(self.args.iter().cloned())
            .map(|word| {
                if word.chars().any(char::is_whitespace) {
                    format!("\"{}\"", word)
                } else {
                    word
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Path of a tool shipped in an SDK's `bin` directory (`mxmlc`, `compc`, ...).
pub fn sdk_tool(sdk_home: &Path, name: &str) -> PathBuf {
    let file = if cfg!(windows) {
        format!("{}.bat", name)
    } else {
        name.to_string()
    };
    sdk_home.join("bin").join(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn test_exec_collects_both_streams() {
        let output = ProcessBuilder::new("sh")
            .args(["-c", "echo compiled; echo warning >&2; exit 3"])
            .exec()
            .unwrap();

        assert!(!output.success);
        assert_eq!(output.code, Some(3));
        assert_eq!(output.log, "compiled\nwarning\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_exec_passes_environment() {
        let output = ProcessBuilder::new("sh")
            .args(["-c", "echo $FLEX_HOME"])
            .env("FLEX_HOME", "/old")
            .env("FLEX_HOME", "/sdks/4.16")
            .exec()
            .unwrap();

        assert!(output.success);
        assert_eq!(output.log.trim(), "/sdks/4.16");
    }

    #[test]
    fn test_display_command_quotes_spaces() {
        let pb = ProcessBuilder::new("mxmlc").args(["-debug=true", "-output=/My Project/app.swf", "Main.mxml"]);

        assert_eq!(
            pb.display_command(),
            "mxmlc -debug=true \"-output=/My Project/app.swf\" Main.mxml"
        );
    }

    #[test]
    fn test_sdk_tool_location() {
        let tool = sdk_tool(Path::new("/sdks/4.6"), "mxmlc");
        assert!(tool.starts_with("/sdks/4.6/bin"));
    }
}
