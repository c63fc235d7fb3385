//! Source formatting of the composed module.
//!
//! The composer hands its text to a [`Formatter`] exactly once with the fixed
//! [`FormatStyle::fixed`] configuration and returns whatever comes back.
//! A formatter failure aborts the run; there is no fallback to unformatted
//! text.

use std::process::Stdio;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use crate::error::{GenError, Result};

/// Style switches handed to the formatter.
///
/// [`CommandFormatter`] acts on `verify` and `editorconfig`. The other
/// switches describe the fixed configuration and are not forwarded to the
/// external program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatStyle {
    /// Rewrite the file in place instead of returning text.
    pub replace: bool,
    /// Only check formatting; the input comes back unchanged when it passes.
    pub verify: bool,
    pub tsconfig: bool,
    pub tslint: bool,
    pub editorconfig: bool,
    pub tsfmt: bool,
    pub vscode: bool,
}

impl FormatStyle {
    /// The one configuration generation runs use.
    pub const fn fixed() -> Self {
        Self {
            replace: false,
            verify: false,
            tsconfig: true,
            tslint: true,
            editorconfig: true,
            tsfmt: true,
            vscode: false,
        }
    }
}

impl Default for FormatStyle {
    fn default() -> Self {
        Self::fixed()
    }
}

/// External source formatter.
#[async_trait]
pub trait Formatter: Send + Sync {
    /// Format `source`; `filename_hint` selects language and config lookup.
    async fn format(&self, filename_hint: &str, source: &str, style: &FormatStyle)
        -> Result<String>;
}

/// Formatter that returns its input unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughFormatter;

#[async_trait]
impl Formatter for PassthroughFormatter {
    async fn format(&self, _filename_hint: &str, source: &str, _style: &FormatStyle) -> Result<String> {
        Ok(source.to_string())
    }
}

/// Formatter backed by an external program reading stdin and writing stdout.
///
/// The default is `prettier --stdin-filepath <hint>`. The literal `{file}`
/// in any argument is replaced with the filename hint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandFormatter {
    program: String,
    args: Vec<String>,
}

impl CommandFormatter {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// `prettier --stdin-filepath {file}`.
    pub fn prettier() -> Self {
        Self::new(
            "prettier",
            vec!["--stdin-filepath".to_string(), "{file}".to_string()],
        )
    }

    /// Parse a whitespace-separated command line such as `"npx prettier --stdin-filepath {file}"`.
    pub fn from_command_line(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self::new(program, parts.collect()))
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments for one invocation.
    pub fn args_for(&self, filename_hint: &str, style: &FormatStyle) -> Vec<String> {
        let mut args: Vec<String> = self
            .args
            .iter()
            .map(|arg| arg.replace("{file}", filename_hint))
            .collect();
        if style.verify {
            args.push("--check".to_string());
        }
        if !style.editorconfig {
            args.push("--no-editorconfig".to_string());
        }
        args
    }
}

impl Default for CommandFormatter {
    fn default() -> Self {
        Self::prettier()
    }
}

#[async_trait]
impl Formatter for CommandFormatter {
    async fn format(&self, filename_hint: &str, source: &str, style: &FormatStyle) -> Result<String> {
        let args = self.args_for(filename_hint, style);
        debug!(program = %self.program, ?args, "Running formatter");

        let mut child = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                GenError::format(filename_hint, format!("failed to start '{}': {}", self.program, e))
            })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| GenError::format(filename_hint, "formatter stdin unavailable"))?;
        let input = source.as_bytes().to_vec();
        // stdin is fed while stdout drains; either pipe can fill.
        let writer = tokio::spawn(async move {
            stdin.write_all(&input).await?;
            stdin.shutdown().await
        });

        let output = child.wait_with_output().await?;
        let written = writer
            .await
            .map_err(|e| GenError::format(filename_hint, format!("stdin writer failed: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GenError::format(
                filename_hint,
                format!("'{}' exited with {}: {}", self.program, output.status, stderr.trim()),
            ));
        }
        written?;

        if style.verify {
            return Ok(source.to_string());
        }
        String::from_utf8(output.stdout)
            .map_err(|e| GenError::format(filename_hint, format!("formatter produced invalid UTF-8: {}", e)))
    }
}
