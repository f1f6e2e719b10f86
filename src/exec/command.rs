// src/exec/command.rs

//! Run a command for each settled file.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use anyhow::{anyhow, Context};
use tokio::process::Command;
use tracing::{debug, error, info, warn};

use crate::errors::Result;
use crate::fs::FileSystem;
use crate::types::SettledFile;
use crate::watch::path_utils::relative_str;

use super::backend::{ConsumerBackend, Outcome};

/// Runs `argv` (after placeholder expansion) once per settled file.
///
/// Placeholders, replaced anywhere inside an argument:
/// - `{path}`: absolute path of the settled file
/// - `{root}`: the watch root
/// - `{rel}`: path relative to the root, forward slashes
/// - `{name}`: file name only
///
/// With `delete_after`, the file is removed once the command exits
/// successfully.
#[derive(Debug, Clone)]
pub struct CommandConsumer {
    argv: Vec<String>,
    delete_after: bool,
    fs: Arc<dyn FileSystem>,
}

impl CommandConsumer {
    pub fn new(argv: Vec<String>, delete_after: bool, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            argv,
            delete_after,
            fs,
        }
    }

    async fn process(&self, file: SettledFile) -> Result<Outcome> {
        if !self.fs.exists(&file.path) {
            warn!(path = ?file.path, "settled file no longer exists; skipping");
            return Ok(Outcome::Missing);
        }

        let argv = expand_template(&self.argv, &file);
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| anyhow!("consumer command is empty"))?;

        info!(path = ?file.path, cmd = ?argv, "running consumer command");

        let output = Command::new(program)
            .args(args)
            .kill_on_drop(true)
            .output()
            .await
            .with_context(|| format!("spawning consumer command {program:?}"))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        let code = output.status.code().unwrap_or(-1);

        if !output.status.success() {
            warn!(
                path = ?file.path,
                exit_code = code,
                stdout = %stdout.trim_end(),
                stderr = %stderr.trim_end(),
                "consumer command failed; file kept"
            );
            return Ok(Outcome::Failed(code));
        }

        info!(
            path = ?file.path,
            stdout = %stdout.trim_end(),
            stderr = %stderr.trim_end(),
            "consumer command succeeded"
        );

        if self.delete_after {
            self.safe_delete(&file);
        }

        Ok(Outcome::Processed)
    }

    /// Remove the file, re-checking that it still exists first.
    fn safe_delete(&self, file: &SettledFile) {
        if !self.fs.exists(&file.path) {
            warn!(path = ?file.path, "file already gone; skipping delete");
            return;
        }
        match self.fs.remove_file(&file.path) {
            Ok(()) => info!(path = ?file.path, "file deleted"),
            Err(err) => error!(path = ?file.path, error = %err, "failed to delete file"),
        }
    }
}

impl ConsumerBackend for CommandConsumer {
    fn consume(
        &mut self,
        file: SettledFile,
    ) -> Pin<Box<dyn Future<Output = Result<Outcome>> + Send + '_>> {
        Box::pin(self.process(file))
    }
}

/// Substitute the `{path}`, `{root}`, `{rel}` and `{name}` placeholders.
pub fn expand_template(argv: &[String], file: &SettledFile) -> Vec<String> {
    let path = file.path.to_string_lossy();
    let root = file.root.to_string_lossy();
    let rel = relative_str(&file.root, &file.path).unwrap_or_else(|| path.to_string());
    let name = file
        .path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let expanded: Vec<String> = argv
        .iter()
        .map(|arg| {
            arg.replace("{path}", &path)
                .replace("{root}", &root)
                .replace("{rel}", &rel)
                .replace("{name}", &name)
        })
        .collect();
    debug!(?expanded, "expanded consumer command");
    expanded
}
