use crate::CgcError;
use async_trait::async_trait;
use cg2glsl_core::{CompilerOutput, ShaderCompiler, TranslateError};
use log::{debug, warn};
use std::io::{self, ErrorKind};
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Upper bound on one compiler run unless configured otherwise.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Runs `cgc -profile <profile> -entry <entry>` with the source on stdin.
#[derive(Debug, Clone)]
pub struct CgcCompiler {
    path: PathBuf,
    timeout: Duration,
}

impl CgcCompiler {
    /// Creates a compiler for the binary at `path` with the default timeout.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Sets the limit on a single run.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Runs the compiler once and collects everything it printed.
    ///
    /// Stdin is closed after the source is written and both output streams are
    /// read to the end. The child is killed if the run exceeds the timeout.
    /// A non-zero exit status is not an error: cgc reports compile errors on
    /// stderr and those are forwarded as diagnostics.
    pub async fn run(
        &self,
        profile: &str,
        entry_point: &str,
        source: &str,
    ) -> Result<CompilerOutput, CgcError> {
        debug!(
            "Running {} -profile {profile} -entry {entry_point}",
            self.path.display()
        );
        let mut child = Command::new(&self.path)
            .args(["-profile", profile, "-entry", entry_point])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| CgcError::Spawn {
                path: self.path.clone(),
                source,
            })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| io::Error::new(ErrorKind::Other, "cgc stdin was not captured"))?;

        let feed = async move {
            let written = stdin.write_all(source.as_bytes()).await;
            drop(stdin);
            match written {
                Err(e) if e.kind() == ErrorKind::BrokenPipe => {
                    warn!("cgc closed its input before reading the whole shader");
                    Ok(())
                }
                other => other,
            }
        };
        let collect = async {
            let (fed, output) = tokio::join!(feed, child.wait_with_output());
            fed?;
            output
        };

        let output = tokio::time::timeout(self.timeout, collect)
            .await
            .map_err(|_| CgcError::Timeout(self.timeout))??;

        if !output.status.success() {
            warn!("cgc exited with {} for profile {profile}", output.status);
        }

        Ok(CompilerOutput {
            translated_code: String::from_utf8_lossy(&output.stdout).into_owned(),
            diagnostics: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

#[async_trait]
impl ShaderCompiler for CgcCompiler {
    async fn compile(
        &self,
        profile: &str,
        entry_point: &str,
        source: &str,
    ) -> Result<CompilerOutput, TranslateError> {
        Ok(self.run(profile, entry_point, source).await?)
    }
}
