//! Runs `java -jar pdftk-all.jar` as a child process.
//!
//! The invocation fills the store's base layout with an XFDF document from
//! the forms directory and writes the PDF next to it:
//!
//! ```text
//! java -jar pdftk-all.jar <layouts>/service<store>.pdf \
//!     fill_form <forms>/<filled> output <forms>/<output> need_appearances
//! ```
//!
//! The child is killed when its time budget runs out.

use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::domain::ports::{FormRenderer, FormRendererError, RenderJob};

/// Locations and limits for the renderer process.
#[derive(Debug, Clone)]
pub struct PdftkSettings {
    /// Java launcher, usually `java` on the `PATH`.
    pub java: PathBuf,
    /// Path to `pdftk-all.jar`.
    pub jar: PathBuf,
    /// Directory holding the per-store `service{store}.pdf` layouts.
    pub layouts_dir: PathBuf,
    /// Directory backing the forms storage area.
    pub forms_dir: PathBuf,
    pub timeout: Duration,
}

pub struct PdftkRenderer {
    settings: PdftkSettings,
}

impl PdftkRenderer {
    pub fn new(settings: PdftkSettings) -> Self {
        Self { settings }
    }

    fn args(&self, job: &RenderJob) -> Result<Vec<OsString>, FormRendererError> {
        for name in [&job.filled, &job.output] {
            if name.is_empty() || name.contains(['/', '\\']) || name.starts_with('.') {
                return Err(FormRendererError::spawn(format!("unsafe form name {name:?}")));
            }
        }
        let layout = self
            .settings
            .layouts_dir
            .join(format!("service{}.pdf", job.store.0));
        Ok(vec![
            "-jar".into(),
            self.settings.jar.clone().into_os_string(),
            layout.into_os_string(),
            "fill_form".into(),
            self.settings.forms_dir.join(&job.filled).into_os_string(),
            "output".into(),
            self.settings.forms_dir.join(&job.output).into_os_string(),
            "need_appearances".into(),
        ])
    }
}

/// Run `command` to completion within `timeout`.
async fn run_bounded(mut command: Command, timeout: Duration) -> Result<(), FormRendererError> {
    command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let child = command
        .spawn()
        .map_err(|err| FormRendererError::spawn(err.to_string()))?;

    let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
        Ok(result) => result.map_err(|err| FormRendererError::failed(err.to_string()))?,
        Err(_) => {
            return Err(FormRendererError::timeout(timeout.as_secs().max(1)));
        }
    };

    if output.status.success() {
        return Ok(());
    }
    let stderr = String::from_utf8_lossy(&output.stderr);
    Err(FormRendererError::failed(format!(
        "{}: {}",
        output.status,
        stderr.trim()
    )))
}

#[async_trait]
impl FormRenderer for PdftkRenderer {
    async fn render(&self, job: &RenderJob) -> Result<(), FormRendererError> {
        let mut command = Command::new(&self.settings.java);
        command.args(self.args(job)?);
        debug!(store = job.store.0, output = %job.output, "starting form renderer");
        run_bounded(command, self.settings.timeout).await
    }
}
