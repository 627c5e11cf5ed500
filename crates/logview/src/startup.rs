//! Startup gate in front of the viewer core.
//!
//! The viewer exposes raw application logs, so it stays closed unless the
//! operator has explicitly enabled it, and it refuses to start without a
//! usable log directory.

use anyhow::{bail, Context, Result};
use viewer::LogViewer;

use crate::config::Config;

/// Open the viewer described by `config`, enforcing the enable gate.
pub fn open_viewer(config: &Config) -> Result<LogViewer> {
    if !config.viewer.enabled {
        bail!("access denied: the log viewer is disabled (set viewer.enabled or LOGVIEW_ENABLED)");
    }

    let viewer = LogViewer::new(&config.viewer.log_dir, config.viewer_options()).with_context(|| {
        format!(
            "log directory is not configured: {}",
            config.viewer.log_dir.display()
        )
    })?;

    tracing::debug!("Serving logs from {:?}", viewer.root());
    Ok(viewer)
}
