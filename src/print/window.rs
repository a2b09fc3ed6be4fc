//! Showing rendered images in a viewer.

use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};

use log::{debug, info};

use crate::error::{Error, Result};

/// Fails with [`Error::NoDisplay`] when no graphical session is reachable.
pub fn check_display() -> Result<()> {
    check_display_with(|key| std::env::var_os(key).map(|v| v.to_string_lossy().into_owned()))
}

/// Same as [`check_display`], reading environment variables through `env`.
pub fn check_display_with(env: impl Fn(&str) -> Option<String>) -> Result<()> {
    if cfg!(any(windows, target_os = "macos")) {
        return Ok(());
    }
    let set = |key: &str| env(key).is_some_and(|v| !v.is_empty());
    if set("DISPLAY") || set("WAYLAND_DISPLAY") {
        Ok(())
    } else {
        Err(Error::NoDisplay {
            reason: "neither DISPLAY nor WAYLAND_DISPLAY is set".to_string(),
        })
    }
}

/// Writes `bytes` to a fresh file in the temporary directory and keeps it.
///
/// The file outlives this process, since the viewer may read it later.
pub fn temp_image(bytes: &[u8], extension: &str) -> Result<PathBuf> {
    use std::io::Write as _;

    let mut file = tempfile::Builder::new()
        .prefix("ftbdd-")
        .suffix(&format!(".{}", extension))
        .tempfile()?;
    file.write_all(bytes)?;
    let (_, path) = file.keep().map_err(|e| Error::Io(e.error))?;
    debug!("Rendered image to {}", path.display());
    Ok(path)
}

fn viewer_command(viewer: Option<&str>) -> Command {
    match viewer {
        Some(viewer) => Command::new(viewer),
        None if cfg!(windows) => {
            let mut command = Command::new("cmd");
            command.args(["/C", "start", ""]);
            command
        }
        None if cfg!(target_os = "macos") => Command::new("open"),
        None => Command::new("xdg-open"),
    }
}

/// Launches the viewer on `path` and returns without waiting for it.
///
/// The image is left in place: the viewer may open it after this call returns,
/// and it lives in the system temporary directory, which the OS cleans up.
pub fn open(path: &Path, viewer: Option<&str>) -> Result<()> {
    spawn_viewer(path, viewer)?;
    Ok(())
}

/// Spawns the viewer and reaps it on a detached thread.
fn spawn_viewer(path: &Path, viewer: Option<&str>) -> Result<JoinHandle<Option<ExitStatus>>> {
    let mut command = viewer_command(viewer);
    command.arg(path).stdin(Stdio::null()).stdout(Stdio::null()).stderr(Stdio::null());
    let program = command.get_program().to_string_lossy().into_owned();

    let mut child = command.spawn().map_err(|source| Error::Viewer {
        viewer: program.clone(),
        source,
    })?;
    info!("Opened {} with {}", path.display(), program);

    let reaper = thread::spawn(move || match child.wait() {
        Ok(status) => {
            debug!("{} exited with {}", program, status);
            Some(status)
        }
        Err(e) => {
            debug!("could not wait for {}: {}", program, e);
            None
        }
    });
    Ok(reaper)
}
