//! Running the Graphviz command line tools.

use std::io::{ErrorKind, Write};
use std::path::Path;
use std::process::{Command, Stdio};

use log::debug;

use crate::error::{Error, Result};

/// Lays out `dot` with `engine` and returns the output in `format` (a `-T` name).
pub fn render(dot: &str, engine: &str, format: &str) -> Result<Vec<u8>> {
    debug!("Running {} -T{} on {} bytes of DOT", engine, format, dot.len());

    let mut child = Command::new(engine)
        .arg(format!("-T{}", format))
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| spawn_error(engine, e))?;

    // An engine that fails early closes its input; its exit status says why.
    let mut write_error = None;
    if let Some(mut stdin) = child.stdin.take() {
        match stdin.write_all(dot.as_bytes()) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::BrokenPipe => debug!("{} closed its input early", engine),
            Err(e) => write_error = Some(e),
        }
    }
    let output = child.wait_with_output()?;

    if !output.status.success() {
        return Err(Error::Engine {
            engine: engine.to_string(),
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    if let Some(e) = write_error {
        return Err(Error::Io(e));
    }
    if output.stdout.is_empty() {
        return Err(Error::Engine {
            engine: engine.to_string(),
            status: output.status,
            stderr: "no output produced".to_string(),
        });
    }
    debug!("{} produced {} bytes", engine, output.stdout.len());
    Ok(output.stdout)
}

fn spawn_error(engine: &str, source: std::io::Error) -> Error {
    if source.kind() == ErrorKind::NotFound {
        Error::EngineNotFound {
            engine: engine.to_string(),
            source,
        }
    } else {
        Error::Io(source)
    }
}

/// Whether `engine` can be started.
pub fn is_available(engine: &str) -> bool {
    Command::new(engine)
        .arg("-V")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok()
}

/// Writes `bytes` to `path` through a temporary file in the same directory.
///
/// Either the whole content ends up at `path` or nothing does.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = tempfile::NamedTempFile::new_in(dir)?;
    file.write_all(bytes)?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| Error::Persist {
        path: path.to_path_buf(),
        source: e.error,
    })?;
    Ok(())
}
