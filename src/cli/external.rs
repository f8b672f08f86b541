//! External editor and viewer processes
//!
//! The core only hands over the file path or rendered text; spawning and
//! waiting on child processes happens here, outside the document model.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

use anyhow::{bail, Context, Result};

/// Opens `path` in the given editor command and waits for it to exit
///
/// The command may carry its own arguments (`"code --wait"`); the file path
/// is appended last. The child inherits the terminal.
pub fn edit(editor: &str, path: &Path) -> Result<()> {
    let mut parts = editor.split_whitespace();
    let program = match parts.next() {
        Some(program) => program,
        None => bail!("Empty editor command"),
    };

    let status = Command::new(program)
        .args(parts)
        .arg(path)
        .status()
        .with_context(|| format!("Failed to launch editor '{}'", editor))?;

    if !status.success() {
        bail!("Editor '{}' exited with {}", editor, status);
    }
    Ok(())
}

/// Pipes `text` to the viewer command's stdin and waits for it to exit
///
/// `bat`/`batcat` get markdown highlighting appended, `less` keeps ANSI
/// escape sequences.
pub fn pipe_to_viewer(viewer: &str, text: &str) -> Result<()> {
    let mut parts: Vec<&str> = viewer.split_whitespace().collect();
    let program = match parts.first() {
        Some(program) => *program,
        None => bail!("Empty viewer command"),
    };
    match program {
        "bat" | "batcat" => parts.push("--language=markdown"),
        "less" => parts.push("-R"),
        _ => {}
    }

    let mut child = Command::new(program)
        .args(&parts[1..])
        .stdin(Stdio::piped())
        .spawn()
        .with_context(|| format!("Failed to launch viewer '{}'", viewer))?;

    if let Some(stdin) = child.stdin.as_mut() {
        stdin
            .write_all(text.as_bytes())
            .with_context(|| format!("Failed to write to viewer '{}'", viewer))?;
    }

    let status = child
        .wait()
        .with_context(|| format!("Failed to wait for viewer '{}'", viewer))?;

    if !status.success() {
        bail!("Viewer '{}' exited with {}", viewer, status);
    }
    Ok(())
}
