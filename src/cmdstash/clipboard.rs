use crate::error::{Result, StashError};
use std::io::Write;
use std::process::{Command, Stdio};

/// Copies text to the system clipboard in an OS-specific way.
/// - macOS: pbcopy
/// - Linux: xclip, falling back to xsel
/// - Windows: clip.exe
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        pipe_to("pbcopy", &[], text)
    }

    #[cfg(target_os = "linux")]
    {
        pipe_to("xclip", &["-selection", "clipboard"], text)
            .or_else(|_| pipe_to("xsel", &["--clipboard", "--input"], text))
    }

    #[cfg(target_os = "windows")]
    {
        pipe_to("clip", &[], text)
    }

    #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
    {
        let _ = text;
        Err(StashError::Api(
            "Clipboard not supported on this platform".to_string(),
        ))
    }
}

#[allow(dead_code)]
fn pipe_to(program: &str, args: &[&str], text: &str) -> Result<()> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .spawn()
        .map_err(|e| StashError::Api(format!("Failed to spawn {}: {}", program, e)))?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(text.as_bytes())
            .map_err(|e| StashError::Api(format!("Failed to write to {}: {}", program, e)))?;
    }

    let status = child
        .wait()
        .map_err(|e| StashError::Api(format!("Failed to wait for {}: {}", program, e)))?;

    if status.success() {
        Ok(())
    } else {
        Err(StashError::Api(format!(
            "{} exited with error",
            program
        )))
    }
}
