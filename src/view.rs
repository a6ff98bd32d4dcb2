use crate::error::Result;
use std::path::Path;
use std::process::{Command, Stdio};

/// Launch an external image viewer on the written chart. The child's output
/// is silenced and not waited on; the caller treats failure as a warning.
pub fn launch(viewer: &str, file: &Path) -> Result<()> {
    Command::new(viewer)
        .arg(file)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;
    Ok(())
}
