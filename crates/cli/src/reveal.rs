//! Opening the finished document in the platform viewer.

use std::path::Path;
use std::process::Command;

use demoslides_core::{Error, Result};

/// Command that opens `path` with the desktop's default application.
pub fn opener_command(path: &Path) -> Command {
    if cfg!(target_os = "macos") {
        let mut command = Command::new("open");
        command.arg(path);
        command
    } else if cfg!(target_os = "windows") {
        let mut command = Command::new("cmd");
        command.args(["/C", "start", ""]).arg(path);
        command
    } else {
        let mut command = Command::new("xdg-open");
        command.arg(path);
        command
    }
}

/// Open `path` in a viewer. The viewer is not waited for beyond its launcher exiting.
pub fn reveal(path: &Path) -> Result<()> {
    log::debug!("Opening {}", path.display());

    let status = opener_command(path)
        .status()
        .map_err(|e| Error::RevealError(format!("{}: {}", path.display(), e)))?;

    if !status.success() {
        return Err(Error::RevealError(format!(
            "{}: viewer exited with {}",
            path.display(),
            status
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opener_command_passes_path_last() {
        let path = Path::new("/tmp/sprint-42.pdf");
        let command = opener_command(path);

        let args: Vec<_> = command.get_args().collect();
        assert_eq!(args.last().copied(), Some(path.as_os_str()));

        let program = command.get_program().to_string_lossy().into_owned();
        assert!(["open", "cmd", "xdg-open"].contains(&program.as_str()));
    }
}
