use anyhow::{anyhow, Context as _, Result};
use std::process::{Command, Stdio};
use tracing::debug;

/// Hands the link to a browser or the configured opener. The child is not
/// waited on.
pub fn open_link(url: &str, custom: Option<&str>) -> Result<()> {
    let mut command = match custom {
        Some(raw) => custom_command(raw)?,
        None => platform_command(),
    };
    command
        .arg(url)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());
    debug!(command = ?command, "opening link");
    command
        .spawn()
        .with_context(|| format!("launch opener for {}", url))?;
    Ok(())
}

fn custom_command(raw: &str) -> Result<Command> {
    let mut parts = raw.split_whitespace();
    let program = parts
        .next()
        .ok_or_else(|| anyhow!("open command cannot be empty"))?;
    let mut command = Command::new(program);
    command.args(parts);
    Ok(command)
}

#[cfg(target_os = "windows")]
fn platform_command() -> Command {
    let mut command = Command::new("cmd");
    // `start` treats the first quoted argument as a window title.
    command.args(["/C", "start", ""]);
    command
}

#[cfg(target_os = "macos")]
fn platform_command() -> Command {
    Command::new("open")
}

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
fn platform_command() -> Command {
    Command::new("xdg-open")
}

#[cfg(test)]
mod tests {
    use super::custom_command;

    #[test]
    fn custom_command_splits_arguments() {
        let command = custom_command("firefox --new-tab").expect("command");
        assert_eq!(command.get_program(), "firefox");
        let args: Vec<_> = command.get_args().collect();
        assert_eq!(args, vec!["--new-tab"]);
    }

    #[test]
    fn custom_command_rejects_blank() {
        assert!(custom_command("   ").is_err());
    }
}
