use anyhow::Result;
use std::process::{Command, Stdio};

pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

impl CommandOutput {
    pub fn showed_menu(&self) -> bool {
        self.stdout.contains("Main Menu")
    }
}

/// Run the compiled binary with no terminal attached
pub fn run_fireadmin(args: &[&str]) -> Result<CommandOutput> {
    let output = Command::new(env!("CARGO_BIN_EXE_fireadmin"))
        .args(args)
        .env_remove("FIREBASE_API_KEY")
        .env_remove("FIREBASE_AUTH_EMULATOR_HOST")
        .env("NO_COLOR", "1")
        .stdin(Stdio::null())
        .output()?;

    Ok(CommandOutput {
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        exit_code: output.status.code().unwrap_or(-1),
    })
}
