//! OS-facing side effects: browser, program launch, power control
//!
//! The [`Launcher`] trait is the seam between the dispatcher and the host so
//! the dispatcher can be exercised without opening windows or powering off.

use async_trait::async_trait;
use regex::Regex;
use reqwest::Url;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;

use super::ActionError;

/// Power sub-commands understood by the `sistema` action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerAction {
    Shutdown,
    Restart,
    Cancel,
}

impl PowerAction {
    /// Parse a free-form sub-command such as "desligar o computador" or "shut down"
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim().to_lowercase();
        if input.is_empty() {
            return None;
        }

        // Cancel first: "cancelar desligamento" mentions both
        const CANCEL: [&str; 3] = ["cancelar", "cancel", "abortar"];
        const RESTART: [&str; 4] = ["reiniciar", "restart", "reboot", "reinicia"];
        const SHUTDOWN: [&str; 5] = ["desligar", "desliga", "shutdown", "shut down", "power off"];

        if CANCEL.iter().any(|k| input.contains(k)) {
            Some(PowerAction::Cancel)
        } else if RESTART.iter().any(|k| input.contains(k)) {
            Some(PowerAction::Restart)
        } else if SHUTDOWN.iter().any(|k| input.contains(k)) {
            Some(PowerAction::Shutdown)
        } else {
            None
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PowerAction::Shutdown => "desligamento",
            PowerAction::Restart => "reinicialização",
            PowerAction::Cancel => "cancelamento",
        }
    }
}

/// Host operations used by the dispatcher
#[async_trait]
pub trait Launcher: Send + Sync {
    /// Open `url` in the default browser
    async fn open_url(&self, url: &Url) -> Result<(), ActionError>;

    /// Find an installed program by approximate name and start it.
    /// Returns the name of the program that was started.
    async fn launch_program(&self, name: &str) -> Result<String, ActionError>;

    /// Schedule (or cancel) a power action after `delay_minutes`
    async fn power(&self, action: PowerAction, delay_minutes: u32) -> Result<(), ActionError>;
}

/// Launcher backed by the real operating system
#[derive(Debug, Default, Clone)]
pub struct SystemLauncher;

impl SystemLauncher {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Launcher for SystemLauncher {
    async fn open_url(&self, url: &Url) -> Result<(), ActionError> {
        let mut cmd = browser_command(url.as_str());
        cmd.stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;
        tracing::info!(url = %url, "Opened browser");
        Ok(())
    }

    async fn launch_program(&self, name: &str) -> Result<String, ActionError> {
        let path =
            resolve_program(name).ok_or_else(|| ActionError::ProgramNotFound(name.to_string()))?;

        Command::new(&path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;

        let launched = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| name.to_string());
        tracing::info!(query = name, path = %path.display(), "Launched program");
        Ok(launched)
    }

    async fn power(&self, action: PowerAction, delay_minutes: u32) -> Result<(), ActionError> {
        let status = power_command(action, delay_minutes).status().await?;
        if !status.success() {
            return Err(ActionError::LaunchFailed(std::io::Error::other(format!(
                "shutdown exited with {}",
                status
            ))));
        }
        tracing::warn!(?action, delay_minutes, "Power action issued");
        Ok(())
    }
}

#[cfg(target_os = "windows")]
fn browser_command(url: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.args(["/C", "start", "", url]);
    cmd
}

#[cfg(target_os = "macos")]
fn browser_command(url: &str) -> Command {
    let mut cmd = Command::new("open");
    cmd.arg(url);
    cmd
}

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
fn browser_command(url: &str) -> Command {
    let mut cmd = Command::new("xdg-open");
    cmd.arg(url);
    cmd
}

#[cfg(target_os = "windows")]
fn power_command(action: PowerAction, delay_minutes: u32) -> Command {
    let mut cmd = Command::new("shutdown");
    let secs = (delay_minutes * 60).to_string();
    match action {
        PowerAction::Shutdown => cmd.args(["/s", "/t", secs.as_str()]),
        PowerAction::Restart => cmd.args(["/r", "/t", secs.as_str()]),
        PowerAction::Cancel => cmd.arg("/a"),
    };
    cmd
}

#[cfg(not(target_os = "windows"))]
fn power_command(action: PowerAction, delay_minutes: u32) -> Command {
    let mut cmd = Command::new("shutdown");
    let when = format!("+{}", delay_minutes);
    match action {
        PowerAction::Shutdown => cmd.args(["-h", when.as_str()]),
        PowerAction::Restart => cmd.args(["-r", when.as_str()]),
        PowerAction::Cancel => cmd.arg("-c"),
    };
    cmd
}

/// Resolve an approximate program name ("Visual Studio Code", "spotify") to
/// an executable on `PATH`.
///
/// Tries the exact name and its space-joined variants first, then any
/// executable whose file name starts with the query, then any that contains it.
/// Among fuzzy matches the shortest file name wins.
pub fn resolve_program(name: &str) -> Option<PathBuf> {
    let words: Vec<String> = name
        .split_whitespace()
        .map(|w| w.to_lowercase())
        .collect();
    if words.is_empty() {
        return None;
    }

    for candidate in [
        words.join(" "),
        words.concat(),
        words.join("-"),
        words.join("_"),
    ] {
        if let Ok(path) = which::which(&candidate) {
            return Some(path);
        }
    }

    let body = words
        .iter()
        .map(|w| regex::escape(w))
        .collect::<Vec<_>>()
        .join("[-_ .]?");

    [format!("(?i)^{}", body), format!("(?i){}", body)]
        .iter()
        .filter_map(|pattern| Regex::new(pattern).ok())
        .find_map(|re| shortest_match(&re))
}

fn shortest_match(re: &Regex) -> Option<PathBuf> {
    which::which_re(re).ok()?.min_by_key(|path| {
        path.file_name()
            .map(|n| n.len())
            .unwrap_or(usize::MAX)
    })
}
