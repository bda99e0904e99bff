// ─── Process Supervision ───

use std::path::Path;
use std::process::ExitStatus;

use tokio::process::{Child, Command};
use tracing::info;

use crate::core::error::{LauncherError, LauncherResult};

use super::arguments::LaunchSpec;

#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

/// A running game process.
#[derive(Debug)]
pub struct GameProcessHandle {
    child: Child,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessState {
    Running,
    Exited(Option<i32>),
}

impl GameProcessHandle {
    pub fn pid(&self) -> Option<u32> {
        self.child.id()
    }

    /// Block until the game exits.
    pub async fn wait(&mut self) -> LauncherResult<ExitStatus> {
        Ok(self.child.wait().await?)
    }

    /// Non-blocking liveness probe.
    pub fn state(&mut self) -> ProcessState {
        match self.child.try_wait() {
            Ok(Some(status)) => ProcessState::Exited(status.code()),
            Ok(None) => ProcessState::Running,
            Err(_) => ProcessState::Exited(None),
        }
    }
}

/// Full command line: `java <jvm args> <main class> <game args>`, with
/// empty tokens filtered out.
pub fn build_command_line(spec: &LaunchSpec, java: &Path) -> Vec<String> {
    let mut argv = Vec::with_capacity(2 + spec.jvm_args.len() + spec.game_args.len());
    argv.push(java.to_string_lossy().into_owned());
    argv.extend(spec.jvm_args.iter().cloned());
    argv.push(spec.main_class.clone());
    argv.extend(spec.game_args.iter().cloned());
    argv.retain(|token| !token.is_empty());
    argv
}

/// Spawn the game with the managed directory as its working directory.
/// On Windows a hidden launch suppresses the console window.
pub fn spawn_game(
    spec: &LaunchSpec,
    java: &Path,
    game_dir: &Path,
    show_terminal: bool,
) -> LauncherResult<GameProcessHandle> {
    let argv = build_command_line(spec, java);

    let mut command = Command::new(&argv[0]);
    command.args(&argv[1..]).current_dir(game_dir);

    #[cfg(windows)]
    if !show_terminal {
        command.creation_flags(CREATE_NO_WINDOW);
    }
    #[cfg(not(windows))]
    let _ = show_terminal;

    let child = command.spawn().map_err(LauncherError::Spawn)?;
    info!(
        "Spawned game process (pid {:?}) with main class {}",
        child.id(),
        spec.main_class
    );

    Ok(GameProcessHandle { child })
}
