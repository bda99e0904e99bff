pub mod arguments;
pub mod classpath;
pub mod natives;
pub mod process;

pub use arguments::{synthesize, ArgumentContext, LaunchSpec, LAUNCHER_NAME};
pub use classpath::{build_classpath, classpath_separator};
pub use natives::extract_natives;
pub use process::{build_command_line, spawn_game, GameProcessHandle, ProcessState};
