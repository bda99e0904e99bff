pub mod core;

pub use crate::core::auth::OfflineProfile;
pub use crate::core::error::{LauncherError, LauncherResult};
pub use crate::core::paths::GamePaths;
pub use crate::core::session::{LaunchOptions, LaunchSession, SessionEvent};

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber. `RUST_LOG` overrides the default
/// `info` level. Calling this twice is harmless.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
