// ─── Launch Pipeline ───
// resolve → plan → download → stage → synthesize → spawn

pub mod assets;
pub mod auth;
pub mod downloader;
pub mod error;
pub mod http;
pub mod launch;
pub mod maven;
pub mod paths;
pub mod planner;
pub mod rules;
pub mod session;
pub mod version;
