pub mod client;
pub mod progress;

pub use client::{BatchReport, Downloader, DownloadTask};
pub use progress::{NullSink, PercentThrottle, ProgressSink, Stage};
