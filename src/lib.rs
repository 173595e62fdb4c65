pub mod config;
pub mod models;
pub mod scanner;
pub mod utils;

// 重新导出常用模块
pub use config::Config;
pub use models::{ProjectMetadata, ScanEvent, ScanOutcome, ScanSummary};
pub use scanner::{ProjectScanner, ScanEventSink, ScanHandle};
