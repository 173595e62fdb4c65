pub mod manifest;
pub mod project;
pub mod scan_event;
pub mod scan_result;

pub use manifest::{ExpoConfig, PackageManifest};
pub use project::ProjectMetadata;
pub use scan_event::{ScanEvent, SkipReason};
pub use scan_result::{ScanOutcome, ScanSummary};
