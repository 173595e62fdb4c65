pub mod classifier;
pub mod events;
pub mod metadata;
pub mod project_scanner;
pub mod size_calculator;
pub mod walker;

pub use classifier::{Classifier, DirectoryClassification, DirectoryListing};
pub use events::{EventCounts, ScanEventSink, ScanReporter};
pub use metadata::MetadataExtractor;
pub use project_scanner::{ProjectScanner, ScanHandle};
pub use size_calculator::{FolderSizes, SizeCalculator};
pub use walker::DirectoryWalker;
