pub mod path;
pub mod size_format;
