pub mod clean;
pub mod config;
pub mod info;
pub mod stitch;
