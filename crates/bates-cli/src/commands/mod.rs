pub mod config;
pub mod index;
pub mod info;
pub mod preview;
pub mod ranges;
