pub mod bates;
pub mod config;
pub mod consts;
pub mod error;
pub mod frame;
pub mod index;
pub mod intake;
pub mod overlay;
pub mod preview;
pub mod progress;
pub mod raster;
pub mod session;
