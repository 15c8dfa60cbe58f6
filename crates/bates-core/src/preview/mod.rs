pub mod cache;
pub mod controller;
pub mod messages;
pub mod state;
pub mod worker;

pub use controller::PreviewController;
pub use messages::{WorkerCommand, WorkerResult};
pub use state::{Phase, PreviewState};
