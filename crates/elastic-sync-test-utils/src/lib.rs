//! In-memory collaborators shared across elastic-sync tests.

pub mod exports;
pub mod loader;
pub mod repository;
pub mod transport;

pub use exports::StaticExports;
pub use loader::StaticBodies;
pub use repository::{RecordedRepositoryCall, RecordingRepositories};
pub use transport::{RecordedPut, RecordingTransport};
