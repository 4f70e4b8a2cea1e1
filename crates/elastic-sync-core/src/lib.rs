//! Resolution and synchronization core.
//!
//! Resolves a raw config against stack exports into a concrete endpoint and
//! applies index templates, indices and snapshot repositories to a cluster.
//! Hosts call [`ElasticSync::validate`] before mutating infrastructure and
//! [`ElasticSync::apply`] afterwards.

pub mod endpoint;
pub mod error;
pub mod exports;
pub mod host;
pub mod loader;
pub mod repository;
pub mod resolver;
pub mod signer;
pub mod sync;
pub mod transport;

/// Error types.
pub use error::{ALREADY_EXISTS_ERROR, RemoteFailure, SyncError};
/// Endpoint derivation.
pub use endpoint::{ENDPOINT_NOT_SPECIFIED, EXPORT_NOT_FOUND, Endpoint, normalize_endpoint};
/// Stack export lookup.
pub use exports::{NoStackExports, StackExports, StackOutputsFile, resolve_export};
/// Host entry points.
pub use host::{ElasticSync, HostContext, SyncReport};
/// Resource body loading.
pub use loader::{BodyLoader, FsBodyLoader};
/// Snapshot repository setup.
pub use repository::{RepositorySetup, SnapshotRepositories};
/// Config resolution.
pub use resolver::{ResolvedConfig, resolve_config};
/// Request signing parameters.
pub use signer::{RequestOptions, SignedRequestParams, request_options};
/// Resource application.
pub use sync::{ResourceKind, ResourceSynchronizer, SyncOutcome};
/// HTTP transport.
pub use transport::{
    PutRequest, ReqwestTransport, RequestSigning, SEARCH_SERVICE, SigV4Signer, Transport,
};
