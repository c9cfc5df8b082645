//! Core traits defined in `foldermagic-core` and implemented by other crates.

pub mod remote;

pub use remote::{
    BatchRequest, BatchResponse, RemoteEntryKind, RemoteError, RemoteErrorKind, RemoteMetadata,
    RemoteRequest, RemoteResponse, RemoteStore, UpdatePatch,
};
