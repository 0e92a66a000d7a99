//! fragvault-engine: upload and download orchestration
//!
//! Drives the end-to-end flows over the `FragmentStore` and `Catalog`
//! collaborators:
//!
//! - upload: validate → fragment → derive keys → encrypt + store
//!   (bounded-concurrency, fail-fast) → commit catalog record
//! - download: catalog lookup → secret gate → fetch + decrypt
//!   (bounded-concurrency, fail-fast) → reassemble
//!
//! The catalog record is written only after every fragment put has
//! acknowledged success, so a record existing implies the file is whole.
//! On any fragment failure the operation aborts: no catalog write, no
//! retry, already-stored fragments stay orphaned.

mod gather;

pub mod download;
pub mod upload;

pub use download::{download, DownloadRequest};
pub use upload::{upload, UploadReceipt, UploadRequest};
