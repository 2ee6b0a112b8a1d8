//! Anagram index, word store, and request timing for the anagram lookup
//! service.
//!
//! Given a word, the service returns every other known word made of the
//! same letters. This crate holds all of the state behind that: the
//! in-memory index, the file it is loaded from and appended to, and the
//! request timings that feed the stats endpoint.
//!
//! # Modules
//!
//! - [`word`] -- [`Word`] validation and [`Signature`] computation.
//! - [`index`] -- [`AnagramIndex`], signature-keyed word groups.
//! - [`store`] -- [`WordStore`], the append-only word file with atomic
//!   compaction.
//! - [`timing`] -- [`TimingCollector`], per-request latency log with
//!   filtered averages.
//! - [`service`] -- [`WordService`], validation and composition of the
//!   above for the HTTP layer.
//! - [`config`] -- Configuration loading from `anagram-config.yaml`.
//! - [`error`] -- [`LookupError`] and [`StoreError`].
//!
//! # Concurrency
//!
//! Each shared structure carries its own lock, so a stats read never
//! waits behind a word insertion or a file write. Components are built
//! once at startup and shared through [`Arc`](std::sync::Arc); there is
//! no global state.

pub mod config;
pub mod error;
pub mod index;
pub mod service;
pub mod store;
pub mod timing;
pub mod word;

// Re-export primary types at crate root.
pub use config::ServiceConfig;
pub use error::{LookupError, StoreError};
pub use index::AnagramIndex;
pub use service::{Stats, WordService};
pub use store::{StagedCompaction, WordStore};
pub use timing::{TimingCollector, TimingFilter, TimingRecord};
pub use word::{Signature, Word};
