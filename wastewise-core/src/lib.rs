//! Core types, statistics, and suggestion ranking for the wastewise tracker.

/// Monthly, weekly, and regional aggregation over the log store.
pub mod aggregate;
/// Domain models shared by the store, the providers, and clients.
pub mod model;
/// Traits describing the log store and suggestion provider interfaces.
pub mod ports;
/// Static comparison regions and their demo data.
pub mod regions;
/// High-level service facade used by clients.
pub mod service;
/// In-memory log store implementation.
pub mod store;
/// Rule-based suggestions and the provider fallback engine.
pub mod suggest;

pub use aggregate::*;
pub use model::*;
pub use ports::*;
pub use regions::*;
pub use service::*;
pub use store::*;
pub use suggest::*;
