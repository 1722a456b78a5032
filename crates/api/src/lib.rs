//! HTTP API layer for the interaction ledger.

pub mod catalog;
pub mod extractors;
pub mod response;
pub mod routes;
pub mod state;

pub use catalog::CatalogClient;
pub use routes::router;
pub use state::AppState;
