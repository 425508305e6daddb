//! Listing queries: filter predicate, sort engine and their composition.

mod filter;
mod orchestrator;
mod sort;

pub use filter::{matches, parse_amount, FilterForm, FilterSpec};
pub use orchestrator::{apply_query, QueryOrchestrator, QueryOutcome, QueryResult};
pub use sort::{sort_properties, SortKey};
