//! Routing module: identifier normalization and the immutable
//! identifier -> destination table.
//!
//! ## Flow
//!
//! ```text
//! ROUTE_MAP env JSON → RoutingTable::from_json → lookup(normalize(id))
//! ```

pub mod normalize;
pub mod table;

pub use normalize::normalize;
pub use table::RoutingTable;
