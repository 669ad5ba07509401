// Shared domain types, used by the facet index, the filter evaluator, the
// board and the engine.

pub mod common;
pub mod pr;

pub use common::*;
pub use pr::*;
