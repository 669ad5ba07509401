// Pedantic: suppress noise for internal crate code.
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]

pub mod board;
pub mod config;
pub mod engine;
pub mod facet;
pub mod filter;
pub mod sort;
pub mod types;

pub use facet::{FacetLists, FacetOption, append_label_facet, rebuild_facets};
pub use filter::{
    AlternateStatus, Dimension, FilterState, apply_filters, filter_indices, parse_selection,
};
