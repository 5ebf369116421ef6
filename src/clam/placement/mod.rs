// src/clam/placement/mod.rs
//! Where clams may go: rules for one column and the multi-slot search.

pub mod rules;
mod search;

pub use rules::{evaluate_column, is_enclosure_clear, is_valid_base, surface_height, Rejection, BASE_BLOCKS};
pub use search::{find_locations, PlacementContext, PlacementReport};
