// src/ui/mod.rs
// DOCUMENTATION: UI module organization
// PURPOSE: Re-export the map, list, and input surfaces

pub mod input;
pub mod list;
pub mod map;

pub use input::read_queries;
pub use list::*;
pub use map::*;
