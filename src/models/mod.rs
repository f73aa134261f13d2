// src/models/mod.rs
// DOCUMENTATION: Models module organization
// PURPOSE: Re-export model components

pub mod geo;
pub mod place;
pub mod session;

pub use geo::*;
pub use place::*;
pub use session::*;
