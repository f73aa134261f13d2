// src/lib.rs
// DOCUMENTATION: Library root
// PURPOSE: Search nearby places and show them on a map and in a list

pub mod config;
pub mod controller;
pub mod errors;
pub mod models;
pub mod services;
pub mod ui;

#[cfg(test)]
pub(crate) mod testing;
