// ABOUTME: Library root for lxd-image - exposes the acquisition pipeline and its collaborators.
// ABOUTME: The command-line binary is in main.rs.

pub mod config;
pub mod daemon;
pub mod error;
pub mod fetch;
pub mod image_service;
pub mod output;
pub mod paths;
pub mod types;
