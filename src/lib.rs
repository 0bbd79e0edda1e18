//! libris application library: the core service and feature modules.

pub mod core;
pub mod modules;

pub use crate::core::CoreService;
