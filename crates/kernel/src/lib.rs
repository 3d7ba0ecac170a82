//! Module kernel: settings, the `Module` lifecycle trait and its registry.

pub mod module;
pub mod registry;
pub mod settings;

pub use bookstore_db::Migration;
pub use module::{InitCtx, Module};
pub use registry::ModuleRegistry;
