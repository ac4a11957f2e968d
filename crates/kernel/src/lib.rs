pub mod module;
pub mod registry;
pub mod settings;

pub use module::{IndexSpec, InitCtx, Module};
pub use registry::ModuleRegistry;
