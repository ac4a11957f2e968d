//! Library application
//!
//! Authors and books REST modules, their validation rules and the glue that
//! puts them on top of the workspace crates.

use std::sync::Arc;

use axum::Router;
use library_db::DocumentStore;
use library_kernel::{settings::Settings, ModuleRegistry};

pub mod error;
pub mod modules;
pub mod utils;
pub mod validation;

pub use error::{LibraryError, LibraryResult};

/// Registry holding every feature module over `store`
pub fn registry(store: Arc<dyn DocumentStore>) -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, store);
    registry
}

/// Create the indexes the registered modules declare
pub async fn ensure_indexes(
    registry: &ModuleRegistry,
    store: &dyn DocumentStore,
) -> anyhow::Result<()> {
    use anyhow::Context;

    for index in registry.collect_indexes() {
        store
            .ensure_index(index.collection, index.field)
            .await
            .with_context(|| {
                format!("failed to create index {}.{}", index.collection, index.field)
            })?;
        tracing::info!(
            collection = index.collection,
            field = index.field,
            "index ensured"
        );
    }

    Ok(())
}

/// The full HTTP application over `store`, without binding a listener
pub fn app(store: Arc<dyn DocumentStore>, settings: &Settings) -> Router {
    library_http::build_router(&registry(store), settings)
}
