pub mod authors;
pub mod books;

use std::sync::Arc;

use library_db::DocumentStore;
use library_kernel::ModuleRegistry;

/// Register the feature modules, all sharing one store
pub fn register_all(registry: &mut ModuleRegistry, store: Arc<dyn DocumentStore>) {
    registry.register(authors::create_module(store.clone()));
    registry.register(books::create_module(store));
}
