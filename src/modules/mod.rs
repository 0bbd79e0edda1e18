pub mod books;
pub mod reviews;
pub mod search;

use std::sync::Arc;

use libris_kernel::ModuleRegistry;

use crate::core::CoreService;

/// Register all feature modules with the registry, wiring each to the
/// shared core service.
pub fn register_all(registry: &mut ModuleRegistry, core: Arc<CoreService>) {
    registry.register(books::create_module(core.clone()));
    registry.register(reviews::create_module(core.clone()));
    registry.register(search::create_module(core));
}
