pub mod books;
pub mod categories;

use bookstore_kernel::ModuleRegistry;
use serde_json::json;

/// Register all catalog modules with the registry
pub fn register_all(registry: &mut ModuleRegistry) {
    registry.register(categories::create_module());
    registry.register(books::create_module());
}

/// Copy of an OpenAPI response object with its `description` set
pub(crate) fn with_description(
    response: &serde_json::Value,
    description: &str,
) -> serde_json::Value {
    let mut response = response.clone();
    response["description"] = json!(description);
    response
}
