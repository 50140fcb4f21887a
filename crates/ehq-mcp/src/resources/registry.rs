//! Built-in resource registration.

use std::sync::Arc;

use crate::catalog::{Catalog, ResourceReader};
use crate::types::ResourceDefinition;

use super::{hello, server_info};

pub struct ResourceRegistry;

impl ResourceRegistry {
    /// Every built-in resource with the reader that produces its content.
    pub fn builtin() -> Vec<(ResourceDefinition, Arc<dyn ResourceReader>)> {
        let hello_reader: Arc<dyn ResourceReader> = Arc::new(hello::reader());
        let info_reader: Arc<dyn ResourceReader> = Arc::new(server_info::ServerInfo);
        vec![
            (hello::definition(), hello_reader),
            (server_info::definition(), info_reader),
        ]
    }

    pub fn install(catalog: &Catalog) {
        for (definition, reader) in Self::builtin() {
            catalog.register_resource(definition, reader);
        }
    }
}
