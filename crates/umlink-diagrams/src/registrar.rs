//! Registration of diagram processors.

use std::sync::Arc;

use umlink_renderer::{BlockContext, ExtensionRegistry};

use crate::language::DiagramLanguage;
use crate::processor::{DiagramProcessor, DiagramSettings};

/// Register diagram processors with default settings.
///
/// Without a configured server, documents must set `plantuml-server-url`.
pub fn register(registry: &mut ExtensionRegistry) -> &mut ExtensionRegistry {
    register_with(registry, DiagramSettings::default())
}

/// Register a processor for every diagram language in both the listing and
/// literal contexts.
///
/// Registering again replaces the diagram processors and leaves other
/// registrations untouched.
pub fn register_with(
    registry: &mut ExtensionRegistry,
    settings: DiagramSettings,
) -> &mut ExtensionRegistry {
    let settings = Arc::new(settings);
    for language in DiagramLanguage::ALL {
        tracing::debug!(diagram = %language, "Registering diagram processor");
        registry.register_block(
            language.name(),
            &BlockContext::ALL,
            Arc::new(DiagramProcessor::new(language, Arc::clone(&settings))),
        );
    }
    registry
}
