pub mod registry;

pub use registry::{ModelDescriptor, ModelRegistry};

use std::sync::LazyLock;

/// Models offered by the console, in display order. The first entry is the default selection.
pub const BUILTIN_MODELS: &[ModelDescriptor] = &[
    ModelDescriptor {
        key: "orchestration",
        id: "google/gemini-3-pro-preview",
        name: "Gemini 3.0 Pro",
        description: "Orchestration & Planning",
    },
    ModelDescriptor {
        key: "architecture",
        id: "openai/chatgpt-4o-latest",
        name: "ChatGPT 5.2",
        description: "Architecture & Design",
    },
    ModelDescriptor {
        key: "coding",
        id: "anthropic/claude-sonnet-4.5",
        name: "Claude Sonnet 4.5",
        description: "Code Generation",
    },
    ModelDescriptor {
        key: "multi_agent",
        id: "anthropic/claude-opus-4.5",
        name: "Claude Opus 4.5",
        description: "Multi-Agent Coordination",
    },
    ModelDescriptor {
        key: "web_scraping",
        id: "openai/chatgpt-4o-latest",
        name: "ChatGPT 5.2",
        description: "Web Scraping & Data",
    },
];

pub static MODEL_REGISTRY: LazyLock<ModelRegistry> =
    LazyLock::new(|| ModelRegistry::new(BUILTIN_MODELS));

pub fn lookup(key: &str) -> Option<&'static ModelDescriptor> {
    MODEL_REGISTRY.get(key)
}

pub fn default_model() -> &'static ModelDescriptor {
    MODEL_REGISTRY.default_model()
}
