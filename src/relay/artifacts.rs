use serde::Serialize;

/// Derived output reference shown under an assistant reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Artifact {
    pub name: String,
    pub kind: &'static str,
    pub size: &'static str,
}

impl Artifact {
    fn new(kind: &'static str, name: &str, size: &'static str) -> Self {
        Self {
            name: name.to_string(),
            kind,
            size,
        }
    }
}

/// Keyword heuristics over the user's input and the generated reply.
pub fn detect_artifacts(input: &str, reply: &str) -> Vec<Artifact> {
    let lowered = input.to_lowercase();
    let mut artifacts = Vec::new();

    if lowered.contains("component") || lowered.contains("dashboard") {
        artifacts.push(Artifact::new("component", "GeneratedComponent.jsx", "3.2 KB"));
    }
    if lowered.contains("document") || lowered.contains("spec") {
        artifacts.push(Artifact::new("document", "Specification.md", "1.8 KB"));
    }
    if reply.contains("```") {
        artifacts.push(Artifact::new("component", "CodeOutput.jsx", "2.1 KB"));
    }

    artifacts
}
