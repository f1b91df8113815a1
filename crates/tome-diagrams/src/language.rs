//! Diagram language detection for fenced code blocks.

/// Supported diagram languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagramLanguage {
    Mermaid,
    PlantUml,
    GraphViz,
    Ditaa,
    Erd,
    Nomnoml,
    Svgbob,
    WaveDrom,
}

impl DiagramLanguage {
    /// Parse a language from a code fence info string.
    ///
    /// Returns `None` when the language is not a diagram type; such
    /// fences stay ordinary code blocks and go to the highlighter.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "mermaid" => Some(Self::Mermaid),
            "plantuml" => Some(Self::PlantUml),
            "graphviz" | "dot" => Some(Self::GraphViz),
            "ditaa" => Some(Self::Ditaa),
            "erd" => Some(Self::Erd),
            "nomnoml" => Some(Self::Nomnoml),
            "svgbob" => Some(Self::Svgbob),
            "wavedrom" => Some(Self::WaveDrom),
            _ => None,
        }
    }

    /// Canonical tag used in `data-diagram-lang` attributes; doubles as
    /// the Kroki endpoint name.
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Self::Mermaid => "mermaid",
            Self::PlantUml => "plantuml",
            Self::GraphViz => "graphviz",
            Self::Ditaa => "ditaa",
            Self::Erd => "erd",
            Self::Nomnoml => "nomnoml",
            Self::Svgbob => "svgbob",
            Self::WaveDrom => "wavedrom",
        }
    }
}
