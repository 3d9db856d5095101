//! Classification output types

use std::fmt::Display;

/// Legal-status verdict for one patent
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Verdict {
    /// Protection is currently active
    InForce,
    /// Protection has lapsed or was denied
    NotInForce,
}

impl Verdict {
    /// Portuguese label persisted in the STATUS column
    pub fn label(self) -> &'static str {
        match self {
            Verdict::InForce => "VIGENTE",
            Verdict::NotInForce => "NÃO VIGENTE",
        }
    }
}

impl Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Classification of one patent, derived from its extracted status codes
///
/// Never mutated after computation; re-running classification on the same
/// codes yields an identical value.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ClassificationResult {
    pub verdict: Verdict,
    /// Matched not-in-force labels followed by matched in-force labels,
    /// each group in extraction order
    pub despacho: Vec<String>,
    /// Substantive-analysis labels plus synthesized warnings
    pub analise: Vec<String>,
}

impl ClassificationResult {
    /// DESPACHO column value
    pub fn despacho_text(&self) -> String {
        self.despacho.join("; ")
    }

    /// ANÁLISE SUBSTANTIVA column value
    pub fn analise_text(&self) -> String {
        self.analise.join("; ")
    }
}
