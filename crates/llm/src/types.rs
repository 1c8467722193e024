//! Variant selection and the unified model result.

use serde::{Deserialize, Serialize};

/// Which remote model behavior to invoke.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelVariant {
    /// Single-shot chat completion returning only an answer
    Standard,

    /// Reasoning model returning a reasoning trace and an answer
    #[default]
    Reasoning,
}

impl ModelVariant {
    /// Parse a variant from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "standard" | "chat" => Some(Self::Standard),
            "reasoning" | "reasoner" => Some(Self::Reasoning),
            _ => None,
        }
    }

    /// Get the canonical variant name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Reasoning => "reasoning",
        }
    }
}

impl std::fmt::Display for ModelVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ModelVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| {
            format!(
                "Unknown model variant: {}. Supported: chat, standard, reasoner, reasoning",
                s
            )
        })
    }
}

/// Model output, one shape per variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ModelResponse {
    /// Answer from the standard variant
    Simple { answer: String },

    /// Answer plus the exposed reasoning trace; the trace may be empty
    Reasoned { reasoning: String, answer: String },
}

impl ModelResponse {
    /// The final answer, whichever variant produced it.
    pub fn answer(&self) -> &str {
        match self {
            Self::Simple { answer } | Self::Reasoned { answer, .. } => answer,
        }
    }

    /// The reasoning trace, if the reasoning variant produced this response.
    pub fn reasoning(&self) -> Option<&str> {
        match self {
            Self::Simple { .. } => None,
            Self::Reasoned { reasoning, .. } => Some(reasoning),
        }
    }

    /// The variant that produced this response.
    pub fn variant(&self) -> ModelVariant {
        match self {
            Self::Simple { .. } => ModelVariant::Standard,
            Self::Reasoned { .. } => ModelVariant::Reasoning,
        }
    }
}
