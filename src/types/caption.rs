//! Caption request and result types

use serde::{Deserialize, Serialize};

use super::platform::{Platform, Tone};
use super::report::ReportSharingData;
use super::response::Usage;

/// A single caption-generation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptionRequest {
    pub report: ReportSharingData,
    pub tone: Tone,
    pub platform: Platform,
    /// Skip the premium tier and go straight to the low-cost model.
    #[serde(default)]
    pub use_free_model: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_instructions: Option<String>,
}

impl CaptionRequest {
    pub fn new(report: ReportSharingData, tone: Tone, platform: Platform) -> Self {
        Self {
            report,
            tone,
            platform,
            use_free_model: false,
            custom_instructions: None,
        }
    }

    /// Force the low-cost tier.
    pub fn use_free_model(mut self, enabled: bool) -> Self {
        self.use_free_model = enabled;
        self
    }

    /// Extra free-text guidance appended to the prompt.
    pub fn custom_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.custom_instructions = Some(instructions.into());
        self
    }
}

/// Token accounting reported by the provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt: u32,
    pub completion: u32,
    pub total: u32,
}

impl From<&Usage> for TokenUsage {
    fn from(usage: &Usage) -> Self {
        Self {
            prompt: usage.prompt_tokens,
            completion: usage.completion_tokens,
            total: usage.total_tokens,
        }
    }
}

/// A platform-ready caption.
///
/// `character_count` always equals the rendered length of
/// `caption + " " + hashtags.join(" ")`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptionResult {
    pub caption: String,
    pub hashtags: Vec<String>,
    pub character_count: usize,
    /// The optimizer had to shrink the raw generation to fit.
    pub platform_optimized: bool,
    pub ai_generated: bool,
    pub model_used: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_usage: Option<TokenUsage>,
}

impl CaptionResult {
    /// Caption followed by its hashtags, as posted.
    pub fn rendered(&self) -> String {
        render(&self.caption, &self.hashtags)
    }
}

/// `caption + " " + hashtags.join(" ")`.
pub fn render(caption: &str, hashtags: &[String]) -> String {
    format!("{} {}", caption, hashtags.join(" "))
}

/// Rendered length in characters.
pub fn rendered_len(caption: &str, hashtags: &[String]) -> usize {
    let tags: usize = hashtags.iter().map(|h| h.chars().count()).sum();
    let separators = hashtags.len().saturating_sub(1);
    caption.chars().count() + 1 + tags + separators
}
