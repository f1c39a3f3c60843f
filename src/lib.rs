//! Warta - caption generation for road-damage report sharing
//!
//! Turns a report's structured data, a tone and a target platform into a
//! social-media-ready caption with hashtags. Generation goes through a
//! premium and a low-cost model tier with per-call timeouts and retries,
//! successful generations are cached, and every caption is fitted to the
//! platform's length budget. When no model produces a usable caption, a
//! deterministic template is used instead, so a caption is always returned.
//!
//! # Example
//!
//! ```rust,no_run
//! use warta::{CaptionEngine, CaptionRequest, Config, Platform, ReportSharingData, Tone};
//!
//! #[tokio::main]
//! async fn main() -> warta::Result<()> {
//!     let engine = CaptionEngine::builder()
//!         .config(Config::load(None)?)
//!         .build()?;
//!
//!     let report = ReportSharingData {
//!         id: "rpt-42".into(),
//!         category: "berlubang".into(),
//!         street: "Jl. Sudirman".into(),
//!         district: "Menteng".into(),
//!         city: "Jakarta Pusat".into(),
//!         province: "DKI Jakarta".into(),
//!         created_at: chrono::Utc::now(),
//!         share_count: 0,
//!     };
//!
//!     let result = engine
//!         .generate_caption(&CaptionRequest::new(report, Tone::Urgent, Platform::Twitter))
//!         .await?;
//!
//!     println!("{}", result.rendered());
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod caption;
pub mod config;
pub mod engine;
pub mod error;
pub mod providers;
pub mod telemetry;
pub mod types;

// Re-export main types at crate root
pub use cache::{CacheConfig, CacheKey, CaptionCache, ModelTier};
pub use config::{Config, ProviderConfig};
pub use engine::{CaptionEngine, CaptionEngineBuilder, CaptionParams, CaptionService, ReportSource};
pub use error::{Result, WartaError, is_retryable_message};
pub use providers::{ChatProvider, OpenRouterClient, RetryConfig};

// Re-export all types
pub use types::{
    CaptionRequest, CaptionResult, ChatOptions, ChatResponse, Message, Platform, PlatformConfig,
    ReportSharingData, ResponseFormat, Role, TokenUsage, Tone, UrlHandling, Usage, rendered_len,
};
