//! Public types for the Warta API.

mod caption;
mod message;
mod options;
mod platform;
mod report;
mod response;

pub use caption::{CaptionRequest, CaptionResult, TokenUsage, render, rendered_len};
pub use message::{Message, Role};
pub use options::{ChatOptions, ResponseFormat};
pub use platform::{Platform, PlatformConfig, Tone, UrlHandling};
pub use report::ReportSharingData;
pub use response::{ChatResponse, Usage};
