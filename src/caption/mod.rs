//! Caption building blocks.
//!
//! Pure, provider-independent pieces of the pipeline:
//!
//! - [`validate`]: raw tone/platform/flag checking
//! - [`prompt`]: single-turn system + user prompts
//! - [`parse`]: extraction of `caption`/`hashtags` from model output
//! - [`optimizer`]: greedy fit into a platform's length budget
//! - [`template`]: deterministic fallback captions

pub mod locale;
pub mod optimizer;
pub mod parse;
pub mod prompt;
pub mod template;
pub mod validate;

pub use optimizer::{Optimized, optimize};
pub use parse::{ParsedCaption, parse_caption};
pub use prompt::build_messages;
pub use template::{TEMPLATE_MODEL, generate_template_caption};
pub use validate::{ValidatedParams, validate_params};
