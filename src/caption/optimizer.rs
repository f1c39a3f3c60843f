//! Platform length optimizer.
//!
//! Fits a caption and its hashtags into a platform's character budget.
//! Hashtags are the first thing to go: trailing tags are dropped one by one
//! until the text fits or a single tag remains, and only then is the caption
//! body truncated with an ellipsis.
//!
//! Lengths are counted in Unicode scalar values, never bytes, so truncation
//! never splits a character.

use crate::types::{PlatformConfig, rendered_len};

/// Captions shorter than this after truncation are not worth keeping more
/// than one hashtag for.
const MIN_CAPTION_ROOM: usize = 50;

const ELLIPSIS: &str = "...";

/// Output of [`optimize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Optimized {
    pub caption: String,
    pub hashtags: Vec<String>,
    /// Whether anything had to be removed.
    pub optimized: bool,
}

/// Shrink `caption` and `hashtags` until their rendered form fits
/// `config.max_length`.
///
/// The result fits unless the budget cannot hold even a minimal caption plus
/// the first hashtag; in that case the caption collapses to `"..."`.
pub fn optimize(caption: &str, hashtags: &[String], config: &PlatformConfig) -> Optimized {
    let max = config.max_length;

    if rendered_len(caption, hashtags) <= max {
        return Optimized {
            caption: caption.to_string(),
            hashtags: hashtags.to_vec(),
            optimized: false,
        };
    }

    let mut kept = hashtags.to_vec();
    while kept.len() > 1 {
        kept.pop();
        if rendered_len(caption, &kept) <= max {
            return Optimized {
                caption: caption.to_string(),
                hashtags: kept,
                optimized: true,
            };
        }
    }

    let available = max.saturating_sub(joined_len(&kept) + 1);
    if available > MIN_CAPTION_ROOM {
        return Optimized {
            caption: truncate_with_ellipsis(caption, available),
            hashtags: kept,
            optimized: true,
        };
    }

    let first: Vec<String> = hashtags.iter().take(1).cloned().collect();
    let available = max.saturating_sub(joined_len(&first) + 1);
    Optimized {
        caption: truncate_with_ellipsis(caption, available),
        hashtags: first,
        optimized: true,
    }
}

fn joined_len(hashtags: &[String]) -> usize {
    let tags: usize = hashtags.iter().map(|h| h.chars().count()).sum();
    tags + hashtags.len().saturating_sub(1)
}

/// First `width - 3` characters followed by `"..."`.
fn truncate_with_ellipsis(text: &str, width: usize) -> String {
    let keep = width.saturating_sub(ELLIPSIS.len());
    let mut out: String = text.chars().take(keep).collect();
    out.push_str(ELLIPSIS);
    out
}
