//! Tones, target platforms and per-platform length budgets.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::WartaError;

/// Stylistic preset controlling caption phrasing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Formal,
    Urgent,
    Community,
    Informative,
}

impl Tone {
    pub const ALL: [Tone; 4] = [Tone::Formal, Tone::Urgent, Tone::Community, Tone::Informative];

    /// Wire names accepted by [`Tone::from_str`].
    pub const NAMES: &'static [&'static str] = &["formal", "urgent", "community", "informative"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Formal => "formal",
            Tone::Urgent => "urgent",
            Tone::Community => "community",
            Tone::Informative => "informative",
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tone {
    type Err = WartaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tone::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| WartaError::validation("tone", s, Tone::NAMES))
    }
}

/// Social-sharing destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Whatsapp,
    Twitter,
    Facebook,
    Threads,
    Telegram,
}

impl Platform {
    pub const ALL: [Platform; 5] = [
        Platform::Whatsapp,
        Platform::Twitter,
        Platform::Facebook,
        Platform::Threads,
        Platform::Telegram,
    ];

    /// Wire names accepted by [`Platform::from_str`].
    pub const NAMES: &'static [&'static str] =
        &["whatsapp", "twitter", "facebook", "threads", "telegram"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Whatsapp => "whatsapp",
            Platform::Twitter => "twitter",
            Platform::Facebook => "facebook",
            Platform::Threads => "threads",
            Platform::Telegram => "telegram",
        }
    }

    /// Length and hashtag budget for this platform.
    pub fn config(&self) -> &'static PlatformConfig {
        match self {
            Platform::Whatsapp => &WHATSAPP,
            Platform::Twitter => &TWITTER,
            Platform::Facebook => &FACEBOOK,
            Platform::Threads => &THREADS,
            Platform::Telegram => &TELEGRAM,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = WartaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Platform::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| WartaError::validation("platform", s, Platform::NAMES))
    }
}

/// How the sharing UI attaches the report link on a platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrlHandling {
    /// Link pasted into the message body.
    Inline,
    /// Link counted as a fixed-width shortened URL.
    Shortened,
    /// Link rendered as a preview card outside the text.
    Preview,
}

/// Immutable per-platform budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlatformConfig {
    /// Maximum rendered length (caption + hashtags) in characters.
    pub max_length: usize,
    /// Maximum number of hashtags a caption should carry.
    pub hashtag_limit: usize,
    pub url_handling: UrlHandling,
}

const WHATSAPP: PlatformConfig = PlatformConfig {
    max_length: 1000,
    hashtag_limit: 5,
    url_handling: UrlHandling::Inline,
};

const TWITTER: PlatformConfig = PlatformConfig {
    max_length: 280,
    hashtag_limit: 3,
    url_handling: UrlHandling::Shortened,
};

const FACEBOOK: PlatformConfig = PlatformConfig {
    max_length: 2000,
    hashtag_limit: 5,
    url_handling: UrlHandling::Preview,
};

const THREADS: PlatformConfig = PlatformConfig {
    max_length: 500,
    hashtag_limit: 3,
    url_handling: UrlHandling::Inline,
};

const TELEGRAM: PlatformConfig = PlatformConfig {
    max_length: 1000,
    hashtag_limit: 5,
    url_handling: UrlHandling::Inline,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_tone_round_trips_through_its_name() {
        for tone in Tone::ALL {
            assert_eq!(tone.as_str().parse::<Tone>().unwrap(), tone);
        }
    }

    #[test]
    fn platform_names_are_case_sensitive() {
        assert!("Twitter".parse::<Platform>().is_err());
        assert_eq!("twitter".parse::<Platform>().unwrap(), Platform::Twitter);
    }

    #[test]
    fn twitter_budget() {
        let config = Platform::Twitter.config();
        assert_eq!(config.max_length, 280);
        assert_eq!(config.hashtag_limit, 3);
    }
}
