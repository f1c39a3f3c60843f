//! Deterministic, provider-free caption construction.
//!
//! Used whenever the model pipeline cannot produce a caption. Output depends
//! only on the report, tone and platform, so identical inputs always render
//! byte-identical captions.

use super::locale::{COMMON_HASHTAGS, category_display_name, category_hashtags, format_date};
use super::optimizer::optimize;
use crate::types::{CaptionResult, Platform, ReportSharingData, Tone, rendered_len};

/// `model_used` value for template captions.
pub const TEMPLATE_MODEL: &str = "template-fallback";

fn template_for(tone: Tone) -> &'static str {
    match tone {
        Tone::Formal => {
            "Laporan kerusakan jalan: {category} di {street}, {district}, {city}, {province}. \
             Dilaporkan pada {date}. Mohon perhatian dan tindak lanjut dari pihak berwenang."
        }
        Tone::Urgent => {
            "PERHATIAN! {category} di {location} membahayakan pengguna jalan. \
             Dilaporkan {date}, butuh perbaikan segera! Hati-hati saat melintas."
        }
        Tone::Community => {
            "Warga {city}, ada {category} di {street}, {district}. \
             Yuk bantu sebarkan supaya cepat diperbaiki dan jalan kita aman bersama!"
        }
        Tone::Informative => {
            "Info jalan: {category} terpantau di {location}, {province}. \
             Tercatat sejak {date}. Pengendara diharap berhati-hati."
        }
    }
}

/// Substitute report values into the tone's template.
pub fn render_template(report: &ReportSharingData, tone: Tone) -> String {
    template_for(tone)
        .replace("{category}", category_display_name(&report.category))
        .replace("{street}", &report.street)
        .replace("{district}", &report.district)
        .replace("{city}", &report.city)
        .replace("{province}", &report.province)
        .replace("{location}", &report.location())
        .replace("{date}", &format_date(&report.created_at))
}

/// Category tags followed by the common pool, de-duplicated in order and
/// capped at `limit`.
pub fn template_hashtags(category: &str, limit: usize) -> Vec<String> {
    let mut tags: Vec<String> = Vec::with_capacity(limit);
    for tag in category_hashtags(category).iter().chain(COMMON_HASHTAGS) {
        if tags.len() == limit {
            break;
        }
        if !tags.iter().any(|t| t == tag) {
            tags.push((*tag).to_string());
        }
    }
    tags
}

/// Build a complete, platform-fitted template caption.
pub fn generate_template_caption(
    report: &ReportSharingData,
    tone: Tone,
    platform: Platform,
) -> CaptionResult {
    let config = platform.config();
    let caption = render_template(report, tone);
    let hashtags = template_hashtags(&report.category, config.hashtag_limit);
    let fitted = optimize(&caption, &hashtags, config);

    CaptionResult {
        character_count: rendered_len(&fitted.caption, &fitted.hashtags),
        caption: fitted.caption,
        hashtags: fitted.hashtags,
        platform_optimized: fitted.optimized,
        ai_generated: false,
        model_used: TEMPLATE_MODEL.to_string(),
        token_usage: None,
    }
}
