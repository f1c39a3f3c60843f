//! Prompt construction for caption generation.
//!
//! Every provider call is single-turn: one system instruction describing the
//! tone and length budget, one user instruction carrying the report details
//! and the required response shape. Prompts are kept short to save tokens.

use super::locale::category_display_name;
use crate::types::{CaptionRequest, Message, Tone};

fn tone_instruction(tone: Tone) -> &'static str {
    match tone {
        Tone::Formal => "Gunakan bahasa Indonesia baku, sopan, dan objektif.",
        Tone::Urgent => "Tekankan bahaya dan kebutuhan perbaikan segera, tanpa berlebihan.",
        Tone::Community => "Gunakan bahasa santai yang mengajak warga peduli dan ikut berbagi.",
        Tone::Informative => "Sampaikan fakta lokasi dan jenis kerusakan secara ringkas dan jelas.",
    }
}

/// System instruction: role, tone and hard length limit.
pub fn system_prompt(tone: Tone, max_length: usize) -> String {
    format!(
        "Kamu penulis caption media sosial untuk laporan kerusakan jalan. {} \
         Panjang caption beserta hashtag maksimal {} karakter.",
        tone_instruction(tone),
        max_length
    )
}

/// User instruction: report details plus the strict two-field output format.
pub fn user_prompt(request: &CaptionRequest) -> String {
    let report = &request.report;
    let config = request.platform.config();
    let mut prompt = format!(
        "Buat caption untuk laporan berikut.\n\
         Kerusakan: {}\n\
         Lokasi: {}, {}, {}\n\
         Platform: {}\n\
         Nada: {}\n\
         Maksimal {} hashtag.",
        category_display_name(&report.category),
        report.street,
        report.district,
        report.city,
        request.platform,
        request.tone,
        config.hashtag_limit,
    );
    if let Some(extra) = request
        .custom_instructions
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        prompt.push_str("\nInstruksi tambahan: ");
        prompt.push_str(extra);
    }
    prompt.push_str(
        "\nBalas hanya dengan JSON: {\"caption\": \"...\", \"hashtags\": [\"#...\"]}",
    );
    prompt
}

/// The `[system, user]` message pair for one provider call.
pub fn build_messages(request: &CaptionRequest) -> Vec<Message> {
    vec![
        Message::system(system_prompt(
            request.tone,
            request.platform.config().max_length,
        )),
        Message::user(user_prompt(request)),
    ]
}
