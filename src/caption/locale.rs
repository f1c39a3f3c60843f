//! Indonesian display names, hashtag tables and date formatting.

use chrono::{DateTime, Datelike, FixedOffset, Utc};

/// Hashtags appended to every template caption after the category tags.
pub const COMMON_HASHTAGS: &[&str] = &["#JalanRusak", "#LaporJalan", "#InfrastrukturPublik"];

const MONTHS: [&str; 12] = [
    "Januari",
    "Februari",
    "Maret",
    "April",
    "Mei",
    "Juni",
    "Juli",
    "Agustus",
    "September",
    "Oktober",
    "November",
    "Desember",
];

/// WIB, UTC+07:00.
const WIB_OFFSET_SECS: i32 = 7 * 3600;

/// Human-readable name for a damage category key.
///
/// Unknown keys fall back to a generic label.
pub fn category_display_name(category: &str) -> &'static str {
    match category {
        "berlubang" => "Jalan Berlubang",
        "retak" => "Jalan Retak",
        "amblas" => "Jalan Amblas",
        "bergelombang" => "Jalan Bergelombang",
        "aspal_mengelupas" => "Aspal Mengelupas",
        "genangan" => "Genangan Air",
        _ => "Kerusakan Jalan",
    }
}

/// Category-specific hashtags, most specific first.
pub fn category_hashtags(category: &str) -> &'static [&'static str] {
    match category {
        "berlubang" => &["#JalanBerlubang", "#JalanRusak"],
        "retak" => &["#JalanRetak", "#JalanRusak"],
        "amblas" => &["#JalanAmblas", "#JalanRusak"],
        "bergelombang" => &["#JalanBergelombang"],
        "aspal_mengelupas" => &["#AspalRusak"],
        "genangan" => &["#GenanganAir", "#Drainase"],
        _ => &["#KerusakanJalan"],
    }
}

/// `D Bulan YYYY` in WIB, e.g. `19 Oktober 2026`.
pub fn format_date(at: &DateTime<Utc>) -> String {
    let local = match FixedOffset::east_opt(WIB_OFFSET_SECS) {
        Some(offset) => at.with_timezone(&offset).date_naive(),
        None => at.date_naive(),
    };
    format!(
        "{} {} {}",
        local.day(),
        MONTHS[local.month0() as usize],
        local.year()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn date_uses_wib_day_boundary() {
        // 18:30 UTC is already the next day in Jakarta.
        let at = Utc.with_ymd_and_hms(2026, 10, 18, 18, 30, 0).unwrap();
        assert_eq!(format_date(&at), "19 Oktober 2026");
    }

    #[test]
    fn unknown_category_gets_generic_name() {
        assert_eq!(category_display_name("meteor"), "Kerusakan Jalan");
        assert_eq!(category_hashtags("meteor"), &["#KerusakanJalan"]);
    }
}
