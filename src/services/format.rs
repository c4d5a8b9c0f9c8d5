use chrono::{Datelike, NaiveDate};

/// Compact suffixes, largest first
const COMPACT_UNITS: [(f64, &str); 3] = [(1e12, "T"), (1e9, "B"), (1e6, "M")];

/// Minutes to "2h 19m"
pub fn format_runtime(minutes: u32) -> String {
    format!("{}h {}m", minutes / 60, minutes % 60)
}

/// Formats a whole-dollar amount as US currency.
///
/// Amounts of a million or more use compact notation (`$63M`, `$1.2B`): two
/// significant digits while the scaled value is below 10, whole numbers
/// above that. Smaller amounts are written out in full with cents.
pub fn format_currency(amount: u64) -> String {
    if amount < 1_000_000 {
        return format!("${}.00", format_count(amount));
    }

    let value = amount as f64;
    let idx = COMPACT_UNITS
        .iter()
        .position(|(unit, _)| value >= *unit)
        .unwrap_or(COMPACT_UNITS.len() - 1);

    let (unit, suffix) = COMPACT_UNITS[idx];
    let scaled = compact_number(value / unit);

    // 999.7M rounds to 1000M; promote it to the next suffix
    if scaled == "1000" && idx > 0 {
        let (unit, suffix) = COMPACT_UNITS[idx - 1];
        return format!("${}{}", compact_number(value / unit), suffix);
    }

    format!("${}{}", scaled, suffix)
}

fn compact_number(scaled: f64) -> String {
    if scaled < 10.0 {
        let text = format!("{:.1}", scaled);
        match text.strip_suffix(".0") {
            Some(whole) => whole.to_string(),
            None => text,
        }
    } else {
        format!("{:.0}", scaled)
    }
}

/// Groups digits in thousands: 26280 -> "26,280"
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    out
}

/// One decimal place, as shown next to the star icon
pub fn format_rating(vote_average: f64) -> String {
    format!("{:.1}", vote_average)
}

/// Year of a catalog release date ("1999-10-15"). Empty or malformed dates
/// have no year.
pub fn release_year(release_date: &str) -> Option<i32> {
    NaiveDate::parse_from_str(release_date, "%Y-%m-%d")
        .ok()
        .map(|d| d.year())
}

/// "1 movie" / "3 movies"
pub fn count_label(n: u64, singular: &str, plural: &str) -> String {
    if n == 1 {
        format!("{} {}", format_count(n), singular)
    } else {
        format!("{} {}", format_count(n), plural)
    }
}
