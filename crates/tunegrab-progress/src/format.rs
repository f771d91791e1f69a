//! Display-string helpers.
//!
//! The fetch engine decorates its display strings with terminal colour codes
//! and padding; these helpers clean them up and render our own strings in the
//! same style when the engine sent none.

use std::sync::LazyLock;

use regex::Regex;

// ============================================================================
// Constants
// ============================================================================

const KIB: f64 = 1024.0;
const MIB: f64 = KIB * 1024.0;
const GIB: f64 = MIB * 1024.0;

static ANSI_ESCAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\x1b\[[0-9;?]*[A-Za-z]").expect("static ANSI pattern"));

static CLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(:\d+){0,2}$").expect("static clock pattern"));

// ============================================================================
// Cleaning
// ============================================================================

/// Strip ANSI escape sequences and surrounding whitespace.
pub fn clean_display(raw: &str) -> String {
    ANSI_ESCAPE.replace_all(raw, "").trim().to_string()
}

/// Parse a percentage display string such as `" 42.1%"` or `"42.1"`.
///
/// Returns `None` for anything that is not a finite number once the
/// optional `%` suffix is removed.
pub fn parse_percent(raw: &str) -> Option<f64> {
    let cleaned = clean_display(raw);
    let number = cleaned.strip_suffix('%').unwrap_or(&cleaned).trim();
    number.parse::<f64>().ok().filter(|p| p.is_finite())
}

/// Convert a clock string (`HH:MM:SS`, `MM:SS` or `SS`) to seconds.
///
/// `N/A`, `Unknown` and anything else that is not a clock yield `None`.
pub fn parse_eta_to_seconds(raw: &str) -> Option<u64> {
    let cleaned = clean_display(raw);
    if !CLOCK.is_match(&cleaned) {
        return None;
    }

    let parts: Vec<u64> = cleaned
        .split(':')
        .map(str::parse)
        .collect::<Result<_, _>>()
        .ok()?;

    // Oversized clocks are treated as unknown
    match parts.as_slice() {
        [h, m, s] => h
            .checked_mul(3600)?
            .checked_add(m.checked_mul(60)?)?
            .checked_add(*s),
        [m, s] => m.checked_mul(60)?.checked_add(*s),
        [s] => Some(*s),
        _ => None,
    }
}

// ============================================================================
// Rendering
// ============================================================================

/// Render seconds as `MM:SS`, or `H:MM:SS` past the hour.
pub fn format_eta(seconds: u64) -> String {
    let (h, m, s) = (seconds / 3600, (seconds % 3600) / 60, seconds % 60);
    if h > 0 {
        format!("{h}:{m:02}:{s:02}")
    } else {
        format!("{m:02}:{s:02}")
    }
}

/// Render a byte rate, e.g. `1.50MiB/s`.
pub fn format_speed(bytes_per_sec: f64) -> String {
    let (div, unit) = if bytes_per_sec >= GIB {
        (GIB, "GiB")
    } else if bytes_per_sec >= MIB {
        (MIB, "MiB")
    } else if bytes_per_sec >= KIB {
        (KIB, "KiB")
    } else {
        (1.0, "B")
    };
    format!("{:.2}{unit}/s", bytes_per_sec / div)
}

/// Render a percentage with one decimal, e.g. `42.0%`.
pub fn format_percent(percent: f64) -> String {
    format!("{percent:.1}%")
}

/// Last path component, accepting both separators.
pub fn basename(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}
