// src/core/report.rs

use crate::{
    constants::{NANOS_PER_MILLI, NO_MEASUREMENTS_LINE, REPORT_FOOTER, REPORT_HEADER},
    models::MeasurementStats,
};
use std::cmp::Ordering;

/// Formats the line emitted after each verbose-mode measurement.
///
/// The duration is shown in whole milliseconds, truncated rather than rounded.
pub fn format_timing_line(name: &str, nanos: u64) -> String {
    format!("{} took {}ms", name, nanos / NANOS_PER_MILLI)
}

/// Formats one report row with a two-decimal average.
pub fn format_stats_line(stats: &MeasurementStats) -> String {
    format!(
        "{}: {:.2}ms avg ({} samples)",
        stats.name, stats.average_ms, stats.count
    )
}

/// Orders rows by descending average, then by ascending name for ties.
pub fn sort_for_report(rows: &mut [MeasurementStats]) {
    rows.sort_by(|a, b| match b.average_ms.total_cmp(&a.average_ms) {
        Ordering::Equal => a.name.cmp(&b.name),
        other => other,
    });
}

/// Renders the full report for rows already in report order.
pub fn render(rows: &[MeasurementStats]) -> Vec<String> {
    if rows.is_empty() {
        return vec![NO_MEASUREMENTS_LINE.to_string()];
    }

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(REPORT_HEADER.to_string());
    lines.extend(rows.iter().map(format_stats_line));
    lines.push(REPORT_FOOTER.to_string());
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: &str, average_ms: f64, count: usize) -> MeasurementStats {
        MeasurementStats {
            name: name.to_string(),
            average_ms,
            count,
        }
    }

    #[test]
    fn test_timing_line_truncates_to_whole_millis() {
        assert_eq!(format_timing_line("load", 10_999_999), "load took 10ms");
        assert_eq!(format_timing_line("tiny", 999_999), "tiny took 0ms");
    }

    #[test]
    fn test_stats_line_uses_two_decimals() {
        let line = format_stats_line(&row("save", 5.016_7, 3));
        assert_eq!(line, "save: 5.02ms avg (3 samples)");
    }

    #[test]
    fn test_sort_descending_with_name_tiebreak() {
        // --- Setup ---
        let mut rows = vec![
            row("b", 1.0, 1),
            row("fast", 0.5, 1),
            row("a", 1.0, 1),
            row("slow", 9.0, 2),
        ];

        // --- Execute ---
        sort_for_report(&mut rows);

        // --- Assert ---
        let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["slow", "a", "b", "fast"]);
    }

    #[test]
    fn test_render_empty_has_no_borders() {
        assert_eq!(render(&[]), vec![NO_MEASUREMENTS_LINE.to_string()]);
    }

    #[test]
    fn test_render_wraps_rows_in_borders() {
        let lines = render(&[row("load", 10.0, 3), row("save", 5.0, 1)]);
        assert_eq!(
            lines,
            vec![
                "=== Performance Statistics ===",
                "load: 10.00ms avg (3 samples)",
                "save: 5.00ms avg (1 samples)",
                "============================",
            ]
        );
    }
}
