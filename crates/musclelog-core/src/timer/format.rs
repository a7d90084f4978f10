/// Render milliseconds as `mm:ss.cc`, where `cc` is hundredths of a second.
///
/// There is no hour field; past 99 minutes the minute field just grows.
pub fn format_clock(ms: u64) -> String {
    let minutes = ms / 60_000;
    let seconds = (ms % 60_000) / 1_000;
    let hundredths = (ms % 1_000) / 10;
    format!("{minutes:02}:{seconds:02}.{hundredths:02}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_reference_values() {
        assert_eq!(format_clock(0), "00:00.00");
        assert_eq!(format_clock(65_432), "01:05.43");
        assert_eq!(format_clock(600_000), "10:00.00");
    }

    #[test]
    fn truncates_sub_hundredths() {
        assert_eq!(format_clock(9), "00:00.00");
        assert_eq!(format_clock(1_999), "00:01.99");
    }

    #[test]
    fn minutes_grow_past_two_digits() {
        assert_eq!(format_clock(100 * 60_000 + 1_230), "100:01.23");
        assert!(format_clock(u64::MAX).contains(':'));
    }
}
