// Display helpers for WAR results and play annotations.

/// WAR to one decimal: `"2.3"`, `"-0.4"`.
pub fn format_war(war: f64) -> String {
    format!("{:.1}", war)
}

/// Signed runs to one decimal: `"+4.1"`, `"-2.0"`.
pub fn format_runs(runs: f64) -> String {
    format!("{:+.1}", runs)
}

/// Rate stat in baseball style, without the leading zero: `".320"`.
/// Values of 1.0 or more keep their integer part (`"1.250"`).
pub fn format_woba(woba: f64) -> String {
    let text = format!("{:.3}", woba);
    if let Some(rest) = text.strip_prefix("0.") {
        format!(".{rest}")
    } else if let Some(rest) = text.strip_prefix("-0.") {
        format!("-.{rest}")
    } else {
        text
    }
}

/// Outs recorded as innings pitched: 17 outs → `"5.2"`.
pub fn format_ip(outs: u32) -> String {
    format!("{}.{}", outs / 3, outs % 3)
}

/// Parse `"5.2"` (or `"5"`) innings pitched into outs recorded. The
/// fractional digit counts outs and must be 0, 1, or 2.
pub fn parse_ip(text: &str) -> Option<u32> {
    let text = text.trim();
    let (whole, frac) = match text.split_once('.') {
        Some((whole, frac)) => (whole, frac),
        None => (text, "0"),
    };
    let innings: u32 = whole.parse().ok()?;
    let outs: u32 = match frac {
        "0" | "" => 0,
        "1" => 1,
        "2" => 2,
        _ => return None,
    };
    innings.checked_mul(3)?.checked_add(outs)
}

/// Leverage index to two decimals: `"1.85"`.
pub fn format_li(li: f64) -> String {
    format!("{:.2}", li)
}

/// Signed WPA to three decimals: `"+0.073"`.
pub fn format_wpa(wpa: f64) -> String {
    format!("{:+.3}", wpa)
}

/// Win probability as a percentage: 0.653 → `"65.3%"`.
pub fn format_win_probability(probability: f64) -> String {
    format!("{:.1}%", probability * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn war_and_runs() {
        assert_eq!(format_war(2.34), "2.3");
        assert_eq!(format_war(-0.44), "-0.4");
        assert_eq!(format_runs(4.06), "+4.1");
        assert_eq!(format_runs(-2.0), "-2.0");
    }

    #[test]
    fn woba_drops_leading_zero() {
        assert_eq!(format_woba(0.3204), ".320");
        assert_eq!(format_woba(1.25), "1.250");
        assert_eq!(format_woba(0.0), ".000");
    }

    #[test]
    fn innings_pitched_round_trip() {
        assert_eq!(format_ip(17), "5.2");
        assert_eq!(format_ip(0), "0.0");
        assert_eq!(parse_ip("5.2"), Some(17));
        assert_eq!(parse_ip("7"), Some(21));
        assert_eq!(parse_ip(" 100.1 "), Some(301));
    }

    #[test]
    fn parse_ip_rejects_bad_fractions() {
        assert_eq!(parse_ip("5.3"), None);
        assert_eq!(parse_ip("5.33"), None);
        assert_eq!(parse_ip("abc"), None);
        assert_eq!(parse_ip("-1.0"), None);
    }

    #[test]
    fn leverage_and_probability() {
        assert_eq!(format_li(1.849), "1.85");
        assert_eq!(format_wpa(0.0734), "+0.073");
        assert_eq!(format_wpa(-0.12), "-0.120");
        assert_eq!(format_win_probability(0.6534), "65.3%");
    }
}
