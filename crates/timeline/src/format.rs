use serde::Serialize;

/// Human-readable form of a signed year (negative = before present).
pub fn format_year(year: i64) -> String {
    let y = year as f64;
    if y < -1e9 {
        format!("{:.1} Billion Years Ago", -y / 1e9)
    } else if y < -1e6 {
        format!("{} Million Years Ago", (-y / 1e6).round() as i64)
    } else if year < 0 {
        format!("{} Years Ago", group_thousands(-year))
    } else {
        format!("{year} CE")
    }
}

fn group_thousands(value: i64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Text shown next to the scrubber.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineLabel {
    pub text: String,
    pub preview: bool,
}

impl TimelineLabel {
    pub fn new(text: impl Into<String>, preview: bool) -> Self {
        Self {
            text: text.into(),
            preview,
        }
    }

    /// Opacity the host renders the label with.
    pub fn opacity(&self) -> f32 {
        if self.preview { 0.7 } else { 0.9 }
    }
}

#[cfg(test)]
mod tests {
    use super::{TimelineLabel, format_year};
    use pretty_assertions::assert_eq;

    #[test]
    fn billions_keep_one_decimal() {
        assert_eq!(format_year(-4_600_000_000), "4.6 Billion Years Ago");
        assert_eq!(format_year(-2_500_000_000), "2.5 Billion Years Ago");
    }

    #[test]
    fn millions_are_rounded() {
        assert_eq!(format_year(-2_600_000), "3 Million Years Ago");
        assert_eq!(format_year(-541_000_000), "541 Million Years Ago");
        assert_eq!(format_year(-1_000_000_000), "1000 Million Years Ago");
    }

    #[test]
    fn recent_years_are_grouped() {
        assert_eq!(format_year(-12_000), "12,000 Years Ago");
        assert_eq!(format_year(-1_000_000), "1,000,000 Years Ago");
        assert_eq!(format_year(-150), "150 Years Ago");
    }

    #[test]
    fn present_is_common_era() {
        assert_eq!(format_year(2026), "2026 CE");
        assert_eq!(format_year(0), "0 CE");
    }

    #[test]
    fn preview_labels_are_dimmer() {
        assert!(TimelineLabel::new("x", true).opacity() < TimelineLabel::new("x", false).opacity());
    }
}
