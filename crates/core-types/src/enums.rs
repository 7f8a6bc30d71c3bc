use serde::{Deserialize, Serialize};

/// Visual style of a sentiment badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeVariant {
    Default,
    Destructive,
    Secondary,
}

impl BadgeVariant {
    /// Two-way style used on the dashboard cards: an exact "Neutral" label is
    /// rendered plainly, every other label is highlighted as an alert.
    pub fn for_summary(sentiment: &str) -> Self {
        if sentiment == "Neutral" {
            BadgeVariant::Default
        } else {
            BadgeVariant::Destructive
        }
    }

    /// Three-way style used for individual news items.
    pub fn for_news(sentiment: &str) -> Self {
        match sentiment {
            "positive" => BadgeVariant::Default,
            "negative" => BadgeVariant::Destructive,
            _ => BadgeVariant::Secondary,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BadgeVariant::Default => "default",
            BadgeVariant::Destructive => "destructive",
            BadgeVariant::Secondary => "secondary",
        }
    }
}

impl std::fmt::Display for BadgeVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_variant_is_case_sensitive() {
        assert_eq!(BadgeVariant::for_summary("Neutral"), BadgeVariant::Default);
        assert_eq!(BadgeVariant::for_summary("neutral"), BadgeVariant::Destructive);
        assert_eq!(BadgeVariant::for_summary("Bullish"), BadgeVariant::Destructive);
        assert_eq!(BadgeVariant::for_summary(""), BadgeVariant::Destructive);
    }

    #[test]
    fn test_news_variant() {
        assert_eq!(BadgeVariant::for_news("positive"), BadgeVariant::Default);
        assert_eq!(BadgeVariant::for_news("negative"), BadgeVariant::Destructive);
        assert_eq!(BadgeVariant::for_news("neutral"), BadgeVariant::Secondary);
        assert_eq!(BadgeVariant::for_news("Positive"), BadgeVariant::Secondary);
    }

    #[test]
    fn test_variant_display() {
        assert_eq!(BadgeVariant::Destructive.to_string(), "destructive");
    }
}
