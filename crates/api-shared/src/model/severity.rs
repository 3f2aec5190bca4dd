use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Ordered classification of a vital-sign reading's clinical urgency.
///
/// The derived `Ord` follows declaration order, so `Normal < Elevated <
/// High < Critical`; the classifier relies on this to take the worst level
/// across signs. Lab results reuse the same ladder.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ToSchema, Default,
)]
pub enum SeverityLevel {
    #[default]
    Normal,
    Elevated,
    High,
    Critical,
}

impl std::fmt::Display for SeverityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SeverityLevel::Normal => "Normal",
            SeverityLevel::Elevated => "Elevated",
            SeverityLevel::High => "High",
            SeverityLevel::Critical => "Critical",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering_is_clinical() {
        assert!(SeverityLevel::Normal < SeverityLevel::Elevated);
        assert!(SeverityLevel::Elevated < SeverityLevel::High);
        assert!(SeverityLevel::High < SeverityLevel::Critical);
    }
}
