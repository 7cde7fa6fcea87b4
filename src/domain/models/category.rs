//! Information categories — the investigative topics a subject can be
//! investigated under.
//!
//! Foundation categories (identity, employment, education) supply the
//! baseline facts other categories pivot on, so they carry a stricter
//! confidence bar and a larger iteration budget (see
//! [`TerminationPolicy`](super::policy::TerminationPolicy)).

use serde::{Deserialize, Serialize};

/// An enumerated investigative topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InformationCategory {
    /// Legal identity: names, dates of birth, identifiers.
    Identity,
    /// Employment history and current positions.
    Employment,
    /// Education history and credentials.
    Education,
    /// Criminal records and proceedings.
    Criminal,
    /// Civil litigation history.
    Civil,
    /// Financial standing, bankruptcies, liens.
    Financial,
    /// Professional licenses and certifications.
    Licenses,
    /// Regulatory actions and findings.
    Regulatory,
    /// Sanctions and watchlist presence.
    Sanctions,
    /// Adverse media coverage.
    AdverseMedia,
    /// Online presence and digital footprint.
    DigitalFootprint,
    /// Second-degree network associations.
    #[serde(rename = "network_degree_2")]
    NetworkDegree2,
    /// Third-degree network associations.
    #[serde(rename = "network_degree_3")]
    NetworkDegree3,
}

impl InformationCategory {
    /// All categories in canonical order.
    pub const ALL: [Self; 13] = [
        Self::Identity,
        Self::Employment,
        Self::Education,
        Self::Criminal,
        Self::Civil,
        Self::Financial,
        Self::Licenses,
        Self::Regulatory,
        Self::Sanctions,
        Self::AdverseMedia,
        Self::DigitalFootprint,
        Self::NetworkDegree2,
        Self::NetworkDegree3,
    ];

    /// Whether this is a foundation category.
    ///
    /// Foundation categories use the stricter confidence threshold and the
    /// larger iteration budget from the termination policy. The
    /// classification is fixed at the type level and never changes mid-run.
    pub fn is_foundation(self) -> bool {
        matches!(self, Self::Identity | Self::Employment | Self::Education)
    }

    /// The network degree of a network category, if any.
    pub fn network_degree(self) -> Option<u8> {
        match self {
            Self::NetworkDegree2 => Some(2),
            Self::NetworkDegree3 => Some(3),
            _ => None,
        }
    }
}

impl std::fmt::Display for InformationCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Identity => "identity",
            Self::Employment => "employment",
            Self::Education => "education",
            Self::Criminal => "criminal",
            Self::Civil => "civil",
            Self::Financial => "financial",
            Self::Licenses => "licenses",
            Self::Regulatory => "regulatory",
            Self::Sanctions => "sanctions",
            Self::AdverseMedia => "adverse_media",
            Self::DigitalFootprint => "digital_footprint",
            Self::NetworkDegree2 => "network_degree_2",
            Self::NetworkDegree3 => "network_degree_3",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_foundation_classification() {
        assert!(InformationCategory::Identity.is_foundation());
        assert!(InformationCategory::Employment.is_foundation());
        assert!(InformationCategory::Education.is_foundation());
        assert!(!InformationCategory::Criminal.is_foundation());
        assert!(!InformationCategory::NetworkDegree3.is_foundation());
    }

    #[test]
    fn test_network_degree() {
        assert_eq!(InformationCategory::NetworkDegree2.network_degree(), Some(2));
        assert_eq!(InformationCategory::NetworkDegree3.network_degree(), Some(3));
        assert_eq!(InformationCategory::Identity.network_degree(), None);
    }

    #[test]
    fn test_serde_snake_case() {
        assert_eq!(
            serde_json::to_string(&InformationCategory::AdverseMedia).unwrap(),
            "\"adverse_media\""
        );
        let parsed: InformationCategory =
            serde_json::from_str("\"network_degree_2\"").unwrap();
        assert_eq!(parsed, InformationCategory::NetworkDegree2);
    }

    #[test]
    fn test_all_covers_every_variant() {
        assert_eq!(InformationCategory::ALL.len(), 13);
        let foundations = InformationCategory::ALL
            .iter()
            .filter(|c| c.is_foundation())
            .count();
        assert_eq!(foundations, 3);
    }
}
