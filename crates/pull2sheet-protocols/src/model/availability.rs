//! Capability availability states.

use serde::{Deserialize, Serialize};

/// Status reported by the capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Availability {
    Available,
    Downloadable,
    Downloading,
    Unavailable,
}

impl Availability {
    /// Parse a status string as reported by a host runtime.
    ///
    /// Unknown strings are treated as `Unavailable`.
    pub fn parse(status: &str) -> Self {
        match status.trim().to_ascii_lowercase().as_str() {
            "available" | "readily" => Availability::Available,
            "downloadable" | "after-download" => Availability::Downloadable,
            "downloading" => Availability::Downloading,
            _ => Availability::Unavailable,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Availability::Available => "available",
            Availability::Downloadable => "downloadable",
            Availability::Downloading => "downloading",
            Availability::Unavailable => "unavailable",
        }
    }

    /// Whether sessions may be requested. Download states are allowed; the
    /// creation deadline bounds how long we wait for them.
    pub fn is_usable(&self) -> bool {
        !matches!(self, Availability::Unavailable)
    }
}

impl std::fmt::Display for Availability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_unavailable_aliases() {
        assert_eq!(Availability::parse("unavailable"), Availability::Unavailable);
        assert_eq!(Availability::parse("no"), Availability::Unavailable);
        assert_eq!(Availability::parse("something-else"), Availability::Unavailable);
    }

    #[test]
    fn test_parse_usable_states() {
        assert_eq!(Availability::parse("available"), Availability::Available);
        assert_eq!(Availability::parse("readily"), Availability::Available);
        assert_eq!(Availability::parse("after-download"), Availability::Downloadable);
        assert_eq!(Availability::parse("Downloading"), Availability::Downloading);
    }

    #[test]
    fn test_is_usable() {
        assert!(Availability::Available.is_usable());
        assert!(Availability::Downloading.is_usable());
        assert!(!Availability::Unavailable.is_usable());
    }

    #[test]
    fn test_display() {
        assert_eq!(Availability::Downloadable.to_string(), "downloadable");
    }
}
