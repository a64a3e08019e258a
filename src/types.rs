use crate::limit::Limit;
use serde::Deserialize;
use std::fmt::Display;

/// A torrent as listed by `/api/v2/torrents/info`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Torrent {
    pub hash: String,
    pub name: String,
    /// Upload limit in bytes/s, 0 or below means unlimited
    #[serde(default)]
    pub up_limit: i64,
}

impl Torrent {
    /// Last twelve characters of the info hash, enough to tell torrents apart
    pub fn short_hash(&self) -> &str {
        let start = self.hash.len().saturating_sub(12);
        self.hash.get(start..).unwrap_or(&self.hash)
    }
}

/// A tracker entry as listed by `/api/v2/torrents/trackers`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Tracker {
    pub url: String,
}

/// Result of checking a single torrent
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// A new cap was set; `domain` is the most recently added tracker's domain
    Applied { domain: String, limit: Limit },
    /// The torrent already had the target cap
    Unchanged(Limit),
    /// No configured domain matched
    Skipped,
    /// The Web UI returned an error for this torrent
    Failed(String),
}

impl Outcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }

    pub fn icon(&self) -> &str {
        match self {
            Outcome::Applied { .. } => "✅",
            Outcome::Unchanged(_) => "💤",
            Outcome::Skipped => "👻",
            Outcome::Failed(_) => "🚫",
        }
    }
}

impl Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Applied { limit, .. } => write!(f, "Limited ({})", limit),
            Outcome::Unchanged(limit) => write!(f, "Unchanged ({})", limit),
            Outcome::Skipped => write!(f, "Skipped"),
            Outcome::Failed(e) => write!(f, "Failed ({})", e),
        }
    }
}

/// A torrent together with what happened to it
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub torrent: Torrent,
    pub outcome: Outcome,
}

impl Report {
    pub fn new(torrent: Torrent, outcome: Outcome) -> Self {
        Report { torrent, outcome }
    }
}

impl Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = &self.torrent.name;
        let hash = self.torrent.short_hash();
        match &self.outcome {
            Outcome::Applied { domain, limit } => write!(
                f,
                "{} Limited {} | {} | {} | upload to {}.",
                self.outcome.icon(),
                name,
                hash,
                domain,
                limit
            ),
            outcome => write!(f, "{} {} | {} | {}", outcome.icon(), name, hash, outcome),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test_utils::torrent;

    #[test]
    fn test_short_hash() {
        let t = torrent("0123456789abcdef0123456789abcdef01234567", "x", 0);
        assert_eq!(t.short_hash(), "cdef01234567");
        assert_eq!(torrent("abc", "x", 0).short_hash(), "abc");
    }

    #[test]
    fn test_deserialize_torrent_list() {
        let json = r#"[
            {"hash": "aaa", "name": "One", "up_limit": 0, "state": "uploading"},
            {"hash": "bbb", "name": "Two", "up_limit": 1048576}
        ]"#;
        let torrents: Vec<Torrent> = serde_json::from_str(json).unwrap();
        assert_eq!(torrents, vec![torrent("aaa", "One", 0), torrent("bbb", "Two", 1048576)]);
    }

    #[test]
    fn test_report_display() {
        let report = Report::new(
            torrent("0123456789abcdef0123456789abcdef01234567", "Debian ISO", 0),
            Outcome::Applied {
                domain: "example.com".to_string(),
                limit: Limit::new(1.5),
            },
        );
        assert_eq!(
            report.to_string(),
            "✅ Limited Debian ISO | cdef01234567 | example.com | upload to 1.5 MB/s."
        );
    }
}
