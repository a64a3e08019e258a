use console::style;
use pad::{Alignment, PadStr};
use std::fmt::{self, Display};

use qb_uplimit::{Outcome, Report};

// Maximum padding for each entry in the final statistics output
const MAX_PADDING: usize = 20;

pub(crate) fn color_report(report: &Report) -> String {
    let out = match report.outcome {
        Outcome::Applied { .. } => style(report).green().bright(),
        Outcome::Unchanged(_) => style(report),
        Outcome::Skipped => style(report).dim(),
        Outcome::Failed(_) => style(report).red().bright(),
    };
    out.to_string()
}

pub(crate) struct RunStats {
    total: usize,
    applied: usize,
    unchanged: usize,
    skipped: usize,
    failures: Vec<Report>,
}

impl RunStats {
    pub(crate) fn new() -> Self {
        RunStats {
            total: 0,
            applied: 0,
            unchanged: 0,
            skipped: 0,
            failures: Vec::new(),
        }
    }

    pub(crate) fn add(&mut self, report: Report) {
        self.total += 1;
        match report.outcome {
            Outcome::Applied { .. } => self.applied += 1,
            Outcome::Unchanged(_) => self.unchanged += 1,
            Outcome::Skipped => self.skipped += 1,
            Outcome::Failed(_) => self.failures.push(report),
        }
    }

    pub(crate) fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

fn write_stat(f: &mut fmt::Formatter, title: &str, stat: usize) -> fmt::Result {
    let fill = title.chars().count();
    f.write_str(title)?;
    f.write_str(
        &stat
            .to_string()
            .pad(MAX_PADDING - fill, '.', Alignment::Right, false),
    )?;
    f.write_str("\n")
}

impl Display for RunStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let separator = "-".repeat(MAX_PADDING + 1);

        writeln!(f, "📝 Summary")?;
        writeln!(f, "{}", separator)?;
        write_stat(f, "🔍 Total", self.total)?;
        write_stat(f, "✅ Limited", self.applied)?;
        write_stat(f, "💤 Unchanged", self.unchanged)?;
        write_stat(f, "👻 Skipped", self.skipped)?;
        write_stat(f, "🚫 Errors", self.failures.len())?;

        if !self.failures.is_empty() {
            writeln!(f)?;
            writeln!(f, "Errors")?;
        }
        for report in &self.failures {
            writeln!(f, "{}", color_report(report))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use qb_uplimit::{Limit, Torrent};

    fn report(name: &str, outcome: Outcome) -> Report {
        let torrent = Torrent {
            hash: format!("{}-hash", name),
            name: name.to_string(),
            up_limit: 0,
        };
        Report::new(torrent, outcome)
    }

    #[test]
    fn test_stats() {
        let mut stats = RunStats::new();
        stats.add(report(
            "applied",
            Outcome::Applied {
                domain: "example.com".to_string(),
                limit: Limit::new(1.0),
            },
        ));
        stats.add(report("unchanged", Outcome::Unchanged(Limit::new(1.0))));
        stats.add(report("skipped", Outcome::Skipped));
        assert!(stats.is_success());

        stats.add(report("broken", Outcome::Failed("boom".to_string())));
        assert!(!stats.is_success());
        assert_eq!(stats.total, 4);
        assert_eq!(stats.applied, 1);
        assert_eq!(stats.unchanged, 1);
        assert_eq!(stats.skipped, 1);
        assert_eq!(stats.failures.len(), 1);
        assert_eq!(stats.failures[0].torrent.name, "broken");
    }

    #[test]
    fn test_summary_lists_failures() {
        let mut stats = RunStats::new();
        stats.add(report("broken", Outcome::Failed("boom".to_string())));
        let out = stats.to_string();
        assert!(out.contains("Total"));
        assert!(out.contains("broken"));
        assert!(out.contains("Failed (boom)"));
    }
}
