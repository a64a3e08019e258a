use crate::{
    client::Client,
    config::LimitTable,
    domain::top_domain,
    error::Result,
    types::{Outcome, Report, Torrent},
};
use std::{collections::BTreeSet, fmt::Display};

const MIB: f64 = 1024.0 * 1024.0;

/// An upload cap in MB/s
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Limit(f64);

impl Limit {
    pub fn new(megabytes: f64) -> Self {
        Limit(megabytes)
    }

    pub fn megabytes(&self) -> f64 {
        self.0
    }

    /// The cap in bytes/s as the Web UI expects it (truncated)
    pub fn bytes(&self) -> i64 {
        (self.0 * MIB) as i64
    }
}

impl Display for Limit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} MB/s", self.0)
    }
}

/// What to do with a single torrent
#[derive(Debug, Clone, PartialEq)]
pub enum Plan {
    /// None of the torrent's trackers is configured
    Skip,
    /// The torrent is already capped at the target
    Keep(Limit),
    /// The cap has to be (re)applied
    Apply(Limit),
}

/// Decide which cap a torrent with trackers under `domains` should get.
///
/// When several configured domains match, the most restrictive cap wins.
/// A `current` limit of 0 (or below) means unlimited and always re-applies.
pub fn plan<S: AsRef<str>>(table: &LimitTable, domains: &[S], current: i64) -> Plan {
    let matches: BTreeSet<&str> = domains
        .iter()
        .map(AsRef::as_ref)
        .filter(|d| table.contains(d))
        .collect();

    let target = matches
        .iter()
        .filter_map(|d| table.get(d))
        .fold(None, |min: Option<Limit>, l| match min {
            Some(m) if m <= l => Some(m),
            _ => Some(l),
        });

    match target {
        None => Plan::Skip,
        Some(limit) if current <= 0 || current != limit.bytes() => Plan::Apply(limit),
        Some(limit) => Plan::Keep(limit),
    }
}

/// Applies per-tracker upload caps to torrents
#[derive(Debug, Clone)]
pub struct Limiter<'a> {
    table: &'a LimitTable,
}

impl<'a> Limiter<'a> {
    pub fn new(table: &'a LimitTable) -> Self {
        Limiter { table }
    }

    /// Check a torrent and cap it if needed.
    ///
    /// Errors are reported in the returned `Report` and never abort the run.
    pub async fn check(&self, client: &Client, torrent: Torrent) -> Report {
        let outcome = match self.apply(client, &torrent).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("Cannot limit {} ({}): {}", torrent.name, torrent.hash, e);
                Outcome::Failed(e.to_string())
            }
        };
        Report::new(torrent, outcome)
    }

    async fn apply(&self, client: &Client, torrent: &Torrent) -> Result<Outcome> {
        // Last added tracker first
        let domains: Vec<String> = client
            .trackers(&torrent.hash)
            .await?
            .iter()
            .rev()
            .filter_map(|t| top_domain(&t.url))
            .collect();

        let plan = plan(self.table, &domains, torrent.up_limit);
        debug!("{} {:?} -> {:?}", torrent.hash, domains, plan);

        match plan {
            Plan::Skip => Ok(Outcome::Skipped),
            Plan::Keep(limit) => Ok(Outcome::Unchanged(limit)),
            Plan::Apply(limit) => {
                client.set_upload_limit(&torrent.hash, limit.bytes()).await?;
                let domain = domains.into_iter().next().unwrap_or_default();
                Ok(Outcome::Applied { domain, limit })
            }
        }
    }
}
