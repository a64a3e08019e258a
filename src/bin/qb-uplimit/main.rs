#[macro_use]
extern crate log;

use anyhow::Result;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use structopt::StructOpt;

mod options;
mod stats;

use crate::options::UplimitOptions;
use crate::stats::{color_report, RunStats};

use qb_uplimit::{ClientBuilder, Config, Limiter, Outcome, Report};

// Pause between torrents to go easy on the Web UI
const THROTTLE: Duration = Duration::from_millis(10);

/// A C-like enum that can be cast to `i32` and used as process exit code.
enum ExitCode {
    Success = 0,
    // NOTE: exit code 1 is also used for any `Result::Err` bubbled up to `main()`
    // using the `?` operator (e.g. the torrent list cannot be fetched).
    SetupFailure = 1,
    TorrentFailure = 2,
}

fn main() -> Result<()> {
    pretty_env_logger::init();
    // std::process::exit doesn't guarantee that all destructors will be ran,
    // therefore we wrap "main" code in another function to guarantee that.
    let exit_code = run_main()?;
    std::process::exit(exit_code);
}

fn run_main() -> Result<i32> {
    let opts = UplimitOptions::from_args();

    status(format!(
        "Reading configuration from {} ...",
        opts.config_file.display()
    ));
    let config = match Config::load_from_file(&opts.config_file) {
        Ok(config) => config,
        Err(e) => {
            failure(&e);
            return Ok(ExitCode::SetupFailure as i32);
        }
    };
    status(format!(
        "Configuration loaded, {} tracker domain(s) limited",
        config.upload_limit.len()
    ));

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(run(&config, opts.no_progress))
}

fn status<S: AsRef<str>>(msg: S) {
    println!("{} {}", style("[+]").green().bold(), msg.as_ref());
}

fn failure<E: std::fmt::Display>(e: &E) {
    eprintln!("{} {}", style("[!]").red().bold(), style(e).red());
}

fn show_progress(progress_bar: &Option<ProgressBar>, report: &Report) {
    let loud = matches!(report.outcome, Outcome::Applied { .. } | Outcome::Failed(_));
    if let Some(pb) = progress_bar {
        pb.inc(1);
        // regular println! interferes with progress bar
        if loud {
            pb.println(color_report(report));
        }
    } else if loud {
        println!("{}", color_report(report));
    }
}

async fn run(config: &Config, no_progress: bool) -> Result<i32> {
    let login = &config.login;
    let client = match ClientBuilder::default()
        .host(login.host.clone())
        .port(login.port)
        .build()
    {
        Ok(client) => client,
        Err(e) => {
            failure(&e);
            return Ok(ExitCode::SetupFailure as i32);
        }
    };

    status(format!("Logging in to {} ...", client.base_url()));
    if let Err(e) = client.login(&login.username, &login.password).await {
        failure(&e);
        return Ok(ExitCode::SetupFailure as i32);
    }

    status(format!("qBittorrent: {}", client.app_version().await?));
    status(format!(
        "qBittorrent Web API: {}",
        client.webapi_version().await?
    ));

    let torrents = client.torrents().await?;
    status(format!("Found {} torrent(s), processing ...", torrents.len()));

    let pb = match no_progress {
        true => None,
        false => {
            let bar = ProgressBar::new(torrents.len() as u64).with_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} {pos}/{len:.dim} [{elapsed_precise}] {bar:25.cyan/blue} {wide_msg}")
                    .progress_chars("#>-"),
            );
            bar.enable_steady_tick(100);
            Some(bar)
        }
    };

    let limiter = Limiter::new(&config.upload_limit);
    let mut stats = RunStats::new();
    for torrent in torrents {
        if let Some(pb) = &pb {
            pb.set_message(&torrent.name);
        }
        let report = limiter.check(&client, torrent).await;
        show_progress(&pb, &report);
        stats.add(report);
        tokio::time::sleep(THROTTLE).await;
    }

    // Note that print statements may interfere with the progress bar, so this
    // must go before printing the stats
    if let Some(pb) = &pb {
        pb.finish_and_clear();
    }

    println!("\n{}", stats);
    status("Done.");

    if let Err(e) = client.logout().await {
        warn!("Logout failed: {}", e);
    }

    match stats.is_success() {
        true => Ok(ExitCode::Success as i32),
        false => Ok(ExitCode::TorrentFailure as i32),
    }
}
