use qb_uplimit::DEFAULT_CONFIG_FILE;
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "qb-uplimit",
    about = "Cap qBittorrent upload speed per tracker domain."
)]
pub(crate) struct UplimitOptions {
    /// Configuration file with the Web UI login and the `[upload_limit]` table
    #[structopt(name = "config", default_value = DEFAULT_CONFIG_FILE, parse(from_os_str))]
    pub config_file: PathBuf,

    /// Do not show progress bar.
    /// This is recommended for non-interactive shells (e.g. cron jobs)
    #[structopt(short, long)]
    pub no_progress: bool,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_default_config_file() {
        let opts = UplimitOptions::from_iter(&["qb-uplimit"]);
        assert_eq!(opts.config_file, PathBuf::from("config.toml"));
        assert!(!opts.no_progress);
    }

    #[test]
    fn test_config_file_argument() {
        let opts = UplimitOptions::from_iter(&["qb-uplimit", "-n", "/etc/qb/limits.toml"]);
        assert_eq!(opts.config_file, PathBuf::from("/etc/qb/limits.toml"));
        assert!(opts.no_progress);
    }
}
