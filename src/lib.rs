/*!
`qb-uplimit` caps the upload rate of qBittorrent torrents per tracker domain.

It logs into the qBittorrent Web UI, looks up the trackers of every torrent,
reduces them to their registrable domain and applies the most restrictive
upload limit configured for any of those domains.

```no_run
use qb_uplimit::{ClientBuilder, Config, Limiter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_from_file("config.toml")?;
    let client = ClientBuilder::default()
        .host(config.login.host.clone())
        .port(config.login.port)
        .build()?;
    client
        .login(&config.login.username, &config.login.password)
        .await?;

    let limiter = Limiter::new(&config.upload_limit);
    for torrent in client.torrents().await? {
        println!("{}", limiter.check(&client, torrent).await);
    }
    client.logout().await?;
    Ok(())
}
```
*/
#[macro_use]
extern crate log;

mod client;
mod config;
mod domain;
mod error;
mod limit;
mod types;

#[cfg(test)]
mod test_utils;

pub use client::{Client, ClientBuilder};
pub use config::{Config, LimitTable, Login, DEFAULT_CONFIG_FILE};
pub use domain::top_domain;
pub use error::{ConfigError, ErrorKind, Result};
pub use limit::{plan, Limit, Limiter, Plan};
pub use types::{Outcome, Report, Torrent, Tracker};
