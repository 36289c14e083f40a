// ABOUTME: Status command implementation.
// ABOUTME: Shows daemon version info and the aliases currently registered.

use lxd_image::config::Config;
use lxd_image::daemon::{AliasOps, DaemonInfo, LxdClient};
use lxd_image::error::Result;
use lxd_image::output::{Output, OutputMode};
use serde::Serialize;

#[derive(Serialize)]
struct StatusReport {
    socket: String,
    version: String,
    api_version: String,
    auth: String,
    storage: String,
    aliases: Vec<String>,
}

pub async fn status(config: &Config, output: &Output) -> Result<()> {
    let daemon = LxdClient::connect(&config.lxd).await?;
    let info = daemon.info().await?;
    let mut aliases = daemon.alias_list().await?;
    aliases.sort();

    let report = StatusReport {
        socket: daemon.socket_path().display().to_string(),
        version: info.version,
        api_version: info.api_version,
        auth: info.auth,
        storage: info.storage,
        aliases,
    };

    let summary = format!(
        "LXD {} (API {}, {}, storage {}) at {}",
        report.version, report.api_version, report.auth, report.storage, report.socket
    );
    output.result(&summary, &report);

    if output.mode() != OutputMode::Json {
        if report.aliases.is_empty() {
            output.progress("No image aliases");
        }
        for alias in &report.aliases {
            println!("  {}", alias);
        }
    }
    Ok(())
}
