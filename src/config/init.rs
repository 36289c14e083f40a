// ABOUTME: Config scaffolding for new hosts.
// ABOUTME: Writes a commented lxd-image.yml template.

use std::path::Path;

use crate::error::{Error, Result};

use super::CONFIG_FILENAME;

pub fn init_config(dir: &Path, force: bool) -> Result<()> {
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() && !force {
        return Err(Error::AlreadyExists(config_path));
    }

    std::fs::write(&config_path, TEMPLATE)?;

    Ok(())
}

const TEMPLATE: &str = r#"# Cached images live in <instances_path>/_base
instances_path: /var/lib/nova/instances

# Serialize concurrent fetches of the same image name in this process
serialize_per_image: false

lxd:
  # Autodetected when omitted ($LXD_DIR, snap, then native package)
  # socket: /var/snap/lxd/common/lxd/unix.socket
  operation_timeout: 5m

image_service:
  endpoint: http://controller:9292
  token:
    env: OS_AUTH_TOKEN
"#;
