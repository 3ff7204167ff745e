use std::fs;
use std::path::Path;

use tracing::info;

use crate::cli::commands::InitArgs;
use crate::io::config_io::{self, CONFIG_FILE};

const CONFIG_TEMPLATE: &str = include_str!("../../templates/config.toml");

pub fn cmd_init(args: InitArgs, data_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let config_path = data_dir.join(CONFIG_FILE);

    if config_path.exists() && !args.force {
        return Err(format!(
            "{} already exists (use --force to overwrite)",
            config_path.display()
        )
        .into());
    }

    let store_dir = config_io::store_dir(data_dir);
    fs::create_dir_all(&store_dir)?;
    fs::write(&config_path, CONFIG_TEMPLATE)?;
    info!(path = %config_path.display(), "wrote config template");

    println!("Initialized smartdo in {}", data_dir.display());
    println!("  config: {}", config_path.display());
    println!("  store:  {}", store_dir.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::config::Config;
    use tempfile::TempDir;

    #[test]
    fn template_parses_to_defaults() {
        let config: Config = toml::from_str(CONFIG_TEMPLATE).unwrap();
        assert_eq!(config.log.level, "warn");
        assert_eq!(config.store.lock_timeout_ms, 5000);
        assert!(config.ui.show_key_hints);
        assert!(config.ui.tag_colors.is_empty());
    }

    #[test]
    fn init_writes_config_and_store_dir() {
        let tmp = TempDir::new().unwrap();
        cmd_init(InitArgs { force: false }, tmp.path()).unwrap();
        assert!(tmp.path().join(CONFIG_FILE).is_file());
        assert!(config_io::store_dir(tmp.path()).is_dir());
    }

    #[test]
    fn init_refuses_to_overwrite_without_force() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "[log]\nlevel = \"debug\"\n").unwrap();
        assert!(cmd_init(InitArgs { force: false }, tmp.path()).is_err());
        let kept = fs::read_to_string(tmp.path().join(CONFIG_FILE)).unwrap();
        assert!(kept.contains("debug"));

        cmd_init(InitArgs { force: true }, tmp.path()).unwrap();
        let replaced = fs::read_to_string(tmp.path().join(CONFIG_FILE)).unwrap();
        assert!(replaced.starts_with("# smartdo settings"));
    }
}
