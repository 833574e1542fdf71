//! Configuration and root folder resolution

use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// Root folder resolution priority order:
/// 1. Command-line argument (highest priority)
/// 2. TALLY_ROOT_FOLDER environment variable
/// 3. `root_folder` key in the TOML config file
/// 4. OS-dependent compiled default (fallback)
pub fn resolve_root_folder(cli_arg: Option<&str>) -> PathBuf {
    if let Some(path) = cli_arg {
        return PathBuf::from(path);
    }

    if let Ok(path) = std::env::var("TALLY_ROOT_FOLDER") {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }

    if let Ok(config_path) = locate_config_file() {
        if let Ok(toml_content) = std::fs::read_to_string(&config_path) {
            if let Ok(config) = toml_content.parse::<toml::Value>() {
                if let Some(root_folder) = config.get("root_folder").and_then(|v| v.as_str()) {
                    return PathBuf::from(root_folder);
                }
            }
        }
    }

    default_root_folder()
}

/// Database file location under the root folder
pub fn database_path(root_folder: &Path) -> PathBuf {
    root_folder.join("tally.db")
}

/// Create the root folder if it does not exist yet
pub fn ensure_root_folder(root_folder: &Path) -> Result<()> {
    std::fs::create_dir_all(root_folder)?;
    Ok(())
}

/// Find the config file to read.
///
/// TALLY_CONFIG overrides the search; otherwise the per-user config dir
/// is tried first, then the system-wide path.
fn locate_config_file() -> Result<PathBuf> {
    if let Ok(path) = std::env::var("TALLY_CONFIG") {
        let path = PathBuf::from(path);
        if path.exists() {
            return Ok(path);
        }
        return Err(Error::Config(format!(
            "Config file not found: {}",
            path.display()
        )));
    }

    if let Some(user_config) = dirs::config_dir().map(|d| d.join("tally").join("config.toml")) {
        if user_config.exists() {
            return Ok(user_config);
        }
    }

    let system_config = PathBuf::from("/etc/tally/config.toml");
    if system_config.exists() {
        return Ok(system_config);
    }

    Err(Error::Config("No config file found".to_string()))
}

fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("tally"))
        .unwrap_or_else(|| PathBuf::from("./tally_data"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;

    fn clear_env() {
        std::env::remove_var("TALLY_ROOT_FOLDER");
        std::env::remove_var("TALLY_CONFIG");
    }

    #[test]
    #[serial]
    fn cli_argument_wins() {
        clear_env();
        std::env::set_var("TALLY_ROOT_FOLDER", "/tmp/from-env");

        let resolved = resolve_root_folder(Some("/tmp/from-cli"));
        assert_eq!(resolved, PathBuf::from("/tmp/from-cli"));

        clear_env();
    }

    #[test]
    #[serial]
    fn env_variable_used_when_no_cli_arg() {
        clear_env();
        std::env::set_var("TALLY_ROOT_FOLDER", "/tmp/from-env");

        let resolved = resolve_root_folder(None);
        assert_eq!(resolved, PathBuf::from("/tmp/from-env"));

        clear_env();
    }

    #[test]
    #[serial]
    fn config_file_used_when_no_env() {
        clear_env();

        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "root_folder = \"/tmp/from-config\"").unwrap();

        std::env::set_var("TALLY_CONFIG", &config_path);

        let resolved = resolve_root_folder(None);
        assert_eq!(resolved, PathBuf::from("/tmp/from-config"));

        clear_env();
    }

    #[test]
    #[serial]
    fn falls_back_to_default() {
        clear_env();
        std::env::set_var("TALLY_CONFIG", "/nonexistent/tally-config.toml");

        let resolved = resolve_root_folder(None);
        assert_eq!(resolved, default_root_folder());

        clear_env();
    }

    #[test]
    fn database_path_is_under_root() {
        let path = database_path(Path::new("/data/tally"));
        assert_eq!(path, PathBuf::from("/data/tally/tally.db"));
    }
}
