use crate::error::RenamerError;
use crate::naming::find_reserved_char;
use crate::Result;
use configparser::ini::Ini;
use std::path::{Path, PathBuf};

const SECTION: &str = "file-renamer";

#[derive(Debug, Clone)]
pub struct Config {
    pub backup_dir_name: String,
    pub counter_start: u64,
    pub confirm_threshold: usize,
    pub preview_count: usize,
    pub preserve_permissions: bool,
    pub check_space: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            backup_dir_name: "FileRenamerBackup".to_string(),
            counter_start: 1,
            confirm_threshold: 50,
            preview_count: 5,
            preserve_permissions: true,
            check_space: true,
        }
    }
}

/// Get default configuration
pub fn default_config() -> Config {
    Config::default()
}

/// Load configuration from the user's config file, falling back to defaults
pub fn load_config() -> Result<Config> {
    let config_path = get_config_path()?;

    if !config_path.exists() {
        log::debug!(
            "no config file at {}, using defaults",
            config_path.display()
        );
        return Ok(default_config());
    }

    load_config_from(&config_path)
}

/// Load configuration from an explicit INI file
pub fn load_config_from(path: &Path) -> Result<Config> {
    let mut conf = Ini::new();
    conf.load(path)
        .map_err(|e| RenamerError::config(format!("Failed to parse config file: {e}")))?;

    let mut config = default_config();

    if let Some(value) = conf.get(SECTION, "backup_dir_name") {
        let value = value.trim().to_string();
        if value.is_empty() {
            return Err(RenamerError::config("backup_dir_name must not be empty"));
        }
        if let Some(ch) = find_reserved_char(&value) {
            return Err(RenamerError::config(format!(
                "backup_dir_name contains reserved character: {ch}"
            )));
        }
        config.backup_dir_name = value;
    }

    if let Some(value) = conf.get(SECTION, "preserve_permissions") {
        config.preserve_permissions = parse_bool(&value).unwrap_or(config.preserve_permissions);
    }
    if let Some(value) = conf.get(SECTION, "check_space") {
        config.check_space = parse_bool(&value).unwrap_or(config.check_space);
    }

    if let Some(value) = conf.get(SECTION, "counter_start") {
        config.counter_start = value
            .parse()
            .map_err(|_| RenamerError::config(format!("Invalid counter_start: {value}")))?;
    }
    if let Some(value) = conf.get(SECTION, "confirm_threshold") {
        config.confirm_threshold = value
            .parse()
            .map_err(|_| RenamerError::config(format!("Invalid confirm_threshold: {value}")))?;
    }
    if let Some(value) = conf.get(SECTION, "preview_count") {
        config.preview_count = value
            .parse()
            .map_err(|_| RenamerError::config(format!("Invalid preview_count: {value}")))?;
    }

    log::debug!("loaded config from {}", path.display());
    Ok(config)
}

/// Get the configuration file path for the current platform
fn get_config_path() -> Result<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return Ok(PathBuf::from(appdata).join(SECTION).join("config.ini"));
        }
    }

    if let Some(config_dir) = std::env::var_os("XDG_CONFIG_HOME") {
        Ok(PathBuf::from(config_dir).join(SECTION).join("config.ini"))
    } else if let Some(home) = std::env::var_os("HOME") {
        Ok(PathBuf::from(home)
            .join(".config")
            .join(SECTION)
            .join("config.ini"))
    } else {
        Err(RenamerError::config("Could not determine config directory"))
    }
}

/// Parse a boolean value from INI string
fn parse_bool(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Some(true),
        "false" | "no" | "0" | "off" => Some(false),
        _ => None,
    }
}

/// Create a sample configuration file
pub fn create_sample_config() -> String {
    r#"[file-renamer]
# Name of the backup folder created inside the chosen directory
backup_dir_name = FileRenamerBackup

# First value of the numeric suffix
counter_start = 1

# Ask a second time when the directory has more entries than this
confirm_threshold = 50

# Number of names shown before asking for confirmation
preview_count = 5

# Copy file permissions onto each backup (true/false)
preserve_permissions = true

# Warn when free space looks too small for the backups (true/false)
check_space = true
"#
    .to_string()
}

/// Display the current configuration in a user-friendly format
pub fn dump_config(config: &Config) -> Result<()> {
    let config_path = get_config_path()?;

    println!("file-renamer Configuration");
    println!("==========================");
    println!();

    if config_path.exists() {
        println!("Config file: {} (found)", config_path.display());
    } else {
        println!(
            "Config file: {} (not found, using defaults)",
            config_path.display()
        );
    }
    println!();

    println!("Current Settings:");
    println!("----------------");
    println!("backup_dir_name      = {}", config.backup_dir_name);
    println!("counter_start        = {}", config.counter_start);
    println!("confirm_threshold    = {}", config.confirm_threshold);
    println!("preview_count        = {}", config.preview_count);
    println!("preserve_permissions = {}", config.preserve_permissions);
    println!("check_space          = {}", config.check_space);
    println!();

    if !config_path.exists() {
        if let Some(parent) = config_path.parent() {
            println!("To create a configuration file:");
            println!("------------------------------");
            println!("1. Create directory: mkdir -p {}", parent.display());
            println!("2. Create config.ini with a [file-renamer] section");
            println!("3. Use 'file-renamer --dump-config' again to verify");
        }
    }

    Ok(())
}
