//! Config command implementation.
//!
//! View and manage configuration settings.
//! Config file is located at ~/.config/mbx/config.toml.

use std::env;
use std::fs;
use std::path::PathBuf;

use tokio::process::Command;

use directories::BaseDirs;
use serde::{Deserialize, Serialize};

use super::{CommandContext, CommandError, Result};

/// Current config file version. Increment when making breaking changes to schema.
const CONFIG_VERSION: u32 = 1;

/// Minimum password length to apply masking (show first and last N characters).
const PASSWORD_MASK_MIN_LENGTH: usize = 8;

/// Number of characters to show at start/end of a masked password.
const PASSWORD_MASK_VISIBLE_CHARS: usize = 2;

/// Default config file contents.
const DEFAULT_CONFIG: &str = r#"# mbx - mail client configuration

# Config schema version (do not modify)
version = 1

[account]
# username = "you"             # local part of your address
# domain = "example.com"
# sender_name = "Your Name"

# Password storage method: "config", "keyring", or "env"
# password_storage = "keyring"
# password = "..."             # only with password_storage = "config"

[imap]
# host = "imap.example.com"
# port = 993
# folder = "INBOX"

[smtp]
# host = "smtp.example.com"
# port = 587

[read]
# noop_interval_secs = 20      # keep-alive ping while paging
"#;

/// Configuration file structure.
#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    /// Config schema version for migrations.
    #[serde(default = "default_version")]
    pub version: u32,

    /// Account identity.
    #[serde(default)]
    pub account: AccountConfig,

    /// IMAP store settings.
    #[serde(default)]
    pub imap: ImapConfig,

    /// SMTP transport settings.
    #[serde(default)]
    pub smtp: SmtpSection,

    /// Read command settings.
    #[serde(default)]
    pub read: ReadConfig,
}

fn default_version() -> u32 {
    CONFIG_VERSION
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            account: AccountConfig::default(),
            imap: ImapConfig::default(),
            smtp: SmtpSection::default(),
            read: ReadConfig::default(),
        }
    }
}

/// Account identity configuration.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct AccountConfig {
    /// Local part of the account address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// Domain part of the account address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,

    /// Display name used in the From header.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_name: Option<String>,

    /// Account password (only with `password_storage = "config"`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Password storage method.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_storage: Option<String>,
}

impl AccountConfig {
    /// Returns the full account address, `username@domain`.
    pub fn address(&self) -> Result<String> {
        match (&self.username, &self.domain) {
            (Some(username), Some(domain)) => Ok(format!("{username}@{domain}")),
            _ => Err(CommandError::Config(
                "account.username and account.domain must be set (see 'mbx config edit')"
                    .to_string(),
            )),
        }
    }
}

/// IMAP store configuration.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ImapConfig {
    /// Store host name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    /// Store port, defaults to 993.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    /// Default folder, defaults to INBOX.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,
}

impl ImapConfig {
    pub fn port(&self) -> u16 {
        self.port.unwrap_or(993)
    }

    pub fn require_host(&self) -> Result<&str> {
        self.host.as_deref().ok_or_else(|| {
            CommandError::Config("imap.host must be set (see 'mbx config edit')".to_string())
        })
    }
}

/// SMTP transport configuration.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SmtpSection {
    /// Transport host name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    /// Transport port, defaults to 587.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

impl SmtpSection {
    pub fn port(&self) -> u16 {
        self.port.unwrap_or(587)
    }

    pub fn require_host(&self) -> Result<&str> {
        self.host.as_deref().ok_or_else(|| {
            CommandError::Config("smtp.host must be set (see 'mbx config edit')".to_string())
        })
    }
}

/// Read command configuration.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ReadConfig {
    /// Keep-alive ping interval while paging, in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub noop_interval_secs: Option<u64>,
}

impl ReadConfig {
    pub fn noop_interval_secs(&self) -> u64 {
        self.noop_interval_secs.unwrap_or(20)
    }
}

/// Gets the config directory path.
/// Uses XDG-style paths: ~/.config/mbx/ on all platforms.
fn get_config_dir() -> Result<PathBuf> {
    // Check for override env var first
    if let Ok(path) = env::var("MBX_CONFIG") {
        let path = PathBuf::from(path);
        if let Some(parent) = path.parent() {
            return Ok(parent.to_path_buf());
        }
    }

    if let Ok(xdg_config) = env::var("XDG_CONFIG_HOME") {
        return Ok(PathBuf::from(xdg_config).join("mbx"));
    }

    BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(".config").join("mbx"))
        .ok_or_else(|| CommandError::Config("Could not determine config directory".to_string()))
}

/// Gets the config file path.
pub fn get_config_path() -> Result<PathBuf> {
    if let Ok(path) = env::var("MBX_CONFIG") {
        return Ok(PathBuf::from(path));
    }

    let config_dir = get_config_dir()?;
    Ok(config_dir.join("config.toml"))
}

/// Loads the configuration from disk.
pub fn load_config() -> Result<Config> {
    let path = get_config_path()?;

    if !path.exists() {
        return Ok(Config::default());
    }

    let content = fs::read_to_string(&path)
        .map_err(|e| CommandError::Config(format!("Failed to read config: {}", e)))?;

    let mut config: Config = toml::from_str(&content)
        .map_err(|e| CommandError::Config(format!("Failed to parse config: {}", e)))?;

    config.version = CONFIG_VERSION;
    Ok(config)
}

/// Saves the configuration to disk.
fn save_config(config: &Config) -> Result<()> {
    let path = get_config_path()?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| CommandError::Config(format!("Failed to create config directory: {}", e)))?;
    }

    let content = toml::to_string_pretty(config)
        .map_err(|e| CommandError::Config(format!("Failed to serialize config: {}", e)))?;

    fs::write(&path, content)
        .map_err(|e| CommandError::Config(format!("Failed to write config: {}", e)))?;

    Ok(())
}

/// Executes the config show command.
pub fn execute_show(ctx: &CommandContext) -> Result<()> {
    let config = load_config()?;
    let path = get_config_path()?;

    if ctx.json_output {
        let mut masked = config;
        masked.account.password = masked.account.password.map(|p| mask_password(&p));
        let output = serde_json::json!({
            "path": path.display().to_string(),
            "exists": path.exists(),
            "config": masked,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        use owo_colors::OwoColorize;

        let header = "Configuration";
        if ctx.use_colors {
            println!("{}\n", header.green().bold());
        } else {
            println!("{}\n", header);
        }

        println!("File: {}", path.display());
        println!("Exists: {}\n", path.exists());

        if path.exists() {
            println!("[account]");
            if let Some(ref username) = config.account.username {
                println!("  username: {}", username);
            }
            if let Some(ref domain) = config.account.domain {
                println!("  domain: {}", domain);
            }
            if let Some(ref name) = config.account.sender_name {
                println!("  sender_name: {}", name);
            }
            if let Some(ref storage) = config.account.password_storage {
                println!("  password_storage: {}", storage);
            }
            if let Some(ref password) = config.account.password {
                println!("  password: {}", mask_password(password));
            }

            println!("\n[imap]");
            if let Some(ref host) = config.imap.host {
                println!("  host: {}", host);
            }
            println!("  port: {}", config.imap.port());
            if let Some(ref folder) = config.imap.folder {
                println!("  folder: {}", folder);
            }

            println!("\n[smtp]");
            if let Some(ref host) = config.smtp.host {
                println!("  host: {}", host);
            }
            println!("  port: {}", config.smtp.port());

            println!("\n[read]");
            println!("  noop_interval_secs: {}", config.read.noop_interval_secs());
        } else {
            println!("(No config file exists. Run 'mbx config edit' to create one.)");
        }
    }

    Ok(())
}

/// Executes the config edit command.
pub async fn execute_edit(ctx: &CommandContext) -> Result<()> {
    let path = get_config_path()?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| CommandError::Config(format!("Failed to create config directory: {}", e)))?;
    }

    if !path.exists() {
        fs::write(&path, DEFAULT_CONFIG)
            .map_err(|e| CommandError::Config(format!("Failed to create config file: {}", e)))?;

        if !ctx.quiet && !ctx.json_output {
            eprintln!("Created default config at: {}", path.display());
        }
    }

    let editor = env::var("EDITOR")
        .or_else(|_| env::var("VISUAL"))
        .unwrap_or_else(|_| "vi".to_string());

    if ctx.verbose {
        eprintln!("Opening {} with {}", path.display(), editor);
    }

    // Async to avoid blocking the tokio runtime
    let status = Command::new(&editor)
        .arg(&path)
        .status()
        .await
        .map_err(|e| CommandError::Config(format!("Failed to open editor '{}': {}", editor, e)))?;

    if ctx.json_output {
        let output = serde_json::json!({
            "status": if status.success() { "success" } else { "error" },
            "editor": editor,
            "path": path.display().to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        if status.success() {
            println!("Config saved.");
        } else {
            eprintln!("Editor exited with error");
        }
    }

    Ok(())
}

/// Options for the config set command.
pub struct ConfigSetOptions {
    /// Configuration key.
    pub key: String,
    /// Configuration value.
    pub value: String,
}

/// Executes the config set command.
pub fn execute_set(ctx: &CommandContext, opts: &ConfigSetOptions) -> Result<()> {
    let mut config = load_config()?;
    let path = get_config_path()?;

    apply_set(&mut config, &opts.key, &opts.value)?;

    // With keyring storage, passwords go to the OS keyring, not the file
    if opts.key == "account.password"
        && config.account.password_storage.as_deref() == Some("keyring")
    {
        super::keyring::store_password(&opts.value)?;
        config.account.password = None;
        if !ctx.quiet && !ctx.json_output {
            eprintln!("Password stored in the OS keyring");
        }
    }

    save_config(&config)?;

    if ctx.json_output {
        let output = serde_json::json!({
            "status": "success",
            "key": opts.key,
            "value": opts.value,
            "path": path.display().to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        println!("Set {} = {}", opts.key, opts.value);
    }

    Ok(())
}

/// Applies one key/value pair to a config.
fn apply_set(config: &mut Config, key: &str, value: &str) -> Result<()> {
    let (section, field) = key
        .split_once('.')
        .ok_or_else(|| unknown_key(key))?;

    match (section, field) {
        ("account", "username") => config.account.username = Some(value.to_string()),
        ("account", "domain") => config.account.domain = Some(value.to_string()),
        ("account", "sender_name") => config.account.sender_name = Some(value.to_string()),
        ("account", "password") => config.account.password = Some(value.to_string()),
        ("account", "password_storage") => {
            let valid = ["config", "keyring", "env"];
            if !valid.contains(&value) {
                return Err(CommandError::Config(format!(
                    "Invalid password_storage value '{}'. Valid values: {}",
                    value,
                    valid.join(", ")
                )));
            }
            config.account.password_storage = Some(value.to_string());
        }
        ("imap", "host") => config.imap.host = Some(value.to_string()),
        ("imap", "port") => config.imap.port = Some(parse_port(value)?),
        ("imap", "folder") => config.imap.folder = Some(value.to_string()),
        ("smtp", "host") => config.smtp.host = Some(value.to_string()),
        ("smtp", "port") => config.smtp.port = Some(parse_port(value)?),
        ("read", "noop_interval_secs") => {
            config.read.noop_interval_secs = Some(value.parse().map_err(|_| {
                CommandError::Config(format!("Invalid interval value '{}'", value))
            })?);
        }
        _ => return Err(unknown_key(key)),
    }

    Ok(())
}

fn unknown_key(key: &str) -> CommandError {
    CommandError::Config(format!(
        "Unknown config key '{}'. Valid keys: account.username, account.domain, \
         account.sender_name, account.password, account.password_storage, imap.host, \
         imap.port, imap.folder, smtp.host, smtp.port, read.noop_interval_secs",
        key
    ))
}

/// Executes the config path command.
pub fn execute_path(ctx: &CommandContext) -> Result<()> {
    let path = get_config_path()?;

    if ctx.json_output {
        let output = serde_json::json!({
            "path": path.display().to_string(),
            "exists": path.exists(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", path.display());
    }

    Ok(())
}

/// Masks a password for display, showing only the first and last N characters.
fn mask_password(password: &str) -> String {
    let char_count = password.chars().count();
    if char_count > PASSWORD_MASK_MIN_LENGTH {
        let prefix: String = password.chars().take(PASSWORD_MASK_VISIBLE_CHARS).collect();
        let suffix: String = password
            .chars()
            .skip(char_count - PASSWORD_MASK_VISIBLE_CHARS)
            .collect();
        format!("{}...{}", prefix, suffix)
    } else {
        "****".to_string()
    }
}

fn parse_port(s: &str) -> Result<u16> {
    s.parse()
        .map_err(|_| CommandError::Config(format!("Invalid port value '{}'", s)))
}
