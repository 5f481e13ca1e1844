use clap::Parser;
use std::process::ExitCode;

mod cli;
mod commands;
mod dispatch;
mod output;

use cli::Cli;
use commands::config::{load_config, Config};
use commands::{CommandContext, CommandError};
use dispatch::{AuthCommand, AuthDispatch, NoAuthCommand, NoAuthDispatch};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.json {
                let error_json = serde_json::json!({
                    "error": {
                        "code": error_code(&e),
                        "message": e.to_string(),
                    }
                });
                eprintln!("{}", serde_json::to_string_pretty(&error_json).unwrap());
            } else {
                eprintln!("Error: {e}");
            }
            error_exit_code(&e)
        }
    }
}

async fn run(cli: &Cli) -> commands::Result<()> {
    let ctx = CommandContext::from_cli(cli);

    // Special case: config edit spawns the editor and needs the async runtime
    if matches!(
        &cli.command,
        Some(cli::Commands::Config {
            command: Some(cli::ConfigCommands::Edit)
        })
    ) {
        return commands::config::execute_edit(&ctx).await;
    }

    // No-credential commands first (explain, config, completions, help)
    if let Some(dispatch) = NoAuthDispatch::try_from_cli(cli) {
        return dispatch.execute(&ctx);
    }

    // Server commands need the config and a password
    let config = load_config()?;
    let password = resolve_password(cli, &config)?;

    match AuthDispatch::from_cli(cli) {
        Some(dispatch) => dispatch.execute(&ctx, &config, &password).await,
        // the two dispatch enums partition the command set
        None => Ok(()),
    }
}

/// Returns the error code string for JSON output.
fn error_code(e: &CommandError) -> &'static str {
    match e {
        CommandError::Filter(_) => "FILTER_ERROR",
        CommandError::Store(_) => "STORE_ERROR",
        CommandError::Config(_) => "CONFIG_ERROR",
        CommandError::Io(_) => "IO_ERROR",
        CommandError::Json(_) => "JSON_ERROR",
    }
}

/// Returns the exit code for an error.
fn error_exit_code(e: &CommandError) -> ExitCode {
    match e {
        CommandError::Config(_) => ExitCode::from(5),
        CommandError::Filter(_) => ExitCode::from(1),
        CommandError::Store(err) => ExitCode::from(err.exit_code()),
        CommandError::Io(_) => ExitCode::from(3),
        CommandError::Json(_) => ExitCode::from(1),
    }
}

/// Resolves the account password with priority: flag > env > keyring > config.
///
/// The resolution order is:
/// 1. `--password` command line flag (highest priority)
/// 2. `MBX_PASSWORD` environment variable (handled by clap)
/// 3. OS keyring (if `password_storage == "keyring"` in config)
/// 4. Password from config file (`~/.config/mbx/config.toml`)
fn resolve_password_optional(cli: &Cli, config: &Config) -> commands::Result<Option<String>> {
    if let Some(password) = &cli.password {
        return Ok(Some(password.clone()));
    }

    if config.account.password_storage.as_deref() == Some("keyring") {
        if let Some(password) = commands::keyring::get_password()? {
            return Ok(Some(password));
        }
    }

    if let Some(password) = &config.account.password {
        return Ok(Some(password.clone()));
    }

    Ok(None)
}

/// Resolves the account password, failing with guidance when none is set.
fn resolve_password(cli: &Cli, config: &Config) -> commands::Result<String> {
    resolve_password_optional(cli, config)?.ok_or_else(|| {
        CommandError::Config(
            "No password configured. Set MBX_PASSWORD, store one in the keyring, \
             or set account.password (see 'mbx config edit')"
                .to_string(),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use cli::Commands;

    /// Helper to create a test CLI with specified password.
    fn cli_with_password(password: Option<String>) -> Cli {
        Cli {
            verbose: false,
            quiet: false,
            json: false,
            no_color: false,
            password,
            command: Some(Commands::Read {
                filter: None,
                limit: "10".to_string(),
                folder: None,
                from_oldest: false,
                reverse: false,
                download: None,
            }),
        }
    }

    #[test]
    fn test_resolve_password_optional_from_flag() {
        let cli = cli_with_password(Some("flag-pass".to_string()));
        let config = Config::default();
        let result = resolve_password_optional(&cli, &config);
        assert_eq!(result.unwrap(), Some("flag-pass".to_string()));
    }

    #[test]
    fn test_resolve_password_optional_from_config() {
        let cli = cli_with_password(None);
        let mut config = Config::default();
        config.account.password = Some("config-pass".to_string());
        let result = resolve_password_optional(&cli, &config);
        assert_eq!(result.unwrap(), Some("config-pass".to_string()));
    }

    #[test]
    fn test_resolve_password_no_password() {
        let cli = cli_with_password(None);
        let config = Config::default();
        let result = resolve_password(&cli, &config);
        assert!(matches!(result, Err(CommandError::Config(_))));
    }

    #[test]
    fn test_error_codes() {
        let err = CommandError::Config("x".to_string());
        assert_eq!(error_code(&err), "CONFIG_ERROR");

        let err = CommandError::Filter(mailbox_filter::FilterError::invalid_expression(""));
        assert_eq!(error_code(&err), "FILTER_ERROR");
    }
}
