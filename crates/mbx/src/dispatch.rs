//! Command dispatch module for routing CLI commands to their handlers.
//!
//! This module provides trait-based dispatch for CLI commands, replacing
//! the large match statement in main.rs with a more maintainable structure.

use crate::cli::{Cli, Commands, ConfigCommands};
use crate::commands::config::Config;
use crate::commands::{self, CommandContext, CommandError, Result};

/// Trait for commands that can be executed without account credentials.
pub trait NoAuthCommand {
    /// Execute the command without requiring a password.
    fn execute(&self, ctx: &CommandContext) -> Result<()>;
}

/// Trait for commands that talk to the mail servers.
#[allow(async_fn_in_trait)]
pub trait AuthCommand {
    /// Execute the command with the resolved configuration and password.
    async fn execute(&self, ctx: &CommandContext, config: &Config, password: &str) -> Result<()>;
}

/// Commands that don't require credentials.
pub enum NoAuthDispatch<'a> {
    Explain { filter: &'a str },
    Config(&'a Option<ConfigCommands>),
    Completions(&'a crate::cli::Shell),
    Help,
}

impl<'a> NoAuthDispatch<'a> {
    /// Try to create a no-auth dispatch from the CLI command.
    /// Returns None if the command requires credentials.
    pub fn try_from_cli(cli: &'a Cli) -> Option<Self> {
        match &cli.command {
            Some(Commands::Explain { filter }) => Some(Self::Explain { filter }),
            Some(Commands::Config { command }) => Some(Self::Config(command)),
            Some(Commands::Completions { shell }) => Some(Self::Completions(shell)),
            None => Some(Self::Help),
            _ => None,
        }
    }
}

impl NoAuthCommand for NoAuthDispatch<'_> {
    fn execute(&self, ctx: &CommandContext) -> Result<()> {
        match self {
            Self::Explain { filter } => commands::explain::execute(ctx, filter),
            Self::Config(command) => dispatch_config(ctx, command),
            Self::Completions(shell) => {
                commands::completions::execute(shell).map_err(CommandError::Io)
            }
            Self::Help => {
                if !ctx.quiet {
                    println!("mbx - terminal mail client");
                    println!("Use --help for usage information");
                }
                Ok(())
            }
        }
    }
}

/// Dispatch config subcommands.
fn dispatch_config(ctx: &CommandContext, command: &Option<ConfigCommands>) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::execute_show(ctx),
        Some(ConfigCommands::Set { key, value }) => {
            let opts = commands::config::ConfigSetOptions {
                key: key.clone(),
                value: value.clone(),
            };
            commands::config::execute_set(ctx, &opts)
        }
        Some(ConfigCommands::Path) => commands::config::execute_path(ctx),
        Some(ConfigCommands::Edit) => {
            // Edit is async and handled before dispatch in main.rs
            Err(CommandError::Config("edit requires async context".into()))
        }
    }
}

/// Commands that talk to the mail servers.
pub enum AuthDispatch<'a> {
    Send {
        recipient: &'a str,
        cc: &'a Option<String>,
        bcc: &'a Option<String>,
        subject: &'a str,
        message: &'a Option<String>,
        attachment: &'a Option<String>,
    },
    Read {
        filter: &'a Option<String>,
        limit: &'a str,
        folder: &'a Option<String>,
        from_oldest: bool,
        reverse: bool,
        download: &'a Option<std::path::PathBuf>,
    },
}

impl<'a> AuthDispatch<'a> {
    /// Try to create an auth dispatch from the CLI command.
    pub fn from_cli(cli: &'a Cli) -> Option<Self> {
        match &cli.command {
            Some(Commands::Send {
                recipient,
                cc,
                bcc,
                subject,
                message,
                attachment,
            }) => Some(Self::Send {
                recipient,
                cc,
                bcc,
                subject,
                message,
                attachment,
            }),
            Some(Commands::Read {
                filter,
                limit,
                folder,
                from_oldest,
                reverse,
                download,
            }) => Some(Self::Read {
                filter,
                limit,
                folder,
                from_oldest: *from_oldest,
                reverse: *reverse,
                download,
            }),
            _ => None,
        }
    }
}

impl AuthCommand for AuthDispatch<'_> {
    async fn execute(&self, ctx: &CommandContext, config: &Config, password: &str) -> Result<()> {
        match self {
            Self::Send {
                recipient,
                cc,
                bcc,
                subject,
                message,
                attachment,
            } => {
                let opts = commands::send::SendOptions {
                    recipient: (*recipient).to_string(),
                    cc: (*cc).clone(),
                    bcc: (*bcc).clone(),
                    subject: (*subject).to_string(),
                    message: (*message).clone(),
                    attachment: (*attachment).clone(),
                };
                commands::send::execute(ctx, config, password, &opts).await
            }

            Self::Read {
                filter,
                limit,
                folder,
                from_oldest,
                reverse,
                download,
            } => {
                let opts = commands::read::ReadOptions {
                    filter: (*filter).clone(),
                    limit: (*limit).to_string(),
                    folder: (*folder).clone(),
                    from_oldest: *from_oldest,
                    reverse: *reverse,
                    download: (*download).clone(),
                };
                commands::read::execute(ctx, config, password, &opts).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_explain_dispatches_without_auth() {
        let cli = Cli::parse_from(["mbx", "explain", "-f", "subject:hi"]);
        assert!(NoAuthDispatch::try_from_cli(&cli).is_some());
        assert!(AuthDispatch::from_cli(&cli).is_none());
    }

    #[test]
    fn test_read_requires_auth() {
        let cli = Cli::parse_from(["mbx", "read"]);
        assert!(NoAuthDispatch::try_from_cli(&cli).is_none());
        assert!(AuthDispatch::from_cli(&cli).is_some());
    }

    #[test]
    fn test_every_command_has_exactly_one_dispatch() {
        let invocations: &[&[&str]] = &[
            &["mbx"],
            &["mbx", "send", "-r", "a@x.com", "-s", "hi"],
            &["mbx", "read"],
            &["mbx", "explain", "-f", "subject:hi"],
            &["mbx", "config"],
            &["mbx", "config", "show"],
            &["mbx", "completions", "bash"],
        ];
        for args in invocations {
            let cli = Cli::parse_from(*args);
            let no_auth = NoAuthDispatch::try_from_cli(&cli).is_some();
            let auth = AuthDispatch::from_cli(&cli).is_some();
            assert!(no_auth != auth, "ambiguous dispatch for {args:?}");
        }
    }

    #[test]
    fn test_no_command_is_help() {
        let cli = Cli::parse_from(["mbx"]);
        assert!(matches!(
            NoAuthDispatch::try_from_cli(&cli),
            Some(NoAuthDispatch::Help)
        ));
    }
}
