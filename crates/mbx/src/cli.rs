//! CLI argument parsing using clap derive macros.
//!
//! This module defines the command-line interface for the mbx mail client.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// mbx - a terminal mail client with a filter expression language
#[derive(Parser, Debug)]
#[command(name = "mbx")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbose output (show debug information)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Force JSON output
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colors in output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Override account password (default: from keyring/config)
    #[arg(long, global = true, env = "MBX_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Send a message
    #[command(alias = "s")]
    Send {
        /// Recipient address list, comma-separated
        #[arg(short, long)]
        recipient: String,

        /// Carbon-copy address list, comma-separated
        #[arg(long)]
        cc: Option<String>,

        /// Blind-carbon-copy address list, comma-separated
        #[arg(long)]
        bcc: Option<String>,

        /// Message subject
        #[arg(short, long)]
        subject: String,

        /// Message body: literal text, or a path to a file whose contents
        /// become the body. Omitted: a random quote is sent instead.
        #[arg(short, long)]
        message: Option<String>,

        /// Attachment paths, comma-separated
        #[arg(short, long)]
        attachment: Option<String>,
    },

    /// Read messages from a folder
    #[command(alias = "r")]
    Read {
        /// Filter expression (e.g. "subject:hello+flag:!seen")
        #[arg(short, long)]
        filter: Option<String>,

        /// Number of messages to show, or "all"
        #[arg(short, long, default_value = "10")]
        limit: String,

        /// Folder to read (default: imap.folder from config, then INBOX)
        #[arg(long)]
        folder: Option<String>,

        /// Take the window from the oldest messages instead of the latest
        #[arg(short = 'o', long)]
        from_oldest: bool,

        /// Reverse the display order
        #[arg(short = 'i', long)]
        reverse: bool,

        /// Save attachments under this directory
        #[arg(
            short = 'd',
            long,
            num_args = 0..=1,
            default_missing_value = "attachments"
        )]
        download: Option<PathBuf>,
    },

    /// Explain what a filter expression matches
    #[command(alias = "e")]
    Explain {
        /// Filter expression to explain
        #[arg(short, long)]
        filter: String,
    },

    /// View and manage configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (e.g. "account.username", "imap.host")
        key: String,
        /// Value to set
        value: String,
    },
    /// Print the config file path
    Path,
    /// Open the config file in $EDITOR
    Edit,
}

/// Supported shells for completions
#[derive(ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn test_parse_send() {
        let cli = Cli::parse_from([
            "mbx", "send", "-r", "a@x.com,b@x.com", "-s", "hello", "-m", "body text",
        ]);
        let Some(Commands::Send {
            recipient,
            cc,
            bcc,
            subject,
            message,
            attachment,
        }) = cli.command
        else {
            panic!("expected send command");
        };
        assert_eq!(recipient, "a@x.com,b@x.com");
        assert_eq!(subject, "hello");
        assert_eq!(message.as_deref(), Some("body text"));
        assert!(cc.is_none());
        assert!(bcc.is_none());
        assert!(attachment.is_none());
    }

    #[test]
    fn test_parse_send_alias_with_lists() {
        let cli = Cli::parse_from([
            "mbx",
            "s",
            "-r",
            "a@x.com",
            "--cc",
            "c@x.com",
            "--bcc",
            "d@x.com",
            "-s",
            "subj",
            "-a",
            "one.pdf,two.txt",
        ]);
        let Some(Commands::Send {
            cc,
            bcc,
            attachment,
            message,
            ..
        }) = cli.command
        else {
            panic!("expected send command");
        };
        assert_eq!(cc.as_deref(), Some("c@x.com"));
        assert_eq!(bcc.as_deref(), Some("d@x.com"));
        assert_eq!(attachment.as_deref(), Some("one.pdf,two.txt"));
        assert!(message.is_none());
    }

    #[test]
    fn test_parse_read_defaults() {
        let cli = Cli::parse_from(["mbx", "read"]);
        let Some(Commands::Read {
            filter,
            limit,
            folder,
            from_oldest,
            reverse,
            download,
        }) = cli.command
        else {
            panic!("expected read command");
        };
        assert!(filter.is_none());
        assert_eq!(limit, "10");
        assert!(folder.is_none());
        assert!(!from_oldest);
        assert!(!reverse);
        assert!(download.is_none());
    }

    #[test]
    fn test_parse_read_with_filter_and_download() {
        let cli = Cli::parse_from([
            "mbx", "r", "-f", "flag:!seen", "-l", "all", "-o", "-i", "-d",
        ]);
        let Some(Commands::Read {
            filter,
            limit,
            from_oldest,
            reverse,
            download,
            ..
        }) = cli.command
        else {
            panic!("expected read command");
        };
        assert_eq!(filter.as_deref(), Some("flag:!seen"));
        assert_eq!(limit, "all");
        assert!(from_oldest);
        assert!(reverse);
        assert_eq!(download, Some(PathBuf::from("attachments")));
    }

    #[test]
    fn test_parse_explain() {
        let cli = Cli::parse_from(["mbx", "explain", "-f", "subject:hi"]);
        let Some(Commands::Explain { filter }) = cli.command else {
            panic!("expected explain command");
        };
        assert_eq!(filter, "subject:hi");
    }

    #[test]
    fn test_parse_config_set() {
        let cli = Cli::parse_from(["mbx", "config", "set", "imap.host", "imap.example.com"]);
        let Some(Commands::Config {
            command: Some(ConfigCommands::Set { key, value }),
        }) = cli.command
        else {
            panic!("expected config set");
        };
        assert_eq!(key, "imap.host");
        assert_eq!(value, "imap.example.com");
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        let result = Cli::try_parse_from(["mbx", "-v", "-q", "read"]);
        assert!(result.is_err());
    }
}
