//! Read command implementation.
//!
//! Connects to the IMAP store, selects messages by filter or folder window,
//! and pages through them. A background keep-alive pings the session while
//! the pager waits for input.

use std::path::{Path, PathBuf};
use std::time::Duration;

use owo_colors::OwoColorize;

use mailbox_filter::{FilterParser, SearchTerm};
use mailbox_store::message::attachment_dir;
use mailbox_store::render::{body_parts, save_attachments};
use mailbox_store::{MailStore, MessageSummary};

use super::config::Config;
use super::{CommandContext, CommandError, Result};
use crate::output;

/// Options for the read command.
pub struct ReadOptions {
    pub filter: Option<String>,
    pub limit: String,
    pub folder: Option<String>,
    pub from_oldest: bool,
    pub reverse: bool,
    pub download: Option<PathBuf>,
}

/// Executes the read command.
pub async fn execute(
    ctx: &CommandContext,
    config: &Config,
    password: &str,
    opts: &ReadOptions,
) -> Result<()> {
    // parse the filter and limit before opening a connection
    let term = match &opts.filter {
        Some(raw) => Some(FilterParser::parse(raw)?),
        None => None,
    };
    let limit = parse_limit(&opts.limit)?;

    let host = config.imap.require_host()?;
    let store = MailStore::connect(
        host,
        config.imap.port(),
        &config.account.address()?,
        password,
    )
    .await?;

    let folder = opts
        .folder
        .as_deref()
        .or(config.imap.folder.as_deref())
        .unwrap_or("INBOX");

    let result = read_messages(ctx, config, &store, term, limit, folder, opts).await;
    // best effort; the read result matters more than the goodbye
    let _ = store.logout().await;
    result
}

async fn read_messages(
    ctx: &CommandContext,
    config: &Config,
    store: &MailStore,
    term: Option<SearchTerm>,
    limit: Option<u32>,
    folder: &str,
    opts: &ReadOptions,
) -> Result<()> {
    let stats = store.examine(folder).await?;
    if !ctx.json_output && !ctx.quiet {
        println!(
            "{}",
            output::format_folder_line(folder, &stats, ctx.use_colors)
        );
    }

    let seqs = match &term {
        Some(term) => store.search(term).await?,
        None => (1..=stats.total).collect(),
    };
    let seqs = select_window(seqs, limit, opts.from_oldest, opts.reverse);

    if seqs.is_empty() {
        if ctx.json_output {
            println!("[]");
        } else if !ctx.quiet {
            println!("No matching messages");
        }
        return Ok(());
    }

    let interval = Duration::from_secs(config.read.noop_interval_secs());

    if ctx.json_output {
        let mut fetched = Vec::with_capacity(seqs.len());
        for seq in seqs {
            let message = store.fetch(seq).await?;
            let summary = MessageSummary::parse(&message)?;
            let parts = body_parts(&message.body)?;
            fetched.push((summary, parts));
        }
        let outputs: Vec<_> = fetched
            .iter()
            .map(|(summary, parts)| output::format_message_json(summary, parts))
            .collect();
        println!("{}", serde_json::to_string_pretty(&outputs)?);
        return Ok(());
    }

    let last = seqs.len() - 1;
    for (index, seq) in seqs.into_iter().enumerate() {
        let message = store.fetch(seq).await?;
        let summary = MessageSummary::parse(&message)?;
        let parts = body_parts(&message.body)?;

        println!("{}", output::format_message(&summary, &parts, ctx.use_colors));

        if let Some(base) = &opts.download {
            download_attachments(ctx, base, &summary, &parts)?;
        }

        if index < last {
            // keep the session warm while the pager waits
            let keepalive = store.keepalive(interval);
            let quit = tokio::task::spawn_blocking(prompt_continue)
                .await
                .map_err(|err| CommandError::Io(std::io::Error::other(err)))??;
            keepalive.stop();
            if quit {
                break;
            }
        }
    }

    Ok(())
}

/// Parses the `--limit` value, where `all` disables the window.
fn parse_limit(raw: &str) -> Result<Option<u32>> {
    if raw.eq_ignore_ascii_case("all") {
        return Ok(None);
    }
    match raw.parse::<u32>() {
        Ok(0) => Err(CommandError::Config(
            "limit must be a positive number or 'all'".to_string(),
        )),
        Ok(n) => Ok(Some(n)),
        Err(_) => Err(CommandError::Config(format!(
            "invalid limit '{raw}': expected a number or 'all'"
        ))),
    }
}

/// Applies the limit window and display order to ascending sequence numbers.
fn select_window(
    mut seqs: Vec<u32>,
    limit: Option<u32>,
    from_oldest: bool,
    reverse: bool,
) -> Vec<u32> {
    if let Some(limit) = limit {
        let limit = limit as usize;
        if seqs.len() > limit {
            if from_oldest {
                seqs.truncate(limit);
            } else {
                seqs.drain(..seqs.len() - limit);
            }
        }
    }
    if reverse {
        seqs.reverse();
    }
    seqs
}

fn download_attachments(
    ctx: &CommandContext,
    base: &Path,
    summary: &MessageSummary,
    parts: &[mailbox_store::render::BodyPart],
) -> Result<()> {
    let dir = base.join(attachment_dir(summary.sender_address(), &summary.subject));
    let saved = save_attachments(parts, &dir)?;
    if saved.is_empty() || ctx.quiet {
        return Ok(());
    }
    let note = format!("Saved {} attachment(s) to {}", saved.len(), dir.display());
    if ctx.use_colors {
        println!("{}", note.green());
    } else {
        println!("{note}");
    }
    Ok(())
}

/// Blocks on the pager prompt. Returns true when the user wants to quit.
fn prompt_continue() -> std::result::Result<bool, CommandError> {
    let input: String = dialoguer::Input::new()
        .with_prompt("Enter for next message, q to quit")
        .allow_empty(true)
        .interact_text()
        .map_err(|err| CommandError::Io(std::io::Error::other(err)))?;
    Ok(input.trim().eq_ignore_ascii_case("q"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_limit() {
        assert_eq!(parse_limit("10").unwrap(), Some(10));
        assert_eq!(parse_limit("all").unwrap(), None);
        assert_eq!(parse_limit("ALL").unwrap(), None);
        assert!(parse_limit("0").is_err());
        assert!(parse_limit("ten").is_err());
    }

    #[test]
    fn test_select_window_latest_by_default() {
        let seqs = vec![1, 2, 3, 4, 5];
        assert_eq!(select_window(seqs, Some(2), false, false), vec![4, 5]);
    }

    #[test]
    fn test_select_window_from_oldest() {
        let seqs = vec![1, 2, 3, 4, 5];
        assert_eq!(select_window(seqs, Some(2), true, false), vec![1, 2]);
    }

    #[test]
    fn test_select_window_reverse() {
        let seqs = vec![1, 2, 3, 4, 5];
        assert_eq!(select_window(seqs, Some(3), false, true), vec![5, 4, 3]);
    }

    #[test]
    fn test_select_window_no_limit() {
        let seqs = vec![1, 2, 3];
        assert_eq!(select_window(seqs.clone(), None, false, false), seqs);
    }
}
