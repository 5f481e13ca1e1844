//! Send command implementation.
//!
//! Builds an outgoing message from the CLI arguments and submits it over
//! SMTP. A message body can be literal text or a file path; when omitted, a
//! random quote is sent instead.

use chrono::Local;
use owo_colors::OwoColorize;

use mailbox_store::quote::{fetch_quote, QUOTE_BASE_URL};
use mailbox_store::send::{
    self, parse_address_list, partition_attachments, read_body_source, sender_mailbox, Outgoing,
    SmtpConfig,
};

use super::config::Config;
use super::{CommandContext, Result};

/// Options for the send command.
pub struct SendOptions {
    pub recipient: String,
    pub cc: Option<String>,
    pub bcc: Option<String>,
    pub subject: String,
    pub message: Option<String>,
    pub attachment: Option<String>,
}

/// Executes the send command.
pub async fn execute(
    ctx: &CommandContext,
    config: &Config,
    password: &str,
    opts: &SendOptions,
) -> Result<()> {
    let address = config.account.address()?;
    let from = sender_mailbox(config.account.sender_name.clone(), &address)?;

    let to = parse_address_list(&opts.recipient)?;
    let cc = match &opts.cc {
        Some(raw) => parse_address_list(raw)?,
        None => Vec::new(),
    };
    let bcc = match &opts.bcc {
        Some(raw) => parse_address_list(raw)?,
        None => Vec::new(),
    };

    let body = match &opts.message {
        Some(raw) => read_body_source(raw).await?,
        None => {
            if ctx.verbose {
                eprintln!("No message given, fetching a quote of the day");
            }
            fetch_quote(&reqwest::Client::new(), QUOTE_BASE_URL).await?
        }
    };

    let attachments = match &opts.attachment {
        Some(raw) => raw
            .split(',')
            .map(str::trim)
            .filter(|path| !path.is_empty())
            .map(send::expand_home)
            .collect(),
        None => Vec::new(),
    };
    let (accepted, rejected) = partition_attachments(attachments);
    for path in &rejected {
        if !ctx.quiet {
            let note = format!("skipping attachment (extension not allowed): {}", path.display());
            if ctx.use_colors {
                eprintln!("{}", note.red());
            } else {
                eprintln!("{note}");
            }
        }
    }

    let smtp = SmtpConfig {
        host: config.smtp.require_host()?.to_string(),
        port: config.smtp.port(),
        username: address,
        password: password.to_string(),
    };
    let outgoing = Outgoing {
        from,
        to,
        cc,
        bcc,
        subject: opts.subject.clone(),
        body,
        attachments: accepted,
    };

    let recipients = send::send(&smtp, outgoing).await?;
    let sent_at = Local::now();

    if ctx.json_output {
        let output = serde_json::json!({
            "status": "sent",
            "recipients": recipients,
            "subject": opts.subject,
            "skipped_attachments": rejected
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>(),
            "sent_at": sent_at.to_rfc3339(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        let line = format!("==> Mail sent to <{}> at {}", recipients.join(", "), sent_at);
        if ctx.use_colors {
            println!("{}", line.green());
        } else {
            println!("{line}");
        }
    }

    Ok(())
}
