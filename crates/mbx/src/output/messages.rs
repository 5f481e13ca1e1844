//! Message output formatting.

use owo_colors::OwoColorize;
use serde::Serialize;

use mailbox_store::render::{format_size, BodyPart};
use mailbox_store::{FolderStats, MessageSummary};

/// JSON output structure for a single message.
#[derive(Serialize)]
pub struct MessageOutput<'a> {
    pub seq: u32,
    pub subject: &'a str,
    pub date: Option<String>,
    pub from: &'a [String],
    pub to: &'a [String],
    pub cc: &'a [String],
    pub reply_to: &'a [String],
    pub size: Option<u32>,
    pub seen: bool,
    pub flagged: bool,
    pub body: Vec<String>,
}

/// Builds the JSON output structure for one message.
pub fn format_message_json<'a>(
    summary: &'a MessageSummary,
    parts: &[BodyPart],
) -> MessageOutput<'a> {
    MessageOutput {
        seq: summary.seq,
        subject: &summary.subject,
        date: summary.date.map(|date| date.to_rfc3339()),
        from: &summary.from,
        to: &summary.to,
        cc: &summary.cc,
        reply_to: &summary.reply_to,
        size: summary.size,
        seen: summary.seen,
        flagged: summary.flagged,
        body: parts.iter().map(part_line).collect(),
    }
}

/// Formats the folder banner printed before the messages.
pub fn format_folder_line(folder: &str, stats: &FolderStats, use_colors: bool) -> String {
    let counts = match stats.unseen {
        Some(unseen) => format!("{} messages, {unseen} unseen", stats.total),
        None => format!("{} messages", stats.total),
    };
    if use_colors {
        format!("{} {counts}", folder.bold())
    } else {
        format!("{folder} {counts}")
    }
}

/// Formats one message as a readable text block.
pub fn format_message(summary: &MessageSummary, parts: &[BodyPart], use_colors: bool) -> String {
    let mut out = String::new();

    let header = format!("==== Message {} ====", summary.seq);
    if use_colors {
        out.push_str(&header.bold().to_string());
    } else {
        out.push_str(&header);
    }
    out.push('\n');

    push_field(&mut out, "Subject", &summary.subject, use_colors);
    push_field(&mut out, "From", &summary.from.join(", "), use_colors);
    push_field(&mut out, "To", &summary.to.join(", "), use_colors);
    if !summary.cc.is_empty() {
        push_field(&mut out, "Cc", &summary.cc.join(", "), use_colors);
    }
    if !summary.reply_to.is_empty() {
        push_field(&mut out, "Reply-To", &summary.reply_to.join(", "), use_colors);
    }
    if let Some(date) = summary.date {
        push_field(&mut out, "Date", &date.to_string(), use_colors);
    }
    if let Some(size) = summary.size {
        push_field(&mut out, "Size", &format_size(u64::from(size)), use_colors);
    }
    push_field(&mut out, "Flags", &flag_line(summary), use_colors);
    out.push('\n');

    for part in parts {
        match part {
            BodyPart::Text(text) => out.push_str(text),
            BodyPart::Attachment(attachment) => {
                let line = attachment.describe();
                if use_colors {
                    out.push_str(&line.dimmed().to_string());
                } else {
                    out.push_str(&line);
                }
            }
            other => {
                let line = part_line(other);
                if use_colors {
                    out.push_str(&line.red().to_string());
                } else {
                    out.push_str(&line);
                }
            }
        }
        if !out.ends_with('\n') {
            out.push('\n');
        }
    }

    out
}

fn push_field(out: &mut String, label: &str, value: &str, use_colors: bool) {
    let label = format!("{label}:");
    if use_colors {
        out.push_str(&format!("{:<10}{value}\n", label.underline()));
    } else {
        out.push_str(&format!("{label:<10}{value}\n"));
    }
}

fn flag_line(summary: &MessageSummary) -> String {
    let mut flags = Vec::new();
    if summary.seen {
        flags.push("seen");
    }
    if summary.flagged {
        flags.push("flagged");
    }
    if flags.is_empty() {
        "(none)".to_string()
    } else {
        flags.join(", ")
    }
}

fn part_line(part: &BodyPart) -> String {
    match part {
        BodyPart::Text(text) => text.clone(),
        BodyPart::SkippedHtml => "[text/html part skipped, plain text shown]".to_string(),
        BodyPart::Attachment(attachment) => attachment.describe(),
        BodyPart::Unsupported(mimetype) => format!("[unsupported part: {mimetype}]"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary() -> MessageSummary {
        MessageSummary {
            seq: 7,
            subject: "Weekly report".to_string(),
            date: None,
            from: vec!["John <john@example.com>".to_string()],
            to: vec!["jane@example.com".to_string()],
            cc: Vec::new(),
            reply_to: Vec::new(),
            size: Some(2048),
            seen: true,
            flagged: false,
        }
    }

    #[test]
    fn test_format_message_plain() {
        let parts = vec![BodyPart::Text("Hello there".to_string())];
        let output = format_message(&summary(), &parts, false);

        assert!(output.starts_with("==== Message 7 ===="));
        assert!(output.contains("Subject:  Weekly report"));
        assert!(output.contains("From:     John <john@example.com>"));
        assert!(output.contains("Size:     2.0 kB"));
        assert!(output.contains("Flags:    seen"));
        assert!(output.contains("Hello there"));
        assert!(!output.contains("Cc:"));
    }

    #[test]
    fn test_format_message_skipped_parts() {
        let parts = vec![
            BodyPart::Text("Plain body".to_string()),
            BodyPart::SkippedHtml,
            BodyPart::Unsupported("application/x-thing".to_string()),
        ];
        let output = format_message(&summary(), &parts, false);

        assert!(output.contains("[text/html part skipped, plain text shown]"));
        assert!(output.contains("[unsupported part: application/x-thing]"));
    }

    #[test]
    fn test_format_folder_line() {
        let stats = FolderStats {
            total: 120,
            unseen: Some(3),
        };
        assert_eq!(
            format_folder_line("INBOX", &stats, false),
            "INBOX 120 messages, 3 unseen"
        );

        let stats = FolderStats {
            total: 1,
            unseen: None,
        };
        assert_eq!(format_folder_line("Sent", &stats, false), "Sent 1 messages");
    }

    #[test]
    fn test_format_message_json_body_lines() {
        let parts = vec![
            BodyPart::Text("Plain body".to_string()),
            BodyPart::SkippedHtml,
        ];
        let summary = summary();
        let output = format_message_json(&summary, &parts);
        let value = serde_json::to_value(&output).unwrap();

        assert_eq!(value["seq"], 7);
        assert_eq!(value["subject"], "Weekly report");
        assert_eq!(value["body"][0], "Plain body");
        assert_eq!(value["body"][1], "[text/html part skipped, plain text shown]");
    }
}
