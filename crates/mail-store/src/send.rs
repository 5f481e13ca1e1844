//! Outgoing message construction and SMTP submission.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::error::{Result, StoreError};

/// File extensions accepted as attachments.
pub const ALLOWED_EXTENSIONS: &[&str] = &[
    "zip", "jpeg", "jpg", "png", "gif", "bmp", "tar", "gz", "7z", "csv", "txt", "xls", "doc",
    "ppt", "jar", "py", "java", "yml", "mp4", "mp3", "pdf", "ogg", "sql", "toml", "tiff", "mov",
    "aac", "xml", "json",
];

/// Image extensions embedded inline with a Content-ID instead of attached.
const INLINE_IMAGE_EXTENSIONS: &[&str] = &["jpeg", "jpg", "png", "gif", "bmp", "tiff"];

/// SMTP submission endpoint and credentials.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
}

/// A fully resolved outgoing message, ready to build and submit.
#[derive(Debug, Clone)]
pub struct Outgoing {
    pub from: Mailbox,
    pub to: Vec<Mailbox>,
    pub cc: Vec<Mailbox>,
    pub bcc: Vec<Mailbox>,
    pub subject: String,
    pub body: String,
    pub attachments: Vec<PathBuf>,
}

/// Builds the From mailbox from a display name and a bare address.
///
/// # Errors
///
/// Returns `StoreError::Address` when the address does not parse.
pub fn sender_mailbox(name: Option<String>, address: &str) -> Result<Mailbox> {
    let address = address.parse().map_err(StoreError::Address)?;
    Ok(Mailbox::new(name, address))
}

/// Parses a comma-separated address list into mailboxes.
///
/// # Errors
///
/// Returns `StoreError::InvalidRecipient` carrying the normalized list when
/// any entry fails to parse.
pub fn parse_address_list(raw: &str) -> Result<Vec<Mailbox>> {
    let entries: Vec<&str> = raw
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .collect();

    let mut mailboxes = Vec::with_capacity(entries.len());
    for entry in &entries {
        match entry.parse::<Mailbox>() {
            Ok(mailbox) => mailboxes.push(mailbox),
            Err(_) => return Err(StoreError::invalid_recipient(entries.join(", "))),
        }
    }
    Ok(mailboxes)
}

/// Resolves a message body argument: the contents of the file at that path
/// if one exists, the literal text otherwise.
pub async fn read_body_source(raw: &str) -> Result<String> {
    let path = Path::new(raw);
    let is_file = tokio::fs::metadata(path)
        .await
        .map(|meta| meta.is_file())
        .unwrap_or(false);

    if is_file {
        Ok(tokio::fs::read_to_string(path).await?)
    } else {
        Ok(raw.to_string())
    }
}

/// Expands a leading `~/` to the user's home directory.
pub fn expand_home(raw: &str) -> PathBuf {
    if let Some(rest) = raw.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(rest);
        }
    }
    PathBuf::from(raw)
}

/// Splits attachment paths into accepted and rejected by extension.
pub fn partition_attachments(paths: Vec<PathBuf>) -> (Vec<PathBuf>, Vec<PathBuf>) {
    paths.into_iter().partition(|path| {
        extension(path)
            .map(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
            .unwrap_or(false)
    })
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(OsStr::to_str)
        .map(str::to_lowercase)
}

fn content_type_for(ext: &str) -> &'static str {
    match ext {
        "jpeg" | "jpg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "tiff" => "image/tiff",
        "txt" | "py" | "java" | "sql" | "yml" | "toml" => "text/plain",
        "csv" => "text/csv",
        "xml" => "text/xml",
        "json" => "application/json",
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        "gz" => "application/gzip",
        "mp3" => "audio/mpeg",
        "ogg" => "audio/ogg",
        "aac" => "audio/aac",
        "mp4" => "video/mp4",
        "mov" => "video/quicktime",
        _ => "application/octet-stream",
    }
}

/// Builds the multipart message for an outgoing mail.
///
/// # Errors
///
/// Returns `StoreError::AttachmentRejected` for a path whose extension is
/// not in the allow-list or whose file name is unusable, and I/O errors for
/// unreadable attachment files.
pub async fn build_message(outgoing: &Outgoing) -> Result<Message> {
    let mut builder = Message::builder()
        .from(outgoing.from.clone())
        .subject(&outgoing.subject);
    for mailbox in &outgoing.to {
        builder = builder.to(mailbox.clone());
    }
    for mailbox in &outgoing.cc {
        builder = builder.cc(mailbox.clone());
    }
    for mailbox in &outgoing.bcc {
        builder = builder.bcc(mailbox.clone());
    }

    let mut multipart = MultiPart::mixed().singlepart(SinglePart::plain(outgoing.body.clone()));
    for path in &outgoing.attachments {
        multipart = multipart.singlepart(attachment_part(path).await?);
    }

    Ok(builder.multipart(multipart)?)
}

async fn attachment_part(path: &Path) -> Result<SinglePart> {
    let rejected = || StoreError::attachment_rejected(path.display().to_string());

    let ext = extension(path).ok_or_else(rejected)?;
    if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        return Err(rejected());
    }
    let filename = path
        .file_name()
        .and_then(OsStr::to_str)
        .ok_or_else(rejected)?
        .to_string();

    let data = tokio::fs::read(path).await?;
    let content_type = ContentType::parse(content_type_for(&ext)).map_err(|_| rejected())?;

    // Images are embedded inline, keyed by file name, so HTML-capable
    // clients show them in the body.
    let part = if INLINE_IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        Attachment::new_inline(filename).body(data, content_type)
    } else {
        Attachment::new(filename).body(data, content_type)
    };
    Ok(part)
}

/// Builds and submits an outgoing message over SMTP.
///
/// Returns the addresses the message was submitted for, in to/cc/bcc order,
/// for the caller's confirmation line.
pub async fn send(config: &SmtpConfig, outgoing: Outgoing) -> Result<Vec<String>> {
    let message = build_message(&outgoing).await?;

    let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)?
        .port(config.port)
        .credentials(Credentials::new(
            config.username.clone(),
            config.password.clone(),
        ))
        .build();
    transport.send(message).await?;

    Ok(outgoing
        .to
        .iter()
        .chain(&outgoing.cc)
        .chain(&outgoing.bcc)
        .map(|mailbox| mailbox.email.to_string())
        .collect())
}
