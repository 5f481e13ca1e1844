//! MIME body rendering.
//!
//! Walks a parsed message's body tree into a flat list of displayable parts.
//! Plain text is passed through, HTML is converted to text only when no
//! plain-text sibling already covers the same content, and everything else
//! is surfaced as an attachment or an unsupported-part note.

use std::fs;
use std::path::{Path, PathBuf};

use mailparse::{parse_mail, DispositionType, MailHeaderMap, ParsedMail};
use nanohtml2text::html2text;

use crate::error::Result;

/// One displayable part of a message body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyPart {
    /// Text ready to print.
    Text(String),
    /// An HTML part skipped because a plain-text sibling was rendered.
    SkippedHtml,
    /// A file-like part, inline image or attachment.
    Attachment(AttachmentPart),
    /// A part of a kind the renderer does not handle, by MIME type.
    Unsupported(String),
}

/// A file-like body part with its decoded content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentPart {
    /// Full MIME type, e.g. `application/pdf`.
    pub mimetype: String,
    /// File name from the disposition or content-type parameters.
    pub name: Option<String>,
    /// `Content-Transfer-Encoding` header value.
    pub encoding: Option<String>,
    /// Disposition as declared, `attachment` or `inline`.
    pub disposition: String,
    /// Decoded content bytes.
    pub data: Vec<u8>,
}

impl AttachmentPart {
    /// One-line description shown in place of the content.
    pub fn describe(&self) -> String {
        let mut line = self.mimetype.clone();
        if let Some(name) = &self.name {
            line.push_str(&format!("; name=\"{name}\""));
        }
        if let Some(encoding) = &self.encoding {
            line.push_str(&format!(" encoding=\"{encoding}\""));
        }
        line.push_str(&format!(" ({})", self.disposition));
        line.push_str(&format!(" [{}]", format_size(self.data.len() as u64)));
        line
    }
}

/// Parses raw message bytes and walks the body tree into parts.
pub fn body_parts(raw: &[u8]) -> Result<Vec<BodyPart>> {
    let parsed = parse_mail(raw)?;
    let mut parts = Vec::new();
    walk(&parsed, false, &mut parts)?;
    Ok(parts)
}

fn walk(part: &ParsedMail<'_>, has_plain_sibling: bool, out: &mut Vec<BodyPart>) -> Result<()> {
    let mimetype = part.ctype.mimetype.to_lowercase();

    if mimetype.starts_with("multipart/") {
        let plain_sibling = part
            .subparts
            .iter()
            .any(|sub| sub.ctype.mimetype.eq_ignore_ascii_case("text/plain"));
        for sub in &part.subparts {
            walk(sub, plain_sibling, out)?;
        }
        return Ok(());
    }

    if is_file_part(part) {
        out.push(BodyPart::Attachment(attachment_part(part, &mimetype)?));
    } else if mimetype == "text/plain" {
        out.push(BodyPart::Text(part.get_body()?));
    } else if mimetype == "text/html" {
        if has_plain_sibling {
            out.push(BodyPart::SkippedHtml);
        } else {
            out.push(BodyPart::Text(html2text(&part.get_body()?)));
        }
    } else {
        out.push(BodyPart::Unsupported(mimetype));
    }

    Ok(())
}

/// A part is file-like when it declares an attachment disposition, carries a
/// file name, or is binary content by type.
fn is_file_part(part: &ParsedMail<'_>) -> bool {
    let disposition = part.get_content_disposition();
    if disposition.disposition == DispositionType::Attachment {
        return true;
    }
    if disposition.params.contains_key("filename") || part.ctype.params.contains_key("name") {
        return true;
    }

    let mimetype = part.ctype.mimetype.to_lowercase();
    mimetype.starts_with("image/") || mimetype.starts_with("application/")
}

fn attachment_part(part: &ParsedMail<'_>, mimetype: &str) -> Result<AttachmentPart> {
    let disposition = part.get_content_disposition();
    let name = disposition
        .params
        .get("filename")
        .or_else(|| part.ctype.params.get("name"))
        .cloned();

    let disposition = match disposition.disposition {
        DispositionType::Inline => "inline".to_string(),
        DispositionType::Attachment => "attachment".to_string(),
        DispositionType::FormData => "form-data".to_string(),
        DispositionType::Extension(other) => other,
    };

    Ok(AttachmentPart {
        mimetype: mimetype.to_string(),
        name,
        encoding: part.headers.get_first_value("Content-Transfer-Encoding"),
        disposition,
        data: part.get_body_raw()?,
    })
}

/// Saves every attachment part into `dir`, creating it on first use.
///
/// Returns the paths written. Parts without a file name are skipped. Declared
/// names come from the message, so only their final path component is used;
/// a name that reduces to none (`..`, a bare separator) is skipped.
pub fn save_attachments(parts: &[BodyPart], dir: &Path) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    for part in parts {
        let BodyPart::Attachment(attachment) = part else {
            continue;
        };
        let Some(name) = attachment.name.as_deref().and_then(safe_file_name) else {
            continue;
        };
        if written.is_empty() {
            fs::create_dir_all(dir)?;
        }
        let path = dir.join(name);
        fs::write(&path, &attachment.data)?;
        written.push(path);
    }
    Ok(written)
}

/// Reduces a declared attachment name to a plain file name, or rejects it.
fn safe_file_name(name: &str) -> Option<&std::ffi::OsStr> {
    Path::new(name).file_name()
}

/// Renders a byte count as `12.3 kB` or `1.2 MB`.
pub fn format_size(bytes: u64) -> String {
    const MB: f64 = 1024.0 * 1024.0;
    let bytes = bytes as f64;
    if bytes >= MB {
        format!("{:.1} MB", bytes / MB)
    } else {
        format!("{:.1} kB", bytes / 1024.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAIN: &str = "From: a@x.com\r\n\
        Content-Type: text/plain\r\n\
        \r\n\
        hello there\r\n";

    const ALTERNATIVE: &str = "From: a@x.com\r\n\
        Content-Type: multipart/alternative; boundary=\"b1\"\r\n\
        \r\n\
        --b1\r\n\
        Content-Type: text/plain\r\n\
        \r\n\
        plain body\r\n\
        --b1\r\n\
        Content-Type: text/html\r\n\
        \r\n\
        <p>html body</p>\r\n\
        --b1--\r\n";

    const HTML_ONLY: &str = "From: a@x.com\r\n\
        Content-Type: text/html\r\n\
        \r\n\
        <p>Hello <b>world</b></p>\r\n";

    const WITH_ATTACHMENT: &str = "From: a@x.com\r\n\
        Content-Type: multipart/mixed; boundary=\"b2\"\r\n\
        \r\n\
        --b2\r\n\
        Content-Type: text/plain\r\n\
        \r\n\
        see attached\r\n\
        --b2\r\n\
        Content-Type: application/pdf; name=\"report.pdf\"\r\n\
        Content-Disposition: attachment; filename=\"report.pdf\"\r\n\
        Content-Transfer-Encoding: base64\r\n\
        \r\n\
        aGVsbG8=\r\n\
        --b2--\r\n";

    #[test]
    fn test_plain_body() {
        let parts = body_parts(PLAIN.as_bytes()).unwrap();
        assert_eq!(parts, vec![BodyPart::Text("hello there\r\n".to_string())]);
    }

    #[test]
    fn test_html_skipped_when_plain_sibling_exists() {
        let parts = body_parts(ALTERNATIVE.as_bytes()).unwrap();
        assert_eq!(parts.len(), 2);
        assert!(matches!(&parts[0], BodyPart::Text(body) if body.contains("plain body")));
        assert_eq!(parts[1], BodyPart::SkippedHtml);
    }

    #[test]
    fn test_html_converted_without_plain_sibling() {
        let parts = body_parts(HTML_ONLY.as_bytes()).unwrap();
        assert_eq!(parts.len(), 1);
        let BodyPart::Text(text) = &parts[0] else {
            panic!("expected text part");
        };
        assert!(text.contains("Hello"));
        assert!(!text.contains("<p>"));
    }

    #[test]
    fn test_attachment_described() {
        let parts = body_parts(WITH_ATTACHMENT.as_bytes()).unwrap();
        assert_eq!(parts.len(), 2);
        let BodyPart::Attachment(attachment) = &parts[1] else {
            panic!("expected attachment part");
        };
        assert_eq!(attachment.mimetype, "application/pdf");
        assert_eq!(attachment.name.as_deref(), Some("report.pdf"));
        assert_eq!(attachment.data, b"hello");
        assert_eq!(
            attachment.describe(),
            "application/pdf; name=\"report.pdf\" encoding=\"base64\" (attachment) [0.0 kB]"
        );
    }

    #[test]
    fn test_save_attachments() {
        let parts = body_parts(WITH_ATTACHMENT.as_bytes()).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("mail-1");

        let written = save_attachments(&parts, &target).unwrap();
        assert_eq!(written, vec![target.join("report.pdf")]);
        assert_eq!(fs::read(&written[0]).unwrap(), b"hello");
    }

    #[test]
    fn test_save_attachments_skips_dir_creation_when_empty() {
        let parts = body_parts(PLAIN.as_bytes()).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("mail-2");

        let written = save_attachments(&parts, &target).unwrap();
        assert!(written.is_empty());
        assert!(!target.exists());
    }

    #[test]
    fn test_save_attachments_confines_declared_names() {
        // declared file names are attacker-controlled message data
        let hostile = WITH_ATTACHMENT.replace("report.pdf", "../outside.pdf");
        let parts = body_parts(hostile.as_bytes()).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("mail-3");

        let written = save_attachments(&parts, &target).unwrap();
        assert_eq!(written, vec![target.join("outside.pdf")]);
        assert!(!dir.path().join("outside.pdf").exists());
    }

    #[test]
    fn test_save_attachments_skips_unusable_names() {
        assert_eq!(safe_file_name("notes.txt").unwrap(), "notes.txt");
        assert_eq!(safe_file_name("/etc/passwd").unwrap(), "passwd");
        assert_eq!(safe_file_name("a/../b.txt").unwrap(), "b.txt");
        assert!(safe_file_name("..").is_none());
        assert!(safe_file_name("a/..").is_none());
        assert!(safe_file_name("/").is_none());
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "0.5 kB");
        assert_eq!(format_size(102_400), "100.0 kB");
        assert_eq!(format_size(2_621_440), "2.5 MB");
    }
}
