//! Error types for store access, message transport, and rendering.

use thiserror::Error;

/// A specialized Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur while talking to the mail store or transport.
#[derive(Debug, Error)]
pub enum StoreError {
    /// IMAP protocol or connection error.
    #[error("mail store error: {0}")]
    Imap(#[from] async_imap::error::Error),

    /// TLS handshake failure.
    #[error("TLS error: {0}")]
    Tls(#[from] async_native_tls::Error),

    /// SMTP transport error.
    #[error("mail transport error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    /// A recipient address failed to parse.
    #[error("invalid address: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// Outgoing message could not be assembled.
    #[error("message build error: {0}")]
    Message(#[from] lettre::error::Error),

    /// A fetched message body failed to parse.
    #[error("message parse error: {0}")]
    MailParse(#[from] mailparse::MailParseError),

    /// Local file I/O failure (body file, attachment read or save).
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Quote service request failure.
    #[error("quote fetch failed: {0}")]
    QuoteFetch(#[from] reqwest::Error),

    /// The requested folder does not exist in the store.
    #[error("folder not found: {folder}")]
    FolderNotFound {
        /// The folder that was requested.
        folder: String,
    },

    /// One or more recipient addresses were rejected during validation.
    #[error("invalid recipient list: {addresses}")]
    InvalidRecipient {
        /// The normalized address list that failed validation.
        addresses: String,
    },

    /// An attachment was rejected before transmission.
    #[error("attachment rejected: {path}")]
    AttachmentRejected {
        /// The offending attachment path.
        path: String,
    },

    /// The store returned a fetch response without a message body.
    #[error("message {seq} has no body")]
    EmptyFetch {
        /// Sequence number of the message.
        seq: u32,
    },
}

impl StoreError {
    /// Creates a folder-not-found error.
    pub fn folder_not_found(folder: impl Into<String>) -> Self {
        StoreError::FolderNotFound {
            folder: folder.into(),
        }
    }

    /// Creates an invalid-recipient error.
    pub fn invalid_recipient(addresses: impl Into<String>) -> Self {
        StoreError::InvalidRecipient {
            addresses: addresses.into(),
        }
    }

    /// Creates an attachment-rejected error.
    pub fn attachment_rejected(path: impl Into<String>) -> Self {
        StoreError::AttachmentRejected { path: path.into() }
    }

    /// Returns the appropriate CLI exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            StoreError::Imap(_)
            | StoreError::Tls(_)
            | StoreError::Smtp(_)
            | StoreError::QuoteFetch(_) => 3,
            _ => 2,
        }
    }
}
