//! IMAP store access.
//!
//! [`MailStore`] wraps one authenticated IMAP session behind an async mutex
//! so the keep-alive task and the fetch loop can share it. Folders are opened
//! read-only; nothing here mutates server state beyond the session itself.

use std::sync::Arc;
use std::time::Duration;

use async_imap::types::Flag;
use futures::TryStreamExt;
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use mailbox_filter::SearchTerm;

use crate::error::{Result, StoreError};
use crate::query::to_imap_query;

type TlsSession = async_imap::Session<async_native_tls::TlsStream<TcpStream>>;

/// Fetch query covering everything the client displays.
const FETCH_QUERY: &str = "(RFC822 RFC822.SIZE FLAGS)";

/// Folder counters from a read-only EXAMINE.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FolderStats {
    /// Number of messages in the folder.
    pub total: u32,
    /// Number of unseen messages, when the server reports it.
    pub unseen: Option<u32>,
}

/// One fetched message with the metadata the client needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedMessage {
    /// Sequence number in the examined folder.
    pub seq: u32,
    /// RFC822.SIZE as reported by the server.
    pub size: Option<u32>,
    /// Whether the seen flag is set.
    pub seen: bool,
    /// Whether the flagged flag is set.
    pub flagged: bool,
    /// Raw RFC822 message bytes.
    pub body: Vec<u8>,
}

/// An authenticated IMAP session.
pub struct MailStore {
    session: Arc<Mutex<TlsSession>>,
}

impl MailStore {
    /// Connects over TLS and logs in.
    pub async fn connect(host: &str, port: u16, username: &str, password: &str) -> Result<Self> {
        let tcp = TcpStream::connect((host, port)).await?;
        let tls = async_native_tls::TlsConnector::new();
        let stream = tls.connect(host, tcp).await?;
        let client = async_imap::Client::new(stream);
        let session = client
            .login(username, password)
            .await
            .map_err(|(err, _client)| err)?;

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
        })
    }

    /// Opens a folder read-only and returns its counters.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::FolderNotFound` when the server rejects the
    /// folder name.
    pub async fn examine(&self, folder: &str) -> Result<FolderStats> {
        let mut session = self.session.lock().await;
        match session.examine(folder).await {
            Ok(mailbox) => Ok(FolderStats {
                total: mailbox.exists,
                unseen: mailbox.unseen,
            }),
            Err(async_imap::error::Error::No(_)) => Err(StoreError::folder_not_found(folder)),
            Err(err) => Err(err.into()),
        }
    }

    /// Runs a filter against the examined folder.
    ///
    /// Returns matching sequence numbers in ascending order.
    pub async fn search(&self, term: &SearchTerm) -> Result<Vec<u32>> {
        let query = to_imap_query(term);
        let mut session = self.session.lock().await;
        let matches = session.search(query).await?;

        let mut seqs: Vec<u32> = matches.into_iter().collect();
        seqs.sort_unstable();
        Ok(seqs)
    }

    /// Fetches one message with its size and flags.
    pub async fn fetch(&self, seq: u32) -> Result<FetchedMessage> {
        let mut session = self.session.lock().await;
        let stream = session.fetch(seq.to_string(), FETCH_QUERY).await?;
        let fetches: Vec<_> = stream.try_collect().await?;

        let fetch = fetches
            .first()
            .ok_or(StoreError::EmptyFetch { seq })?;
        let body = fetch
            .body()
            .ok_or(StoreError::EmptyFetch { seq })?
            .to_vec();

        let mut seen = false;
        let mut flagged = false;
        for flag in fetch.flags() {
            match flag {
                Flag::Seen => seen = true,
                Flag::Flagged => flagged = true,
                _ => {}
            }
        }

        Ok(FetchedMessage {
            seq: fetch.message,
            size: fetch.size,
            seen,
            flagged,
            body,
        })
    }

    /// Issues one NOOP, keeping the session alive.
    pub async fn noop(&self) -> Result<()> {
        let mut session = self.session.lock().await;
        session.noop().await?;
        Ok(())
    }

    /// Spawns a background task that pings the session every `interval`.
    ///
    /// The task stops on its own if a ping fails; dropping the returned
    /// handle cancels it.
    pub fn keepalive(&self, interval: Duration) -> KeepAlive {
        let session = Arc::clone(&self.session);
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // the first tick fires immediately; skip it
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let mut session = session.lock().await;
                if session.noop().await.is_err() {
                    break;
                }
            }
        });

        KeepAlive { handle }
    }

    /// Logs out and drops the connection.
    pub async fn logout(&self) -> Result<()> {
        let mut session = self.session.lock().await;
        session.logout().await?;
        Ok(())
    }
}

/// Cancellation handle for the keep-alive task.
pub struct KeepAlive {
    handle: JoinHandle<()>,
}

impl KeepAlive {
    /// Stops the keep-alive task.
    pub fn stop(self) {
        self.handle.abort();
    }
}

impl Drop for KeepAlive {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
