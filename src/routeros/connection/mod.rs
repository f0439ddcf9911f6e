// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Low-level RouterOS API connection handling

mod auth;
mod protocol;

use std::collections::HashMap;
use std::time::Duration;

use thiserror::Error;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;

pub use protocol::{encode_length, read_length};

/// Connection timeout (5 seconds)
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// One API reply row: the `=key=value` attributes of a `!re` sentence
pub type Sentence = HashMap<String, String>;

/// Errors from the RouterOS wire layer
#[derive(Debug, Error)]
pub enum RouterError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The router did not answer within the per-call deadline
    #[error("RouterOS did not respond within {0:?}")]
    Timeout(Duration),

    /// Command-level error reply (`!trap`)
    #[error("RouterOS trap: {0}")]
    Trap(String),

    /// Session-level error reply (`!fatal`); the connection is dead
    #[error("RouterOS fatal: {0}")]
    Fatal(String),

    /// The router rejected the supplied API credentials
    #[error("login rejected: {0}")]
    AuthFailed(String),

    #[error("protocol error: {0}")]
    Protocol(String),
}

/// Low-level RouterOS API connection
#[derive(Debug)]
pub struct RouterOsConnection {
    stream: TcpStream,
    call_timeout: Duration,
}

impl RouterOsConnection {
    pub(crate) async fn connect(addr: &str, call_timeout: Duration) -> Result<Self, RouterError> {
        tracing::trace!("Attempting TCP connection to: {}", addr);
        let stream = timeout(CONNECT_TIMEOUT, TcpStream::connect(addr))
            .await
            .map_err(|_| RouterError::Timeout(CONNECT_TIMEOUT))??;
        tracing::trace!("TCP connection established to: {}", addr);
        Ok(Self {
            stream,
            call_timeout,
        })
    }

    /// Runs a print command with `?key=value` query filters and returns
    /// the matching rows.
    pub async fn query(
        &mut self,
        path: &str,
        filters: &[(&str, &str)],
    ) -> Result<Vec<Sentence>, RouterError> {
        let mut words: Vec<String> = Vec::with_capacity(1 + filters.len());
        words.push(path.to_string());
        for (key, value) in filters {
            words.push(format!("?{key}={value}"));
        }
        self.raw_command(words).await
    }

    pub(crate) async fn raw_command(
        &mut self,
        words: Vec<String>,
    ) -> Result<Vec<Sentence>, RouterError> {
        self.send_words(&words).await?;
        timeout(self.call_timeout, self.read_sentences())
            .await
            .map_err(|_| RouterError::Timeout(self.call_timeout))?
    }

    async fn send_words(&mut self, words: &[String]) -> Result<(), RouterError> {
        for w in words {
            self.write_word(w).await?;
        }
        // zero length word terminator
        self.stream.write_all(&[0]).await?;
        Ok(())
    }

    async fn write_word(&mut self, word: &str) -> Result<(), RouterError> {
        let bytes = word.as_bytes();
        self.stream.write_all(&encode_length(bytes.len())).await?;
        self.stream.write_all(bytes).await?;
        Ok(())
    }

    async fn read_sentences(&mut self) -> Result<Vec<Sentence>, RouterError> {
        let mut sentences: Vec<Sentence> = Vec::new();
        let mut current: Option<Sentence> = None;
        loop {
            let word = self.read_word().await?;
            if word.is_empty() {
                continue;
            }
            tracing::trace!("Received word: {}", word);
            match word.as_str() {
                "!done" => {
                    if let Some(s) = current.take() {
                        sentences.push(s);
                    }
                    tracing::trace!("Command complete, {} sentences received", sentences.len());
                    return Ok(sentences);
                }
                "!re" => {
                    if let Some(s) = current.take() {
                        sentences.push(s);
                    }
                    current = Some(Sentence::new());
                }
                "!trap" => {
                    let detail = self.read_error_detail().await?;
                    return Err(RouterError::Trap(detail));
                }
                "!fatal" => {
                    let detail = self.read_error_detail().await?;
                    return Err(RouterError::Fatal(detail));
                }
                _ => {
                    if let Some(stripped) = word.strip_prefix('=') {
                        let tgt = current.get_or_insert_with(Sentence::new);
                        if let Some((k, v)) = stripped.split_once('=') {
                            tgt.insert(k.to_string(), v.to_string());
                        }
                    }
                    // ignore other headers
                }
            }
        }
    }

    /// Collects the attributes following an error header up to the next
    /// reply header and distills a message out of them.
    async fn read_error_detail(&mut self) -> Result<String, RouterError> {
        let mut detail = Sentence::new();
        loop {
            let w = self.read_word().await?;
            if w.is_empty() {
                continue;
            }
            if let Some(stripped) = w.strip_prefix('=') {
                if let Some((k, v)) = stripped.split_once('=') {
                    detail.insert(k.to_string(), v.to_string());
                }
                continue;
            }
            if w.starts_with('!') {
                break;
            }
            // A bare word after `!fatal` is the reason itself
            detail.entry("message".to_string()).or_insert(w);
            break;
        }
        Ok(detail
            .get("message")
            .cloned()
            .unwrap_or_else(|| "unspecified error".to_string()))
    }

    async fn read_word(&mut self) -> Result<String, RouterError> {
        let len = read_length(&mut self.stream).await?;
        if len == 0 {
            return Ok(String::new());
        }
        let mut buf = vec![0u8; len];
        self.stream.read_exact(&mut buf).await?;
        Ok(String::from_utf8_lossy(&buf).into())
    }
}
