// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! In-process RouterOS stand-in speaking the real wire protocol
//!
//! Binds a loopback socket, answers `/login` and hotspot print queries
//! from fixture data, and counts logins/connections so tests can assert
//! pool behavior.

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use hotspot_gateway::{encode_length, read_length};

#[derive(Clone)]
pub struct MockUser {
    pub name: &'static str,
    pub password: &'static str,
    pub disabled: bool,
}

#[derive(Clone)]
pub struct MockSession {
    pub user: &'static str,
    pub id: &'static str,
    pub bytes_in: u64,
    pub bytes_out: u64,
}

#[derive(Default)]
pub struct MockRouter {
    pub users: Vec<MockUser>,
    pub sessions: Vec<MockSession>,
    pub reject_login: bool,
}

pub struct MockHandle {
    pub addr: SocketAddr,
    logins: Arc<AtomicUsize>,
    connections: Arc<AtomicUsize>,
}

impl MockHandle {
    pub fn address(&self) -> String {
        self.addr.to_string()
    }

    /// Number of `/login` commands the mock has served
    pub fn login_count(&self) -> usize {
        self.logins.load(Ordering::SeqCst)
    }

    /// Number of TCP connections the mock has accepted
    pub fn connection_count(&self) -> usize {
        self.connections.load(Ordering::SeqCst)
    }
}

impl MockRouter {
    pub fn with_users(users: Vec<MockUser>) -> Self {
        Self {
            users,
            ..Self::default()
        }
    }

    pub async fn spawn(self) -> MockHandle {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock router");
        let addr = listener.local_addr().expect("mock router addr");

        let logins = Arc::new(AtomicUsize::new(0));
        let connections = Arc::new(AtomicUsize::new(0));
        let handle = MockHandle {
            addr,
            logins: logins.clone(),
            connections: connections.clone(),
        };

        let router = Arc::new(self);
        tokio::spawn(async move {
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    break;
                };
                connections.fetch_add(1, Ordering::SeqCst);
                let router = router.clone();
                let logins = logins.clone();
                tokio::spawn(async move {
                    let _ = serve_connection(stream, router, logins).await;
                });
            }
        });

        handle
    }
}

async fn serve_connection(
    mut stream: TcpStream,
    router: Arc<MockRouter>,
    logins: Arc<AtomicUsize>,
) -> std::io::Result<()> {
    loop {
        let sentence = read_sentence(&mut stream).await?;
        let Some(command) = sentence.first() else {
            continue;
        };

        match command.as_str() {
            "/login" => {
                logins.fetch_add(1, Ordering::SeqCst);
                if router.reject_login {
                    write_sentence(
                        &mut stream,
                        &["!trap", "=message=invalid user name or password (6)"],
                    )
                    .await?;
                    write_sentence(&mut stream, &["!done"]).await?;
                } else {
                    write_sentence(&mut stream, &["!done"]).await?;
                }
            }
            "/ip/hotspot/user/print" => {
                let filter = query_arg(&sentence, "name");
                for (index, user) in router
                    .users
                    .iter()
                    .enumerate()
                    .filter(|(_, u)| filter.is_none_or(|f| u.name == f))
                {
                    let id = format!("=.id=*{:X}", index + 1);
                    let name = format!("=name={}", user.name);
                    let password = format!("=password={}", user.password);
                    let disabled = format!(
                        "=disabled={}",
                        if user.disabled { "true" } else { "false" }
                    );
                    write_sentence(&mut stream, &["!re", &id, &name, &password, &disabled])
                        .await?;
                }
                write_sentence(&mut stream, &["!done"]).await?;
            }
            "/ip/hotspot/active/print" => {
                let filter = query_arg(&sentence, "user");
                for session in router
                    .sessions
                    .iter()
                    .filter(|s| filter.is_none_or(|f| s.user == f))
                {
                    let id = format!("=.id={}", session.id);
                    let user = format!("=user={}", session.user);
                    let bytes_in = format!("=bytes-in={}", session.bytes_in);
                    let bytes_out = format!("=bytes-out={}", session.bytes_out);
                    write_sentence(&mut stream, &["!re", &id, &user, &bytes_in, &bytes_out])
                        .await?;
                }
                write_sentence(&mut stream, &["!done"]).await?;
            }
            _ => {
                write_sentence(&mut stream, &["!trap", "=message=no such command"]).await?;
                write_sentence(&mut stream, &["!done"]).await?;
            }
        }
    }
}

async fn read_sentence(stream: &mut TcpStream) -> std::io::Result<Vec<String>> {
    let mut words = Vec::new();
    loop {
        let len = read_length(stream).await?;
        if len == 0 {
            return Ok(words);
        }
        let mut buf = vec![0u8; len];
        stream.read_exact(&mut buf).await?;
        words.push(String::from_utf8_lossy(&buf).into_owned());
    }
}

async fn write_sentence(stream: &mut TcpStream, words: &[&str]) -> std::io::Result<()> {
    for word in words {
        stream.write_all(&encode_length(word.len())).await?;
        stream.write_all(word.as_bytes()).await?;
    }
    stream.write_all(&[0]).await
}

fn query_arg<'a>(sentence: &'a [String], key: &str) -> Option<&'a str> {
    let prefix = format!("?{key}=");
    sentence.iter().find_map(|w| w.strip_prefix(prefix.as_str()))
}

/// Address of a loopback port with no listener behind it
pub async fn unreachable_address() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind throwaway listener");
    let addr = listener.local_addr().expect("throwaway addr");
    drop(listener);
    addr.to_string()
}
