// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! RouterOS authentication

use md5::compute as md5_compute;
use secrecy::{ExposeSecret, SecretString};

use super::{RouterError, RouterOsConnection};

impl RouterOsConnection {
    /// Authenticates the API session.
    ///
    /// Tries the plain login used by RouterOS 6.43+ first. Routers running
    /// older firmware answer that attempt with a `ret` challenge instead,
    /// in which case the legacy MD5 challenge-response flow completes the
    /// login. Credential rejections come back as `RouterError::AuthFailed`
    /// and must not be retried.
    pub(crate) async fn login(
        &mut self,
        username: &str,
        password: &SecretString,
    ) -> Result<(), RouterError> {
        tracing::trace!("Attempting login for user: {}", username);
        let attempt = self
            .raw_command(vec![
                "/login".to_string(),
                format!("=name={username}"),
                format!("=password={}", password.expose_secret()),
            ])
            .await;

        match attempt {
            Ok(sentences) => {
                // Pre-6.43 routers ignore the credentials and reply with a
                // challenge to hash
                if let Some(challenge) = sentences.iter().find_map(|s| s.get("ret")).cloned() {
                    return self.challenge_login(username, password, &challenge).await;
                }
                for s in &sentences {
                    if let Some(msg) = s.get("message") {
                        if is_credential_rejection(msg) {
                            tracing::trace!("Login failed with message: {}", msg);
                            return Err(RouterError::AuthFailed(msg.clone()));
                        }
                        tracing::debug!("Login message: {}", msg);
                    }
                }
                tracing::debug!("Login successful (plain method)");
                Ok(())
            }
            Err(RouterError::Trap(msg)) if is_credential_rejection(&msg) => {
                Err(RouterError::AuthFailed(msg))
            }
            Err(RouterError::Trap(msg)) => {
                // The router refused the plain form itself; request a
                // challenge explicitly
                tracing::debug!("Plain login refused ({}), trying legacy method", msg);
                let sentences = self.raw_command(vec!["/login".to_string()]).await?;
                let challenge = sentences
                    .iter()
                    .find_map(|s| s.get("ret"))
                    .cloned()
                    .ok_or_else(|| {
                        RouterError::Protocol("no challenge 'ret' received".to_string())
                    })?;
                self.challenge_login(username, password, &challenge).await
            }
            Err(e) => Err(e),
        }
    }

    async fn challenge_login(
        &mut self,
        username: &str,
        password: &SecretString,
        challenge_hex: &str,
    ) -> Result<(), RouterError> {
        tracing::trace!("Challenge received, length: {}", challenge_hex.len());
        let challenge = hex::decode(challenge_hex)
            .map_err(|e| RouterError::Protocol(format!("bad challenge encoding: {e}")))?;

        // MD5 over 0x00 + password + challenge
        let secret = password.expose_secret();
        let mut data = Vec::with_capacity(1 + secret.len() + challenge.len());
        data.push(0u8);
        data.extend_from_slice(secret.as_bytes());
        data.extend_from_slice(&challenge);
        let digest = md5_compute(&data);
        let mut response = String::from("00");
        response.push_str(&hex::encode(digest.0));

        let outcome = self
            .raw_command(vec![
                "/login".to_string(),
                format!("=name={username}"),
                format!("=response={response}"),
            ])
            .await;

        match outcome {
            Ok(sentences) => {
                for s in &sentences {
                    if let Some(msg) = s.get("message") {
                        if is_credential_rejection(msg) {
                            return Err(RouterError::AuthFailed(msg.clone()));
                        }
                        tracing::warn!("Login message: {}", msg);
                    }
                }
                tracing::debug!("Login successful (legacy method)");
                Ok(())
            }
            Err(RouterError::Trap(msg)) if is_credential_rejection(&msg) => {
                Err(RouterError::AuthFailed(msg))
            }
            Err(e) => Err(e),
        }
    }
}

fn is_credential_rejection(message: &str) -> bool {
    message.contains("invalid") || message.contains("failure") || message.contains("not allowed")
}
