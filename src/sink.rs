//! Outbound message boundary.
//!
//! Core modules never touch the chat connection directly; they are handed a
//! [`MessageSink`] at construction. The one real implementation posts through
//! the Discord HTTP API, tests swap in recording mocks.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use log::debug;
use serenity::http::Http;
use serenity::model::id::ChannelId;

/// Anything that can push a line of text toward a destination.
#[async_trait]
pub trait MessageSink: Send + Sync {
    /// Deliver `text` addressed to `destination`, an opaque requester id.
    async fn send(&self, destination: &str, text: &str) -> Result<()>;
}

/// Sink that posts into one fixed Discord channel, mentioning the requester
/// when the destination looks like a numeric user id.
pub struct DiscordSink {
    http: Arc<Http>,
    channel_id: ChannelId,
}

impl DiscordSink {
    pub fn new(http: Arc<Http>, channel_id: ChannelId) -> Self {
        DiscordSink { http, channel_id }
    }
}

#[async_trait]
impl MessageSink for DiscordSink {
    async fn send(&self, destination: &str, text: &str) -> Result<()> {
        let is_user_id =
            !destination.is_empty() && destination.chars().all(|c| c.is_ascii_digit());
        let content = if is_user_id {
            format!("<@{destination}> {text}")
        } else {
            format!("{destination}: {text}")
        };

        self.channel_id.say(&self.http, content).await?;
        debug!(
            "Delivered message for {destination} via channel {}",
            self.channel_id
        );
        Ok(())
    }
}
