use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use once_cell::sync::OnceCell;
use tracing::debug;

use crate::helix::{self, BroadcasterInfo, Clip, Follow, LiveStream, Video};

/// Everything the navigator reads from Twitch. An empty collection means
/// "no results" and is never an error.
pub trait ChannelService: Send + Sync {
    fn follows(&self) -> Result<Vec<Follow>>;
    /// Followed channels that are broadcasting right now.
    fn live_streams(&self) -> Result<Vec<LiveStream>>;
    fn channel_info(&self, user_id: &str) -> Result<Option<BroadcasterInfo>>;
    fn is_live(&self, user_id: &str) -> Result<bool>;
    fn clips(&self, broadcaster_id: &str) -> Result<Vec<Clip>>;
    fn videos(&self, user_id: &str) -> Result<Vec<Video>>;
}

pub struct HelixChannelService {
    client: Arc<helix::Client>,
    user_id: OnceCell<String>,
}

impl HelixChannelService {
    /// `user_id` may be empty, in which case it is resolved from the token
    /// on first use.
    pub fn new(client: Arc<helix::Client>, user_id: &str) -> Self {
        let cell = OnceCell::new();
        if !user_id.trim().is_empty() {
            let _ = cell.set(user_id.trim().to_string());
        }
        Self {
            client,
            user_id: cell,
        }
    }

    fn user_id(&self) -> Result<&str> {
        let id = self.user_id.get_or_try_init(|| {
            let user = self
                .client
                .current_user()
                .context("resolve user from access token")?
                .ok_or_else(|| anyhow!("access token does not belong to a user"))?;
            debug!(user = %user.login, id = %user.id, "resolved token owner");
            Ok::<_, anyhow::Error>(user.id)
        })?;
        Ok(id.as_str())
    }
}

impl ChannelService for HelixChannelService {
    fn follows(&self) -> Result<Vec<Follow>> {
        let user_id = self.user_id()?;
        debug!(user_id, "fetching follows");
        self.client
            .followed_channels(user_id)
            .context("fetch followed channels")
    }

    fn live_streams(&self) -> Result<Vec<LiveStream>> {
        let user_id = self.user_id()?;
        debug!(user_id, "fetching live followed streams");
        self.client
            .followed_streams(user_id)
            .context("fetch live followed streams")
    }

    fn channel_info(&self, user_id: &str) -> Result<Option<BroadcasterInfo>> {
        debug!(user_id, "fetching channel information");
        self.client
            .channel(user_id)
            .context("fetch channel information")
    }

    fn is_live(&self, user_id: &str) -> Result<bool> {
        let stream = self
            .client
            .stream(user_id)
            .context("fetch channel stream status")?;
        Ok(stream.is_some())
    }

    fn clips(&self, broadcaster_id: &str) -> Result<Vec<Clip>> {
        debug!(broadcaster_id, "fetching clips");
        self.client.clips(broadcaster_id).context("fetch clips")
    }

    fn videos(&self, user_id: &str) -> Result<Vec<Video>> {
        debug!(user_id, "fetching videos");
        self.client.videos(user_id).context("fetch videos")
    }
}
