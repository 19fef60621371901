use std::time::Duration;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use reqwest::blocking::Client as HttpClient;
use reqwest::header::{AUTHORIZATION, USER_AGENT};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::error::Error;

pub const HELIX_API_BASE: &str = "https://api.twitch.tv/helix/";

#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    pub client_id: String,
    pub access_token: String,
    pub base_url: Option<String>,
    pub timeout: Option<Duration>,
    pub page_size: u32,
    pub http_client: Option<HttpClient>,
}

pub struct Client {
    http: HttpClient,
    client_id: String,
    access_token: String,
    base_url: Url,
    page_size: u32,
}

/// Envelope shared by every Helix list endpoint.
#[derive(Debug, Deserialize)]
struct Page<T> {
    #[serde(default = "Vec::new")]
    data: Vec<T>,
    #[serde(default)]
    pagination: Pagination,
}

#[derive(Debug, Deserialize, Default)]
struct Pagination {
    #[serde(default)]
    cursor: Option<String>,
}

impl Client {
    pub fn new(config: ClientConfig) -> Result<Self> {
        if config.client_id.trim().is_empty() {
            bail!(Error::Missing("twitch.client_id".into()));
        }
        let base = config
            .base_url
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| HELIX_API_BASE.to_string());
        let base_url = Url::parse(&normalize_base(&base))
            .with_context(|| format!("parse helix base url {base:?}"))?;
        let http = match config.http_client {
            Some(client) => client,
            None => HttpClient::builder()
                .timeout(config.timeout.unwrap_or(Duration::from_secs(20)))
                .build()?,
        };

        Ok(Client {
            http,
            client_id: config.client_id,
            access_token: config.access_token,
            base_url,
            page_size: config.page_size.clamp(1, 100),
        })
    }

    pub fn current_user(&self) -> Result<Option<User>> {
        let page: Page<User> = self.get("users", &[])?;
        Ok(page.data.into_iter().next())
    }

    pub fn followed_channels(&self, user_id: &str) -> Result<Vec<Follow>> {
        self.get_all("channels/followed", &[("user_id", user_id.to_string())])
    }

    pub fn followed_streams(&self, user_id: &str) -> Result<Vec<LiveStream>> {
        self.get_all("streams/followed", &[("user_id", user_id.to_string())])
    }

    pub fn channel(&self, broadcaster_id: &str) -> Result<Option<BroadcasterInfo>> {
        let page: Page<BroadcasterInfo> =
            self.get("channels", &[("broadcaster_id", broadcaster_id.to_string())])?;
        Ok(page.data.into_iter().next())
    }

    pub fn stream(&self, user_id: &str) -> Result<Option<LiveStream>> {
        let page: Page<LiveStream> = self.get("streams", &[("user_id", user_id.to_string())])?;
        Ok(page.data.into_iter().next())
    }

    pub fn clips(&self, broadcaster_id: &str) -> Result<Vec<Clip>> {
        let page: Page<Clip> = self.get(
            "clips",
            &[
                ("broadcaster_id", broadcaster_id.to_string()),
                ("first", self.page_size.to_string()),
            ],
        )?;
        Ok(page.data)
    }

    pub fn videos(&self, user_id: &str) -> Result<Vec<Video>> {
        let page: Page<Video> = self.get(
            "videos",
            &[
                ("user_id", user_id.to_string()),
                ("first", self.page_size.to_string()),
            ],
        )?;
        Ok(page.data)
    }

    fn get_all<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<Vec<T>> {
        let mut items = Vec::new();
        let mut cursor: Option<String> = None;
        loop {
            let mut params = query.to_vec();
            params.push(("first", self.page_size.to_string()));
            if let Some(after) = cursor.take() {
                params.push(("after", after));
            }
            let page: Page<T> = self.get(path, &params)?;
            let fetched = page.data.len();
            items.extend(page.data);
            match page.pagination.cursor {
                Some(next) if !next.is_empty() && fetched > 0 => cursor = Some(next),
                _ => break,
            }
        }
        Ok(items)
    }

    fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<Page<T>> {
        let url = self
            .base_url
            .join(path)
            .with_context(|| format!("build helix url for {path}"))?;
        debug!(%url, ?query, "helix request");

        let response = self
            .http
            .get(url)
            .query(query)
            .header("Client-Id", &self.client_id)
            .header(AUTHORIZATION, format!("Bearer {}", self.access_token))
            .header(USER_AGENT, format!("twitch-menu/{}", crate::VERSION))
            .send()
            .with_context(|| format!("request helix {path}"))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            bail!(Error::Api {
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .text()
            .with_context(|| format!("read helix {path} response"))?;
        parse_page(&body).with_context(|| format!("decode helix {path} response"))
    }
}

fn parse_page<T: DeserializeOwned>(body: &str) -> Result<Page<T>> {
    Ok(serde_json::from_str(body)?)
}

// `Url::join` drops the last segment unless the base ends with a slash.
fn normalize_base(base: &str) -> String {
    if base.ends_with('/') {
        base.to_string()
    } else {
        format!("{base}/")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub login: String,
    #[serde(default)]
    pub display_name: String,
}

/// A channel the user follows.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Follow {
    #[serde(rename = "broadcaster_id")]
    pub to_id: String,
    #[serde(rename = "broadcaster_login", default)]
    pub to_login: String,
    #[serde(rename = "broadcaster_name", default)]
    pub to_name: String,
    #[serde(default)]
    pub followed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct BroadcasterInfo {
    pub broadcaster_id: String,
    #[serde(default)]
    pub broadcaster_login: String,
    #[serde(default)]
    pub broadcaster_name: String,
    #[serde(default)]
    pub game_name: String,
    #[serde(default)]
    pub title: String,
}

impl BroadcasterInfo {
    /// The path segment of the channel page on twitch.tv.
    pub fn channel_path(&self) -> &str {
        if self.broadcaster_login.is_empty() {
            &self.broadcaster_name
        } else {
            &self.broadcaster_login
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LiveStream {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub user_login: String,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub game_name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub viewer_count: u64,
    pub started_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Clip {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub broadcaster_name: String,
    #[serde(default)]
    pub creator_name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub view_count: u64,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub duration: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Video {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub view_count: u64,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub duration: String,
}
