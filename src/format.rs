//! Display labels for menu rows and the reverse lookup from a selected row.
//!
//! Labels double as selection keys, so every builder here must produce rows
//! that stay unique within one screen. Lists that can repeat a title carry a
//! leading ordinal.

use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::config::UIConfig;
use crate::helix::{Clip, LiveStream, Video};

pub const LIVE_TITLE_WIDTH: usize = 40;
pub const CLIP_TITLE_WIDTH: usize = 40;
pub const VIDEO_TITLE_WIDTH: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Icons {
    pub live: String,
    pub bullet: String,
    pub eye: String,
    pub clock: String,
    pub calendar: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Style {
    pub delimiter: String,
    pub icons: Icons,
}

impl Default for Style {
    fn default() -> Self {
        Self::from_config(&UIConfig::default())
    }
}

impl Style {
    pub fn from_config(cfg: &UIConfig) -> Self {
        Self {
            delimiter: cfg.delimiter.clone(),
            icons: Icons {
                live: cfg.live_icon.clone(),
                bullet: cfg.bullet_icon.clone(),
                eye: cfg.eye_icon.clone(),
                clock: cfg.clock_icon.clone(),
                calendar: cfg.calendar_icon.clone(),
            },
        }
    }

    /// `● bob | Speedrun (👁120 viewers | 1h)`
    pub fn live(&self, stream: &LiveStream, now: DateTime<Utc>) -> String {
        format!(
            "{live} {name} {delim} {title} ({eye}{viewers} viewers {delim} {since})",
            live = self.icons.live,
            name = stream.user_name,
            delim = self.delimiter,
            title = truncate(&stream.title, LIVE_TITLE_WIDTH),
            eye = self.icons.eye,
            viewers = stream.viewer_count,
            since = live_since(stream.started_at, now),
        )
    }

    pub fn clip(&self, index: usize, clip: &Clip) -> String {
        format!(
            "{index} {bullet} {title} creator: {creator} ({eye}{views} views {delim} {calendar} {created})",
            bullet = self.icons.bullet,
            title = truncate(&clip.title, CLIP_TITLE_WIDTH),
            creator = clip.creator_name,
            eye = self.icons.eye,
            views = clip.view_count,
            delim = self.delimiter,
            calendar = self.icons.calendar,
            created = clip.created_at,
        )
    }

    pub fn video(&self, index: usize, video: &Video) -> String {
        format!(
            "{index} {bullet} {title} {delim} {clock}{duration} ({eye}{views} views)",
            bullet = self.icons.bullet,
            title = truncate(&video.title, VIDEO_TITLE_WIDTH),
            delim = self.delimiter,
            clock = self.icons.clock,
            duration = video.duration,
            eye = self.icons.eye,
            views = video.view_count,
        )
    }

    pub fn is_live_label(&self, label: &str) -> bool {
        !self.icons.live.is_empty() && label.starts_with(self.icons.live.as_str())
    }

    /// Channel name of a follow row, live-annotated or not.
    pub fn extract_name<'a>(&self, label: &'a str) -> &'a str {
        let bare = if self.is_live_label(label) {
            &label[self.icons.live.len()..]
        } else {
            label
        };
        let head = if self.delimiter.is_empty() {
            bare
        } else {
            bare.split(self.delimiter.as_str()).next().unwrap_or(bare)
        };
        head.trim()
    }
}

/// Ordinal that prefixes clip and video rows.
pub fn extract_index(label: &str) -> Option<usize> {
    label.split_whitespace().next()?.parse().ok()
}

/// Hard cut after `width` characters.
pub fn truncate(text: &str, width: usize) -> &str {
    match text.char_indices().nth(width) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// How long a stream has been running, at minute precision once past the
/// first minute. Future start times render as `0s`.
pub fn live_since(started_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - started_at).num_seconds().max(0) as u64;
    let rounded = if secs < 60 { secs } else { secs - secs % 60 };
    humantime::format_duration(Duration::from_secs(rounded)).to_string()
}
