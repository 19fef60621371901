//! Screen-by-screen navigation over followed channels.
//!
//! Every screen is a function from its arguments to the next [`Screen`].
//! Staying on a screen means returning it again, going back means returning
//! the `back` descriptor the screen was entered with, so the driver loop in
//! [`Navigator::run`] never grows the stack however long a session runs.

use std::collections::HashMap;
use std::thread;

use anyhow::{anyhow, bail, Context, Result};
use chrono::Utc;
use once_cell::unsync::OnceCell;
use tracing::{debug, info, warn};
use unicode_width::UnicodeWidthStr;
use url::Url;

use crate::data::ChannelService;
use crate::error::Error;
use crate::executor::Effects;
use crate::format::{self, Style};
use crate::helix::{BroadcasterInfo, Clip, Follow, LiveStream, Video};
use crate::live;
use crate::menu::Launcher;
use crate::select::{Gate, MenuOptions, Picked, Prompt};

const TWITCH_TV: &str = "https://www.twitch.tv/";

/// Which follows the follows screen lists and what picking one does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Browse {
    /// Every follow, live ones annotated. Picking opens the channel info.
    All,
    /// Only live follows. Picking plays the stream.
    Live,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    Root,
    Follows {
        browse: Browse,
        back: Box<Screen>,
    },
    Info {
        user_id: String,
        back: Box<Screen>,
    },
    Videos {
        channel: BroadcasterInfo,
        back: Box<Screen>,
    },
    Clips {
        channel: BroadcasterInfo,
        clips: Option<Vec<Clip>>,
        back: Box<Screen>,
    },
}

impl Screen {
    pub fn name(&self) -> &'static str {
        match self {
            Screen::Root => "root",
            Screen::Follows { browse: Browse::All, .. } => "follows",
            Screen::Follows { browse: Browse::Live, .. } => "live",
            Screen::Info { .. } => "info",
            Screen::Videos { .. } => "videos",
            Screen::Clips { .. } => "clips",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InfoAction {
    Refresh,
    PlayLive,
    LastStream,
    Videos,
    Clips,
}

pub struct Navigator<'a> {
    api: &'a dyn ChannelService,
    gate: Gate<'a>,
    effects: &'a dyn Effects,
    style: Style,
    twitch_tv: Url,
    follows: OnceCell<Vec<Follow>>,
}

impl<'a> Navigator<'a> {
    pub fn new(
        api: &'a dyn ChannelService,
        launcher: &'a dyn Launcher,
        effects: &'a dyn Effects,
        style: Style,
    ) -> Result<Self> {
        Ok(Self {
            api,
            gate: Gate::new(launcher),
            effects,
            style,
            twitch_tv: Url::parse(TWITCH_TV)?,
            follows: OnceCell::new(),
        })
    }

    /// Runs until a screen fails. Esc on a list fails with
    /// [`Error::Dismissed`], Ctrl-C anywhere with [`Error::Interrupted`].
    pub fn run(&self) -> Result<()> {
        let mut screen = Screen::Root;
        loop {
            screen = self.step(screen)?;
        }
    }

    pub fn step(&self, screen: Screen) -> Result<Screen> {
        debug!(screen = screen.name(), "entering screen");
        match screen {
            Screen::Root => self.root(),
            Screen::Follows { browse, back } => self.follows(browse, *back),
            Screen::Info { user_id, back } => self.info(user_id, *back),
            Screen::Videos { channel, back } => self.videos(channel, *back),
            Screen::Clips {
                channel,
                clips,
                back,
            } => self.clips(channel, clips, *back),
        }
    }

    fn root(&self) -> Result<Screen> {
        let bullet = &self.style.icons.bullet;
        let mut options = MenuOptions::new();
        options.push(format!("{bullet} All follows"), Browse::All);
        options.push(format!("{bullet} Live followed"), Browse::Live);

        let prompt = Prompt {
            prompt: "twitch:",
            mesg: "",
            back: false,
        };
        Ok(match self.gate.choose(&options, prompt)? {
            Some(browse) => Screen::Follows {
                browse,
                back: Box::new(Screen::Root),
            },
            None => Screen::Root,
        })
    }

    /// Fetched once per run.
    fn user_follows(&self) -> Result<&[Follow]> {
        self.follows
            .get_or_try_init(|| self.api.follows())
            .map(Vec::as_slice)
    }

    // Liveness is never cached; the two reads are independent so they overlap.
    fn follows_with_live(&self) -> Result<(&[Follow], Vec<LiveStream>)> {
        let api = self.api;
        thread::scope(|scope| {
            let live = scope.spawn(move || api.live_streams());
            let follows = self.user_follows();
            let live = match live.join() {
                Ok(result) => result,
                Err(panic) => std::panic::resume_unwind(panic),
            };
            Ok((follows?, live?))
        })
    }

    fn follows(&self, browse: Browse, back: Screen) -> Result<Screen> {
        let (follows, live) = self.follows_with_live()?;
        let by_name: HashMap<&str, &Follow> = follows
            .iter()
            .map(|follow| (follow.to_name.as_str(), follow))
            .collect();
        let mut names: Vec<String> = by_name.keys().map(|name| name.to_string()).collect();
        names.sort();
        let merged = live::merge(names, &live, &self.style, Utc::now());

        let bullet = &self.style.icons.bullet;
        let (items, prompt, mesg, empty) = match browse {
            Browse::All => (
                merged,
                "twitch follows:",
                format!("{bullet} Offline and Online channels"),
                "No followed channels",
            ),
            Browse::Live => (
                merged
                    .into_iter()
                    .filter(|label| self.style.is_live_label(label))
                    .collect::<Vec<_>>(),
                "twitch live:",
                format!("{bullet} Online channels"),
                "No online followed channels",
            ),
        };

        if items.is_empty() {
            self.no_results(empty)?;
            return Ok(back);
        }

        let prompt = Prompt {
            prompt,
            mesg: &mesg,
            back: true,
        };
        let label = match self.gate.present(&items, prompt)? {
            Picked::Back => return Ok(back),
            Picked::Item(label) => label,
        };
        let follow = by_name
            .get(self.style.extract_name(&label))
            .copied()
            .ok_or_else(|| anyhow!(Error::InvalidSelection(label.clone())))?;

        let this = Screen::Follows {
            browse,
            back: Box::new(back),
        };
        match browse {
            Browse::All => Ok(Screen::Info {
                user_id: follow.to_id.clone(),
                back: Box::new(this),
            }),
            Browse::Live => {
                let path = if follow.to_login.is_empty() {
                    &follow.to_name
                } else {
                    &follow.to_login
                };
                self.play_stream(path)?;
                Ok(this)
            }
        }
    }

    fn info(&self, user_id: String, back: Screen) -> Result<Screen> {
        let Some(channel) = self.api.channel_info(&user_id)? else {
            self.no_results(&format!("No information for channel id: {user_id}"))?;
            return Ok(back);
        };
        let live = self.api.is_live(&user_id)?;

        let mut options = MenuOptions::new();
        options.push(format!("Category: {}", channel.game_name), InfoAction::Refresh);
        let (stream_line, stream_action) = if live {
            let line = format!("{} Live Stream: {}", self.style.icons.live, channel.title);
            (line, InfoAction::PlayLive)
        } else {
            (format!("Last Stream: {}", channel.title), InfoAction::LastStream)
        };
        let separator = "-".repeat(stream_line.width());
        options.push(stream_line, stream_action);
        options.push(separator, InfoAction::Refresh);
        options.push("Videos: Get videos", InfoAction::Videos);
        options.push("Clips: Get clips", InfoAction::Clips);

        let prompt_text = format!("{} info:", channel.broadcaster_name);
        let mesg = format!("Channel {} information", channel.broadcaster_name);
        let prompt = Prompt {
            prompt: &prompt_text,
            mesg: &mesg,
            back: true,
        };
        let Some(action) = self.gate.choose(&options, prompt)? else {
            return Ok(back);
        };

        let this = Screen::Info {
            user_id,
            back: Box::new(back),
        };
        match action {
            // Decorative rows redraw the screen with fresh data.
            InfoAction::Refresh => Ok(this),
            InfoAction::PlayLive => {
                self.play_stream(channel.channel_path())?;
                Ok(this)
            }
            InfoAction::LastStream => bail!(Error::Unsupported("playing the last stream")),
            InfoAction::Videos => Ok(Screen::Videos {
                channel,
                back: Box::new(this),
            }),
            InfoAction::Clips => Ok(Screen::Clips {
                channel,
                clips: None,
                back: Box::new(this),
            }),
        }
    }

    fn videos(&self, channel: BroadcasterInfo, back: Screen) -> Result<Screen> {
        let videos = self.api.videos(&channel.broadcaster_id)?;
        let render = |idx: usize, video: &Video| self.style.video(idx, video);
        let Some(video) = self.pick_indexed(&videos, render, "videos", &channel)? else {
            return Ok(back);
        };
        self.play_video(video)?;
        Ok(Screen::Videos {
            channel,
            back: Box::new(back),
        })
    }

    fn clips(&self, channel: BroadcasterInfo, cached: Option<Vec<Clip>>, back: Screen) -> Result<Screen> {
        let clips = match cached {
            Some(clips) if !clips.is_empty() => clips,
            _ => {
                debug!(channel = %channel.broadcaster_name, "getting clips");
                self.api.clips(&channel.broadcaster_id)?
            }
        };
        let render = |idx: usize, clip: &Clip| self.style.clip(idx, clip);
        let Some(clip) = self.pick_indexed(&clips, render, "clips", &channel)? else {
            return Ok(back);
        };
        self.play_clip(clip);
        Ok(Screen::Clips {
            channel,
            clips: Some(clips),
            back: Box::new(back),
        })
    }

    /// Lists `records` as numbered rows. `None` means leave the screen, either
    /// because there was nothing to list or the user went back.
    fn pick_indexed<'r, T>(
        &self,
        records: &'r [T],
        render: impl Fn(usize, &T) -> String,
        what: &str,
        channel: &BroadcasterInfo,
    ) -> Result<Option<&'r T>> {
        let name = &channel.broadcaster_name;
        if records.is_empty() {
            self.no_results(&format!("No available {what} from followed channel: {name}"))?;
            return Ok(None);
        }

        let items: Vec<String> = records
            .iter()
            .enumerate()
            .map(|(idx, record)| render(idx, record))
            .collect();
        let prompt_text = format!("{name} {what}:");
        let mesg = format!("Showing {} {what}", records.len());
        let prompt = Prompt {
            prompt: &prompt_text,
            mesg: &mesg,
            back: true,
        };
        let label = match self.gate.present(&items, prompt)? {
            Picked::Back => return Ok(None),
            Picked::Item(label) => label,
        };
        format::extract_index(&label)
            .and_then(|idx| records.get(idx))
            .map(Some)
            .ok_or_else(|| anyhow!(Error::InvalidSelection(label)))
    }

    fn no_results(&self, message: &str) -> Result<()> {
        warn!("{message}");
        self.gate.notice(message)
    }

    fn play_stream(&self, channel: &str) -> Result<()> {
        let url = self
            .twitch_tv
            .join(channel)
            .with_context(|| format!("build stream url for {channel}"))?;
        info!(stream = channel, "opening stream");
        self.effects
            .notify(&format!("Opening stream <b>{channel}</b>"));
        self.effects.launch(url.as_str());
        Ok(())
    }

    fn play_video(&self, video: &Video) -> Result<()> {
        let url = self
            .twitch_tv
            .join(&video.url)
            .with_context(|| format!("build video url for {}", video.url))?;
        info!(video = format::truncate(&video.title, 40), "opening video");
        self.effects
            .notify(&format!("Opening video <b>{}</b>", video.title));
        self.effects.launch(url.as_str());
        Ok(())
    }

    fn play_clip(&self, clip: &Clip) {
        info!(clip = format::truncate(&clip.title, 40), "opening clip");
        self.effects.notify(&format!(
            "Opening clip <b>{}@{}</b>",
            clip.broadcaster_name, clip.title
        ));
        self.effects.launch(&clip.url);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::select::tests::ScriptedLauncher;
    use chrono::Duration;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct FakeService {
        follows: Vec<Follow>,
        live: Vec<LiveStream>,
        channels: Vec<(BroadcasterInfo, bool)>,
        clips: Vec<Clip>,
        videos: Vec<Video>,
        calls: Mutex<Vec<String>>,
    }

    impl FakeService {
        fn record(&self, call: String) {
            self.calls.lock().push(call);
        }

        fn count(&self, op: &str) -> usize {
            self.calls
                .lock()
                .iter()
                .filter(|call| call.split(':').next() == Some(op))
                .count()
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().clone()
        }
    }

    impl ChannelService for FakeService {
        fn follows(&self) -> Result<Vec<Follow>> {
            self.record("follows".into());
            Ok(self.follows.clone())
        }

        fn live_streams(&self) -> Result<Vec<LiveStream>> {
            self.record("live".into());
            Ok(self.live.clone())
        }

        fn channel_info(&self, user_id: &str) -> Result<Option<BroadcasterInfo>> {
            self.record(format!("info:{user_id}"));
            Ok(self
                .channels
                .iter()
                .find(|(c, _)| c.broadcaster_id == user_id)
                .map(|(c, _)| c.clone()))
        }

        fn is_live(&self, user_id: &str) -> Result<bool> {
            self.record(format!("is_live:{user_id}"));
            Ok(self
                .channels
                .iter()
                .any(|(c, live)| c.broadcaster_id == user_id && *live))
        }

        fn clips(&self, broadcaster_id: &str) -> Result<Vec<Clip>> {
            self.record(format!("clips:{broadcaster_id}"));
            Ok(self.clips.clone())
        }

        fn videos(&self, user_id: &str) -> Result<Vec<Video>> {
            self.record(format!("videos:{user_id}"));
            Ok(self.videos.clone())
        }
    }

    #[derive(Default)]
    struct RecordingEffects {
        notified: Mutex<Vec<String>>,
        launched: Mutex<Vec<String>>,
    }

    impl Effects for RecordingEffects {
        fn notify(&self, message: &str) {
            self.notified.lock().push(message.to_string());
        }

        fn launch(&self, target: &str) {
            self.launched.lock().push(target.to_string());
        }
    }

    fn follow(id: &str, name: &str) -> Follow {
        Follow {
            to_id: id.into(),
            to_login: name.to_lowercase(),
            to_name: name.into(),
            followed_at: None,
        }
    }

    fn stream(name: &str) -> LiveStream {
        LiveStream {
            user_id: String::new(),
            user_login: name.into(),
            user_name: name.into(),
            game_name: "Chess".into(),
            title: "Speedrun".into(),
            viewer_count: 120,
            started_at: Utc::now() - Duration::hours(1),
        }
    }

    fn channel(id: &str, name: &str) -> BroadcasterInfo {
        BroadcasterInfo {
            broadcaster_id: id.into(),
            broadcaster_login: name.to_lowercase(),
            broadcaster_name: name.into(),
            game_name: "Chess".into(),
            title: "Blitz".into(),
        }
    }

    fn clip(title: &str) -> Clip {
        Clip {
            url: format!("https://clips.twitch.tv/{title}"),
            broadcaster_name: "Chan".into(),
            title: title.into(),
            ..Clip::default()
        }
    }

    fn root_back() -> Box<Screen> {
        Box::new(Screen::Follows {
            browse: Browse::All,
            back: Box::new(Screen::Root),
        })
    }

    fn info_42() -> Screen {
        Screen::Info {
            user_id: "42".into(),
            back: root_back(),
        }
    }

    struct Harness {
        api: FakeService,
        launcher: ScriptedLauncher,
        effects: RecordingEffects,
    }

    impl Harness {
        fn new(api: FakeService, replies: &[&str]) -> Self {
            Self {
                api,
                launcher: ScriptedLauncher::new(replies),
                effects: RecordingEffects::default(),
            }
        }

        fn nav(&self) -> Navigator<'_> {
            Navigator::new(&self.api, &self.launcher, &self.effects, Style::default()).unwrap()
        }
    }

    #[test]
    fn root_offers_both_follow_views() {
        let h = Harness::new(FakeService::default(), &["#1"]);
        let next = h.nav().step(Screen::Root).unwrap();
        assert_eq!(
            next,
            Screen::Follows {
                browse: Browse::Live,
                back: Box::new(Screen::Root),
            }
        );
        assert_eq!(
            h.launcher.screen(0),
            vec!["• All follows".to_string(), "• Live followed".to_string()]
        );
    }

    #[test]
    fn unknown_reply_ends_navigation() {
        let h = Harness::new(FakeService::default(), &["z", ""]);
        let err = h.nav().run().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::InvalidSelection(z)) if z == "z"
        ));
        assert_eq!(
            h.launcher.screen(1),
            vec!["Option 'z' selected not found.".to_string()]
        );
    }

    #[test]
    fn escape_on_a_list_ends_navigation() {
        let h = Harness::new(FakeService::default(), &[]);
        let err = h.nav().run().unwrap_err();
        assert!(matches!(err.downcast_ref::<Error>(), Some(Error::Dismissed)));
    }

    #[test]
    fn ctrl_c_on_a_no_results_notice_unwinds_the_run() {
        let h = Harness::new(FakeService::default(), &["#0", "^C", "#1"]);
        let err = h.nav().run().unwrap_err();
        assert!(matches!(err.downcast_ref::<Error>(), Some(Error::Interrupted)));
        assert_eq!(h.launcher.prompts(), vec!["twitch:", "twitch:"]);
        assert_eq!(h.launcher.screen(1), vec!["No followed channels".to_string()]);
    }

    #[test]
    fn ctrl_c_on_the_empty_clips_notice_does_not_fall_back() {
        let h = Harness::new(FakeService::default(), &["^C"]);
        let err = h
            .nav()
            .step(Screen::Clips {
                channel: channel("42", "Chan"),
                clips: None,
                back: Box::new(info_42()),
            })
            .unwrap_err();
        assert!(matches!(err.downcast_ref::<Error>(), Some(Error::Interrupted)));
    }

    #[test]
    fn follows_are_sorted_merged_and_fetched_once() {
        let api = FakeService {
            follows: vec![follow("2", "bob"), follow("3", "carol"), follow("1", "alice")],
            live: vec![stream("bob")],
            ..FakeService::default()
        };
        let h = Harness::new(api, &["alice", "#1"]);
        let nav = h.nav();
        let screen = Screen::Follows {
            browse: Browse::All,
            back: Box::new(Screen::Root),
        };

        let next = nav.step(screen.clone()).unwrap();
        assert_eq!(
            next,
            Screen::Info {
                user_id: "1".into(),
                back: Box::new(screen.clone()),
            }
        );
        let items = h.launcher.screen(0);
        assert_eq!(items.len(), 3);
        assert_eq!(items[0], "alice");
        assert!(items[1].starts_with("● bob | Speedrun (👁120 viewers | 1h"), "{}", items[1]);
        assert_eq!(items[2], "carol");

        // A live-annotated pick resolves to the bare follow.
        let next = nav.step(screen.clone()).unwrap();
        assert_eq!(
            next,
            Screen::Info {
                user_id: "2".into(),
                back: Box::new(screen),
            }
        );
        assert_eq!(h.api.count("follows"), 1);
        assert_eq!(h.api.count("live"), 2);
    }

    #[test]
    fn live_view_plays_and_stays() {
        let api = FakeService {
            follows: vec![follow("1", "alice"), follow("2", "Bob")],
            live: vec![stream("Bob")],
            ..FakeService::default()
        };
        let h = Harness::new(api, &["#0"]);
        let screen = Screen::Follows {
            browse: Browse::Live,
            back: Box::new(Screen::Root),
        };
        let next = h.nav().step(screen.clone()).unwrap();
        assert_eq!(next, screen);
        assert_eq!(h.launcher.screen(0).len(), 1);
        assert_eq!(*h.effects.launched.lock(), vec!["https://www.twitch.tv/bob".to_string()]);
        assert_eq!(*h.effects.notified.lock(), vec!["Opening stream <b>bob</b>".to_string()]);
    }

    #[test]
    fn live_view_without_streams_returns_to_root() {
        let api = FakeService {
            follows: vec![follow("1", "alice")],
            ..FakeService::default()
        };
        let h = Harness::new(api, &[""]);
        let next = h
            .nav()
            .step(Screen::Follows {
                browse: Browse::Live,
                back: Box::new(Screen::Root),
            })
            .unwrap();
        assert_eq!(next, Screen::Root);
        assert_eq!(h.launcher.screen(0), vec!["No online followed channels".to_string()]);
    }

    #[test]
    fn info_lists_channel_rows_in_order() {
        let api = FakeService {
            channels: vec![(channel("42", "Chan"), false)],
            ..FakeService::default()
        };
        let h = Harness::new(api, &["Category: Chess"]);
        let next = h.nav().step(info_42()).unwrap();
        assert_eq!(next, info_42());
        assert_eq!(
            h.launcher.screen(0),
            vec![
                "Category: Chess".to_string(),
                "Last Stream: Blitz".to_string(),
                "------------------".to_string(),
                "Videos: Get videos".to_string(),
                "Clips: Get clips".to_string(),
            ]
        );
        assert_eq!(h.launcher.prompts(), vec!["Chan info:".to_string()]);
    }

    #[test]
    fn info_last_stream_is_unsupported() {
        let api = FakeService {
            channels: vec![(channel("42", "Chan"), false)],
            ..FakeService::default()
        };
        let h = Harness::new(api, &["Last Stream: Blitz"]);
        let err = h.nav().step(info_42()).unwrap_err();
        assert!(matches!(err.downcast_ref::<Error>(), Some(Error::Unsupported(_))));
    }

    #[test]
    fn info_live_row_plays_and_stays() {
        let api = FakeService {
            channels: vec![(channel("42", "Chan"), true)],
            ..FakeService::default()
        };
        let h = Harness::new(api, &["● Live Stream: Blitz"]);
        let next = h.nav().step(info_42()).unwrap();
        assert_eq!(next, info_42());
        assert_eq!(*h.effects.launched.lock(), vec!["https://www.twitch.tv/chan".to_string()]);
    }

    #[test]
    fn info_back_returns_to_follows() {
        let api = FakeService {
            channels: vec![(channel("42", "Chan"), false)],
            ..FakeService::default()
        };
        let h = Harness::new(api, &["<back>"]);
        let next = h.nav().step(info_42()).unwrap();
        assert_eq!(next, *root_back());
    }

    #[test]
    fn backing_out_of_videos_redraws_the_same_info() {
        let api = FakeService {
            channels: vec![(channel("7", "Other"), false), (channel("42", "Chan"), false)],
            videos: vec![Video {
                title: "vod".into(),
                url: "https://www.twitch.tv/videos/1".into(),
                ..Video::default()
            }],
            ..FakeService::default()
        };
        let h = Harness::new(api, &["Videos: Get videos", "<back>", "Category: Chess"]);
        let nav = h.nav();

        let videos = nav.step(info_42()).unwrap();
        assert_eq!(videos.name(), "videos");
        let back = nav.step(videos).unwrap();
        assert_eq!(back, info_42());
        nav.step(back).unwrap();

        assert_eq!(
            h.api.calls(),
            vec!["info:42", "is_live:42", "videos:42", "info:42", "is_live:42"]
        );
    }

    #[test]
    fn playing_a_video_reenters_videos() {
        let chan = channel("42", "Chan");
        let api = FakeService {
            videos: vec![Video {
                title: "vod".into(),
                url: "https://www.twitch.tv/videos/1".into(),
                ..Video::default()
            }],
            ..FakeService::default()
        };
        let h = Harness::new(api, &["#0"]);
        let screen = Screen::Videos {
            channel: chan,
            back: Box::new(info_42()),
        };
        let next = h.nav().step(screen.clone()).unwrap();
        assert_eq!(next, screen);
        assert_eq!(
            *h.effects.launched.lock(),
            vec!["https://www.twitch.tv/videos/1".to_string()]
        );
    }

    #[test]
    fn empty_clips_fall_back_to_info_without_prompting() {
        let h = Harness::new(FakeService::default(), &[""]);
        let next = h
            .nav()
            .step(Screen::Clips {
                channel: channel("42", "Chan"),
                clips: None,
                back: Box::new(info_42()),
            })
            .unwrap();
        assert_eq!(next, info_42());
        let shown = h.launcher.shown.lock().clone();
        assert_eq!(shown.len(), 1);
        assert_eq!(
            shown[0].1,
            vec!["No available clips from followed channel: Chan".to_string()]
        );
        assert!(!shown[0].2);
    }

    #[test]
    fn clips_are_fetched_once_per_clips_session() {
        let api = FakeService {
            clips: vec![clip("first"), clip("second")],
            ..FakeService::default()
        };
        let h = Harness::new(api, &["#0", "#1"]);
        let nav = h.nav();

        let screen = Screen::Clips {
            channel: channel("42", "Chan"),
            clips: None,
            back: Box::new(info_42()),
        };
        let again = nav.step(screen).unwrap();
        assert!(matches!(&again, Screen::Clips { clips: Some(c), .. } if c.len() == 2));
        let again = nav.step(again).unwrap();
        assert_eq!(again.name(), "clips");

        assert_eq!(h.api.count("clips"), 1);
        assert_eq!(
            *h.effects.launched.lock(),
            vec![
                "https://clips.twitch.tv/first".to_string(),
                "https://clips.twitch.tv/second".to_string(),
            ]
        );
        assert_eq!(
            h.effects.notified.lock()[0],
            "Opening clip <b>Chan@first</b>"
        );
    }
}
