//! Custom chrome around an embedded video player.
//!
//! The embed owns playback; this module only mirrors the embed's state
//! notifications into display state and forwards user controls.

use std::time::{Duration, Instant};

use tracing::debug;

pub const CONTROLS_HIDE_DELAY: Duration = Duration::from_secs(3);
const MAX_VOLUME: u8 = 100;

/// Control surface of the third-party player.
pub trait VideoEmbed: Send {
    fn play(&mut self);
    fn pause(&mut self);
    fn seek(&mut self, seconds: f64);
    fn current_time(&self) -> f64;
    fn duration(&self) -> f64;
    fn set_volume(&mut self, volume: u8);
    fn volume(&self) -> u8;
    fn mute(&mut self);
    fn unmute(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Unstarted,
    Ended,
    Playing,
    Paused,
    Buffering,
}

impl PlaybackState {
    /// Maps the embed's numeric state codes; unknown codes yield `None`.
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            -1 => Some(Self::Unstarted),
            0 => Some(Self::Ended),
            1 => Some(Self::Playing),
            2 => Some(Self::Paused),
            3 => Some(Self::Buffering),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerNotification {
    Ready,
    StateChange(i32),
    Error(i32),
}

pub type ReadyCallback = Box<dyn FnOnce() + Send>;

pub struct PlayerChrome<E: VideoEmbed> {
    embed: E,
    on_ready: Option<ReadyCallback>,
    loaded: bool,
    playing: bool,
    buffering: bool,
    muted: bool,
    volume: u8,
    duration: f64,
    current_time: f64,
    progress: f64,
    tracking: bool,
    show_banner: bool,
    controls_visible: bool,
    hide_controls_at: Option<Instant>,
}

impl<E: VideoEmbed> PlayerChrome<E> {
    pub fn new(embed: E, on_ready: Option<ReadyCallback>) -> Self {
        Self {
            embed,
            on_ready,
            loaded: false,
            playing: false,
            buffering: false,
            muted: false,
            volume: MAX_VOLUME,
            duration: 0.0,
            current_time: 0.0,
            progress: 0.0,
            tracking: false,
            show_banner: true,
            controls_visible: true,
            hide_controls_at: None,
        }
    }

    pub fn embed(&self) -> &E {
        &self.embed
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn is_buffering(&self) -> bool {
        self.buffering
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn volume(&self) -> u8 {
        self.volume
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    /// Playback progress in percent.
    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn is_tracking_progress(&self) -> bool {
        self.tracking
    }

    pub fn shows_banner(&self) -> bool {
        self.show_banner
    }

    pub fn controls_visible(&self) -> bool {
        self.controls_visible
    }

    pub fn notify(&mut self, notification: PlayerNotification) {
        match notification {
            PlayerNotification::Ready => {
                self.loaded = true;
                self.duration = self.embed.duration();
                self.volume = self.embed.volume().min(MAX_VOLUME);
                if let Some(callback) = self.on_ready.take() {
                    callback();
                }
                self.embed.play();
            }
            PlayerNotification::StateChange(code) => match PlaybackState::from_code(code) {
                Some(PlaybackState::Playing) => {
                    self.playing = true;
                    self.buffering = false;
                    self.tracking = true;
                }
                Some(PlaybackState::Paused) => {
                    self.playing = false;
                    self.tracking = false;
                }
                Some(PlaybackState::Ended) => {
                    self.playing = false;
                    self.progress = 100.0;
                    self.tracking = false;
                }
                Some(PlaybackState::Buffering) => self.buffering = true,
                Some(PlaybackState::Unstarted) => {}
                None => debug!(code, "video: unknown player state ignored"),
            },
            PlayerNotification::Error(code) => {
                debug!(code, "video: player reported an error");
                self.loaded = true;
            }
        }
    }

    /// Copies the embed's position into the chrome. Front ends poll this
    /// roughly every 100 ms while playing.
    pub fn poll_progress(&mut self) {
        if !self.tracking {
            return;
        }
        self.current_time = self.embed.current_time();
        let total = self.embed.duration();
        if total > 0.0 {
            self.duration = total;
            self.progress = (self.current_time / total * 100.0).clamp(0.0, 100.0);
        }
    }

    pub fn dismiss_banner(&mut self) {
        self.show_banner = false;
    }

    pub fn toggle_play(&mut self) {
        if self.playing {
            self.embed.pause();
        } else {
            self.embed.play();
        }
    }

    pub fn toggle_mute(&mut self) {
        if self.muted {
            self.embed.unmute();
            self.muted = false;
        } else {
            self.embed.mute();
            self.muted = true;
        }
    }

    pub fn set_volume(&mut self, volume: u8) {
        let volume = volume.min(MAX_VOLUME);
        self.volume = volume;
        self.embed.set_volume(volume);
        if volume == 0 {
            self.embed.mute();
            self.muted = true;
        } else if self.muted {
            self.embed.unmute();
            self.muted = false;
        }
    }

    /// Seeks to a fraction of the duration, e.g. from a click on the bar.
    pub fn seek_fraction(&mut self, fraction: f64) {
        let fraction = if fraction.is_finite() {
            fraction.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let target = fraction * self.duration;
        self.embed.seek(target);
        self.current_time = target;
        self.progress = fraction * 100.0;
    }

    pub fn skip(&mut self, delta_seconds: f64) {
        let target = (self.current_time + delta_seconds).clamp(0.0, self.duration.max(0.0));
        self.embed.seek(target);
    }

    pub fn pointer_moved(&mut self, now: Instant) {
        self.controls_visible = true;
        self.hide_controls_at = self.playing.then(|| now + CONTROLS_HIDE_DELAY);
    }

    pub fn pointer_left(&mut self) {
        if self.playing {
            self.controls_visible = false;
        }
        self.hide_controls_at = None;
    }

    /// Hides the controls once the hide deadline has passed.
    pub fn refresh_controls(&mut self, now: Instant) {
        if let Some(deadline) = self.hide_controls_at {
            if now >= deadline {
                self.controls_visible = false;
                self.hide_controls_at = None;
            }
        }
    }
}

/// Formats seconds as `m:ss`.
pub fn format_time(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!("{}:{:02}", total / 60, total % 60)
}

#[cfg(test)]
#[path = "tests/video_tests.rs"]
mod tests;
