use super::*;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

#[derive(Default)]
struct FakeEmbed {
    plays: usize,
    pauses: usize,
    seeks: Vec<f64>,
    position: f64,
    length: f64,
    volume: u8,
    muted: bool,
}

impl VideoEmbed for FakeEmbed {
    fn play(&mut self) {
        self.plays += 1;
    }
    fn pause(&mut self) {
        self.pauses += 1;
    }
    fn seek(&mut self, seconds: f64) {
        self.seeks.push(seconds);
        self.position = seconds;
    }
    fn current_time(&self) -> f64 {
        self.position
    }
    fn duration(&self) -> f64 {
        self.length
    }
    fn set_volume(&mut self, volume: u8) {
        self.volume = volume;
    }
    fn volume(&self) -> u8 {
        self.volume
    }
    fn mute(&mut self) {
        self.muted = true;
    }
    fn unmute(&mut self) {
        self.muted = false;
    }
}

fn ready_chrome() -> PlayerChrome<FakeEmbed> {
    let embed = FakeEmbed {
        length: 200.0,
        volume: 80,
        ..FakeEmbed::default()
    };
    let mut chrome = PlayerChrome::new(embed, None);
    chrome.notify(PlayerNotification::Ready);
    chrome
}

#[test]
fn ready_invokes_owned_callback_once_and_starts_playback() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let embed = FakeEmbed {
        length: 120.0,
        volume: 70,
        ..FakeEmbed::default()
    };
    let mut chrome = PlayerChrome::new(
        embed,
        Some(Box::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })),
    );

    chrome.notify(PlayerNotification::Ready);
    chrome.notify(PlayerNotification::Ready);

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(chrome.is_loaded());
    assert_eq!(chrome.duration(), 120.0);
    assert_eq!(chrome.volume(), 70);
    assert_eq!(chrome.embed().plays, 2);
}

#[test]
fn state_codes_drive_play_and_tracking() {
    let mut chrome = ready_chrome();
    chrome.notify(PlayerNotification::StateChange(3));
    assert!(chrome.is_buffering());

    chrome.notify(PlayerNotification::StateChange(1));
    assert!(chrome.is_playing());
    assert!(!chrome.is_buffering());
    assert!(chrome.is_tracking_progress());

    chrome.notify(PlayerNotification::StateChange(2));
    assert!(!chrome.is_playing());
    assert!(!chrome.is_tracking_progress());

    chrome.notify(PlayerNotification::StateChange(0));
    assert_eq!(chrome.progress(), 100.0);
}

#[test]
fn unknown_state_code_keeps_last_state() {
    let mut chrome = ready_chrome();
    chrome.notify(PlayerNotification::StateChange(1));
    chrome.notify(PlayerNotification::StateChange(5));
    chrome.notify(PlayerNotification::StateChange(42));
    assert!(chrome.is_playing());
    assert!(chrome.is_tracking_progress());
}

#[test]
fn progress_polls_only_while_tracking() {
    let mut chrome = ready_chrome();
    chrome.skip(50.0);
    chrome.poll_progress();
    assert_eq!(chrome.current_time(), 0.0);

    chrome.notify(PlayerNotification::StateChange(1));
    chrome.poll_progress();
    assert_eq!(chrome.current_time(), 50.0);
    assert_eq!(chrome.progress(), 25.0);
}

#[test]
fn toggle_play_follows_reported_state() {
    let mut chrome = ready_chrome();
    chrome.notify(PlayerNotification::StateChange(1));
    chrome.toggle_play();
    assert_eq!(chrome.embed().pauses, 1);

    chrome.notify(PlayerNotification::StateChange(2));
    chrome.toggle_play();
    assert_eq!(chrome.embed().plays, 2);
}

#[test]
fn zero_volume_mutes_and_raising_unmutes() {
    let mut chrome = ready_chrome();
    chrome.set_volume(0);
    assert!(chrome.is_muted());
    assert!(chrome.embed().muted);

    chrome.set_volume(250);
    assert!(!chrome.is_muted());
    assert_eq!(chrome.volume(), 100);
    assert_eq!(chrome.embed().volume, 100);

    chrome.toggle_mute();
    assert!(chrome.is_muted());
    chrome.toggle_mute();
    assert!(!chrome.embed().muted);
}

#[test]
fn seek_and_skip_are_clamped() {
    let mut chrome = ready_chrome();
    chrome.seek_fraction(1.5);
    assert_eq!(chrome.embed().seeks.last(), Some(&200.0));
    assert_eq!(chrome.progress(), 100.0);

    chrome.seek_fraction(0.1);
    chrome.skip(-60.0);
    assert_eq!(chrome.embed().seeks.last(), Some(&0.0));

    chrome.seek_fraction(0.9);
    chrome.skip(60.0);
    assert_eq!(chrome.embed().seeks.last(), Some(&200.0));
}

#[test]
fn controls_hide_after_inactivity_while_playing() {
    let mut chrome = ready_chrome();
    let start = Instant::now();

    chrome.pointer_moved(start);
    chrome.refresh_controls(start + Duration::from_secs(10));
    assert!(chrome.controls_visible(), "paused player keeps controls");

    chrome.notify(PlayerNotification::StateChange(1));
    chrome.pointer_moved(start);
    chrome.refresh_controls(start + Duration::from_millis(2_999));
    assert!(chrome.controls_visible());
    chrome.refresh_controls(start + CONTROLS_HIDE_DELAY);
    assert!(!chrome.controls_visible());
}

#[test]
fn banner_is_dismissed_once() {
    let mut chrome = ready_chrome();
    assert!(chrome.shows_banner());
    chrome.dismiss_banner();
    assert!(!chrome.shows_banner());
}

#[test]
fn formats_minutes_and_seconds() {
    assert_eq!(format_time(0.0), "0:00");
    assert_eq!(format_time(65.9), "1:05");
    assert_eq!(format_time(3_600.0), "60:00");
    assert_eq!(format_time(f64::NAN), "0:00");
    assert_eq!(format_time(-3.0), "0:00");
}
