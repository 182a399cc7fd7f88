//! Presentation state machine: splash → gated → revealing → content.
//!
//! The machine is pure. It never touches a clock or a timer itself; callers
//! feed it [`SequencerEvent`]s with the current wall-clock instant and carry
//! out the returned [`Effect`]s. At most one timer is active at any time and
//! every timer is identified by a [`TimerToken`], so a stale or duplicate
//! firing is recognised and dropped.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use crate::{
    cards::{self, CeremonyCard, Greeting},
    countdown::{time_remaining, TimeRemaining},
    guest::{GuestContext, GuestOutcome},
};

pub const DEFAULT_SPLASH_STEP: u8 = 2;
pub const DEFAULT_SPLASH_TICK: Duration = Duration::from_millis(40);
pub const DEFAULT_SPLASH_EXIT_DELAY: Duration = Duration::from_millis(1_000);
pub const DEFAULT_GATE_TIMEOUT: Duration = Duration::from_secs(10);
/// Curtain animation length; the revealing view hands the same value to the
/// front end so the animation and the state change finish together.
pub const DEFAULT_REVEAL_DURATION: Duration = Duration::from_millis(2_500);
pub const COUNTDOWN_TICK: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PresentationState {
    Splash,
    Gated,
    Revealing,
    Content,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequencerConfig {
    pub target: DateTime<Utc>,
    pub splash_enabled: bool,
    pub gate_enabled: bool,
    pub splash_step: u8,
    pub splash_tick: Duration,
    pub splash_exit_delay: Duration,
    pub gate_timeout: Duration,
    pub reveal_duration: Duration,
    pub countdown_tick: Duration,
}

impl SequencerConfig {
    pub fn new(target: DateTime<Utc>) -> Self {
        Self {
            target,
            splash_enabled: true,
            gate_enabled: true,
            splash_step: DEFAULT_SPLASH_STEP,
            splash_tick: DEFAULT_SPLASH_TICK,
            splash_exit_delay: DEFAULT_SPLASH_EXIT_DELAY,
            gate_timeout: DEFAULT_GATE_TIMEOUT,
            reveal_duration: DEFAULT_REVEAL_DURATION,
            countdown_tick: COUNTDOWN_TICK,
        }
    }

    pub fn initial_state(&self) -> PresentationState {
        if self.splash_enabled {
            PresentationState::Splash
        } else if self.gate_enabled {
            PresentationState::Gated
        } else {
            PresentationState::Content
        }
    }

    /// Upper bound for reaching content from the gate without user action.
    pub fn gate_deadline(&self) -> Duration {
        self.gate_timeout + self.reveal_duration
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerPurpose {
    SplashTick,
    SplashExit,
    GateTimeout,
    RevealComplete,
    CountdownTick,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ActiveTimer {
    token: TimerToken,
    purpose: TimerPurpose,
}

/// Causes of a forward state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    SplashFinished,
    GateTimedOut,
    OpenRequested,
    RevealFinished,
}

/// The forward-only transition table. Returns `None` when `trigger` does not
/// apply to `state`.
pub fn next_state(
    state: PresentationState,
    trigger: Trigger,
    config: &SequencerConfig,
) -> Option<PresentationState> {
    use PresentationState::*;

    match (state, trigger) {
        (Splash, Trigger::SplashFinished) if config.gate_enabled => Some(Gated),
        (Splash, Trigger::SplashFinished) => Some(Content),
        (Gated, Trigger::GateTimedOut | Trigger::OpenRequested) => Some(Revealing),
        (Revealing, Trigger::RevealFinished) => Some(Content),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SequencerEvent {
    Mounted,
    TimerFired(TimerToken),
    OpenRequested,
    GuestResolved(GuestOutcome),
    Unmount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum View {
    Splash {
        progress: u8,
    },
    Gate {
        greeting: Greeting,
        auto_open_in_ms: u64,
    },
    Revealing {
        greeting: Greeting,
        reveal_ms: u64,
    },
    Content {
        countdown: TimeRemaining,
        cards: Vec<CeremonyCard>,
        notice: Option<String>,
        /// Cards are the generic list until the guest lookup settles.
        loading: bool,
    },
}

impl View {
    pub fn state(&self) -> PresentationState {
        match self {
            Self::Splash { .. } => PresentationState::Splash,
            Self::Gate { .. } => PresentationState::Gated,
            Self::Revealing { .. } => PresentationState::Revealing,
            Self::Content { .. } => PresentationState::Content,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Schedule { token: TimerToken, after: Duration },
    Cancel(TimerToken),
    Transitioned {
        from: PresentationState,
        to: PresentationState,
    },
    Render(View),
}

pub struct Sequencer {
    config: SequencerConfig,
    state: PresentationState,
    entered_at: Option<DateTime<Utc>>,
    splash_progress: u8,
    guest: GuestContext,
    active_timer: Option<ActiveTimer>,
    next_token: u64,
    torn_down: bool,
}

impl Sequencer {
    pub fn new(config: SequencerConfig, guest: GuestContext) -> Self {
        Self {
            state: config.initial_state(),
            config,
            entered_at: None,
            splash_progress: 0,
            guest,
            active_timer: None,
            next_token: 0,
            torn_down: false,
        }
    }

    pub fn state(&self) -> PresentationState {
        self.state
    }

    pub fn guest(&self) -> &GuestContext {
        &self.guest
    }

    pub fn config(&self) -> &SequencerConfig {
        &self.config
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    pub fn active_timer(&self) -> Option<TimerToken> {
        self.active_timer.map(|t| t.token)
    }

    pub fn handle(&mut self, event: SequencerEvent, now: DateTime<Utc>) -> Vec<Effect> {
        let mut effects = Vec::new();
        if self.torn_down {
            debug!(?event, "sequencer: event after teardown ignored");
            return effects;
        }

        match event {
            SequencerEvent::Mounted => {
                if self.entered_at.is_some() {
                    debug!("sequencer: duplicate mount ignored");
                } else {
                    self.enter(now, &mut effects);
                }
            }
            SequencerEvent::TimerFired(token) => self.on_timer(token, now, &mut effects),
            SequencerEvent::OpenRequested => {
                if self.state == PresentationState::Gated && self.entered_at.is_some() {
                    self.advance(Trigger::OpenRequested, now, &mut effects);
                } else {
                    debug!(state = ?self.state, "sequencer: open request ignored");
                }
            }
            SequencerEvent::GuestResolved(outcome) => {
                if self.guest != GuestContext::Pending {
                    debug!("sequencer: guest already resolved, outcome ignored");
                    return effects;
                }
                self.guest = outcome.into();
                if self.entered_at.is_some() {
                    effects.push(Effect::Render(self.view(now)));
                }
            }
            SequencerEvent::Unmount => {
                self.cancel_active(&mut effects);
                self.torn_down = true;
                info!(state = ?self.state, "sequencer: torn down");
            }
        }

        effects
    }

    fn on_timer(&mut self, token: TimerToken, now: DateTime<Utc>, effects: &mut Vec<Effect>) {
        let Some(active) = self.active_timer.filter(|t| t.token == token) else {
            debug!(token = token.0, "sequencer: stale timer ignored");
            return;
        };
        self.active_timer = None;

        match active.purpose {
            TimerPurpose::SplashTick => {
                let step = self.config.splash_step.max(1);
                self.splash_progress = self.splash_progress.saturating_add(step).min(100);
                if self.splash_progress >= 100 {
                    self.schedule(TimerPurpose::SplashExit, self.config.splash_exit_delay, effects);
                } else {
                    self.schedule(TimerPurpose::SplashTick, self.config.splash_tick, effects);
                }
                effects.push(Effect::Render(self.view(now)));
            }
            TimerPurpose::SplashExit => self.advance(Trigger::SplashFinished, now, effects),
            TimerPurpose::GateTimeout => self.advance(Trigger::GateTimedOut, now, effects),
            TimerPurpose::RevealComplete => self.advance(Trigger::RevealFinished, now, effects),
            TimerPurpose::CountdownTick => {
                self.schedule(TimerPurpose::CountdownTick, self.config.countdown_tick, effects);
                effects.push(Effect::Render(self.view(now)));
            }
        }
    }

    fn advance(&mut self, trigger: Trigger, now: DateTime<Utc>, effects: &mut Vec<Effect>) {
        let Some(to) = next_state(self.state, trigger, &self.config) else {
            debug!(state = ?self.state, ?trigger, "sequencer: trigger does not apply");
            return;
        };

        self.cancel_active(effects);
        let from = self.state;
        self.state = to;
        info!(?from, ?to, ?trigger, "sequencer: transitioned");
        effects.push(Effect::Transitioned { from, to });
        self.enter(now, effects);
    }

    fn enter(&mut self, now: DateTime<Utc>, effects: &mut Vec<Effect>) {
        self.entered_at = Some(now);
        match self.state {
            PresentationState::Splash => {
                self.splash_progress = 0;
                self.schedule(TimerPurpose::SplashTick, self.config.splash_tick, effects);
            }
            PresentationState::Gated => {
                self.schedule(TimerPurpose::GateTimeout, self.config.gate_timeout, effects);
            }
            PresentationState::Revealing => {
                self.schedule(
                    TimerPurpose::RevealComplete,
                    self.config.reveal_duration,
                    effects,
                );
            }
            PresentationState::Content => {
                self.schedule(TimerPurpose::CountdownTick, self.config.countdown_tick, effects);
            }
        }
        effects.push(Effect::Render(self.view(now)));
    }

    fn schedule(&mut self, purpose: TimerPurpose, after: Duration, effects: &mut Vec<Effect>) {
        self.cancel_active(effects);
        self.next_token += 1;
        let token = TimerToken(self.next_token);
        self.active_timer = Some(ActiveTimer { token, purpose });
        effects.push(Effect::Schedule { token, after });
    }

    fn cancel_active(&mut self, effects: &mut Vec<Effect>) {
        if let Some(active) = self.active_timer.take() {
            effects.push(Effect::Cancel(active.token));
        }
    }

    pub fn view(&self, now: DateTime<Utc>) -> View {
        match self.state {
            PresentationState::Splash => View::Splash {
                progress: self.splash_progress,
            },
            PresentationState::Gated => {
                let elapsed = self
                    .entered_at
                    .map(|at| (now - at).to_std().unwrap_or_default())
                    .unwrap_or_default();
                View::Gate {
                    greeting: cards::greeting(&self.guest),
                    auto_open_in_ms: millis(self.config.gate_timeout.saturating_sub(elapsed)),
                }
            }
            PresentationState::Revealing => View::Revealing {
                greeting: cards::greeting(&self.guest),
                reveal_ms: millis(self.config.reveal_duration),
            },
            PresentationState::Content => View::Content {
                countdown: time_remaining(self.config.target, now),
                cards: cards::ceremony_cards(&self.guest),
                notice: cards::notice(&self.guest),
                loading: self.guest == GuestContext::Pending,
            },
        }
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
#[path = "tests/sequencer_tests.rs"]
mod tests;
