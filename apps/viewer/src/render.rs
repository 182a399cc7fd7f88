use std::fmt::Write as _;

use client_core::{CeremonyCard, Greeting, TimeRemaining, View};
use shared::domain::CeremonyKey;

/// Splash progress is only echoed at these steps to keep the output short.
const SPLASH_ECHO_STEP: u8 = 20;

/// Plain-text frame for `view`, or `None` when the frame is not worth echoing.
pub fn render_text(view: &View) -> Option<String> {
    match view {
        View::Splash { progress } => {
            (progress % SPLASH_ECHO_STEP == 0).then(|| format!("loading {progress}%"))
        }
        View::Gate {
            greeting,
            auto_open_in_ms,
        } => Some(format!(
            "{}\n  press enter to open (opens by itself in {:.1}s)",
            greeting_line(greeting),
            *auto_open_in_ms as f64 / 1_000.0
        )),
        View::Revealing { greeting, .. } => {
            Some(format!("{}\n  the curtain opens...", greeting_line(greeting)))
        }
        View::Content {
            countdown,
            cards,
            notice,
            loading,
        } => {
            let mut out = String::new();
            if let Some(notice) = notice {
                let _ = writeln!(out, "! {notice}");
            }
            if *loading {
                let _ = writeln!(out, "(looking up your invitation)");
            }
            let _ = writeln!(out, "{}", countdown_line(countdown));
            for card in cards {
                out.push_str(&card_block(card));
            }
            Some(out.trim_end().to_string())
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
struct ContentLayout {
    cards: Vec<CeremonyKey>,
    notice: Option<String>,
    loading: bool,
}

/// Text output for a running presentation: content is printed in full once
/// and again only when its cards, notice or loading state change; countdown
/// ticks in between print a single line.
#[derive(Debug, Default)]
pub struct TextRenderer {
    shown: Option<ContentLayout>,
}

impl TextRenderer {
    pub fn frame(&mut self, view: &View) -> Option<String> {
        let View::Content {
            countdown,
            cards,
            notice,
            loading,
        } = view
        else {
            return render_text(view);
        };

        let layout = ContentLayout {
            cards: cards.iter().map(|card| card.key).collect(),
            notice: notice.clone(),
            loading: *loading,
        };
        if self.shown.as_ref() == Some(&layout) {
            return Some(countdown_line(countdown));
        }
        self.shown = Some(layout);
        render_text(view)
    }
}

/// One JSON document per view, for piping into other tools.
pub fn render_json(view: &View) -> serde_json::Result<String> {
    serde_json::to_string(view)
}

fn countdown_line(countdown: &TimeRemaining) -> String {
    if countdown.is_elapsed() {
        "The celebration has begun".to_string()
    } else {
        format!("Countdown {countdown}")
    }
}

fn greeting_line(greeting: &Greeting) -> String {
    if greeting.loading {
        format!("{} (looking up your invitation)", greeting.addressee)
    } else {
        greeting.addressee.clone()
    }
}

fn card_block(card: &CeremonyCard) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} {} ({})", card.icon, card.title_hindi, card.title);
    match (card.date, card.day) {
        (Some(date), Some(day)) => {
            let _ = writeln!(out, "  {} {}", date.format("%d-%m-%Y"), day);
        }
        (Some(date), None) => {
            let _ = writeln!(out, "  {}", date.format("%d-%m-%Y"));
        }
        _ => {}
    }
    let _ = writeln!(out, "  {} @ {}", card.timing, card.location);
    for row in card.schedule {
        let _ = writeln!(out, "  - {}: {}", row.label, row.value);
    }
    out
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
