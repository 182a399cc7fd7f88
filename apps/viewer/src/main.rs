mod config;
mod render;

use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{
    guest_id_from_url, GuestDirectory, HttpGuestDirectory, HttpNameTransliterator,
    MissingGuestDirectory, NameTransliterator, PassthroughTransliterator, PresentationEvent,
    SequencerRuntime, SystemClock, View,
};
use shared::domain::GuestId;
use tokio::{
    sync::{broadcast::error::RecvError, mpsc},
    time::{sleep_until, Instant},
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Plays the invitation sequence in the terminal.
#[derive(Parser, Debug)]
struct Args {
    /// Guest record id to personalize for.
    #[arg(long)]
    guest_id: Option<String>,
    /// Invitation link; the guest is read from its `guest` or `id` parameter.
    #[arg(long)]
    url: Option<String>,
    /// Open the invitation after this many milliseconds.
    #[arg(long)]
    open_after_ms: Option<u64>,
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    no_splash: bool,
    #[arg(long)]
    no_gate: bool,
    /// Print each view as a JSON line instead of text.
    #[arg(long)]
    json: bool,
    /// Exit after the first content frame that no longer waits on the guest
    /// lookup, instead of ticking the countdown until interrupted.
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = config::load_settings(args.config.as_deref())?;
    if args.no_splash {
        settings.splash_enabled = false;
    }
    if args.no_gate {
        settings.gate_enabled = false;
    }

    let guest_id = match (&args.guest_id, &args.url) {
        (Some(raw), _) => GuestId::parse(raw),
        (None, Some(url)) => {
            guest_id_from_url(url).with_context(|| format!("invalid invitation url '{url}'"))?
        }
        (None, None) => None,
    };

    let directory: Arc<dyn GuestDirectory> = match &settings.api_url {
        Some(url) => Arc::new(
            HttpGuestDirectory::new(url, &settings.api_key, settings.request_timeout())
                .context("failed to build guest directory client")?,
        ),
        None => Arc::new(MissingGuestDirectory),
    };
    let transliterator: Arc<dyn NameTransliterator> = match &settings.transliterate_url {
        Some(url) => Arc::new(
            HttpNameTransliterator::new(url.clone(), settings.request_timeout())
                .context("failed to build transliteration client")?,
        ),
        None => Arc::new(PassthroughTransliterator),
    };

    let runtime = SequencerRuntime::new(
        settings.sequencer_config()?,
        directory,
        transliterator,
        Arc::new(SystemClock),
    );
    let mut events = runtime.subscribe();
    info!(guest = ?guest_id, "viewer: starting presentation");
    let handle = runtime.start(guest_id);

    let open_at = args
        .open_after_ms
        .map(|ms| Instant::now() + Duration::from_millis(ms));
    let mut open_pending = open_at.is_some();
    let mut enter_presses = spawn_enter_listener(!args.json);
    let mut text = render::TextRenderer::default();

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(PresentationEvent::Rendered(view)) => {
                    if args.json {
                        println!("{}", render::render_json(&view)?);
                    } else if let Some(frame) = text.frame(&view) {
                        println!("{frame}");
                    }
                    if args.once && matches!(view, View::Content { loading: false, .. }) {
                        break;
                    }
                }
                Ok(PresentationEvent::Transitioned { .. }) => {}
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "viewer: fell behind presentation events");
                }
                Err(RecvError::Closed) => break,
            },
            _ = sleep_until(open_at.unwrap_or_else(Instant::now)), if open_pending => {
                open_pending = false;
                if let Err(err) = handle.open_invitation() {
                    warn!(error = %err, "viewer: scheduled open was not delivered");
                }
            }
            Some(()) = enter_presses.recv() => {
                if let Err(err) = handle.open_invitation() {
                    warn!(error = %err, "viewer: open request was not delivered");
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("viewer: interrupted");
                break;
            }
        }
    }

    handle.shutdown().await;
    Ok(())
}

/// Forwards each line read from stdin as an open request. A plain thread is
/// used so a pending read never holds up runtime shutdown.
fn spawn_enter_listener(enabled: bool) -> mpsc::Receiver<()> {
    let (tx, rx) = mpsc::channel(4);
    if enabled {
        std::thread::spawn(move || {
            for line in std::io::stdin().lines() {
                if line.is_err() || tx.blocking_send(()).is_err() {
                    break;
                }
            }
        });
    }
    rx
}
