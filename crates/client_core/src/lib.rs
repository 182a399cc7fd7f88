use chrono::{DateTime, Utc};

pub mod cards;
pub mod countdown;
pub mod guest;
pub mod runtime;
pub mod sequencer;
pub mod transliterate;
pub mod video;

pub use cards::{ceremony_cards, greeting, CeremonyCard, Greeting};
pub use countdown::{time_remaining, TimeRemaining};
pub use guest::{
    guest_id_from_url, resolve_guest, GuestContext, GuestDirectory, GuestLookupError,
    GuestOutcome, HttpGuestDirectory,
};
pub use runtime::{
    PresentationEvent, SequencerCommandError, SequencerHandle, SequencerRuntime,
};
pub use sequencer::{
    PresentationState, Sequencer, SequencerConfig, SequencerEvent, View,
};
pub use transliterate::{HttpNameTransliterator, NameTransliterator, PassthroughTransliterator};

/// Wall-clock source for countdown arithmetic.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Directory used when no guest id is available; every lookup is a miss.
pub struct MissingGuestDirectory;

#[async_trait::async_trait]
impl GuestDirectory for MissingGuestDirectory {
    async fn fetch(
        &self,
        guest_id: &shared::domain::GuestId,
    ) -> Result<shared::domain::GuestRecord, GuestLookupError> {
        Err(GuestLookupError::NotFound(guest_id.clone()))
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
