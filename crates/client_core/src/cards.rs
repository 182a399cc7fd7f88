use chrono::NaiveDate;
use serde::Serialize;
use shared::{
    ceremony::{self, CeremonyInfo, ScheduleRow},
    domain::CeremonyKey,
};

use crate::guest::GuestContext;

pub const GENERIC_ADDRESSEE: &str = "Dear Guest";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Greeting {
    pub addressee: String,
    pub personalized: bool,
    pub loading: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CeremonyCard {
    pub key: CeremonyKey,
    pub title: &'static str,
    pub title_hindi: &'static str,
    pub icon: &'static str,
    pub date: Option<NaiveDate>,
    pub day: Option<&'static str>,
    pub timing: &'static str,
    pub location: &'static str,
    pub map_url: &'static str,
    pub description: &'static str,
    pub schedule: &'static [ScheduleRow],
}

impl From<&'static CeremonyInfo> for CeremonyCard {
    fn from(info: &'static CeremonyInfo) -> Self {
        Self {
            key: info.key,
            title: info.title,
            title_hindi: info.title_hindi,
            icon: info.icon,
            date: info.date(),
            day: info.weekday_hindi(),
            timing: info.timing,
            location: info.location,
            map_url: info.map_url,
            description: info.description,
            schedule: info.schedule,
        }
    }
}

pub fn greeting(context: &GuestContext) -> Greeting {
    match context {
        GuestContext::Loaded {
            record,
            localized_name,
        } => {
            let name = localized_name.as_deref().unwrap_or(&record.name);
            Greeting {
                addressee: record.addressee(name),
                personalized: true,
                loading: false,
            }
        }
        other => Greeting {
            addressee: GENERIC_ADDRESSEE.to_string(),
            personalized: false,
            loading: matches!(other, GuestContext::Pending),
        },
    }
}

/// Cards for the guest's invited ceremonies in catalog order, or the full
/// catalog when there is no usable guest event list.
pub fn ceremony_cards(context: &GuestContext) -> Vec<CeremonyCard> {
    let invited = context
        .record()
        .map(|r| r.events.as_slice())
        .filter(|events| !events.is_empty());

    ceremony::catalog()
        .iter()
        .filter(|info| invited.map_or(true, |events| events.contains(&info.key)))
        .map(CeremonyCard::from)
        .collect()
}

pub fn notice(context: &GuestContext) -> Option<String> {
    match context {
        GuestContext::Unavailable(failure) => Some(failure.notice().to_string()),
        _ => None,
    }
}

#[cfg(test)]
#[path = "tests/cards_tests.rs"]
mod tests;
