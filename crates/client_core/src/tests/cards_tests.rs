use super::*;
use shared::{
    domain::{GuestId, GuestKind, GuestRecord},
    error::{FailureCode, LookupFailure},
};

fn record(kind: GuestKind, events: Vec<CeremonyKey>) -> GuestRecord {
    GuestRecord {
        id: GuestId("g-1".into()),
        name: "Arun".into(),
        kind,
        events,
        address: None,
        notes: None,
        include_address: false,
    }
}

fn keys(cards: &[CeremonyCard]) -> Vec<CeremonyKey> {
    cards.iter().map(|c| c.key).collect()
}

#[test]
fn generic_context_gets_full_catalog_and_generic_greeting() {
    for context in [GuestContext::Absent, GuestContext::Pending] {
        assert_eq!(keys(&ceremony_cards(&context)), CeremonyKey::ALL.to_vec());
        let g = greeting(&context);
        assert_eq!(g.addressee, GENERIC_ADDRESSEE);
        assert!(!g.personalized);
    }
    assert!(greeting(&GuestContext::Pending).loading);
    assert!(!greeting(&GuestContext::Absent).loading);
}

#[test]
fn invited_events_filter_and_keep_catalog_order() {
    let context = GuestContext::Loaded {
        record: record(
            GuestKind::Single,
            vec![CeremonyKey::Shadi, CeremonyKey::Haldi],
        ),
        localized_name: None,
    };
    assert_eq!(
        keys(&ceremony_cards(&context)),
        vec![CeremonyKey::Haldi, CeremonyKey::Shadi]
    );
}

#[test]
fn empty_event_list_falls_back_to_full_catalog() {
    let context = GuestContext::Loaded {
        record: record(GuestKind::Single, Vec::new()),
        localized_name: None,
    };
    assert_eq!(keys(&ceremony_cards(&context)), CeremonyKey::ALL.to_vec());
}

#[test]
fn family_greeting_prefers_localized_name() {
    let context = GuestContext::Loaded {
        record: record(GuestKind::Family, vec![CeremonyKey::Shadi]),
        localized_name: Some("अरुण".into()),
    };
    let g = greeting(&context);
    assert_eq!(g.addressee, "अरुण & Family");
    assert!(g.personalized);
}

#[test]
fn unavailable_guest_degrades_with_notice() {
    let context = GuestContext::Unavailable(LookupFailure::new(
        FailureCode::NotFound,
        "not found",
    ));
    assert_eq!(keys(&ceremony_cards(&context)), CeremonyKey::ALL.to_vec());
    assert_eq!(greeting(&context).addressee, GENERIC_ADDRESSEE);
    assert_eq!(notice(&context).as_deref(), Some("not found"));
    assert_eq!(notice(&GuestContext::Absent), None);
}

#[test]
fn wedding_card_carries_weekday_and_schedule() {
    let cards = ceremony_cards(&GuestContext::Absent);
    let shadi = cards
        .iter()
        .find(|c| c.key == CeremonyKey::Shadi)
        .expect("shadi card");
    assert_eq!(shadi.day, Some("मंगलवार"));
    assert_eq!(shadi.schedule.len(), 2);
}
