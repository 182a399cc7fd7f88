use super::*;

#[test]
fn catalog_covers_every_key_in_order() {
    let keys: Vec<CeremonyKey> = catalog().iter().map(|c| c.key).collect();
    assert_eq!(keys, CeremonyKey::ALL.to_vec());
}

#[test]
fn catalog_dates_are_valid_and_chronological() {
    let dates: Vec<NaiveDate> = catalog()
        .iter()
        .map(|c| c.date().expect("valid date"))
        .collect();
    assert!(dates.windows(2).all(|w| w[0] < w[1]));
}

fn entry(key: CeremonyKey) -> &'static CeremonyInfo {
    catalog()
        .iter()
        .find(|info| info.key == key)
        .expect("catalog entry")
}

#[test]
fn weekday_labels_follow_the_calendar() {
    let shadi = entry(CeremonyKey::Shadi);
    assert_eq!(shadi.weekday_hindi(), Some("मंगलवार"));
    let haldi = entry(CeremonyKey::Haldi);
    assert_eq!(haldi.weekday_hindi(), Some("रविवार"));
}

#[test]
fn only_the_wedding_carries_extra_schedule_rows() {
    for info in catalog() {
        if info.key == CeremonyKey::Shadi {
            assert_eq!(info.schedule.len(), 2);
        } else {
            assert!(info.schedule.is_empty());
        }
    }
}
