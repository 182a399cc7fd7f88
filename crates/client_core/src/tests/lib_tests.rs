use super::*;
use shared::domain::GuestId;

#[test]
fn system_clock_tracks_utc_now() {
    let before = Utc::now();
    let now = SystemClock.now();
    assert!(now >= before);
    assert!(now <= Utc::now());
}

#[tokio::test]
async fn missing_directory_reports_not_found() {
    let err = MissingGuestDirectory
        .fetch(&GuestId("g-1".into()))
        .await
        .expect_err("always missing");
    assert!(matches!(err, GuestLookupError::NotFound(id) if id.0 == "g-1"));
}
