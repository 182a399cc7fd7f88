use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;

use crate::domain::CeremonyKey;

const VENUE: &str = "माऊ";
const VENUE_MAP_URL: &str = "https://maps.app.goo.gl/nTmvYhVDpiBQB8548";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScheduleRow {
    pub label: &'static str,
    pub value: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CeremonyInfo {
    pub key: CeremonyKey,
    pub title: &'static str,
    pub title_hindi: &'static str,
    pub icon: &'static str,
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub timing: &'static str,
    pub location: &'static str,
    pub map_url: &'static str,
    pub description: &'static str,
    pub schedule: &'static [ScheduleRow],
}

impl CeremonyInfo {
    pub fn date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
    }

    pub fn weekday_hindi(&self) -> Option<&'static str> {
        self.date().map(|d| hindi_weekday(d.weekday()))
    }
}

fn hindi_weekday(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "सोमवार",
        Weekday::Tue => "मंगलवार",
        Weekday::Wed => "बुधवार",
        Weekday::Thu => "गुरुवार",
        Weekday::Fri => "शुक्रवार",
        Weekday::Sat => "शनिवार",
        Weekday::Sun => "रविवार",
    }
}

static CATALOG: [CeremonyInfo; 5] = [
    CeremonyInfo {
        key: CeremonyKey::Rasum,
        title: "Rasum",
        title_hindi: "रस्म",
        icon: "🪷",
        year: 2026,
        month: 4,
        day: 20,
        timing: "रात्रि ८:०० बजे से",
        location: VENUE,
        map_url: VENUE_MAP_URL,
        description: "पवित्र रस्म समारोह में आपकी उपस्थिति से हमें अपार प्रसन्नता की अनुभूति होगी। इस शुभ अवसर पर दोनों परिवारों का मिलन होगा।",
        schedule: &[],
    },
    CeremonyInfo {
        key: CeremonyKey::Tilak,
        title: "Tilak",
        title_hindi: "तिलक",
        icon: "🔴",
        year: 2026,
        month: 4,
        day: 22,
        timing: "रात्रि ८:०० बजे से",
        location: VENUE,
        map_url: VENUE_MAP_URL,
        description: "तिलक की शुभ परंपरा का निर्वहन किया जाएगा। इस मंगलमय अवसर पर आपकी कृपा और आशीर्वाद की कामना है।",
        schedule: &[],
    },
    CeremonyInfo {
        key: CeremonyKey::Haldi,
        title: "Haldi",
        title_hindi: "हल्दी",
        icon: "🌻",
        year: 2026,
        month: 4,
        day: 26,
        timing: "प्रातः १०:३० बजे से",
        location: VENUE,
        map_url: VENUE_MAP_URL,
        description: "हल्दी का पवित्र समारोह दुल्हन को सौंदर्य और कोमलता से सजाने के लिए किया जाता है। कृपया इस आनंद में शामिल हों।",
        schedule: &[],
    },
    CeremonyInfo {
        key: CeremonyKey::Mehndi,
        title: "Mehndi",
        title_hindi: "मेहंदी",
        icon: "🌿",
        year: 2026,
        month: 4,
        day: 27,
        timing: "सायं ७:०० बजे से",
        location: VENUE,
        map_url: VENUE_MAP_URL,
        description: "मेहंदी की खुशियों में डूबी महिलाओं के गीत और हंसी से भरा एक मंगलमय पल। आप इस परंपरागत उत्सव का हिस्सा बनें।",
        schedule: &[],
    },
    CeremonyInfo {
        key: CeremonyKey::Shadi,
        title: "Wedding Ceremony",
        title_hindi: "शादी",
        icon: "💒",
        year: 2026,
        month: 4,
        day: 28,
        timing: "शुभ मुहूर्त अनुसार",
        location: VENUE,
        map_url: VENUE_MAP_URL,
        description: "पवित्र अग्नि के साक्षी रहते दो आत्माओं का मिलन होगा। विवाह मंडप में आपकी उपस्थिति हमारे इस पवित्र बंधन को सार्थक करेगी।",
        schedule: &[
            ScheduleRow {
                label: "बारात प्रस्थान",
                value: "सायं ५:३० बजे",
            },
            ScheduleRow {
                label: "पाणिग्रहण संस्कार",
                value: "मध्यरात्रि १२:०० बजे (२९ अप्रैल)",
            },
        ],
    },
];

/// All ceremonies in chronological order.
pub fn catalog() -> &'static [CeremonyInfo] {
    &CATALOG
}

#[cfg(test)]
#[path = "tests/ceremony_tests.rs"]
mod tests;
