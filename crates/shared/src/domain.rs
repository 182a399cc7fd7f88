use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{error::GuestRecordError, protocol::GuestRecordWire};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub String);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

id_newtype!(GuestId);

impl GuestId {
    /// Returns `None` for blank identifiers.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CeremonyKey {
    Rasum,
    Tilak,
    Haldi,
    Mehndi,
    Shadi,
}

impl CeremonyKey {
    /// Catalog order, which is also the chronological order of the ceremonies.
    pub const ALL: [CeremonyKey; 5] = [
        CeremonyKey::Rasum,
        CeremonyKey::Tilak,
        CeremonyKey::Haldi,
        CeremonyKey::Mehndi,
        CeremonyKey::Shadi,
    ];

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "rasum" => Some(Self::Rasum),
            "tilak" => Some(Self::Tilak),
            "haldi" => Some(Self::Haldi),
            "mehndi" => Some(Self::Mehndi),
            "shadi" => Some(Self::Shadi),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuestKind {
    Single,
    Family,
    Other,
}

impl GuestKind {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(|v| v.trim().to_ascii_lowercase()) {
            Some(v) if v == "single" => Self::Single,
            Some(v) if v == "family" => Self::Family,
            _ => Self::Other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestRecord {
    pub id: GuestId,
    pub name: String,
    pub kind: GuestKind,
    pub events: Vec<CeremonyKey>,
    pub address: Option<String>,
    pub notes: Option<String>,
    pub include_address: bool,
}

impl GuestRecord {
    pub fn with_family(&self) -> bool {
        self.kind == GuestKind::Family
    }

    /// How the guest is addressed; `name` may be a localized rendering of
    /// [`Self::name`].
    pub fn addressee(&self, name: &str) -> String {
        if self.with_family() {
            format!("{name} & Family")
        } else {
            name.to_string()
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl TryFrom<GuestRecordWire> for GuestRecord {
    type Error = GuestRecordError;

    fn try_from(wire: GuestRecordWire) -> Result<Self, Self::Error> {
        let id = wire
            .id
            .as_deref()
            .and_then(GuestId::parse)
            .ok_or(GuestRecordError::MissingId)?;
        let name = non_blank(wire.name).ok_or_else(|| GuestRecordError::MissingName {
            id: id.0.clone(),
        })?;

        let raw_events = wire.events.as_array().map(Vec::as_slice).unwrap_or_default();
        let mut events = Vec::with_capacity(raw_events.len());
        for raw in raw_events.iter().filter_map(serde_json::Value::as_str) {
            if let Some(key) = CeremonyKey::parse(raw) {
                if !events.contains(&key) {
                    events.push(key);
                }
            }
        }

        Ok(Self {
            id,
            name,
            kind: GuestKind::parse(wire.kind.as_deref()),
            events,
            address: non_blank(wire.address),
            notes: non_blank(wire.notes),
            include_address: wire.include_address.unwrap_or(false),
        })
    }
}

#[cfg(test)]
#[path = "tests/domain_tests.rs"]
mod tests;
