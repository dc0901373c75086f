//! Per-fixture values that fill element placeholders.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::MatchgenError;

/// Whether the club plays at home or away in this fixture.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum HomeAway {
    Home,
    Away,
    #[default]
    Unknown,
}

impl HomeAway {
    /// Lenient parse: `HOME`/`H` and `AWAY`/`A` in any case, anything else is unknown.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_uppercase().as_str() {
            "HOME" | "H" => HomeAway::Home,
            "AWAY" | "A" => HomeAway::Away,
            _ => HomeAway::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HomeAway::Home => "HOME",
            HomeAway::Away => "AWAY",
            HomeAway::Unknown => "UNKNOWN",
        }
    }
}

impl FromStr for HomeAway {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(HomeAway::parse(s))
    }
}

impl fmt::Display for HomeAway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for HomeAway {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for HomeAway {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value: Option<String> = Option::deserialize(deserializer)?;
        Ok(value.map(|v| HomeAway::parse(&v)).unwrap_or_default())
    }
}

/// Mapping from content key to display text or image reference.
///
/// Read-only for the engine: a composition never mutates it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FixtureData {
    #[serde(default)]
    pub values: HashMap<String, String>,
    #[serde(default)]
    pub home_away: HomeAway,
}

impl FixtureData {
    pub fn new(home_away: HomeAway) -> Self {
        Self {
            values: HashMap::new(),
            home_away,
        }
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Parse either a plain `{"values": .., "home_away": ..}` record or a
    /// [`MatchFixture`] (recognized by its `kickoff` field).
    pub fn from_json(json: &str) -> Result<Self, MatchgenError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        if value.get("kickoff").is_some() {
            let fixture: MatchFixture = serde_json::from_value(value)?;
            return Ok(fixture.to_fixture_data());
        }
        Ok(serde_json::from_value(value)?)
    }
}

/// A scheduled match, as stored by the fixtures service.
///
/// [`MatchFixture::to_fixture_data`] flattens it into the keys templates use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchFixture {
    pub club_name: String,
    pub opponent: String,
    #[serde(default)]
    pub home_away: HomeAway,
    pub kickoff: NaiveDateTime,
    /// Free-form start time ("15:00", "3pm"); overrides the kickoff time.
    #[serde(default)]
    pub time_start: Option<String>,
    #[serde(default)]
    pub match_type: Option<String>,
    #[serde(default)]
    pub venue: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub club_logo: Option<String>,
    #[serde(default)]
    pub opponent_logo: Option<String>,
    #[serde(default)]
    pub sponsor: Option<String>,
}

impl MatchFixture {
    /// Flatten into fixture data. Absent optional values produce no key.
    pub fn to_fixture_data(&self) -> FixtureData {
        let mut data = FixtureData::new(self.home_away)
            .with("club_name", &self.club_name)
            .with("opponent", &self.opponent)
            .with("date", self.kickoff.format("%d/%m/%Y").to_string());

        if self.home_away != HomeAway::Unknown {
            data.insert("home_away", self.home_away.as_str());
        }

        let time = match self.time_start.as_deref().map(str::trim) {
            Some(t) if !t.is_empty() => t.to_string(),
            _ => self.kickoff.format("%H:%M").to_string(),
        };
        data.insert("time", time);

        let optional = [
            ("match_type", &self.match_type),
            ("venue", &self.venue),
            ("location", &self.location),
            ("club_logo", &self.club_logo),
            ("opponent_logo", &self.opponent_logo),
            ("sponsor", &self.sponsor),
        ];
        for (key, value) in optional {
            if let Some(v) = value.as_deref().filter(|v| !v.trim().is_empty()) {
                data.insert(key, v);
            }
        }

        data
    }
}
