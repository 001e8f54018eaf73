use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use validator::{Validate, ValidationError};

use crate::models::weights::Factor;

/// Geographic point in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Build a point from optional coordinates.
    ///
    /// A point is either fully present or absent: a missing or non-finite
    /// coordinate yields `None`.
    pub fn from_parts(latitude: Option<f64>, longitude: Option<f64>) -> Option<Self> {
        match (latitude, longitude) {
            (Some(lat), Some(lon)) if lat.is_finite() && lon.is_finite() => Some(Self::new(lat, lon)),
            _ => None,
        }
    }

    pub fn in_range(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

#[derive(Deserialize)]
struct RawGeoPoint {
    #[serde(default)]
    latitude: Option<f64>,
    #[serde(default)]
    longitude: Option<f64>,
}

fn deserialize_location<'de, D>(deserializer: D) -> Result<Option<GeoPoint>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<RawGeoPoint> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|r| GeoPoint::from_parts(r.latitude, r.longitude)))
}

/// Day of the week, keyed by its full English name on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
            Weekday::Sunday => "Sunday",
        }
    }

    /// Exact full English name, as sent on the wire
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|day| day.as_str() == name)
    }
}

/// Same-day time slot on a 24h clock
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    #[serde(rename = "startTime")]
    pub start_time: String,
    #[serde(rename = "endTime")]
    pub end_time: String,
}

impl TimeSlot {
    pub fn new(start_time: impl Into<String>, end_time: impl Into<String>) -> Self {
        Self {
            start_time: start_time.into(),
            end_time: end_time.into(),
        }
    }

    pub fn start_minutes(&self) -> u32 {
        clock_minutes(&self.start_time)
    }

    pub fn end_minutes(&self) -> u32 {
        clock_minutes(&self.end_time)
    }

    /// Slot length in minutes; an inverted slot is worth nothing
    pub fn duration_minutes(&self) -> u32 {
        self.end_minutes().saturating_sub(self.start_minutes())
    }
}

/// Parse `HH:MM` into minutes since midnight.
///
/// `24:00` is accepted as the end of the day. Anything unparseable counts as
/// midnight so a broken slot degrades instead of failing the request.
pub fn clock_minutes(value: &str) -> u32 {
    parse_clock(value).unwrap_or_else(|| {
        tracing::debug!("Unparseable time '{}', treating as 00:00", value);
        0
    })
}

fn parse_clock(value: &str) -> Option<u32> {
    let (hours, minutes) = value.trim().split_once(':')?;
    let hours: u32 = hours.parse().ok()?;
    let minutes: u32 = minutes.parse().ok()?;

    match (hours, minutes) {
        (24, 0) => Some(24 * 60),
        (h, m) if h < 24 && m < 60 => Some(h * 60 + m),
        _ => None,
    }
}

/// One weekday's availability
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DaySchedule {
    #[serde(default)]
    pub slots: Vec<TimeSlot>,
}

/// Weekly availability, weekday -> slots
///
/// Deserialization is lenient: keys that are not weekday names (clients also
/// send date-keyed entries) are skipped, a null or malformed day counts as
/// empty, and a malformed slot is dropped. Bad availability degrades the
/// availability score instead of failing the request.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct WeeklyAvailability(pub BTreeMap<Weekday, DaySchedule>);

impl<'de> Deserialize<'de> for WeeklyAvailability {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: BTreeMap<String, Value> = BTreeMap::deserialize(deserializer)?;
        let mut days = BTreeMap::new();

        for (key, value) in raw {
            let Some(day) = Weekday::from_name(&key) else {
                tracing::debug!("Ignoring non-weekday availability key '{}'", key);
                continue;
            };
            days.insert(day, DaySchedule { slots: day_slots(value) });
        }

        Ok(Self(days))
    }
}

fn day_slots(value: Value) -> Vec<TimeSlot> {
    let slots = match value {
        Value::Object(mut day) => day.remove("slots").unwrap_or(Value::Null),
        _ => Value::Null,
    };

    match slots {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match serde_json::from_value::<TimeSlot>(item) {
                Ok(slot) => Some(slot),
                Err(e) => {
                    tracing::debug!("Dropping malformed time slot: {}", e);
                    None
                }
            })
            .collect(),
        _ => Vec::new(),
    }
}

impl WeeklyAvailability {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style helper, mostly for tests and fixtures
    pub fn with_day(mut self, day: Weekday, slots: Vec<TimeSlot>) -> Self {
        self.0.insert(day, DaySchedule { slots });
        self
    }

    pub fn day_slots(&self, day: Weekday) -> &[TimeSlot] {
        self.0.get(&day).map(|d| d.slots.as_slice()).unwrap_or(&[])
    }

    pub fn has_slots(&self) -> bool {
        self.0.values().any(|d| !d.slots.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    #[serde(default)]
    pub name: String,
    /// Carried through but not weighted by the scorer
    #[serde(rename = "yearsOfExperience", default, skip_serializing_if = "Option::is_none")]
    pub years_of_experience: Option<f64>,
}

impl Skill {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            years_of_experience: None,
        }
    }
}

/// A desired job type (candidate) or an offered job (posting)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobProfileEntry {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub industry: String,
    #[serde(default)]
    pub skills: Vec<Skill>,
}

impl JobProfileEntry {
    pub fn new(title: impl Into<String>, industry: impl Into<String>, skills: &[&str]) -> Self {
        Self {
            title: title.into(),
            industry: industry.into(),
            skills: skills.iter().map(|s| Skill::named(*s)).collect(),
        }
    }
}

/// Hourly pay range. Candidates only need `min` (their desired floor).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PayRange {
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
}

/// One side of a match: a candidate or a job posting
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_profile"))]
pub struct Profile {
    #[serde(rename = "selectedJobs", default)]
    #[validate(length(max = 20))]
    pub selected_jobs: Vec<JobProfileEntry>,
    #[serde(default, deserialize_with = "deserialize_location", skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability: Option<WeeklyAvailability>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,
    #[serde(rename = "overviewResponses", default, skip_serializing_if = "BTreeMap::is_empty")]
    pub overview_responses: BTreeMap<String, String>,
    #[serde(rename = "payRange", default, skip_serializing_if = "Option::is_none")]
    pub pay_range: Option<PayRange>,
    #[serde(rename = "tipRange", default, skip_serializing_if = "Option::is_none")]
    pub tip_range: Option<PayRange>,
}

impl Profile {
    /// Free-text summary: the explicit overview, else the joined answers
    pub fn overview_text(&self) -> Option<String> {
        match &self.overview {
            Some(text) if !text.trim().is_empty() => Some(text.clone()),
            _ if !self.overview_responses.is_empty() => Some(
                self.overview_responses
                    .values()
                    .map(String::as_str)
                    .collect::<Vec<_>>()
                    .join(" "),
            ),
            _ => None,
        }
    }
}

fn validate_profile(profile: &Profile) -> Result<(), ValidationError> {
    if let Some(point) = &profile.location {
        if !point.in_range() {
            return Err(ValidationError::new("location_out_of_range"));
        }
    }
    Ok(())
}

/// Composite score with its breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub score: f64,
    #[serde(rename = "jobScore")]
    pub job_score: f64,
    #[serde(rename = "locationScore")]
    pub location_score: f64,
    #[serde(rename = "availabilityScore")]
    pub availability_score: f64,
    /// Points contributed by every weighted factor
    #[serde(default)]
    pub breakdown: BTreeMap<Factor, f64>,
}
