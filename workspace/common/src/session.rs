use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use utoipa::ToSchema;

/// Elapsed time kept as separate components so that totals may exceed a day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionDuration {
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
}

impl SessionDuration {
    pub fn new(hours: u32, minutes: u32, seconds: u32) -> Self {
        Self {
            hours,
            minutes,
            seconds,
        }
    }

    /// Adds component-wise, rolling seconds into minutes and minutes into hours.
    pub fn add(self, other: SessionDuration) -> Self {
        let seconds = self.seconds + other.seconds;
        let minutes = self.minutes + other.minutes + seconds / 60;
        let hours = self.hours + other.hours + minutes / 60;
        Self {
            hours,
            minutes: minutes % 60,
            seconds: seconds % 60,
        }
    }

    pub fn total_seconds(&self) -> u64 {
        u64::from(self.hours) * 3600 + u64::from(self.minutes) * 60 + u64::from(self.seconds)
    }
}

impl From<NaiveTime> for SessionDuration {
    fn from(time: NaiveTime) -> Self {
        Self::new(time.hour(), time.minute(), time.second())
    }
}

impl fmt::Display for SessionDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hours, self.minutes, self.seconds)
    }
}

impl Serialize for SessionDuration {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SessionDuration {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        let parts: Vec<&str> = raw.split(':').collect();
        if parts.len() != 3 {
            return Err(serde::de::Error::custom(format!(
                "expected HH:MM:SS, got '{}'",
                raw
            )));
        }
        let parse = |part: &str| part.parse::<u32>().map_err(serde::de::Error::custom);
        let (hours, minutes, seconds) = (parse(parts[0])?, parse(parts[1])?, parse(parts[2])?);
        if minutes >= 60 || seconds >= 60 {
            return Err(serde::de::Error::custom(format!(
                "minutes and seconds must be below 60, got '{}'",
                raw
            )));
        }
        Ok(Self::new(hours, minutes, seconds))
    }
}

/// A logged training as exposed by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TrainingRecord {
    pub id: i32,
    /// Elapsed time as `HH:MM:SS`
    #[serde(rename = "tiempo")]
    #[schema(value_type = String, example = "00:10:30")]
    pub duration: NaiveTime,
    #[serde(rename = "repeticiones")]
    pub repetitions: i32,
    #[serde(rename = "fecha")]
    pub date: NaiveDate,
    #[serde(rename = "ejercicio")]
    pub exercise_id: i32,
    #[serde(rename = "persona")]
    pub person_id: i32,
    #[serde(rename = "rutina")]
    pub routine_id: Option<i32>,
}

/// Trainings of one person performed as one routine on one date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RoutineSession {
    #[serde(rename = "fecha")]
    pub date: NaiveDate,
    #[serde(rename = "rutina")]
    pub routine_id: i32,
    #[serde(rename = "persona")]
    pub person_id: i32,
    #[serde(rename = "repeticiones")]
    pub total_repetitions: i64,
    #[serde(rename = "tiempo")]
    #[schema(value_type = String, example = "01:05:30")]
    pub total_duration: SessionDuration,
    #[serde(rename = "entrenamientos")]
    pub trainings: Vec<TrainingRecord>,
}
