use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub const ALL: [Gender; 3] = [Gender::Male, Gender::Female, Gender::Other];

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            "other" => Ok(Gender::Other),
            _ => Err(format!("unknown gender: {s}")),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub address: Option<String>,
}

impl Location {
    /// `(latitude, longitude)` when both are usable for distance ranking.
    ///
    /// Zero is treated as "never set": onboarding initialises both axes to 0.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        let (lat, lng) = (self.latitude?, self.longitude?);
        let valid = lat.is_finite()
            && lng.is_finite()
            && lat != 0.0
            && lng != 0.0
            && (-90.0..=90.0).contains(&lat)
            && (-180.0..=180.0).contains(&lng);
        valid.then_some((lat, lng))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeRange {
    pub min: i32,
    pub max: i32,
}

impl AgeRange {
    pub fn contains(&self, age: i32) -> bool {
        (self.min..=self.max).contains(&age)
    }

    pub fn is_valid(&self) -> bool {
        self.min >= 18 && self.min <= self.max
    }
}

impl Default for AgeRange {
    fn default() -> Self {
        Self { min: 18, max: 40 }
    }
}

/// Profile as exchanged between services.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileDocument {
    pub id: Uuid,
    pub display_name: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<Gender>,
    #[serde(default)]
    pub location: Location,
    #[serde(default)]
    pub photos: Vec<String>,
    #[serde(default)]
    pub interests: Vec<String>,
    pub bio: Option<String>,
    #[serde(default)]
    pub age_range: AgeRange,
    /// Explicit accepted genders; `None` derives them from the profile's own gender.
    pub gender_filter: Option<Vec<Gender>>,
    pub profile_complete: bool,
    #[serde(default)]
    pub is_online: bool,
    pub last_seen_at: Option<DateTime<Utc>>,
}

/// Body of `POST /internal/profiles/eligible`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EligibleProfilesQuery {
    pub genders: Vec<Gender>,
    pub age_min: i32,
    pub age_max: i32,
    pub limit: i64,
}

/// Body of `POST /internal/profiles/batch`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchProfilesRequest {
    pub ids: Vec<Uuid>,
}
