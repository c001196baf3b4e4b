use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use spark_shared::errors::{AppError, AppResult, ErrorCode};
use spark_shared::types::{AgeRange, Gender, Location, ProfileDocument};

use crate::schema::profiles;

// --- Profile sections stored as JSONB ---

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Lifestyle {
    pub drinking: Option<String>,
    pub smoking: Option<String>,
    pub workout: Option<String>,
    pub diet: Option<String>,
    pub pets: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileDetails {
    pub job_title: Option<String>,
    pub company: Option<String>,
    pub education_level: Option<String>,
    pub university: Option<String>,
    pub bio: Option<String>,
}

/// Decodes a JSONB column; malformed content reads as empty.
fn decode<T: DeserializeOwned + Default>(value: &serde_json::Value) -> T {
    serde_json::from_value(value.clone()).unwrap_or_default()
}

fn encode<T: Serialize>(value: &T) -> AppResult<serde_json::Value> {
    serde_json::to_value(value).map_err(|e| AppError::internal(e.to_string()))
}

// --- Profile ---

#[derive(Debug, Queryable, Selectable, Identifiable, Serialize, Clone)]
#[diesel(table_name = profiles)]
pub struct Profile {
    pub id: Uuid,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub height: Option<String>,
    pub weight: Option<String>,
    pub interests: serde_json::Value,
    pub looking_for: serde_json::Value,
    pub age_min: i32,
    pub age_max: i32,
    pub gender_filter: Option<serde_json::Value>,
    pub lifestyle: serde_json::Value,
    pub details: serde_json::Value,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub address: Option<String>,
    pub photos: serde_json::Value,
    pub profile_complete: bool,
    pub is_online: bool,
    pub last_seen_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    pub fn gender(&self) -> Option<Gender> {
        self.gender.as_deref().and_then(|g| g.parse().ok())
    }

    pub fn interests(&self) -> Vec<String> {
        decode(&self.interests)
    }

    pub fn looking_for(&self) -> Vec<String> {
        decode(&self.looking_for)
    }

    pub fn photos(&self) -> Vec<String> {
        decode(&self.photos)
    }

    pub fn lifestyle(&self) -> Lifestyle {
        decode(&self.lifestyle)
    }

    pub fn details(&self) -> ProfileDetails {
        decode(&self.details)
    }

    pub fn age_range(&self) -> AgeRange {
        AgeRange {
            min: self.age_min,
            max: self.age_max,
        }
    }

    pub fn location(&self) -> Location {
        Location {
            latitude: self.latitude,
            longitude: self.longitude,
            city: self.city.clone(),
            state: self.state.clone(),
            country: self.country.clone(),
            address: self.address.clone(),
        }
    }

    /// `None` when no filter is stored; unknown gender strings are skipped.
    pub fn gender_filter(&self) -> Option<Vec<Gender>> {
        let raw: Vec<String> = decode(self.gender_filter.as_ref()?);
        Some(raw.iter().filter_map(|g| g.parse().ok()).collect())
    }

    pub fn to_document(&self) -> ProfileDocument {
        ProfileDocument {
            id: self.id,
            display_name: self.display_name.clone(),
            age: self.age,
            gender: self.gender(),
            location: self.location(),
            photos: self.photos(),
            interests: self.interests(),
            bio: self.details().bio,
            age_range: self.age_range(),
            gender_filter: self.gender_filter(),
            profile_complete: self.profile_complete,
            is_online: self.is_online,
            last_seen_at: self.last_seen_at,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = profiles)]
pub struct NewProfile {
    pub id: Uuid,
    pub email: Option<String>,
    pub display_name: Option<String>,
}

// --- PATCH /me ---

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 50, message = "display name must be 1-50 characters"))]
    pub display_name: Option<String>,
    #[validate(length(min = 3, max = 32, message = "invalid phone number"))]
    pub phone: Option<String>,
    #[validate(range(min = 18, max = 120, message = "age must be between 18 and 120"))]
    pub age: Option<i32>,
    pub gender: Option<Gender>,
    #[validate(length(max = 20))]
    pub height: Option<String>,
    #[validate(length(max = 20))]
    pub weight: Option<String>,
    #[validate(length(max = 20, message = "at most 20 interests"))]
    pub interests: Option<Vec<String>>,
    pub looking_for: Option<Vec<String>>,
    pub age_range: Option<AgeRange>,
    pub gender_filter: Option<Vec<Gender>>,
    pub lifestyle: Option<Lifestyle>,
    pub details: Option<ProfileDetails>,
    pub location: Option<Location>,
    #[validate(length(max = 9, message = "at most 9 photos"))]
    pub photos: Option<Vec<String>>,
}

#[derive(Debug, Default, AsChangeset)]
#[diesel(table_name = profiles)]
pub struct ProfileChangeset {
    pub display_name: Option<String>,
    pub phone: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub height: Option<String>,
    pub weight: Option<String>,
    pub interests: Option<serde_json::Value>,
    pub looking_for: Option<serde_json::Value>,
    pub age_min: Option<i32>,
    pub age_max: Option<i32>,
    pub gender_filter: Option<serde_json::Value>,
    pub lifestyle: Option<serde_json::Value>,
    pub details: Option<serde_json::Value>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub address: Option<String>,
    pub photos: Option<serde_json::Value>,
}

/// Latitude/longitude must be in range when given; 0 stands for "not set yet".
fn check_location(location: &Location) -> AppResult<()> {
    let in_range = location.latitude.map_or(true, |lat| (-90.0..=90.0).contains(&lat))
        && location.longitude.map_or(true, |lng| (-180.0..=180.0).contains(&lng));
    if in_range {
        Ok(())
    } else {
        Err(AppError::new(ErrorCode::InvalidLocation, "coordinates out of range"))
    }
}

impl UpdateProfileRequest {
    /// Validates the request and turns it into column updates.
    pub fn into_changeset(self) -> AppResult<ProfileChangeset> {
        self.validate()
            .map_err(|e| AppError::new(ErrorCode::ValidationError, e.to_string()))?;

        if let Some(range) = &self.age_range {
            if !range.is_valid() {
                return Err(AppError::new(
                    ErrorCode::InvalidAgeRange,
                    "age range must start at 18 or above and min must not exceed max",
                ));
            }
        }
        if let Some(location) = &self.location {
            check_location(location)?;
        }

        let gender_filter = self
            .gender_filter
            .map(|genders| genders.iter().map(Gender::as_str).collect::<Vec<_>>());

        let mut changeset = ProfileChangeset {
            display_name: self.display_name.map(|n| n.trim().to_string()),
            phone: self.phone,
            age: self.age,
            gender: self.gender.map(|g| g.as_str().to_string()),
            height: self.height,
            weight: self.weight,
            interests: self.interests.as_ref().map(encode).transpose()?,
            looking_for: self.looking_for.as_ref().map(encode).transpose()?,
            age_min: self.age_range.map(|r| r.min),
            age_max: self.age_range.map(|r| r.max),
            gender_filter: gender_filter.as_ref().map(encode).transpose()?,
            lifestyle: self.lifestyle.as_ref().map(encode).transpose()?,
            details: self.details.as_ref().map(encode).transpose()?,
            photos: self.photos.as_ref().map(encode).transpose()?,
            ..Default::default()
        };

        if let Some(location) = self.location {
            changeset.latitude = location.latitude;
            changeset.longitude = location.longitude;
            changeset.city = location.city;
            changeset.state = location.state;
            changeset.country = location.country;
            changeset.address = location.address;
        }

        Ok(changeset)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// A profile that passes every onboarding step.
    pub fn complete_profile() -> Profile {
        let now = Utc::now();
        Profile {
            id: Uuid::new_v4(),
            display_name: Some("Camille".into()),
            email: Some("camille@example.com".into()),
            phone: Some("+33600000000".into()),
            age: Some(29),
            gender: Some("female".into()),
            height: Some("170".into()),
            weight: Some("60".into()),
            interests: serde_json::json!(["hiking", "jazz"]),
            looking_for: serde_json::json!(["relationship"]),
            age_min: 25,
            age_max: 35,
            gender_filter: None,
            lifestyle: serde_json::json!({
                "drinking": "socially",
                "smoking": "never",
                "workout": "often",
                "diet": "vegetarian",
                "pets": "cat"
            }),
            details: serde_json::json!({
                "job_title": "Engineer",
                "company": "Acme",
                "education_level": "Masters",
                "university": "Sorbonne",
                "bio": "Coffee first."
            }),
            latitude: Some(48.8566),
            longitude: Some(2.3522),
            city: Some("Paris".into()),
            state: None,
            country: Some("France".into()),
            address: None,
            photos: serde_json::json!(["https://cdn.example/a.jpg", "https://cdn.example/b.jpg"]),
            profile_complete: false,
            is_online: false,
            last_seen_at: None,
            created_at: now,
            updated_at: now,
        }
    }
}
