use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use uuid::Uuid;

use spark_shared::types::{BatchProfilesRequest, EligibleProfilesQuery, ProfileDocument};

use super::{ProfileStore, StoreError, StoreResult};

/// Reads profiles from the internal endpoints of `spark-profile`.
pub struct HttpProfileStore {
    client: reqwest::Client,
    base_url: String,
}

impl HttpProfileStore {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/internal/profiles{path}", self.base_url)
    }
}

fn ensure_success(response: reqwest::Response) -> StoreResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        tracing::warn!(status = %status, url = %response.url(), "profile service request failed");
        Err(StoreError::Upstream(status.as_u16()))
    }
}

#[async_trait]
impl ProfileStore for HttpProfileStore {
    async fn profile(&self, id: Uuid) -> StoreResult<Option<ProfileDocument>> {
        let response = self.client.get(self.url(&format!("/{id}"))).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let profile = ensure_success(response)?.json::<ProfileDocument>().await?;
        Ok(Some(profile))
    }

    async fn eligible_profiles(&self, query: &EligibleProfilesQuery) -> StoreResult<Vec<ProfileDocument>> {
        let response = self
            .client
            .post(self.url("/eligible"))
            .json(query)
            .send()
            .await?;
        let profiles = ensure_success(response)?.json::<Vec<ProfileDocument>>().await?;

        tracing::debug!(
            genders = ?query.genders,
            age_min = query.age_min,
            age_max = query.age_max,
            fetched = profiles.len(),
            "eligible profiles fetched"
        );
        Ok(profiles)
    }

    async fn profiles_by_ids(&self, ids: &[Uuid]) -> StoreResult<Vec<ProfileDocument>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        let response = self
            .client
            .post(self.url("/batch"))
            .json(&BatchProfilesRequest { ids: ids.to_vec() })
            .send()
            .await?;
        Ok(ensure_success(response)?.json::<Vec<ProfileDocument>>().await?)
    }
}
