//! Klimatkollen REST API client (companies).

use log::info;
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;

use crate::domain::Company;
use crate::error::AppError;

/// Public API root used when `KLIMATKOLLEN_API_URL` is unset.
pub const DEFAULT_BASE_URL: &str = "https://api.klimatkollen.se/api";

/// Environment variable overriding the API root.
pub const BASE_URL_ENV: &str = "KLIMATKOLLEN_API_URL";

pub struct KlimatkollenClient {
    client: Client,
    base_url: String,
}

impl KlimatkollenClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Build a client from `.env` / the process environment.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        let base_url = match std::env::var(BASE_URL_ENV) {
            Ok(url) if url.trim().is_empty() => {
                return Err(AppError::usage(format!("{BASE_URL_ENV} is set but empty.")));
            }
            Ok(url) => url,
            Err(_) => DEFAULT_BASE_URL.to_string(),
        };
        Ok(Self::new(base_url))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch every company with its reporting periods.
    pub fn fetch_companies(&self) -> Result<Vec<Company>, AppError> {
        let companies: Vec<Company> = self.get_json(&self.companies_url(None))?;
        info!("fetched {} companies from {}", companies.len(), self.base_url);
        Ok(companies)
    }

    /// Fetch a single company by Wikidata id (e.g. `Q52825`).
    pub fn fetch_company(&self, wikidata_id: &str) -> Result<Company, AppError> {
        let id = wikidata_id.trim();
        if id.is_empty() {
            return Err(AppError::usage("Company id must not be empty."));
        }
        self.get_json(&self.companies_url(Some(id)))
    }

    fn companies_url(&self, id: Option<&str>) -> String {
        match id {
            Some(id) => format!("{}/companies/{id}", self.base_url),
            None => format!("{}/companies", self.base_url),
        }
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, AppError> {
        let resp = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .map_err(|e| AppError::api(format!("Klimatkollen request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::api(format!(
                "Klimatkollen request to {url} failed with status {}.",
                resp.status()
            )));
        }

        resp.json()
            .map_err(|e| AppError::api(format!("Failed to parse Klimatkollen response: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_are_built_without_double_slashes() {
        let client = KlimatkollenClient::new("http://localhost:3000/api/");
        assert_eq!(client.base_url(), "http://localhost:3000/api");
        assert_eq!(client.companies_url(None), "http://localhost:3000/api/companies");
        assert_eq!(client.companies_url(Some("Q1")), "http://localhost:3000/api/companies/Q1");
    }

    #[test]
    fn empty_company_id_is_rejected_before_any_request() {
        let client = KlimatkollenClient::new(DEFAULT_BASE_URL);
        let err = client.fetch_company("  ").unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
