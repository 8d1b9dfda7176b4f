// src/services/catalog.rs

//! Remote catalog client.
//!
//! One GET per catalog node, decoded into a typed record. There are no
//! retries: a non-2xx status or a body of the wrong shape fails that one
//! request and the caller decides what the failure costs.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::error::{AppError, Result};
use crate::models::{
    CourseRef, DepartmentRef, HarvesterConfig, OutlineRes, SectionDetailRaw, SectionRef, TermKey,
};
use crate::utils::http::create_async_client;

/// Read access to the hierarchical catalog.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// List the departments offering courses in a term.
    async fn departments(&self, term: &TermKey) -> Result<Vec<DepartmentRef>>;

    /// List a department's courses in a term.
    async fn courses(&self, term: &TermKey, dept: &str) -> Result<Vec<CourseRef>>;

    /// List a course's sections in a term.
    async fn sections(&self, term: &TermKey, dept: &str, number: &str) -> Result<Vec<SectionRef>>;

    /// Fetch one section's detail page.
    async fn section_detail(
        &self,
        term: &TermKey,
        dept: &str,
        number: &str,
        section: &str,
    ) -> Result<SectionDetailRaw>;

    /// Fetch the course outline carried by a section's detail page.
    async fn outline(
        &self,
        term: &TermKey,
        dept: &str,
        number: &str,
        section: &str,
    ) -> Result<OutlineRes>;
}

/// [`CatalogSource`] over HTTP.
#[derive(Clone)]
pub struct RemoteCatalogClient {
    client: Client,
    base_url: String,
}

impl RemoteCatalogClient {
    /// Create a client from harvester settings.
    pub fn new(config: &HarvesterConfig) -> Result<Self> {
        Ok(Self::with_client(
            create_async_client(config)?,
            &config.base_url,
        ))
    }

    /// Wrap an existing HTTP client.
    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches(['/', '?']).to_string(),
        }
    }

    /// URL of a catalog node: `{base}?{year}/{season}[/{dept}[/{number}[/{section}]]]`.
    pub fn node_url(&self, term: &TermKey, segments: &[&str]) -> String {
        let mut path = term.catalog_path();
        for segment in segments {
            path.push('/');
            path.push_str(&segment.to_lowercase());
        }
        format!("{}?{}", self.base_url, path)
    }

    /// Perform exactly one GET and decode the body as `T`.
    pub async fn fetch<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(AppError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|source| AppError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

#[async_trait]
impl CatalogSource for RemoteCatalogClient {
    async fn departments(&self, term: &TermKey) -> Result<Vec<DepartmentRef>> {
        self.fetch(&self.node_url(term, &[])).await
    }

    async fn courses(&self, term: &TermKey, dept: &str) -> Result<Vec<CourseRef>> {
        self.fetch(&self.node_url(term, &[dept])).await
    }

    async fn sections(&self, term: &TermKey, dept: &str, number: &str) -> Result<Vec<SectionRef>> {
        self.fetch(&self.node_url(term, &[dept, number])).await
    }

    async fn section_detail(
        &self,
        term: &TermKey,
        dept: &str,
        number: &str,
        section: &str,
    ) -> Result<SectionDetailRaw> {
        self.fetch(&self.node_url(term, &[dept, number, section]))
            .await
    }

    async fn outline(
        &self,
        term: &TermKey,
        dept: &str,
        number: &str,
        section: &str,
    ) -> Result<OutlineRes> {
        self.fetch(&self.node_url(term, &[dept, number, section]))
            .await
    }
}
