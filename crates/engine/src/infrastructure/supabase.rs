//! Supabase profile store
//!
//! Reads the `islanders` table through Supabase's PostgREST endpoint. The
//! engine never writes profiles.

use async_trait::async_trait;
use island_domain::{Gender, Islander, IslanderId};
use reqwest::Client;
use std::time::Duration;

use crate::infrastructure::ports::{IslanderRepo, RepoError};

const ISLANDERS_TABLE: &str = "islanders";

#[derive(Clone)]
pub struct SupabaseIslanderRepo {
    client: Client,
    base_url: String,
    api_key: String,
}

impl SupabaseIslanderRepo {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Run a filtered select and return at most one row.
    async fn select_one(
        &self,
        operation: &'static str,
        filters: Vec<(&'static str, String)>,
    ) -> Result<Option<Islander>, RepoError> {
        let mut query: Vec<(&str, String)> = vec![("select", "*".to_string())];
        query.extend(filters);

        let response = self
            .client
            .get(format!("{}/rest/v1/{}", self.base_url, ISLANDERS_TABLE))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .query(&query)
            .send()
            .await
            .map_err(|e| RepoError::database(operation, e))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(RepoError::database(
                operation,
                format!("{}: {}", status, error_text),
            ));
        }

        let body = response
            .text()
            .await
            .map_err(|e| RepoError::database(operation, e))?;
        parse_rows(&body)
    }
}

fn parse_rows(body: &str) -> Result<Option<Islander>, RepoError> {
    let rows: Vec<Islander> = serde_json::from_str(body).map_err(RepoError::serialization)?;
    Ok(rows.into_iter().next())
}

fn eq(value: impl std::fmt::Display) -> String {
    format!("eq.{}", value)
}

fn neq(value: impl std::fmt::Display) -> String {
    format!("neq.{}", value)
}

#[async_trait]
impl IslanderRepo for SupabaseIslanderRepo {
    async fn get(&self, id: IslanderId) -> Result<Option<Islander>, RepoError> {
        self.select_one("get_islander", vec![("id", eq(id)), ("limit", "1".into())])
            .await
    }

    async fn get_by_wallet(&self, wallet_address: &str) -> Result<Option<Islander>, RepoError> {
        self.select_one(
            "get_islander_by_wallet",
            vec![("wallet_address", eq(wallet_address)), ("limit", "1".into())],
        )
        .await
    }

    async fn find_match(
        &self,
        exclude: IslanderId,
        gender: Gender,
    ) -> Result<Option<Islander>, RepoError> {
        self.select_one(
            "find_match",
            vec![
                ("gender", eq(gender)),
                ("status", eq("single")),
                ("id", neq(exclude)),
                ("order", "popularity.desc".into()),
                ("limit", "1".into()),
            ],
        )
        .await
    }

    async fn find_opponent(&self, exclude: IslanderId) -> Result<Option<Islander>, RepoError> {
        self.select_one(
            "find_opponent",
            vec![
                ("id", neq(exclude)),
                ("order", "popularity.desc".into()),
                ("limit", "1".into()),
            ],
        )
        .await
    }
}
