//! PostgREST 风格的托管表存储实现。
//!
//! 所有请求携带 `apikey` 与匿名密钥的 Bearer 头；插入请求附
//! `Prefer: return=representation`，以便拿到服务端回写的行
//! （主键与插入时间由存储端分配）。

use crate::error::StorageError;
use crate::traits::{ProfileStore, TableStore};
use async_trait::async_trait;
use domain::{TableKind, TableRecord, UserProfile};
use serde_json::Value;

/// 托管表存储客户端。
pub struct SupabaseTables {
    http: reqwest::Client,
    base_url: String,
    anon_key: String,
}

impl SupabaseTables {
    pub fn new(http: reqwest::Client, base_url: &str, anon_key: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
        }
    }

    async fn insert_row(&self, table: TableKind, body: &Value) -> Result<Value, StorageError> {
        let response = self
            .http
            .post(format!("{}/rest/v1/{}", self.base_url, table))
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
            .header("Prefer", "return=representation")
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(StorageError::new(format!(
                "insert into '{table}' failed ({status}): {detail}"
            )));
        }

        // representation 是单元素数组
        let mut rows: Vec<Value> = response.json().await?;
        if rows.is_empty() {
            return Err(StorageError::new(format!(
                "insert into '{table}' returned no representation"
            )));
        }
        Ok(rows.swap_remove(0))
    }

    async fn find_profile(
        &self,
        column: &str,
        value: &str,
    ) -> Result<Option<UserProfile>, StorageError> {
        let filter = format!("eq.{value}");
        let response = self
            .http
            .get(format!("{}/rest/v1/users", self.base_url))
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
            .query(&[("select", "id,name,email"), (column, filter.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(StorageError::new(format!(
                "users lookup failed ({status}): {detail}"
            )));
        }

        let mut rows: Vec<UserProfile> = response.json().await?;
        if rows.is_empty() {
            return Ok(None);
        }
        Ok(Some(rows.swap_remove(0)))
    }
}

#[async_trait]
impl TableStore for SupabaseTables {
    async fn insert(&self, record: &TableRecord) -> Result<Value, StorageError> {
        let body = serde_json::to_value(record)
            .map_err(|err| StorageError::new(format!("record serialization failed: {err}")))?;
        self.insert_row(record.table(), &body).await
    }
}

#[async_trait]
impl ProfileStore for SupabaseTables {
    async fn find_by_id(&self, id: &str) -> Result<Option<UserProfile>, StorageError> {
        self.find_profile("id", id).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserProfile>, StorageError> {
        self.find_profile("email", email).await
    }

    async fn create(&self, profile: &UserProfile) -> Result<UserProfile, StorageError> {
        let body = serde_json::to_value(profile)
            .map_err(|err| StorageError::new(format!("profile serialization failed: {err}")))?;
        let row = self.insert_row(TableKind::Users, &body).await?;
        serde_json::from_value(row)
            .map_err(|err| StorageError::new(format!("profile response malformed: {err}")))
    }
}
