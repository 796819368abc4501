//! 内存存储实现
//!
//! 仅用于测试和本地演示。
//!
//! 功能：
//! - 按表名保存插入的行（RwLock + HashMap，线程安全）
//! - 模拟服务端分配的自增主键
//! - profile 创建做主键冲突检查，贴近存储端约束行为

use crate::error::StorageError;
use crate::traits::{ProfileStore, TableStore};
use async_trait::async_trait;
use domain::{TableKind, TableRecord, UserProfile};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::RwLock;

/// 内存表存储
#[derive(Default)]
pub struct InMemoryTables {
    state: RwLock<State>,
}

#[derive(Default)]
struct State {
    rows: HashMap<&'static str, Vec<Value>>,
    next_id: u64,
}

impl InMemoryTables {
    pub fn new() -> Self {
        Self::default()
    }

    /// 某张表当前保存的所有行（测试断言用）。
    pub fn rows(&self, table: TableKind) -> Vec<Value> {
        self.state
            .read()
            .ok()
            .and_then(|state| state.rows.get(table.as_str()).cloned())
            .unwrap_or_default()
    }

    /// 全部表的行数之和（测试断言用）。
    pub fn total_rows(&self) -> usize {
        self.state
            .read()
            .map(|state| state.rows.values().map(Vec::len).sum())
            .unwrap_or(0)
    }
}

#[async_trait]
impl TableStore for InMemoryTables {
    async fn insert(&self, record: &TableRecord) -> Result<Value, StorageError> {
        let mut row = serde_json::to_value(record)
            .map_err(|err| StorageError::new(format!("record serialization failed: {err}")))?;

        let mut state = self
            .state
            .write()
            .map_err(|_| StorageError::new("store lock poisoned"))?;
        // users 行自带 id；其余表模拟服务端分配自增主键
        if record.table() != TableKind::Users {
            state.next_id += 1;
            if let Some(map) = row.as_object_mut() {
                map.insert("id".to_string(), Value::from(state.next_id));
            }
        }
        state
            .rows
            .entry(record.table().as_str())
            .or_default()
            .push(row.clone());
        Ok(row)
    }
}

#[async_trait]
impl ProfileStore for InMemoryTables {
    async fn find_by_id(&self, id: &str) -> Result<Option<UserProfile>, StorageError> {
        Ok(self.find_profile(|profile| profile.id == id))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserProfile>, StorageError> {
        Ok(self.find_profile(|profile| profile.email == email))
    }

    async fn create(&self, profile: &UserProfile) -> Result<UserProfile, StorageError> {
        if self
            .find_profile(|existing| existing.id == profile.id)
            .is_some()
        {
            return Err(StorageError::new(format!(
                "duplicate key on users.id: {}",
                profile.id
            )));
        }
        self.insert(&TableRecord::Users(profile.clone())).await?;
        Ok(profile.clone())
    }
}

impl InMemoryTables {
    fn find_profile(&self, matches: impl Fn(&UserProfile) -> bool) -> Option<UserProfile> {
        self.rows(TableKind::Users)
            .into_iter()
            .filter_map(|row| serde_json::from_value::<UserProfile>(row).ok())
            .find(|profile| matches(profile))
    }
}
