//! 存储接口 Trait 定义
//!
//! - `TableStore`：按记录所属表执行行级插入
//! - `ProfileStore`：users 表（profile）的查询与创建
//!
//! 设计原则：
//! - 所有接口返回 StorageError
//! - 使用 async_trait 支持动态分发，便于测试替换内存实现

use crate::error::StorageError;
use async_trait::async_trait;
use domain::{TableRecord, UserProfile};
use serde_json::Value;

/// 表存储接口
///
/// 插入一条已路由的记录，返回存储端回写的完整行
/// （含服务端分配的主键与插入时间）。
#[async_trait]
pub trait TableStore: Send + Sync {
    async fn insert(&self, record: &TableRecord) -> Result<Value, StorageError>;
}

/// Profile（users 表）存储接口
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// 按身份服务 subject id 查找 profile
    async fn find_by_id(&self, id: &str) -> Result<Option<UserProfile>, StorageError>;

    /// 按邮箱查找 profile
    async fn find_by_email(&self, email: &str) -> Result<Option<UserProfile>, StorageError>;

    /// 创建 profile；主键冲突视为错误
    async fn create(&self, profile: &UserProfile) -> Result<UserProfile, StorageError>;
}
