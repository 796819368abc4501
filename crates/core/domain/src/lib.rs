pub mod record;

pub use record::{HistoryRecord, MessageRecord, TableRecord, UserProfile, ValueRecord};

use chrono::{DateTime, Utc};

/// 支持的表种类：每条记录的形状完全由表名决定。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Messages,
    Values,
    History,
    Users,
}

impl TableKind {
    /// 全部支持的表种类（用于校验与提示信息）。
    pub const ALL: [TableKind; 4] = [
        TableKind::Messages,
        TableKind::Values,
        TableKind::History,
        TableKind::Users,
    ];

    /// 表在存储端的名字。
    pub fn as_str(&self) -> &'static str {
        match self {
            TableKind::Messages => "messages",
            TableKind::Values => "values",
            TableKind::History => "history",
            TableKind::Users => "users",
        }
    }

    /// 从外部输入解析表名；未知表名返回 None。
    pub fn parse(name: &str) -> Option<TableKind> {
        match name {
            "messages" => Some(TableKind::Messages),
            "values" => Some(TableKind::Values),
            "history" => Some(TableKind::History),
            "users" => Some(TableKind::Users),
            _ => None,
        }
    }
}

impl std::fmt::Display for TableKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 路由上下文：Schema 路由所需的环境值。
///
/// `now` 在构造时捕获，使路由成为纯函数（测试可固定时间）。
#[derive(Debug, Clone)]
pub struct RouteContext {
    /// 当前已认证用户的邮箱（HTTP 发布路径提供；总线入站为 None）。
    pub user_email: Option<String>,
    /// 消息来源的总线主题（订阅路径与 HTTP 发布路径均提供）。
    pub topic: Option<String>,
    /// 路由求值时刻（history 表 date 缺省值的来源）。
    pub now: DateTime<Utc>,
}

impl RouteContext {
    pub fn new(user_email: Option<String>, topic: Option<String>) -> Self {
        Self {
            user_email,
            topic,
            now: Utc::now(),
        }
    }

    /// 固定求值时刻的上下文（测试用）。
    pub fn with_now(user_email: Option<String>, topic: Option<String>, now: DateTime<Utc>) -> Self {
        Self {
            user_email,
            topic,
            now,
        }
    }
}
