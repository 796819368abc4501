//! 各表的类型化记录。
//!
//! 记录的字段集由表名唯一决定，路由器只能产出这里定义的形状，
//! 不允许把任意字段透传到存储端。

use crate::TableKind;
use serde::{Deserialize, Serialize};

/// messages 表记录：任意入站报文的兜底形状。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageRecord {
    pub topic: String,
    pub payload: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
}

/// values 表记录：一次传感器读数。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueRecord {
    pub data: f64,
    /// 缺省时不序列化，交给存储端填默认时间。
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

/// history 表记录：一条可审计的动作记录。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// 允许为 null（总线入站没有用户身份），插入时保留该列。
    pub performer: Option<String>,
    pub value: f64,
    pub date: String,
}

/// users 表记录：认证身份对应的 profile 行。
///
/// password 归身份服务所有，永远不落到这张表。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// 四种表记录的封闭集合。
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TableRecord {
    Messages(MessageRecord),
    Values(ValueRecord),
    History(HistoryRecord),
    Users(UserProfile),
}

impl TableRecord {
    /// 记录所属的表。
    pub fn table(&self) -> TableKind {
        match self {
            TableRecord::Messages(_) => TableKind::Messages,
            TableRecord::Values(_) => TableKind::Values,
            TableRecord::History(_) => TableKind::History,
            TableRecord::Users(_) => TableKind::Users,
        }
    }
}
