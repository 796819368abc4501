//! Schema 路由：把 `(表名, 原始字段)` 映射为对应表的类型化记录。
//!
//! 这是整个系统里唯一的"规则表"：按表名逐条做字段缺省与校验，
//! 没有任何副作用，HTTP 发布路径与总线订阅路径共用同一套规则。

use domain::{
    HistoryRecord, MessageRecord, RouteContext, TableKind, TableRecord, ValueRecord,
};
use serde_json::{Map, Value};

/// 路由拒绝原因。
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RouteError {
    #[error("unsupported table: {0}")]
    UnsupportedTable(String),
    #[error("table '{table}' requires field '{field}'")]
    MissingField {
        table: &'static str,
        field: &'static str,
    },
    #[error("field '{field}' of table '{table}' must be numeric")]
    InvalidField {
        table: &'static str,
        field: &'static str,
    },
    #[error("users table is managed by the registration flow, use POST /register")]
    ReservedTable,
}

/// 按表名路由原始字段，产出类型化记录或拒绝原因。
///
/// 纯函数：相同的 `(table_name, fields, ctx)` 永远得到相同结果
/// （ctx 自带求值时刻）。
pub fn route(
    table_name: &str,
    fields: &Map<String, Value>,
    ctx: &RouteContext,
) -> Result<TableRecord, RouteError> {
    let Some(table) = TableKind::parse(table_name) else {
        return Err(RouteError::UnsupportedTable(table_name.to_string()));
    };
    match table {
        TableKind::Messages => route_messages(fields, ctx),
        TableKind::Values => route_values(fields),
        TableKind::History => route_history(fields, ctx),
        // users 只能走注册/建档流程，禁止通用发布路径直写。
        TableKind::Users => Err(RouteError::ReservedTable),
    }
}

/// 解码总线入站报文，得到 `(表名, 候选字段)`。
///
/// - JSON 对象：取出并移除 `table_name`（缺省 "messages"），其余字段为候选记录；
/// - 其他任何内容：整体作为纯文本 payload，固定落入 messages 表。
pub fn decode_payload(raw: &[u8]) -> (String, Map<String, Value>) {
    if let Ok(Value::Object(mut map)) = serde_json::from_slice::<Value>(raw) {
        let table_name = match map.remove("table_name") {
            Some(Value::String(name)) => name,
            // 非字符串的 table_name 原样转成文本，让路由按未知表拒绝。
            Some(other) => other.to_string(),
            None => "messages".to_string(),
        };
        return (table_name, map);
    }

    let text = String::from_utf8_lossy(raw).into_owned();
    let mut map = Map::new();
    map.insert("payload".to_string(), Value::String(text));
    ("messages".to_string(), map)
}

fn route_messages(
    fields: &Map<String, Value>,
    ctx: &RouteContext,
) -> Result<TableRecord, RouteError> {
    let topic = match field_str(fields, "topic") {
        Some(topic) => topic,
        None => match ctx.topic.clone() {
            Some(topic) => topic,
            None => {
                return Err(RouteError::MissingField {
                    table: "messages",
                    field: "topic",
                });
            }
        },
    };

    // payload 缺省时取完整输入字段集的 JSON 文本（确定性序列化）。
    let payload = match fields.get("payload") {
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
        None => Value::Object(fields.clone()).to_string(),
    };

    let value = match fields.get("value") {
        Some(value) => Some(value.as_f64().ok_or(RouteError::InvalidField {
            table: "messages",
            field: "value",
        })?),
        None => None,
    };

    Ok(TableRecord::Messages(MessageRecord {
        topic,
        payload,
        value,
    }))
}

fn route_values(fields: &Map<String, Value>) -> Result<TableRecord, RouteError> {
    let data = fields
        .get("data")
        .ok_or(RouteError::MissingField {
            table: "values",
            field: "data",
        })?
        .as_f64()
        .ok_or(RouteError::InvalidField {
            table: "values",
            field: "data",
        })?;

    // date 原样透传；缺省时留空，由存储端填默认时间。
    let date = field_text(fields, "date");

    Ok(TableRecord::Values(ValueRecord { data, date }))
}

fn route_history(
    fields: &Map<String, Value>,
    ctx: &RouteContext,
) -> Result<TableRecord, RouteError> {
    let value = fields
        .get("value")
        .ok_or(RouteError::MissingField {
            table: "history",
            field: "value",
        })?
        .as_f64()
        .ok_or(RouteError::InvalidField {
            table: "history",
            field: "value",
        })?;

    // 记录只由 {performer, value, date} 重建，输入里的其余字段静默丢弃。
    let performer = field_str(fields, "performer").or_else(|| ctx.user_email.clone());
    let date = field_text(fields, "date").unwrap_or_else(|| ctx.now.to_rfc3339());

    Ok(TableRecord::History(HistoryRecord {
        performer,
        value,
        date,
    }))
}

fn field_str(fields: &Map<String, Value>, key: &str) -> Option<String> {
    fields.get(key).and_then(Value::as_str).map(str::to_string)
}

/// 取字段的文本形式：字符串原样，其他非 null 值转 JSON 文本。
fn field_text(fields: &Map<String, Value>, key: &str) -> Option<String> {
    match fields.get(key) {
        Some(Value::String(text)) => Some(text.clone()),
        Some(Value::Null) | None => None,
        Some(other) => Some(other.to_string()),
    }
}
