//! 存储能力：托管表存储的插入/查询网关。
//!
//! 分层与实现：
//! - `traits`：`TableStore` / `ProfileStore` 异步接口
//! - `error`：统一的存储错误类型
//! - `supabase`：PostgREST 风格的 REST 实现（生产）
//! - `in_memory`：内存实现（测试与本地演示）
//!
//! 设计约束：
//! - Handler 层不直接发 REST 请求，统一经过 storage 层
//! - 插入失败不自动重试、不排队，由调用方决定上报或丢弃

pub mod error;
pub mod in_memory;
pub mod supabase;
pub mod traits;

pub use error::StorageError;
pub use in_memory::InMemoryTables;
pub use supabase::SupabaseTables;
pub use traits::{ProfileStore, TableStore};
