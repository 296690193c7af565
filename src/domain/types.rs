// ==========================================
// 推文审核系统 - 领域类型定义
// ==========================================
// 推文生命周期状态: 五个已知状态 + 透传的自定义状态
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 推文状态 (Tweet Status)
// ==========================================
// 已知状态之外的任意字符串原样保存（Custom），不做校验
// 序列化格式: 与数据库一致的原始字符串（"Draft" / "Posted" ...）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TweetStatus {
    #[default]
    Draft, // 草稿
    Approved, // 已通过
    Rejected, // 已拒绝
    Posted,   // 已发布（终态）
    Deleted,  // 已删除（软删除）
    Custom(String),
}

impl TweetStatus {
    /// 数据库存储值
    pub fn as_str(&self) -> &str {
        match self {
            TweetStatus::Draft => "Draft",
            TweetStatus::Approved => "Approved",
            TweetStatus::Rejected => "Rejected",
            TweetStatus::Posted => "Posted",
            TweetStatus::Deleted => "Deleted",
            TweetStatus::Custom(s) => s,
        }
    }

    /// 从数据库存储值解析（大小写敏感，未知值保留为 Custom）
    pub fn from_db_str(s: &str) -> Self {
        match s {
            "Draft" => TweetStatus::Draft,
            "Approved" => TweetStatus::Approved,
            "Rejected" => TweetStatus::Rejected,
            "Posted" => TweetStatus::Posted,
            "Deleted" => TweetStatus::Deleted,
            other => TweetStatus::Custom(other.to_string()),
        }
    }

    /// 是否为发布终态
    pub fn is_posted(&self) -> bool {
        matches!(self, TweetStatus::Posted)
    }
}

impl fmt::Display for TweetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<String> for TweetStatus {
    fn from(s: String) -> Self {
        TweetStatus::from_db_str(&s)
    }
}

impl From<&str> for TweetStatus {
    fn from(s: &str) -> Self {
        TweetStatus::from_db_str(s)
    }
}

impl From<TweetStatus> for String {
    fn from(status: TweetStatus) -> Self {
        status.as_str().to_string()
    }
}
