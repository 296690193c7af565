// ==========================================
// 推文审核系统 - 推文生命周期规则
// ==========================================
// 职责: 计算状态变更 / 内容编辑的派生字段
// 红线: 纯计算，不访问数据库（由 Repository 落库）
// ==========================================

use crate::domain::types::TweetStatus;
use chrono::NaiveDateTime;

/// 软删除时写入活动描述的前缀
pub const DELETED_MARKER: &str = "[DELETED] ";

/// 字符数（按 Unicode 标量值计数）
pub fn character_count(content: &str) -> i64 {
    content.chars().count() as i64
}

// ==========================================
// StatusChange - 状态变更计划
// ==========================================
// posted_date / deleted_at 为 None 表示“保持原值”，不会清空
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChange {
    pub status: TweetStatus,
    pub last_modified: NaiveDateTime,
    pub posted_date: Option<NaiveDateTime>,
    pub deleted_at: Option<NaiveDateTime>,
}

/// 计算状态变更
///
/// - 任意状态: 覆盖 status，刷新 last_modified
/// - Posted: 额外写入 posted_date
/// - Deleted: 额外写入 deleted_at
pub fn plan_status_change(new_status: TweetStatus, now: NaiveDateTime) -> StatusChange {
    let posted_date = new_status.is_posted().then_some(now);
    let deleted_at = matches!(new_status, TweetStatus::Deleted).then_some(now);

    StatusChange {
        status: new_status,
        last_modified: now,
        posted_date,
        deleted_at,
    }
}

// ==========================================
// ContentEdit - 内容编辑
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentEdit {
    pub content: String,
    pub character_count: i64,
    pub is_edited: bool,
    pub last_modified: NaiveDateTime,
}

/// 计算内容编辑（字符数随内容重算，标记已编辑）
pub fn plan_content_edit(new_content: &str, now: NaiveDateTime) -> ContentEdit {
    ContentEdit {
        content: new_content.to_string(),
        character_count: character_count(new_content),
        is_edited: true,
        last_modified: now,
    }
}

/// 软删除时的活动描述（已带前缀则保持不变）
pub fn mark_description_deleted(description: &str) -> String {
    if description.starts_with(DELETED_MARKER) {
        description.to_string()
    } else {
        format!("{}{}", DELETED_MARKER, description)
    }
}
