// ==========================================
// 推文审核系统 - 引擎层
// ==========================================
// 职责: 业务规则（纯计算）
// - display_name: 活动显示名生成
// - lifecycle: 推文状态 / 内容编辑派生字段
// - scraped_row: 抓取行字段归一化
// ==========================================

pub mod display_name;
pub mod lifecycle;
pub mod scraped_row;

// 重导出
pub use display_name::{derive_display_name, parse_iso_datetime};
pub use lifecycle::{
    character_count, mark_description_deleted, plan_content_edit, plan_status_change,
    ContentEdit, StatusChange, DELETED_MARKER,
};
pub use scraped_row::{
    map_row, parse_platform_date, row_tweet_id, RowError, PLATFORM_DATE_FORMAT,
};
