// ==========================================
// 推文审核系统 - 应用层
// ==========================================
// 职责: 装配共享连接、仓储与 API
// ==========================================

pub mod state;

// 重导出
pub use state::AppState;
