// ==========================================
// 推文审核系统 - API 层
// ==========================================
// 职责: 对外业务接口（输入校验 + 日志），供工作流与命令行调用
// ==========================================

pub mod admin_api;
pub mod error;
pub mod review_api;
pub mod scraped_api;

#[cfg(test)]
mod tests;

// 重导出核心类型
pub use admin_api::AdminApi;
pub use error::{ApiError, ApiResult};
pub use review_api::ReviewApi;
pub use scraped_api::{CsvImportSummary, ScrapedApi, ScrapedTweetPage};
