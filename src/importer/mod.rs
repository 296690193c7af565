// ==========================================
// 推文审核系统 - 导入层
// ==========================================
// 职责: 外部抓取结果文件 → 原始行
// 支持: CSV
// ==========================================

pub mod error;
pub mod scraped_csv;

// 重导出核心类型
pub use error::{ImportError, ImportResult};
pub use scraped_csv::ScrapedCsvParser;
