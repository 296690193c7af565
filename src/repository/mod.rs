// ==========================================
// 推文审核系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务规则（派生规则在 engine）
// 职责: 提供数据访问接口，屏蔽数据库细节
// 约束: 所有查询使用参数化，防止 SQL 注入
// ==========================================

pub mod campaign_repo;
pub mod error;
pub mod id_resolver;
pub mod scraped_tweet_repo;

// 重导出核心仓储
pub use campaign_repo::CampaignRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use id_resolver::{resolve_unique, IdFallback, MAX_SUFFIX_ATTEMPT};
pub use scraped_tweet_repo::ScrapedTweetRepository;
