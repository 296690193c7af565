// ==========================================
// 推文审核系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod campaign;
pub mod scraped_tweet;
pub mod types;

// 重导出核心类型
pub use campaign::{
    Campaign, CampaignPayload, CampaignWithTweets, CascadeDeleteResult, Tweet, TweetPayload,
};
pub use scraped_tweet::{
    BulkInsertReport, DuplicateCheck, RawScrapedRow, ScrapedTweet, ScrapedTweetQuery,
    ScrapedTweetStats, ScrapedTweetView,
};
pub use types::TweetStatus;
