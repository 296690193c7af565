// ==========================================
// 推文审核系统 - 抓取推文领域模型
// ==========================================
// 对齐: scraped_tweets 表（只追加，不更新）
// 主键: 平台 tweet id
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// 工作流推送的原始行（键为 "Tweet ID" / "Likes" / "Date" ...）
pub type RawScrapedRow = serde_json::Map<String, JsonValue>;

/// 原始行字段名
pub mod row_keys {
    pub const TWEET_ID: &str = "Tweet ID";
    pub const URL: &str = "URL";
    pub const CONTENT: &str = "Content";
    pub const LIKES: &str = "Likes";
    pub const RETWEETS: &str = "Retweets";
    pub const REPLIES: &str = "Replies";
    pub const QUOTES: &str = "Quotes";
    pub const VIEWS: &str = "Views";
    pub const DATE: &str = "Date";
    pub const STATUS: &str = "Status";
    pub const TWEET_URL: &str = "Tweet";
}

/// 默认抓取状态
pub const DEFAULT_SCRAPE_STATUS: &str = "success";

// ==========================================
// ScrapedTweet - 抓取推文
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapedTweet {
    pub tweet_id: String,
    pub url: String,
    pub content: String,

    // ===== 互动计数 =====
    pub likes: i64,
    pub retweets: i64,
    pub replies: i64,
    pub quotes: i64,
    pub views: i64,

    // ===== 平台信息 =====
    pub date: Option<NaiveDateTime>, // 发布时间（UTC）
    pub status: String,
    pub tweet_url: String,

    // ===== 采集批次 =====
    pub execution_id: Option<String>,
    pub source_url: Option<String>,

    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl ScrapedTweet {
    /// 互动总数（点赞 + 转发 + 回复 + 引用）
    pub fn engagement_total(&self) -> i64 {
        self.likes + self.retweets + self.replies + self.quotes
    }
}

// ==========================================
// ScrapedTweetView - 列表行（附带互动总数）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapedTweetView {
    #[serde(flatten)]
    pub tweet: ScrapedTweet,
    pub engagement_total: i64,
}

impl From<ScrapedTweet> for ScrapedTweetView {
    fn from(tweet: ScrapedTweet) -> Self {
        let engagement_total = tweet.engagement_total();
        Self {
            tweet,
            engagement_total,
        }
    }
}

// ==========================================
// DuplicateCheck - 去重结果
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateCheck {
    /// 已存在（两阶段并集，已排序）
    pub existing_ids: Vec<String>,
    /// 候选中的新 id（保持输入顺序）
    pub new_ids: Vec<String>,
    /// 阶段1命中数（同 execution_id）
    pub execution_duplicates: usize,
    /// 阶段2命中数（全局主键）
    pub content_duplicates: usize,
}

impl DuplicateCheck {
    /// 失败放行：全部视为新数据
    pub fn all_new(candidate_ids: &[String]) -> Self {
        Self {
            new_ids: candidate_ids.to_vec(),
            ..Default::default()
        }
    }
}

// ==========================================
// BulkInsertReport - 批量写入结果
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkInsertReport {
    pub success_count: usize,
    pub error_count: usize,
    pub errors: Vec<String>,
}

// ==========================================
// ScrapedTweetQuery - 分页查询参数
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrapedTweetQuery {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
    pub execution_id: Option<String>,
}

// ==========================================
// ScrapedTweetStats - 统计汇总
// ==========================================
// 出错时返回 Default（全零 / None）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScrapedTweetStats {
    pub total_tweets: i64,
    pub total_likes: i64,
    pub total_retweets: i64,
    pub total_replies: i64,
    pub total_views: i64,
    pub avg_likes: f64, // 保留两位小数
    pub earliest_date: Option<NaiveDateTime>,
    pub latest_date: Option<NaiveDateTime>,
    pub execution_count: i64,
}
