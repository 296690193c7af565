// ==========================================
// 推文审核系统 - 活动 / 推文领域模型
// ==========================================
// 对齐: campaigns / tweets 表
// 入参: 工作流推送的活动 JSON（CampaignPayload）
// ==========================================

use crate::domain::types::TweetStatus;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

fn empty_json_array() -> JsonValue {
    JsonValue::Array(Vec::new())
}

/// 缺省的 analysis_summary（显式 null 与缺失不同）
pub fn empty_json_object() -> JsonValue {
    JsonValue::Object(serde_json::Map::new())
}

fn default_source_type() -> String {
    "api".to_string()
}

// ==========================================
// CampaignPayload - 活动入参
// ==========================================
// analysis_summary / 标签列表为自由 JSON，只在显示名生成时做防御性读取
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignPayload {
    pub campaign_batch: String,
    pub generated_at: String, // ISO-8601 文本
    #[serde(default)]
    pub tweet_count: Option<i64>, // 声明数量（仅提示）
    #[serde(default = "empty_json_object")]
    pub analysis_summary: JsonValue,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_source_type")]
    pub source_type: String,
    #[serde(default)]
    pub tweets: Vec<TweetPayload>,
}

impl CampaignPayload {
    /// 从 JSON 文本解析
    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }
}

// ==========================================
// TweetPayload - 推文入参
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TweetPayload {
    pub id: String,
    #[serde(rename = "type")]
    pub tweet_type: String,
    pub content: String,
    #[serde(default)]
    pub character_count: Option<i64>, // 入库时按 content 重新计算
    #[serde(default)]
    pub status: Option<TweetStatus>,
    #[serde(default)]
    pub engagement_hook: Option<String>,
    #[serde(default = "empty_json_array")]
    pub coophive_elements: JsonValue, // 领域元素标签
    #[serde(default = "empty_json_array")]
    pub discord_voice_patterns: JsonValue, // 语气模式标签
    #[serde(default)]
    pub theme_connection: Option<String>,
    #[serde(default)]
    pub is_edited: Option<bool>,
}

// ==========================================
// Campaign - 活动（campaigns 表）
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Campaign {
    // ===== 主键 =====
    pub campaign_batch: String,

    // ===== 生成信息 =====
    pub generated_at: NaiveDateTime,
    pub tweet_count: i64, // 读取时按实际推文数重算
    pub analysis_summary: JsonValue,

    // ===== 展示信息 =====
    pub title: String,
    pub description: String,
    pub source_type: String,
    pub display_name: Option<String>,

    // ===== 审计字段 =====
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

// ==========================================
// Tweet - 推文（tweets 表）
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tweet {
    pub id: String,
    pub campaign_batch: String, // 非硬外键
    #[serde(rename = "type")]
    pub tweet_type: String,

    // ===== 内容 =====
    pub content: String,
    pub character_count: i64, // 每次写 content 后与其长度一致
    pub engagement_hook: String,
    pub coophive_elements: JsonValue,
    pub discord_voice_patterns: JsonValue,
    pub theme_connection: String,

    // ===== 生命周期 =====
    pub status: TweetStatus,
    pub is_edited: bool,
    pub last_modified: NaiveDateTime,
    pub posted_date: Option<NaiveDateTime>,
    pub deleted_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
}

// ==========================================
// CampaignWithTweets - 活动 + 推文
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignWithTweets {
    #[serde(flatten)]
    pub campaign: Campaign,
    pub tweets: Vec<Tweet>,
}

impl CampaignWithTweets {
    /// 转回入参形态（显示名重新生成时使用）
    pub fn to_payload(&self) -> CampaignPayload {
        CampaignPayload {
            campaign_batch: self.campaign.campaign_batch.clone(),
            generated_at: self
                .campaign
                .generated_at
                .format("%Y-%m-%dT%H:%M:%S")
                .to_string(),
            tweet_count: Some(self.tweets.len() as i64),
            analysis_summary: self.campaign.analysis_summary.clone(),
            title: self.campaign.title.clone(),
            description: self.campaign.description.clone(),
            source_type: self.campaign.source_type.clone(),
            tweets: self
                .tweets
                .iter()
                .map(|t| TweetPayload {
                    id: t.id.clone(),
                    tweet_type: t.tweet_type.clone(),
                    content: t.content.clone(),
                    character_count: Some(t.character_count),
                    status: Some(t.status.clone()),
                    engagement_hook: Some(t.engagement_hook.clone()),
                    coophive_elements: t.coophive_elements.clone(),
                    discord_voice_patterns: t.discord_voice_patterns.clone(),
                    theme_connection: Some(t.theme_connection.clone()),
                    is_edited: Some(t.is_edited),
                })
                .collect(),
        }
    }
}

// ==========================================
// CascadeDeleteResult - 级联删除结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CascadeDeleteResult {
    pub success: bool,
    pub message: String,
    pub affected_tweets: usize,
}

impl CascadeDeleteResult {
    pub fn not_found(campaign_batch: &str) -> Self {
        Self {
            success: false,
            message: format!("Campaign '{}' not found", campaign_batch),
            affected_tweets: 0,
        }
    }
}
