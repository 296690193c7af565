// ==========================================
// 推文审核系统 - 抓取行字段归一化
// ==========================================
// 输入: 工作流推送的原始行（JSON 值，类型不可靠）
// 输出: ScrapedTweet 或行级错误
// 红线: 纯计算，不访问数据库
// ==========================================

use crate::domain::scraped_tweet::{row_keys, RawScrapedRow, ScrapedTweet, DEFAULT_SCRAPE_STATUS};
use chrono::{DateTime, NaiveDateTime};
use serde_json::Value as JsonValue;
use thiserror::Error;

/// 平台时间格式，例: `Mon Aug 04 17:15:25 +0000 2025`
pub const PLATFORM_DATE_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

/// 行级错误（该行跳过，不影响其余行）
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RowError {
    #[error("缺少 Tweet ID")]
    MissingTweetId,

    #[error("Tweet ID 类型无效: {0}")]
    InvalidTweetId(String),

    #[error("计数字段无效 (field={field}): {value}")]
    InvalidCounter { field: &'static str, value: String },
}

/// 解析平台时间文本并转换为 UTC
pub fn parse_platform_date(raw: &str) -> Option<NaiveDateTime> {
    DateTime::parse_from_str(raw.trim(), PLATFORM_DATE_FORMAT)
        .ok()
        .map(|dt| dt.naive_utc())
}

/// 读取行中的 Tweet ID（用于错误提示，不做校验）
pub fn row_tweet_id_hint(row: &RawScrapedRow) -> String {
    match row.get(row_keys::TWEET_ID) {
        Some(JsonValue::String(s)) if !s.is_empty() => s.clone(),
        Some(JsonValue::Number(n)) => n.to_string(),
        _ => "unknown".to_string(),
    }
}

/// 原始行 → ScrapedTweet
///
/// # 字段规则
/// - Tweet ID: 字符串或整数，不能为空
/// - 计数: 整数 / 浮点（截断） / 数字字符串；缺失、null、空串为 0
/// - Date: 缺失或空 → None；无法解析 → `now`
/// - 文本字段: 缺失为空串，Status 缺失为 "success"
pub fn map_row(
    row: &RawScrapedRow,
    execution_id: Option<&str>,
    source_url: Option<&str>,
    now: NaiveDateTime,
) -> Result<ScrapedTweet, RowError> {
    let tweet_id = row_tweet_id(row)?;

    Ok(ScrapedTweet {
        url: text_field(row, row_keys::URL).unwrap_or_default(),
        content: text_field(row, row_keys::CONTENT).unwrap_or_default(),
        likes: counter(row, row_keys::LIKES)?,
        retweets: counter(row, row_keys::RETWEETS)?,
        replies: counter(row, row_keys::REPLIES)?,
        quotes: counter(row, row_keys::QUOTES)?,
        views: counter(row, row_keys::VIEWS)?,
        date: date_field(row, &tweet_id, now),
        status: text_field(row, row_keys::STATUS)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_SCRAPE_STATUS.to_string()),
        tweet_url: text_field(row, row_keys::TWEET_URL).unwrap_or_default(),
        execution_id: execution_id.map(str::to_string),
        source_url: source_url.map(str::to_string),
        created_at: now,
        updated_at: now,
        tweet_id,
    })
}

/// 校验并读取 Tweet ID（字符串或整数，不能为空）
pub fn row_tweet_id(row: &RawScrapedRow) -> Result<String, RowError> {
    match row.get(row_keys::TWEET_ID) {
        None | Some(JsonValue::Null) => Err(RowError::MissingTweetId),
        Some(JsonValue::String(s)) if s.trim().is_empty() => Err(RowError::MissingTweetId),
        Some(JsonValue::String(s)) => Ok(s.trim().to_string()),
        Some(JsonValue::Number(n)) if n.is_i64() || n.is_u64() => Ok(n.to_string()),
        Some(other) => Err(RowError::InvalidTweetId(other.to_string())),
    }
}

fn text_field(row: &RawScrapedRow, key: &str) -> Option<String> {
    match row.get(key)? {
        JsonValue::Null => None,
        JsonValue::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn counter(row: &RawScrapedRow, field: &'static str) -> Result<i64, RowError> {
    let invalid = |value: &JsonValue| RowError::InvalidCounter {
        field,
        value: value.to_string(),
    };

    match row.get(field) {
        None | Some(JsonValue::Null) => Ok(0),
        Some(JsonValue::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
            .ok_or_else(|| invalid(&JsonValue::Number(n.clone()))),
        Some(JsonValue::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(0);
            }
            trimmed
                .parse::<i64>()
                .ok()
                .or_else(|| {
                    trimmed
                        .parse::<f64>()
                        .ok()
                        .filter(|f| f.is_finite())
                        .map(|f| f.trunc() as i64)
                })
                .ok_or_else(|| invalid(&JsonValue::String(s.clone())))
        }
        Some(other) => Err(invalid(other)),
    }
}

fn date_field(row: &RawScrapedRow, tweet_id: &str, now: NaiveDateTime) -> Option<NaiveDateTime> {
    let raw = match row.get(row_keys::DATE)? {
        JsonValue::Null => return None,
        JsonValue::String(s) if s.trim().is_empty() => return None,
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    };

    match parse_platform_date(&raw) {
        Some(date) => Some(date),
        None => {
            tracing::warn!(tweet_id, raw = %raw, "发布时间无法解析，使用当前时间");
            Some(now)
        }
    }
}
