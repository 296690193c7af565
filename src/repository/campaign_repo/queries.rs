use super::CampaignRepository;
use crate::domain::campaign::{empty_json_object, Campaign, CampaignWithTweets, Tweet};
use crate::domain::types::TweetStatus;
use crate::repository::error::RepositoryResult;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde_json::Value as JsonValue;

const CAMPAIGN_COLUMNS: &str = r#"
    campaign_batch, generated_at, tweet_count, analysis_summary,
    title, description, source_type, display_name, created_at, updated_at
"#;

const TWEET_COLUMNS: &str = r#"
    id, campaign_batch, type, content, character_count, status,
    engagement_hook, coophive_elements, discord_voice_patterns,
    theme_connection, is_edited, last_modified, posted_date, deleted_at, created_at
"#;

impl CampaignRepository {
    // ==========================================
    // 查询操作
    // ==========================================

    /// 查询活动及其推文（按写入顺序）
    ///
    /// tweet_count 按实际加载的推文数重算，不信任入库时的声明值
    pub fn get_campaign(&self, campaign_batch: &str) -> RepositoryResult<Option<CampaignWithTweets>> {
        let conn = self.get_conn()?;

        let campaign = conn
            .query_row(
                &format!(
                    "SELECT {} FROM campaigns WHERE campaign_batch = ?1",
                    CAMPAIGN_COLUMNS
                ),
                params![campaign_batch],
                map_campaign_row,
            )
            .optional()?;
        let Some(mut campaign) = campaign else {
            tracing::debug!(campaign_batch, "活动不存在");
            return Ok(None);
        };

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM tweets WHERE campaign_batch = ?1 ORDER BY created_at ASC, rowid ASC",
            TWEET_COLUMNS
        ))?;
        let tweets = stmt
            .query_map(params![campaign_batch], map_tweet_row)?
            .collect::<Result<Vec<_>, _>>()?;

        campaign.tweet_count = tweets.len() as i64;
        Ok(Some(CampaignWithTweets { campaign, tweets }))
    }
}

/// 单值存在性查询（sql 需带一个 ?1 参数）
pub(super) fn row_exists(conn: &Connection, sql: &str, id: &str) -> RepositoryResult<bool> {
    let found: Option<i64> = conn.query_row(sql, params![id], |row| row.get(0)).optional()?;
    Ok(found.is_some())
}

/// JSON 文本列解析；空值或损坏内容按默认值处理
fn json_column(raw: Option<String>, default: JsonValue) -> JsonValue {
    raw.and_then(|text| serde_json::from_str(&text).ok())
        .unwrap_or(default)
}

fn map_campaign_row(row: &Row<'_>) -> rusqlite::Result<Campaign> {
    Ok(Campaign {
        campaign_batch: row.get(0)?,
        generated_at: row.get(1)?,
        tweet_count: row.get(2)?,
        analysis_summary: json_column(row.get(3)?, empty_json_object()),
        title: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
        description: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
        source_type: row.get::<_, Option<String>>(6)?.unwrap_or_default(),
        display_name: row.get(7)?,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
    })
}

fn map_tweet_row(row: &Row<'_>) -> rusqlite::Result<Tweet> {
    let status: String = row.get(5)?;
    let created_at = row.get(14)?;

    Ok(Tweet {
        id: row.get(0)?,
        campaign_batch: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
        tweet_type: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        content: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
        character_count: row.get::<_, Option<i64>>(4)?.unwrap_or_default(),
        status: TweetStatus::from_db_str(&status),
        engagement_hook: row.get::<_, Option<String>>(6)?.unwrap_or_default(),
        coophive_elements: json_column(row.get(7)?, JsonValue::Array(Vec::new())),
        discord_voice_patterns: json_column(row.get(8)?, JsonValue::Array(Vec::new())),
        theme_connection: row.get::<_, Option<String>>(9)?.unwrap_or_default(),
        is_edited: row.get(10)?,
        last_modified: row.get::<_, Option<_>>(11)?.unwrap_or(created_at),
        posted_date: row.get(12)?,
        deleted_at: row.get(13)?,
        created_at,
    })
}
