use super::queries::row_exists;
use crate::domain::campaign::{CampaignPayload, CascadeDeleteResult};
use crate::domain::types::TweetStatus;
use crate::engine::display_name::{derive_display_name, parse_iso_datetime};
use crate::engine::lifecycle::{
    character_count, mark_description_deleted, plan_content_edit, plan_status_change,
};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::id_resolver::{resolve_unique, IdFallback};
use chrono::{NaiveDateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Transaction};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

// ==========================================
// CampaignRepository - 活动仓储
// ==========================================
// 红线: Repository 只做数据映射，派生规则来自 engine
pub struct CampaignRepository {
    conn: Arc<Mutex<Connection>>,
}

impl CampaignRepository {
    /// 创建新的活动仓储
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    pub(super) fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    // ==========================================
    // 写入操作
    // ==========================================

    /// 保存活动及其推文
    ///
    /// # 流程
    /// 1. 解析唯一活动批次号（冲突时追加 -vN）
    /// 2. 逐条解析唯一推文 id（全局唯一，含本次已分配的 id）
    /// 3. 生成显示名，写入活动 + 推文
    ///
    /// # 返回
    /// - `Ok(campaign_batch)`: 实际入库的批次号
    /// - `Err(...)`: 数据库错误（事务回滚，不留部分数据）
    pub fn save_campaign(&self, payload: &CampaignPayload) -> RepositoryResult<String> {
        let now = Utc::now().naive_utc();
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        let campaign_batch = resolve_unique(
            &payload.campaign_batch,
            &IdFallback::TimeSuffix,
            now,
            |candidate| row_exists(&tx, "SELECT 1 FROM campaigns WHERE campaign_batch = ?1", candidate),
        )?;
        if campaign_batch != payload.campaign_batch {
            tracing::info!(
                original = %payload.campaign_batch,
                resolved = %campaign_batch,
                "活动批次号冲突已解析"
            );
        }

        let generated_at = parse_iso_datetime(&payload.generated_at).unwrap_or_else(|| {
            tracing::warn!(
                campaign_batch = %campaign_batch,
                generated_at = %payload.generated_at,
                "generated_at 无法解析，使用当前时间"
            );
            now
        });
        let display_name = derive_display_name(payload);

        tx.execute(
            r#"
            INSERT INTO campaigns (
                campaign_batch, generated_at, tweet_count, analysis_summary,
                title, description, source_type, display_name,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
            params![
                campaign_batch,
                generated_at,
                payload.tweets.len() as i64,
                payload.analysis_summary.to_string(),
                payload.title,
                payload.description,
                payload.source_type,
                display_name,
                now,
                now,
            ],
        )?;

        let tweet_fallback = IdFallback::CampaignScoped {
            campaign_batch: campaign_batch.clone(),
        };
        let mut assigned: HashSet<String> = HashSet::new();

        for tweet in &payload.tweets {
            let tweet_id = resolve_unique(&tweet.id, &tweet_fallback, now, |candidate| {
                if assigned.contains(candidate) {
                    return Ok(true);
                }
                row_exists(&tx, "SELECT 1 FROM tweets WHERE id = ?1", candidate)
            })?;
            if tweet_id != tweet.id {
                tracing::debug!(original = %tweet.id, resolved = %tweet_id, "推文 id 冲突已解析");
            }

            let status = tweet.status.clone().unwrap_or_default();
            tx.execute(
                r#"
                INSERT INTO tweets (
                    id, campaign_batch, type, content, character_count, status,
                    engagement_hook, coophive_elements, discord_voice_patterns,
                    theme_connection, is_edited, last_modified, created_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
                "#,
                params![
                    tweet_id,
                    campaign_batch,
                    tweet.tweet_type,
                    tweet.content,
                    character_count(&tweet.content),
                    status.as_str(),
                    tweet.engagement_hook.clone().unwrap_or_default(),
                    tweet.coophive_elements.to_string(),
                    tweet.discord_voice_patterns.to_string(),
                    tweet.theme_connection.clone().unwrap_or_default(),
                    tweet.is_edited.unwrap_or(false),
                    now,
                    now,
                ],
            )?;
            assigned.insert(tweet_id);
        }

        commit(tx)?;

        tracing::info!(
            campaign_batch = %campaign_batch,
            tweet_count = payload.tweets.len(),
            display_name = %display_name,
            "活动已保存"
        );
        Ok(campaign_batch)
    }

    /// 更新推文内容（字符数重算，标记已编辑）
    ///
    /// # 返回
    /// - `Ok(false)`: 推文不存在（或不属于该活动）
    pub fn update_tweet_content(
        &self,
        campaign_batch: &str,
        tweet_id: &str,
        content: &str,
    ) -> RepositoryResult<bool> {
        let edit = plan_content_edit(content, Utc::now().naive_utc());
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        let rows = tx.execute(
            r#"
            UPDATE tweets
            SET content = ?1, character_count = ?2, is_edited = ?3, last_modified = ?4
            WHERE id = ?5 AND campaign_batch = ?6
            "#,
            params![
                edit.content,
                edit.character_count,
                edit.is_edited,
                edit.last_modified,
                tweet_id,
                campaign_batch,
            ],
        )?;
        commit(tx)?;

        if rows == 0 {
            tracing::warn!(campaign_batch, tweet_id, "推文不存在，内容未更新");
        } else {
            tracing::info!(campaign_batch, tweet_id, character_count = edit.character_count, "推文内容已更新");
        }
        Ok(rows > 0)
    }

    /// 更新推文状态
    ///
    /// Posted 写入 posted_date，Deleted 写入 deleted_at；其余状态保留原时间戳
    pub fn update_tweet_status(
        &self,
        campaign_batch: &str,
        tweet_id: &str,
        status: &TweetStatus,
    ) -> RepositoryResult<bool> {
        let change = plan_status_change(status.clone(), Utc::now().naive_utc());
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        let rows = tx.execute(
            r#"
            UPDATE tweets
            SET status = ?1,
                last_modified = ?2,
                posted_date = COALESCE(?3, posted_date),
                deleted_at = COALESCE(?4, deleted_at)
            WHERE id = ?5 AND campaign_batch = ?6
            "#,
            params![
                change.status.as_str(),
                change.last_modified,
                change.posted_date,
                change.deleted_at,
                tweet_id,
                campaign_batch,
            ],
        )?;
        commit(tx)?;

        if rows == 0 {
            tracing::warn!(campaign_batch, tweet_id, "推文不存在，状态未更新");
        } else {
            tracing::info!(campaign_batch, tweet_id, status = %change.status, "推文状态已更新");
        }
        Ok(rows > 0)
    }

    /// 更新活动显示名
    pub fn update_display_name(&self, campaign_batch: &str, display_name: &str) -> RepositoryResult<bool> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        let rows = tx.execute(
            "UPDATE campaigns SET display_name = ?1, updated_at = ?2 WHERE campaign_batch = ?3",
            params![display_name, Utc::now().naive_utc(), campaign_batch],
        )?;
        commit(tx)?;

        Ok(rows > 0)
    }

    /// 级联删除活动
    ///
    /// - 硬删除: 先删推文再删活动
    /// - 软删除: 推文置为 Deleted，活动描述加 `[DELETED] ` 前缀
    ///
    /// 活动不存在时返回 success=false、affected_tweets=0
    pub fn delete_campaign_cascade(
        &self,
        campaign_batch: &str,
        hard_delete: bool,
    ) -> RepositoryResult<CascadeDeleteResult> {
        let now = Utc::now().naive_utc();
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        let description: Option<Option<String>> = tx
            .query_row(
                "SELECT description FROM campaigns WHERE campaign_batch = ?1",
                params![campaign_batch],
                |row| row.get(0),
            )
            .optional()?;
        let Some(description) = description else {
            tracing::warn!(campaign_batch, "活动不存在，跳过删除");
            return Ok(CascadeDeleteResult::not_found(campaign_batch));
        };

        let result = if hard_delete {
            let affected = tx.execute(
                "DELETE FROM tweets WHERE campaign_batch = ?1",
                params![campaign_batch],
            )?;
            tx.execute(
                "DELETE FROM campaigns WHERE campaign_batch = ?1",
                params![campaign_batch],
            )?;
            CascadeDeleteResult {
                success: true,
                message: format!(
                    "Permanently deleted campaign '{}' and {} tweets",
                    campaign_batch, affected
                ),
                affected_tweets: affected,
            }
        } else {
            let affected = soft_delete_tweets(&tx, campaign_batch, now)?;
            tx.execute(
                "UPDATE campaigns SET description = ?1, updated_at = ?2 WHERE campaign_batch = ?3",
                params![
                    mark_description_deleted(&description.unwrap_or_default()),
                    now,
                    campaign_batch
                ],
            )?;
            CascadeDeleteResult {
                success: true,
                message: format!(
                    "Soft deleted campaign '{}' and {} tweets",
                    campaign_batch, affected
                ),
                affected_tweets: affected,
            }
        };

        commit(tx)?;

        tracing::info!(
            campaign_batch,
            hard_delete,
            affected_tweets = result.affected_tweets,
            "活动已删除"
        );
        Ok(result)
    }
}

/// 活动下所有推文置为 Deleted
fn soft_delete_tweets(
    tx: &Transaction<'_>,
    campaign_batch: &str,
    now: NaiveDateTime,
) -> RepositoryResult<usize> {
    let change = plan_status_change(TweetStatus::Deleted, now);
    let affected = tx.execute(
        r#"
        UPDATE tweets
        SET status = ?1, deleted_at = ?2, last_modified = ?3
        WHERE campaign_batch = ?4
        "#,
        params![
            change.status.as_str(),
            change.deleted_at,
            change.last_modified,
            campaign_batch
        ],
    )?;
    Ok(affected)
}

fn commit(tx: Transaction<'_>) -> RepositoryResult<()> {
    tx.commit().map_err(|e| {
        tracing::error!("事务提交失败: {}", e);
        RepositoryError::DatabaseTransactionError(e.to_string())
    })
}
