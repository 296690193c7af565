use crate::domain::scraped_tweet::{BulkInsertReport, RawScrapedRow, ScrapedTweet};
use crate::engine::scraped_row::{map_row, row_tweet_id_hint};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::Utc;
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

// ==========================================
// ScrapedTweetRepository - 抓取推文仓储
// ==========================================
pub struct ScrapedTweetRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ScrapedTweetRepository {
    /// 创建新的抓取推文仓储
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
    // 批量写入
    // ==========================================

    /// 批量写入抓取推文
    ///
    /// # 说明
    /// - 行级错误（缺 id、计数非法）记录后跳过该行
    /// - 其余行在同一事务中写入；事务失败时整批回滚，
    ///   返回 `(0, rows.len(), ["Database error: ..."])`
    /// - 主键重复视为事务失败（不覆盖已有数据）
    pub fn bulk_insert(
        &self,
        rows: &[RawScrapedRow],
        execution_id: Option<&str>,
        source_url: Option<&str>,
    ) -> BulkInsertReport {
        let now = Utc::now().naive_utc();
        let mut errors = Vec::new();
        let mut tweets = Vec::with_capacity(rows.len());

        for row in rows {
            match map_row(row, execution_id, source_url, now) {
                Ok(tweet) => tweets.push(tweet),
                Err(e) => {
                    let message = format!("Error saving tweet {}: {}", row_tweet_id_hint(row), e);
                    tracing::debug!("{}", message);
                    errors.push(message);
                }
            }
        }

        match self.insert_all(&tweets) {
            Ok(()) => {
                tracing::info!(
                    execution_id = execution_id.unwrap_or_default(),
                    success_count = tweets.len(),
                    error_count = errors.len(),
                    "抓取推文已写入"
                );
                BulkInsertReport {
                    success_count: tweets.len(),
                    error_count: errors.len(),
                    errors,
                }
            }
            Err(e) => {
                tracing::error!("抓取推文批量写入失败，已回滚: {}", e);
                BulkInsertReport {
                    success_count: 0,
                    error_count: rows.len(),
                    errors: vec![format!("Database error: {}", e)],
                }
            }
        }
    }

    fn insert_all(&self, tweets: &[ScrapedTweet]) -> RepositoryResult<()> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO scraped_tweets (
                    tweet_id, url, content, likes, retweets, replies, quotes, views,
                    date, status, tweet_url, execution_id, source_url,
                    created_at, updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)
                "#,
            )?;

            for tweet in tweets {
                stmt.execute(params![
                    tweet.tweet_id,
                    tweet.url,
                    tweet.content,
                    tweet.likes,
                    tweet.retweets,
                    tweet.replies,
                    tweet.quotes,
                    tweet.views,
                    tweet.date,
                    tweet.status,
                    tweet.tweet_url,
                    tweet.execution_id,
                    tweet.source_url,
                    tweet.created_at,
                    tweet.updated_at,
                ])?;
            }
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))
    }
}
