use super::ScrapedTweetRepository;
use crate::domain::scraped_tweet::{ScrapedTweet, ScrapedTweetQuery, ScrapedTweetStats, ScrapedTweetView};
use crate::repository::error::RepositoryResult;
use rusqlite::{params_from_iter, Row};

const SCRAPED_COLUMNS: &str = r#"
    tweet_id, url, content, likes, retweets, replies, quotes, views,
    date, status, tweet_url, execution_id, source_url, created_at, updated_at
"#;

impl ScrapedTweetRepository {
    // ==========================================
    // 查询操作
    // ==========================================

    /// 分页查询（date DESC, created_at DESC）
    ///
    /// # 返回
    /// (当前页, 分页前总数)；出错时返回 `([], 0)`
    pub fn list(&self, query: &ScrapedTweetQuery) -> (Vec<ScrapedTweetView>, i64) {
        self.try_list(query).unwrap_or_else(|e| {
            tracing::error!("查询抓取推文失败: {}", e);
            (Vec::new(), 0)
        })
    }

    /// 汇总统计；出错时全零
    pub fn stats(&self) -> ScrapedTweetStats {
        self.try_stats().unwrap_or_else(|e| {
            tracing::error!("统计抓取推文失败: {}", e);
            ScrapedTweetStats::default()
        })
    }

    fn try_list(&self, query: &ScrapedTweetQuery) -> RepositoryResult<(Vec<ScrapedTweetView>, i64)> {
        let conn = self.get_conn()?;

        let (where_clause, filter): (&str, Vec<&str>) = match query.execution_id.as_deref() {
            Some(id) => ("WHERE execution_id = ?1", vec![id]),
            None => ("", Vec::new()),
        };

        let total: i64 = conn.query_row(
            &format!("SELECT COUNT(*) FROM scraped_tweets {}", where_clause),
            params_from_iter(filter.iter()),
            |row| row.get(0),
        )?;

        // LIMIT -1 表示不限
        let limit = query.limit.map(|l| l as i64).unwrap_or(-1);
        let offset = query.offset.unwrap_or(0) as i64;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM scraped_tweets {} ORDER BY date DESC, created_at DESC, tweet_id DESC LIMIT {} OFFSET {}",
            SCRAPED_COLUMNS, where_clause, limit, offset
        ))?;
        let rows = stmt
            .query_map(params_from_iter(filter.iter()), map_scraped_row)?
            .map(|r| r.map(ScrapedTweetView::from))
            .collect::<Result<Vec<_>, _>>()?;

        Ok((rows, total))
    }

    fn try_stats(&self) -> RepositoryResult<ScrapedTweetStats> {
        let conn = self.get_conn()?;

        let stats = conn.query_row(
            r#"
            SELECT
                COUNT(*),
                COALESCE(SUM(likes), 0),
                COALESCE(SUM(retweets), 0),
                COALESCE(SUM(replies), 0),
                COALESCE(SUM(views), 0),
                COALESCE(ROUND(AVG(likes), 2), 0.0),
                MIN(date),
                MAX(date),
                COUNT(DISTINCT execution_id)
            FROM scraped_tweets
            "#,
            [],
            |row| {
                Ok(ScrapedTweetStats {
                    total_tweets: row.get(0)?,
                    total_likes: row.get(1)?,
                    total_retweets: row.get(2)?,
                    total_replies: row.get(3)?,
                    total_views: row.get(4)?,
                    avg_likes: row.get(5)?,
                    earliest_date: row.get(6)?,
                    latest_date: row.get(7)?,
                    execution_count: row.get(8)?,
                })
            },
        )?;

        Ok(stats)
    }
}

fn map_scraped_row(row: &Row<'_>) -> rusqlite::Result<ScrapedTweet> {
    Ok(ScrapedTweet {
        tweet_id: row.get(0)?,
        url: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
        content: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        likes: row.get(3)?,
        retweets: row.get(4)?,
        replies: row.get(5)?,
        quotes: row.get(6)?,
        views: row.get(7)?,
        date: row.get(8)?,
        status: row.get(9)?,
        tweet_url: row.get::<_, Option<String>>(10)?.unwrap_or_default(),
        execution_id: row.get(11)?,
        source_url: row.get(12)?,
        created_at: row.get(13)?,
        updated_at: row.get(14)?,
    })
}
