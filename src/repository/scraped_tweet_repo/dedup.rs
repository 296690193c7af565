use super::ScrapedTweetRepository;
use crate::domain::scraped_tweet::DuplicateCheck;
use crate::repository::error::RepositoryResult;
use rusqlite::{params, params_from_iter, Connection};
use std::collections::{BTreeSet, HashSet};

/// IN 查询分片大小（低于 SQLite 变量上限）
const ID_CHUNK_SIZE: usize = 500;

impl ScrapedTweetRepository {
    // ==========================================
    // 两阶段去重
    // ==========================================

    /// 检查候选 id 中哪些已入库
    ///
    /// - 阶段1: 给定 execution_id 时，该批次已入库的所有 id 都算已存在
    /// - 阶段2: 候选 id 按主键全局查重
    /// - new_ids 保持候选输入顺序
    ///
    /// 存储出错时失败放行（全部视为新数据），只记日志
    pub fn check_duplicates(&self, candidate_ids: &[String], execution_id: Option<&str>) -> DuplicateCheck {
        match self.try_check_duplicates(candidate_ids, execution_id) {
            Ok(check) => check,
            Err(e) => {
                tracing::warn!("去重查询失败，全部按新数据处理: {}", e);
                DuplicateCheck::all_new(candidate_ids)
            }
        }
    }

    fn try_check_duplicates(
        &self,
        candidate_ids: &[String],
        execution_id: Option<&str>,
    ) -> RepositoryResult<DuplicateCheck> {
        let conn = self.get_conn()?;

        let execution_hits = match execution_id {
            Some(id) => ids_for_execution(&conn, id)?,
            None => HashSet::new(),
        };
        let global_hits = existing_ids(&conn, candidate_ids)?;

        let existing: BTreeSet<String> = execution_hits.union(&global_hits).cloned().collect();
        let new_ids: Vec<String> = candidate_ids
            .iter()
            .filter(|id| !existing.contains(*id))
            .cloned()
            .collect();

        tracing::debug!(
            candidates = candidate_ids.len(),
            existing = existing.len(),
            new = new_ids.len(),
            execution_duplicates = execution_hits.len(),
            content_duplicates = global_hits.len(),
            "去重完成"
        );

        Ok(DuplicateCheck {
            existing_ids: existing.into_iter().collect(),
            new_ids,
            execution_duplicates: execution_hits.len(),
            content_duplicates: global_hits.len(),
        })
    }
}

fn ids_for_execution(conn: &Connection, execution_id: &str) -> RepositoryResult<HashSet<String>> {
    let mut stmt = conn.prepare("SELECT tweet_id FROM scraped_tweets WHERE execution_id = ?1")?;
    let ids = stmt
        .query_map(params![execution_id], |row| row.get::<_, String>(0))?
        .collect::<Result<HashSet<_>, _>>()?;
    Ok(ids)
}

fn existing_ids(conn: &Connection, candidate_ids: &[String]) -> RepositoryResult<HashSet<String>> {
    let mut found = HashSet::new();

    for chunk in candidate_ids.chunks(ID_CHUNK_SIZE) {
        let placeholders = vec!["?"; chunk.len()].join(", ");
        let mut stmt = conn.prepare(&format!(
            "SELECT tweet_id FROM scraped_tweets WHERE tweet_id IN ({})",
            placeholders
        ))?;
        let rows = stmt.query_map(params_from_iter(chunk.iter()), |row| row.get::<_, String>(0))?;
        for id in rows {
            found.insert(id?);
        }
    }

    Ok(found)
}
