// ==========================================
// 推文审核系统 - 抓取推文 API
// ==========================================
// 职责: 去重检查、批量入库、分页查询、统计、CSV 导入
// 调用方: 抓取工作流 + 运维命令行
// ==========================================

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::api::error::{ApiError, ApiResult};
use crate::domain::scraped_tweet::{
    BulkInsertReport, DuplicateCheck, RawScrapedRow, ScrapedTweetQuery, ScrapedTweetStats,
    ScrapedTweetView,
};
use crate::engine::scraped_row::row_tweet_id;
use crate::importer::scraped_csv::ScrapedCsvParser;
use crate::repository::scraped_tweet_repo::ScrapedTweetRepository;

/// 分页结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapedTweetPage {
    pub tweets: Vec<ScrapedTweetView>,
    pub total_count: i64,
}

/// CSV 导入汇总
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvImportSummary {
    /// 文件中的有效行数
    pub total_rows: usize,
    /// 已入库或文件内重复而跳过的行数
    pub skipped_duplicates: usize,
    pub insert: BulkInsertReport,
}

// ==========================================
// ScrapedApi - 抓取推文 API
// ==========================================
pub struct ScrapedApi {
    scraped_repo: Arc<ScrapedTweetRepository>,
}

impl ScrapedApi {
    /// 创建新的 ScrapedApi 实例
    pub fn new(scraped_repo: Arc<ScrapedTweetRepository>) -> Self {
        Self { scraped_repo }
    }

    /// 两阶段去重（失败放行）
    pub fn check_duplicates(&self, candidate_ids: &[String], execution_id: Option<&str>) -> DuplicateCheck {
        self.scraped_repo
            .check_duplicates(candidate_ids, non_empty(execution_id))
    }

    /// 批量写入
    pub fn bulk_insert(
        &self,
        rows: &[RawScrapedRow],
        execution_id: Option<&str>,
        source_url: Option<&str>,
    ) -> BulkInsertReport {
        self.scraped_repo
            .bulk_insert(rows, non_empty(execution_id), non_empty(source_url))
    }

    /// 分页查询
    pub fn list(&self, query: &ScrapedTweetQuery) -> ApiResult<ScrapedTweetPage> {
        if query.limit == Some(0) {
            return Err(ApiError::InvalidInput("limit 必须大于 0".to_string()));
        }

        let (tweets, total_count) = self.scraped_repo.list(query);
        Ok(ScrapedTweetPage {
            tweets,
            total_count,
        })
    }

    /// 汇总统计
    pub fn stats(&self) -> ScrapedTweetStats {
        self.scraped_repo.stats()
    }

    /// 导入抓取结果 CSV：先去重，只写入新行
    ///
    /// - 已入库的 id、同一 execution 已入库的行跳过
    /// - 文件内重复 id 只保留第一次出现
    /// - 缺少 Tweet ID 的行交给批量写入，作为行级错误报告
    pub fn import_csv(
        &self,
        file_path: &Path,
        execution_id: &str,
        source_url: &str,
    ) -> ApiResult<CsvImportSummary> {
        if execution_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("execution_id 不能为空".to_string()));
        }

        let rows = ScrapedCsvParser.parse_file(file_path)?;
        let candidate_ids: Vec<String> = rows.iter().filter_map(|r| row_tweet_id(r).ok()).collect();
        let check = self.check_duplicates(&candidate_ids, Some(execution_id));

        let new_ids: HashSet<&str> = check.new_ids.iter().map(String::as_str).collect();
        let mut taken: HashSet<String> = HashSet::new();
        let fresh_rows: Vec<RawScrapedRow> = rows
            .iter()
            .filter(|row| match row_tweet_id(row) {
                Ok(id) => new_ids.contains(id.as_str()) && taken.insert(id),
                Err(_) => true,
            })
            .cloned()
            .collect();

        let skipped_duplicates = rows.len() - fresh_rows.len();
        let insert = self.bulk_insert(&fresh_rows, Some(execution_id), Some(source_url));

        tracing::info!(
            file = %file_path.display(),
            execution_id,
            total_rows = rows.len(),
            skipped_duplicates,
            inserted = insert.success_count,
            errors = insert.error_count,
            "CSV 导入完成"
        );

        Ok(CsvImportSummary {
            total_rows: rows.len(),
            skipped_duplicates,
            insert,
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
