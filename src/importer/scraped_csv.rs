// ==========================================
// 推文审核系统 - 抓取结果 CSV 解析
// ==========================================
// 表头: Tweet ID, URL, Content, Likes, Retweets, Replies, Quotes, Views, Date, Status, Tweet
// 输出: RawScrapedRow（值均为字符串，类型归一化在 engine::scraped_row）
// ==========================================

use crate::domain::scraped_tweet::{row_keys, RawScrapedRow};
use crate::importer::error::{ImportError, ImportResult};
use csv::ReaderBuilder;
use serde_json::Value as JsonValue;
use std::fs::File;
use std::path::Path;

// ==========================================
// ScrapedCsvParser
// ==========================================
pub struct ScrapedCsvParser;

impl ScrapedCsvParser {
    /// 读取 CSV 文件为原始行
    ///
    /// - 表头去空白，必须包含 `Tweet ID`
    /// - 允许行长度不一致，缺失列不写入
    /// - 完全空白的行跳过
    pub fn parse_file(&self, file_path: &Path) -> ImportResult<Vec<RawScrapedRow>> {
        if !file_path.exists() {
            return Err(ImportError::FileNotFound(file_path.display().to_string()));
        }

        if let Some(ext) = file_path.extension() {
            if !ext.eq_ignore_ascii_case("csv") {
                return Err(ImportError::UnsupportedFormat(
                    ext.to_string_lossy().to_string(),
                ));
            }
        }

        let file = File::open(file_path)?;
        self.parse_reader(file)
    }

    /// 从任意 reader 解析
    pub fn parse_reader<R: std::io::Read>(&self, source: R) -> ImportResult<Vec<RawScrapedRow>> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(source);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().trim_start_matches('\u{feff}').to_string())
            .collect();
        if !headers.iter().any(|h| h == row_keys::TWEET_ID) {
            return Err(ImportError::MissingColumn(row_keys::TWEET_ID.to_string()));
        }

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            let mut row = RawScrapedRow::new();

            for (col_idx, value) in record.iter().enumerate() {
                if let Some(header) = headers.get(col_idx) {
                    row.insert(header.clone(), JsonValue::String(value.trim().to_string()));
                }
            }

            if row.values().all(|v| v.as_str().map_or(true, str::is_empty)) {
                continue;
            }
            rows.push(row);
        }

        tracing::debug!(rows = rows.len(), "CSV 解析完成");
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_valid_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "Tweet ID,URL,Content,Likes,Date").unwrap();
        writeln!(temp_file, "1952,https://x.com/a/1952,\"gm, world\",10,Mon Aug 04 17:15:25 +0000 2025").unwrap();
        writeln!(temp_file, "1953,https://x.com/a/1953,gn,,").unwrap();

        let rows = ScrapedCsvParser.parse_file(temp_file.path()).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("Tweet ID"), Some(&JsonValue::String("1952".to_string())));
        assert_eq!(rows[0].get("Content"), Some(&JsonValue::String("gm, world".to_string())));
        assert_eq!(rows[1].get("Likes"), Some(&JsonValue::String(String::new())));
    }

    #[test]
    fn test_file_not_found() {
        let result = ScrapedCsvParser.parse_file(Path::new("non_existent.csv"));
        assert!(matches!(result, Err(ImportError::FileNotFound(_))));
    }

    #[test]
    fn test_missing_tweet_id_column() {
        let result = ScrapedCsvParser.parse_reader("URL,Content\na,b\n".as_bytes());
        assert!(matches!(result, Err(ImportError::MissingColumn(_))));
    }

    #[test]
    fn test_extension_is_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        let upper = dir.path().join("RESULTS.CSV");
        std::fs::write(&upper, "Tweet ID,Likes\n1,2\n").unwrap();
        assert_eq!(ScrapedCsvParser.parse_file(&upper).unwrap().len(), 1);

        let xlsx = dir.path().join("results.xlsx");
        std::fs::write(&xlsx, "Tweet ID\n1\n").unwrap();
        assert!(matches!(
            ScrapedCsvParser.parse_file(&xlsx),
            Err(ImportError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_skip_empty_rows() {
        let rows = ScrapedCsvParser
            .parse_reader("Tweet ID,Likes\n1,2\n,\n3,4\n".as_bytes())
            .unwrap();
        assert_eq!(rows.len(), 2);
    }
}
