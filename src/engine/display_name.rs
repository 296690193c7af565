// ==========================================
// 推文审核系统 - 活动显示名生成
// ==========================================
// 规则: 取 analysis_summary.dominant_themes 前两个主题
//       去掉常见前后缀 → "A & B - Aug 04 (3 tweets)"
// 红线: 永不失败，任何异常都回落到兜底名称
// ==========================================

use crate::domain::campaign::CampaignPayload;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use serde_json::Value as JsonValue;

/// 主题清洗规则（按顺序替换）
const THEME_REPLACEMENTS: [(&str, &str); 3] = [
    ("AI/ML ", "AI "),
    (" Technology", ""),
    (" Community", ""),
];

/// 解析 ISO-8601 时间文本
///
/// 支持: 带时区（含 `Z`）、不带时区、空格分隔、仅日期。
/// 带时区的时间统一换算为 UTC。
pub fn parse_iso_datetime(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Some(dt) = parse_with_offset(raw) {
        return Some(dt.naive_utc());
    }
    parse_naive(raw)
}

/// 显示名用的日期：带时区时取该时区下的日历日期
pub fn parse_label_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    match parse_with_offset(raw) {
        Some(dt) => Some(dt.date_naive()),
        None => parse_naive(raw).map(|dt| dt.date()),
    }
}

fn parse_with_offset(raw: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt);
    }
    ["%Y-%m-%dT%H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%:z"]
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(raw, fmt).ok())
}

fn parse_naive(raw: &str) -> Option<NaiveDateTime> {
    if raw.is_empty() {
        return None;
    }
    for fmt in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// 清洗单个主题名
pub fn clean_theme(theme: &str) -> String {
    THEME_REPLACEMENTS
        .iter()
        .fold(theme.to_string(), |acc, (from, to)| acc.replace(from, to))
}

/// 生成活动显示名
///
/// # 规则
/// - 有主题: `"{主题1} & {主题2} - {Mon DD} ({n} tweets)"`
/// - 无主题: `"Content Batch - {Mon DD} ({n} tweets)"`
/// - 摘要结构异常: `"Campaign ({n} tweets)"`
///
/// 日期无法解析时省略 ` - {Mon DD}` 部分；n 为实际推文数
pub fn derive_display_name(campaign: &CampaignPayload) -> String {
    let tweet_count = campaign.tweets.len();

    match extract_themes(&campaign.analysis_summary) {
        Some(themes) => {
            let date_part = parse_label_date(&campaign.generated_at)
                .map(|date| format!(" - {}", date.format("%b %d")))
                .unwrap_or_default();

            let label = match themes.as_slice() {
                [] => "Content Batch".to_string(),
                [only] => clean_theme(only),
                [first, second, ..] => format!("{} & {}", clean_theme(first), clean_theme(second)),
            };

            format!("{}{} ({} tweets)", label, date_part, tweet_count)
        }
        None => {
            tracing::debug!(
                campaign_batch = %campaign.campaign_batch,
                "analysis_summary 结构异常，使用兜底显示名"
            );
            format!("Campaign ({} tweets)", tweet_count)
        }
    }
}

/// 读取 dominant_themes
///
/// - 无主题字段 → Some(空)
/// - 摘要不是对象（含显式 null）、主题不是字符串数组 → None（结构异常）
fn extract_themes(summary: &JsonValue) -> Option<Vec<String>> {
    let map = summary.as_object()?;

    match map.get("dominant_themes") {
        None | Some(JsonValue::Null) => Some(Vec::new()),
        Some(JsonValue::Array(items)) => items
            .iter()
            .take(2)
            .map(|v| v.as_str().map(|s| s.to_string()))
            .collect(),
        Some(_) => None,
    }
}
