// ==========================================
// 推文审核系统 - 标识冲突解析
// ==========================================
// 规则:
// - 期望 id 不存在 → 原样返回
// - 否则依次尝试 `{id}-v2` … `{id}-v99`
// - 全部占用 → 追加时间后缀（HHMMSS + 微秒）
// - 时间后缀也被占用 → 再追加 `-1` … `-99`，仍占用则报错
// 说明: 纯查询/计算，调用方负责用返回值写库
// ==========================================

use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDateTime;

/// 后缀探测上限（含）
pub const MAX_SUFFIX_ATTEMPT: u32 = 99;

/// 兜底命名策略
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdFallback {
    /// 活动批次: `{desired}-{time}`
    TimeSuffix,
    /// 推文: `{campaign_batch}-{desired 最后一段}-{time}`
    CampaignScoped { campaign_batch: String },
}

/// 解析唯一标识
///
/// # 参数
/// - `desired`: 期望 id
/// - `fallback`: 后缀耗尽时的兜底命名
/// - `now`: 兜底时间后缀来源
/// - `exists`: 存在性查询（查询失败时错误原样返回）
pub fn resolve_unique<F>(
    desired: &str,
    fallback: &IdFallback,
    now: NaiveDateTime,
    mut exists: F,
) -> RepositoryResult<String>
where
    F: FnMut(&str) -> RepositoryResult<bool>,
{
    if !exists(desired)? {
        return Ok(desired.to_string());
    }

    for counter in 2..=MAX_SUFFIX_ATTEMPT {
        let candidate = format!("{}-v{}", desired, counter);
        if !exists(&candidate)? {
            return Ok(candidate);
        }
    }

    let time_suffix = now.format("%H%M%S%6f").to_string();
    let fallback_id = match fallback {
        IdFallback::TimeSuffix => format!("{}-{}", desired, time_suffix),
        IdFallback::CampaignScoped { campaign_batch } => {
            let base = desired.rsplit('-').next().unwrap_or(desired);
            format!("{}-{}-{}", campaign_batch, base, time_suffix)
        }
    };
    tracing::warn!(desired, fallback_id = %fallback_id, "后缀已耗尽，使用时间后缀");
    if !exists(&fallback_id)? {
        return Ok(fallback_id);
    }

    for counter in 1..=MAX_SUFFIX_ATTEMPT {
        let candidate = format!("{}-{}", fallback_id, counter);
        if !exists(&candidate)? {
            return Ok(candidate);
        }
    }

    Err(RepositoryError::UniqueConstraintViolation(format!(
        "无法为 '{}' 分配唯一标识",
        desired
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::collections::HashSet;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 8, 4)
            .unwrap()
            .and_hms_micro_opt(17, 15, 25, 42)
            .unwrap()
    }

    fn taken(ids: &[&str]) -> HashSet<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_free_id_unchanged() {
        let set = taken(&["other"]);
        let id = resolve_unique("batch-001", &IdFallback::TimeSuffix, now(), |c| {
            Ok(set.contains(c))
        })
        .unwrap();
        assert_eq!(id, "batch-001");
    }

    #[test]
    fn test_first_free_suffix() {
        let set = taken(&["batch-001", "batch-001-v2", "batch-001-v3"]);
        let id = resolve_unique("batch-001", &IdFallback::TimeSuffix, now(), |c| {
            Ok(set.contains(c))
        })
        .unwrap();
        assert_eq!(id, "batch-001-v4");
    }

    /// 只有 `-v` 后缀链被占用
    fn suffix_chain_taken(candidate: &str, desired: &str) -> bool {
        candidate == desired || candidate.starts_with(&format!("{}-v", desired))
    }

    #[test]
    fn test_exhausted_suffixes_use_time() {
        let id = resolve_unique("batch-001", &IdFallback::TimeSuffix, now(), |c| {
            Ok(suffix_chain_taken(c, "batch-001"))
        })
        .unwrap();
        assert_eq!(id, "batch-001-171525000042");

        let scoped = IdFallback::CampaignScoped {
            campaign_batch: "batch-009".to_string(),
        };
        let id = resolve_unique("demo-tweet-1", &scoped, now(), |c| {
            Ok(suffix_chain_taken(c, "demo-tweet-1"))
        })
        .unwrap();
        assert_eq!(id, "batch-009-1-171525000042");
    }

    #[test]
    fn test_taken_time_suffix_gets_counter() {
        let mut set = taken(&["t1", "b-t1-171525000042", "b-t1-171525000042-1"]);
        set.extend((2..=MAX_SUFFIX_ATTEMPT).map(|n| format!("t1-v{}", n)));
        let scoped = IdFallback::CampaignScoped {
            campaign_batch: "b".to_string(),
        };

        let id = resolve_unique("t1", &scoped, now(), |c| Ok(set.contains(c))).unwrap();
        assert_eq!(id, "b-t1-171525000042-2");
    }

    #[test]
    fn test_probe_count_is_bounded() {
        let mut probes = 0;
        let result = resolve_unique("x", &IdFallback::TimeSuffix, now(), |_| {
            probes += 1;
            Ok(true)
        });
        assert!(matches!(result, Err(RepositoryError::UniqueConstraintViolation(_))));
        // 原始 id + v2..=v99 + 时间后缀 + 1..=99
        assert_eq!(probes, 199);
    }

    #[test]
    fn test_lookup_error_propagates() {
        let result = resolve_unique("x", &IdFallback::TimeSuffix, now(), |_| {
            Err(RepositoryError::DatabaseQueryError(
                "boom".to_string(),
            ))
        });
        assert!(result.is_err());
    }
}
