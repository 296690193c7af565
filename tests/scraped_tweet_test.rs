// ==========================================
// 抓取推文集成测试
// ==========================================
// 测试目标: 两阶段去重 + 批量写入 + 查询统计（文件库）
// ==========================================


use serde_json::json;
use test_helpers::{create_test_state, scraped_row};
use tweet_review_store::{RawScrapedRow, ScrapedTweetQuery};

const AUG_04: &str = "Mon Aug 04 17:15:25 +0000 2025";
const AUG_05: &str = "Tue Aug 05 09:00:00 +0000 2025";

fn ids(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_five_good_rows_one_bad() {
    let (_temp_file, state) = create_test_state().unwrap();

    let mut rows: Vec<RawScrapedRow> = (1..=5).map(|i| scraped_row(&format!("{}", i), i, AUG_04)).collect();
    let mut bad = scraped_row("6", 1, AUG_04);
    bad.insert("Views".to_string(), json!({"nested": true}));
    rows.push(bad);

    let report = state
        .scraped_api
        .bulk_insert(&rows, Some("exec-1"), Some("https://x.com/search?q=coophive"));
    assert_eq!(report.success_count, 5);
    assert_eq!(report.error_count, 1);
    assert!(report.errors[0].contains("Error saving tweet 6"));
}

#[test]
fn test_dedup_then_insert_new_only() {
    let (_temp_file, state) = create_test_state().unwrap();
    state.scraped_api.bulk_insert(
        &[scraped_row("1", 1, AUG_04), scraped_row("2", 1, AUG_04)],
        Some("exec-1"),
        None,
    );

    let check = state
        .scraped_api
        .check_duplicates(&ids(&["2", "3"]), Some("exec-1"));
    assert_eq!(check.existing_ids, ids(&["1", "2"]));
    assert_eq!(check.new_ids, ids(&["3"]));

    // 空 execution_id 视为未提供
    let check = state.scraped_api.check_duplicates(&ids(&["2", "3"]), Some(""));
    assert_eq!(check.existing_ids, ids(&["2"]));
    assert_eq!(check.execution_duplicates, 0);
}

#[test]
fn test_list_and_stats() {
    let (_temp_file, state) = create_test_state().unwrap();
    state.scraped_api.bulk_insert(
        &[scraped_row("1", 10, AUG_04), scraped_row("2", 20, AUG_05)],
        Some("exec-1"),
        None,
    );
    state
        .scraped_api
        .bulk_insert(&[scraped_row("3", 30, "garbage")], Some("exec-2"), None);

    let page = state
        .scraped_api
        .list(&ScrapedTweetQuery {
            limit: Some(1),
            offset: None,
            execution_id: None,
        })
        .unwrap();
    assert_eq!(page.total_count, 3);
    assert_eq!(page.tweets.len(), 1);
    // "garbage" 日期回退为当前时间，排在最前
    assert_eq!(page.tweets[0].tweet.tweet_id, "3");
    assert_eq!(page.tweets[0].engagement_total, 30 + 2 + 3 + 4);

    let stats = state.scraped_api.stats();
    assert_eq!(stats.total_tweets, 3);
    assert_eq!(stats.total_likes, 60);
    assert_eq!(stats.total_retweets, 6);
    assert_eq!(stats.total_replies, 9);
    assert_eq!(stats.total_views, 3000);
    assert!((stats.avg_likes - 20.0).abs() < 1e-9);
    assert_eq!(stats.execution_count, 2);
    assert_eq!(
        stats.earliest_date.unwrap().format("%Y-%m-%d").to_string(),
        "2025-08-04"
    );
}

#[test]
fn test_stats_on_empty_store() {
    let (_temp_file, state) = create_test_state().unwrap();

    let stats = state.scraped_api.stats();
    assert_eq!(stats.total_tweets, 0);
    assert_eq!(stats.avg_likes, 0.0);
    assert!(stats.earliest_date.is_none());
    assert_eq!(stats.execution_count, 0);
}
