use super::*;
use crate::config::StoreConfig;
use crate::db::{open_sqlite_connection, CURRENT_SCHEMA_VERSION, DEFAULT_BUSY_TIMEOUT_MS, IN_MEMORY_PATH};
use crate::domain::campaign::{CampaignPayload, TweetPayload};
use crate::domain::scraped_tweet::{RawScrapedRow, ScrapedTweetQuery};
use crate::domain::types::TweetStatus;
use crate::migration::ensure_schema;
use crate::repository::{CampaignRepository, ScrapedTweetRepository};
use rusqlite::Connection;
use serde_json::json;
use std::io::Write;
use std::sync::{Arc, Mutex};
use tempfile::NamedTempFile;

fn setup_test_db() -> Arc<Mutex<Connection>> {
    let mut conn = open_sqlite_connection(IN_MEMORY_PATH, DEFAULT_BUSY_TIMEOUT_MS).unwrap();
    ensure_schema(&mut conn, CURRENT_SCHEMA_VERSION).unwrap();
    Arc::new(Mutex::new(conn))
}

fn review_api(conn: &Arc<Mutex<Connection>>) -> ReviewApi {
    ReviewApi::new(Arc::new(CampaignRepository::new(conn.clone())))
}

fn scraped_api(conn: &Arc<Mutex<Connection>>) -> ScrapedApi {
    ScrapedApi::new(Arc::new(ScrapedTweetRepository::new(conn.clone())))
}

fn payload(batch: &str, tweet_ids: &[&str]) -> CampaignPayload {
    CampaignPayload {
        campaign_batch: batch.to_string(),
        generated_at: "2025-08-04T17:15:25Z".to_string(),
        tweet_count: None,
        analysis_summary: json!({"dominant_themes": ["Governance"]}),
        title: String::new(),
        description: String::new(),
        source_type: "api".to_string(),
        tweets: tweet_ids
            .iter()
            .map(|id| TweetPayload {
                id: id.to_string(),
                tweet_type: "single".to_string(),
                content: "c".to_string(),
                character_count: None,
                status: None,
                engagement_hook: None,
                coophive_elements: json!([]),
                discord_voice_patterns: json!([]),
                theme_connection: None,
                is_edited: None,
            })
            .collect(),
    }
}

// ==========================================
// ReviewApi
// ==========================================

#[test]
fn test_save_rejects_empty_ids() {
    let conn = setup_test_db();
    let api = review_api(&conn);

    assert!(matches!(
        api.save_campaign(&payload(" ", &["t1"])),
        Err(ApiError::InvalidInput(_))
    ));
    assert!(matches!(
        api.save_campaign(&payload("b", &["t1", ""])),
        Err(ApiError::InvalidInput(_))
    ));
    assert!(api.get_campaign("b").unwrap().is_none());
}

#[test]
fn test_save_campaign_json() {
    let conn = setup_test_db();
    let api = review_api(&conn);

    let batch = api
        .save_campaign_json(
            r#"{"campaign_batch": "b1", "generated_at": "2025-08-04T17:15:25",
                "tweets": [{"id": "t1", "type": "single", "content": "hello"}]}"#,
        )
        .unwrap();
    assert_eq!(batch, "b1");

    assert!(matches!(
        api.save_campaign_json("{not json"),
        Err(ApiError::InvalidInput(_))
    ));
}

#[test]
fn test_status_string_pass_through() {
    let conn = setup_test_db();
    let api = review_api(&conn);
    api.save_campaign(&payload("b", &["t1"])).unwrap();

    assert!(api.update_tweet_status("b", "t1", "Approved").unwrap());
    assert!(!api.update_tweet_status("b", "ghost", "Approved").unwrap());
    assert!(matches!(
        api.update_tweet_status("b", "t1", ""),
        Err(ApiError::InvalidInput(_))
    ));

    let loaded = api.get_campaign("b").unwrap().unwrap();
    assert_eq!(loaded.tweets[0].status, TweetStatus::Approved);
}

#[test]
fn test_display_name_regenerated_from_stored_campaign() {
    let conn = setup_test_db();
    let api = review_api(&conn);
    api.save_campaign(&payload("b", &["t1", "t2"])).unwrap();

    assert_eq!(api.update_display_name("b", Some("Custom")).unwrap(), "Custom");
    assert_eq!(
        api.update_display_name("b", None).unwrap(),
        "Governance - Aug 04 (2 tweets)"
    );
    assert!(matches!(
        api.update_display_name("ghost", None),
        Err(ApiError::NotFound(_))
    ));
}

// ==========================================
// ScrapedApi
// ==========================================

#[test]
fn test_import_csv_inserts_only_new_rows() {
    let conn = setup_test_db();
    let api = scraped_api(&conn);

    let seed: RawScrapedRow = json!({"Tweet ID": "100", "Likes": 1})
        .as_object()
        .cloned()
        .unwrap();
    api.bulk_insert(&[seed], Some("exec-0"), None);

    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "Tweet ID,Content,Likes,Views,Date").unwrap();
    writeln!(file, "100,old,1,10,").unwrap();
    writeln!(file, "101,new,2,20,Mon Aug 04 17:15:25 +0000 2025").unwrap();
    writeln!(file, "101,dup in file,2,20,").unwrap();
    writeln!(file, ",missing id,3,30,").unwrap();
    writeln!(file, "102,another,x,40,").unwrap();
    writeln!(file, "103,last,4,40,").unwrap();

    let summary = api.import_csv(file.path(), "exec-1", "https://source").unwrap();
    assert_eq!(summary.total_rows, 6);
    assert_eq!(summary.skipped_duplicates, 2);
    assert_eq!(summary.insert.success_count, 2);
    assert_eq!(summary.insert.error_count, 2);

    let query = ScrapedTweetQuery {
        execution_id: Some("exec-1".to_string()),
        ..Default::default()
    };
    let page = api.list(&query).unwrap();
    assert_eq!(page.total_count, 2);
}

#[test]
fn test_list_rejects_zero_limit() {
    let conn = setup_test_db();
    let api = scraped_api(&conn);

    let query = ScrapedTweetQuery {
        limit: Some(0),
        ..Default::default()
    };
    assert!(matches!(api.list(&query), Err(ApiError::InvalidInput(_))));
}

// ==========================================
// AdminApi
// ==========================================

#[test]
fn test_admin_status_and_force_migration() {
    let conn = setup_test_db();
    let api = AdminApi::new(conn, StoreConfig::in_memory());

    let status = api.database_status();
    assert_eq!(status.version, CURRENT_SCHEMA_VERSION);
    assert!(api.force_migration().unwrap().is_noop());
    assert!(matches!(api.ensure_schema(1), Err(ApiError::MigrationFailed(_))));
    assert!(matches!(api.backup(None), Err(ApiError::BackupFailed(_))));
}
