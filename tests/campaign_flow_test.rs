// ==========================================
// 活动审核流程集成测试
// ==========================================
// 测试目标: 入库 → 冲突解析 → 编辑 / 状态流转 → 删除，跨连接持久化
// ==========================================


use test_helpers::{create_test_db, create_test_state, open_state, sample_payload};
use tweet_review_store::{logging, TweetStatus};

#[test]
fn test_full_review_flow_survives_reopen() {
    logging::init_test();
    let (_temp_file, db_path) = create_test_db().unwrap();

    {
        let state = open_state(&db_path).unwrap();
        let batch = state
            .review_api
            .save_campaign(&sample_payload("batch-001", &["t1", "t2"]))
            .unwrap();
        assert_eq!(batch, "batch-001");

        assert!(state
            .review_api
            .update_tweet_content("batch-001", "t1", "hello")
            .unwrap());
        assert!(state
            .review_api
            .update_tweet_status("batch-001", "t2", "Posted")
            .unwrap());
    }

    // 重新打开同一文件
    let state = open_state(&db_path).unwrap();
    let loaded = state.review_api.get_campaign("batch-001").unwrap().unwrap();

    assert_eq!(
        loaded.campaign.display_name.as_deref(),
        Some("AI & Open Source - Aug 04 (2 tweets)")
    );
    assert_eq!(loaded.campaign.source_type, "n8n");

    let t1 = &loaded.tweets[0];
    assert_eq!(t1.content, "hello");
    assert_eq!(t1.character_count, 5);
    assert!(t1.is_edited);

    let t2 = &loaded.tweets[1];
    assert_eq!(t2.status, TweetStatus::Posted);
    assert!(t2.posted_date.is_some());
}

#[test]
fn test_collision_scenario() {
    let (_temp_file, state) = create_test_state().unwrap();

    state
        .review_api
        .save_campaign(&sample_payload("batch-001", &["t1", "t2"]))
        .unwrap();
    let second = state
        .review_api
        .save_campaign(&sample_payload("batch-001", &["t1", "t3"]))
        .unwrap();
    assert_eq!(second, "batch-001-v2");

    let loaded = state.review_api.get_campaign(&second).unwrap().unwrap();
    let ids: Vec<&str> = loaded.tweets.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["t1-v2", "t3"]);
    assert_eq!(loaded.campaign.tweet_count, 2);
}

#[test]
fn test_declared_tweet_count_is_ignored() {
    let (_temp_file, state) = create_test_state().unwrap();

    let mut payload = sample_payload("b", &["a", "b", "c"]);
    payload.tweet_count = Some(50);
    state.review_api.save_campaign(&payload).unwrap();

    let loaded = state.review_api.get_campaign("b").unwrap().unwrap();
    assert_eq!(loaded.campaign.tweet_count, 3);
    assert_eq!(loaded.tweets.len(), 3);
}

#[test]
fn test_posted_date_preserved_after_draft() {
    let (_temp_file, state) = create_test_state().unwrap();
    state
        .review_api
        .save_campaign(&sample_payload("b", &["t1"]))
        .unwrap();

    state.review_api.update_tweet_status("b", "t1", "Posted").unwrap();
    let posted = state.review_api.get_campaign("b").unwrap().unwrap().tweets[0].posted_date;

    state.review_api.update_tweet_status("b", "t1", "Draft").unwrap();
    let tweet = state.review_api.get_campaign("b").unwrap().unwrap().tweets[0].clone();
    assert_eq!(tweet.status, TweetStatus::Draft);
    assert_eq!(tweet.posted_date, posted);
}

#[test]
fn test_soft_then_hard_delete() {
    let (_temp_file, state) = create_test_state().unwrap();
    state
        .review_api
        .save_campaign(&sample_payload("b", &["t1", "t2"]))
        .unwrap();

    let soft = state.review_api.delete_campaign("b", false).unwrap();
    assert!(soft.success);
    assert_eq!(soft.affected_tweets, 2);

    let loaded = state.review_api.get_campaign("b").unwrap().unwrap();
    assert!(loaded.campaign.description.starts_with("[DELETED] "));
    assert!(loaded.tweets.iter().all(|t| t.status == TweetStatus::Deleted));

    let hard = state.review_api.delete_campaign("b", true).unwrap();
    assert!(hard.success);
    assert_eq!(hard.affected_tweets, 2);
    assert!(state.review_api.get_campaign("b").unwrap().is_none());

    let missing = state.review_api.delete_campaign("b", true).unwrap();
    assert!(!missing.success);
    assert_eq!(missing.affected_tweets, 0);
}
