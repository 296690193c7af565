// ==========================================
// 推文审核系统 - Schema 定义（按版本）
// ==========================================
// v1: campaigns / tweets / database_version
// v2: scraped_tweets（抓取推文 + execution_id 去重索引）
// v3: campaigns.display_name
// ==========================================
// 约束: 所有建表/建索引语句使用 IF NOT EXISTS，可重复执行
// ==========================================

/// 版本表（单行）
pub const CREATE_VERSION_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS database_version (
    id INTEGER PRIMARY KEY,
    version INTEGER NOT NULL,
    updated_at TEXT NOT NULL,
    migration_notes TEXT
);
"#;

/// v1: 活动 + 推文（campaigns 不含 display_name）
pub const V1_BASE_TABLES: &str = r#"
CREATE TABLE IF NOT EXISTS campaigns (
    campaign_batch TEXT PRIMARY KEY,
    generated_at TEXT NOT NULL,
    tweet_count INTEGER NOT NULL DEFAULT 0,
    analysis_summary TEXT,
    title TEXT,
    description TEXT,
    source_type TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS tweets (
    id TEXT PRIMARY KEY,
    campaign_batch TEXT,
    type TEXT,
    content TEXT,
    character_count INTEGER,
    status TEXT NOT NULL DEFAULT 'Draft',
    engagement_hook TEXT,
    coophive_elements TEXT,
    discord_voice_patterns TEXT,
    theme_connection TEXT,
    is_edited INTEGER NOT NULL DEFAULT 0,
    last_modified TEXT,
    posted_date TEXT,
    deleted_at TEXT,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_tweets_campaign_batch ON tweets(campaign_batch);
"#;

/// v2: 抓取推文表
pub const V2_SCRAPED_TWEETS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS scraped_tweets (
    tweet_id TEXT PRIMARY KEY,
    url TEXT,
    content TEXT,
    likes INTEGER NOT NULL DEFAULT 0,
    retweets INTEGER NOT NULL DEFAULT 0,
    replies INTEGER NOT NULL DEFAULT 0,
    quotes INTEGER NOT NULL DEFAULT 0,
    views INTEGER NOT NULL DEFAULT 0,
    date TEXT,
    status TEXT NOT NULL DEFAULT 'success',
    tweet_url TEXT,
    execution_id TEXT,
    source_url TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
"#;

/// v2: 抓取推文索引
pub const V2_SCRAPED_TWEETS_INDEXES: &str = r#"
CREATE INDEX IF NOT EXISTS idx_scraped_tweets_execution_id ON scraped_tweets(execution_id);
CREATE INDEX IF NOT EXISTS idx_scraped_tweets_date ON scraped_tweets(date DESC, created_at DESC);
"#;

/// v3: 新增列 (表, 列, 类型)
pub const V3_DISPLAY_NAME_COLUMN: (&str, &str, &str) = ("campaigns", "display_name", "TEXT");

/// 最新版本完整 schema（空库一次性创建）
pub const LATEST_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS database_version (
    id INTEGER PRIMARY KEY,
    version INTEGER NOT NULL,
    updated_at TEXT NOT NULL,
    migration_notes TEXT
);

CREATE TABLE IF NOT EXISTS campaigns (
    campaign_batch TEXT PRIMARY KEY,
    generated_at TEXT NOT NULL,
    tweet_count INTEGER NOT NULL DEFAULT 0,
    analysis_summary TEXT,
    title TEXT,
    description TEXT,
    source_type TEXT,
    display_name TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS tweets (
    id TEXT PRIMARY KEY,
    campaign_batch TEXT,
    type TEXT,
    content TEXT,
    character_count INTEGER,
    status TEXT NOT NULL DEFAULT 'Draft',
    engagement_hook TEXT,
    coophive_elements TEXT,
    discord_voice_patterns TEXT,
    theme_connection TEXT,
    is_edited INTEGER NOT NULL DEFAULT 0,
    last_modified TEXT,
    posted_date TEXT,
    deleted_at TEXT,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_tweets_campaign_batch ON tweets(campaign_batch);

CREATE TABLE IF NOT EXISTS scraped_tweets (
    tweet_id TEXT PRIMARY KEY,
    url TEXT,
    content TEXT,
    likes INTEGER NOT NULL DEFAULT 0,
    retweets INTEGER NOT NULL DEFAULT 0,
    replies INTEGER NOT NULL DEFAULT 0,
    quotes INTEGER NOT NULL DEFAULT 0,
    views INTEGER NOT NULL DEFAULT 0,
    date TEXT,
    status TEXT NOT NULL DEFAULT 'success',
    tweet_url TEXT,
    execution_id TEXT,
    source_url TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_scraped_tweets_execution_id ON scraped_tweets(execution_id);
CREATE INDEX IF NOT EXISTS idx_scraped_tweets_date ON scraped_tweets(date DESC, created_at DESC);
"#;

// ==========================================
// 迁移步骤登记
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MigrationStep {
    pub version: i64,
    pub name: &'static str,
    pub notes: &'static str,
}

/// 有序迁移步骤（版本号升序，最后一项即目标版本）
pub const MIGRATION_STEPS: [MigrationStep; 3] = [
    MigrationStep {
        version: 1,
        name: "base_tables",
        notes: "Initial campaigns and tweets tables",
    },
    MigrationStep {
        version: 2,
        name: "scraped_tweets",
        notes: "Added scraped_tweets table with enhanced duplicate checking",
    },
    MigrationStep {
        version: 3,
        name: "campaign_display_name",
        notes: "Added display_name column to campaigns for human-readable names",
    },
];

/// 查找指定版本的迁移步骤
pub fn step_for(version: i64) -> Option<&'static MigrationStep> {
    MIGRATION_STEPS.iter().find(|s| s.version == version)
}
