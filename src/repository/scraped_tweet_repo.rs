// ==========================================
// 推文审核系统 - 抓取推文数据仓储
// ==========================================
// 对齐: scraped_tweets 表（只追加）
// 去重: 两阶段（execution_id 批次 + 全局主键），失败放行
// 写入: 逐行归一化，整批单事务提交
// ==========================================

mod core;
mod dedup;
mod queries;


pub use core::ScrapedTweetRepository;
