// ==========================================
// 推文审核系统 - 活动 / 推文数据仓储
// ==========================================
// 对齐: campaigns / tweets 表（v3 schema）
// 红线: 每个写操作独立事务，出错整体回滚
// ==========================================

mod core;
mod queries;


pub use core::CampaignRepository;
