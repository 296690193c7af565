// ==========================================
// 推文审核系统 - 活动审核 API
// ==========================================
// 职责: 活动入库、查询、推文编辑 / 状态流转、级联删除
// 调用方: 工作流推送 + 审核界面
// ==========================================

use std::sync::Arc;

use crate::api::error::{ApiError, ApiResult};
use crate::domain::campaign::{CampaignPayload, CampaignWithTweets, CascadeDeleteResult};
use crate::domain::types::TweetStatus;
use crate::engine::display_name::derive_display_name;
use crate::repository::campaign_repo::CampaignRepository;

// ==========================================
// ReviewApi - 活动审核 API
// ==========================================
pub struct ReviewApi {
    campaign_repo: Arc<CampaignRepository>,
}

impl ReviewApi {
    /// 创建新的 ReviewApi 实例
    pub fn new(campaign_repo: Arc<CampaignRepository>) -> Self {
        Self { campaign_repo }
    }

    /// 保存工作流推送的活动
    ///
    /// # 返回
    /// - Ok(String): 实际入库的批次号（冲突时带 -vN 后缀）
    /// - Err(ApiError::InvalidInput): 批次号或推文 id 为空
    pub fn save_campaign(&self, payload: &CampaignPayload) -> ApiResult<String> {
        if payload.campaign_batch.trim().is_empty() {
            return Err(ApiError::InvalidInput("活动批次号不能为空".to_string()));
        }
        if let Some(pos) = payload.tweets.iter().position(|t| t.id.trim().is_empty()) {
            return Err(ApiError::InvalidInput(format!("第{}条推文 id 为空", pos + 1)));
        }
        if let Some(declared) = payload.tweet_count {
            if declared != payload.tweets.len() as i64 {
                tracing::debug!(
                    campaign_batch = %payload.campaign_batch,
                    declared,
                    actual = payload.tweets.len(),
                    "声明推文数与实际不符，以实际为准"
                );
            }
        }

        Ok(self.campaign_repo.save_campaign(payload)?)
    }

    /// 从 JSON 文本保存活动
    pub fn save_campaign_json(&self, raw: &str) -> ApiResult<String> {
        let payload = CampaignPayload::from_json(raw)
            .map_err(|e| ApiError::InvalidInput(format!("活动 JSON 解析失败: {}", e)))?;
        self.save_campaign(&payload)
    }

    /// 查询活动（含推文）
    pub fn get_campaign(&self, campaign_batch: &str) -> ApiResult<Option<CampaignWithTweets>> {
        if campaign_batch.trim().is_empty() {
            return Err(ApiError::InvalidInput("活动批次号不能为空".to_string()));
        }

        Ok(self.campaign_repo.get_campaign(campaign_batch)?)
    }

    /// 编辑推文内容
    ///
    /// # 返回
    /// - Ok(false): 推文不存在
    pub fn update_tweet_content(
        &self,
        campaign_batch: &str,
        tweet_id: &str,
        content: &str,
    ) -> ApiResult<bool> {
        validate_tweet_ref(campaign_batch, tweet_id)?;
        Ok(self
            .campaign_repo
            .update_tweet_content(campaign_batch, tweet_id, content)?)
    }

    /// 更新推文状态（任意字符串，未知值原样保存）
    pub fn update_tweet_status(
        &self,
        campaign_batch: &str,
        tweet_id: &str,
        status: &str,
    ) -> ApiResult<bool> {
        validate_tweet_ref(campaign_batch, tweet_id)?;
        if status.trim().is_empty() {
            return Err(ApiError::InvalidInput("状态不能为空".to_string()));
        }

        let status = TweetStatus::from(status);
        Ok(self
            .campaign_repo
            .update_tweet_status(campaign_batch, tweet_id, &status)?)
    }

    /// 修改活动显示名；name 为 None 时按当前内容重新生成
    pub fn update_display_name(&self, campaign_batch: &str, name: Option<&str>) -> ApiResult<String> {
        let display_name = match name {
            Some(n) if !n.trim().is_empty() => n.trim().to_string(),
            Some(_) => return Err(ApiError::InvalidInput("显示名不能为空".to_string())),
            None => {
                let loaded = self
                    .get_campaign(campaign_batch)?
                    .ok_or_else(|| ApiError::NotFound(format!("活动 {} 不存在", campaign_batch)))?;
                derive_display_name(&loaded.to_payload())
            }
        };

        if !self
            .campaign_repo
            .update_display_name(campaign_batch, &display_name)?
        {
            return Err(ApiError::NotFound(format!("活动 {} 不存在", campaign_batch)));
        }
        Ok(display_name)
    }

    /// 级联删除活动（hard_delete=false 为软删除）
    pub fn delete_campaign(
        &self,
        campaign_batch: &str,
        hard_delete: bool,
    ) -> ApiResult<CascadeDeleteResult> {
        if campaign_batch.trim().is_empty() {
            return Err(ApiError::InvalidInput("活动批次号不能为空".to_string()));
        }

        Ok(self
            .campaign_repo
            .delete_campaign_cascade(campaign_batch, hard_delete)?)
    }
}

fn validate_tweet_ref(campaign_batch: &str, tweet_id: &str) -> ApiResult<()> {
    if campaign_batch.trim().is_empty() {
        return Err(ApiError::InvalidInput("活动批次号不能为空".to_string()));
    }
    if tweet_id.trim().is_empty() {
        return Err(ApiError::InvalidInput("推文 id 不能为空".to_string()));
    }
    Ok(())
}
