//! CodePipeline操作モジュール
//!
//! ジョブの実行結果をCodePipelineへ通知する。
//! - PutJobSuccessResult
//! - PutJobFailureResult

use async_trait::async_trait;
use aws_sdk_codepipeline::Client as CodePipelineClient;
use aws_sdk_codepipeline::error::DisplayErrorContext;
use aws_sdk_codepipeline::types::{FailureDetails, FailureType};
use thiserror::Error;
use tracing::{info, warn};

/// PutJobFailureResultのメッセージ上限（文字数）
pub const MAX_FAILURE_MESSAGE_LEN: usize = 5000;

/// CodePipeline操作のエラー型
#[derive(Debug, Clone, PartialEq, Error)]
pub enum JobReportError {
    /// AWS SDK エラー
    #[error("AWS CodePipeline APIエラー: {0}")]
    AwsSdkError(String),
    /// FailureDetailsの組み立てに失敗
    #[error("FailureDetailsが不正です: {0}")]
    InvalidFailureDetails(String),
}

/// ジョブ結果通知トレイト（テスト用の抽象化）
#[async_trait]
pub trait JobResultReporter: Send + Sync {
    /// ジョブ成功を通知する
    async fn put_job_success(&self, job_id: &str) -> Result<(), JobReportError>;

    /// ジョブ失敗を通知する
    async fn put_job_failure(&self, job_id: &str, message: &str) -> Result<(), JobReportError>;
}

/// CodePipelineのメッセージ上限に収まるよう切り詰める
pub fn truncate_failure_message(message: &str) -> String {
    if message.chars().count() <= MAX_FAILURE_MESSAGE_LEN {
        return message.to_string();
    }
    message.chars().take(MAX_FAILURE_MESSAGE_LEN).collect()
}

/// 実際のAWS CodePipeline SDKを使用した結果通知実装
#[derive(Debug, Clone)]
pub struct AwsCodePipelineOps {
    client: CodePipelineClient,
}

impl AwsCodePipelineOps {
    /// 新しいAwsCodePipelineOpsを作成
    pub fn new(client: CodePipelineClient) -> Self {
        Self { client }
    }

    /// 読み込み済みのAWS設定からクライアントを作成
    pub fn from_sdk_config(config: &aws_config::SdkConfig) -> Self {
        Self::new(CodePipelineClient::new(config))
    }
}

#[async_trait]
impl JobResultReporter for AwsCodePipelineOps {
    async fn put_job_success(&self, job_id: &str) -> Result<(), JobReportError> {
        let result = self
            .client
            .put_job_success_result()
            .job_id(job_id)
            .send()
            .await;

        match result {
            Ok(_) => {
                info!(job_id = %job_id, "PutJobSuccessResult成功");
                Ok(())
            }
            Err(err) => {
                let message = DisplayErrorContext(&err).to_string();
                warn!(job_id = %job_id, error = %message, "PutJobSuccessResultエラー");
                Err(JobReportError::AwsSdkError(message))
            }
        }
    }

    async fn put_job_failure(&self, job_id: &str, message: &str) -> Result<(), JobReportError> {
        let details = FailureDetails::builder()
            .r#type(FailureType::JobFailed)
            .message(truncate_failure_message(message))
            .build()
            .map_err(|err| JobReportError::InvalidFailureDetails(err.to_string()))?;

        let result = self
            .client
            .put_job_failure_result()
            .job_id(job_id)
            .failure_details(details)
            .send()
            .await;

        match result {
            Ok(_) => {
                info!(job_id = %job_id, "PutJobFailureResult成功");
                Ok(())
            }
            Err(err) => {
                let error = DisplayErrorContext(&err).to_string();
                warn!(job_id = %job_id, error = %error, "PutJobFailureResultエラー");
                Err(JobReportError::AwsSdkError(error))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_message() {
        assert_eq!(truncate_failure_message("boom"), "boom");
    }

    #[test]
    fn test_truncate_long_message() {
        let message = "あ".repeat(MAX_FAILURE_MESSAGE_LEN + 10);
        let truncated = truncate_failure_message(&message);

        assert_eq!(truncated.chars().count(), MAX_FAILURE_MESSAGE_LEN);
    }

    #[test]
    fn test_job_report_error_display() {
        assert_eq!(
            JobReportError::AwsSdkError("denied".to_string()).to_string(),
            "AWS CodePipeline APIエラー: denied"
        );
    }
}
