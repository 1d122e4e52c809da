//! Lambda操作モジュール
//!
//! エイリアス更新Lambdaで使用するLambdaエイリアスAPIの呼び出しを提供する。
//! - UpdateAlias: 既存エイリアスの向き先バージョンを変更
//! - CreateAlias: エイリアスを新規作成
//!
//! 結果のログ出力は呼び出し側（AliasUpserter）で行う。

use async_trait::async_trait;
use aws_sdk_lambda::Client as LambdaClient;
use aws_sdk_lambda::error::DisplayErrorContext;
use thiserror::Error;

use crate::domain::AliasRequest;

/// Lambda操作のエラー型
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AliasOpsError {
    /// 関数またはエイリアスが存在しない（ResourceNotFoundException）
    #[error("リソースが見つかりません: {0}")]
    NotFound(String),
    /// AWS SDK エラー
    #[error("AWS Lambda APIエラー: {0}")]
    AwsSdkError(String),
}

impl AliasOpsError {
    /// ResourceNotFoundExceptionかどうか
    pub fn is_not_found(&self) -> bool {
        matches!(self, AliasOpsError::NotFound(_))
    }
}

/// Lambdaエイリアス操作トレイト（テスト用の抽象化）
///
/// 成功時はエイリアスARNを返す。
#[async_trait]
pub trait AliasOps: Send + Sync {
    /// エイリアスの向き先を更新する
    async fn update_alias(&self, request: &AliasRequest) -> Result<String, AliasOpsError>;

    /// エイリアスを作成する
    async fn create_alias(&self, request: &AliasRequest) -> Result<String, AliasOpsError>;
}

/// 実際のAWS Lambda SDKを使用したエイリアス操作実装
#[derive(Debug, Clone)]
pub struct AwsLambdaOps {
    client: LambdaClient,
}

impl AwsLambdaOps {
    /// 新しいAwsLambdaOpsを作成
    pub fn new(client: LambdaClient) -> Self {
        Self { client }
    }

    /// 読み込み済みのAWS設定からクライアントを作成
    pub fn from_sdk_config(config: &aws_config::SdkConfig) -> Self {
        Self::new(LambdaClient::new(config))
    }
}

#[async_trait]
impl AliasOps for AwsLambdaOps {
    async fn update_alias(&self, request: &AliasRequest) -> Result<String, AliasOpsError> {
        self.client
            .update_alias()
            .function_name(&request.function_name)
            .name(&request.alias_name)
            .function_version(&request.function_version)
            .send()
            .await
            .map(|output| output.alias_arn().unwrap_or_default().to_string())
            .map_err(|err| {
                let message = DisplayErrorContext(&err).to_string();
                // エイリアス未作成は呼び出し側でCreateAliasにフォールバックする
                if err.into_service_error().is_resource_not_found_exception() {
                    AliasOpsError::NotFound(message)
                } else {
                    AliasOpsError::AwsSdkError(message)
                }
            })
    }

    async fn create_alias(&self, request: &AliasRequest) -> Result<String, AliasOpsError> {
        self.client
            .create_alias()
            .function_name(&request.function_name)
            .name(&request.alias_name)
            .function_version(&request.function_version)
            .send()
            .await
            .map(|output| output.alias_arn().unwrap_or_default().to_string())
            .map_err(|err| {
                let message = DisplayErrorContext(&err).to_string();
                if err.into_service_error().is_resource_not_found_exception() {
                    AliasOpsError::NotFound(message)
                } else {
                    AliasOpsError::AwsSdkError(message)
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alias_ops_error_display() {
        assert_eq!(
            AliasOpsError::NotFound("alias prod".to_string()).to_string(),
            "リソースが見つかりません: alias prod"
        );
        assert_eq!(
            AliasOpsError::AwsSdkError("throttled".to_string()).to_string(),
            "AWS Lambda APIエラー: throttled"
        );
    }

    #[test]
    fn test_alias_ops_error_is_not_found() {
        assert!(AliasOpsError::NotFound("x".to_string()).is_not_found());
        assert!(!AliasOpsError::AwsSdkError("x".to_string()).is_not_found());
    }
}
