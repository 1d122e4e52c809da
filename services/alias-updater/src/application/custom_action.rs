/// CodePipelineカスタムアクションの実行フロー
///
/// # 処理フロー
/// 1. ジョブを検証（アーティファクト数、アクション固有の検証）
/// 2. 入力アーティファクトを読み取り、JSONとしてデコード
/// 3. 入力ハンドラーを実行
/// 4. 結果をCodePipelineに通知（成功/失敗）
use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, error, info};

use crate::domain::{JobValidator, PipelineJob, ValidationError, validate_job};
use crate::infrastructure::{ArtifactError, ArtifactReader, JobReportError, JobResultReporter};

/// アクション実行のエラー型
#[derive(Debug, Error)]
pub enum ActionError {
    /// ジョブ検証エラー
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// 入力アーティファクトの読み取りエラー
    #[error(transparent)]
    Artifact(#[from] ArtifactError),
    /// 入力ハンドラーのエラー
    #[error(transparent)]
    InputHandler(Box<dyn std::error::Error + Send + Sync>),
    /// 結果通知エラー
    #[error(transparent)]
    Report(#[from] JobReportError),
}

/// 入力ハンドラートレイト
///
/// 検証済みジョブとデコード済みの入力を受け取り、出力ジョブ一覧を返す。
#[async_trait]
pub trait InputHandler: Send + Sync {
    /// 検証済みジョブの型
    type Job: Send + 'static;
    /// 入力アーティファクトのデコード先
    type Input: DeserializeOwned + Send + 'static;
    /// ハンドラー固有のエラー
    type Error: std::error::Error + Send + Sync + 'static;

    async fn handle(
        &self,
        job: Self::Job,
        input: Self::Input,
    ) -> Result<Vec<Self::Job>, Self::Error>;
}

/// ジョブの最終状態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum JobStatus {
    Succeeded,
    Failed,
}

/// Lambdaの戻り値
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionOutcome {
    pub job_id: String,
    pub status: JobStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ActionOutcome {
    /// 成功結果を作成
    pub fn succeeded(job_id: impl Into<String>) -> Self {
        Self {
            job_id: job_id.into(),
            status: JobStatus::Succeeded,
            message: None,
        }
    }

    /// 失敗結果を作成
    pub fn failed(job_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            job_id: job_id.into(),
            status: JobStatus::Failed,
            message: Some(message.into()),
        }
    }
}

/// CodePipelineカスタムアクション
pub struct CustomAction<V, H, A, R>
where
    V: JobValidator,
    H: InputHandler<Job = V::Output>,
    A: ArtifactReader,
    R: JobResultReporter,
{
    validator: V,
    input_handler: H,
    artifact_reader: A,
    reporter: R,
}

impl<V, H, A, R> CustomAction<V, H, A, R>
where
    V: JobValidator,
    H: InputHandler<Job = V::Output>,
    A: ArtifactReader,
    R: JobResultReporter,
{
    /// 新しいCustomActionを作成
    pub fn new(validator: V, input_handler: H, artifact_reader: A, reporter: R) -> Self {
        Self {
            validator,
            input_handler,
            artifact_reader,
            reporter,
        }
    }

    /// ジョブを実行し、結果をCodePipelineに通知する
    ///
    /// ジョブの失敗はPutJobFailureResultで通知した上で`Ok(ActionOutcome)`として返す。
    /// `Err`になるのは結果通知自体に失敗した場合のみ。
    pub async fn run(&self, job: PipelineJob) -> Result<ActionOutcome, ActionError> {
        let job_id = job.id.clone();
        info!(job_id = %job_id, "CodePipelineジョブを受信");

        match self.execute(job).await {
            Ok(jobs) => {
                self.reporter.put_job_success(&job_id).await?;
                info!(job_id = %job_id, output_job_count = jobs.len(), "ジョブ成功");
                Ok(ActionOutcome::succeeded(job_id))
            }
            Err(err) => {
                let message = err.to_string();
                error!(job_id = %job_id, error = %message, "ジョブ失敗");
                self.reporter.put_job_failure(&job_id, &message).await?;
                Ok(ActionOutcome::failed(job_id, message))
            }
        }
    }

    /// 検証、入力読み取り、入力ハンドラー実行までを行う（結果通知なし）
    pub async fn execute(&self, job: PipelineJob) -> Result<Vec<V::Output>, ActionError> {
        let artifact = job.input_artifacts().first().cloned();
        let credentials = job.artifact_credentials().cloned();

        let validated = validate_job(&self.validator, job)?;

        let artifact = artifact.ok_or(ArtifactError::MissingInputArtifact)?;
        let credentials = credentials.ok_or(ArtifactError::MissingCredentials)?;
        let bytes = self
            .artifact_reader
            .read_artifact(&artifact, &credentials)
            .await?;
        debug!(artifact = %artifact.name, size = bytes.len(), "入力アーティファクトを読み取り");

        let input: H::Input =
            serde_json::from_slice(&bytes).map_err(|e| ArtifactError::InvalidInput(e.to_string()))?;

        self.input_handler
            .handle(validated, input)
            .await
            .map_err(|e| ActionError::InputHandler(Box::new(e)))
    }
}
