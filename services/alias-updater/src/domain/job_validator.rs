/// CodePipelineジョブのバリデーション
///
/// アクションが受け付けるアーティファクト数の確認と、
/// UserParametersからのエイリアス名の取り出しを行う。
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::job::PipelineJob;

/// ジョブのバリデーションエラー
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// UserParametersが未指定または空
    #[error("Alias name must be specified via CodePipeline custom action user parameters")]
    MissingAliasName,
    /// 入力アーティファクト数が不一致
    #[error("expected {expected} input artifact(s), got {actual}")]
    InputArtifactCount { expected: usize, actual: usize },
    /// 出力アーティファクト数が不一致
    #[error("expected {expected} output artifact(s), got {actual}")]
    OutputArtifactCount { expected: usize, actual: usize },
}

/// ジョブバリデータトレイト
///
/// アクションが受け付けるアーティファクト数を宣言し、
/// 生のジョブを検証済みの値に変換する。
pub trait JobValidator: Send + Sync {
    /// 検証済みジョブの型
    type Output: Send;

    /// 受け付ける入力アーティファクト数
    fn input_artifact_count(&self) -> usize;

    /// 受け付ける出力アーティファクト数
    fn output_artifact_count(&self) -> usize;

    /// アーティファクト数以外の検証と変換
    fn validate(&self, job: PipelineJob) -> Result<Self::Output, ValidationError>;
}

/// アーティファクト数を確認してからバリデータを適用する
pub fn validate_job<V: JobValidator>(
    validator: &V,
    job: PipelineJob,
) -> Result<V::Output, ValidationError> {
    let inputs = job.input_artifacts().len();
    if inputs != validator.input_artifact_count() {
        return Err(ValidationError::InputArtifactCount {
            expected: validator.input_artifact_count(),
            actual: inputs,
        });
    }

    let outputs = job.output_artifacts().len();
    if outputs != validator.output_artifact_count() {
        return Err(ValidationError::OutputArtifactCount {
            expected: validator.output_artifact_count(),
            actual: outputs,
        });
    }

    validator.validate(job)
}

/// エイリアス名を付与した検証済みジョブ
///
/// シリアライズ時はジョブのフィールドに`aliasName`を加えた形になる。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatedJob {
    #[serde(flatten)]
    pub job: PipelineJob,
    #[serde(rename = "aliasName")]
    pub alias_name: String,
}

/// エイリアス更新アクション用バリデータ
///
/// 入力アーティファクト1つ、出力アーティファクト0を要求する。
#[derive(Debug, Clone, Copy, Default)]
pub struct AliasJobValidator;

impl JobValidator for AliasJobValidator {
    type Output = ValidatedJob;

    fn input_artifact_count(&self) -> usize {
        1
    }

    fn output_artifact_count(&self) -> usize {
        0
    }

    fn validate(&self, job: PipelineJob) -> Result<ValidatedJob, ValidationError> {
        let alias_name = match job.user_parameters() {
            Some(value) if !value.is_empty() => value.to_string(),
            _ => return Err(ValidationError::MissingAliasName),
        };

        Ok(ValidatedJob { job, alias_name })
    }
}
