/// CodePipelineジョブのドメインモデル
///
/// Lambda呼び出しイベント `{"CodePipeline.job": {...}}` の構造を表す。
/// UserParametersまでの各ラッパーはOptionで受け、欠落はバリデーションで検出する。
use serde::{Deserialize, Serialize};

/// Lambdaに渡されるCodePipelineイベント
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodePipelineEvent {
    /// ジョブ本体
    #[serde(rename = "CodePipeline.job")]
    pub job: PipelineJob,
}

/// CodePipelineジョブ
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineJob {
    /// ジョブID（結果通知に使用）
    pub id: String,
    /// AWSアカウントID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    /// ジョブデータ
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<JobData>,
}

/// ジョブデータ
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobData {
    /// アクション設定
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_configuration: Option<ActionConfiguration>,
    /// 入力アーティファクト
    #[serde(default)]
    pub input_artifacts: Vec<Artifact>,
    /// 出力アーティファクト
    #[serde(default)]
    pub output_artifacts: Vec<Artifact>,
    /// アーティファクトバケット用の一時認証情報
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact_credentials: Option<ArtifactCredentials>,
    /// 継続トークン
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub continuation_token: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionConfiguration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configuration: Option<Configuration>,
}

/// アクション設定値（CodePipeline側のキーはPascalCase）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    /// このアクションを実行しているLambda関数名
    #[serde(rename = "FunctionName", default, skip_serializing_if = "Option::is_none")]
    pub function_name: Option<String>,
    /// ユーザーパラメータ（エイリアス名）
    #[serde(rename = "UserParameters", default, skip_serializing_if = "Option::is_none")]
    pub user_parameters: Option<String>,
}

/// パイプラインアーティファクト
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    /// アーティファクト名
    pub name: String,
    /// リビジョン
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,
    /// 格納場所
    pub location: ArtifactLocation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactLocation {
    /// 格納場所の種類（通常は "S3"）
    #[serde(rename = "type")]
    pub location_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s3_location: Option<S3Location>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct S3Location {
    pub bucket_name: String,
    pub object_key: String,
}

/// アーティファクト読み取り用の一時認証情報
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: String,
}

// ログにシークレットを出さない
impl std::fmt::Debug for ArtifactCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArtifactCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"***")
            .field("session_token", &"***")
            .finish()
    }
}

impl PipelineJob {
    /// UserParametersを取得（途中のラッパーが欠けていればNone）
    pub fn user_parameters(&self) -> Option<&str> {
        self.data
            .as_ref()?
            .action_configuration
            .as_ref()?
            .configuration
            .as_ref()?
            .user_parameters
            .as_deref()
    }

    /// 入力アーティファクト一覧
    pub fn input_artifacts(&self) -> &[Artifact] {
        self.data
            .as_ref()
            .map(|d| d.input_artifacts.as_slice())
            .unwrap_or(&[])
    }

    /// 出力アーティファクト一覧
    pub fn output_artifacts(&self) -> &[Artifact] {
        self.data
            .as_ref()
            .map(|d| d.output_artifacts.as_slice())
            .unwrap_or(&[])
    }

    /// アーティファクト用一時認証情報
    pub fn artifact_credentials(&self) -> Option<&ArtifactCredentials> {
        self.data.as_ref()?.artifact_credentials.as_ref()
    }
}
