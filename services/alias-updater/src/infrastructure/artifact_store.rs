//! 入力アーティファクト読み取りモジュール
//!
//! CodePipelineのアーティファクトはS3上のzipとして渡される。
//! ジョブに付与された一時認証情報でオブジェクトを取得し、zipから1エントリを取り出す。

use std::io::{Cursor, Read};

use async_trait::async_trait;
use aws_sdk_s3::config::Credentials;
use aws_sdk_s3::error::DisplayErrorContext;
use thiserror::Error;
use tracing::{debug, info, warn};
use zip::ZipArchive;
use zip::result::ZipError;

use crate::domain::{Artifact, ArtifactCredentials};

/// アーティファクト読み取りのエラー型
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ArtifactError {
    /// ジョブに入力アーティファクトがない
    #[error("job has no input artifact")]
    MissingInputArtifact,
    /// ジョブにartifactCredentialsがない
    #[error("artifact credentials are missing from the job")]
    MissingCredentials,
    /// アーティファクトにS3の格納場所がない
    #[error("artifact {0} has no S3 location")]
    MissingS3Location(String),
    /// S3 GetObjectの失敗
    #[error("S3エラー: {0}")]
    S3(String),
    /// zipとして読めない
    #[error("アーカイブエラー: {0}")]
    Archive(String),
    /// zipにファイルエントリがない
    #[error("artifact archive contains no files")]
    EmptyArchive,
    /// 指定エントリが見つからない
    #[error("entry {0} not found in artifact archive")]
    EntryNotFound(String),
    /// 入力JSONのパース失敗
    #[error("invalid action input: {0}")]
    InvalidInput(String),
}

/// アーティファクト読み取りトレイト（テスト用の抽象化）
#[async_trait]
pub trait ArtifactReader: Send + Sync {
    /// アーティファクトの中身（zip展開後のバイト列）を取得する
    async fn read_artifact(
        &self,
        artifact: &Artifact,
        credentials: &ArtifactCredentials,
    ) -> Result<Vec<u8>, ArtifactError>;
}

/// zipアーカイブから1エントリを取り出す
///
/// `entry_name`がNoneの場合は最初のファイルエントリ（ディレクトリを除く）を返す。
pub fn extract_entry(
    archive_bytes: &[u8],
    entry_name: Option<&str>,
) -> Result<Vec<u8>, ArtifactError> {
    let mut archive = ZipArchive::new(Cursor::new(archive_bytes))
        .map_err(|e| ArtifactError::Archive(e.to_string()))?;

    if let Some(name) = entry_name {
        let mut file = match archive.by_name(name) {
            Ok(file) => file,
            Err(ZipError::FileNotFound) => {
                return Err(ArtifactError::EntryNotFound(name.to_string()));
            }
            Err(e) => return Err(ArtifactError::Archive(e.to_string())),
        };
        let mut buf = Vec::new();
        file.read_to_end(&mut buf)
            .map_err(|e| ArtifactError::Archive(e.to_string()))?;
        return Ok(buf);
    }

    for index in 0..archive.len() {
        let mut file = archive
            .by_index(index)
            .map_err(|e| ArtifactError::Archive(e.to_string()))?;
        if file.is_dir() {
            continue;
        }

        debug!(entry = %file.name(), "アーティファクトのエントリを選択");
        let mut buf = Vec::new();
        file.read_to_end(&mut buf)
            .map_err(|e| ArtifactError::Archive(e.to_string()))?;
        return Ok(buf);
    }

    Err(ArtifactError::EmptyArchive)
}

/// S3からアーティファクトを取得する実装
#[derive(Debug, Clone)]
pub struct S3ArtifactReader {
    /// リージョン等の共通設定（認証情報はジョブごとに差し替える）
    base_config: aws_config::SdkConfig,
    /// 取り出すzipエントリ名
    entry_name: Option<String>,
}

impl S3ArtifactReader {
    /// 新しいS3ArtifactReaderを作成
    pub fn new(base_config: aws_config::SdkConfig, entry_name: Option<String>) -> Self {
        Self {
            base_config,
            entry_name,
        }
    }

    /// ジョブの一時認証情報を使うS3クライアントを作成
    fn client_for(&self, credentials: &ArtifactCredentials) -> aws_sdk_s3::Client {
        let credentials = Credentials::new(
            credentials.access_key_id.clone(),
            credentials.secret_access_key.clone(),
            Some(credentials.session_token.clone()),
            None,
            "codepipeline-artifact-credentials",
        );
        let config = aws_sdk_s3::config::Builder::from(&self.base_config)
            .credentials_provider(credentials)
            .build();
        aws_sdk_s3::Client::from_conf(config)
    }
}

#[async_trait]
impl ArtifactReader for S3ArtifactReader {
    async fn read_artifact(
        &self,
        artifact: &Artifact,
        credentials: &ArtifactCredentials,
    ) -> Result<Vec<u8>, ArtifactError> {
        let location = artifact
            .location
            .s3_location
            .as_ref()
            .ok_or_else(|| ArtifactError::MissingS3Location(artifact.name.clone()))?;

        info!(
            artifact = %artifact.name,
            bucket = %location.bucket_name,
            key = %location.object_key,
            "入力アーティファクトを取得"
        );

        let output = self
            .client_for(credentials)
            .get_object()
            .bucket(&location.bucket_name)
            .key(&location.object_key)
            .send()
            .await
            .map_err(|err| {
                let message = DisplayErrorContext(&err).to_string();
                warn!(artifact = %artifact.name, error = %message, "GetObjectエラー");
                ArtifactError::S3(message)
            })?;

        let bytes = output
            .body
            .collect()
            .await
            .map_err(|e| ArtifactError::S3(e.to_string()))?
            .into_bytes();

        extract_entry(&bytes, self.entry_name.as_deref())
    }
}
