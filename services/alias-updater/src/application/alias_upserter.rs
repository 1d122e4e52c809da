/// エイリアスのアップサート
///
/// 各バージョンレコードについてUpdateAliasを試み、
/// エイリアスが存在しない（ResourceNotFound）場合のみCreateAliasにフォールバックする。
/// レコード同士に順序依存はなく、全レコードを同時に発行する。
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{error, info, warn};

use crate::domain::{AliasRequest, VersionRecord};
use crate::infrastructure::{AliasOps, AliasOpsError};

/// エイリアスのアップサートエラー
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AliasUpsertError {
    /// UpdateAliasがResourceNotFound以外で失敗
    #[error("Failed to update {alias_name} alias for {function_name}: {source}")]
    Update {
        function_name: String,
        alias_name: String,
        source: AliasOpsError,
    },
    /// フォールバックのCreateAliasが失敗
    #[error("Failed to create {alias_name} alias for {function_name}: {source}")]
    Create {
        function_name: String,
        alias_name: String,
        source: AliasOpsError,
    },
    /// タスクがパニック等で完了しなかった
    #[error("alias task did not complete: {0}")]
    TaskFailed(String),
}

/// エイリアスに対して行われた操作
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AliasAction {
    Updated,
    Created,
}

/// 1レコード分の成功結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AliasUpdate {
    pub function_name: String,
    pub alias_name: String,
    pub version: String,
    pub alias_arn: String,
    pub action: AliasAction,
}

impl AliasUpdate {
    fn new(request: AliasRequest, alias_arn: String, action: AliasAction) -> Self {
        Self {
            function_name: request.function_name,
            alias_name: request.alias_name,
            version: request.function_version,
            alias_arn,
            action,
        }
    }
}

/// 複数関数のエイリアスをまとめてアップサートする
pub struct AliasUpserter<L>
where
    L: AliasOps + 'static,
{
    alias_ops: Arc<L>,
}

impl<L> AliasUpserter<L>
where
    L: AliasOps + 'static,
{
    /// 新しいAliasUpserterを作成
    pub fn new(alias_ops: L) -> Self {
        Self::from_shared(Arc::new(alias_ops))
    }

    /// 共有済みのエイリアス操作から作成
    pub fn from_shared(alias_ops: Arc<L>) -> Self {
        Self { alias_ops }
    }

    /// 全レコードのエイリアスを`alias_name`で指定したバージョンに向ける
    ///
    /// 全レコードを同時に発行し、全タスクの完了を待つ。
    /// 失敗があった場合は最初に完了した失敗を返し、残りはログに出す。
    ///
    /// # 戻り値
    /// * `Ok(Vec<AliasUpdate>)` - 入力順に並べた各レコードの結果
    /// * `Err(AliasUpsertError)` - 最初に観測された失敗
    pub async fn upsert_aliases(
        &self,
        alias_name: &str,
        versions: &[VersionRecord],
    ) -> Result<Vec<AliasUpdate>, AliasUpsertError> {
        let mut tasks = JoinSet::new();

        for (index, record) in versions.iter().enumerate() {
            let request = AliasRequest::for_record(alias_name, record);
            let alias_ops = Arc::clone(&self.alias_ops);
            tasks.spawn(async move { (index, upsert_alias(alias_ops.as_ref(), request).await) });
        }

        let mut updates = Vec::with_capacity(versions.len());
        let mut first_error: Option<AliasUpsertError> = None;

        while let Some(joined) = tasks.join_next().await {
            let result = match joined {
                Ok((index, result)) => result.map(|update| (index, update)),
                Err(err) => Err(AliasUpsertError::TaskFailed(err.to_string())),
            };

            match result {
                Ok(update) => updates.push(update),
                Err(err) if first_error.is_none() => first_error = Some(err),
                Err(err) => {
                    warn!(error = %err, "後続のエイリアス操作も失敗");
                }
            }
        }

        if let Some(err) = first_error {
            return Err(err);
        }

        updates.sort_by_key(|(index, _)| *index);
        Ok(updates.into_iter().map(|(_, update)| update).collect())
    }
}

/// 1レコード分のアップサート
///
/// `Pending → Updated` / `Pending → NotFound → Created` が成功、
/// それ以外は失敗として終端する。再試行はしない。
async fn upsert_alias<L>(
    alias_ops: &L,
    request: AliasRequest,
) -> Result<AliasUpdate, AliasUpsertError>
where
    L: AliasOps + ?Sized,
{
    info!(
        function_name = %request.function_name,
        alias_name = %request.alias_name,
        version = %request.function_version,
        "エイリアスを更新"
    );

    let update_error = match alias_ops.update_alias(&request).await {
        Ok(alias_arn) => {
            info!(alias_arn = %alias_arn, "エイリアスを更新しました");
            return Ok(AliasUpdate::new(request, alias_arn, AliasAction::Updated));
        }
        Err(err) => err,
    };

    if !update_error.is_not_found() {
        error!(
            function_name = %request.function_name,
            alias_name = %request.alias_name,
            error = %update_error,
            "エイリアスの更新に失敗"
        );
        return Err(AliasUpsertError::Update {
            function_name: request.function_name,
            alias_name: request.alias_name,
            source: update_error,
        });
    }

    info!(
        function_name = %request.function_name,
        alias_name = %request.alias_name,
        "エイリアスが存在しないため作成"
    );

    match alias_ops.create_alias(&request).await {
        Ok(alias_arn) => {
            info!(alias_arn = %alias_arn, "エイリアスを作成しました");
            Ok(AliasUpdate::new(request, alias_arn, AliasAction::Created))
        }
        Err(err) => {
            error!(
                function_name = %request.function_name,
                alias_name = %request.alias_name,
                error = %err,
                "エイリアスの作成に失敗"
            );
            Err(AliasUpsertError::Create {
                function_name: request.function_name,
                alias_name: request.alias_name,
                source: err,
            })
        }
    }
}
