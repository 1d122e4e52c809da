/// エイリアス更新アクションの入力ハンドラー
///
/// 入力アーティファクトのバージョン一覧について、
/// 検証済みジョブのエイリアス名でアップサートを行う。
use async_trait::async_trait;
use tracing::{debug, info};

use crate::application::alias_upserter::{AliasUpsertError, AliasUpserter};
use crate::application::custom_action::InputHandler;
use crate::domain::{ValidatedJob, VersionRecord};
use crate::infrastructure::AliasOps;

pub struct UpdateAliasInputHandler<L>
where
    L: AliasOps + 'static,
{
    upserter: AliasUpserter<L>,
}

impl<L> UpdateAliasInputHandler<L>
where
    L: AliasOps + 'static,
{
    pub fn new(upserter: AliasUpserter<L>) -> Self {
        Self { upserter }
    }
}

#[async_trait]
impl<L> InputHandler for UpdateAliasInputHandler<L>
where
    L: AliasOps + 'static,
{
    type Job = ValidatedJob;
    type Input = Vec<VersionRecord>;
    type Error = AliasUpsertError;

    async fn handle(
        &self,
        job: ValidatedJob,
        input: Vec<VersionRecord>,
    ) -> Result<Vec<ValidatedJob>, AliasUpsertError> {
        debug!(
            input = %serde_json::to_string_pretty(&input).unwrap_or_default(),
            "入力を受信"
        );
        info!(
            alias_name = %job.alias_name,
            record_count = input.len(),
            "エイリアス更新を開始"
        );

        let updates = self.upserter.upsert_aliases(&job.alias_name, &input).await?;
        info!(alias_name = %job.alias_name, updated = updates.len(), "全エイリアスの更新完了");

        Ok(vec![job])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AliasRequest, PipelineJob};
    use crate::infrastructure::AliasOpsError;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    /// 呼び出しを記録するモック（関数名"broken"のみ更新に失敗）
    #[derive(Default)]
    struct RecordingAliasOps {
        updates: Mutex<Vec<AliasRequest>>,
        creates: Mutex<Vec<AliasRequest>>,
    }

    #[async_trait]
    impl AliasOps for RecordingAliasOps {
        async fn update_alias(&self, request: &AliasRequest) -> Result<String, AliasOpsError> {
            self.updates.lock().unwrap().push(request.clone());
            if request.function_name == "broken" {
                return Err(AliasOpsError::AwsSdkError("service unavailable".to_string()));
            }
            Ok(format!("{}:{}", request.function_name, request.alias_name))
        }

        async fn create_alias(&self, request: &AliasRequest) -> Result<String, AliasOpsError> {
            self.creates.lock().unwrap().push(request.clone());
            Ok(format!("{}:{}", request.function_name, request.alias_name))
        }
    }

    fn validated_job() -> ValidatedJob {
        let job: PipelineJob = serde_json::from_value(json!({
            "id": "job-1",
            "data": {
                "actionConfiguration": { "configuration": { "UserParameters": "prod" } }
            }
        }))
        .unwrap();
        ValidatedJob {
            job,
            alias_name: "prod".to_string(),
        }
    }

    #[tokio::test]
    async fn test_handle_returns_job_unchanged() {
        let ops = Arc::new(RecordingAliasOps::default());
        let handler = UpdateAliasInputHandler::new(AliasUpserter::from_shared(Arc::clone(&ops)));
        let job = validated_job();

        let jobs = handler
            .handle(
                job.clone(),
                vec![VersionRecord::new("f1", "3"), VersionRecord::new("f2", "7")],
            )
            .await
            .unwrap();

        assert_eq!(jobs, vec![job]);

        let mut updates = ops.updates.lock().unwrap().clone();
        updates.sort_by(|a, b| a.function_name.cmp(&b.function_name));
        assert_eq!(
            updates,
            vec![
                AliasRequest::for_record("prod", &VersionRecord::new("f1", "3")),
                AliasRequest::for_record("prod", &VersionRecord::new("f2", "7")),
            ]
        );
        assert!(ops.creates.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_handle_propagates_upsert_error() {
        let upserter = AliasUpserter::new(RecordingAliasOps::default());
        let handler = UpdateAliasInputHandler::new(upserter);

        let err = handler
            .handle(validated_job(), vec![VersionRecord::new("broken", "1")])
            .await
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Failed to update prod alias for broken: AWS Lambda APIエラー: service unavailable"
        );
    }
}
