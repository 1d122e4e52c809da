/// エイリアス更新Lambda関数
///
/// CodePipelineのカスタムアクションとして呼び出され、
/// 入力アーティファクトに列挙された各Lambda関数のエイリアスを新バージョンへ向ける。
/// エイリアス名はアクションのUserParametersで指定する。
///
/// ジョブの成否はPutJobSuccessResult/PutJobFailureResultで通知し、
/// Lambda自体はジョブ失敗時もOkを返す（非同期呼び出しの再試行を避ける）。
use alias_updater::application::{
    ActionOutcome, AliasUpserter, CustomAction, UpdateAliasInputHandler,
};
use alias_updater::domain::{AliasJobValidator, CodePipelineEvent};
use alias_updater::infrastructure::{
    ActionConfig, AwsCodePipelineOps, AwsLambdaOps, S3ArtifactReader, init_logging,
};
use lambda_runtime::{Error, LambdaEvent, service_fn};
use tracing::{Instrument, error, info, info_span};

type AliasUpdateAction = CustomAction<
    AliasJobValidator,
    UpdateAliasInputHandler<AwsLambdaOps>,
    S3ArtifactReader,
    AwsCodePipelineOps,
>;

#[tokio::main]
async fn main() -> Result<(), Error> {
    // 構造化ログを初期化
    init_logging();

    let config = match ActionConfig::from_env() {
        Ok(config) => {
            info!(
                input_artifact_entry = ?config.input_artifact_entry(),
                "エイリアス更新設定を読み込み"
            );
            config
        }
        Err(err) => {
            error!(error = %err, "設定読み込み失敗");
            return Err(err.into());
        }
    };

    // AWSクライアントはコールドスタート時に一度だけ作成する
    let sdk_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let upserter = AliasUpserter::new(AwsLambdaOps::from_sdk_config(&sdk_config));
    let action: AliasUpdateAction = CustomAction::new(
        AliasJobValidator,
        UpdateAliasInputHandler::new(upserter),
        S3ArtifactReader::new(
            sdk_config.clone(),
            config.input_artifact_entry().map(str::to_string),
        ),
        AwsCodePipelineOps::from_sdk_config(&sdk_config),
    );

    let action = &action;
    lambda_runtime::run(service_fn(move |event: LambdaEvent<CodePipelineEvent>| async move {
        handler(action, event).await
    }))
    .await
}

/// Lambda関数のメインハンドラー
///
/// # 処理フロー
/// 1. イベントからジョブを取り出し
/// 2. CustomActionでジョブを実行（検証 → 入力読み取り → エイリアス更新 → 結果通知）
/// 3. ジョブの最終状態を返却
async fn handler(
    action: &AliasUpdateAction,
    event: LambdaEvent<CodePipelineEvent>,
) -> Result<ActionOutcome, Error> {
    let (payload, context) = event.into_parts();
    let span = info_span!(
        "job",
        job_id = %payload.job.id,
        request_id = %context.request_id
    );

    match action.run(payload.job).instrument(span).await {
        Ok(outcome) => Ok(outcome),
        Err(err) => {
            // 結果通知に失敗した場合のみLambdaエラーとする
            error!(error = %err, "ジョブ結果の通知に失敗");
            Err(err.into())
        }
    }
}
