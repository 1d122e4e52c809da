// インフラストラクチャ層モジュール
pub mod artifact_store;
pub mod codepipeline_ops;
pub mod config;
pub mod lambda_ops;
pub mod logging;

// 再エクスポート
pub use artifact_store::{ArtifactError, ArtifactReader, S3ArtifactReader, extract_entry};
pub use codepipeline_ops::{AwsCodePipelineOps, JobReportError, JobResultReporter};
pub use config::{ActionConfig, ActionConfigError};
pub use lambda_ops::{AliasOps, AliasOpsError, AwsLambdaOps};
pub use logging::init_logging;
