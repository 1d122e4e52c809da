// ドメイン層モジュール
pub mod job;
pub mod job_validator;
pub mod version_record;

// 再エクスポート
pub use job::{
    ActionConfiguration, Artifact, ArtifactCredentials, ArtifactLocation, CodePipelineEvent,
    Configuration, JobData, PipelineJob, S3Location,
};
pub use job_validator::{
    AliasJobValidator, JobValidator, ValidatedJob, ValidationError, validate_job,
};
pub use version_record::{AliasRequest, VersionRecord};
