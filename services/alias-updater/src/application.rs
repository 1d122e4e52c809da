// アプリケーション層モジュール
pub mod alias_upserter;
pub mod custom_action;
pub mod update_alias_handler;

// 再エクスポート
pub use alias_upserter::{AliasAction, AliasUpdate, AliasUpsertError, AliasUpserter};
pub use custom_action::{ActionError, ActionOutcome, CustomAction, InputHandler, JobStatus};
pub use update_alias_handler::UpdateAliasInputHandler;
