/// エイリアス更新アクションの設定
///
/// 環境変数から読み込む。AWSのリージョンと認証情報はaws-configのデフォルトに任せる。
use thiserror::Error;

/// 入力アーティファクト内のエントリ名を指定する環境変数
pub const INPUT_ARTIFACT_ENTRY_ENV: &str = "INPUT_ARTIFACT_ENTRY";

/// 設定のエラー型
#[derive(Debug, Error)]
pub enum ActionConfigError {
    #[error("環境変数の値が不正です: {0}")]
    InvalidEnvVar(String),
}

/// エイリアス更新アクション設定
///
/// 以下の環境変数から読み込む:
/// - INPUT_ARTIFACT_ENTRY: バージョン一覧を含むzipエントリ名（省略時は最初のファイル）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActionConfig {
    input_artifact_entry: Option<String>,
}

impl ActionConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> Result<Self, ActionConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ActionConfigError> {
        let value = lookup(INPUT_ARTIFACT_ENTRY_ENV);
        let input_artifact_entry = match value.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(value) if value.ends_with('/') => {
                // ディレクトリエントリは読めない
                return Err(ActionConfigError::InvalidEnvVar(format!(
                    "{}={}",
                    INPUT_ARTIFACT_ENTRY_ENV, value
                )));
            }
            Some(value) => Some(value.to_string()),
        };

        Ok(Self {
            input_artifact_entry,
        })
    }

    /// 入力アーティファクトのエントリ名を取得
    pub fn input_artifact_entry(&self) -> Option<&str> {
        self.input_artifact_entry.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    // テストで環境変数を安全に設定/削除するヘルパー
    // 安全性: serialで直列化したテストでのみ使用
    unsafe fn set_env(key: &str, value: &str) {
        unsafe { std::env::set_var(key, value) };
    }

    unsafe fn remove_env(key: &str) {
        unsafe { std::env::remove_var(key) };
    }

    #[test]
    #[serial]
    fn test_from_env_unset() {
        unsafe { remove_env(INPUT_ARTIFACT_ENTRY_ENV) };

        let config = ActionConfig::from_env().unwrap();
        assert_eq!(config.input_artifact_entry(), None);
    }

    #[test]
    #[serial]
    fn test_from_env_set() {
        unsafe { set_env(INPUT_ARTIFACT_ENTRY_ENV, "versions.json") };

        let config = ActionConfig::from_env().unwrap();
        assert_eq!(config.input_artifact_entry(), Some("versions.json"));

        unsafe { remove_env(INPUT_ARTIFACT_ENTRY_ENV) };
    }

    #[test]
    fn test_from_lookup_blank_means_first_entry() {
        let config = ActionConfig::from_lookup(|_| Some("  ".to_string())).unwrap();
        assert_eq!(config, ActionConfig::default());
    }

    #[test]
    fn test_from_lookup_trims_value() {
        let config =
            ActionConfig::from_lookup(|_| Some(" out/versions.json ".to_string())).unwrap();
        assert_eq!(config.input_artifact_entry(), Some("out/versions.json"));
    }

    #[test]
    fn test_from_lookup_rejects_directory() {
        let result = ActionConfig::from_lookup(|_| Some("out/".to_string()));

        match result.unwrap_err() {
            ActionConfigError::InvalidEnvVar(value) => {
                assert_eq!(value, "INPUT_ARTIFACT_ENTRY=out/");
            }
        }
    }
}
