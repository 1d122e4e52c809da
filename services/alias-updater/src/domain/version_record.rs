/// 前段ステージが発行したLambda関数バージョンと、エイリアスAPIへの要求
use serde::{Deserialize, Serialize};

/// 入力アーティファクトの1レコード
///
/// 前段ステージの出力をそのまま受けるため、キーはPascalCase。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionRecord {
    /// 関数名またはARN
    #[serde(rename = "FunctionName")]
    pub function_name: String,
    /// 発行されたバージョン
    #[serde(rename = "Version")]
    pub version: String,
}

impl VersionRecord {
    pub fn new(function_name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            function_name: function_name.into(),
            version: version.into(),
        }
    }
}

/// UpdateAlias/CreateAliasに共通のパラメータ
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AliasRequest {
    #[serde(rename = "FunctionName")]
    pub function_name: String,
    #[serde(rename = "Name")]
    pub alias_name: String,
    #[serde(rename = "FunctionVersion")]
    pub function_version: String,
}

impl AliasRequest {
    /// バージョンレコードとエイリアス名から要求を作成
    pub fn for_record(alias_name: &str, record: &VersionRecord) -> Self {
        Self {
            function_name: record.function_name.clone(),
            alias_name: alias_name.to_string(),
            function_version: record.version.clone(),
        }
    }
}
