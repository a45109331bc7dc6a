use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogMatchError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("対応していないファイル形式です: {0}（対応形式: csv, xlsx, xls）")]
    UnsupportedFormat(String),

    #[error("{file} に必須列がありません: {}", columns.join(", "))]
    MissingColumns { file: String, columns: Vec<String> },

    #[error("文字コードを判別できません（UTF-8 / Big5 / GBK を試行）: {0}")]
    Encoding(String),

    #[error("CSV解析エラー: {0}")]
    CsvParse(String),

    #[error("Excel読み込みエラー: {0}")]
    ExcelRead(String),

    #[error("Excel生成エラー: {0}")]
    ExcelGeneration(String),

    #[error("CSV出力エラー: {0}")]
    CsvExport(String),

    #[error("カタログが読み込まれていません: {0}")]
    CatalogNotLoaded(String),

    #[error("照合結果がありません")]
    NoMatchResults,

    #[error("CLI実行エラー: {0}")]
    CliExecution(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Core(#[from] catalog_match_common::Error),
}

impl From<csv::Error> for CatalogMatchError {
    fn from(err: csv::Error) -> Self {
        CatalogMatchError::CsvParse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CatalogMatchError>;
