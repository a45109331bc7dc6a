use clap::{Parser, Subcommand};
use crate::ai_provider::AiProvider;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "catalog-match")]
#[command(about = "2社の商品カタログを国別に照合するツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// 翻訳に使うAIプロバイダ (claude/codex/gemini)。省略時は設定ファイルの値
    #[arg(long, global = true)]
    pub ai_provider: Option<AiProvider>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 2つのカタログを照合して結果を出力
    Match {
        /// A社カタログ (csv/xlsx/xls)
        #[arg(required = true)]
        catalog_a: PathBuf,

        /// B社カタログ (csv/xlsx/xls)
        #[arg(required = true)]
        catalog_b: PathBuf,

        /// 類似度しきい値（推奨 0.1-1.0）
        #[arg(short, long)]
        threshold: Option<f64>,

        /// 比較する単語数の差の上限
        #[arg(short = 'd', long)]
        max_token_diff: Option<usize>,

        /// 照合前に商品名を翻訳する
        #[arg(long)]
        translate: bool,

        /// 出力形式 (csv/excel/both)
        #[arg(short, long, default_value = "both")]
        format: ExportFormat,

        /// 出力ファイル/ディレクトリ（省略時はカレント）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 上位表示件数
        #[arg(long)]
        top: Option<usize>,

        /// 翻訳キャッシュを読み書きするフォルダ（省略時は保存しない）
        #[arg(long)]
        cache_dir: Option<PathBuf>,
    },

    /// 出力済みの照合結果を集計
    Analyze {
        /// 照合結果ファイル (csv/xlsx)
        #[arg(required = true)]
        input: PathBuf,

        /// 上位表示件数
        #[arg(long)]
        top: Option<usize>,
    },

    /// カタログの内容と品質を確認
    Inspect {
        /// カタログファイル (csv/xlsx/xls)
        #[arg(required = true)]
        catalog: PathBuf,

        /// プレビュー行数
        #[arg(short, long, default_value = "5")]
        rows: usize,
    },

    /// 文字列を翻訳（キャッシュを使用）
    Translate {
        /// 翻訳する文字列
        #[arg(required = true)]
        texts: Vec<String>,

        /// 翻訳キャッシュを読み書きするフォルダ（省略時は保存しない）
        #[arg(long)]
        cache_dir: Option<PathBuf>,
    },

    /// 翻訳キャッシュ管理
    Cache {
        /// キャッシュを削除
        #[arg(long)]
        clear: bool,

        /// 対象フォルダ（省略時はカレント）
        #[arg(short, long)]
        folder: Option<PathBuf>,

        /// キャッシュ情報を表示
        #[arg(long)]
        info: bool,
    },

    /// 設定を表示/編集
    Config {
        /// 類似度しきい値を設定
        #[arg(long)]
        set_threshold: Option<f64>,

        /// 単語数差の上限を設定
        #[arg(long)]
        set_max_token_diff: Option<usize>,

        /// AIプロバイダを設定
        #[arg(long)]
        set_provider: Option<AiProvider>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Excel,
    #[default]
    Both,
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "excel" | "xlsx" => Ok(ExportFormat::Excel),
            "both" => Ok(ExportFormat::Both),
            _ => Err(format!("Unknown format: {}. Use csv, excel, or both", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_export_format_from_str() {
        assert_eq!("CSV".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!("xlsx".parse::<ExportFormat>().unwrap(), ExportFormat::Excel);
        assert_eq!("both".parse::<ExportFormat>().unwrap(), ExportFormat::Both);
        assert!("pdf".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_parse_match_command() {
        let cli = Cli::parse_from([
            "catalog-match", "match", "a.csv", "b.xlsx", "-t", "0.5", "-f", "csv", "--translate",
        ]);
        match cli.command {
            Commands::Match { threshold, format, translate, max_token_diff, cache_dir, .. } => {
                assert_eq!(threshold, Some(0.5));
                assert_eq!(format, ExportFormat::Csv);
                assert!(translate);
                assert_eq!(max_token_diff, None);
                assert_eq!(cache_dir, None);
            }
            _ => panic!("expected match command"),
        }
    }

    #[test]
    fn test_parse_cache_dir() {
        let cli = Cli::parse_from(["catalog-match", "translate", "台北", "--cache-dir", "work"]);
        match cli.command {
            Commands::Translate { texts, cache_dir } => {
                assert_eq!(texts, vec!["台北".to_string()]);
                assert_eq!(cache_dir, Some(PathBuf::from("work")));
            }
            _ => panic!("expected translate command"),
        }
    }
}
