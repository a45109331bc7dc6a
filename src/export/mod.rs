pub mod csv;
pub mod excel;

use crate::cli::ExportFormat;
use crate::error::{CatalogMatchError, Result};
use catalog_match_common::MatchRecord;
use std::path::{Path, PathBuf};

/// 既定の出力ファイル名（拡張子なし）: 照合結果_YYYYMMDD_HHMMSS
pub fn default_file_stem() -> String {
    format!("照合結果_{}", chrono::Local::now().format("%Y%m%d_%H%M%S"))
}

/// 出力先がファイル名なら拡張子を形式に合わせる
fn output_path_for_format(output: &Path, stem: &str, extension: &str) -> PathBuf {
    if output.is_dir() || output.extension().is_none() {
        output.join(format!("{}.{}", stem, extension))
    } else {
        output.with_extension(extension)
    }
}

fn output_paths_for_both(output: &Path, stem: &str) -> (PathBuf, PathBuf) {
    if output.is_dir() || output.extension().is_none() {
        let csv_path = output.join(format!("{}.csv", stem));
        let excel_path = output.join(format!("{}.xlsx", stem));
        (csv_path, excel_path)
    } else {
        let parent = output.parent().unwrap_or_else(|| Path::new("."));
        let stem = output
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(stem);
        let csv_path = parent.join(format!("{}.csv", stem));
        let excel_path = parent.join(format!("{}.xlsx", stem));
        (csv_path, excel_path)
    }
}

/// 照合結果を指定形式で書き出し、書き出したパスを返す
///
/// 結果が0件なら何も書かずに `NoMatchResults` を返す。
pub fn export_results(
    results: &[MatchRecord],
    format: &ExportFormat,
    output: &Path,
) -> Result<Vec<PathBuf>> {
    if results.is_empty() {
        return Err(CatalogMatchError::NoMatchResults);
    }

    let stem = default_file_stem();

    if output.extension().is_none() {
        std::fs::create_dir_all(output)?;
    }

    let written = match format {
        ExportFormat::Csv => {
            let output_path = output_path_for_format(output, &stem, "csv");
            println!("- CSVを生成中...");
            self::csv::write_match_csv(results, &output_path)?;
            println!("✔ CSV出力: {}", output_path.display());
            vec![output_path]
        }
        ExportFormat::Excel => {
            let output_path = output_path_for_format(output, &stem, "xlsx");
            println!("- Excelを生成中...");
            excel::generate_excel(results, &output_path)?;
            println!("✔ Excel出力: {}", output_path.display());
            vec![output_path]
        }
        ExportFormat::Both => {
            let (csv_path, excel_path) = output_paths_for_both(output, &stem);

            println!("- CSVを生成中...");
            self::csv::write_match_csv(results, &csv_path)?;
            println!("✔ CSV出力: {}", csv_path.display());

            println!("- Excelを生成中...");
            excel::generate_excel(results, &excel_path)?;
            println!("✔ Excel出力: {}", excel_path.display());
            vec![csv_path, excel_path]
        }
    };

    tracing::info!(records = results.len(), files = written.len(), "results exported");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path_for_file() {
        let path = output_path_for_format(Path::new("out/result.csv"), "stem", "csv");
        assert_eq!(path, PathBuf::from("out/result.csv"));
    }

    #[test]
    fn test_output_path_extension_follows_format() {
        let path = output_path_for_format(Path::new("out/result.csv"), "stem", "xlsx");
        assert_eq!(path, PathBuf::from("out/result.xlsx"));
    }

    #[test]
    fn test_output_path_for_dir() {
        let path = output_path_for_format(Path::new("out"), "stem", "xlsx");
        assert_eq!(path, PathBuf::from("out/stem.xlsx"));
    }

    #[test]
    fn test_output_paths_for_both_with_file() {
        let (csv_path, excel_path) = output_paths_for_both(Path::new("out/result.csv"), "stem");
        assert_eq!(csv_path, PathBuf::from("out/result.csv"));
        assert_eq!(excel_path, PathBuf::from("out/result.xlsx"));
    }

    #[test]
    fn test_default_file_stem_prefix() {
        assert!(default_file_stem().starts_with("照合結果_"));
    }
}
