use anyhow::Context;
use catalog_match::{cli, config, error, export, loader, logging, report, session, translator};
use catalog_match_common::TranslationService;
use clap::Parser;
use cli::{Cli, Commands};
use config::Config;
use indicatif::{ProgressBar, ProgressStyle};
use session::{MatchRequest, RunPhase, Session};
use std::path::{Path, PathBuf};
use translator::{AiCliTranslator, TranslationCacheFile};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::load().context("設定の読み込みに失敗しました")?;
    logging::init(&config.log_level, cli.verbose)?;

    let provider = cli.ai_provider.unwrap_or(config.ai_provider);
    let translator_config = Config {
        ai_provider: provider,
        ..config.clone()
    };

    match cli.command {
        Commands::Match { catalog_a, catalog_b, threshold, max_token_diff, translate, format, output, top, cache_dir } => {
            println!("🔎 catalog-match - カタログ照合\n");

            let mut options = config.match_options();
            if let Some(threshold) = threshold {
                options.similarity_threshold = threshold;
            }
            if let Some(diff) = max_token_diff {
                options.max_token_diff = diff;
            }
            let request = MatchRequest {
                options,
                translate: translate || config.translate,
            };
            let backend = AiCliTranslator::from_config(&translator_config, cli.verbose);
            let service = translator::build_service(backend, cache_dir.as_deref(), &config.target_language);
            let mut session = Session::new(service);

            // 1. 読み込み
            println!("[1/3] カタログを読み込み中...");
            let a = session
                .load_a(&catalog_a)
                .with_context(|| format!("カタログAの読み込みに失敗: {}", catalog_a.display()))?;
            println!("✔ A: {}件 ({}か国)", a.info.total_rows, a.info.unique_countries);
            let b = session
                .load_b(&catalog_b)
                .with_context(|| format!("カタログBの読み込みに失敗: {}", catalog_b.display()))?;
            println!("✔ B: {}件 ({}か国)\n", b.info.total_rows, b.info.unique_countries);

            // 2. 照合
            println!(
                "[2/3] 照合中... (しきい値 {}, 単語数差 {}){}",
                options.similarity_threshold,
                options.max_token_diff,
                if request.translate { " (翻訳あり)" } else { "" }
            );
            let mut progress = PhaseProgress::default();
            let run = session.run_match(&request, |phase, done, total| progress.update(phase, done, total), None);
            progress.finish();
            let run = run?;
            if let (true, Some(folder)) = (request.translate, cache_dir.as_deref()) {
                translator::persist_cache(session.translator(), folder, &config.target_language)?;
            }
            println!("✔ {}件の対応を検出\n", run.match_count);

            report::print_warnings(&run.warnings);
            report::print_summary(&session.analysis(top.unwrap_or(config.top_n)), session.last_matches());
            println!();

            // 3. 出力
            println!("[3/3] エクスポート中...");
            let output_dir = output.unwrap_or_else(|| PathBuf::from("."));
            match export::export_results(session.last_matches(), &format, &output_dir) {
                Ok(_) => {}
                Err(error::CatalogMatchError::NoMatchResults) => {
                    println!("- 照合結果がないため出力をスキップしました");
                }
                Err(e) => return Err(e.into()),
            }

            println!("\n✅ 完了");
        }

        Commands::Analyze { input, top } => {
            println!("📊 catalog-match - 結果集計\n");

            let matches = loader::results::read_match_set(&input)
                .with_context(|| format!("照合結果の読み込みに失敗: {}", input.display()))?;
            if matches.is_empty() {
                println!("照合結果が0件です\n");
            }

            let summary = catalog_match_common::analyze_with_top(&matches, top.unwrap_or(config.top_n));
            report::print_summary(&summary, &matches);
        }

        Commands::Inspect { catalog, rows } => {
            println!("📋 catalog-match - カタログ確認\n");

            let loaded = loader::read_catalog(&catalog)
                .with_context(|| format!("カタログの読み込みに失敗: {}", catalog.display()))?;
            report::print_catalog_info(&loaded.catalog.label, &loaded.info);
            report::print_preview(loaded.catalog.preview(rows));
            println!();

            if loaded.findings.is_empty() {
                println!("✔ 品質上の問題は見つかりませんでした");
            } else {
                report::print_warnings(&loaded.findings);
            }
        }

        Commands::Translate { texts, cache_dir } => {
            let backend = AiCliTranslator::from_config(&translator_config, cli.verbose);
            let mut service = translator::build_service(backend, cache_dir.as_deref(), &config.target_language);

            println!("🌐 catalog-match - 翻訳 ({})\n", provider);
            for text in &texts {
                let outcome = service.translate(text);
                match outcome.warning() {
                    Some(warning) => println!("⚠ {}", warning),
                    None => println!("{} → {}", text, outcome.text()),
                }
            }

            if let Some(folder) = cache_dir.as_deref() {
                translator::persist_cache(&service, folder, &config.target_language)?;
            }
        }

        Commands::Cache { clear, folder, info } => {
            let target = folder.unwrap_or_else(|| PathBuf::from("."));
            print_cache(&target, &config.target_language, clear, info)?;
        }

        Commands::Config { set_threshold, set_max_token_diff, set_provider, show } => {
            let mut config = config;

            if let Some(threshold) = set_threshold {
                config.set_threshold(threshold)?;
                println!("✔ 類似度しきい値を設定しました: {}", threshold);
            }

            if let Some(diff) = set_max_token_diff {
                config.set_max_token_diff(diff)?;
                println!("✔ 単語数差の上限を設定しました: {}", diff);
            }

            if let Some(provider) = set_provider {
                config.set_provider(provider)?;
                println!("✔ AIプロバイダを設定しました: {}", provider);
            }

            if show {
                println!("設定:");
                println!("  類似度しきい値: {}", config.similarity_threshold);
                println!("  単語数差の上限: {}", config.max_token_diff);
                println!("  上位表示件数: {}", config.top_n);
                println!("  翻訳: {}", if config.translate { "有効" } else { "無効" });
                println!("  AIプロバイダ: {}", config.ai_provider);
                println!("  言語: {} → {}", config.source_language, config.target_language);
                let (min, max) = config.translation_delay_range();
                println!("  翻訳待機: {}-{}ms", min, max);
                println!("  ログレベル: {}", config.log_level);
                if let Ok(path) = Config::config_path() {
                    println!("  設定ファイル: {}", path.display());
                }
            }
        }
    }

    Ok(())
}

fn print_cache(target: &Path, target_language: &str, clear: bool, info: bool) -> error::Result<()> {
    let cache_path = TranslationCacheFile::cache_path(target);

    if info || !clear {
        // デフォルトまたは--info: 情報表示
        if cache_path.exists() {
            let cache = TranslationCacheFile::load(target, target_language);
            let mut service = TranslationService::new(|_: &str| -> Result<String, String> {
                Err("offline".to_string())
            });
            service.seed_cache(cache.entries());
            let summary = service.cache_info();

            println!("キャッシュ情報:");
            println!("  パス: {}", cache_path.display());
            println!("  件数: {}", summary.cache_size);
            if let Ok(meta) = std::fs::metadata(&cache_path) {
                println!("  サイズ: {} bytes", meta.len());
            }
            for text in &summary.cached_translations {
                println!("    {} → {}", text, cache.get(text).unwrap_or(""));
            }
        } else {
            println!("キャッシュファイルが存在しません: {}", cache_path.display());
        }
    }

    if clear {
        match TranslationCacheFile::clear(target) {
            Ok(true) => println!("✔ キャッシュを削除しました: {}", cache_path.display()),
            Ok(false) => println!("キャッシュファイルが存在しません"),
            Err(e) => println!("キャッシュ削除エラー: {}", e),
        }
    }

    Ok(())
}

/// 段階ごとに作り直すプログレスバー
#[derive(Default)]
struct PhaseProgress {
    current: Option<(RunPhase, ProgressBar)>,
}

impl PhaseProgress {
    fn update(&mut self, phase: RunPhase, done: usize, total: usize) {
        let stale = matches!(&self.current, Some((p, _)) if *p != phase);
        if stale {
            self.finish();
        }

        let (_, bar) = self.current.get_or_insert_with(|| {
            let bar = ProgressBar::new(total as u64);
            let style = ProgressStyle::default_bar()
                .template("{msg} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} ({eta})")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("##-");
            bar.set_style(style);
            bar.set_message(phase.label());
            (phase, bar)
        });
        bar.set_position(done as u64);
    }

    fn finish(&mut self) {
        if let Some((_, bar)) = self.current.take() {
            bar.finish_and_clear();
        }
    }
}
