//! AI CLI連携による商品名翻訳
//!
//! 設定されたAI CLI（claude / codex / gemini）に1件ずつプロンプトを渡し、
//! 標準出力の1行目を翻訳結果として使う。
//! 外部サービスのレート制限を避けるため、呼び出し前にランダムに待機する。

use crate::ai_provider::AiProvider;
use crate::config::Config;
use crate::error::{CatalogMatchError, Result};
use catalog_match_common::TranslationBackend;
use rand::Rng;
use std::process::Command;
#[cfg(windows)]
use std::io::Write;
#[cfg(windows)]
use std::process::Stdio;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct AiCliTranslator {
    provider: AiProvider,
    source_language: String,
    target_language: String,
    delay_ms: (u64, u64),
    verbose: bool,
}

impl AiCliTranslator {
    pub fn new(provider: AiProvider, source_language: &str, target_language: &str) -> Self {
        Self {
            provider,
            source_language: source_language.to_string(),
            target_language: target_language.to_string(),
            delay_ms: (100, 300),
            verbose: false,
        }
    }

    pub fn from_config(config: &Config, verbose: bool) -> Self {
        Self {
            delay_ms: config.translation_delay_range(),
            verbose,
            ..Self::new(config.ai_provider, &config.source_language, &config.target_language)
        }
    }

    pub fn provider(&self) -> AiProvider {
        self.provider
    }

    fn build_prompt(&self, text: &str) -> String {
        let raw_prompt = format!(
            "Translate the following product name from {} to {}. \
             Reply with the translation only, on a single line, without quotes or notes.\n\n{}",
            self.source_language, self.target_language, text
        );
        // 1つの引数として渡すので改行だけをスペースにする
        raw_prompt.replace('\n', " ")
    }

    fn wait_rate_limit(&self) {
        let (min, max) = self.delay_ms;
        if max == 0 {
            return;
        }
        let delay = rand::thread_rng().gen_range(min..=max);
        std::thread::sleep(Duration::from_millis(delay));
    }

    fn run_cli(&self, prompt: &str) -> Result<String> {
        let command = self.provider.command_name();

        // cmd.exe は引数の引用符を解釈し直すため、商品名は標準入力で渡す
        #[cfg(windows)]
        let output = {
            let mut child = Command::new("cmd")
                .arg("/c")
                .arg(command)
                .args(self.provider.stdin_args())
                .stdin(Stdio::piped())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .spawn()
                .map_err(|e| CatalogMatchError::CliExecution(format!("{} CLI実行エラー: {}", command, e)))?;
            if let Some(mut stdin) = child.stdin.take() {
                stdin.write_all(prompt.as_bytes())?;
            }
            child
                .wait_with_output()
                .map_err(|e| CatalogMatchError::CliExecution(format!("{} CLI実行エラー: {}", command, e)))?
        };

        #[cfg(not(windows))]
        let output = Command::new(command)
            .args(self.provider.prompt_args(prompt))
            .output()
            .map_err(|e| CatalogMatchError::CliExecution(format!("{} CLI実行エラー: {}", command, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CatalogMatchError::CliExecution(format!(
                "{} CLI failed (code {:?}): {}",
                command,
                output.status.code(),
                stderr.trim()
            )));
        }

        let response = String::from_utf8_lossy(&output.stdout).to_string();

        if self.verbose {
            let preview: String = response.chars().take(200).collect();
            tracing::debug!(provider = %self.provider, "レスポンス: {}", preview);
        }

        Ok(response)
    }
}

impl TranslationBackend for AiCliTranslator {
    fn translate(&self, text: &str) -> std::result::Result<String, String> {
        self.wait_rate_limit();

        let prompt = self.build_prompt(text);
        let response = self.run_cli(&prompt).map_err(|e| e.to_string())?;

        clean_response(&response).ok_or_else(|| "空のレスポンス".to_string())
    }
}

/// レスポンスから翻訳文を取り出す（最初の空でない行、前後の引用符を除去）
pub fn clean_response(response: &str) -> Option<String> {
    let line = response.lines().map(str::trim).find(|l| !l.is_empty())?;
    let line = line
        .trim_matches(|c| c == '"' || c == '\'' || c == '`' || c == '「' || c == '」')
        .trim();
    if line.is_empty() {
        None
    } else {
        Some(line.to_string())
    }
}
