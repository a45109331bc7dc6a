use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// 翻訳に使うAI CLI
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiProvider {
    #[default]
    Claude,
    Codex,
    Gemini,
}

impl AiProvider {
    pub fn command_name(&self) -> &'static str {
        match self {
            AiProvider::Claude => "claude",
            AiProvider::Codex => "codex",
            AiProvider::Gemini => "gemini",
        }
    }

    /// プロンプトを渡して標準出力にテキストを返させる引数
    pub fn prompt_args<'a>(&self, prompt: &'a str) -> Vec<&'a str> {
        match self {
            AiProvider::Claude => vec!["-p", prompt, "--output-format", "text"],
            AiProvider::Codex => vec!["exec", prompt],
            AiProvider::Gemini => vec!["-p", prompt],
        }
    }

    /// プロンプトを標準入力から読ませる引数（利用者の文字列を含まない）
    pub fn stdin_args(&self) -> &'static [&'static str] {
        match self {
            AiProvider::Claude => &["-p", "--output-format", "text"],
            AiProvider::Codex => &["exec", "-"],
            AiProvider::Gemini => &[],
        }
    }
}

impl std::fmt::Display for AiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.command_name())
    }
}

impl std::str::FromStr for AiProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "claude" => Ok(AiProvider::Claude),
            "codex" => Ok(AiProvider::Codex),
            "gemini" => Ok(AiProvider::Gemini),
            _ => Err(format!("Unknown provider: {}. Use claude, codex, or gemini", s)),
        }
    }
}
