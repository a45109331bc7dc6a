//! 翻訳キャッシュテスト
//!
//! キャッシュファイルの保存・読み込みと翻訳サービスへの取り込みを検証

use catalog_match::session::{MatchRequest, Session};
use catalog_match::translator::{self, TranslationCacheFile};
use catalog_match_common::{TranslationBackend, TranslationService};
use std::cell::Cell;
use std::path::Path;
use tempfile::tempdir;

/// 空のキャッシュファイル
#[test]
fn test_cache_file_empty() {
    let dir = tempdir().expect("Failed to create temp dir");
    let cache = TranslationCacheFile::load(dir.path(), "en");

    assert_eq!(cache.len(), 0);
    assert!(cache.is_empty());
}

/// キャッシュの保存と読み込み
#[test]
fn test_cache_save_and_load() {
    let dir = tempdir().expect("Failed to create temp dir");

    let mut cache = TranslationCacheFile::load(dir.path(), "en");
    cache.insert("東京塔".to_string(), "Tokyo Tower".to_string());
    cache.save(dir.path()).expect("キャッシュ保存失敗");

    let loaded = TranslationCacheFile::load(dir.path(), "en");
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded.get("東京塔"), Some("Tokyo Tower"));
    assert!(loaded.get("大阪城").is_none());
}

/// 翻訳先言語が違うキャッシュは使わない
#[test]
fn test_cache_language_mismatch() {
    let dir = tempdir().expect("Failed to create temp dir");

    let mut cache = TranslationCacheFile::new("en");
    cache.insert("東京塔".to_string(), "Tokyo Tower".to_string());
    cache.save(dir.path()).expect("キャッシュ保存失敗");

    let loaded = TranslationCacheFile::load(dir.path(), "ja");
    assert!(loaded.is_empty());
}

/// 壊れたキャッシュファイルは空として扱う
#[test]
fn test_corrupted_cache_file() {
    let dir = tempdir().expect("Failed to create temp dir");
    std::fs::write(TranslationCacheFile::cache_path(dir.path()), "{ invalid json")
        .expect("書き込み失敗");

    let cache = TranslationCacheFile::load(dir.path(), "en");
    assert!(cache.is_empty());
}

/// バージョンが異なるキャッシュは空として扱う
#[test]
fn test_cache_version_mismatch() {
    let dir = tempdir().expect("Failed to create temp dir");
    let json = r#"{"version": 99, "target_language": "en", "entries": {"a": "b"}}"#;
    std::fs::write(TranslationCacheFile::cache_path(dir.path()), json).expect("書き込み失敗");

    let cache = TranslationCacheFile::load(dir.path(), "en");
    assert!(cache.is_empty());
}

/// キャッシュの削除
#[test]
fn test_cache_clear() {
    let dir = tempdir().expect("Failed to create temp dir");

    assert!(!TranslationCacheFile::clear(dir.path()).expect("削除失敗"));

    TranslationCacheFile::new("en").save(dir.path()).expect("キャッシュ保存失敗");
    assert!(TranslationCacheFile::cache_path(dir.path()).exists());

    assert!(TranslationCacheFile::clear(dir.path()).expect("削除失敗"));
    assert!(!TranslationCacheFile::cache_path(dir.path()).exists());
}

/// 保存済みの翻訳はバックエンドを呼ばずに返る
#[test]
fn test_service_uses_persisted_cache() {
    let dir = tempdir().expect("Failed to create temp dir");
    let calls = Cell::new(0);

    {
        let backend = |text: &str| -> Result<String, String> {
            calls.set(calls.get() + 1);
            Ok(format!("EN {}", text))
        };
        let mut service = translator::build_service(backend, Some(dir.path()), "en");
        assert_eq!(service.translate("台北").text(), "EN 台北");
        translator::persist_cache(&service, dir.path(), "en").expect("キャッシュ保存失敗");
    }
    assert_eq!(calls.get(), 1);

    let backend = |_: &str| -> Result<String, String> {
        calls.set(calls.get() + 1);
        Err("should not be called".to_string())
    };
    let mut service = translator::build_service(backend, Some(dir.path()), "en");
    let outcome = service.translate("台北");

    assert!(!outcome.is_failed());
    assert_eq!(outcome.text(), "EN 台北");
    assert_eq!(calls.get(), 1);
}

/// 失敗した翻訳は保存されない
#[test]
fn test_failed_translation_not_persisted() {
    let dir = tempdir().expect("Failed to create temp dir");

    let mut service = TranslationService::new(|_: &str| -> Result<String, String> {
        Err("timeout".to_string())
    });
    assert!(service.translate("九份").is_failed());
    translator::persist_cache(&service, dir.path(), "en").expect("キャッシュ保存失敗");

    let cache = TranslationCacheFile::load(dir.path(), "en");
    assert!(cache.is_empty());
}

/// 1回分の照合を翻訳付きで実行する
fn run_translated_session<B: TranslationBackend>(
    dir: &Path,
    backend: B,
    cache_dir: Option<&Path>,
) -> Session<B> {
    let a = dir.join("a.csv");
    let b = dir.join("b.csv");
    std::fs::write(&a, "product_id,product_name,product_location_country,price\n1,東京塔,JP,100\n")
        .expect("書き込み失敗");
    std::fs::write(&b, "product_id,product_name,product_location_country,price\n2,tokyo tower,JP,120\n")
        .expect("書き込み失敗");

    let mut session = Session::new(translator::build_service(backend, cache_dir, "en"));
    session.load_a(&a).expect("A読み込み失敗");
    session.load_b(&b).expect("B読み込み失敗");
    session
        .run_match(
            &MatchRequest {
                translate: true,
                ..Default::default()
            },
            |_, _, _| {},
            None,
        )
        .expect("照合失敗");
    session
}

/// 既定では翻訳キャッシュは次のセッションに引き継がれない
#[test]
fn test_sessions_do_not_share_translations_by_default() {
    let dir = tempdir().expect("Failed to create temp dir");
    let calls = Cell::new(0);
    let backend = |text: &str| -> Result<String, String> {
        if text == "東京塔" {
            calls.set(calls.get() + 1);
            Ok("tokyo tower".to_string())
        } else {
            Ok(text.to_string())
        }
    };

    let first = run_translated_session(dir.path(), &backend, None);
    assert_eq!(first.last_matches()[0].similarity, 1.0);
    assert_eq!(first.translator().cache_info().cache_size, 2);

    let second = run_translated_session(dir.path(), &backend, None);
    assert_eq!(second.last_matches().len(), 1);
    assert_eq!(calls.get(), 2);
    assert!(!TranslationCacheFile::cache_path(dir.path()).exists());
}

/// キャッシュフォルダを指定した場合だけ次のセッションで再利用される
#[test]
fn test_sessions_share_translations_with_cache_dir() {
    let dir = tempdir().expect("Failed to create temp dir");
    let cache_dir = dir.path().join("cache");
    std::fs::create_dir_all(&cache_dir).expect("フォルダ作成失敗");
    let calls = Cell::new(0);
    let backend = |text: &str| -> Result<String, String> {
        if text == "東京塔" {
            calls.set(calls.get() + 1);
            Ok("tokyo tower".to_string())
        } else {
            Ok(text.to_string())
        }
    };

    let first = run_translated_session(dir.path(), &backend, Some(&cache_dir));
    translator::persist_cache(first.translator(), &cache_dir, "en").expect("キャッシュ保存失敗");

    let second = run_translated_session(dir.path(), &backend, Some(&cache_dir));
    assert_eq!(second.last_matches()[0].a_name_en, "tokyo tower");
    assert_eq!(calls.get(), 1);
}
