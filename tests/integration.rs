use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn rec_binary() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("rec");
    path
}

const RATINGS_CSV: &str = "userId,movieId,rating,timestamp
1,1,5.0,964982703
1,2,4.0,964981247
2,1,5.0,964982224
2,2,4.0,964983815
3,1,1.0,964982931
3,2,1.0,964982400
4,3,3.5,964980868
4,4,2.0,964982176
";

const MOVIES_CSV: &str = "movieId,title,genres
1,Toy Story (1995),Adventure|Animation|Children|Comedy|Fantasy
2,Jumanji (1995),Adventure|Children|Fantasy
3,\"Grumpier Old Men, The (1995)\",Comedy|Romance
";

fn setup_test_env(source: &str) -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().to_path_buf();

    let config_dir = root.join("config");
    fs::create_dir_all(&config_dir).unwrap();
    let data_dir = root.join("data");
    fs::create_dir_all(&data_dir).unwrap();

    fs::write(data_dir.join("ratings.csv"), RATINGS_CSV).unwrap();
    fs::write(data_dir.join("movies.csv"), MOVIES_CSV).unwrap();

    let config_content = format!(
        r#"[db]
path = "{root}/data/rec.sqlite"

[data]
source = "{source}"
ratings_csv = "{root}/data/ratings.csv"
items_csv = "{root}/data/movies.csv"

[recommend]
default_top_n = 5

[server]
bind = "127.0.0.1:7341"
"#,
        root = root.display(),
        source = source,
    );

    let config_path = config_dir.join("rec.toml");
    fs::write(&config_path, config_content).unwrap();

    (tmp, config_path)
}

fn run_rec(config: &Path, args: &[&str]) -> (String, String, bool) {
    let output = Command::new(rec_binary())
        .arg("--config")
        .arg(config)
        .args(args)
        .output()
        .expect("failed to execute rec binary");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

fn setup_imported() -> (TempDir, PathBuf) {
    let (tmp, config) = setup_test_env("sqlite");
    let (_, stderr, ok) = run_rec(&config, &["init"]);
    assert!(ok, "init failed: {}", stderr);
    let (_, stderr, ok) = run_rec(&config, &["import", "--progress", "off"]);
    assert!(ok, "import failed: {}", stderr);
    (tmp, config)
}

#[test]
fn test_init_creates_database() {
    let (tmp, config) = setup_test_env("sqlite");
    let (stdout, stderr, success) = run_rec(&config, &["init"]);
    assert!(success, "init failed: {}", stderr);
    assert!(stdout.contains("Database initialized successfully"));
    assert!(tmp.path().join("data/rec.sqlite").exists());
}

#[test]
fn test_init_idempotent() {
    let (_tmp, config) = setup_test_env("sqlite");
    let (_, _, s1) = run_rec(&config, &["init"]);
    let (_, _, s2) = run_rec(&config, &["init"]);
    assert!(s1 && s2);
}

#[test]
fn test_import_reports_counts() {
    let (_tmp, config) = setup_test_env("sqlite");
    run_rec(&config, &["init"]);
    let (stdout, stderr, success) = run_rec(&config, &["import", "--progress", "off"]);
    assert!(success, "import failed: {}", stderr);
    assert!(stdout.contains("ratings upserted: 8"), "got: {}", stdout);
    assert!(stdout.contains("items upserted: 3"), "got: {}", stdout);
    assert!(stdout.contains("ok"));
}

#[test]
fn test_import_dry_run_writes_nothing() {
    let (tmp, config) = setup_test_env("sqlite");
    let (stdout, _, success) = run_rec(&config, &["import", "--dry-run"]);
    assert!(success);
    assert!(stdout.contains("import (dry-run)"));
    assert!(stdout.contains("ratings found: 8"));
    assert!(stdout.contains("items found: 3"));
    assert!(!tmp.path().join("data/rec.sqlite").exists());
}

#[test]
fn test_import_json_progress_on_stderr() {
    let (_tmp, config) = setup_test_env("sqlite");
    let (stdout, stderr, success) = run_rec(&config, &["import", "--progress", "json"]);
    assert!(success, "import failed: {}", stderr);
    assert!(stderr.contains("\"phase\":\"writing\""), "got: {}", stderr);
    assert!(!stdout.contains("\"event\""));
}

#[test]
fn test_recommend_ranks_by_weighted_correlation() {
    let (_tmp, config) = setup_imported();
    let (stdout, stderr, success) = run_rec(&config, &["recommend", "1", "--limit", "1"]);
    assert!(success, "recommend failed: {}", stderr);
    assert_eq!(stdout.trim(), "1. Jumanji (1995) (Similarity Score: 3.00)");
}

#[test]
fn test_recommend_skips_items_missing_from_catalog() {
    let (_tmp, config) = setup_imported();
    let (stdout, _, success) = run_rec(&config, &["recommend", "1"]);
    assert!(success);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(
        lines,
        vec![
            "1. Jumanji (1995) (Similarity Score: 3.00)",
            "2. Grumpier Old Men, The (1995) (Similarity Score: 0.00)",
        ]
    );
}

#[test]
fn test_recommend_explain() {
    let (_tmp, config) = setup_imported();
    let (stdout, _, success) = run_rec(&config, &["recommend", "1", "--limit", "1", "--explain"]);
    assert!(success);
    assert!(stdout.contains("correlation=1.000"), "got: {}", stdout);
    assert!(stdout.contains("support=3"), "got: {}", stdout);
}

#[test]
fn test_recommend_json() {
    let (_tmp, config) = setup_imported();
    let (stdout, _, success) = run_rec(&config, &["recommend", "2", "--json"]);
    assert!(success);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let results = parsed.as_array().unwrap();
    assert_eq!(results[0]["item_id"], 1);
    assert_eq!(results[0]["title"], "Toy Story (1995)");
    assert!((results[0]["score"].as_f64().unwrap() - 3.0).abs() < 1e-9);
    assert!(results[0].get("explain").is_none());
}

#[test]
fn test_recommend_unknown_item_is_not_an_error() {
    let (_tmp, config) = setup_imported();
    let (stdout, _, success) = run_rec(&config, &["recommend", "999", "--limit", "2"]);
    assert!(success);
    assert_eq!(stdout.lines().count(), 2);
    assert!(stdout.contains("(Similarity Score: 0.00)"));
}

#[test]
fn test_recommend_invalid_item_id_fails() {
    let (_tmp, config) = setup_imported();
    for bad in ["abc", "0", "-1"] {
        let (_, stderr, success) = run_rec(&config, &["recommend", "--", bad]);
        assert!(!success, "expected failure for {}", bad);
        assert!(stderr.contains("invalid input"), "got: {}", stderr);
    }
}

#[test]
fn test_similarity_command() {
    let (_tmp, config) = setup_imported();
    let (stdout, _, success) = run_rec(&config, &["similarity", "1", "2", "--json"]);
    assert!(success);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["support"], 3);
    assert!((parsed["correlation"].as_f64().unwrap() - 1.0).abs() < 1e-9);
    assert!((parsed["score"].as_f64().unwrap() - 3.0).abs() < 1e-9);

    let (stdout, _, success) = run_rec(&config, &["similarity", "1", "3"]);
    assert!(success);
    assert!(stdout.contains("support:     0"), "got: {}", stdout);
}

#[test]
fn test_stats() {
    let (_tmp, config) = setup_imported();
    let (stdout, stderr, success) = run_rec(&config, &["stats"]);
    assert!(success, "stats failed: {}", stderr);
    assert!(stdout.contains("Ratings:     8"), "got: {}", stdout);
    assert!(stdout.contains("Users:       4"));
    assert!(stdout.contains("Rated items: 4"));
    assert!(stdout.contains("Catalog:     3"));
    assert!(stdout.contains("Missing from catalog: 1"));
}

#[test]
fn test_csv_source_needs_no_database() {
    let (tmp, config) = setup_test_env("csv");
    let (stdout, stderr, success) = run_rec(&config, &["recommend", "1", "--limit", "1"]);
    assert!(success, "recommend failed: {}", stderr);
    assert_eq!(stdout.trim(), "1. Jumanji (1995) (Similarity Score: 3.00)");
    assert!(!tmp.path().join("data/rec.sqlite").exists());
}

#[test]
fn test_missing_config_fails() {
    let tmp = TempDir::new().unwrap();
    let (_, stderr, success) = run_rec(&tmp.path().join("nope.toml"), &["stats"]);
    assert!(!success);
    assert!(stderr.contains("Failed to read config file"), "got: {}", stderr);
}
