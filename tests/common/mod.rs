use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;

use hooswho::config::{AnthropicConfig, ApiKey, Config};
use hooswho::dispatcher::QueryDispatcher;
use hooswho::providers::{create_provider, Provider};
use hooswho::security::{AuditLog, Sanitizer};
use hooswho::{Assistant, Directory};

#[allow(dead_code)]
pub const STUDENTS_CSV: &str = "\
name,current_company,current_role,past_companies,industries,contact
Jane Doe,ICF,Senior Consultant,Deloitte,Consulting,jane@virginia.edu
John Roe,Capital One,Data Scientist,\"Amazon, Booz Allen\",\"Banking, Tech\",john@virginia.edu
Amy Poe,ICF,Analyst,Leidos,Government Consulting,amy@virginia.edu
";

#[allow(dead_code)]
pub fn temp_students_csv() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let csv_path = temp_dir.path().join("student_data.csv");
    fs::write(&csv_path, STUDENTS_CSV).expect("failed to write csv");
    (temp_dir, csv_path)
}

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}

/// Assistant wired to a real Anthropic provider pointed at `api_base`
#[allow(dead_code)]
pub fn assistant_against(api_base: &str, dir: &TempDir) -> Assistant {
    let config = Config {
        provider: AnthropicConfig {
            api_base: api_base.to_string(),
            model: "claude-test".to_string(),
            timeout_seconds: 5,
            ..AnthropicConfig::default()
        },
        ..Config::default()
    };
    let provider = create_provider(&config.provider, ApiKey::new("sk-ant-test"))
        .expect("failed to create provider");
    assistant_with(provider, dir, &config)
}

#[allow(dead_code)]
pub fn assistant_with(provider: Arc<dyn Provider>, dir: &TempDir, config: &Config) -> Assistant {
    let directory =
        Arc::new(Directory::from_csv_str(STUDENTS_CSV).expect("failed to parse directory"));
    let audit = Arc::new(AuditLog::open(audit_path(dir)).expect("failed to open audit log"));
    let dispatcher = QueryDispatcher::new(
        provider,
        directory,
        audit,
        config.provider.max_tokens,
        Duration::from_secs(config.provider.timeout_seconds),
    );
    Assistant::new(
        Sanitizer::new(
            config.security.max_input_chars,
            config.security.min_question_chars,
        ),
        dispatcher,
        config.security.max_queries_per_window,
        config
            .security
            .rate_window()
            .expect("rate window out of range"),
    )
}

#[allow(dead_code)]
pub fn audit_path(dir: &TempDir) -> PathBuf {
    dir.path().join("audit.log")
}

#[allow(dead_code)]
pub fn read_audit(dir: &TempDir) -> String {
    fs::read_to_string(audit_path(dir)).unwrap_or_default()
}
