use assert_cmd::Command;
use predicates::prelude::*;

struct Env {
    _config: tempfile::TempDir,
    config_path: std::path::PathBuf,
    data: tempfile::TempDir,
}

fn setup() -> Env {
    let config = tempfile::tempdir().unwrap();
    let data = tempfile::tempdir().unwrap();
    let config_path = config.path().to_path_buf();
    Env {
        _config: config,
        config_path,
        data,
    }
}

fn penny(env: &Env) -> Command {
    let mut cmd = Command::cargo_bin("penny").unwrap();
    cmd.env("PENNY_CONFIG_DIR", &env.config_path);
    cmd
}

fn write_csv(env: &Env, name: &str, rows: &[(&str, &str, &str)]) -> std::path::PathBuf {
    let path = env.data.path().join(name);
    let mut content = String::from("Summary,,\n\nDate,Description,Amount,Running Bal.\n");
    for (date, desc, amount) in rows {
        content.push_str(&format!("{date},\"{desc}\",{amount},0.00\n"));
    }
    std::fs::write(&path, &content).unwrap();
    path
}

fn init(env: &Env) {
    penny(env)
        .args(["init", "--data-dir"])
        .arg(env.data.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized database"));
}

#[test]
fn test_init_creates_database() {
    let env = setup();
    init(&env);
    assert!(env.data.path().join("penny.db").exists());
}

#[test]
fn test_import_then_reimport_is_idempotent() {
    let env = setup();
    init(&env);
    let csv = write_csv(
        &env,
        "Export_1425.csv",
        &[
            ("07/30/2025", "DEBIT CARD PURCHASE MCDONALD'S F18095 MANASSAS VA", "-8.42"),
            ("07/30/2025", "DIRECT DEBIT STATE FARM RO SFPP (Cash)", "-141.27"),
        ],
    );

    penny(&env)
        .arg("import")
        .arg(&csv)
        .assert()
        .success()
        .stdout(predicate::str::contains("2 imported"));

    penny(&env)
        .arg("import")
        .arg(&csv)
        .assert()
        .success()
        .stdout(predicate::str::contains("already been imported"));

    penny(&env)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Transactions:   2"));
}

#[test]
fn test_row_duplicates_across_files() {
    let env = setup();
    init(&env);
    let a = write_csv(&env, "july_a_1425.csv", &[("07/30/2025", "CHECK 1042", "-120.00")]);
    let b = write_csv(&env, "july_b_1425.csv", &[("7/30/25", "CHECK 1042", "-120.00")]);

    penny(&env)
        .arg("import")
        .arg(&a)
        .assert()
        .success()
        .stdout(predicate::str::contains("1 imported"));

    // same logical row in a different file and date format
    penny(&env)
        .arg("import")
        .arg(&b)
        .assert()
        .success()
        .stdout(predicate::str::contains("0 imported, 1 duplicates"));

    penny(&env)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Transactions:   1"));
}

#[test]
fn test_confident_import_learns_patterns() {
    let env = setup();
    init(&env);
    let csv = write_csv(
        &env,
        "Export_1425.csv",
        &[("07/30/2025", "DEBIT CARD PURCHASE MCDONALD'S F18095 MANASSAS VA", "-8.42")],
    );
    penny(&env).arg("import").arg(&csv).assert().success();

    penny(&env)
        .arg("patterns")
        .assert()
        .success()
        .stdout(predicate::str::contains("mcdonald"));
}

#[test]
fn test_classify_reports_counts() {
    let env = setup();
    init(&env);
    let csv = write_csv(&env, "Export_1425.csv", &[("07/30/2025", "zzqx 4411", "-45.00")]);
    penny(&env).arg("import").arg(&csv).assert().success();

    penny(&env)
        .arg("classify")
        .assert()
        .success()
        .stdout(predicate::str::contains("still need review"));
}

#[test]
fn test_accounts_add_and_list() {
    let env = setup();
    init(&env);
    penny(&env)
        .args(["accounts", "add", "Primary Checking", "--number", "1425"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added account"));

    penny(&env)
        .args(["accounts", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Primary Checking"));
}
