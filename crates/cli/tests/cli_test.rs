//! End-to-end runs of the `lesspress` binary against a scratch site

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const OVERRIDES: &[&str] = &[
    "LESSPRESS_CONFIG",
    "LESSPRESS_TEMPLATES",
    "LESSPRESS_COMPILE",
    "LESSPRESS_FORCE",
    "LESSPRESS_GENERATE_SOURCEMAP",
    "LESSPRESS_GENERATE_UNCOMPRESSED",
    "LESSPRESS_LESSC",
];

struct Site {
    dir: TempDir,
}

impl Site {
    fn new(params: &str) -> Self {
        let dir = TempDir::new().unwrap();
        let less = dir.path().join("templates/protostar/less");
        fs::create_dir_all(&less).unwrap();
        fs::create_dir_all(dir.path().join("templates/protostar/css")).unwrap();
        fs::write(less.join("template.less"), ".a { color: red; }\n").unwrap();
        fs::write(
            dir.path().join("lesspress.json"),
            format!(r#"{{"site_root": ".", "cache_dir": "cache", "params": {params}}}"#),
        )
        .unwrap();
        Self { dir }
    }

    fn path(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("lesspress").unwrap();
        for var in OVERRIDES {
            cmd.env_remove(var);
        }
        cmd.env("RUST_LOG", "warn")
            .arg("--config")
            .arg(self.path("lesspress.json"));
        cmd
    }
}

#[test]
fn clear_cache_succeeds_on_fresh_site() {
    let site = Site::new(r#"{"templates": ["protostar"]}"#);

    site.cmd()
        .arg("clear-cache")
        .assert()
        .success()
        .stdout(predicate::str::contains("Cache cleared"));
}

#[test]
fn status_reports_missing_metadata() {
    let site = Site::new(r#"{"templates": ["protostar"]}"#);

    site.cmd()
        .args(["status", "--template", "protostar"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configured:  yes"))
        .stdout(predicate::str::contains("stale (no metadata recorded)"))
        .stdout(predicate::str::contains("Tracked files: none"))
        .stdout(predicate::str::contains("missing"));
}

#[test]
fn render_unconfigured_template_changes_nothing() {
    let site = Site::new(r#"{"templates": ["beez3"]}"#);

    site.cmd()
        .args(["render", "--template", "protostar"])
        .assert()
        .success()
        .stdout(predicate::str::contains("<head>\n</head>"));

    assert!(!site.path("templates/protostar/css/template.min.css").exists());
}

#[test]
fn client_mode_render_serves_less() {
    let site = Site::new(r#"{"templates": ["protostar"], "compile": "less.js"}"#);
    let stale = site.path("templates/protostar/css/template.min.css");
    fs::write(&stale, ".a{color:blue}").unwrap();

    site.cmd()
        .args(["render", "--template", "protostar"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            r#"<link rel="stylesheet/less" href="/templates/protostar/less/template.less""#,
        ))
        .stdout(predicate::str::contains(
            r#"<script src="/media/plg_system_jless/js/less.min.js""#,
        ));

    assert!(!stale.exists());
}

#[test]
fn render_reads_body_file() {
    let site = Site::new(r#"{"templates": ["protostar"], "compile": "client"}"#);
    let body = site.path("page.html");
    fs::write(&body, "<html><head><title>Home</title></head><body>hi</body></html>").unwrap();

    site.cmd()
        .args(["render", "--template", "protostar", "--body"])
        .arg(&body)
        .assert()
        .success()
        .stdout(predicate::str::contains("<title>Home</title><link rel=\"stylesheet/less\""))
        .stdout(predicate::str::contains("<body>hi</body>"));
}

#[test]
fn admin_render_skips_build() {
    let site = Site::new(r#"{"templates": ["protostar"], "compile": "client"}"#);

    site.cmd()
        .args(["render", "--template", "protostar", "--admin"])
        .assert()
        .success()
        .stdout(predicate::str::contains("stylesheet").not());
}

#[cfg(unix)]
mod server {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    /// Emits fixed CSS, writes the map where asked and reports no imports
    const FAKE_LESSC: &str = r#"#!/bin/sh
if [ "$1" = "--depends" ]; then
  printf '%s:\n' "$3"
  exit 0
fi
for last in "$@"; do :; done
if grep -q '!!error' "$last"; then
  echo "ParseError: Unrecognised input in $last" >&2
  exit 1
fi
for arg in "$@"; do
  case "$arg" in
    --source-map=*) printf '{"version":3}' > "${arg#--source-map=}" ;;
  esac
done
printf '.a{color:red}'
"#;

    fn install_fake_lessc(dir: &Path) -> PathBuf {
        let path = dir.join("fake-lessc");
        fs::write(&path, FAKE_LESSC).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[test]
    fn server_render_publishes_then_reports_fresh() {
        let site = Site::new(r#"{"templates": ["protostar"]}"#);
        let lessc = install_fake_lessc(site.dir.path());

        site.cmd()
            .env("LESSPRESS_LESSC", &lessc)
            .args(["render", "--template", "protostar"])
            .assert()
            .success();

        assert_eq!(
            fs::read_to_string(site.path("templates/protostar/css/template.min.css")).unwrap(),
            ".a{color:red}"
        );
        assert!(site.path("templates/protostar/css/template.css.map").exists());

        site.cmd()
            .env("LESSPRESS_LESSC", &lessc)
            .args(["status", "--template", "protostar"])
            .assert()
            .success()
            .stdout(predicate::str::contains("State:       up to date"))
            .stdout(predicate::str::contains("Tracked files (1):"))
            .stdout(predicate::str::contains("template.less"));
    }

    #[test]
    fn server_render_failure_keeps_previous_css() {
        let site = Site::new(r#"{"templates": ["protostar"]}"#);
        let lessc = install_fake_lessc(site.dir.path());
        site.cmd()
            .env("LESSPRESS_LESSC", &lessc)
            .args(["render", "--template", "protostar"])
            .assert()
            .success();

        fs::write(site.path("templates/protostar/less/template.less"), ".a { !!error").unwrap();

        site.cmd()
            .env("LESSPRESS_LESSC", &lessc)
            .env("LESSPRESS_FORCE", "1")
            .args(["render", "--template", "protostar"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("[error]"))
            .stderr(predicate::str::contains("ParseError"));

        assert_eq!(
            fs::read_to_string(site.path("templates/protostar/css/template.min.css")).unwrap(),
            ".a{color:red}"
        );
    }
}
