//! End-to-end assessment runs: a stubbed Gemini backend, a config file
//! pointing at it, and a scripted proctored session driven through the
//! real binary.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;
use tokio::runtime::Runtime;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Five questions whose correct option is always A.
fn question_payload() -> String {
    let questions: Vec<_> = (0..5)
        .map(|i| {
            json!({
                "question": format!("Question number {i}?"),
                "options": ["alpha", "beta", "gamma", "delta"],
                "correctAnswer": 0,
                "difficulty": if i % 2 == 0 { "Easy" } else { "Hard" }
            })
        })
        .collect();
    serde_json::to_string(&questions).unwrap()
}

fn candidate_body(text: &str) -> serde_json::Value {
    json!({"candidates": [{"content": {"parts": [{"text": text}]}}]})
}

/// Start a stub Gemini server on a dedicated runtime. The runtime must
/// outlive the server, so both are returned.
fn start_stub(template: ResponseTemplate) -> (Runtime, MockServer) {
    let rt = Runtime::new().unwrap();
    let server = rt.block_on(async {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(template)
            .mount(&server)
            .await;
        server
    });
    (rt, server)
}

/// Config + script + output dir in one temp workspace.
struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new(server_uri: &str) -> Self {
        let dir = TempDir::new().unwrap();
        let config = format!(
            "[providers.gemini]\ntype = \"gemini\"\napi_key = \"test-key\"\nbase_url = \"{server_uri}\"\n"
        );
        std::fs::write(dir.path().join("skillmatch.toml"), config).unwrap();
        Self { dir }
    }

    fn write_script(&self, content: &str) -> std::path::PathBuf {
        let path = self.dir.path().join("session.txt");
        std::fs::write(&path, content).unwrap();
        path
    }

    fn command(&self, script: &std::path::Path) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("skillmatch").unwrap();
        cmd.args(["assess", "--domain", "React", "--config"])
            .arg(self.dir.path().join("skillmatch.toml"))
            .arg("--script")
            .arg(script)
            .arg("--output")
            .arg(self.dir.path().join("results"));
        cmd
    }

    fn report_count(&self) -> usize {
        std::fs::read_dir(self.dir.path().join("results"))
            .map(|entries| entries.count())
            .unwrap_or(0)
    }
}

#[test]
fn scripted_session_completes_with_a_score() {
    let (_rt, server) = start_stub(
        ResponseTemplate::new(200).set_body_json(candidate_body(&question_payload())),
    );
    let ws = Workspace::new(&server.uri());

    // 3 of 5 correct -> 60%
    let script = ws.write_script(
        "# answer the first three correctly\n\
         answer a\nnext\n\
         answer a\nnext\n\
         answer a\nnext\n\
         answer b\nnext\n\
         answer c\n\
         submit\n",
    );

    ws.command(&script)
        .assert()
        .success()
        .stdout(predicate::str::contains("60%"))
        .stdout(predicate::str::contains("submitted normally"))
        .stdout(predicate::str::contains("0 violation(s)"));

    assert_eq!(ws.report_count(), 1);
}

#[test]
fn three_violations_terminate_the_scripted_session() {
    let (_rt, server) = start_stub(
        ResponseTemplate::new(200).set_body_json(candidate_body(&question_payload())),
    );
    let ws = Workspace::new(&server.uri());

    let script = ws.write_script(
        "answer a\n\
         signal focus-lost\n\
         signal blur\n\
         signal focus-lost\n",
    );

    ws.command(&script)
        .assert()
        .success()
        .stdout(predicate::str::contains("WARNING: window focus loss detected. Violations: 1/3"))
        .stdout(predicate::str::contains("Violations: 2/3"))
        .stdout(predicate::str::contains("CRITICAL VIOLATION"))
        .stdout(predicate::str::contains("terminated for violations"))
        .stdout(predicate::str::contains("0%"))
        .stdout(predicate::str::contains("3 violation(s)"));

    assert_eq!(ws.report_count(), 1);
}

#[test]
fn signals_after_termination_do_not_grow_the_log() {
    let (_rt, server) = start_stub(
        ResponseTemplate::new(200).set_body_json(candidate_body(&question_payload())),
    );
    let ws = Workspace::new(&server.uri());

    let script = ws.write_script(
        "signal focus-lost\n\
         signal focus-lost\n\
         signal focus-lost\n\
         signal focus-lost\n\
         signal context-menu\n",
    );

    ws.command(&script)
        .assert()
        .success()
        .stdout(predicate::str::contains("3 violation(s)"));
}

#[test]
fn backend_failure_surfaces_a_fetch_error() {
    let (_rt, server) = start_stub(ResponseTemplate::new(500).set_body_string("boom"));
    let ws = Workspace::new(&server.uri());
    let script = ws.write_script("submit\n");

    ws.command(&script)
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to generate test"));

    assert_eq!(ws.report_count(), 0);
}

#[test]
fn empty_question_payload_surfaces_a_fetch_error() {
    let (_rt, server) =
        start_stub(ResponseTemplate::new(200).set_body_json(candidate_body("[]")));
    let ws = Workspace::new(&server.uri());
    let script = ws.write_script("submit\n");

    ws.command(&script)
        .assert()
        .failure()
        .stderr(predicate::str::contains("no questions returned"));
}

#[test]
fn script_that_never_ends_the_session_is_an_error() {
    let (_rt, server) = start_stub(
        ResponseTemplate::new(200).set_body_json(candidate_body(&question_payload())),
    );
    let ws = Workspace::new(&server.uri());
    let script = ws.write_script("answer a\nnext\n");

    ws.command(&script)
        .assert()
        .failure()
        .stderr(predicate::str::contains("still in progress"));

    assert_eq!(ws.report_count(), 0);
}
