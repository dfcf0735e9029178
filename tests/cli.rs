use assert_cmd::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

#[test]
fn converts_stdin_to_markdown_by_default() {
    let mut cmd = cargo_bin_cmd!("jira2md");
    cmd.write_stdin("*bold*");

    // println! adds a trailing newline.
    cmd.assert().success().stdout(predicate::eq("**bold**\n"));
}

#[test]
fn direction_flag_selects_markdown_to_wiki() {
    let mut cmd = cargo_bin_cmd!("jira2md");
    cmd.args(["-d", "md-to-wiki"]).write_stdin("**bold** and `code`");

    cmd.assert()
        .success()
        .stdout(predicate::eq("*bold* and {{code}}\n"));
}

#[test]
fn converts_file_arguments() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("issue.jira");
    fs::write(&path, "h1. Hi\n* item").unwrap();

    let mut cmd = cargo_bin_cmd!("jira2md");
    cmd.arg(&path);

    cmd.assert()
        .success()
        .stdout(predicate::eq("# Hi\n* item\n"));
}

#[test]
fn json_output_names_direction_and_source() {
    let mut cmd = cargo_bin_cmd!("jira2md");
    cmd.arg("--json").write_stdin("*b*");
    cmd.assert().success().stdout(predicate::eq(
        "{\"direction\":\"wiki-to-md\",\"output\":\"**b**\"}\n",
    ));

    let dir = tempdir().unwrap();
    let path = dir.path().join("a.md");
    fs::write(&path, "# T").unwrap();

    let mut cmd = cargo_bin_cmd!("jira2md");
    cmd.args(["--json", "-d", "md-to-wiki"]).arg(&path);
    cmd.assert().success().stdout(
        predicate::str::contains("\"direction\":\"md-to-wiki\"")
            .and(predicate::str::contains("\"source\":"))
            .and(predicate::str::contains("a.md"))
            .and(predicate::str::contains("\"output\":\"h1. T\"")),
    );
}

#[test]
fn html_directions_respect_break_flags() {
    let mut cmd = cargo_bin_cmd!("jira2md");
    cmd.args(["-d", "md-to-html"]).write_stdin("a\nb");
    cmd.assert()
        .success()
        .stdout(predicate::eq("<p>a<br />\nb</p>\n\n"));

    let mut cmd = cargo_bin_cmd!("jira2md");
    cmd.args(["-d", "md-to-html", "--no-hard-breaks"])
        .write_stdin("a\nb");
    cmd.assert().success().stdout(predicate::eq("<p>a\nb</p>\n\n"));

    let mut cmd = cargo_bin_cmd!("jira2md");
    cmd.args(["-d", "wiki-to-html"]).write_stdin("h3. Title");
    cmd.assert()
        .success()
        .stdout(predicate::eq("<h3>Title</h3>\n\n"));
}

#[test]
fn decode_entities_flag_unescapes_input() {
    let mut cmd = cargo_bin_cmd!("jira2md");
    cmd.args(["-d", "md-to-wiki", "--decode-entities"])
        .write_stdin("&lt;ins&gt;x&lt;/ins&gt;");
    cmd.assert().success().stdout(predicate::eq("+x+\n"));

    let mut cmd = cargo_bin_cmd!("jira2md");
    cmd.args(["-d", "md-to-wiki"])
        .write_stdin("&lt;ins&gt;x&lt;/ins&gt;");
    cmd.assert()
        .success()
        .stdout(predicate::eq("&lt;ins&gt;x&lt;/ins&gt;\n"));
}

#[test]
fn convert_all_mirrors_the_source_tree() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("wiki");
    let dst = dir.path().join("md");

    fs::create_dir_all(src.join("nested")).unwrap();
    fs::write(src.join("one.jira"), "*x*").unwrap();
    fs::write(src.join("nested").join("two.jira"), "bq. quoted").unwrap();
    fs::write(src.join("skip.md"), "not converted").unwrap();

    let mut cmd = cargo_bin_cmd!("jira2md");
    cmd.arg("--convert-all").arg(&src).arg(&dst);

    cmd.assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Done. Converted 2 files"));

    assert_eq!(fs::read_to_string(dst.join("one.md")).unwrap(), "**x**");
    assert_eq!(
        fs::read_to_string(dst.join("nested").join("two.md")).unwrap(),
        "> quoted"
    );
    assert!(!dst.join("skip.md").exists());
    assert!(!dst.join("skip.jira").exists());
}

#[test]
fn convert_all_uses_direction_extensions() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("md");
    let dst = dir.path().join("wiki");

    fs::create_dir_all(&src).unwrap();
    fs::write(src.join("page.md"), "## Sub").unwrap();
    fs::write(src.join("page.jira"), "ignored").unwrap();

    let mut cmd = cargo_bin_cmd!("jira2md");
    cmd.args(["-d", "md-to-wiki", "--convert-all"])
        .arg(&src)
        .arg(&dst);
    cmd.assert().success();

    assert_eq!(fs::read_to_string(dst.join("page.jira")).unwrap(), "h2. Sub");
    assert!(!dst.join("page.md").exists());
}

#[test]
fn convert_all_fails_on_missing_source() {
    let dir = tempdir().unwrap();

    let mut cmd = cargo_bin_cmd!("jira2md");
    cmd.arg("--convert-all")
        .arg(dir.path().join("nope"))
        .arg(dir.path().join("out"));

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Source directory not found"));
}

#[test]
fn missing_input_file_fails() {
    let dir = tempdir().unwrap();

    let mut cmd = cargo_bin_cmd!("jira2md");
    cmd.arg(dir.path().join("missing.jira"));

    cmd.assert().failure();
}

#[test]
fn convert_all_conflicts_with_file_arguments() {
    let dir = tempdir().unwrap();

    let mut cmd = cargo_bin_cmd!("jira2md");
    cmd.arg("--convert-all")
        .arg(dir.path())
        .arg(dir.path())
        .arg("extra.jira");

    cmd.assert().failure();
}
