//! End-to-end tests: USJ JSON in, texts stored in an on-disk project out

use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use usj_flex::bridge::{self, BridgeError, BridgeResponse, CreateTextRequest, ErrorCode};
use usj_flex::filter::{filter_document, FilterOptions};
use usj_flex::provider::{collect_chapters, BookProvider, ChapterRange};
use usj_flex::store::{
    DirectoryProject, ProjectManifest, ProjectRegistry, StoreError, TargetProject, FORMAT_VERSION,
};
use usj_flex::usj::{flatten_text, UsjDocument};

const GENESIS: &str = r#"{
  "type": "USJ",
  "version": "3.1",
  "content": [
    { "type": "book", "marker": "id", "code": "GEN", "content": [] },
    { "type": "para", "marker": "ip", "content": ["Genesis tells of beginnings."] },
    { "type": "chapter", "marker": "c", "number": "1", "sid": "GEN 1" },
    { "type": "para", "marker": "s1", "content": ["The Creation"] },
    { "type": "para", "marker": "r", "content": ["John 1:1-3"] },
    { "type": "para", "marker": "p", "content": [
      { "type": "verse", "marker": "v", "number": "1", "sid": "GEN 1:1" },
      "In the beginning God created the heavens and the earth.",
      { "type": "note", "marker": "f", "caller": "+", "content": [
        { "type": "char", "marker": "fr", "content": ["1:1 "] },
        { "type": "char", "marker": "ft", "content": ["Or when God began to create"] }
      ] },
      { "type": "verse", "marker": "v", "number": "2", "sid": "GEN 1:2" },
      "The earth was without form."
    ] },
    { "type": "para", "marker": "rem", "content": ["check verse 2"] },
    { "type": "chapter", "marker": "c", "number": "2", "sid": "GEN 2" },
    { "type": "para", "marker": "p", "content": [
      { "type": "verse", "marker": "v", "number": "1", "sid": "GEN 2:1" },
      "Thus the heavens and the earth were finished."
    ] }
  ]
}"#;

fn create_project(root: &Path, folder: &str, name: &str) -> DirectoryProject {
    DirectoryProject::create(&root.join(folder), ProjectManifest::new(name, "seh", "en")).unwrap()
}

fn genesis() -> UsjDocument {
    UsjDocument::from_json(GENESIS).unwrap()
}

fn request(title: &str, chapters: Vec<UsjDocument>, options: FilterOptions) -> CreateTextRequest {
    CreateTextRequest {
        title: title.to_string(),
        overwrite: false,
        vernacular_override: None,
        options,
        chapters,
        first_is_book_start: true,
    }
}

fn paragraph_texts(project: &DirectoryProject, id: uuid::Uuid) -> Vec<String> {
    project
        .read_text(id)
        .unwrap()
        .paragraphs
        .iter()
        .map(|p| p.text())
        .collect()
}

#[test]
fn test_create_text_with_default_options() {
    // Arrange
    let dir = TempDir::new().unwrap();
    let mut project = create_project(dir.path(), "sena", "Sena");

    // Act
    let created = bridge::create_text(
        &mut project,
        &request("Genesis", vec![genesis()], FilterOptions::default()),
    )
    .unwrap();

    // Assert: intro, reference paragraph, footnote and remark are gone
    assert_eq!(
        paragraph_texts(&project, created.text_id),
        vec![
            "\\id GEN ",
            "\\c 1 ",
            "\\s1 The Creation",
            "\\p \\v 1 In the beginning God created the heavens and the earth.\\v 2 The earth was without form.",
            "\\c 2 ",
            "\\p \\v 1 Thus the heavens and the earth were finished.",
        ]
    );
    assert_eq!(created.paragraph_count, 6);
}

#[test]
fn test_section_heading_marker_is_analysis_and_title_vernacular() {
    let dir = TempDir::new().unwrap();
    let mut project = create_project(dir.path(), "sena", "Sena");

    let created = bridge::create_text(
        &mut project,
        &request("Genesis", vec![genesis()], FilterOptions::default()),
    )
    .unwrap();

    let text = project.read_text(created.text_id).unwrap();
    let heading = &text.paragraphs[2];
    assert_eq!(heading.runs.len(), 2);
    assert_eq!((heading.runs[0].text.as_str(), heading.runs[0].ws.as_str()), ("\\s1 ", "en"));
    assert_eq!(
        (heading.runs[1].text.as_str(), heading.runs[1].ws.as_str()),
        ("The Creation", "seh")
    );
}

#[test]
fn test_reference_paragraph_is_entirely_analysis() {
    // Arrange
    let dir = TempDir::new().unwrap();
    let mut project = create_project(dir.path(), "sena", "Sena");
    let options = FilterOptions {
        include_cross_refs: true,
        ..FilterOptions::default()
    };

    // Act
    let created =
        bridge::create_text(&mut project, &request("Genesis", vec![genesis()], options)).unwrap();

    // Assert
    let text = project.read_text(created.text_id).unwrap();
    let reference = text
        .paragraphs
        .iter()
        .find(|p| p.text().starts_with("\\r "))
        .expect("reference paragraph kept");
    assert!(reference.runs.iter().all(|run| run.ws == "en"));
    assert_eq!(reference.text(), "\\r John 1:1-3");
}

#[test]
fn test_footnote_included() {
    let dir = TempDir::new().unwrap();
    let mut project = create_project(dir.path(), "sena", "Sena");
    let options = FilterOptions {
        include_footnotes: true,
        ..FilterOptions::default()
    };

    let created =
        bridge::create_text(&mut project, &request("Genesis", vec![genesis()], options)).unwrap();

    let text = project.read_text(created.text_id).unwrap();
    let verse_paragraph = &text.paragraphs[3];
    let runs: Vec<(&str, &str)> = verse_paragraph
        .runs
        .iter()
        .map(|r| (r.text.as_str(), r.ws.as_str()))
        .collect();
    assert!(runs.contains(&("Or when God began to create", "seh")));
    assert!(verse_paragraph.text().contains("\\f + \\fr 1:1 \\ft Or when God began to create\\f*"));
}

#[test]
fn test_vernacular_text_preserves_document_order() {
    // Arrange
    let dir = TempDir::new().unwrap();
    let mut project = create_project(dir.path(), "sena", "Sena");
    let doc = genesis();
    let options = FilterOptions::default();
    let expected = flatten_text(&filter_document(&doc, true, &options).content);

    // Act
    let created =
        bridge::create_text(&mut project, &request("Genesis", vec![doc], options)).unwrap();

    // Assert
    let text = project.read_text(created.text_id).unwrap();
    let vernacular: String = text
        .paragraphs
        .iter()
        .flat_map(|p| p.runs.iter())
        .filter(|run| run.ws == "seh")
        .map(|run| run.text.as_str())
        .collect();
    assert_eq!(vernacular, expected);
}

#[test]
fn test_all_runs_preserve_document_order() {
    // Arrange: keep every category so analysis text appears as well
    let dir = TempDir::new().unwrap();
    let mut project = create_project(dir.path(), "sena", "Sena");

    // Act
    let created = bridge::create_text(
        &mut project,
        &request("Genesis", vec![genesis()], FilterOptions::all()),
    )
    .unwrap();

    // Assert
    let text = project.read_text(created.text_id).unwrap();
    let concatenated: String = text
        .paragraphs
        .iter()
        .flat_map(|p| p.runs.iter())
        .map(|run| run.text.as_str())
        .collect();
    assert_eq!(
        concatenated,
        concat!(
            "\\id GEN ",
            "\\ip Genesis tells of beginnings.",
            "\\c 1 ",
            "\\s1 The Creation",
            "\\r John 1:1-3",
            "\\p \\v 1 In the beginning God created the heavens and the earth.",
            "\\f + \\fr 1:1 \\ft Or when God began to create\\f*",
            "\\v 2 The earth was without form.",
            "\\rem check verse 2",
            "\\c 2 ",
            "\\p \\v 1 Thus the heavens and the earth were finished.",
        )
    );
}

#[test]
fn test_chapter_range_from_book() {
    // Arrange: only chapter 2, so the intro is not subject to filtering
    let dir = TempDir::new().unwrap();
    let mut project = create_project(dir.path(), "sena", "Sena");
    let book = genesis();
    let provider = BookProvider::new(&book);
    let range: ChapterRange = "2-3".parse().unwrap();
    let chapters = collect_chapters(&provider, "GEN", range).unwrap();

    // Act
    let mut req = request("GEN 2-3", chapters, FilterOptions::default());
    req.first_is_book_start = range.starts_at_book_beginning();
    let created = bridge::create_text(&mut project, &req).unwrap();

    // Assert
    assert_eq!(
        paragraph_texts(&project, created.text_id),
        vec!["\\c 2 ", "\\p \\v 1 Thus the heavens and the earth were finished."]
    );
}

#[test]
fn test_zero_chapters_store_placeholder_paragraph() {
    let dir = TempDir::new().unwrap();
    let mut project = create_project(dir.path(), "sena", "Sena");

    let created = bridge::create_text(
        &mut project,
        &request("Empty", Vec::new(), FilterOptions::default()),
    )
    .unwrap();

    let text = project.read_text(created.text_id).unwrap();
    assert_eq!(text.paragraphs.len(), 1);
    assert_eq!(text.paragraphs[0].runs.len(), 1);
    assert_eq!(text.paragraphs[0].runs[0].text, "");
    assert_eq!(text.paragraphs[0].runs[0].ws, "seh");
}

#[test]
fn test_name_conflict_leaves_project_unchanged() {
    // Arrange
    let dir = TempDir::new().unwrap();
    let mut project = create_project(dir.path(), "sena", "Sena");
    let req = request("Genesis 1", vec![genesis()], FilterOptions::default());
    bridge::create_text(&mut project, &req).unwrap();
    let before = project.list_texts().unwrap();

    // Act
    let result = bridge::create_text(&mut project, &req);

    // Assert
    let error = result.unwrap_err();
    assert_eq!(error.code(), ErrorCode::TextNameConflict);
    assert_eq!(error.suggested_name(), Some("Genesis 1 (2)"));
    assert_eq!(project.list_texts().unwrap(), before);

    let json = serde_json::to_value(BridgeResponse::<()>::failure(&error)).unwrap();
    assert_eq!(json["success"], false);
    assert_eq!(json["errorCode"], "TEXT_NAME_CONFLICT");
    assert_eq!(json["suggestedName"], "Genesis 1 (2)");
}

#[test]
fn test_overwrite_replaces_text_on_disk() {
    // Arrange
    let dir = TempDir::new().unwrap();
    let mut project = create_project(dir.path(), "sena", "Sena");
    let mut req = request("Genesis 1", vec![genesis()], FilterOptions::default());
    let first = bridge::create_text(&mut project, &req).unwrap();

    // Act
    req.overwrite = true;
    req.options.include_remarks = true;
    let second = bridge::create_text(&mut project, &req).unwrap();

    // Assert
    assert!(second.overwritten);
    let texts = project.list_texts().unwrap();
    assert_eq!(texts.len(), 1);
    assert_eq!(texts[0].id, second.text_id);
    assert!(project.read_text(first.text_id).is_err());
    assert!(paragraph_texts(&project, second.text_id)
        .iter()
        .any(|p| p == "\\rem check verse 2"));
}

#[test]
fn test_texts_persist_across_reopen() {
    let dir = TempDir::new().unwrap();
    let mut project = create_project(dir.path(), "sena", "Sena");
    let created = bridge::create_text(
        &mut project,
        &request("Genesis", vec![genesis()], FilterOptions::default()),
    )
    .unwrap();
    drop(project);

    let reopened = DirectoryProject::open(&dir.path().join("sena")).unwrap();
    let verification = bridge::verify_text_by_id(&reopened, created.text_id).unwrap();

    assert!(verification.exists);
    assert_eq!(verification.text_name.as_deref(), Some("Genesis"));
}

#[test]
fn test_target_conditions_are_distinguishable() {
    // Arrange: one locked project, one needing migration
    let dir = TempDir::new().unwrap();
    create_project(dir.path(), "locked", "Locked");
    fs::write(dir.path().join("locked").join(".lock"), "").unwrap();
    create_project(dir.path(), "old", "Old");
    let mut manifest = ProjectManifest::new("Old", "seh", "en");
    manifest.format_version = FORMAT_VERSION + 1;
    manifest
        .save(dir.path().join("old").join("project.toml"))
        .unwrap();
    let registry = ProjectRegistry::new(dir.path());

    // Act
    let codes: Vec<ErrorCode> = ["Locked", "Old", "Missing"]
        .iter()
        .map(|name| BridgeError::from(registry.open(name).unwrap_err()).code())
        .collect();

    // Assert
    assert_eq!(
        codes,
        vec![
            ErrorCode::ProjectLocked,
            ErrorCode::MigrationRequired,
            ErrorCode::ProjectNotFound
        ]
    );
    let status = bridge::check_host_tool_status(&registry);
    assert!(status.running);
    assert_eq!(status.locked_projects, vec!["Locked".to_string()]);
}

#[test]
fn test_write_to_locked_project_fails_without_commit() {
    // Arrange: the host tool takes the lock after the project was opened
    let dir = TempDir::new().unwrap();
    let mut project = create_project(dir.path(), "sena", "Sena");
    fs::write(dir.path().join("sena").join(".lock"), "").unwrap();

    // Act
    let result = bridge::create_text(
        &mut project,
        &request("Genesis", vec![genesis()], FilterOptions::default()),
    );

    // Assert
    assert!(matches!(
        result,
        Err(BridgeError::Store(StoreError::ProjectLocked(_)))
    ));
    assert!(project.list_texts().unwrap().is_empty());
}

#[test]
fn test_list_projects_and_navigation() {
    let dir = TempDir::new().unwrap();
    let mut sena = create_project(dir.path(), "sena", "Sena");
    create_project(dir.path(), "chichewa", "Chichewa");
    let created = bridge::create_text(
        &mut sena,
        &request("Genesis", vec![genesis()], FilterOptions::default()),
    )
    .unwrap();
    let registry = ProjectRegistry::new(dir.path());

    let listing = bridge::list_projects(&registry);
    let target = bridge::get_safe_navigation_target(&sena, None).unwrap();

    let names: Vec<&str> = listing.projects.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Chichewa", "Sena"]);
    assert_eq!(target.text_id, Some(created.text_id));
}

#[test]
fn test_malformed_payload_is_input_error() {
    let not_json = UsjDocument::from_json("{ not json").unwrap_err();
    let not_usj = UsjDocument::from_json(r#"{"type": "USX", "content": []}"#).unwrap_err();

    assert_eq!(BridgeError::from(not_json).code(), ErrorCode::InvalidInput);
    assert_eq!(BridgeError::from(not_usj).code(), ErrorCode::InvalidInput);
}
