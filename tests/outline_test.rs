//! Loading outline files into a registry

use std::fs;

use rstest::rstest;
use tempfile::TempDir;

use treemodel::application::{ApplicationError, Outline};
use treemodel::display::{DisplayOptions, TreeDisplay};
use treemodel::util::testing;
use treemodel::{NodeId, TreeModelRegistry};

const OUTLINE: &str = r#"
[[node]]
label = "src"
icon = "folder"

  [[node.children]]
  label = "main.rs"
  icon = "rust"

  [[node.children]]
  label = "lib.rs"
  icon = "rust"

[[node]]
label = "Cargo.toml"
"#;

fn write_outline(content: &str) -> (TempDir, std::path::PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("outline.toml");
    fs::write(&path, content).unwrap();
    (dir, path)
}

#[test]
fn given_outline_file_when_registering_then_models_and_ids_mirror_it() {
    testing::init_test_setup();
    let (_dir, path) = write_outline(OUTLINE);
    let outline = Outline::load(&path).unwrap();
    let reg = TreeModelRegistry::new();

    let top = outline.register(&reg).unwrap();

    assert_eq!(top.len(), 2);
    assert_eq!(reg.children_of(&NodeId::ROOT), top);
    assert_eq!(reg.len(), outline.count());
    let src_children = reg.children_of(&top[0]);
    assert_eq!(src_children.len(), 2);
    assert_eq!(
        reg.node_for_id(&src_children[1]).unwrap().display_label(),
        "lib.rs"
    );
    assert!(!reg.has_children(&top[1]));
}

#[test]
fn given_registered_outline_when_rendering_then_tree_text_matches() {
    let (_dir, path) = write_outline(OUTLINE);
    let reg = TreeModelRegistry::new();
    Outline::load(&path).unwrap().register(&reg).unwrap();

    let text = reg.to_tree_string(&DisplayOptions::default()).to_string();

    let expected = "\
.
├── [folder] src
│   ├── [rust] main.rs
│   └── [rust] lib.rs
└── Cargo.toml
";
    assert_eq!(text, expected);
}

#[test]
fn given_missing_file_when_loading_then_operation_failed() {
    let dir = TempDir::new().unwrap();
    let err = Outline::load(&dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, ApplicationError::OperationFailed { .. }));
}

#[rstest]
#[case::not_toml("this is = = nonsense")]
#[case::label_missing("[[node]]\nicon = \"x\"")]
#[case::wrong_type("node = 5")]
fn given_malformed_file_when_loading_then_outline_error(#[case] content: &str) {
    let (_dir, path) = write_outline(content);
    let err = Outline::load(&path).unwrap_err();
    match err {
        ApplicationError::Outline { path: origin, .. } => assert_eq!(origin, path),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn given_two_registrations_when_loading_same_outline_then_ids_differ() {
    let (_dir, path) = write_outline(OUTLINE);
    let outline = Outline::load(&path).unwrap();
    let reg = TreeModelRegistry::new();

    let first = outline.register(&reg).unwrap();
    let second = outline.register(&reg).unwrap();

    assert_eq!(reg.children_of(&NodeId::ROOT).len(), 4);
    assert!(first.iter().all(|id| !second.contains(id)));
    assert_eq!(reg.len(), 2 * outline.count());
}
