use std::path::PathBuf;

use learn_core::model::ModuleId;
use storage::{Bundle, BundleError};

fn fixture(name: &str) -> Bundle {
    Bundle::new(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name))
}

#[test]
fn loads_bundled_modules_in_file_order() {
    let modules = fixture("bundle").load_modules().expect("load modules");
    assert_eq!(modules.len(), 1);
    let module = &modules[0];
    assert_eq!(module.id, ModuleId::new(0));
    assert_eq!(module.lesson_count(), 2);
    assert_eq!(module.lessons()[0].title, "Moves");
    assert_eq!(module.question_count(), 2);
    assert_eq!(module.questions()[0].correct_index, 1);
}

#[test]
fn loads_style_header() {
    let style = fixture("bundle").load_style().expect("load style");
    assert!(style.starts_with("<style>"));
}

#[test]
fn malformed_feed_is_a_decode_error() {
    let err = fixture("broken").load_modules().unwrap_err();
    assert!(matches!(err, BundleError::Decode { .. }));
}

#[test]
fn missing_style_in_existing_bundle_is_missing() {
    let err = fixture("broken").load_style().unwrap_err();
    assert!(matches!(err, BundleError::Missing { .. }));
}
