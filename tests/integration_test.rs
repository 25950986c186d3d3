//! Integration tests for the full parse-and-split pipeline.

use fragmentize::{split_markup, DocumentTree, Fragment, SplitOptions};
use pretty_assertions::assert_eq;

fn fixture(name: &str) -> String {
    let path = format!("{}/tests/fixtures/{name}", env!("CARGO_MANIFEST_DIR"));
    std::fs::read_to_string(path).expect("fixture exists")
}

fn split_all(source: &str, max_len: usize) -> Vec<Fragment> {
    split_markup(source, SplitOptions::new(max_len))
        .expect("valid budget")
        .collect()
}

/// A fragment is well-formed when it parses back as markup on its own.
fn parses_clean(fragment: &Fragment) -> bool {
    DocumentTree::parse(&fragment.markup).is_ok()
}

#[test]
fn test_fixture_splits_within_budget() {
    let source = fixture("message.html");
    let max_len = 200;
    let fragments = split_all(&source, max_len);

    assert!(fragments.len() > 1, "fixture should need several fragments");
    for fragment in &fragments {
        assert!(
            fragment.len() <= max_len,
            "fragment of {} bytes exceeds the budget",
            fragment.len()
        );
        assert!(fragment.is_well_formed());
        assert!(parses_clean(fragment));
    }
}

#[test]
fn test_fixture_content_round_trips() {
    let source = fixture("message.html");
    let original = DocumentTree::parse(&source)
        .expect("fixture parses")
        .text_content();

    let mut reconstructed = String::new();
    for fragment in split_all(&source, 200) {
        let tree = DocumentTree::parse(&fragment.markup).expect("fragment parses");
        reconstructed.push_str(&tree.text_content());
    }

    assert_eq!(reconstructed, original);
}

#[test]
fn test_fixture_fragments_preserve_document_order() {
    let source = fixture("message.html");
    let fragments = split_all(&source, 250);

    let all_text: String = fragments
        .iter()
        .map(|f| {
            DocumentTree::parse(&f.markup)
                .expect("fragment parses")
                .text_content()
        })
        .collect();
    assert!(all_text.find("Dear subscriber").expect("first paragraph present")
        < all_text.find("Kind regards").expect("last paragraph present"));
}

#[test]
fn test_fixture_fits_whole_under_default_budget() {
    let source = fixture("message.html");
    let fragments = split_all(&source, 4096);
    assert_eq!(fragments.len(), 1);
    assert_eq!(fragments[0].markup, DocumentTree::parse(&source).expect("parses").serialize());
}

#[test]
fn test_truncated_container_is_reopened() {
    let fragments = split_all("<div><p>AAAA</p><p>BBBB</p></div>", 25);
    assert_eq!(fragments.len(), 2);
    assert_eq!(fragments[0].markup, "<div><p>AAAA</p></div>");
    assert_eq!(fragments[1].markup, "<div><p>BBBB</p></div>");
}

#[test]
fn test_oversized_unit_falls_back_to_raw_cuts() {
    let text = "x".repeat(10000);
    let source = format!("<span>{text}</span>");
    let fragments = split_all(&source, 4096);

    assert!(fragments.iter().all(|f| !f.is_well_formed()));
    assert!(fragments.iter().all(|f| f.len() <= 4096));
    let reassembled: String = fragments.iter().map(|f| f.markup.as_str()).collect();
    assert_eq!(reassembled, source);
}

#[test]
fn test_custom_block_tags() {
    use fragmentize::BlockTagRegistry;

    let source = "<section><p>AAAA</p><p>BBBB</p></section>";
    // section is not splittable by default, so the whole element is a unit
    let default_run = split_all(source, 31);
    assert!(default_run.iter().any(|f| !f.is_well_formed()));

    let registry: BlockTagRegistry = ["section", "p"].into_iter().collect();
    let options = SplitOptions::new(31).with_block_tags(registry);
    let custom_run: Vec<_> = split_markup(source, options)
        .expect("valid budget")
        .collect();
    assert!(custom_run.iter().all(Fragment::is_well_formed));
    assert_eq!(custom_run.len(), 2);
}
