//! Integration tests for the structuring engine.

use std::sync::Arc;
use std::thread;

use serde_json::json;

use doctree::util::testing;
use doctree::{prune, LevelDefinition, LevelHierarchy, StructureError};

const LEGAL_TEXT: &str = "BOOK ONE
TITLE A
ARTICLE 1. First clause.
ARTICLE 2. Second clause.
TITLE B
ARTICLE 3. Third clause.";

fn legal_hierarchy() -> LevelHierarchy {
    LevelHierarchy::from_levels(vec![
        LevelDefinition::new("book", r"BOOK\s+(.+)", "title").with_sections("titles"),
        LevelDefinition::new("title", r"TITLE\s+(.+)", "title")
            .with_description("description")
            .with_paragraphs("articles")
            .with_parent("book"),
        LevelDefinition::new("article", r"(ARTICLE\s+\d+)\.\s*(.*)", "title")
            .with_description("content")
            .with_parent("title"),
    ])
    .unwrap()
}

// ============================================================
// Well-formed input
// ============================================================

#[test]
fn given_three_level_document_when_pruning_then_articles_nest_under_titles() {
    testing::init_test_setup();

    // Act
    let tree = prune(&legal_hierarchy(), LEGAL_TEXT).unwrap();

    // Assert
    assert_eq!(tree.sections().len(), 1);
    let book = &tree.sections()[0];
    assert_eq!(book.title(), "ONE");
    assert_eq!(book.sections().len(), 2);

    let title_a = &book.sections()[0];
    let articles: Vec<(&str, Option<&str>)> = title_a
        .paragraph_nodes()
        .map(|a| (a.title(), a.description()))
        .collect();
    assert_eq!(
        articles,
        vec![
            ("ARTICLE 1", Some("First clause.")),
            ("ARTICLE 2", Some("Second clause.")),
        ]
    );

    let title_b = &book.sections()[1];
    let titles: Vec<&str> = title_b.paragraph_nodes().map(|a| a.title()).collect();
    assert_eq!(titles, vec!["ARTICLE 3"]);
}

#[test]
fn given_three_level_document_when_serializing_then_only_declared_fields_appear() {
    let tree = prune(&legal_hierarchy(), LEGAL_TEXT).unwrap();

    let value = serde_json::to_value(&tree).unwrap();

    assert_eq!(
        value,
        json!({
            "title": "",
            "description": "",
            "sections": [{
                "title": "ONE",
                "titles": [
                    {
                        "title": "A",
                        "description": "",
                        "articles": [
                            { "title": "ARTICLE 1", "content": "First clause." },
                            { "title": "ARTICLE 2", "content": "Second clause." }
                        ]
                    },
                    {
                        "title": "B",
                        "description": "",
                        "articles": [
                            { "title": "ARTICLE 3", "content": "Third clause." }
                        ]
                    }
                ]
            }]
        })
    );
}

#[test]
fn given_free_text_after_title_when_pruning_then_appends_to_title_description() {
    let text = "BOOK ONE\nTITLE A\nGeneral provisions\nfor persons.\nARTICLE 1. First clause.";

    let tree = prune(&legal_hierarchy(), text).unwrap();

    let book = &tree.sections()[0];
    assert_eq!(
        book.sections()[0].description(),
        Some("General provisions for persons.")
    );
    assert_eq!(book.description(), None);
    assert_eq!(tree.description(), "");
}

#[test]
fn given_free_text_after_article_when_pruning_then_extends_article_content() {
    let text = "BOOK ONE\nTITLE A\nARTICLE 1. First clause\ncontinues here.";

    let tree = prune(&legal_hierarchy(), text).unwrap();

    let article = tree.sections()[0].sections()[0]
        .paragraph_nodes()
        .next()
        .unwrap();
    assert_eq!(article.description(), Some("First clause continues here."));
}

#[test]
fn given_blank_lines_between_headings_when_pruning_then_structure_is_unchanged() {
    let spaced = LEGAL_TEXT.replace('\n', "\n\n   \n");

    let compact = prune(&legal_hierarchy(), LEGAL_TEXT).unwrap();
    let with_blanks = prune(&legal_hierarchy(), &spaced).unwrap();

    assert_eq!(compact, with_blanks);
}

#[test]
fn given_heading_of_shallower_rank_when_pruning_then_deeper_nodes_are_closed() {
    // TITLE B must not nest below TITLE A's last article
    let tree = prune(&legal_hierarchy(), LEGAL_TEXT).unwrap();

    let book = &tree.sections()[0];
    assert!(book
        .sections()
        .iter()
        .all(|title| title.level() == "title"));
    assert_eq!(tree.node_count(), 6);
    assert_eq!(tree.depth(), 3);
}

#[test]
fn given_article_before_any_book_when_pruning_then_attaches_to_root() {
    let tree = prune(&legal_hierarchy(), "ARTICLE 9. Stray clause.\nBOOK ONE").unwrap();

    let levels: Vec<&str> = tree.sections().iter().map(|n| n.level()).collect();
    assert_eq!(levels, vec!["article", "book"]);
}

#[test]
fn given_indented_lines_when_pruning_then_lines_are_trimmed_before_matching() {
    let tree = prune(&legal_hierarchy(), "   BOOK ONE  \n\tTITLE A").unwrap();

    assert_eq!(tree.sections()[0].title(), "ONE");
    assert_eq!(tree.sections()[0].sections()[0].title(), "A");
}

#[test]
fn given_shared_hierarchy_when_pruning_from_threads_then_results_match() {
    let hierarchy = Arc::new(legal_hierarchy());
    let expected = prune(&hierarchy, LEGAL_TEXT).unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let hierarchy = Arc::clone(&hierarchy);
            thread::spawn(move || prune(&hierarchy, LEGAL_TEXT).unwrap())
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}

#[test]
fn given_carriage_return_line_endings_when_pruning_then_lines_split_like_newlines() {
    let unix = prune(&legal_hierarchy(), LEGAL_TEXT).unwrap();

    let old_mac = prune(&legal_hierarchy(), &LEGAL_TEXT.replace('\n', "\r")).unwrap();
    let windows = prune(&legal_hierarchy(), &LEGAL_TEXT.replace('\n', "\r\n")).unwrap();

    assert_eq!(old_mac, unix);
    assert_eq!(windows, unix);
}

// ============================================================
// Structuring errors
// ============================================================

#[test]
fn given_empty_text_when_pruning_then_empty_input() {
    assert_eq!(
        prune(&legal_hierarchy(), "").unwrap_err(),
        StructureError::EmptyInput
    );
}

#[test]
fn given_whitespace_only_text_when_pruning_then_empty_input() {
    assert_eq!(
        prune(&legal_hierarchy(), "   \n  ").unwrap_err(),
        StructureError::EmptyInput
    );
}

#[test]
fn given_deepest_level_without_content_fields_when_free_text_then_unroutable_with_line() {
    // Arrange: "item" declares neither description nor paragraph field
    let hierarchy = LevelHierarchy::from_levels(vec![
        LevelDefinition::new("part", r"PART\s+(\d+)", "title").with_description("text"),
        LevelDefinition::new("item", r"ITEM\s+(\d+)", "title").with_parent("part"),
    ])
    .unwrap();
    let text = "PART 1\nintro\n\nITEM 1\nstray text";

    // Act
    let err = prune(&hierarchy, text).unwrap_err();

    // Assert
    assert_eq!(
        err,
        StructureError::UnroutableText {
            line: 5,
            level: "item".to_string()
        }
    );
    assert!(err.to_string().contains("line 5"), "got: {err}");
}

#[test]
fn given_crlf_text_when_unroutable_then_line_number_counts_each_line_once() {
    let hierarchy = LevelHierarchy::from_levels(vec![
        LevelDefinition::new("part", r"PART\s+(\d+)", "title").with_description("text"),
        LevelDefinition::new("item", r"ITEM\s+(\d+)", "title").with_parent("part"),
    ])
    .unwrap();

    let err = prune(&hierarchy, "PART 1\r\n\r\nITEM 1\r\nstray text").unwrap_err();

    assert_eq!(
        err,
        StructureError::UnroutableText {
            line: 4,
            level: "item".to_string()
        }
    );
}
