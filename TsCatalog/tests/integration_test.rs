use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::path::PathBuf;
use tempfile::tempdir;
use tscatalog::prelude::*;

const EDITOR: &str = "Core::EditorManager";
const OUTLINE: &str = "QmlJSEditor::Internal::QmlJSOutlineWidget";
const WELCOME: &str = "Welcome::Internal::LegacyPage";

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data/ide_cs.ts")
}

fn fixture() -> Catalog {
    read_ts(fixture_path()).unwrap()
}

#[test]
fn test_fixture_statistics() {
    let catalog = fixture();
    assert_eq!(catalog.language.as_deref(), Some("cs_CZ"));
    assert_eq!(catalog.source_language.as_deref(), Some("en"));
    assert_eq!(catalog.plural_rule(), PluralRule::Czech);

    let stats = catalog.statistics();
    assert_eq!(
        stats,
        CatalogStats {
            contexts: 3,
            finished: 7,
            unfinished: 3,
            obsolete: 2,
            vanished: 1,
        }
    );
}

#[test]
fn test_context_order_is_kept() {
    let catalog = fixture();
    let names: Vec<_> = catalog.store().contexts().map(|c| c.name()).collect();
    assert_eq!(names, vec![EDITOR, OUTLINE, WELCOME]);
}

#[test]
fn test_obsolete_message_is_not_found() {
    let catalog = fixture();
    let translator = catalog.translator();
    assert_eq!(
        translator.translate(EDITOR, "Foo", None, None),
        LookupResult::NotFound
    );
    assert_eq!(
        translator.translate(WELCOME, "Tutorials", None, None),
        LookupResult::NotFound
    );
    assert_eq!(catalog.store().suggestions(EDITOR, "Foo", None).len(), 1);
}

#[test]
fn test_plural_lookup() {
    let catalog = fixture();
    let translator = catalog.translator();
    let lookup = |n| {
        translator
            .translate(OUTLINE, "%n lines filtered", None, Some(n))
            .text()
    };
    assert_eq!(lookup(1), Some("%n řádek odfiltrován"));
    assert_eq!(lookup(3), Some("%n řádky odfiltrovány"));
    assert_eq!(lookup(11), Some("%n řádků odfiltrováno"));

    assert_eq!(
        translator.translate(OUTLINE, "%n errors", None, Some(1)),
        LookupResult::FoundPartial("%n chyba")
    );
    assert_eq!(
        translator.translate(OUTLINE, "%n errors", None, Some(7)),
        LookupResult::NotApplicablePlural {
            fallback: Some("%n chyba")
        }
    );
}

#[test]
fn test_comment_disambiguation_and_fallback() {
    let catalog = fixture();
    let translator = catalog.translator();
    assert_eq!(
        translator.translate(EDITOR, "Open", Some("verb, file menu"), None),
        LookupResult::Found("Otevřít")
    );
    assert_eq!(
        translator.translate(EDITOR, "Open", Some("adjective, document state"), None),
        LookupResult::Found("Otevřený")
    );
    // No comment-less "Open" exists, so an unknown comment finds nothing
    assert_eq!(
        translator.translate(EDITOR, "Open", Some("toolbar"), None),
        LookupResult::NotFound
    );
    assert_eq!(
        translator.translate(EDITOR, "&Save", Some("toolbar"), None),
        LookupResult::Found("&Uložit")
    );
}

#[test]
fn test_fixture_details() {
    let catalog = fixture();
    let revert = catalog.store().get(EDITOR, "Revert to Saved", None).unwrap();
    assert_eq!(revert.status, Status::Unfinished);
    assert_eq!(revert.extra_comment.as_deref(), Some("Menu entry in the File menu"));
    assert_eq!(
        revert.translator_comment.as_deref(),
        Some("Check length against the toolbar")
    );

    let save = catalog.store().get(EDITOR, "&Save", None).unwrap();
    assert_eq!(save.locations[0].line.as_deref(), Some("412"));

    assert_eq!(
        catalog.translate(OUTLINE, "Escape:\u{1b}", None, None),
        LookupResult::Found("Únik:\u{1b}")
    );
}

#[test]
fn test_round_trip() {
    let catalog = fixture();
    let first = serialize_ts(&catalog).unwrap();
    let reparsed = parse_ts(&first).unwrap();
    assert_eq!(reparsed, catalog);

    let second = serialize_ts(&reparsed).unwrap();
    assert_eq!(String::from_utf8(second).unwrap(), String::from_utf8(first).unwrap());
}

#[test]
fn test_unknown_content_survives() {
    let catalog = fixture();
    let output = String::from_utf8(serialize_ts(&catalog).unwrap()).unwrap();
    assert!(output.contains("<!-- Czech translation of the IDE -->"));
    assert!(output.contains("x-reviewed=\"2024-03-01\""));
    assert!(output.contains("<extra-po-flags>no-wrap</extra-po-flags>"));

    let split = catalog.store().get(EDITOR, "Split", None).unwrap();
    assert_eq!(
        split.extra_attributes,
        vec![RawAttribute::new("x-reviewed", "2024-03-01")]
    );
}

#[test]
fn test_validate_fixture() {
    let catalog = fixture();
    let issues = validate(&catalog);
    let summary: Vec<_> = issues
        .iter()
        .map(|i| (i.severity, i.kind, i.context.as_str()))
        .collect();
    assert_eq!(
        summary,
        vec![
            (Severity::Warning, IssueKind::DeadContext, WELCOME),
            (Severity::Info, IssueKind::OrphanedObsolete, WELCOME),
        ]
    );
}

#[test]
fn test_lifecycle_flow() {
    let mut catalog = fixture();
    let store = catalog.store_mut();

    // Finish a pending translation
    store
        .set_status(EDITOR, "Revert to Saved", None, Status::Finished)
        .unwrap();
    // Retire an obsolete message for good
    store.set_status(EDITOR, "Foo", None, Status::Vanished).unwrap();
    // Nothing comes back from vanished
    let err = store
        .set_status(EDITOR, "Foo", None, Status::Unfinished)
        .unwrap_err();
    assert!(matches!(err, Error::InvalidTransition { .. }));

    // Upstream dropped everything in the outline widget
    let summary = store.retire_absent(|context, _| context != OUTLINE);
    assert_eq!(summary.obsoleted, 2);
    assert_eq!(summary.vanished, 1);

    assert_eq!(
        catalog.translate(EDITOR, "Revert to Saved", None, None),
        LookupResult::Found("Vrátit k uloženému")
    );
    assert_eq!(
        catalog.translate(OUTLINE, "%n lines filtered", None, Some(1)),
        LookupResult::NotFound
    );

    // Status changes survive a round trip
    let reparsed = parse_ts(&serialize_ts(&catalog).unwrap()).unwrap();
    assert_eq!(reparsed, catalog);
}

#[test]
fn test_compaction() {
    let mut catalog = fixture();
    let store = catalog.store_mut();
    assert_eq!(store.remove_vanished(), 1);
    assert_eq!(store.remove_obsolete(), 2);
    store.compact();
    assert_eq!(store.context_count(), 2);
    assert_eq!(catalog.statistics().obsolete, 0);
    assert!(validate(&catalog).is_empty());
}

#[test]
fn test_concurrent_lookups() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Catalog>();

    let catalog = fixture();
    let translator = catalog.translator();
    std::thread::scope(|scope| {
        for n in 0..8u64 {
            scope.spawn(move || {
                let text = translator
                    .translate(OUTLINE, "%n lines filtered", None, Some(n))
                    .text();
                let expected = ["%n řádek odfiltrován", "%n řádky odfiltrovány", "%n řádků odfiltrováno"]
                    [PluralRule::Czech.select(n)];
                assert_eq!(text, Some(expected));
            });
        }
    });
}

#[test]
fn test_write_and_batch_check() {
    let dir = tempdir().unwrap();
    let nested = dir.path().join("translations");
    std::fs::create_dir_all(&nested).unwrap();

    write_ts(&fixture(), nested.join("ide_cs.ts")).unwrap();
    std::fs::write(nested.join("broken_de.ts"), "<TS version=\"2.1\"><context>").unwrap();

    let files = find_ts_files(dir.path());
    assert_eq!(files.len(), 2);

    let result = check_files(&files, |_| {});
    assert_eq!(result.checked.len(), 1);
    assert_eq!(result.checked[0].language.as_deref(), Some("cs_CZ"));
    assert_eq!(result.checked[0].stats.finished, 7);
    assert_eq!(result.failures.len(), 1);
    assert!(result.failures[0].0.ends_with("broken_de.ts"));
}

#[test]
fn test_duplicate_active_message_is_rejected() {
    let err = parse_ts(
        r#"<TS version="2.1" language="cs_CZ"><context><name>C</name>
<message><source>Open</source><translation>Otevřít</translation></message>
<message><source>Open</source><comment></comment><translation>Otevřít</translation></message>
</context></TS>"#
            .as_bytes(),
    )
    .unwrap_err();
    assert!(matches!(err, ParseError::DuplicateKey(_)));
}

#[test]
fn test_plural_mismatch_is_reported_on_parse() {
    let parsed = parse_ts_with_issues(
        br#"<TS version="2.1" language="cs_CZ"><context><name>C</name>
<message numerus="yes"><source>%n files</source><translation>
<numerusform>soubor</numerusform><numerusform>soubory</numerusform>
</translation></message>
</context></TS>"#,
    )
    .unwrap();
    assert_eq!(parsed.issues.len(), 1);
    assert_eq!(parsed.issues[0].kind, IssueKind::PluralMismatch);
    // Lookup past the supplied slots falls back to the highest one
    assert_eq!(
        parsed.catalog.translate("C", "%n files", None, Some(5)),
        LookupResult::NotApplicablePlural {
            fallback: Some("soubory")
        }
    );
}

proptest! {
    #[test]
    fn prop_text_round_trips(
        context in "[A-Za-z:]{1,12}",
        source in "[a-zA-Z0-9 äöů<>&\"'%\t\n\u{7}\u{1b}]{0,24}",
        translation in "[a-zA-Z0-9 äöů<>&\"'%\t\n\u{7}\u{1b}]{1,24}",
        comment in proptest::option::of("[a-z ]{1,8}"),
    ) {
        let mut message = Message::new(source).translated(translation);
        message.comment = comment;
        let mut catalog = Catalog::new("de_DE");
        catalog.insert(&context, message).unwrap();

        let reparsed = parse_ts(&serialize_ts(&catalog).unwrap()).unwrap();
        prop_assert_eq!(reparsed, catalog);
    }
}
