use flyght_core::{ElementLookup, PageDocument, Property};

const PAGE: &str = r#"
    [viewport]
    width = 1280
    height = 720

    [[element]]
    id = "introCounter"
    props = { opacity = 0.0 }

    [[element]]
    classes = ["intro-counter-num"]
    text = "00"

    [[element]]
    classes = ["flare", "flare--1"]

    [[element]]
    classes = ["flare", "flare--2"]

    [[element]]
    classes = ["title-letter"]
    repeat = 4
    bounds = { x = 0.0, y = 300.0, width = 80.0, height = 120.0 }
    props = { y = 60.0 }
"#;

#[test]
fn test_selector_lists_follow_document_order() {
    let store = PageDocument::from_toml(PAGE).unwrap().build_store().unwrap();

    let flares = store.select(".flare");
    assert_eq!(flares.len(), 2);
    assert_eq!(store.select_one(".flare--2"), Some(flares[1]));

    let mixed = store.select("#introCounter, .flare--1");
    assert_eq!(mixed.len(), 2);
    assert_eq!(mixed[0], store.select_one("introCounter").unwrap());

    assert!(store.select("#nope").is_empty());
    assert_eq!(store.select_one(".missing"), None);
}

#[test]
fn test_snapshot_reflects_writes_and_detach() {
    let mut store = PageDocument::from_toml(PAGE).unwrap().build_store().unwrap();
    let counter = store.select_one(".intro-counter-num").unwrap();
    store.set_text(counter, "42");
    store.set(counter, Property::custom("counter"), 42.0);

    let letters = store.select(".title-letter");
    store.detach(letters[0]);
    assert_eq!(store.select(".title-letter").len(), 3);

    let snapshot = store.snapshot();
    assert_eq!(snapshot.len(), 1 + 1 + 2 + 3);
    assert_eq!(snapshot[0].element_id.as_deref(), Some("introCounter"));
    assert_eq!(snapshot[1].text.as_deref(), Some("42"));
    assert_eq!(snapshot[1].properties.get("--counter"), Some(&42.0));
    assert_eq!(snapshot[4].properties.get("y"), Some(&60.0));
}
