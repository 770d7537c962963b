use tapetree::testing::*;
use tapetree::{NodeKind, ParseOptions, parse_str};

/// Parent links, virtual erasure, object alternation, and arena
/// bookkeeping must hold for every fixture at every thread count.
#[test]
fn parsed_documents_satisfy_all_invariants() -> anyhow::Result<()> {
    for json in fixture_documents() {
        for threads in [1, 2, 3, 4, 8, 16] {
            let doc = parse_str(json, ParseOptions::default().threads(threads))?;
            assert_parent_links(doc.arena(), doc.root());
            assert_no_virtuals(doc.arena(), doc.root());
            assert_arena_accounted(&doc);
            doc.structural_check()?;
            assert!(
                doc.arena().node(doc.root()).child_count() <= 1,
                "root grew more than one child on {json}"
            );
        }
    }
    Ok(())
}

/// Within flat objects (no container values), key items sit at even
/// indices and values at odd ones.
#[test]
fn flat_object_children_alternate() -> anyhow::Result<()> {
    let doc = parse_str(
        r#"{"a":1,"b":"two","c":true,"d":null,"e":2.5}"#,
        ParseOptions::default().threads(2),
    )?;
    let arena = doc.arena();
    let object = arena.node(doc.root()).children()[0];
    let children = arena.node(object).children();
    assert_eq!(children.len(), 10);
    for (i, &c) in children.iter().enumerate() {
        let node = arena.node(c);
        assert_eq!(node.kind(), NodeKind::Item);
        assert_eq!(
            node.value().is_key,
            i % 2 == 0,
            "alternation broke at index {i}"
        );
    }
    Ok(())
}

/// Children must appear in tape order no matter which worker built them.
#[test]
fn child_order_follows_the_tape() -> anyhow::Result<()> {
    let mut json = String::from("[");
    for i in 0..300 {
        if i > 0 {
            json.push(',');
        }
        json.push_str(&format!(r#"{{"k":"s{i}"}}"#));
    }
    json.push(']');

    for threads in [1, 4, 16] {
        let doc = parse_str(&json, ParseOptions::default().threads(threads))?;
        let arena = doc.arena();
        let array = arena.node(doc.root()).children()[0];
        assert_eq!(arena.node(array).child_count(), 300);
        for (i, &c) in arena.node(array).children().iter().enumerate() {
            let object = arena.node(c);
            assert_eq!(object.kind(), NodeKind::Object);
            let value = arena.node(object.children()[1]);
            let expected = format!("s{i}");
            assert_eq!(
                value.value().scalar.as_str(),
                Some(expected.as_str()),
                "order broke at {i} with {threads} threads"
            );
        }
    }
    Ok(())
}
