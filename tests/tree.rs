use tapetree::testing::*;
use tapetree::{NodeKind, ParseError, ParseOptions, Scalar, parse_str};

fn one_thread() -> ParseOptions {
    ParseOptions::default().threads(1)
}

#[test]
fn object_elements_append_as_key_value_pairs() -> anyhow::Result<()> {
    let mut doc = parse_str("{}", one_thread())?;
    let object = doc.arena().node(doc.root()).children()[0];
    let arena = doc.arena_mut();

    arena.add_object_element(object, "x", Scalar::Int(7))?;
    arena.add_object_element(object, "y", Scalar::String("v".into()))?;
    assert_eq!(arena.node(object).child_count(), 4);

    let key = arena.find(object, "y").expect("inserted key");
    assert!(arena.node(key).value().is_key_named("y"));
    assert!(doc.to_json().contains(r#""x" : 7"#));
    Ok(())
}

#[test]
fn array_elements_append_unkeyed() -> anyhow::Result<()> {
    let mut doc = parse_str("[]", one_thread())?;
    let array = doc.arena().node(doc.root()).children()[0];
    let arena = doc.arena_mut();

    arena.add_array_element(array, Scalar::Null)?;
    arena.add_array_element(array, Scalar::Double(0.5))?;
    assert_eq!(arena.node(array).child_count(), 2);
    assert!(doc.to_json().contains("0.500000"));
    Ok(())
}

#[test]
fn kind_contradictions_are_rejected() -> anyhow::Result<()> {
    let mut doc = parse_str(r#"[{}]"#, one_thread())?;
    let array = doc.arena().node(doc.root()).children()[0];
    let object = doc.arena().node(array).children()[0];
    let arena = doc.arena_mut();

    assert!(matches!(
        arena.add_object_element(array, "k", Scalar::Null),
        Err(ParseError::StructuralInvalidBoundary { .. })
    ));
    assert!(matches!(
        arena.add_array_element(object, Scalar::Null),
        Err(ParseError::StructuralInvalidBoundary { .. })
    ));
    assert!(matches!(
        arena.add_container(array, NodeKind::Object, Some("k")),
        Err(ParseError::StructuralInvalidBoundary { .. })
    ));
    assert!(matches!(
        arena.add_container(object, NodeKind::Array, None),
        Err(ParseError::StructuralInvalidBoundary { .. })
    ));
    Ok(())
}

#[test]
fn root_holds_at_most_one_child() -> anyhow::Result<()> {
    let mut doc = parse_str("{}", one_thread())?;
    let root = doc.root();
    let arena = doc.arena_mut();
    assert!(matches!(
        arena.add_array_element(root, Scalar::Null),
        Err(ParseError::StructuralInvalidBoundary { .. })
    ));
    Ok(())
}

#[test]
fn containers_grow_nested_structure() -> anyhow::Result<()> {
    let mut doc = parse_str("{}", one_thread())?;
    let object = doc.arena().node(doc.root()).children()[0];
    let arena = doc.arena_mut();

    let inner = arena.add_container(object, NodeKind::Array, Some("items"))?;
    arena.add_array_element(inner, Scalar::Int(1))?;
    arena.add_array_element(inner, Scalar::Int(2))?;
    assert_eq!(arena.node(inner).parent(), Some(object));

    let json = doc.to_json();
    assert!(json.contains(r#""items" : [ 1, 2 ]"#), "got {json}");
    doc.structural_check()?;
    Ok(())
}

#[test]
fn remove_at_frees_the_subtree() -> anyhow::Result<()> {
    let mut doc = parse_str(r#"[[1,2,3],true]"#, one_thread())?;
    let array = doc.arena().node(doc.root()).children()[0];
    let arena = doc.arena_mut();

    let freed_before = arena.free_list_len();
    arena.remove_at(array, 0);
    assert_eq!(arena.node(array).child_count(), 1);
    // the inner array plus its three items came back to the pool
    assert_eq!(arena.free_list_len(), freed_before + 4);
    Ok(())
}

#[test]
fn clone_subtree_detaches_a_deep_copy() -> anyhow::Result<()> {
    let mut doc = parse_str(r#"{"a":[1,{"b":null}]}"#, one_thread())?;
    let original = doc.arena().node(doc.root()).children()[0];
    let arena = doc.arena_mut();

    let copy = arena.clone_subtree(original);
    assert_eq!(arena.node(copy).parent(), None);
    assert_ne!(copy, original);
    assert!(trees_equal(arena, copy, arena, original));
    Ok(())
}

#[test]
fn reserve_presizes_child_storage() -> anyhow::Result<()> {
    let mut doc = parse_str("{}", one_thread())?;
    let object = doc.arena().node(doc.root()).children()[0];
    let arena = doc.arena_mut();
    arena.reserve(object, 8);
    for i in 0..8i64 {
        arena.add_object_element(object, &format!("k{i}"), Scalar::Int(i))?;
    }
    assert_eq!(arena.node(object).child_count(), 16);
    Ok(())
}

#[test]
fn structural_check_passes_on_wellformed_trees() -> anyhow::Result<()> {
    for json in fixture_documents() {
        let doc = parse_str(json, one_thread())?;
        doc.structural_check()?;
    }
    Ok(())
}
