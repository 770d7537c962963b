use serde_json::Value as Json;
use tapetree::testing::*;
use tapetree::{ParseOptions, parse_str};

/// For any fixture and any thread count in [1, 16], the parallel parse must
/// produce a tree structurally equal to the sequential one, and both must
/// serialize to semantically equal JSON.
#[test]
fn thread_count_never_changes_the_tree() -> anyhow::Result<()> {
    for json in fixture_documents() {
        let sequential = parse_str(json, ParseOptions::default().threads(1))?;
        let baseline: Json = serde_json::from_str(&sequential.to_json())?;
        for threads in 2..=16 {
            let parallel = parse_str(json, ParseOptions::default().threads(threads))?;
            assert_documents_equal(&sequential, &parallel);
            let reparsed: Json = serde_json::from_str(&parallel.to_json())?;
            assert_eq!(baseline, reparsed, "semantic drift on {json} at T={threads}");
        }
    }
    Ok(())
}

/// The serialized output must stay semantically equal to the input text.
#[test]
fn serialization_matches_the_input_semantics() -> anyhow::Result<()> {
    for json in fixture_documents() {
        let doc = parse_str(json, ParseOptions::default().threads(3))?;
        let ours: Json = serde_json::from_str(&doc.to_json())?;
        let reference: Json = serde_json::from_str(json)?;
        assert_eq!(ours, reference, "drift from source on {json}");
    }
    Ok(())
}

/// A document wide enough to genuinely split across many workers.
#[test]
fn wide_object_splits_and_merges() -> anyhow::Result<()> {
    let mut json = String::from("{");
    for i in 0..500 {
        if i > 0 {
            json.push(',');
        }
        json.push_str(&format!(r#""key{i}":{{"idx":{i},"flag":true,"name":"v{i}"}}"#));
    }
    json.push('}');

    let sequential = parse_str(&json, ParseOptions::default().threads(1))?;
    for threads in [2, 4, 8, 16] {
        let parallel = parse_str(&json, ParseOptions::default().threads(threads))?;
        assert_documents_equal(&sequential, &parallel);
        assert_no_virtuals(parallel.arena(), parallel.root());
        assert_arena_accounted(&parallel);
    }
    Ok(())
}

/// Deep right-leaning documents force partials that end mid-structure.
#[test]
fn deep_array_nest_across_workers() -> anyhow::Result<()> {
    let depth = 200;
    let json = format!("{}42{}", "[".repeat(depth), "]".repeat(depth));
    let sequential = parse_str(&json, ParseOptions::default().threads(1))?;
    for threads in [2, 3, 5, 8, 13] {
        let parallel = parse_str(&json, ParseOptions::default().threads(threads))?;
        assert_documents_equal(&sequential, &parallel);
        assert_no_virtuals(parallel.arena(), parallel.root());
    }
    Ok(())
}
