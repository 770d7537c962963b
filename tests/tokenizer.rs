use tapetree::{ParseError, Scalar, TapeKind, parse_scalar, tokenize};

fn expect_failure(input: &str) {
    match tokenize(input.as_bytes()) {
        Err(ParseError::TokenizerFailure { .. }) => {}
        other => panic!("expected TokenizerFailure for {input:?}, got {other:?}"),
    }
}

#[test]
fn malformed_documents_are_rejected() {
    for input in [
        "",
        "   ",
        "{",
        "[1,",
        "[1 2]",
        "{\"a\"}",
        "{\"a\":}",
        "{\"a\":1,}",
        "{'a':1}",
        "[,1]",
        "]",
        "tru",
        "nul",
        "falsely",
        "01",
        "1.",
        "1e",
        "-",
        "\"abc",
        "\"\\q\"",
        "\"\\u12\"",
        "\"\\ud800\"",
        "\"\\ud800\\u0041\"",
        "\"\\udc00\"",
        "[1]extra",
        "{}{}",
    ] {
        expect_failure(input);
    }
}

#[test]
fn failures_carry_a_byte_offset() {
    match tokenize(b"[1, x]") {
        Err(ParseError::TokenizerFailure { offset, .. }) => assert_eq!(offset, 4),
        other => panic!("expected TokenizerFailure, got {other:?}"),
    }
}

#[test]
fn numbers_classify_like_the_scanner() -> anyhow::Result<()> {
    assert_eq!(parse_scalar("42")?.scalar, Scalar::Int(42));
    assert_eq!(parse_scalar("-7")?.scalar, Scalar::Int(-7));
    assert_eq!(
        parse_scalar("9223372036854775807")?.scalar,
        Scalar::Int(i64::MAX)
    );
    assert_eq!(
        parse_scalar("9223372036854775808")?.scalar,
        Scalar::Uint(9223372036854775808)
    );
    assert_eq!(
        parse_scalar("18446744073709551615")?.scalar,
        Scalar::Uint(u64::MAX)
    );
    assert_eq!(parse_scalar("1.5")?.scalar, Scalar::Double(1.5));
    assert_eq!(parse_scalar("1e3")?.scalar, Scalar::Double(1000.0));
    assert_eq!(parse_scalar("-0.0")?.scalar, Scalar::Double(-0.0));
    // integers wider than 64 bits degrade to doubles
    assert_eq!(
        parse_scalar("18446744073709551616")?.scalar,
        Scalar::Double(18446744073709551616.0)
    );
    Ok(())
}

#[test]
fn escapes_decode_into_the_string_buffer() -> anyhow::Result<()> {
    assert_eq!(
        parse_scalar(r#""\u0041\t\r\b\f\/""#)?.scalar,
        Scalar::String("A\t\r\u{8}\u{c}/".to_string())
    );
    assert_eq!(
        parse_scalar(r#""\ud83d\ude00""#)?.scalar,
        Scalar::String("😀".to_string())
    );
    Ok(())
}

#[test]
fn keys_use_a_distinct_discriminant() -> anyhow::Result<()> {
    let tape = tokenize(br#"{"a":"b"}"#)?;
    // r { k " } r
    assert_eq!(tape.kind(2), Some(TapeKind::Key));
    assert_eq!(tape.kind(3), Some(TapeKind::String));
    let key = tape.decode(2);
    assert!(key.is_key);
    assert_eq!(key.scalar, Scalar::String("a".to_string()));
    let value = tape.decode(3);
    assert!(!value.is_key);
    Ok(())
}

#[test]
fn opener_payloads_carry_count_and_span() -> anyhow::Result<()> {
    let mut json = String::from("[");
    for i in 0..100 {
        if i > 0 {
            json.push(',');
        }
        json.push_str("true");
    }
    json.push(']');
    let tape = tokenize(json.as_bytes())?;
    assert_eq!(tape.count_hint(1), 100);
    let close = tape.len() - 2;
    assert_eq!(tape.matching_open(close), 1);
    assert_eq!(tape.payload(1) & u64::from(u32::MAX), (close + 1) as u64);
    Ok(())
}

#[test]
fn whitespace_is_insignificant() -> anyhow::Result<()> {
    let compact = tokenize(br#"{"a":[1,2]}"#)?;
    let spread = tokenize(b" {\t\"a\" :\r\n [ 1 , 2 ] } \n")?;
    assert_eq!(compact.len(), spread.len());
    for i in 0..compact.len() {
        assert_eq!(compact.kind(i), spread.kind(i), "kind differs at slot {i}");
    }
    Ok(())
}
