use goscan::extract::walk_declarations;
use goscan::{GoSource, Primitive, PrimitiveKind, TagSet, Value, decode_literal};
use proptest::prelude::*;

fn decode_one<T: Primitive>(literal: &str) -> Option<T> {
    let src = GoSource::parse(format!("package p\n\nvar (\n\t// v\n\tx = {literal}\n)\n")).unwrap();
    src.scalar_values::<T>(&TagSet::from(["v"]))
        .into_iter()
        .next()
        .map(|r| r.value)
}

/// Decodes `literal` with the kind chosen at run time.
fn decode_kind(literal: &str, kind: PrimitiveKind) -> Option<Value> {
    let src = GoSource::parse(format!("package p\n\nvar (\n\t// v\n\tx = {literal}\n)\n")).unwrap();
    walk_declarations(src.tree(), &TagSet::from(["v"]), |tree, expr| decode_literal(tree, expr, kind))
        .into_iter()
        .next()
        .map(|r| r.value)
}

proptest! {
    #[test]
    fn u64_literals_decode_exactly(n in any::<u64>()) {
        prop_assert_eq!(decode_one::<u64>(&n.to_string()), Some(n));
    }

    #[test]
    fn narrow_kinds_follow_range(n in any::<u32>()) {
        let text = n.to_string();
        prop_assert_eq!(decode_one::<u8>(&text), u8::try_from(n).ok());
        prop_assert_eq!(decode_one::<i16>(&text), i16::try_from(n).ok());
        prop_assert_eq!(decode_one::<i32>(&text), i32::try_from(n).ok());
    }
}

#[test]
fn boundaries() {
    assert_eq!(decode_one::<i8>("127"), Some(127));
    assert_eq!(decode_one::<i8>("128"), None);
    assert_eq!(decode_one::<u64>("18446744073709551615"), Some(u64::MAX));
    assert_eq!(decode_one::<u64>("18446744073709551616"), None);
    // Negative values are unary expressions, never literals.
    assert_eq!(decode_one::<i64>("-1"), None);
}

#[test]
fn prefixed_and_separated_integers_do_not_decode() {
    for text in ["0x10", "0o17", "0b1", "1_000"] {
        assert_eq!(decode_one::<i64>(text), None, "literal {text}");
    }
}

#[test]
fn every_width_accepts_max_and_rejects_one_more() {
    let table = [
        (PrimitiveKind::I8, "127", "128", Value::I8(i8::MAX)),
        (PrimitiveKind::I16, "32767", "32768", Value::I16(i16::MAX)),
        (PrimitiveKind::I32, "2147483647", "2147483648", Value::I32(i32::MAX)),
        (PrimitiveKind::I64, "9223372036854775807", "9223372036854775808", Value::I64(i64::MAX)),
        (PrimitiveKind::U8, "255", "256", Value::U8(u8::MAX)),
        (PrimitiveKind::U16, "65535", "65536", Value::U16(u16::MAX)),
        (PrimitiveKind::U32, "4294967295", "4294967296", Value::U32(u32::MAX)),
        (PrimitiveKind::U64, "18446744073709551615", "18446744073709551616", Value::U64(u64::MAX)),
    ];
    assert_eq!(table.len(), PrimitiveKind::ALL.iter().filter(|k| k.is_integer()).count());

    for (kind, max, over, expected) in table {
        assert_eq!(decode_kind(max, kind), Some(expected), "{kind} {max}");
        assert_eq!(decode_kind(over, kind), None, "{kind} {over}");
        assert_eq!(decode_kind("0", kind).map(|v| v.kind()), Some(kind), "{kind} 0");
    }
}

#[test]
fn each_kind_decodes_only_its_own_literal_category() {
    for kind in PrimitiveKind::ALL {
        let string = decode_kind(r#""s""#, kind);
        let int = decode_kind("7", kind);
        let float = decode_kind("1.5", kind);

        assert_eq!(string.is_some(), kind == PrimitiveKind::String, "{kind} from \"s\"");
        assert_eq!(int.is_some(), kind.is_integer(), "{kind} from 7");
        assert_eq!(float.is_some(), kind.is_float(), "{kind} from 1.5");
        for value in [string, int, float].into_iter().flatten() {
            assert_eq!(value.kind(), kind);
        }
    }
}

#[test]
fn kind_mismatches() {
    assert_eq!(decode_one::<i64>("1.0"), None);
    assert_eq!(decode_one::<f64>("1"), None);
    assert_eq!(decode_one::<String>("'a'"), None);
    assert_eq!(decode_one::<bool>("1"), None);
    assert_eq!(decode_one::<bool>("true"), Some(true));
    assert_eq!(decode_one::<bool>("T"), Some(true));
}
