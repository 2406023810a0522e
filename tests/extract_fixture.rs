use goscan::{GoSource, Record, TagSet};

const FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/tagged.go");

fn source() -> GoSource {
    GoSource::open(FIXTURE).unwrap()
}

fn names<V>(records: &[Record<V>]) -> Vec<&str> {
    records.iter().map(|r| r.name.as_str()).collect()
}

#[test]
fn bool_scalar() {
    let got = source().scalar_values::<bool>(&TagSet::from(["parser"]));
    assert_eq!(
        got,
        vec![Record {
            tag: "parser".to_owned(),
            name: "boolValue".to_owned(),
            value: true,
        }]
    );
}

#[test]
fn string_scalar_across_tags() {
    let got = source().scalar_values::<String>(&TagSet::from(["parser", "parser:str"]));
    assert_eq!(names(&got), ["stringValue"]);
    assert_eq!(got[0].tag, "parser:str");
    assert_eq!(got[0].value, "3");
}

#[test]
fn numeric_scalars() {
    let src = source();
    let tags = TagSet::from(["parser"]);

    let ints = src.scalar_values::<i64>(&tags);
    assert_eq!(names(&ints), ["intValue", "retries"]);
    assert_eq!(ints[0].value, 3);

    let floats = src.scalar_values::<f64>(&tags);
    assert_eq!(names(&floats), ["float64Value"]);
    assert_eq!(floats[0].value, 3.14);

    // Conversions and constant references are not literals.
    let narrow = src.scalar_values::<f32>(&tags);
    assert_eq!(names(&narrow), ["float64Value"]);
    assert_eq!(narrow[0].value, 3.14f32);

    let bytes = src.scalar_values::<u8>(&tags);
    assert_eq!(names(&bytes), ["intValue", "retries"]);
}

#[test]
fn single_declaration_is_not_tagged() {
    let ints = source().scalar_values::<i64>(&TagSet::from(["parser"]));
    assert!(ints.iter().all(|r| r.name != "loneValue"));
}

#[test]
fn float_sequence() {
    let got = source().sequence_values::<f64>(&TagSet::from(["parser"]));
    assert_eq!(names(&got), ["float64SliceValue"]);
    assert_eq!(got[0].value, vec![3.14, 0.42]);
}

#[test]
fn string_sequence() {
    let got = source().sequence_values::<String>(&TagSet::from(["parser:str"]));
    assert_eq!(names(&got), ["stringSliceValue"]);
    assert_eq!(got[0].value, ["a", "b", "c"]);
}

#[test]
fn int_to_float_mapping() {
    let got = source().mapping_values::<i64, f64>(&TagSet::from(["parser"]));
    assert_eq!(names(&got), ["intToFloat64MapValue"]);
    let pairs: Vec<_> = got[0].value.iter().map(|(&k, &v)| (k, v)).collect();
    assert_eq!(pairs, [(3, 3.14), (17, 42.0)]);
}

#[test]
fn string_mapping() {
    let got = source().mapping_values::<String, String>(&TagSet::from(["parser:str"]));
    assert_eq!(names(&got), ["stringToStringMapValue"]);
    assert_eq!(got[0].value["b"], "2");
}

#[test]
fn methods_by_receiver_and_params() {
    let src = source();
    assert_eq!(
        src.function_names("LocalStruct", &["Context", "string"]),
        ["usefulFunc1", "usefulFunc2", "usefulFunc3"]
    );
    assert_eq!(src.function_names("", &["Context"]), ["usefulFunc4"]);
    assert!(src.function_names("", &["Context", "int"]).is_empty());
}

#[test]
fn unknown_tag_finds_nothing() {
    let src = source();
    let tags = TagSet::from(["nope"]);
    assert!(src.scalar_values::<bool>(&tags).is_empty());
    assert!(src.sequence_values::<f64>(&tags).is_empty());
    assert!(src.mapping_values::<i64, f64>(&tags).is_empty());
}

#[test]
fn path_and_package_are_kept() {
    let src = source();
    assert_eq!(src.package_name(), "main");
    assert!(src.path().is_some_and(|p| p.ends_with("tagged.go")));
}
