use serde_json::json;
use serde_tomlite::{parse, tagged, Tagged, Value};

fn tagged_json(input: &str) -> serde_json::Value {
    serde_json::to_value(parse(input).unwrap().to_tagged()).unwrap()
}

#[test]
fn test_scalars() {
    let tagged = tagged_json(
        "name = \"Tom\"\nage = 27\npi = 3.5\nwhole = 1.0\nok = true\ndob = 1979-05-27T07:32:00Z",
    );
    assert_eq!(
        tagged,
        json!({
            "name": { "type": "string", "value": "Tom" },
            "age": { "type": "integer", "value": "27" },
            "pi": { "type": "float", "value": "3.5" },
            "whole": { "type": "float", "value": "1.0" },
            "ok": { "type": "bool", "value": "true" },
            "dob": { "type": "datetime", "value": "1979-05-27T07:32:00Z" },
        })
    );
}

#[test]
fn test_arrays_and_tables() {
    let tagged = tagged_json("[a.b]\nports = [1, 2]\nnested = [[\"x\"], []]");
    assert_eq!(
        tagged,
        json!({
            "a": {
                "b": {
                    "ports": {
                        "type": "array",
                        "value": [
                            { "type": "integer", "value": "1" },
                            { "type": "integer", "value": "2" },
                        ]
                    },
                    "nested": {
                        "type": "array",
                        "value": [
                            { "type": "array", "value": [{ "type": "string", "value": "x" }] },
                            { "type": "array", "value": [] },
                        ]
                    }
                }
            }
        })
    );
}

#[test]
fn test_table_arrays() {
    let tagged = tagged_json("[[p]]\nn = 1\n[[p]]\n[[p]]\nn = 3");
    assert_eq!(
        tagged,
        json!({
            "p": [
                { "n": { "type": "integer", "value": "1" } },
                {},
                { "n": { "type": "integer", "value": "3" } },
            ]
        })
    );
}

#[test]
fn test_key_order_preserved() {
    let doc = parse("z = 1\na = 2\nm = 3").unwrap();
    let text = serde_json::to_string(&doc.to_tagged()).unwrap();
    let z = text.find("\"z\"").unwrap();
    let a = text.find("\"a\"").unwrap();
    let m = text.find("\"m\"").unwrap();
    assert!(z < a && a < m);
}

#[test]
fn test_tag_value_directly() {
    assert_eq!(
        tagged::tag_value(&Value::Integer(-4)),
        Tagged::Scalar {
            kind: "integer",
            value: "-4".to_string()
        }
    );
    assert_eq!(
        tagged::tag_value(&Value::Array(vec![])),
        Tagged::Array(vec![])
    );
}
