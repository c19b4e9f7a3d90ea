//! Integration tests for template multiplication through the public API

use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use resource_multiplier::{
    apply_worklist, multiply, parse, replicate, transform, Directive, MultiplyConfig,
    MultiplyError, Template,
};

fn template(value: Value) -> Template {
    value.as_object().expect("template must be a mapping").clone()
}

#[test]
fn test_cloudformation_style_template() {
    let input = template(json!({
        "Bucket": {
            "Type": "AWS::S3::Bucket",
            "Properties": {"BucketName": "shared-bucket"}
        },
        "Worker": {
            "Type": "AWS::EC2::Instance",
            "MultiplyKey": "workers",
            "Properties": {
                "InstanceType": "t3.large",
                "Tags": [
                    {"Key": "Name", "Value": "worker-%d"},
                    {"Key": "Index", "Value": "%d"}
                ],
                "UserData": {"Fn::Sub": "echo node %d of ${Count}"}
            }
        }
    }));

    let output = multiply(
        input,
        json!({"MultiplyKey": "workers", "Multiply": "2"})
            .as_object()
            .unwrap(),
        &MultiplyConfig::default(),
    )
    .expect("Should multiply");

    assert_eq!(
        Value::Object(output),
        json!({
            "Bucket": {
                "Type": "AWS::S3::Bucket",
                "Properties": {"BucketName": "shared-bucket"}
            },
            "Worker1": {
                "Type": "AWS::EC2::Instance",
                "Properties": {
                    "InstanceType": "t3.large",
                    "Tags": [
                        {"Key": "Name", "Value": "worker-1"},
                        {"Key": "Index", "Value": "1"}
                    ],
                    "UserData": {"Fn::Sub": "echo node 1 of ${Count}"}
                }
            },
            "Worker2": {
                "Type": "AWS::EC2::Instance",
                "Properties": {
                    "InstanceType": "t3.large",
                    "Tags": [
                        {"Key": "Name", "Value": "worker-2"},
                        {"Key": "Index", "Value": "2"}
                    ],
                    "UserData": {"Fn::Sub": "echo node 2 of ${Count}"}
                }
            }
        })
    );
}

#[test]
fn test_replication_count_law() {
    let body = json!({"Name": "n-%d", "Nested": {"Key%d": ["%d", 4]}});
    let copies = replicate("Node", &body, 4, "%d");

    assert_eq!(copies.len(), 4);
    for i in 1..=4u64 {
        let copy = &copies[&format!("Node{}", i)];
        assert_eq!(
            copy,
            &json!({
                "Name": format!("n-{}", i),
                "Nested": {format!("Key{}", i): [i.to_string(), 4]}
            })
        );
    }
}

#[test]
fn test_worklist_equivalent_to_sequential_calls() {
    let original = json!({
        "A": {"MultiplyKey": "A", "Name": "a%d"},
        "B": {"MultiplyKey": "B", "Name": "b%d"},
        "C": {"Name": "c"}
    });
    let config = MultiplyConfig::default();

    let worklist = parse(
        Some(&json!(["A", "B"])),
        Some(&json!([2, 3])),
        None,
        &config,
    )
    .unwrap();
    let combined = apply_worklist(template(original.clone()), &worklist, "MultiplyKey").unwrap();

    let step = transform(
        template(original),
        &Directive::new("A", 2, "%d"),
        "MultiplyKey",
    )
    .unwrap();
    let step = transform(step, &Directive::new("B", 3, "%d"), "MultiplyKey").unwrap();

    assert_eq!(combined, step);
    let names: Vec<&str> = combined.keys().map(|k| k.as_str()).collect();
    assert_eq!(names, vec!["A1", "A2", "B1", "B2", "B3", "C"]);
}

#[test]
fn test_single_entry_lists_then_unmatched_pass() {
    let original = json!({
        "Outer": {"MultiplyKey": "outer", "Child": {"Name": "c-%d"}}
    });
    let output = multiply(
        template(original),
        json!({"MultiplyKey": ["outer"], "Multiply": [2], "Placeholder": ["%d"]})
            .as_object()
            .unwrap(),
        &MultiplyConfig::default(),
    )
    .unwrap();

    let again = multiply(
        output,
        json!({"MultiplyKey": "missing", "Multiply": 5})
            .as_object()
            .unwrap(),
        &MultiplyConfig::default(),
    )
    .unwrap();

    assert_eq!(
        Value::Object(again),
        json!({
            "Outer1": {"Child": {"Name": "c-1"}},
            "Outer2": {"Child": {"Name": "c-2"}}
        })
    );
}

#[test]
fn test_collision_returns_original_template() {
    // X replicates to X1, then the existing X1 is copied onto it
    let original = json!({
        "X": {"MultiplyKey": "k"},
        "X1": {"MultiplyKey": "other"}
    });

    let failure = transform(
        template(original.clone()),
        &Directive::new("k", 1, "%d"),
        "MultiplyKey",
    )
    .unwrap_err();

    assert!(failure.to_string().contains("X1"));
    assert_eq!(Value::Object(failure.template), original);
}

#[test]
fn test_collision_error_kind() {
    let err = multiply(
        template(json!({"A": {"MultiplyKey": "x"}, "A1": {}})),
        json!({"MultiplyKey": "x", "Multiply": 1}).as_object().unwrap(),
        &MultiplyConfig::default(),
    )
    .unwrap_err();

    match err {
        MultiplyError::NameCollision { name, .. } => assert_eq!(name, "A1"),
        other => panic!("expected NameCollision, got {:?}", other),
    }
}

#[test]
fn test_per_directive_placeholders() {
    let output = multiply(
        template(json!({
            "A": {"MultiplyKey": "a", "Name": "a-{i}-%d"},
            "B": {"MultiplyKey": "b", "Name": "b-{i}-%d"}
        })),
        json!({
            "MultiplyKey": ["a", "b"],
            "Multiply": [1, 1],
            "Placeholder": ["{i}", "%d"]
        })
        .as_object()
        .unwrap(),
        &MultiplyConfig::default(),
    )
    .unwrap();

    assert_eq!(
        Value::Object(output),
        json!({
            "A1": {"Name": "a-1-%d"},
            "B1": {"Name": "b-{i}-1"}
        })
    );
}

#[test]
fn test_config_from_toml_changes_marker() {
    let config = MultiplyConfig::from_str(
        r#"
[multiply]
marker_field = "Copies"
default_count = 2
"#,
    )
    .unwrap();

    let output = multiply(
        template(json!({"Fn": {"Copies": "fn", "Name": "fn-%d"}})),
        json!({"MultiplyKey": "fn"}).as_object().unwrap(),
        &config,
    )
    .unwrap();

    assert_eq!(
        Value::Object(output),
        json!({"Fn1": {"Name": "fn-1"}, "Fn2": {"Name": "fn-2"}})
    );
}
