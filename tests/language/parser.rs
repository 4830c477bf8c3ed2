//! Integration tests for the parser
//!
//! Tests precedence, relation forms, error reporting, and the printer and
//! projection built on parsed trees.

use verdict_language::{
    Comparison, DiagnosticCode, Node, ObjectRef, ParserConfig, Severity, SubjectKind, SubjectRef,
    parse, parse_condition, parse_condition_with, pretty_print, project,
};

fn parse_ok(source: &str) -> Node {
    match parse(source) {
        Ok(node) => node,
        Err(e) => panic!("failed to parse {source:?}: {e}"),
    }
}

fn subject_of(node: &Node) -> &str {
    node.as_relation().map_or("?", |r| r.subject.name())
}

// =============================================================================
// Precedence and Associativity
// =============================================================================

#[test]
fn and_binds_tighter_than_or() {
    let Node::Or(left, right, _) = parse_ok("a is x or b is x and c is x") else {
        panic!("expected Or at the root");
    };
    assert_eq!(subject_of(&left), "a");
    let Node::And(b, c, _) = *right else {
        panic!("expected And on the right");
    };
    assert_eq!(subject_of(&b), "b");
    assert_eq!(subject_of(&c), "c");
}

#[test]
fn and_is_left_associative() {
    let Node::And(left, c, _) = parse_ok("a is x and b is x and c is x") else {
        panic!("expected And");
    };
    assert!(matches!(*left, Node::And(..)));
    assert_eq!(subject_of(&c), "c");
}

#[test]
fn or_is_left_associative() {
    let Node::Or(left, c, _) = parse_ok("a is x or b is x or c is x") else {
        panic!("expected Or");
    };
    assert!(matches!(*left, Node::Or(..)));
    assert_eq!(subject_of(&c), "c");
}

#[test]
fn double_not() {
    let Node::Not(inner, _) = parse_ok("not not a is x") else {
        panic!("expected Not");
    };
    let Node::Not(relation, _) = *inner else {
        panic!("expected nested Not");
    };
    assert_eq!(subject_of(&relation), "a");
}

#[test]
fn parentheses_override_precedence() {
    let Node::And(left, _, _) = parse_ok("(a is x or b is x) and c is x") else {
        panic!("expected And");
    };
    assert!(matches!(*left, Node::Or(..)));
}

#[test]
fn deep_parentheses() {
    let node = parse_ok("((((desk is open))))");
    assert_eq!(subject_of(&node), "desk");
    let node = parse_ok("not ((a is x and (b is x or (c is x and (d is x)))))");
    assert!(matches!(node, Node::Not(..)));
}

// =============================================================================
// Relation Forms
// =============================================================================

#[test]
fn implicit_item_subject() {
    let node = parse_ok("desk is open");
    let relation = node.as_relation().unwrap();
    assert_eq!(relation.subject, SubjectRef::item("desk"));
    assert_eq!(relation.object, ObjectRef::element("open"));
    assert!(relation.is_bare());
}

#[test]
fn explicit_subject_kinds() {
    let node = parse_ok("npc guard is angry");
    assert_eq!(
        node.as_relation().unwrap().subject,
        SubjectRef::with_id(SubjectKind::Npc, "guard")
    );
    let node = parse_ok("currentScene.state is dark");
    assert_eq!(
        node.as_relation().unwrap().subject.kind,
        SubjectKind::CurrentScene
    );
}

#[test]
fn attribute_segment() {
    let node = parse_ok("player.attribute constitution is_less_than 3");
    let relation = node.as_relation().unwrap();
    assert_eq!(relation.attribute.as_deref(), Some("constitution"));
    assert_eq!(relation.comparison, Comparison::LessThan);
    assert_eq!(relation.object.numeric_value(), Some(3.0));
}

#[test]
fn custom_property_segment() {
    let node = parse_ok("target.color is red");
    assert_eq!(node.as_relation().unwrap().property.as_deref(), Some("color"));
}

#[test]
fn boolean_and_string_values() {
    let node = parse_ok("lamp.lit is true");
    assert_eq!(node.as_relation().unwrap().object.bool_value(), Some(true));
    let node = parse_ok(r#"sign.text is "keep out""#);
    assert_eq!(node.as_relation().unwrap().object, ObjectRef::text("keep out"));
}

#[test]
fn has_relation() {
    let node = parse_ok("player has lamp");
    let relation = node.as_relation().unwrap();
    assert_eq!(relation.comparison, Comparison::Has);
    assert_eq!(relation.object, ObjectRef::element("lamp"));
}

#[test]
fn count_relation() {
    let Node::Count(count) = parse_ok("player visits \"Great Hall\" is_greater_than 1") else {
        panic!("expected Count");
    };
    assert_eq!(count.scene, "Great Hall");
    assert_eq!(count.value, 1);
}

#[test]
fn distance_relation() {
    let Node::Distance(distance) = parse_ok("player.distance_from npc guard is_less_than 5")
    else {
        panic!("expected Distance");
    };
    assert_eq!(distance.to, SubjectRef::with_id(SubjectKind::Npc, "guard"));
    assert_eq!(distance.comparison, Comparison::LessThan);
}

// =============================================================================
// Errors
// =============================================================================

#[test]
fn missing_value_fails() {
    let result = parse_condition("player is");
    assert!(!result.success());
    assert!(result.ast.is_none());
    assert!(result.errors().count() > 0);
}

#[test]
fn empty_input_fails() {
    assert!(!parse_condition("").success());
    assert!(!parse_condition("   \n ").success());
}

#[test]
fn unmatched_parenthesis_fails() {
    assert!(!parse_condition("(desk is open").success());
    assert!(!parse_condition("desk is open)").success());
}

#[test]
fn trailing_tokens_fail() {
    let result = parse_condition("desk is open lamp");
    assert!(!result.success());
    let error = result.errors().next().unwrap();
    assert!(error.message.contains("unexpected token"), "{}", error.message);
}

#[test]
fn unknown_character_fails() {
    let result = parse_condition("desk is @open");
    assert!(!result.success());
    assert_eq!(result.errors().next().unwrap().severity, Severity::Error);
}

#[test]
fn non_integer_count_fails() {
    assert!(!parse_condition("player visits cellar is 1.5").success());
}

#[test]
fn nesting_limit() {
    let config = ParserConfig { max_depth: 3 };
    assert!(parse_condition_with("not not not desk is open", config).success());
    let result = parse_condition_with("not not not not desk is open", config);
    assert!(!result.success());
    assert!(matches!(
        result.errors().next().unwrap().code,
        DiagnosticCode::NestingLimit(3)
    ));
}

// =============================================================================
// Printer and Projection
// =============================================================================

#[test]
fn printed_conditions_reparse_equal() {
    for source in [
        "a is x or b is x and c is x",
        "(a is x or b is x) and c is x",
        "not (desk is open and lamp.lit is true)",
        "player.attribute strength is_greater_than 2.5",
        r#"sign.text is "a \"quoted\" word""#,
        "player visits cellar is_not 0",
        "player distance_from npc guard is 3",
        "player.inventory is_empty",
    ] {
        let ast = parse_ok(source);
        let printed = pretty_print(&ast);
        let reparsed = parse_ok(&printed);
        assert_eq!(pretty_print(&reparsed), printed, "{source}");
    }
}

#[test]
fn projection_shapes() {
    let json = project(&parse_ok("not (player is target and desk.state is open)"));
    assert_eq!(json["type"], "NOT");
    assert_eq!(json["inner"]["type"], "AND");
    let left = &json["inner"]["left"];
    assert_eq!(left["subject"]["kind"], "player");
    assert!(left["subject"]["id"].is_null());
    assert_eq!(left["object"]["kind"], "element");
    assert_eq!(json["inner"]["right"]["propertyName"], "state");

    let count = project(&parse_ok("player visits cellar is 2"));
    assert_eq!(count["type"], "COUNT");
    assert_eq!(count["sceneName"], "cellar");
    assert_eq!(count["value"], 2);
}
