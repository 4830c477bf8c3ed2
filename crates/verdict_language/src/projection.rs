//! JSON debug projection of condition trees, for editor visualization.
//!
//! Every node becomes an object tagged with `type`. Subjects project as
//! `{kind, id}` and objects as `{kind, value, numericValue, boolValue}`,
//! where the optional fields are omitted when absent.

use serde_json::{Map, Value, json};

use crate::ast::{Node, ObjectRef, Relation, SubjectRef};

/// Projects a node (and its children) to JSON.
#[must_use]
pub fn project(node: &Node) -> Value {
    match node {
        Node::And(left, right, _) | Node::Or(left, right, _) => json!({
            "type": node.type_name(),
            "left": project(left),
            "right": project(right),
        }),
        Node::Not(inner, _) => json!({
            "type": node.type_name(),
            "inner": project(inner),
        }),
        Node::Relation(relation) => project_relation(relation),
        Node::Count(count) => json!({
            "type": node.type_name(),
            "subject": project_subject(&count.subject),
            "sceneName": count.scene,
            "comparison": count.comparison.as_str(),
            "value": count.value,
        }),
        Node::Distance(distance) => json!({
            "type": node.type_name(),
            "subjectA": project_subject(&distance.from),
            "subjectB": project_subject(&distance.to),
            "comparison": distance.comparison.as_str(),
            "value": distance.value,
        }),
    }
}

fn project_relation(relation: &Relation) -> Value {
    let mut map = Map::new();
    map.insert("type".into(), "RELATION".into());
    map.insert("subject".into(), project_subject(&relation.subject));
    map.insert("relation".into(), relation.comparison.as_str().into());
    map.insert("object".into(), project_object(&relation.object));
    if let Some(attribute) = &relation.attribute {
        map.insert("attributeName".into(), attribute.as_str().into());
    }
    if let Some(property) = &relation.property {
        map.insert("propertyName".into(), property.as_str().into());
    }
    Value::Object(map)
}

/// Projects a subject reference as `{kind, id}`; `id` is null for keyword subjects.
#[must_use]
pub fn project_subject(subject: &SubjectRef) -> Value {
    json!({
        "kind": subject.kind.as_str(),
        "id": subject.id,
    })
}

/// Projects an object reference.
#[must_use]
pub fn project_object(object: &ObjectRef) -> Value {
    let mut map = Map::new();
    map.insert("kind".into(), object.kind_name().into());
    map.insert("value".into(), object.value().into());
    if let Some(n) = object.numeric_value() {
        map.insert("numericValue".into(), json!(n));
    }
    if let Some(b) = object.bool_value() {
        map.insert("boolValue".into(), b.into());
    }
    Value::Object(map)
}
