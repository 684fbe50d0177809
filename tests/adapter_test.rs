//! Adapter contracts: database values, containment operators and column types.

use itree::adapter::{ColumnType, Containment, ContainmentOp, Operand, SqlValue, TYPE_NAME};
use itree::*;

fn p(text: &str) -> ITree {
    ITree::parse(text).unwrap()
}

#[test]
fn test_text_and_binary_accessors_agree() {
    let path = p("1.2.300.4.500");
    let from_text = ITree::from_sql(&SqlValue::Text(path.to_string())).unwrap();
    let from_bytes = ITree::from_sql(&SqlValue::Bytes(path.to_bytes().to_vec())).unwrap();
    assert_eq!(from_text, Some(path));
    assert_eq!(from_bytes, Some(path));
}

#[test]
fn test_malformed_stored_value() {
    assert!(matches!(
        ITree::from_sql(&SqlValue::Text("1.2.".into())),
        Err(ITreeError::InvalidPath(PathError::EmptySegment { position: 2 }))
    ));
    assert!(matches!(
        ITree::from_sql(&SqlValue::Bytes(vec![0xff; 4])),
        Err(ITreeError::InvalidEncoding(_))
    ));
    assert_eq!(
        ITree::from_sql(&SqlValue::Bool(true)),
        Err(ITreeError::TypeMismatch { found: "boolean" })
    );
}

#[test]
fn test_bind_round_trip() {
    let path = p("5.6.7");
    let bound = ITree::to_sql(Some(&path));
    assert_eq!(ITree::from_sql(&bound).unwrap(), Some(path));
    assert_eq!(ITree::from_sql(&ITree::to_sql(None)).unwrap(), None);
}

#[test]
fn test_containment_operators_follow_ancestry() {
    let rows = [p("1"), p("1.2"), p("1.2.3"), p("1.2.3.4"), p("1.3"), p("2.2")];
    let anchor = p("1.2");

    let below: Vec<String> = rows
        .iter()
        .filter(|row| Containment::contained_by(anchor).matches(row))
        .map(ToString::to_string)
        .collect();
    assert_eq!(below, ["1.2", "1.2.3", "1.2.3.4"]);

    let above: Vec<String> = rows
        .iter()
        .filter(|row| Containment::container_of(anchor).matches(row))
        .map(ToString::to_string)
        .collect();
    assert_eq!(above, ["1", "1.2"]);

    // Same answers as the methods on the value itself
    for row in &rows {
        assert_eq!(
            Containment::contained_by(anchor).matches(row),
            row.descendant_of(anchor).unwrap()
        );
        assert_eq!(
            Containment::container_of(anchor).matches(row),
            row.ancestor_of(anchor).unwrap()
        );
    }
}

#[test]
fn test_containment_with_path_set() {
    let roots = [p("1.2"), p("9")];
    let query = Containment::contained_by(&roots[..]);
    assert_eq!(query.op(), ContainmentOp::IsContainedBy);
    assert!(matches!(query.operand(), Operand::Many(v) if v.len() == 2));
    assert!(query.matches(&p("9.9.9")));
    assert!(!query.matches(&p("1.3")));
    assert_eq!(
        query.to_sql("path"),
        format!("path <@ CAST(ARRAY['1.2', '9'] AS {}[])", TYPE_NAME)
    );

    let query = Containment::container_of(vec![p("1.2.3"), p("4.5")]);
    assert!(query.matches(&p("4")));
    assert!(query.matches(&p("1.2")));
    assert!(!query.matches(&p("1.2.4")));
    assert_eq!(
        query.to_sql("path"),
        "path @> CAST(ARRAY['1.2.3', '4.5'] AS ITREE[])"
    );
}

#[test]
fn test_column_type_modifier() {
    let column = ColumnType::from_typmod("3").unwrap();
    assert_eq!(column.sql_type(), "ITREE(3)");
    assert_eq!(column.typmod_out(), "3");
    assert_eq!(
        column.coerce(&SqlValue::Text("1.2.3".into())).unwrap(),
        Some(p("1.2.3"))
    );
    assert!(matches!(
        column.coerce(&SqlValue::Text("1.2.3.4".into())),
        Err(ITreeError::InvalidPath(PathError::TooManyLevels { levels: 4, max_levels: 3 }))
    ));

    assert_eq!(ColumnType::default().sql_type(), "ITREE");
    assert!(ColumnType::default().check(&p("1.2.3.4.5.6.7.8.9.10.11.12.13.14.15.16")).is_ok());
}
