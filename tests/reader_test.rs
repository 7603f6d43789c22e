use info_markup::{Configuration, Event, Reader, Value, ValueKind};
use std::io::Write;

fn reader(source: &str) -> Reader<&[u8]> {
    Reader::from_text(source, Configuration::default())
}

fn labels(source: &str) -> Vec<String> {
    let mut reader = reader(source);
    let mut out = Vec::new();
    while reader.read().unwrap() {
        let label = match reader.event() {
            Event::ElementStart => format!("start {}", reader.tag()),
            Event::ElementClose => format!("close {}", reader.tag()),
            Event::Attribute => format!("{}={}", reader.key().unwrap(), reader.value()),
            Event::Option => format!("option {}", reader.value()),
            Event::None => "none".to_string(),
        };
        out.push(label);
    }
    out
}

/// Reads until the attribute `key` is reported inside `tag`.
fn seek_attribute(reader: &mut Reader<&[u8]>, tag: &str, key: &str) {
    while reader.read().unwrap() {
        if reader.event() == Event::Attribute && reader.tag() == tag && reader.key() == Some(key) {
            return;
        }
    }
    panic!("attribute {key} in [{tag}] not found");
}

#[test]
fn test_nested_elements_close_innermost_first() {
    assert_eq!(
        labels("[a]\n\t[b]\n\t\t[c]\n[d]\n"),
        vec![
            "start a", "start b", "start c", "close c", "close b", "close a", "start d",
            "close d",
        ]
    );
}

#[test]
fn test_attribute_inheritance_and_shadowing() {
    let source = "[a]\n\tspeed 1\n\t[b]\n\t\tspeed 2\n\t\t[c]\n\t\t\tname x\n\t[d]\n\t\tname y\n";
    let mut reader = reader(source);

    seek_attribute(&mut reader, "c", "name");
    assert_eq!(reader.attribute_float("speed", 0.0), 2.0);

    seek_attribute(&mut reader, "d", "name");
    assert_eq!(reader.attribute_float("speed", 0.0), 1.0);
    assert_eq!(reader.attribute_string("name", ""), "y");
}

#[test]
fn test_reassignment_in_same_scope_overwrites() {
    let mut reader = reader("[a]\n\tspeed 1\n\tspeed 3\n\t[b]\n\t\tspeed 4\n\t\tspeed 5\n\tdone 1\n");
    seek_attribute(&mut reader, "b", "speed");
    seek_attribute(&mut reader, "b", "speed");
    assert_eq!(reader.attribute_integer("speed", 0), 5);

    seek_attribute(&mut reader, "a", "done");
    assert_eq!(reader.attribute_integer("speed", 0), 3);
    let own: Vec<_> = reader.attributes().map(|(key, _)| key.to_string()).collect();
    assert_eq!(own, vec!["speed", "done"]);
}

#[test]
fn test_close_reports_attributes_before_unwinding() {
    let mut reader = reader("[a]\n\tx 1\n\t[b]\n\t\tx 2\ny 0\n");
    let mut closes = Vec::new();
    while reader.read().unwrap() {
        if reader.event() == Event::ElementClose {
            closes.push((reader.tag().to_string(), reader.attribute_integer("x", 0)));
        }
    }
    assert_eq!(closes, vec![("b".to_string(), 2), ("a".to_string(), 1)]);
    assert_eq!(reader.attribute("x"), None);
    assert_eq!(reader.attribute_integer("y", -1), 0);
}

#[test]
fn test_children_are_counted_as_they_close() {
    let mut reader = reader("[a]\n\t[b]\n\t[c]\n\tdone 1\n");
    seek_attribute(&mut reader, "a", "done");
    assert_eq!(reader.children(), 2);
    assert_eq!(reader.depth(), 0);
    assert_eq!(reader.parent_tag(), None);
}

#[test]
fn test_parameters() {
    let mut reader = reader("[move Punch 3 (1 2)]\n");
    assert!(reader.read().unwrap());
    assert_eq!(reader.parameter_count(), 3);
    assert_eq!(reader.parameter_kind(0), Some(ValueKind::Text));
    assert_eq!(reader.parameter_kind(1), Some(ValueKind::Number));
    assert_eq!(reader.parameter_kind(2), Some(ValueKind::Group));
    assert_eq!(reader.parameter_kind(3), None);
    assert_eq!(reader.parameter_string(0, ""), "punch");
    assert_eq!(reader.parameter_integer(1, 0), 3);
    assert_eq!(reader.parameter_float(0, -1.0), -1.0);
    assert_eq!(reader.parameter_string(2, ""), "1, 2");
    assert_eq!(reader.parameter_integer(9, 42), 42);
}

#[test]
fn test_element_without_parameters() {
    let mut reader = reader("[idle]\n");
    reader.read().unwrap();
    assert_eq!(reader.parameters(), &Value::Empty);
    assert_eq!(reader.parameter_count(), 0);
    assert_eq!(reader.parameter_string(0, "none"), "none");
}

#[test]
fn test_options_belong_to_innermost_scope() {
    let mut reader = reader("global\n[a]\n\tloop\n\t3\n\t[b]\n\t\tmirror\n\tdone 1\n");
    seek_attribute(&mut reader, "a", "done");
    assert_eq!(reader.option_count(), 2);
    assert!(reader.has_option("loop"));
    assert!(!reader.has_option("mirror"));
    assert_eq!(reader.option_string(0, ""), "loop");
    assert_eq!(reader.option_integer(1, 0), 3);
    assert_eq!(reader.option_float(7, 0.5), 0.5);

    while reader.read().unwrap() {}
    assert_eq!(reader.options(), &[Value::from("global")]);
}

#[test]
fn test_scope_lock_bounds_a_subtree() {
    let source = "\
[moveset]
\t[move punch]
\t\tanim jab
\t\t[hit]
\t\t\tdamage 3
\t[move kick]
\t\tanim sweep
";
    let mut reader = reader(source);
    assert!(reader.read_element().unwrap());
    assert!(reader.read_element().unwrap());
    assert_eq!(reader.parameter_string(0, ""), "punch");
    assert!(reader.lock_scope_tag("move"));

    let mut inner = Vec::new();
    while reader.read().unwrap() {
        inner.push((reader.event(), reader.tag().to_string()));
    }
    assert_eq!(
        inner,
        vec![
            (Event::Attribute, "move".to_string()),
            (Event::ElementStart, "hit".to_string()),
            (Event::Attribute, "hit".to_string()),
        ]
    );
    assert_eq!(reader.event(), Event::None);
    assert_eq!(reader.attribute_string("anim", ""), "jab");

    assert!(reader.read().unwrap());
    assert_eq!(reader.event(), Event::ElementClose);
    assert_eq!(reader.parameter_string(0, ""), "punch");

    assert!(reader.read().unwrap());
    assert_eq!(reader.event(), Event::ElementStart);
    assert_eq!(reader.parameter_string(0, ""), "kick");
}

#[test]
fn test_scope_lock_on_a_leaf_element() {
    let mut reader = reader("[move punch]\n\tdamage 3\n[move kick]\n");
    assert!(reader.read().unwrap());
    assert!(reader.lock_scope());
    assert!(reader.read().unwrap());
    assert_eq!(reader.key(), Some("damage"));
    assert!(!reader.read().unwrap());
    assert_eq!(reader.attribute_integer("damage", 0), 3);

    assert!(reader.read().unwrap());
    assert_eq!(reader.event(), Event::ElementStart);
    assert_eq!(reader.parameter_string(0, ""), "kick");
    assert_eq!(reader.attribute("damage"), None);
}

#[test]
fn test_nested_locks() {
    let mut reader = reader("[a]\n\t[b]\n\t\tx 1\n\ty 2\n");
    reader.read().unwrap();
    assert!(reader.lock_scope());
    reader.read().unwrap();
    assert!(reader.lock_scope());

    assert!(reader.read().unwrap());
    assert_eq!(reader.key(), Some("x"));
    assert!(!reader.read().unwrap());

    assert!(reader.read().unwrap());
    assert_eq!(reader.key(), Some("y"));
    assert!(!reader.read().unwrap());
    assert!(!reader.read().unwrap());
}

#[test]
fn test_spaces_and_tabs_mix() {
    assert_eq!(
        labels("[a]\n    [b]\n\t\tx 1\n  \ty 2\n"),
        vec!["start a", "start b", "x=1", "close b", "y=2", "close a"]
    );
}

#[test]
fn test_byte_order_mark_is_ignored() {
    assert_eq!(
        labels("\u{feff}[a]\r\n\tx 1\r\n"),
        vec!["start a", "x=1", "close a"]
    );
}

#[test]
fn test_crlf_line_endings() {
    assert_eq!(
        labels("[a]\r\n\tname 'walk'\r\n\tloop\r\n"),
        vec!["start a", "name=walk", "option loop", "close a"]
    );
}

#[test]
fn test_comments_are_ignored() {
    assert_eq!(
        labels("# header\n[a]\n\t# note\n\tx 1\n# trailer\n"),
        vec!["start a", "x=1", "close a"]
    );
}

#[test]
fn test_reader_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "[anim walk]\n\tframes (0 1 2)\n").unwrap();

    let mut reader = Reader::open(file.path(), Configuration::default()).unwrap();
    assert!(reader.read().unwrap());
    assert_eq!(reader.tag(), "anim");
    assert!(reader.read().unwrap());
    assert_eq!(reader.value().count(), 3);
    assert!(reader.read().unwrap());
    assert_eq!(reader.event(), Event::ElementClose);
    assert!(!reader.read().unwrap());
}

#[test]
fn test_line_and_column() {
    let mut reader = reader("[a]\n\tx 12\n");
    reader.read().unwrap();
    reader.read().unwrap();
    assert_eq!(reader.line(), 2);
    assert_eq!(reader.column(), 6);
}
