//! Node construction and teardown reporting.

use deck::ast::{EventLog, NodeEvent, NodeKind, Span, Traced};
use deck::syntax::{ParseOptions, Parser};

#[test]
fn constructed_events_cover_the_tree() {
    let log = EventLog::new();
    let source = "def f() { x }";
    let parsed = Parser::new(ParseOptions::default())
        .with_observer(&log)
        .parse(source)
        .unwrap();
    assert!(parsed.is_complete());

    let built = log.constructed();
    assert_eq!(
        built.last(),
        Some(&(NodeKind::Definition, Span::new(0, source.len())))
    );
    assert!(built.contains(&(NodeKind::Block, Span::new(8, 13))));
    assert!(built.contains(&(NodeKind::Invocation, Span::new(10, 11))));
    assert!(built.contains(&(NodeKind::Identifier, Span::new(4, 5))));
    // only the backtracked identifiers are gone before teardown
    assert_eq!(log.destroyed(), [NodeKind::Identifier, NodeKind::Identifier]);
}

#[test]
fn children_are_built_before_parents() {
    let log = EventLog::new();
    Parser::default()
        .with_observer(&log)
        .parse("def f(n: Int = 1) { }")
        .unwrap();

    let kinds: Vec<NodeKind> = log.constructed().into_iter().map(|(k, _)| k).collect();
    let position = |kind| kinds.iter().rposition(|k| *k == kind).expect("event");
    assert!(position(NodeKind::Number) < position(NodeKind::LabelAssignment));
    assert!(position(NodeKind::LabelAssignment) < position(NodeKind::Label));
    assert!(position(NodeKind::Label) < position(NodeKind::Tuple));
    assert!(position(NodeKind::Tuple) < position(NodeKind::Definition));
}

#[test]
fn backtracked_attempts_are_reported() {
    // `x` is read as an identifier by the reassignment and label attempts
    // before the invocation alternative keeps it.
    let log = EventLog::new();
    Parser::default()
        .with_observer(&log)
        .parse("def f() { x }")
        .unwrap();
    let identifiers = log
        .constructed()
        .into_iter()
        .filter(|(kind, span)| *kind == NodeKind::Identifier && *span == Span::new(10, 11))
        .count();
    assert_eq!(identifiers, 3);

    let x_built = NodeEvent::Constructed {
        kind: NodeKind::Identifier,
        span: Span::new(10, 11),
    };
    let x_dropped = NodeEvent::Destroyed {
        kind: NodeKind::Identifier,
    };
    let events = log.events();
    assert_eq!(&events[1..5], [x_built, x_dropped, x_built, x_dropped]);
}

#[test]
fn every_construction_is_matched_after_teardown() {
    let log = EventLog::new();
    let source = "def f(n: Int = 1) {\n    total = add(n, 2)\n    label: = \"s\"\n    a b { c }\n}";
    let def = Parser::default()
        .with_observer(&log)
        .parse(source)
        .unwrap()
        .into_complete()
        .unwrap();
    drop(Traced::new(def, &log));

    let mut built = log.constructed().into_iter().map(|(k, _)| k).collect::<Vec<_>>();
    let mut dropped = log.destroyed();
    built.sort_by_key(|k| k.as_str());
    dropped.sort_by_key(|k| k.as_str());
    assert_eq!(built, dropped);
}

#[test]
fn traced_tree_reports_teardown_parent_first() {
    let log = EventLog::new();
    let def = Parser::default().parse("def f() { x }").unwrap().node;
    {
        let traced = Traced::new(def, &log);
        assert_eq!(traced.body.len(), 1);
        assert!(log.events().is_empty());
    }
    assert_eq!(
        log.destroyed(),
        [
            NodeKind::Definition,
            NodeKind::Identifier,
            NodeKind::Block,
            NodeKind::Invocation,
            NodeKind::Identifier,
        ]
    );
}

#[test]
fn teardown_of_labels_and_reassignments() {
    let log = EventLog::new();
    let def = Parser::default().parse("def () { a: = \"s\"; b = 2 }").unwrap().node;
    drop(Traced::new(def, &log));
    assert_eq!(
        log.events(),
        [
            NodeEvent::Destroyed { kind: NodeKind::Definition },
            NodeEvent::Destroyed { kind: NodeKind::Block },
            NodeEvent::Destroyed { kind: NodeKind::Label },
            NodeEvent::Destroyed { kind: NodeKind::Identifier },
            NodeEvent::Destroyed { kind: NodeKind::LabelAssignment },
            NodeEvent::Destroyed { kind: NodeKind::String },
            NodeEvent::Destroyed { kind: NodeKind::Reassignment },
            NodeEvent::Destroyed { kind: NodeKind::Identifier },
            NodeEvent::Destroyed { kind: NodeKind::Number },
        ]
    );
}
