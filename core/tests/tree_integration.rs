use std::collections::HashSet;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;

use marshal_core::commands::{argument, literal};
use marshal_core::{
    ArgumentParser, CommandContext, CommandNode, CommandSyntaxError, NodeSnapshot, StringReader,
    SyntaxErrorKind, arguments, validate_tree,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct Session {
    name: String,
    permissions: HashSet<String>,
}

impl Session {
    fn with(name: &str, permissions: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            permissions: permissions.iter().map(|p| p.to_string()).collect(),
        }
    }

    fn can(&self, permission: &str) -> bool {
        self.permissions.contains(permission)
    }
}

fn sample_tree(counter: Arc<AtomicI32>) -> CommandNode<Session> {
    let add = counter.clone();
    let reset = counter;

    literal("counter")
        .then(
            literal("add").then(
                argument("amount", arguments::integer_range(1, 100)).executes(move |_| {
                    Ok(add.fetch_add(1, Ordering::SeqCst) + 1)
                }),
            ),
        )
        .then(
            literal("reset")
                .requires(|session: &Session| session.can("counter.reset"))
                .executes(move |_| {
                    reset.store(0, Ordering::SeqCst);
                    Ok(0)
                }),
        )
        .then(
            literal("whoami").executes(|context: &CommandContext<Session>| {
                Ok(context.source().name.len() as i32)
            }),
        )
        .build()
}

// ---------------------------------------------------------------------------
// End-to-end
// ---------------------------------------------------------------------------

#[test]
fn test_foo_bar_example() {
    let foo = literal::<()>("foo")
        .then(argument("bar", arguments::integer()).executes(|_| Ok(1)))
        .build();

    let bar = foo.child("bar").unwrap();
    let parser = bar.parser().unwrap();

    let mut reader = StringReader::new("42");
    let value = parser.parse(&mut reader).unwrap();
    assert_eq!(value.downcast::<i32>(), Some(42));
    assert_eq!(reader.cursor(), 2);

    let mut reader = StringReader::new("abc");
    let err = parser.parse(&mut reader).unwrap_err();
    assert_eq!(err.kind(), &SyntaxErrorKind::ExpectedInt);
    assert_eq!(reader.cursor(), 0);

    assert_eq!(bar.execute(&CommandContext::new(())).unwrap(), 1);
}

#[test]
fn test_manual_walk_with_reader() {
    let counter = Arc::new(AtomicI32::new(0));
    let tree = sample_tree(counter.clone());
    let session = Session::with("alice", &[]);

    // A tiny hand-rolled walk: literal, whitespace, literal, whitespace, argument.
    let mut reader = StringReader::new("counter add 5");
    let head = reader.read_string();
    assert!(tree.accepts_literal(&head));
    reader.skip_whitespace();

    let sub = reader.read_string();
    let add = tree.child(&sub).unwrap();
    assert!(add.can_use(&session));
    reader.skip_whitespace();

    let amount = add.child("amount").unwrap();
    let parsed = amount.parser().unwrap().parse(&mut reader).unwrap();
    assert_eq!(parsed.downcast_ref::<i32>(), Some(&5));
    assert!(!reader.can_read());

    let context = CommandContext::new(session);
    assert_eq!(amount.execute(&context).unwrap(), 1);
    assert_eq!(amount.execute(&context).unwrap(), 2);
    assert_eq!(counter.load(Ordering::SeqCst), 2);
}

#[test]
fn test_requirement_gates_usability_not_parsing() {
    let tree = sample_tree(Arc::new(AtomicI32::new(0)));
    let reset = tree.child("reset").unwrap();

    assert!(!reset.can_use(&Session::with("guest", &[])));
    assert!(reset.can_use(&Session::with("admin", &["counter.reset"])));
    assert!(tree.can_use(&Session::default()));

    // Gated nodes still execute when called directly; gating is the dispatcher's job.
    let context = CommandContext::new(Session::default());
    assert_eq!(reset.execute(&context).unwrap(), 0);
}

#[test]
fn test_executor_reads_source() {
    let tree = sample_tree(Arc::new(AtomicI32::new(0)));
    let whoami = tree.child("whoami").unwrap();
    let context = CommandContext::new(Session::with("bob", &[]));
    assert_eq!(whoami.execute(&context).unwrap(), 3);
}

#[test]
fn test_out_of_range_argument_reports_position() {
    let tree = sample_tree(Arc::new(AtomicI32::new(0)));
    let amount = tree
        .child("add")
        .and_then(|add| add.child("amount"))
        .unwrap();

    let mut reader = StringReader::new("counter add 500");
    reader.set_cursor(12);
    let err = amount.parser().unwrap().parse(&mut reader).unwrap_err();

    assert_eq!(reader.cursor(), 12);
    assert_eq!(err.cursor(), 12);
    assert_eq!(
        err.to_string(),
        "Value must not be more than 100, found 500 at position 12"
    );
    assert_eq!(err.context(), "...unter add <--[HERE]");
}

// ---------------------------------------------------------------------------
// Merge semantics
// ---------------------------------------------------------------------------

#[test]
fn test_argument_child_merge_keeps_both_grandchildren() {
    let mut node = argument::<(), _, _>("target", arguments::word()).build();
    node.add_child(argument("x", arguments::integer()).then(literal("b").executes(|_| Ok(0))).build());
    node.add_child(argument("x", arguments::integer()).then(literal("a").executes(|_| Ok(0))).build());

    let snapshot = NodeSnapshot::capture(&node);
    assert_eq!(snapshot.paths(), vec!["<target> <x> a", "<target> <x> b"]);
}

#[test]
fn test_literal_child_replaces_subtree() {
    let mut parent = literal::<()>("root").build();
    parent.add_child(literal("x").then(literal("b").executes(|_| Ok(0))).build());
    parent.add_child(literal("x").then(literal("a").executes(|_| Ok(0))).build());

    let x = parent.child("x").unwrap();
    assert_eq!(x.child_count(), 1);
    assert!(x.child("a").is_some());
    assert!(x.child("b").is_none());
}

#[test]
fn test_build_order_decides_merge_winner() {
    let first_wins = argument::<(), _, _>("root", arguments::word())
        .then(literal("x").executes(|_| Ok(1)))
        .then(literal("x").executes(|_| Ok(2)))
        .build();
    let context = CommandContext::new(());
    assert_eq!(first_wins.child("x").unwrap().execute(&context).unwrap(), 1);

    let last_wins = literal::<()>("root")
        .then(literal("x").executes(|_| Ok(1)))
        .then(literal("x").executes(|_| Ok(2)))
        .build();
    assert_eq!(last_wins.child("x").unwrap().execute(&context).unwrap(), 2);
}

// ---------------------------------------------------------------------------
// Misuse
// ---------------------------------------------------------------------------

#[test]
#[should_panic(expected = "not executable")]
fn test_execute_non_executable_node_panics() {
    let tree = sample_tree(Arc::new(AtomicI32::new(0)));
    let add = tree.child("add").unwrap();
    let _ = add.execute(&CommandContext::new(Session::default()));
}

#[test]
fn test_failed_reads_leave_cursor_and_text_intact() {
    let mut reader = StringReader::new("invalid 12x");
    assert!(reader.read_boolean().is_err());
    assert_eq!(reader.cursor(), 0);

    let word = reader.read_string();
    assert_eq!(word, "invalid");
    assert_eq!(format!("{}{}", reader.consumed(), reader.remaining()), "invalid 12x");

    reader.skip_whitespace();
    assert_eq!(reader.read_int().unwrap(), 12);
    assert_eq!(reader.remaining(), "x");
}

#[test]
#[should_panic(expected = "cursor out of range")]
fn test_cursor_past_end_panics() {
    let mut reader = StringReader::new("abc");
    reader.set_cursor(10);
}

// ---------------------------------------------------------------------------
// Custom parsers and validation
// ---------------------------------------------------------------------------

#[test]
fn test_custom_closure_parser_on_tree() {
    let coordinate = |reader: &mut StringReader| -> Result<(i32, i32), CommandSyntaxError> {
        let start = reader.cursor();
        let x = reader.read_int()?;
        if !reader.can_read() || reader.peek() != ',' {
            reader.set_cursor(start);
            return Err(CommandSyntaxError::custom("Expected ','", reader));
        }
        reader.skip();
        match reader.read_int() {
            Ok(y) => Ok((x, y)),
            Err(err) => {
                reader.set_cursor(start);
                Err(err)
            }
        }
    };

    let mut reader = StringReader::new("3,-4");
    assert_eq!(coordinate.parse(&mut reader).unwrap(), (3, -4));

    let tree = literal::<()>("goto")
        .then(argument("pos", coordinate).executes(|_| Ok(1)))
        .build();
    let pos = tree.child("pos").unwrap();
    assert_eq!(pos.parser().unwrap().value_type(), "(i32, i32)");

    let mut reader = StringReader::new("3,x");
    assert!(pos.parser().unwrap().parse(&mut reader).is_err());
    assert_eq!(reader.cursor(), 0);

    assert!(validate_tree(&tree).is_empty());
}

#[test]
fn test_trees_are_shareable_across_threads() {
    let tree = Arc::new(sample_tree(Arc::new(AtomicI32::new(0))));
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let tree = Arc::clone(&tree);
            std::thread::spawn(move || {
                let session = Session::with("worker", &["counter.reset"]);
                tree.children().filter(|child| child.can_use(&session)).count()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), 3);
    }
}
