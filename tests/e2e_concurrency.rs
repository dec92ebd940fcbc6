//! End-to-end tests for concurrent access.
//!
//! Worker threads share one tree through views. These tests rely only on
//! per-call atomicity; none of them assumes a read followed by a write is
//! atomic.

use std::cell::RefCell;
use std::sync::mpsc;
use std::sync::Arc;
use std::sync::Barrier;
use std::thread;
use std::time::Duration;

use pretty_assertions::assert_eq;
use proptree::{Actor, ConstRef, FromProp, PathMeta, PropTree, Ref, ToProp, Worker};

const WORKERS: usize = 8;
const WRITES: usize = 200;

// ============================================================================
// Helper: a worker that publishes status under its own subtree
// ============================================================================

struct StatusWorker {
    view: Ref,
    done: usize,
}

impl Worker for StatusWorker {
    fn run(&mut self) {
        for i in 0..WRITES {
            self.view.set(&format!("counters.{i}"), i);
            self.done += 1;
        }
        self.view.set("state", "finished");
    }
}

// ============================================================================
// 1. Disjoint writers
// ============================================================================

#[test]
fn test_disjoint_writers_via_actors() {
    let tree = PropTree::new();
    let root = tree.root("main");

    let mut actors: Vec<Actor<StatusWorker>> = (0..WORKERS)
        .map(|n| {
            let view = root.subtree_for_sub_id(&format!("workers.{n}"), &format!("w{n}"));
            Actor::new(format!("status-{n}"), StatusWorker { view, done: 0 })
        })
        .collect();

    for actor in &mut actors {
        actor.start().unwrap();
    }
    for actor in &mut actors {
        assert!(actor.join().unwrap());
        assert_eq!(actor.worker().unwrap().done, WRITES);
    }

    let workers = tree.const_root("check").subtree("workers");
    assert_eq!(workers.list_keys(false).len(), WORKERS);
    for n in 0..WORKERS {
        let w = workers.subtree(&n.to_string());
        assert_eq!(w.get::<String>("state").unwrap(), "finished");
        assert_eq!(w.subtree("counters").list_keys(false).len(), WRITES);
        assert_eq!(w.get::<usize>("counters.199").unwrap(), 199);
    }
    assert_eq!(tree.len(), WORKERS * (WRITES + 1));
}

// ============================================================================
// 2. Contended single key
// ============================================================================

#[test]
fn test_contended_key_always_holds_a_whole_value() {
    let tree = PropTree::new();
    let barrier = Arc::new(Barrier::new(WORKERS));

    let handles: Vec<_> = (0..WORKERS)
        .map(|n| {
            let view = tree.root("writer").reidfy(&n.to_string());
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for _ in 0..WRITES {
                    view.set("shared.owner", n);
                    let seen: usize = view.get("shared.owner").unwrap();
                    assert!(seen < WORKERS);
                }
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }

    let owner: usize = tree.const_root("check").get("shared.owner").unwrap();
    assert!(owner < WORKERS);
}

// ============================================================================
// 3. Enumeration during writes
// ============================================================================

#[test]
fn test_enumeration_sees_consistent_snapshots() {
    let tree = PropTree::new();
    let writer = tree.root("writer").subtree("items");
    let reader = tree.const_root("reader").subtree("items");

    let mut producer = Actor::new("producer", move || {
        for i in 0..WRITES {
            writer.set(&format!("{i:04}.id"), i);
            writer.set(&format!("{i:04}.ready"), true);
        }
    });
    producer.start().unwrap();

    let mut last = 0;
    while producer.is_running() {
        let keys = reader.list_keys_recursive(false);
        // Items are written in order, so any snapshot is a prefix.
        assert!(keys.len() >= last);
        for (idx, key) in keys.iter().enumerate() {
            let item = idx / 2;
            let field = if idx % 2 == 0 { "id" } else { "ready" };
            assert_eq!(key, &format!("{item:04}.{field}"));
        }
        last = keys.len();
        if last == WRITES * 2 {
            break;
        }
        thread::yield_now();
    }
    assert!(producer.join().unwrap());
    assert_eq!(reader.list_keys(false).len(), WRITES);
}

// ============================================================================
// 4. Clear while others read
// ============================================================================

#[test]
fn test_clear_races_with_readers_without_panicking() {
    let tree = PropTree::new();
    tree.root("seed").set("flag", true);

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let view = tree.const_root("reader");
            thread::spawn(move || {
                for _ in 0..WRITES {
                    let _ = view.get_or("flag", false);
                    let _ = view.list_keys(true);
                }
            })
        })
        .collect();

    for _ in 0..50 {
        tree.clear();
        tree.root("seed").set("flag", true);
    }
    for r in readers {
        r.join().unwrap();
    }
    assert!(tree.const_root("check").get::<bool>("flag").unwrap());
}

#[test]
fn test_views_outlive_tree_handle() {
    let view = {
        let tree = PropTree::new();
        tree.root("owner").subtree("kept")
    };
    view.set("alive", true);
    let reader = view.tree().const_root("reader");
    assert!(reader.get::<bool>("kept.alive").unwrap());
}

// ============================================================================
// 5. Conversions that read the tree
// ============================================================================

/// Renders as whatever `src` currently holds in the tree it points at.
struct Mirror(ConstRef);

impl ToProp for Mirror {
    fn to_prop(&self) -> Option<String> {
        Some(self.0.get_or("src", String::new()))
    }
}

thread_local! {
    static ALIAS_SCOPE: RefCell<Option<ConstRef>> = const { RefCell::new(None) };
}

/// Stored text names another key; reading resolves it through the tree.
#[derive(Debug, PartialEq)]
struct Alias(String);

impl FromProp for Alias {
    fn from_prop(text: &str) -> Option<Self> {
        ALIAS_SCOPE.with(|scope| {
            let scope = scope.borrow();
            scope.as_ref()?.get_optional::<String>(text).map(Alias)
        })
    }
}

/// Runs `f` on its own thread and reports whether it finished in time.
fn finishes_within<F: FnOnce() + Send + 'static>(f: F) -> bool {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        f();
        let _ = tx.send(());
    });
    rx.recv_timeout(Duration::from_secs(3)).is_ok()
}

#[test]
fn test_setters_accept_values_that_read_the_tree() {
    let tree = PropTree::new();
    let root = tree.root("main");
    root.set("src", "mirrored");

    let writer = root.clone();
    assert!(finishes_within(move || {
        writer.set("dst", Mirror(writer.as_const()));
        writer.set_with_meta("dst_meta", Mirror(writer.as_const()), PathMeta::new().with_origin("env"));
        writer.subtree("src").set_value(Mirror(writer.as_const()));
    }), "setter blocked while converting");

    assert_eq!(root.get::<String>("dst").unwrap(), "mirrored");
    assert_eq!(root.get::<String>("dst_meta").unwrap(), "mirrored");
    assert_eq!(root.get::<String>("src").unwrap(), "mirrored");
}

#[test]
fn test_seeding_accepts_values_that_read_the_tree() {
    let tree = PropTree::new();
    tree.root("main").set("src", "seed");

    let mut seeded = tree.clone();
    let view = tree.const_root("mirror");
    assert!(finishes_within(move || {
        seeded.extend([("a", Mirror(view.clone())), ("b", Mirror(view))]);
    }), "extend blocked while converting");

    let check = tree.const_root("check");
    assert_eq!(check.get::<String>("a").unwrap(), "seed");
    assert_eq!(check.get::<String>("b").unwrap(), "seed");
}

#[test]
fn test_reads_accept_types_that_read_the_tree() {
    let tree = PropTree::new();
    let root = tree.root("main");
    root.set("target", "resolved");
    root.set("link", "target");

    let reader = tree.const_root("reader");
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        ALIAS_SCOPE.with(|scope| *scope.borrow_mut() = Some(reader.clone()));
        let _ = tx.send(reader.get::<Alias>("link").ok());
    });

    let got = rx.recv_timeout(Duration::from_secs(3)).expect("read blocked while converting");
    assert_eq!(got, Some(Alias("resolved".into())));
}
