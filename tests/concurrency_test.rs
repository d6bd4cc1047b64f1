//! Shared registry accessed from several threads

mod common;

use std::sync::Arc;
use std::thread;

use common::model;
use treemodel::util::testing;
use treemodel::{NodeId, TreeModelRegistry};

fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn given_registry_type_then_it_is_send_and_sync() {
    assert_send_sync::<TreeModelRegistry>();
    assert_send_sync::<NodeId>();
    assert_send_sync::<treemodel::ModelRef>();
}

#[test]
fn given_parallel_writers_when_adding_then_every_id_is_distinct_and_registered() {
    testing::init_test_setup();
    let reg = Arc::new(TreeModelRegistry::new());
    let top = reg.add_child(&NodeId::ROOT, model("top")).unwrap();

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let reg = Arc::clone(&reg);
            let top = top.clone();
            thread::spawn(move || {
                (0..50)
                    .map(|i| reg.add_child(&top, model(&format!("{t}-{i}"))).unwrap())
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut ids: Vec<NodeId> = handles
        .into_iter()
        .flat_map(|h| h.join().unwrap())
        .collect();
    assert_eq!(ids.len(), 400);
    ids.sort_by(|a, b| a.as_str().cmp(b.as_str()));
    ids.dedup();
    assert_eq!(ids.len(), 400);

    assert_eq!(reg.children_of(&top).len(), 400);
    assert_eq!(reg.node_for_id(&top).unwrap().children().len(), 400);
    assert_eq!(reg.len(), 401);
}

#[test]
fn given_readers_and_writers_when_running_together_then_reads_stay_consistent() {
    testing::init_test_setup();
    let reg = Arc::new(TreeModelRegistry::new());

    let writer = {
        let reg = Arc::clone(&reg);
        thread::spawn(move || {
            for i in 0..100 {
                let id = reg.add_child(&NodeId::ROOT, model(&i.to_string())).unwrap();
                reg.add_child(&id, model("leaf")).unwrap();
                if i % 2 == 0 {
                    reg.remove_child(&id);
                }
            }
        })
    };

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let reg = Arc::clone(&reg);
            thread::spawn(move || {
                for _ in 0..200 {
                    for id in reg.children_of(&NodeId::ROOT) {
                        // a concurrent removal may win; a present node is whole
                        if let Some(node) = reg.node_for_id(&id) {
                            assert!(node.children().len() <= 1);
                        }
                        for child in reg.children_of(&id) {
                            assert!(reg.parent_of(&child) == id || !reg.contains(&child));
                        }
                    }
                    reg.walk(|parent_id, _, id, _| {
                        assert_ne!(parent_id, id);
                    });
                }
            })
        })
        .collect();

    writer.join().unwrap();
    for reader in readers {
        reader.join().unwrap();
    }

    assert_eq!(reg.children_of(&NodeId::ROOT).len(), 50);
    assert_eq!(reg.len(), 100);
}
