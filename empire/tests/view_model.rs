mod common;
use common::{init_tracing, transitions, watcher};
use empire::*;
use std::sync::{Arc, Mutex};

#[test]
fn test_fan_out_delivers_whole_batch_to_each_listener() {
    init_tracing();
    let vm = ViewModel::new();
    let (first, check_first) = watcher();
    let (second, check_second) = watcher();
    vm.add_listener(first);
    vm.add_listener(second);

    let e1 = Change::new(ChangeEvent::new(2, 1, Some("e1".to_string())));
    let e2 = Change::new(ChangeEvent::new("b".to_string(), "a".to_string(), Some("e2".to_string())));
    vm.notify_changes(vec![e1, e2]);

    for batches in [check_first(), check_second()] {
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].names().collect::<Vec<_>>(), ["e1", "e2"]);
        assert_eq!(batches[0][0].new_value::<i32>(), Some(&2));
        assert_eq!(batches[0][1].old_value::<String>().map(String::as_str), Some("a"));
    }
}

#[test]
fn test_age_scenario() {
    init_tracing();
    let vm = ViewModel::new();
    let (listener, check) = watcher();
    let _guard = vm.listen(listener);

    let mut age = vm.named_property("age", 10);
    age.set(20);
    age.set(25);
    age.reset();

    assert_eq!(age, 10);
    let history: Vec<Vec<(i32, i32)>> = check().iter().map(transitions::<i32>).collect();
    assert_eq!(history, [[(10, 20)], [(20, 25)], [(25, 10)]]);
}

#[test]
fn test_listener_filters_by_name() {
    let vm = ViewModel::new();
    let renders = Arc::new(Mutex::new(Vec::new()));
    let _guard = {
        let renders = renders.clone();
        vm.listen(move |changes: &ChangeSet| {
            if changes.contains("age") {
                renders.lock().unwrap().push(changes.len());
            }
        })
    };

    let mut name = vm.named_property("name", "Buffy");
    let mut age = vm.named_property("age", 29u32);
    name.set("Willow");
    age.set(30);
    vm.batch(|| {
        name.set("Xander");
        age.set(31);
    });

    assert_eq!(*renders.lock().unwrap(), [1, 2]);
}

#[test]
fn test_mixed_property_types_in_one_batch() {
    let vm = ViewModel::new();
    let (listener, check) = watcher();
    vm.add_listener(listener);

    let mut loading = vm.bool_property(false);
    let mut items = vm.list_property(Vec::<u8>::new());
    let mut label = vm.named_property("label", String::new());

    {
        let _scope = vm.begin_batch();
        loading.set_true();
        items.add(1);
        label.set("one".to_string());
    }

    let batches = check();
    assert_eq!(batches.len(), 1);
    let batch = &batches[0];
    assert!(batch[0].is::<bool>());
    assert!(batch[1].is::<Vec<u8>>());
    assert_eq!(batch[2].new_value::<String>().map(String::as_str), Some("one"));
}

#[test]
fn test_properties_share_hub_across_clones() {
    let vm = ViewModel::new();
    let handle = vm.clone();
    let (listener, check) = watcher();
    let id = handle.add_listener(listener);

    let mut count = vm.property(0);
    count.set(1);
    assert_eq!(check().len(), 1);
    assert_eq!(vm.listener_count(), 1);
    assert!(count.view_model().is_some());

    assert!(vm.remove_listener(id));
    count.set(2);
    assert!(check().is_empty());
}

#[test]
fn test_std_channel_listener() {
    let vm = ViewModel::new();
    let (tx, rx) = std::sync::mpsc::channel::<ChangeSet>();
    let _guard = vm.listen(tx);

    let mut flag = vm.nullable_bool_property(None);
    flag.set_true();

    let changes = rx.try_recv().unwrap();
    assert_eq!(transitions::<Option<bool>>(&changes), [(None, Some(true))]);
    assert!(rx.try_recv().is_err());
}

#[cfg(feature = "tokio")]
#[tokio::test]
async fn test_tokio_channel_listener() {
    let vm = ViewModel::new();
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<ChangeSet>();
    let _guard = vm.listen(tx);

    let mut count = vm.named_property("count", 1u64);
    vm.batch(|| {
        count.set(2);
        count.set(3);
    });

    let changes = rx.recv().await.unwrap();
    assert_eq!(transitions::<u64>(&changes), [(1, 2), (2, 3)]);
    assert!(rx.try_recv().is_err());
}

#[test]
fn test_listener_added_during_delivery_waits_for_next_batch() {
    let vm = ViewModel::new();
    let late = Arc::new(Mutex::new(0));
    let guards = Arc::new(Mutex::new(Vec::new()));
    {
        let weak = vm.downgrade();
        let late = late.clone();
        let guards = guards.clone();
        vm.add_listener(move |_: &ChangeSet| {
            let late = late.clone();
            if let Some(vm) = weak.upgrade() {
                guards.lock().unwrap().push(vm.listen(move |_: &ChangeSet| *late.lock().unwrap() += 1));
            }
        });
    }

    let mut value = vm.property(0);
    value.set(1);
    assert_eq!(*late.lock().unwrap(), 0);

    value.set(2);
    assert_eq!(*late.lock().unwrap(), 1);
}
