use tabswitch::managers::tab_registry::{TabRegistry, TabRegistryTrait};
use tabswitch::types::tab::Tab;

fn tab(id: i32, title: &str) -> Tab {
    Tab {
        id,
        window_id: 1,
        title: title.to_string(),
        url: format!("https://{}.test/", title),
        favicon_url: None,
        active: false,
    }
}

#[test]
fn test_push_appends_as_most_recent() {
    let mut reg = TabRegistry::new(7);
    reg.push(tab(1, "a"));
    reg.push(tab(2, "b"));
    assert_eq!(reg.get_active().unwrap().id, 2);
    assert_eq!(reg.get_previously_active().unwrap().id, 1);
}

#[test]
fn test_push_existing_moves_without_duplicating() {
    let mut reg = TabRegistry::new(7);
    reg.push(tab(1, "a"));
    reg.push(tab(2, "b"));
    reg.push(tab(1, "a"));

    let ids: Vec<i32> = reg.get_tabs().iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![2, 1]);
    assert_eq!(reg.tab_count(), 2);
}

#[test]
fn test_push_under_top_preserves_active_slot() {
    let mut reg = TabRegistry::new(7);
    reg.push(tab(1, "a"));
    reg.push(tab(2, "b"));
    // Opened in the background via middle-click
    reg.push_under_top(tab(3, "c"));

    let ids: Vec<i32> = reg.get_tabs().iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![1, 3, 2]);
    assert_eq!(reg.get_active().unwrap().id, 2);
}

#[test]
fn test_push_under_top_on_empty_registry() {
    let mut reg = TabRegistry::new(7);
    reg.push_under_top(tab(1, "a"));
    assert_eq!(reg.tab_count(), 1);
}

#[test]
fn test_remove_is_idempotent() {
    let mut reg = TabRegistry::new(7);
    reg.push(tab(1, "a"));
    reg.push(tab(2, "b"));

    reg.remove(1);
    reg.remove(1);
    reg.remove(99);

    let ids: Vec<i32> = reg.get_tabs().iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![2]);
}

#[test]
fn test_remove_clears_initialized_flag() {
    let mut reg = TabRegistry::new(7);
    let t = tab(1, "a");
    reg.push(t.clone());
    reg.add_to_initialized(&t);
    assert!(reg.is_initialized(&t));

    reg.remove(1);
    assert!(!reg.is_initialized(&t));
}

#[test]
fn test_update_refreshes_snapshot_without_reordering() {
    let mut reg = TabRegistry::new(7);
    reg.push(tab(1, "a"));
    reg.push(tab(2, "b"));

    let mut navigated = tab(1, "a-after-navigation");
    navigated.url = "https://elsewhere.test/".to_string();
    reg.update(navigated);

    let tabs = reg.get_tabs();
    assert_eq!(tabs[0].title, "a-after-navigation");
    assert_eq!(tabs[0].url, "https://elsewhere.test/");
    // Order unchanged: tab 2 still most recent
    assert_eq!(reg.get_active().unwrap().id, 2);
}

#[test]
fn test_update_absent_id_is_noop() {
    let mut reg = TabRegistry::new(7);
    reg.push(tab(1, "a"));
    reg.update(tab(9, "ghost"));
    assert_eq!(reg.tab_count(), 1);
}

#[test]
fn test_get_tabs_returns_defensive_copy() {
    let mut reg = TabRegistry::new(7);
    reg.push(tab(1, "a"));

    let mut copy = reg.get_tabs();
    copy[0].title = "mutated".to_string();
    copy.clear();

    assert_eq!(reg.get_tabs()[0].title, "a");
}

#[test]
fn test_get_tabs_to_show_caps_and_reverses() {
    let mut reg = TabRegistry::new(3);
    for id in 1..=5 {
        reg.push(tab(id, &format!("t{}", id)));
    }

    let shown = reg.get_tabs_to_show();
    assert_eq!(shown.len(), 3);
    let ids: Vec<i32> = shown.iter().map(|t| t.id).collect();
    // Most recently active first
    assert_eq!(ids, vec![5, 4, 3]);
    assert_eq!(shown[0].id, reg.get_active().unwrap().id);
}

#[test]
fn test_get_tabs_to_show_with_short_history() {
    let mut reg = TabRegistry::new(7);
    reg.push(tab(1, "a"));
    assert_eq!(reg.get_tabs_to_show().len(), 1);

    let empty = TabRegistry::new(7);
    assert!(empty.get_tabs_to_show().is_empty());
}

#[test]
fn test_set_number_of_tabs_to_show_applies_live() {
    let mut reg = TabRegistry::new(2);
    for id in 1..=4 {
        reg.push(tab(id, &format!("t{}", id)));
    }
    assert_eq!(reg.get_tabs_to_show().len(), 2);

    reg.set_number_of_tabs_to_show(4);
    assert_eq!(reg.get_tabs_to_show().len(), 4);
    // History was never truncated by the smaller cap
    assert_eq!(reg.tab_count(), 4);
}

#[test]
fn test_accessors_on_empty_registry() {
    let reg = TabRegistry::new(7);
    assert!(reg.get_active().is_none());
    assert!(reg.get_previously_active().is_none());
    assert!(reg.find_backward(&|_| true).is_none());
}

#[test]
fn test_find_backward_scans_most_recent_first() {
    let mut reg = TabRegistry::new(7);
    reg.push(tab(1, "a"));
    reg.push(tab(2, "b"));
    reg.push(tab(3, "c"));

    // Skipping the active tab finds the previously active one
    let found = reg.find_backward(&|t| t.id != 3).unwrap();
    assert_eq!(found.id, 2);

    assert!(reg.find_backward(&|t| t.id == 99).is_none());
}

#[test]
fn test_on_update_fires_on_order_changes() {
    use std::cell::RefCell;
    use std::rc::Rc;

    let calls: Rc<RefCell<Vec<Vec<String>>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = calls.clone();

    let mut reg = TabRegistry::new(7);
    reg.set_on_update(Box::new(move |saved| {
        sink.borrow_mut()
            .push(saved.iter().map(|s| s.title.clone()).collect());
    }));

    reg.push(tab(1, "a"));
    reg.push(tab(2, "b"));
    reg.remove(1);

    let seen = calls.borrow();
    assert_eq!(seen.len(), 3);
    assert_eq!(seen[2], vec!["b".to_string()]);
}

#[test]
fn test_on_update_not_fired_for_absent_remove() {
    use std::cell::RefCell;
    use std::rc::Rc;

    let count = Rc::new(RefCell::new(0));
    let sink = count.clone();

    let mut reg = TabRegistry::new(7);
    reg.set_on_update(Box::new(move |_| *sink.borrow_mut() += 1));
    reg.remove(42);
    assert_eq!(*count.borrow(), 0);
}
