//! This demo derives UI rows from a normalized store. Two views bind to the
//! same shared key, so whichever renders first computes the rows and the
//! other one reuses them.

use std::collections::{HashMap, HashSet};

use reselect::{create_selector_eq, CachePolicy, Memo, Store};

#[derive(Clone, PartialEq)]
struct Item {
    title: String,
    count: u32,
}

#[derive(Default)]
struct State {
    items: HashMap<u32, Item>,
    order: Vec<u32>,
    favorites: HashSet<u32>,
    scroll: f32,
}

fn rows() -> Memo<State, Vec<String>> {
    create_selector_eq(
        (
            |state: &State| state.items.clone(),
            |state: &State| state.order.clone(),
            |state: &State| state.favorites.clone(),
        ),
        CachePolicy::shared("items::rows"),
        |(items, order, favorites): &(HashMap<u32, Item>, Vec<u32>, HashSet<u32>)| {
            println!("building rows");
            order
                .iter()
                .filter_map(|id| Some((id, items.get(id)?)))
                .map(|(id, item)| {
                    let star = if favorites.contains(id) { "*" } else { " " };
                    format!("{star} {} ({})", item.title, item.count)
                })
                .collect()
        },
    )
}

fn main() {
    let mut list = rows();
    let mut sidebar = rows();

    let mut state = State::default();
    state.items.insert(1, Item { title: "Apples".into(), count: 3 });
    state.items.insert(2, Item { title: "Pears".into(), count: 5 });
    state.order = vec![2, 1];
    state.favorites.insert(1);

    // [Miss] The list renders first and builds the rows.
    println!("{:?}", list.evaluate(&state));

    // [Hit] The sidebar reuses them.
    println!("{:?}", sidebar.evaluate(&state));

    // [Hit] Scrolling does not affect the rows.
    state.scroll = 250.0;
    println!("{:?} at {}", list.evaluate(&state), state.scroll);

    drop(list);
    drop(sidebar);
    assert!(Store::global().is_empty());
}
