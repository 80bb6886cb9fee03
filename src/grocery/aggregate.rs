//! Read-path fold over raw grocery rows.
//!
//! Rows are written one per (meal, ingredient) with no write-time dedup, so
//! a week's list usually holds the same ingredient many times. For display
//! the rows collapse by case-insensitive name; quantities are joined as
//! distinct strings in first-seen order. This is a presentation fold, not a
//! unit-aware merge: two "2 cups" rows collapse to one "2 cups" entry, they
//! are never summed to "4 cups".

use serde::Serialize;
use uuid::Uuid;

use super::repo::GroceryItem;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DisplayItem {
    pub id: Uuid,
    pub item_name: String,
    pub quantity: String,
    pub is_purchased: bool,
    pub notes: Option<String>,
}

pub fn aggregate(items: &[GroceryItem]) -> Vec<DisplayItem> {
    struct Group {
        first: DisplayItem,
        quantities: Vec<String>,
    }

    let mut order: Vec<String> = Vec::new();
    let mut groups: std::collections::HashMap<String, Group> = std::collections::HashMap::new();

    for item in items {
        let key = item.item_name.to_lowercase();
        let group = groups.entry(key.clone()).or_insert_with(|| {
            order.push(key);
            Group {
                first: DisplayItem {
                    id: item.id,
                    item_name: item.item_name.clone(),
                    quantity: String::new(),
                    is_purchased: item.is_purchased,
                    notes: item.notes.clone(),
                },
                quantities: Vec::new(),
            }
        });
        if !group.quantities.contains(&item.quantity) {
            group.quantities.push(item.quantity.clone());
        }
    }

    order
        .into_iter()
        .map(|key| {
            let group = groups.remove(&key).expect("group exists for ordered key");
            let mut display = group.first;
            display.quantity = group.quantities.join(", ");
            display
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;
    use time::OffsetDateTime;

    fn item(name: &str, quantity: &str) -> GroceryItem {
        GroceryItem {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            plan_id: None,
            week_start_date: date!(2024 - 01 - 07),
            item_name: name.into(),
            quantity: quantity.into(),
            is_purchased: false,
            notes: None,
            created_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn collapses_case_insensitive_duplicates() {
        let items = vec![item("Tomato", "2 cups"), item("tomato", "1 unit")];
        let display = aggregate(&items);

        assert_eq!(display.len(), 1);
        assert_eq!(display[0].item_name, "Tomato");
        assert_eq!(display[0].quantity, "2 cups, 1 unit");
    }

    #[test]
    fn identical_quantities_appear_once() {
        let items = vec![
            item("Eggs", "1 unit"),
            item("eggs", "1 unit"),
            item("EGGS", "1 unit"),
        ];
        let display = aggregate(&items);

        assert_eq!(display.len(), 1);
        assert_eq!(display[0].quantity, "1 unit");
    }

    #[test]
    fn no_quantity_arithmetic_is_attempted() {
        let items = vec![item("Flour", "2 cups"), item("flour", "2 cups")];
        let display = aggregate(&items);
        assert_eq!(display[0].quantity, "2 cups");
    }

    #[test]
    fn grouping_is_order_independent() {
        let a = item("Tomato", "2 cups");
        let b = item("Onion", "1 unit");
        let c = item("tomato", "1 unit");

        let forward = aggregate(&[a.clone(), b.clone(), c.clone()]);
        let shuffled = aggregate(&[c, b, a]);

        // Same groups and same merged quantities regardless of row order;
        // only the first-seen representative and ordering may differ.
        let mut forward_keys: Vec<(String, usize)> = forward
            .iter()
            .map(|d| {
                (
                    d.item_name.to_lowercase(),
                    d.quantity.split(", ").count(),
                )
            })
            .collect();
        let mut shuffled_keys: Vec<(String, usize)> = shuffled
            .iter()
            .map(|d| {
                (
                    d.item_name.to_lowercase(),
                    d.quantity.split(", ").count(),
                )
            })
            .collect();
        forward_keys.sort();
        shuffled_keys.sort();
        assert_eq!(forward_keys, shuffled_keys);
    }

    #[test]
    fn representative_fields_come_from_first_row() {
        let mut first = item("Basil", "1 bunch");
        first.is_purchased = true;
        first.notes = Some("fresh".into());
        let second = item("basil", "2 bunches");

        let display = aggregate(&[first.clone(), second]);
        assert_eq!(display[0].id, first.id);
        assert!(display[0].is_purchased);
        assert_eq!(display[0].notes.as_deref(), Some("fresh"));
    }

    #[test]
    fn preserves_first_seen_order_across_groups() {
        let items = vec![
            item("Rice", "1 unit"),
            item("Beans", "1 unit"),
            item("rice", "2 cups"),
        ];
        let display = aggregate(&items);
        let names: Vec<&str> = display.iter().map(|d| d.item_name.as_str()).collect();
        assert_eq!(names, vec!["Rice", "Beans"]);
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(aggregate(&[]).is_empty());
    }
}
