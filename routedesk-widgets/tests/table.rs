use routedesk_widgets::prelude::*;

#[derive(Debug, Clone, PartialEq)]
struct Patient {
    id: String,
    name: String,
    age: Option<u32>,
}

impl Patient {
    fn new(id: &str, name: &str, age: Option<u32>) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            age,
        }
    }
}

impl TableRow for Patient {
    fn id(&self) -> String {
        self.id.clone()
    }

    fn cell(&self, column: &str) -> CellValue {
        match column {
            "name" => self.name.as_str().into(),
            "age" => self.age.into(),
            _ => CellValue::Missing,
        }
    }
}

fn columns() -> Vec<Column> {
    vec![
        Column::new("name", "Name").sortable().filterable(),
        Column::new("age", "Age").sortable().filterable(),
    ]
}

fn ids(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

/// 25 rows: u01..u25, every fifth named "Group A", the rest "Group B".
fn many_rows() -> Vec<Patient> {
    (1..=25)
        .map(|i| {
            let name = if i % 5 == 0 { "Group A" } else { "Group B" };
            Patient::new(&format!("u{:02}", i), name, Some(20 + i))
        })
        .collect()
}

fn view_ids(table: &DataTable<Patient>) -> Vec<String> {
    table.view().rows.iter().map(|r| r.id.clone()).collect()
}

#[test]
fn test_default_page_size() {
    let table = DataTable::new(columns()).with_rows(many_rows());
    let view = table.view();
    assert_eq!(view.page_size, 10);
    assert_eq!(view.page_count, 3);
    assert_eq!(view.total_rows, 25);
    assert_eq!(view.rows.len(), 10);
}

#[test]
fn test_pagination_clamps_after_filter() {
    let table = DataTable::new(columns()).with_rows(many_rows());
    assert!(table.next_page());
    assert_eq!(table.page_index(), 1);

    table.set_filter("name", "Group A");
    assert_eq!(table.page_index(), 0);
    let view = table.view();
    assert_eq!(view.total_rows, 5);
    assert_eq!(view.page_count, 1);
    assert!(!table.can_next_page());
}

#[test]
fn test_page_navigation_bounds() {
    let table = DataTable::new(columns()).with_rows(many_rows());
    assert!(!table.previous_page());
    table.set_page(99);
    assert_eq!(table.page_index(), 2);
    assert_eq!(table.view().rows.len(), 5);
    assert!(!table.next_page());
    assert!(table.previous_page());
    assert_eq!(table.page_index(), 1);
}

#[test]
fn test_page_size_change_keeps_first_row_visible() {
    let table = DataTable::new(columns()).with_rows(many_rows());
    table.set_page(2);
    table.set_page_size(5);
    // First row of page 2 at size 10 was row 20
    assert_eq!(table.page_index(), 4);
    assert_eq!(view_ids(&table)[0], "u21");
}

#[test]
fn test_value_before_rows_is_kept() {
    let table: DataTable<Patient> = DataTable::new(columns());
    table.set_value(&ids(&["u1", "u3"]));

    table.set_rows(vec![
        Patient::new("u1", "Ana", Some(30)),
        Patient::new("u2", "Bruno", Some(40)),
        Patient::new("u3", "Carla", None),
    ]);

    assert_eq!(table.selected_ids(), ids(&["u1", "u3"]));
    assert!(table.events().is_empty());
    assert_eq!(table.selection_summary(), SelectionSummary::Some);
}

#[test]
fn test_set_rows_keeps_orphaned_ids() {
    let table = DataTable::new(columns()).with_rows(vec![Patient::new("u1", "Ana", None)]);
    table.toggle_row("u1");
    table.set_rows(Vec::new());
    assert_eq!(table.selected_ids(), ids(&["u1"]));
    assert_eq!(table.selection_summary(), SelectionSummary::None);
}

#[test]
fn test_toggle_row_twice_emits_two_events() {
    let table = DataTable::new(columns()).with_rows(many_rows());
    table.toggle_row("u01");
    table.toggle_row("u01");

    let events = table.events().drain();
    assert_eq!(events.len(), 2);
    assert!(matches!(&events[0], WidgetEvent::SelectionChange { ids, .. } if ids.len() == 1));
    assert!(matches!(&events[1], WidgetEvent::SelectionChange { ids, .. } if ids.is_empty()));
    assert!(table.selected_ids().is_empty());
}

#[test]
fn test_page_toggle_is_one_change() {
    let table = DataTable::new(columns()).with_rows(many_rows());
    table.toggle_row("u02");
    table.events().drain();

    assert_eq!(table.toggle_page_selection(), SelectionOutcome::Changed);
    assert_eq!(table.selection_summary(), SelectionSummary::All);
    assert_eq!(table.selected_ids().len(), 10);
    assert_eq!(table.events().drain().len(), 1);

    assert_eq!(table.toggle_page_selection(), SelectionOutcome::Changed);
    assert_eq!(table.selection_summary(), SelectionSummary::None);
    assert_eq!(table.events().drain().len(), 1);
}

#[test]
fn test_page_toggle_respects_limit() {
    let table = DataTable::new(columns())
        .with_config(TableConfig::default().with_max_selected(5))
        .with_rows(many_rows());

    assert_eq!(table.toggle_page_selection(), SelectionOutcome::LimitReached(5));
    assert!(table.selected_ids().is_empty());
    let events = table.events().drain();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind(), WidgetEventKind::LimitReached);
}

#[test]
fn test_flag_and_selection_are_independent() {
    let table = DataTable::new(columns()).with_rows(many_rows());

    table.toggle_flag("u03");
    assert!(table.selected_ids().is_empty());
    assert!(table.is_flagged("u03"));

    table.toggle_row("u04");
    table.set_flag("u04", true);
    table.toggle_row("u04");
    assert!(!table.is_selected("u04"));
    assert!(table.is_flagged("u04"));
}

#[test]
fn test_flag_change_carries_full_map() {
    let table = DataTable::new(columns()).with_rows(many_rows());
    table.set_flags([("u01", true), ("u02", false)].into_iter().collect());

    table.set_flag("u05", true);
    let events = table.events().drain();
    assert_eq!(events.len(), 1);
    match &events[0] {
        WidgetEvent::FlagChange { flags, .. } => {
            assert_eq!(flags.len(), 3);
            assert!(flags.is_flagged("u01"));
            assert!(flags.is_flagged("u05"));
            assert_eq!(flags.get("u02"), Some(false));
        }
        other => panic!("unexpected event: {:?}", other),
    }

    // Setting the same value again is not a change
    table.set_flag("u05", true);
    assert!(table.events().is_empty());
}

#[test]
fn test_flag_echo_is_skipped() {
    let table = DataTable::new(columns()).with_rows(many_rows());
    table.toggle_flag("u01");
    let emitted = match table.events().drain().pop() {
        Some(WidgetEvent::FlagChange { flags, .. }) => flags,
        other => panic!("unexpected event: {:?}", other),
    };

    table.set_flags(emitted.clone());
    assert_eq!(table.flags(), emitted);

    table.set_flags(FlagMap::new());
    assert!(table.flags().is_empty());
    assert!(table.events().is_empty());
}

#[test]
fn test_sort_cycles_and_is_stable() {
    let table = DataTable::new(columns()).with_rows(vec![
        Patient::new("a", "Same", Some(40)),
        Patient::new("b", "Same", None),
        Patient::new("c", "Same", Some(30)),
        Patient::new("d", "Other", Some(30)),
    ]);

    assert_eq!(table.toggle_sort("name", false), Some(SortDirection::Asc));
    assert_eq!(view_ids(&table), ids(&["d", "a", "b", "c"]));

    assert_eq!(table.toggle_sort("age", true), Some(SortDirection::Asc));
    assert_eq!(view_ids(&table), ids(&["d", "c", "a", "b"]));

    assert_eq!(table.toggle_sort("age", true), Some(SortDirection::Desc));
    assert_eq!(view_ids(&table), ids(&["d", "a", "c", "b"]));

    assert_eq!(table.toggle_sort("age", true), None);
    assert_eq!(table.sort(), vec![SortKey::asc("name")]);

    assert_eq!(table.toggle_sort("name", false), Some(SortDirection::Desc));
    assert_eq!(table.toggle_sort("name", false), None);
    assert_eq!(view_ids(&table), ids(&["a", "b", "c", "d"]));
}

#[test]
fn test_set_sort_replaces_chain_and_clear_sort_restores_order() {
    let table = DataTable::new(columns()).with_rows(vec![
        Patient::new("a", "Same", Some(40)),
        Patient::new("b", "Same", None),
        Patient::new("c", "Same", Some(30)),
        Patient::new("d", "Other", Some(30)),
    ]);

    table.set_sort(vec![
        SortKey::desc("age"),
        SortKey::asc("name"),
        SortKey::asc("ward"),
    ]);
    assert_eq!(table.sort(), vec![SortKey::desc("age"), SortKey::asc("name")]);
    assert_eq!(view_ids(&table), ids(&["a", "d", "c", "b"]));

    table.clear_sort();
    assert!(table.sort().is_empty());
    assert_eq!(view_ids(&table), ids(&["a", "b", "c", "d"]));
}

#[test]
fn test_unsortable_column_is_ignored() {
    let table = DataTable::new(vec![Column::new("name", "Name")])
        .with_rows(vec![Patient::new("b", "B", None), Patient::new("a", "A", None)]);
    assert_eq!(table.toggle_sort("name", false), None);
    assert_eq!(table.toggle_sort("missing", false), None);
    assert_eq!(view_ids(&table), ids(&["b", "a"]));
}

#[test]
fn test_numeric_filter_matches_display_string() {
    let table = DataTable::new(columns()).with_rows(vec![
        Patient::new("a", "Ana", Some(31)),
        Patient::new("b", "Bo", Some(45)),
        Patient::new("c", "Cy", None),
    ]);
    table.set_filter("age", "3");
    assert_eq!(view_ids(&table), ids(&["a"]));

    table.set_filter("age", "");
    assert_eq!(table.filter("age"), None);
    assert_eq!(view_ids(&table).len(), 3);
}

#[test]
fn test_set_rows_resets_page_only_by_default() {
    let table = DataTable::new(columns()).with_rows(many_rows());
    table.toggle_sort("age", false);
    table.set_filter("name", "Group");
    table.next_page();

    table.set_rows(many_rows());
    assert_eq!(table.page_index(), 0);
    assert_eq!(table.sort(), vec![SortKey::asc("age")]);
    assert_eq!(table.filter("name").as_deref(), Some("Group"));

    let table = DataTable::new(columns())
        .with_config(TableConfig::default().reset_on_rows(ViewReset::All))
        .with_rows(many_rows());
    table.toggle_sort("age", false);
    table.set_filter("name", "Group");
    table.set_rows(many_rows());
    assert!(table.sort().is_empty());
    assert_eq!(table.filter("name"), None);
}

#[test]
fn test_selection_echo_is_skipped() {
    let table = DataTable::new(columns()).with_rows(many_rows());
    table.toggle_row("u01");
    table.toggle_row("u02");
    let emitted = match table.events().drain().pop() {
        Some(WidgetEvent::SelectionChange { ids, .. }) => ids,
        other => panic!("unexpected event: {:?}", other),
    };

    table.set_value(&emitted);
    assert_eq!(table.selected_ids(), ids(&["u01", "u02"]));
    assert!(table.events().is_empty());
}
