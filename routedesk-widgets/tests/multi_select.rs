use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use routedesk_widgets::prelude::*;

/// Source returning two options derived from the query, recording each call.
#[derive(Default)]
struct EchoSource {
    queries: Mutex<Vec<String>>,
    fail: bool,
}

impl EchoSource {
    fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl OptionSource for EchoSource {
    async fn search(&self, query: &str) -> Result<Vec<SelectOption>, SearchError> {
        self.queries.lock().unwrap().push(query.to_string());
        if self.fail {
            return Err(SearchError::transport("connection reset"));
        }
        Ok(vec![
            SelectOption::new(format!("{query}-1"), format!("{query} one")),
            SelectOption::new(format!("{query}-2"), format!("{query} two")),
        ])
    }
}

const DELAY: Duration = Duration::from_millis(500);

fn picker_with_source(source: Arc<EchoSource>) -> (MultiSelect, ManualScheduler) {
    let scheduler = ManualScheduler::new();
    let picker = MultiSelect::new(Arc::new(scheduler.clone())).with_source(source);
    (picker, scheduler)
}

fn values(options: &[SelectOption]) -> Vec<String> {
    options.iter().map(|o| o.value.clone()).collect()
}

fn ids(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn static_options() -> Vec<SelectOption> {
    vec![
        SelectOption::new("u1", "Ana Ruiz").with_attribute("team", "north"),
        SelectOption::new("u2", "Bruno Costa").with_attribute("team", "south"),
        SelectOption::new("u3", "Carla Mendes").with_attribute("team", "north"),
        SelectOption::new("u4", "Dario Lima"),
    ]
}

#[test]
fn test_debounce_restarts_on_keystroke() {
    let source = Arc::new(EchoSource::default());
    let (picker, scheduler) = picker_with_source(Arc::clone(&source));
    picker.focus();

    picker.set_query("a");
    scheduler.advance(Duration::from_millis(400));
    picker.set_query("ab");
    scheduler.advance(Duration::from_millis(400));
    assert_eq!(scheduler.spawned_count(), 0);
    assert!(picker.is_debouncing());

    scheduler.advance(Duration::from_millis(100));
    assert_eq!(scheduler.spawned_count(), 1);
    assert!(picker.is_loading());

    scheduler.run_all_spawned();
    assert_eq!(source.queries(), ids(&["ab"]));
    assert_eq!(picker.phase(), SearchPhase::Settled);
    assert_eq!(values(&picker.options()), ids(&["ab-1", "ab-2"]));
}

#[test]
fn test_stale_results_are_discarded() {
    let source = Arc::new(EchoSource::default());
    let (picker, scheduler) = picker_with_source(source);
    picker.focus();

    for query in ["a", "ab", "abc"] {
        picker.set_query(query);
        scheduler.advance(DELAY);
    }
    assert_eq!(scheduler.spawned_count(), 3);
    assert_eq!(picker.generation(), 3);

    // "a" resolves, then "abc", then "ab" last
    assert!(scheduler.run_spawned(0));
    assert!(picker.is_loading());
    assert!(scheduler.run_spawned(2));
    assert!(!picker.is_loading());
    assert!(scheduler.run_spawned(1));

    assert_eq!(values(&picker.options()), ids(&["abc-1", "abc-2"]));
}

#[test]
fn test_no_search_without_focus() {
    let source = Arc::new(EchoSource::default());
    let (picker, scheduler) = picker_with_source(Arc::clone(&source));

    picker.set_query("ana");
    scheduler.advance(DELAY);
    assert_eq!(scheduler.spawned_count(), 0);
    assert_eq!(picker.phase(), SearchPhase::Idle);
}

#[test]
fn test_blur_cancels_pending_search() {
    let source = Arc::new(EchoSource::default());
    let (picker, scheduler) = picker_with_source(source);
    picker.focus();
    picker.set_query("ana");
    picker.blur();

    assert!(!picker.is_open());
    assert_eq!(scheduler.pending_timers(), 0);
    scheduler.advance(DELAY);
    assert_eq!(scheduler.spawned_count(), 0);
}

#[test]
fn test_clearing_query_keeps_previous_results() {
    let source = Arc::new(EchoSource::default());
    let (picker, scheduler) = picker_with_source(source);
    picker.focus();
    picker.set_query("ana");
    scheduler.advance(DELAY);
    scheduler.run_all_spawned();

    picker.set_query("");
    scheduler.advance(DELAY);
    assert_eq!(scheduler.spawned_count(), 1);
    assert_eq!(values(&picker.options()), ids(&["ana-1", "ana-2"]));
}

#[test]
fn test_trigger_on_focus_searches_empty_query() {
    let source = Arc::new(EchoSource::default());
    let (picker, scheduler) = picker_with_source(Arc::clone(&source));
    let picker =
        picker.with_config(MultiSelectConfig::default().trigger_search_on_focus());

    picker.focus();
    assert_eq!(scheduler.spawned_count(), 1);
    assert!(picker.is_loading());
    scheduler.run_all_spawned();
    assert_eq!(source.queries(), ids(&[""]));
}

#[test]
fn test_failed_search_shows_no_results() {
    let source = Arc::new(EchoSource::failing());
    let (picker, scheduler) = picker_with_source(source);
    picker.set_options(static_options());
    picker.focus();
    picker.set_query("ana");
    scheduler.advance(DELAY);
    scheduler.run_all_spawned();

    assert!(picker.options().is_empty());
    assert!(!picker.is_loading());
    assert_eq!(picker.phase(), SearchPhase::Settled);
    assert!(picker.events().is_empty());
}

#[test]
fn test_unmount_makes_inflight_search_a_noop() {
    let source = Arc::new(EchoSource::default());
    let (picker, scheduler) = picker_with_source(source);
    picker.focus();
    picker.set_query("ana");
    scheduler.advance(DELAY);

    picker.set_query("anab");
    picker.unmount();
    assert_eq!(scheduler.pending_timers(), 0);

    scheduler.run_all_spawned();
    assert!(picker.options().is_empty());
    assert!(!picker.is_mounted());
    assert!(picker.dispatch_search().is_none());
}

#[test]
fn test_manual_dispatch_and_apply() {
    let scheduler = ManualScheduler::new();
    let picker = MultiSelect::new(Arc::new(scheduler));

    let first = picker.dispatch_search().unwrap();
    let second = picker.dispatch_search().unwrap();
    assert!(second.generation > first.generation);

    assert!(picker.apply_results(second.generation, Ok(static_options())));
    assert!(!picker.apply_results(first.generation, Ok(Vec::new())));
    assert_eq!(picker.options().len(), 4);
}

#[test]
fn test_limit_reached_keeps_query() {
    let scheduler = ManualScheduler::new();
    let picker = MultiSelect::new(Arc::new(scheduler))
        .with_config(MultiSelectConfig::default().with_max_selected(2));
    picker.set_options(static_options());

    assert_eq!(picker.select_value("u1"), SelectionOutcome::Changed);
    assert_eq!(picker.select_value("u2"), SelectionOutcome::Changed);
    picker.events().drain();

    picker.set_query("Car");
    assert_eq!(picker.select_value("u3"), SelectionOutcome::LimitReached(2));

    assert_eq!(picker.selected_ids(), ids(&["u1", "u2"]));
    assert_eq!(picker.query(), "Car");
    let events = picker.events().drain();
    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], WidgetEvent::LimitReached { max: 2, .. }));
}

#[test]
fn test_select_emits_full_list_and_clears_query() {
    let scheduler = ManualScheduler::new();
    let picker = MultiSelect::new(Arc::new(scheduler));
    picker.set_options(static_options());

    picker.set_query("Ana");
    picker.select_value("u1");
    picker.select_value("u3");

    assert_eq!(picker.query(), "");
    let events = picker.events().drain();
    assert_eq!(events.len(), 2);
    assert_eq!(
        events[1],
        WidgetEvent::SelectionChange {
            widget_id: picker.id_string(),
            ids: ids(&["u1", "u3"]),
        }
    );
}

#[test]
fn test_echo_of_own_change_is_skipped() {
    let scheduler = ManualScheduler::new();
    let picker = MultiSelect::new(Arc::new(scheduler));
    picker.set_options(static_options());

    picker.select_value("u2");
    let emitted = match picker.events().drain().pop() {
        Some(WidgetEvent::SelectionChange { ids, .. }) => ids,
        other => panic!("unexpected event: {:?}", other),
    };

    picker.set_value_ids(&emitted);
    assert_eq!(picker.selected_ids(), ids(&["u2"]));

    // A different controlled value applies without an event
    picker.set_value_ids(&ids(&["u4", "u1"]));
    assert_eq!(picker.selected_ids(), ids(&["u4", "u1"]));
    assert!(picker.events().is_empty());
}

#[test]
fn test_groups_exclude_selected_and_drop_empty() {
    let scheduler = ManualScheduler::new();
    let picker = MultiSelect::new(Arc::new(scheduler))
        .with_config(MultiSelectConfig::default().with_group_by("team"));
    picker.set_options(static_options());

    picker.select_value("u2");
    let groups = picker.selectable_groups();
    let keys: Vec<&str> = groups.iter().map(|g| g.key.as_str()).collect();
    assert_eq!(keys, vec!["north", ""]);
    assert_eq!(values(&groups[0].options), ids(&["u1", "u3"]));
    assert_eq!(values(&groups[1].options), ids(&["u4"]));
}

#[test]
fn test_group_by_can_change_after_creation() {
    let scheduler = ManualScheduler::new();
    let picker = MultiSelect::new(Arc::new(scheduler));
    picker.set_options(static_options());
    assert_eq!(picker.selectable_groups().len(), 1);

    picker.clear_dirty();
    picker.set_group_by(Some("team".into()));
    assert!(picker.is_dirty());
    let keys: Vec<String> = picker
        .selectable_groups()
        .into_iter()
        .map(|g| g.key)
        .collect();
    assert_eq!(keys, ids(&["north", "south", ""]));

    picker.set_group_by(None);
    let groups = picker.selectable_groups();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].key, "");
}

#[test]
fn test_local_fuzzy_filter_without_source() {
    let scheduler = ManualScheduler::new();
    let picker = MultiSelect::new(Arc::new(scheduler));
    picker.set_options(static_options());

    picker.set_query("carla");
    let groups = picker.selectable_groups();
    assert_eq!(groups.len(), 1);
    assert_eq!(values(&groups[0].options), ids(&["u3"]));
}

#[test]
fn test_empty_options_prop_keeps_current_set() {
    let scheduler = ManualScheduler::new();
    let picker = MultiSelect::new(Arc::new(scheduler));
    picker.set_options(static_options());
    picker.set_options(Vec::new());
    assert_eq!(picker.options().len(), 4);
}

#[test]
fn test_disabled_option_cannot_be_selected() {
    let scheduler = ManualScheduler::new();
    let picker = MultiSelect::new(Arc::new(scheduler));
    let locked = SelectOption::new("u9", "Locked").disabled();

    assert_eq!(picker.select(&locked), SelectionOutcome::Rejected);
    assert!(picker.selected_ids().is_empty());
    assert!(picker.events().is_empty());
}

#[test]
fn test_disabled_widget_ignores_interaction() {
    let source = Arc::new(EchoSource::default());
    let (picker, scheduler) = picker_with_source(source);
    picker.set_options(static_options());
    picker.set_disabled(true);

    picker.focus();
    picker.set_query("ana");
    scheduler.advance(DELAY);
    assert_eq!(scheduler.spawned_count(), 0);
    assert_eq!(picker.select_value("u1"), SelectionOutcome::Rejected);
    assert!(!picker.is_open());
}

#[test]
fn test_clear_all_keeps_fixed() {
    let scheduler = ManualScheduler::new();
    let picker = MultiSelect::new(Arc::new(scheduler));
    picker.set_value(vec![
        SelectOption::new("u1", "Ana Ruiz").fixed(),
        SelectOption::new("u2", "Bruno Costa"),
    ]);

    assert_eq!(picker.remove("u1"), SelectionOutcome::Rejected);
    assert_eq!(picker.clear_all(), SelectionOutcome::Changed);
    assert_eq!(picker.selected_ids(), ids(&["u1"]));
    assert_eq!(picker.events().len(), 1);
}

#[test]
fn test_selected_options_tolerate_unknown_ids() {
    let scheduler = ManualScheduler::new();
    let picker = MultiSelect::new(Arc::new(scheduler));
    picker.set_value_ids(&ids(&["u7"]));

    let selected = picker.selected_options();
    assert_eq!(selected.len(), 1);
    assert_eq!(selected[0].label, "u7");

    picker.set_options(vec![SelectOption::new("u7", "Gil Souza")]);
    assert_eq!(picker.selected_options()[0].label, "Gil Souza");
}

#[test]
fn test_creatable_offers_query_once() {
    let scheduler = ManualScheduler::new();
    let picker = MultiSelect::new(Arc::new(scheduler))
        .with_config(MultiSelectConfig::default().creatable());
    picker.set_options(static_options());

    picker.set_query("Ana Ruiz");
    assert!(picker.creatable_option().is_none());

    picker.set_query("Eva Prado");
    let created = picker.creatable_option().unwrap();
    assert_eq!(created.value, "Eva Prado");
    assert_eq!(picker.select_value("Eva Prado"), SelectionOutcome::Changed);
    assert_eq!(picker.selected_options()[0].label, "Eva Prado");
    assert!(picker.creatable_option().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_tokio_scheduler_runs_debounced_search() {
    let source = Arc::new(EchoSource::default());
    let scheduler = TokioScheduler::current().unwrap();
    let picker = MultiSelect::new(Arc::new(scheduler)).with_source(source.clone());

    picker.focus();
    picker.set_query("ana");
    tokio::time::sleep(Duration::from_millis(600)).await;
    // Let the spawned search complete
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }

    assert_eq!(source.queries(), ids(&["ana"]));
    assert_eq!(values(&picker.options()), ids(&["ana-1", "ana-2"]));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_zero_delay_debounce_never_left_pending() {
    let source = Arc::new(EchoSource::default());
    let scheduler = TokioScheduler::current().unwrap();
    let picker = MultiSelect::new(Arc::new(scheduler))
        .with_config(MultiSelectConfig::default().with_debounce_delay(Duration::ZERO))
        .with_source(source);
    picker.focus();

    for i in 0..200u64 {
        picker.set_query(format!("q{i}"));
        // Wait for this keystroke's timer to dispatch its search
        let mut waited = 0;
        while picker.generation() < i + 1 && waited < 1000 {
            tokio::time::sleep(Duration::from_millis(1)).await;
            waited += 1;
        }
        assert_eq!(picker.generation(), i + 1);
        assert!(!picker.is_debouncing(), "timer for q{i} still pending after firing");
    }
}
