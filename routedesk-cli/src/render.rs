//! Plain-text output.

use routedesk_lib::model::{BenchmarkResult, User};
use routedesk_widgets::flags::FlagMap;
use routedesk_widgets::multi_select::OptionGroup;
use routedesk_widgets::table::{SelectionSummary, TableView};

const BAR_WIDTH: f64 = 40.0;

pub fn doctors(groups: &[OptionGroup]) {
    for group in groups {
        let heading = if group.key.is_empty() {
            "(no specialty)"
        } else {
            group.key.as_str()
        };
        println!("{}", heading);
        for option in &group.options {
            println!("  {:<12} {}", option.value, option.label);
        }
    }
}

pub fn users(view: &TableView<User>, flags: &FlagMap) {
    let header = match view.summary {
        SelectionSummary::None => "[ ]",
        SelectionSummary::Some => "[-]",
        SelectionSummary::All => "[x]",
    };
    println!("{} {:<12} {:<24} {:<28} {:>4}", header, "id", "name", "email", "age");
    for user in &view.rows {
        let age = user.age.map(|a| a.to_string()).unwrap_or_else(|| "-".into());
        let mark = if flags.is_flagged(&user.id) { "!" } else { " " };
        println!(
            " {}  {:<12} {:<24} {:<28} {:>4}",
            mark, user.id, user.name, user.email, age
        );
    }
    println!(
        "page {}/{} ({} rows)",
        view.page_index + 1,
        view.page_count,
        view.total_rows
    );
}

pub fn benchmark(result: &BenchmarkResult, user_ids: &[String], priority: &[String]) {
    println!("users: {}", user_ids.join(", "));
    if !priority.is_empty() {
        println!("priority: {}", priority.join(", "));
    }
    for bar in result.timings().bars() {
        let width = (bar.height * BAR_WIDTH).round() as usize;
        println!("{:<14} {:<40} {}", bar.label, "#".repeat(width), bar.title);
    }
    if !result.tsp_route_order.is_empty() {
        let order: Vec<String> = result.tsp_route_order.iter().map(|i| i.to_string()).collect();
        println!("TSP order: {}", order.join(", "));
    }
    if let Some(geometry) = &result.route_geometry {
        log::debug!("Route geometry: {}", geometry);
    }
}
