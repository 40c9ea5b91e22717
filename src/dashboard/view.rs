use chrono::{DateTime, Local, TimeZone};
use serde_json::Value;
use std::fmt::Write;

use super::state::{DashboardState, FetchedItem, MessageKind};

pub const TITLE: &str = "API Polling Dashboard";
pub const SUBTITLE: &str = "Monitor and store API responses in real-time";
pub const EMPTY_STATE: &str = "No data collected yet. Start polling to gather responses.";
pub const NO_ACTIVITY: &str = "No activity name";
pub const INVALID_DATE: &str = "Invalid Date";

/// One entry of the response grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub title: String,
    pub id: String,
    pub time: String,
}

/// Cards in arrival order, numbered from 1.
pub fn cards(items: &[FetchedItem]) -> Vec<Card> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| Card {
            title: activity_title(&item.activity),
            id: (index + 1).to_string(),
            time: coerce_timestamp(&item.timestamp)
                .map(|t| local_time_string(&t))
                .unwrap_or_else(|| INVALID_DATE.to_string()),
        })
        .collect()
}

pub fn header(state: &DashboardState) -> String {
    let mut header = format!("Collected Responses ({})", state.item_count());
    if let Some(fetched) = &state.last_fetch_time {
        let _ = write!(header, "  Last fetched: {}", local_time_string(fetched));
    }
    header
}

pub fn start_label(state: &DashboardState) -> &'static str {
    if state.loading { "Starting..." } else { "Start Polling" }
}

pub fn refresh_label(state: &DashboardState) -> &'static str {
    if state.loading { "Refreshing..." } else { "Refresh Data" }
}

pub fn clear_label(state: &DashboardState) -> &'static str {
    if state.loading { "Clearing..." } else { "Clear All Data" }
}

pub fn stop_label() -> &'static str {
    "Stop Polling"
}

/// Falsy activities (missing, null, "", 0, false) and structured values get the placeholder.
fn activity_title(activity: &Value) -> String {
    match activity {
        Value::String(s) if !s.is_empty() => s.clone(),
        Value::Number(n) if n.as_f64().is_some_and(|f| f != 0.0) => n.to_string(),
        Value::Bool(true) => "true".to_string(),
        _ => NO_ACTIVITY.to_string(),
    }
}

/// Accepts epoch milliseconds as a number or numeric string, or an RFC 3339 string.
pub fn coerce_timestamp(value: &Value) -> Option<DateTime<Local>> {
    match value {
        Value::Number(n) => {
            let millis = n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64))?;
            Local.timestamp_millis_opt(millis).single()
        }
        Value::String(s) => {
            let s = s.trim();
            if let Ok(millis) = s.parse::<i64>() {
                return Local.timestamp_millis_opt(millis).single();
            }
            DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|t| t.with_timezone(&Local))
        }
        _ => None,
    }
}

/// 12-hour clock, e.g. `3:07:09 PM`
pub fn local_time_string(time: &DateTime<Local>) -> String {
    time.format("%-I:%M:%S %p").to_string()
}

/// Plain-text rendering of the whole dashboard
pub fn render_text(state: &DashboardState) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", TITLE);
    let _ = writeln!(out, "{}", SUBTITLE);
    let _ = writeln!(out);

    let _ = writeln!(
        out,
        "Endpoint: {}  every {}s for {}s",
        state.form.endpoint, state.form.frequency, state.form.duration
    );

    let status = &state.status;
    if status.is_active {
        let _ = writeln!(
            out,
            "Status: polling every {}s, loop {}/{}, {}s remaining",
            status.frequency, status.current_loop, status.total_loops, status.remaining_time
        );
        let _ = writeln!(out, "{}", progress_bar(status.progress_percentage(), 30));
    } else {
        let _ = writeln!(out, "Status: idle");
    }

    let mut controls = vec![format!("[{}]", start_label(state))];
    if state.can_stop() {
        controls.push(format!("[{}]", stop_label()));
    }
    controls.push(format!("[{}]", refresh_label(state)));
    controls.push(format!("[{}]", clear_label(state)));
    let _ = writeln!(out, "{}", controls.join(" "));

    if !state.message.is_empty() {
        let tag = match state.message.kind {
            MessageKind::Success => "success",
            MessageKind::Error => "error",
            MessageKind::Info => "info",
            MessageKind::None => "note",
        };
        let _ = writeln!(out, "({}) {}", tag, state.message.text);
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "{}", header(state));
    if state.items.is_empty() {
        let _ = writeln!(out, "  {}", EMPTY_STATE);
    } else {
        for card in cards(&state.items) {
            let _ = writeln!(out, "  #{:<4} {:<40} {}", card.id, card.title, card.time);
        }
    }

    out
}

fn progress_bar(percentage: f64, width: usize) -> String {
    let filled = ((percentage.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize;
    format!(
        "[{}{}] {:.0}%",
        "#".repeat(filled),
        "-".repeat(width - filled),
        percentage.clamp(0.0, 100.0)
    )
}
