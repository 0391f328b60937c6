//! Plain-text rendering of the application sections.
//!
//! Sections appear top to bottom as: user name, filter selector, stats,
//! item creator, visible items.

use crate::types::{FilterMode, StatsSnapshot, TodoItem};
use crate::user::UserFetchError;
use recall_core::Loadable;
use std::fmt::{self, Display, Write as _};

/// Placeholder shown while the user name is in flight
pub const LOADING: &str = "Loading...";

/// Everything one screen shows, borrowed from state and derived views
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    /// Remote user name
    pub user_name: &'a Loadable<String, UserFetchError>,
    /// Selected filter
    pub filter: FilterMode,
    /// Completion statistics of the whole list
    pub stats: &'a StatsSnapshot,
    /// Item creator text
    pub input: &'a str,
    /// Items passing the filter
    pub visible: &'a [TodoItem],
    /// Last rejected edit
    pub last_error: Option<&'a str>,
}

impl Display for Frame<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", user_line(self.user_name))?;
        writeln!(f, "{}", filter_line(self.filter))?;
        f.write_str(&stats_block(self.stats))?;
        writeln!(f, "New item: {}", self.input)?;
        f.write_str(&list_block(self.visible))?;
        if let Some(error) = self.last_error {
            writeln!(f, "! {error}")?;
        }
        Ok(())
    }
}

/// Heading with the user name or its loading state
#[must_use]
pub fn user_line(user_name: &Loadable<String, UserFetchError>) -> String {
    match user_name {
        Loadable::NotRequested => "User: -".to_string(),
        Loadable::Pending => LOADING.to_string(),
        Loadable::Resolved(Ok(name)) => format!("User: {name}"),
        Loadable::Resolved(Err(error)) => format!("User: unavailable ({error})"),
    }
}

/// Filter selector with the current mode bracketed
#[must_use]
pub fn filter_line(current: FilterMode) -> String {
    let options: Vec<String> = FilterMode::ALL
        .iter()
        .map(|mode| {
            if *mode == current {
                format!("[{}]", mode.label())
            } else {
                mode.label().to_string()
            }
        })
        .collect();
    format!("Filter: {}", options.join(" "))
}

/// Stats display; the ratio is shown as a whole percentage
#[must_use]
pub fn stats_block(stats: &StatsSnapshot) -> String {
    format!(
        "Total tasks: {}\nTo do: {}\nDone: {}\nEfficiency: {:.0}%\n",
        stats.total,
        stats.to_do,
        stats.not_todo,
        stats.completed_percentage * 100.0
    )
}

/// One line per item: completion box, id, text
#[must_use]
pub fn list_block(items: &[TodoItem]) -> String {
    if items.is_empty() {
        return "(no items)\n".to_string();
    }

    items.iter().fold(String::new(), |mut out, item| {
        let mark = if item.is_completed { 'x' } else { ' ' };
        let _ = writeln!(out, "[{mark}] {:>3}  {}", item.id, item.text);
        out
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selectors::compute_stats;
    use crate::types::TodoId;

    #[test]
    fn user_states() {
        assert_eq!(user_line(&Loadable::Pending), "Loading...");
        assert_eq!(
            user_line(&Loadable::Resolved(Ok("Ervin Howell".to_string()))),
            "User: Ervin Howell"
        );
        assert_eq!(
            user_line(&Loadable::Resolved(Err(UserFetchError::UnexpectedStatus { status: 404 }))),
            "User: unavailable (User service returned 404)"
        );
    }

    #[test]
    fn filter_marks_selection() {
        assert_eq!(filter_line(FilterMode::NotDone), "Filter: All Done [Not Done]");
        assert_eq!(filter_line(FilterMode::All), "Filter: [All] Done Not Done");
    }

    #[test]
    fn stats_show_percent() {
        let list = vec![
            TodoItem::new(TodoId::new(0), "a").toggled(),
            TodoItem::new(TodoId::new(1), "b"),
        ];
        let text = stats_block(&compute_stats(&list));

        assert!(text.contains("Total tasks: 2"));
        assert!(text.contains("To do: 1"));
        assert!(text.contains("Done: 1"));
        assert!(text.contains("Efficiency: 50%"));
        assert!(stats_block(&compute_stats(&[])).contains("Efficiency: 0%"));
    }

    #[test]
    fn percent_is_rounded() {
        let list = vec![
            TodoItem::new(TodoId::new(0), "a").toggled(),
            TodoItem::new(TodoId::new(1), "b"),
            TodoItem::new(TodoId::new(2), "c"),
        ];
        assert!(stats_block(&compute_stats(&list)).contains("Efficiency: 33%\n"));
    }

    #[test]
    fn frame_renders_every_section() {
        let items = vec![TodoItem::new(TodoId::new(4), "walk dog")];
        let stats = compute_stats(&items);
        let user_name = Loadable::Pending;

        let frame = Frame {
            user_name: &user_name,
            filter: FilterMode::All,
            stats: &stats,
            input: "buy",
            visible: &items,
            last_error: Some("Todo with ID 9 not found"),
        }
        .to_string();

        let lines: Vec<_> = frame.lines().collect();
        assert_eq!(lines[0], "Loading...");
        assert_eq!(lines[1], "Filter: [All] Done Not Done");
        assert!(lines.contains(&"New item: buy"));
        assert!(lines.contains(&"[ ]   4  walk dog"));
        assert_eq!(lines.last(), Some(&"! Todo with ID 9 not found"));
    }

    #[test]
    fn empty_list() {
        assert_eq!(list_block(&[]), "(no items)\n");
    }
}
