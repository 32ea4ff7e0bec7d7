//! Terminal rendering for planner types.
//!
//! Extension traits and helpers that turn core types into colored text using
//! owo_colors. Colors are dropped when stdout is not a terminal. Nothing here
//! talks to a backend.

use std::fmt::Display;

use owo_colors::{OwoColorize, Stream, Style};
use planner_core::controller::View;
use planner_core::grid::{Cell, DayCell, MonthGrid};
use planner_core::note::GeneralNote;
use planner_core::store::{Entry, PlannerBackend};
use planner_core::task::Task;

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

const CELL_WIDTH: usize = 3;

/// Apply `style` if stdout supports colors.
pub fn paint(text: impl Display, style: Style) -> String {
    text.if_supports_color(Stream::Stdout, |t| t.style(style))
        .to_string()
}

impl Render for DayCell {
    fn render(&self) -> String {
        let text = format!("{:>2}", self.day);
        let today = Style::new().green().bold();
        match (self.is_today, self.is_selected) {
            (true, true) => paint(text, today.reversed()),
            (true, false) => paint(text, today),
            (false, true) => paint(text, Style::new().reversed()),
            (false, false) => text,
        }
    }
}

impl Render for MonthGrid {
    fn render(&self) -> String {
        let width = CELL_WIDTH * self.weeks.first().map_or(7, |w| w.len()) - 1;
        let title = format!("{:^width$}", self.month.title());
        let mut lines = vec![paint(title, Style::new().bold())];

        let headers: Vec<String> = self
            .week_start
            .headers()
            .iter()
            .map(|day| day.to_string().chars().take(2).collect())
            .collect();
        lines.push(paint(headers.join(" "), Style::new().dimmed()));

        for week in &self.weeks {
            let cells: Vec<String> = week
                .iter()
                .map(|cell| match cell {
                    Cell::Empty => "  ".to_string(),
                    Cell::Day(day) => day.render(),
                })
                .collect();
            lines.push(cells.join(" ").trim_end().to_string());
        }

        lines.join("\n")
    }
}

impl Render for Task {
    fn render(&self) -> String {
        if self.completed {
            format!(
                "{} {}",
                paint("[x]", Style::new().green()),
                paint(&self.text, Style::new().strikethrough().dimmed())
            )
        } else {
            format!("[ ] {}", self.text)
        }
    }
}

impl Render for GeneralNote {
    fn render(&self) -> String {
        let mut lines = vec![paint(&self.title, Style::new().bold())];
        lines.extend(self.body.lines().map(|l| format!("  {}", l)));
        lines.join("\n")
    }
}

/// `[ref] item` lines, or a dimmed placeholder if there are none.
pub fn render_entries<R: Display, T: Render>(entries: &[Entry<R, T>], empty: &str) -> String {
    if entries.is_empty() {
        return format!("  {}", paint(empty, Style::new().dimmed()));
    }

    entries
        .iter()
        .map(|entry| {
            let id = format!("[{}]", entry.id);
            let item = entry.item.render().replace('\n', "\n    ");
            format!("  {} {}", paint(id, Style::new().dimmed()), item)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Tasks and note of the selected date.
pub fn render_day<B: PlannerBackend>(view: &View<B>) -> String {
    let Some(selected) = view.selected else {
        return paint("Select a date first!", Style::new().dimmed());
    };

    let mut lines = vec![
        paint(format!("📅 {}", selected), Style::new().bold()),
        render_entries(&view.tasks, "No tasks"),
    ];

    if !view.day_note.is_empty() {
        lines.push(String::new());
        lines.push(paint("Notes", Style::new().underline()));
        lines.extend(view.day_note.lines().map(|l| format!("  {}", l)));
    }

    lines.join("\n")
}
