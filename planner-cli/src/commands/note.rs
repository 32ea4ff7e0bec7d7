use anyhow::Result;
use owo_colors::Style;
use planner_core::controller::{Controller, Intent};
use planner_core::store::PlannerBackend;

use crate::dates::parse_date;
use crate::render::paint;

/// Print the note for `date`, or overwrite it with `body`.
pub async fn run<B: PlannerBackend>(mut controller: Controller<B>, date: &str, body: Option<String>) -> Result<()> {
    let date = parse_date(date)?;
    controller.dispatch(Intent::SelectDate(date)).await?;

    match body {
        Some(body) => {
            controller.dispatch(Intent::SetDayNote(body)).await?;
            println!("{}", paint("Note saved", Style::new().green()));
        }
        None => {
            let note = &controller.view().day_note;
            if note.is_empty() {
                println!("{}", paint("No note for this date", Style::new().dimmed()));
            } else {
                println!("{}", note);
            }
        }
    }

    Ok(())
}
