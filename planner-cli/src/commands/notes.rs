use anyhow::Result;
use dialoguer::{Confirm, Input};
use owo_colors::Style;
use planner_core::controller::{Controller, Intent};
use planner_core::store::{GeneralNoteStore, PlannerBackend};

use crate::NotesCommand;
use crate::dates::parse_ref;
use crate::render::{paint, render_entries};

pub async fn run<B: PlannerBackend>(mut controller: Controller<B>, action: NotesCommand) -> Result<()> {
    controller.start().await?;

    match action {
        NotesCommand::List => {}
        NotesCommand::Add { title, body } => {
            let title = match title {
                Some(t) => t,
                None => Input::<String>::new()
                    .with_prompt("  Enter note title")
                    .interact_text()?,
            };
            let body = match body {
                Some(b) => b,
                None => Input::<String>::new()
                    .with_prompt("  Enter note content")
                    .interact_text()?,
            };
            controller.dispatch(Intent::AddNote { title, body }).await?;
        }
        NotesCommand::Edit { note, body } => {
            let note: <B as GeneralNoteStore>::NoteRef = parse_ref(&note)?;
            let body = match body {
                Some(b) => b,
                None => {
                    let current = controller
                        .view()
                        .notes
                        .iter()
                        .find(|entry| entry.id == note)
                        .ok_or_else(|| anyhow::anyhow!("Note not found"))?;
                    Input::<String>::new()
                        .with_prompt(format!("  Edit \"{}\"", current.item.title))
                        .with_initial_text(current.item.body.clone())
                        .allow_empty(true)
                        .interact_text()?
                }
            };
            controller.dispatch(Intent::EditNote { note, body }).await?;
        }
        NotesCommand::Rm { note, yes } => {
            let note = parse_ref(&note)?;
            if !yes {
                let confirmed = Confirm::new()
                    .with_prompt("Delete this note?")
                    .default(false)
                    .interact()?;

                if !confirmed {
                    return Ok(());
                }
            }
            controller.dispatch(Intent::DeleteNote(note)).await?;
            println!("{}", paint("Note deleted", Style::new().red()));
        }
    }

    println!("{}", render_entries(&controller.view().notes, "No notes yet"));
    Ok(())
}
