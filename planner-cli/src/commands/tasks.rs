use anyhow::Result;
use owo_colors::Style;
use planner_core::controller::{Controller, Intent};
use planner_core::store::PlannerBackend;

use crate::dates::{parse_date, parse_ref};
use crate::render::{paint, render_day};

async fn select<B: PlannerBackend>(controller: &mut Controller<B>, date: &str) -> Result<()> {
    let date = parse_date(date)?;
    controller.dispatch(Intent::SelectDate(date)).await?;
    Ok(())
}

pub async fn show<B: PlannerBackend>(mut controller: Controller<B>, date: &str) -> Result<()> {
    select(&mut controller, date).await?;
    println!("{}", render_day(controller.view()));
    Ok(())
}

pub async fn add<B: PlannerBackend>(mut controller: Controller<B>, date: &str, text: &str) -> Result<()> {
    select(&mut controller, date).await?;
    controller.dispatch(Intent::AddTask(text.to_string())).await?;

    println!("{}", paint("Task added", Style::new().green()));
    println!("{}", render_day(controller.view()));
    Ok(())
}

pub async fn toggle<B: PlannerBackend>(mut controller: Controller<B>, date: &str, task: &str) -> Result<()> {
    select(&mut controller, date).await?;
    controller.dispatch(Intent::ToggleTask(parse_ref(task)?)).await?;

    println!("{}", render_day(controller.view()));
    Ok(())
}

pub async fn delete<B: PlannerBackend>(mut controller: Controller<B>, date: &str, task: &str) -> Result<()> {
    select(&mut controller, date).await?;
    controller.dispatch(Intent::DeleteTask(parse_ref(task)?)).await?;

    println!("{}", paint("Task deleted", Style::new().red()));
    println!("{}", render_day(controller.view()));
    Ok(())
}
