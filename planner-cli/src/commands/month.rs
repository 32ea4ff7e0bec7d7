use anyhow::Result;
use chrono::Local;
use planner_core::controller::{Controller, Intent};
use planner_core::grid::YearMonth;
use planner_core::store::PlannerBackend;

use crate::dates::parse_date;
use crate::render::{Render, render_day};

pub async fn run<B: PlannerBackend>(
    mut controller: Controller<B>,
    year: Option<i32>,
    month: Option<u32>,
    offset: i32,
    select: Option<String>,
) -> Result<()> {
    if let Some(select) = select {
        let date = parse_date(&select)?;
        controller.dispatch(Intent::SelectDate(date)).await?;
    }

    if year.is_some() || month.is_some() {
        let current = YearMonth::of(Local::now().date_naive());
        let year = year.unwrap_or(current.year());
        let month = month.unwrap_or(current.month());
        let shown = YearMonth::new(year, month)
            .ok_or_else(|| anyhow::anyhow!("Invalid month {}-{}", year, month))?;
        controller.dispatch(Intent::ShowMonth(shown)).await?;
    }

    for _ in 0..offset.unsigned_abs() {
        let step = if offset > 0 { Intent::NextMonth } else { Intent::PrevMonth };
        controller.dispatch(step).await?;
    }

    println!("{}", controller.grid().render());

    if controller.view().selected.is_some() {
        println!();
        println!("{}", render_day(controller.view()));
    }

    Ok(())
}
