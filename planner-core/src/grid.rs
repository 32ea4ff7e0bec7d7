//! Month view layout.
//!
//! Builds the week-rows of day cells needed to render one month, with
//! leading padding before day 1 and trailing padding after the last day.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::date_key::DateKey;

pub const DAYS_PER_WEEK: usize = 7;

/// A calendar month, independent of any day-of-month.
///
/// Navigation happens on this type so that moving forward from the 31st
/// never skips a short month. Only months chrono can represent exist, so
/// navigating past `NaiveDate::MIN` or `NaiveDate::MAX` yields `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    first: NaiveDate,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)?;
        Some(YearMonth { first })
    }

    /// The month containing `date`. Only year and month are used.
    pub fn of(date: NaiveDate) -> Self {
        YearMonth {
            first: date.with_day(1).unwrap_or(date),
        }
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    pub fn month(&self) -> u32 {
        self.first.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first
    }

    pub fn last_day(&self) -> NaiveDate {
        (28..=31)
            .rev()
            .find_map(|day| self.first.with_day(day))
            .unwrap_or(self.first)
    }

    pub fn days_in_month(&self) -> u32 {
        self.last_day().day()
    }

    pub fn succ(&self) -> Option<Self> {
        if self.month() == 12 {
            YearMonth::new(self.year().checked_add(1)?, 1)
        } else {
            YearMonth::new(self.year(), self.month() + 1)
        }
    }

    pub fn pred(&self) -> Option<Self> {
        if self.month() == 1 {
            YearMonth::new(self.year().checked_sub(1)?, 12)
        } else {
            YearMonth::new(self.year(), self.month() - 1)
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year() && date.month() == self.month()
    }

    /// Header text, e.g. "March 2025".
    pub fn title(&self) -> String {
        self.first.format("%B %Y").to_string()
    }
}

/// First column of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    #[default]
    Sunday,
    Monday,
}

impl WeekStart {
    pub fn weekday(&self) -> Weekday {
        match self {
            WeekStart::Sunday => Weekday::Sun,
            WeekStart::Monday => Weekday::Mon,
        }
    }

    /// Column index (0-6) of `weekday` in a grid starting on this day.
    pub fn column_of(&self, weekday: Weekday) -> usize {
        let start = self.weekday().num_days_from_sunday();
        ((weekday.num_days_from_sunday() + 7 - start) % 7) as usize
    }

    /// Weekday headers in column order.
    pub fn headers(&self) -> [Weekday; DAYS_PER_WEEK] {
        let mut day = self.weekday();
        std::array::from_fn(|_| {
            let current = day;
            day = day.succ();
            current
        })
    }
}

/// A single day in the grid. `is_today` and `is_selected` are presentation
/// hints computed when the grid is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayCell {
    pub day: u32,
    pub date: NaiveDate,
    pub is_today: bool,
    pub is_selected: bool,
}

impl DayCell {
    pub fn key(&self) -> DateKey {
        DateKey::new(self.date)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Empty,
    Day(DayCell),
}

impl Cell {
    pub fn as_day(&self) -> Option<&DayCell> {
        match self {
            Cell::Empty => None,
            Cell::Day(day) => Some(day),
        }
    }
}

pub type Week = Vec<Cell>;

#[derive(Debug, Clone)]
pub struct MonthGrid {
    pub month: YearMonth,
    pub week_start: WeekStart,
    pub weeks: Vec<Week>,
}

impl MonthGrid {
    /// Lay out `month` in rows of seven cells.
    pub fn build(
        month: YearMonth,
        week_start: WeekStart,
        today: NaiveDate,
        selected: Option<NaiveDate>,
    ) -> Self {
        let leading = week_start.column_of(month.first_day().weekday());

        let mut cells: Vec<Cell> = Vec::with_capacity(leading + 31);
        cells.extend(std::iter::repeat_n(Cell::Empty, leading));

        let mut date = month.first_day();
        while month.contains(date) {
            cells.push(Cell::Day(DayCell {
                day: date.day(),
                date,
                is_today: date == today,
                is_selected: selected == Some(date),
            }));
            match date.succ_opt() {
                Some(next) => date = next,
                None => break,
            }
        }

        let mut weeks: Vec<Week> = cells
            .chunks(DAYS_PER_WEEK)
            .map(|chunk| chunk.to_vec())
            .collect();

        if let Some(last) = weeks.last_mut() {
            last.resize(DAYS_PER_WEEK, Cell::Empty);
        }

        MonthGrid {
            month,
            week_start,
            weeks,
        }
    }

    pub fn days(&self) -> impl Iterator<Item = &DayCell> {
        self.weeks.iter().flatten().filter_map(Cell::as_day)
    }
}
