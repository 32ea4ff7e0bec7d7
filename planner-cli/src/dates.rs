use anyhow::Result;
use chrono::{Local, NaiveDate};
use planner_core::date_key::DateKey;

/// Parse a date argument: "today", "tomorrow", "yesterday", DD-MM-YYYY or
/// YYYY-MM-DD.
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    parse_date_from(input, Local::now().date_naive())
}

fn parse_date_from(input: &str, today: NaiveDate) -> Result<NaiveDate> {
    let input = input.trim();

    let relative = match input.to_lowercase().as_str() {
        "today" => Some(today),
        "tomorrow" => today.succ_opt(),
        "yesterday" => today.pred_opt(),
        _ => None,
    };
    if let Some(date) = relative {
        return Ok(date);
    }

    if let Ok(key) = DateKey::decode(input) {
        return Ok(key.date());
    }

    NaiveDate::parse_from_str(input, "%Y-%m-%d").map_err(|_| {
        anyhow::anyhow!(
            "Invalid date '{}'. Expected DD-MM-YYYY, YYYY-MM-DD, today, tomorrow or yesterday",
            input
        )
    })
}

/// Parse a record reference typed by the user.
pub fn parse_ref<R: std::str::FromStr>(input: &str) -> Result<R> {
    input
        .trim()
        .parse()
        .map_err(|_| anyhow::anyhow!("Invalid reference '{}'", input))
}
