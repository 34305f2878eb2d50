use anyhow::{bail, Context, Result};
use chrono::Duration;
use url::{form_urlencoded, Url};

use crate::config::Representative;
use crate::pipeline::PipelineEntry;
use crate::scoring::format_currency;

const CALENDAR_TEMPLATE_URL: &str = "https://calendar.google.com/calendar/render";

/// Google Calendar link that pre-fills an all-day follow-up on the due date
pub fn follow_up_calendar_url(entry: &PipelineEntry, representative: &Representative) -> Result<Url> {
    let start = entry.due_date;
    let end = start + Duration::days(1);
    let dates = format!("{}/{}", start.format("%Y%m%d"), end.format("%Y%m%d"));
    let title = format!("Follow-up: {}", entry.company_name);
    let details = format!(
        "{}\nStage: {} | Probability: {}% | Deal size: {}\nOwner: {}",
        entry.next_action,
        entry.stage,
        entry.probability(),
        format_currency(entry.deal.fee as f64),
        representative.name
    );

    Url::parse_with_params(
        CALENDAR_TEMPLATE_URL,
        &[
            ("action", "TEMPLATE"),
            ("text", title.as_str()),
            ("dates", dates.as_str()),
            ("details", details.as_str()),
        ],
    )
    .context("Failed to build calendar link")
}

/// `mailto:` link with a follow-up subject and body for the lead
pub fn follow_up_mailto(entry: &PipelineEntry, representative: &Representative) -> Result<Url> {
    let Some(email) = entry.email.as_deref().map(str::trim) else {
        bail!("{} has no email address on record", entry.company_name);
    };
    if !is_plain_address(email) {
        bail!(
            "{} has an unusable email address: {}",
            entry.company_name,
            email
        );
    }

    let subject = format!("{} - {}", entry.next_action, entry.company_name);
    let body = format!(
        "Hello {},\r\n\r\nI'm following up on your trade compliance work with Triangle Intelligence.\r\n\r\nBest regards,\r\n{}",
        entry.company_name, representative.name
    );

    let link = format!(
        "mailto:{}?subject={}&body={}",
        email,
        encode_component(&subject),
        encode_component(&body)
    );
    Url::parse(&link).with_context(|| format!("Invalid email address: {}", email))
}

/// A single `local@domain` address with no characters that alter the link
fn is_plain_address(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && !domain.contains('@')
        && !email
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || "?&#%/:,;<>\"".contains(c))
}

/// Percent-encode with %20 for spaces; mail clients show '+' literally
fn encode_component(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}
