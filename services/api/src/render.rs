use crate::infra::{bootstrap, query_client};
use clap::Args;
use grantboard::catalog::grants::write_listing_csv;
use grantboard::catalog::{
    arrange_plans, format_grant_for_display, Grant, GrantDisplay, Plan, PlanCard,
};
use grantboard::error::AppError;
use grantboard::query::{GrantDetailQuery, GrantsQuery, PlansQuery, QueryResult};
use std::io;

#[derive(Args, Debug, Default)]
pub(crate) struct GrantsListArgs {
    /// Page number passed to the catalog API
    #[arg(long)]
    pub(crate) page: Option<u32>,
    /// Page size passed to the catalog API
    #[arg(long)]
    pub(crate) limit: Option<u32>,
    /// Write the listing as CSV instead of cards
    #[arg(long)]
    pub(crate) csv: bool,
}

pub(crate) async fn run_grants_list(
    args: GrantsListArgs,
    token: Option<String>,
) -> Result<(), AppError> {
    let config = bootstrap(token)?;
    let client = query_client(&config.api)?;
    let query = GrantsQuery {
        page: args.page,
        limit: args.limit,
    };

    let handle = client.observe(query);
    eprintln!("{}", state_line(&handle.current()));
    let result = handle
        .settled()
        .await
        .map(|grant| format_grant_for_display(&grant));

    match (&result, args.csv) {
        (QueryResult::Success { data }, true) => write_listing_csv(io::stdout().lock(), data)?,
        _ => print!("{}", grant_listing(&result)),
    }
    Ok(())
}

pub(crate) async fn run_grant_show(id: String, token: Option<String>) -> Result<(), AppError> {
    let config = bootstrap(token)?;
    let client = query_client(&config.api)?;
    let result = client.fetch(&GrantDetailQuery::new(id)).await;
    print!("{}", grant_detail(&result));
    Ok(())
}

pub(crate) async fn run_pricing(token: Option<String>) -> Result<(), AppError> {
    let config = bootstrap(token)?;
    let client = query_client(&config.api)?;
    let result = client.fetch(&PlansQuery).await;
    print!("{}", pricing_page(&result));
    Ok(())
}

fn state_line<T>(result: &QueryResult<T>) -> String {
    match result.error_message() {
        Some(message) => format!("[{}] {message}", result.status().label()),
        None => format!("[{}]", result.status().label()),
    }
}

fn grant_listing(result: &QueryResult<GrantDisplay>) -> String {
    let rows = match result {
        QueryResult::Success { data } => data,
        QueryResult::Empty => return "No grants available right now.\n".to_string(),
        other => return format!("{}\n", state_line(other)),
    };

    let mut lines = Vec::new();
    for row in rows {
        lines.push(row.title.clone());
        lines.push(format!(
            "  {} | {} | {}",
            row.funding_badge, row.deadline_badge, row.type_badge
        ));
        if !row.location.is_empty() {
            lines.push(format!("  {}", row.location));
        }
        lines.push(format!("  {}", row.details_path));
    }
    text_block(lines)
}

fn grant_detail(result: &QueryResult<Grant>) -> String {
    let grant = match result {
        QueryResult::Success { data } => match data.first() {
            Some(grant) => grant,
            None => return "Grant not found.\n".to_string(),
        },
        QueryResult::Empty => return "Grant not found.\n".to_string(),
        other => return format!("{}\n", state_line(other)),
    };

    let display = format_grant_for_display(grant);
    let deadline = match grant.deadline {
        Some(_) => format!("Deadline: {}", display.deadline_badge),
        None => display.deadline_badge,
    };

    let mut lines = vec![
        format!("{} ({})", grant.title, grant.status.label()),
        format!("  Funding:  {}", display.funding_badge),
        format!("  {deadline}"),
        format!("  Type:     {}", display.type_badge),
        format!("  Industry: {}", grant.industry),
        format!("  Activity: {}", grant.activity),
        format!("  Location: {}", grant.location),
    ];
    if !grant.description.is_empty() {
        lines.push(String::new());
        lines.push(grant.description.clone());
    }
    lines.extend(
        grant
            .file_urls
            .iter()
            .map(|url| format!("  attachment: {url}")),
    );
    text_block(lines)
}

fn pricing_page(result: &QueryResult<Plan>) -> String {
    let plans = match result {
        QueryResult::Success { data } => data,
        QueryResult::Empty => return "No pricing plans available at the moment.\n".to_string(),
        other => return format!("{}\n", state_line(other)),
    };

    let arrangement = arrange_plans(plans);
    let mut lines = vec!["Desktop".to_string()];
    lines.extend(arrangement.cards().iter().map(card_line));
    lines.push("Stacked".to_string());
    lines.extend(arrangement.stacked().iter().map(card_line));
    text_block(lines)
}

/// Newline-terminated lines, ready for `print!`.
fn text_block(lines: Vec<String>) -> String {
    lines.into_iter().map(|line| line + "\n").collect()
}

fn card_line(card: &PlanCard) -> String {
    let plan = &card.plan;
    let slot = card.slot.label();
    let popular = if card.is_popular { " *popular*" } else { "" };
    format!(
        "  {slot:<8} {} ${:.2}/{}{popular}",
        plan.name,
        plan.price,
        plan.billing_cycle.per_label()
    )
}
