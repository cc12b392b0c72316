use anyhow::{Result, bail};
use clap::{Args, ValueEnum};

use aprov_application::AprovApp;
use aprov_core::approval::{ApprovalAction, validate_decision};
use aprov_core::document::{DocumentStatus, FilterSet};

use super::{brought_rows, ensure_session};
use crate::output;

#[derive(Clone, Copy, ValueEnum)]
pub enum StatusArg {
    Pending,
    Approved,
    Rejected,
}

impl From<StatusArg> for DocumentStatus {
    fn from(value: StatusArg) -> Self {
        match value {
            StatusArg::Pending => Self::Pending,
            StatusArg::Approved => Self::Approved,
            StatusArg::Rejected => Self::Rejected,
        }
    }
}

#[derive(Args)]
pub struct ListArgs {
    /// Document type code (SC, PC, IP, AE, SA, CT, MD)
    #[arg(long = "type")]
    pub document_type: Option<String>,
    #[arg(long, value_enum, default_value = "pending")]
    pub status: StatusArg,
    /// Branch code; repeatable. Defaults to the selected branch
    #[arg(long = "branch")]
    pub branches: Vec<String>,
    /// Start date, YYYYMMDD
    #[arg(long)]
    pub from: Option<String>,
    /// End date, YYYYMMDD
    #[arg(long)]
    pub to: Option<String>,
    #[arg(long)]
    pub search: Option<String>,
    /// Number of pages to load
    #[arg(long, default_value_t = 1)]
    pub pages: u32,
}

#[derive(Args)]
pub struct DecisionArgs {
    /// scrId of each document to decide
    #[arg(required = true)]
    pub scr_ids: Vec<i64>,
    /// Restrict the lookup to one document type
    #[arg(long = "type")]
    pub document_type: Option<String>,
    /// Required when rejecting
    #[arg(long, short = 'j', default_value = "")]
    pub justification: String,
}

#[derive(Args)]
pub struct ItemsArgs {
    /// Document type code
    pub document_type: String,
    pub scr_id: i64,
    /// Load every page instead of the first one
    #[arg(long)]
    pub all: bool,
}

#[derive(Args)]
pub struct ApportionmentArgs {
    /// Document type code (SC, PC, IP or AE)
    pub document_type: String,
    pub document_number: String,
    /// Load every page instead of the first one
    #[arg(long)]
    pub all: bool,
}

async fn filters_from(app: &AprovApp, args: &ListArgs) -> FilterSet {
    let branches = if args.branches.is_empty() {
        app.branches
            .selected()
            .await
            .map(|b| vec![b.code])
            .unwrap_or_default()
    } else {
        args.branches.clone()
    };

    FilterSet::new(
        args.document_type.as_ref().map(|t| t.trim().to_uppercase()),
        args.status.into(),
    )
    .with_branches(branches)
    .with_dates(args.from.clone(), args.to.clone())
    .with_search_key(args.search.clone())
}

pub async fn list(app: &AprovApp, args: ListArgs) -> Result<()> {
    ensure_session(app).await?;

    let filters = filters_from(app, &args).await;
    app.feed.fetch(filters, true).await?;
    for _ in 1..args.pages.max(1) {
        if !brought_rows(app.feed.load_more().await?) {
            break;
        }
    }

    let documents = app.feed.documents().await;
    if documents.is_empty() {
        output::info("No documents found");
        return Ok(());
    }

    output::document_header();
    for document in &documents {
        output::document_row(document, app.selection.contains(document.scr_id).await);
    }
    if app.feed.has_next().await {
        output::info(format!(
            "{} documents shown, more available (use --pages)",
            documents.len()
        ));
    }
    Ok(())
}

pub async fn decide(app: &AprovApp, action: ApprovalAction, args: DecisionArgs) -> Result<()> {
    let justification = validate_decision(action, &args.justification)?;
    ensure_session(app).await?;

    let filters = FilterSet::new(
        args.document_type.as_ref().map(|t| t.trim().to_uppercase()),
        DocumentStatus::Pending,
    );
    app.feed.fetch(filters, true).await?;

    let mut missing: Vec<i64> = args.scr_ids.clone();
    loop {
        for document in app.feed.documents().await {
            if let Some(pos) = missing.iter().position(|id| *id == document.scr_id) {
                missing.remove(pos);
                if !app.selection.contains(document.scr_id).await {
                    app.selection.toggle(&document).await;
                }
            }
        }
        if missing.is_empty() || !brought_rows(app.feed.load_more().await?) {
            break;
        }
    }

    if !missing.is_empty() {
        let ids: Vec<String> = missing.iter().map(i64::to_string).collect();
        bail!("No pending document with scrId {}", ids.join(", "));
    }

    let report = app
        .engine
        .process_selection(action, &justification)
        .await?;

    let verb = match action {
        ApprovalAction::Approve => "Approved",
        ApprovalAction::Reject => "Rejected",
    };
    output::success(format!(
        "{} {} document(s) across {}",
        verb,
        report.document_count,
        report.submitted_types.join(", ")
    ));
    if !report.feed_refreshed {
        output::warn("The document list could not be refreshed");
    }
    Ok(())
}

pub async fn items(app: &AprovApp, args: ItemsArgs) -> Result<()> {
    ensure_session(app).await?;

    app.detail
        .fetch(&args.document_type, args.scr_id, true)
        .await?;
    if args.all {
        while brought_rows(app.detail.load_more().await?) {}
    }

    println!(
        "{} #{}",
        output::document_type_title(&args.document_type),
        args.scr_id
    );
    let items = app.detail.items().await;
    if items.is_empty() {
        output::info("No items");
    }
    for item in &items {
        output::item_row(item);
    }
    if app.detail.has_next().await {
        output::info("More items available (use --all)");
    }
    Ok(())
}

pub async fn history(app: &AprovApp, document_number: &str) -> Result<()> {
    ensure_session(app).await?;
    let value = app.detail.approval_history(document_number).await?;
    output::json(&value);
    Ok(())
}

pub async fn item_history(app: &AprovApp, product_code: &str, page: u32) -> Result<()> {
    ensure_session(app).await?;
    let value = app.detail.item_history(product_code, page).await?;
    output::json(&value);
    Ok(())
}

pub async fn item_info(
    app: &AprovApp,
    record_number: &str,
    item_number: &str,
    item_recno: i64,
) -> Result<()> {
    ensure_session(app).await?;
    let value = app
        .detail
        .item_additional_info(record_number, item_number, item_recno)
        .await?;
    output::json(&value);
    Ok(())
}

pub async fn attachments(app: &AprovApp, scr_id: i64, page: u32) -> Result<()> {
    ensure_session(app).await?;
    let value = app.detail.attachments(scr_id, page).await?;
    output::json(&value);
    Ok(())
}

pub async fn apportionment(app: &AprovApp, args: ApportionmentArgs) -> Result<()> {
    ensure_session(app).await?;

    app.detail
        .fetch_apportionment(&args.document_type, &args.document_number, true)
        .await?;
    if args.all {
        while brought_rows(app.detail.load_more_apportionment().await?) {}
    }

    println!(
        "{} {}",
        output::document_type_title(&args.document_type),
        args.document_number.trim()
    );
    let rows = app.detail.apportionment_rows().await;
    if rows.is_empty() {
        output::info("No apportionment");
    }
    for row in &rows {
        output::apportionment_row(row);
    }
    if app.detail.apportionment_has_next().await {
        output::info("More rows available (use --all)");
    }
    Ok(())
}
