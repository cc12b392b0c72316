use colored::Colorize;
use serde_json::Value;

use aprov_core::branch::Branch;
use aprov_core::document::{Document, DocumentItem, DocumentType};
use aprov_core::module::ModuleItem;

pub fn success(message: impl AsRef<str>) {
    println!("{} {}", "✓".green().bold(), message.as_ref());
}

pub fn warn(message: impl AsRef<str>) {
    eprintln!("{} {}", "!".yellow().bold(), message.as_ref());
}

pub fn info(message: impl AsRef<str>) {
    println!("{}", message.as_ref().dimmed());
}

pub fn document_row(document: &Document, selected: bool) {
    let marker = if selected { "*".cyan().bold() } else { " ".normal() };
    println!(
        "{} {:>8}  {:<4} {:<12} {:<10} {:>14}  {}",
        marker,
        document.scr_id.to_string().bold(),
        document.type_key(),
        document.document_number.trim(),
        document.display_branch(),
        format!(
            "{} {:.2}",
            document.document_symbol.trim(),
            document.document_total
        ),
        document.document_user_name.trim().dimmed(),
    );
}

pub fn document_header() {
    println!(
        "  {:>8}  {:<4} {:<12} {:<10} {:>14}  {}",
        "scrId", "type", "number", "branch", "total", "requester"
    );
}

pub fn item_row(item: &DocumentItem) {
    println!(
        "  {:<6} {:<16} {:<30} {:>10} {:>12} {:>12}",
        item.item_number.as_deref().unwrap_or("-"),
        item.product.as_deref().unwrap_or("-").trim(),
        item.item_sku_description.as_deref().unwrap_or("").trim(),
        item.quantity.map(|q| format!("{:.2}", q)).unwrap_or_default(),
        item.unit_value.map(|v| format!("{:.2}", v)).unwrap_or_default(),
        item.item_total.map(|v| format!("{:.2}", v)).unwrap_or_default(),
    );
}

pub fn document_type_title(document_type: &str) -> String {
    format!(
        "{} ({})",
        DocumentType::label_for(document_type),
        document_type.trim().to_uppercase()
    )
}

pub fn branch_row(branch: &Branch, selected: bool) {
    let marker = if selected { "*".cyan().bold() } else { " ".normal() };
    println!("{} {:<10} {}", marker, branch.code.bold(), branch.description);
}

pub fn module_row(module: &ModuleItem, selected: bool) {
    let marker = if selected { "*".cyan().bold() } else { " ".normal() };
    println!(
        "{} {:<12} {:<20} {}",
        marker,
        module.id.bold(),
        module.name,
        module.description.dimmed()
    );
}

/// First column of a generic-query row whose name ends with `suffix`.
/// Apportionment rows carry `cx_` or `ch_` prefixes depending on the table.
fn column<'a>(row: &'a Value, suffix: &str) -> &'a str {
    row.as_object()
        .and_then(|columns| {
            columns
                .iter()
                .find(|(name, _)| name.ends_with(suffix))
                .and_then(|(_, value)| value.as_str())
        })
        .map(str::trim)
        .unwrap_or("-")
}

pub fn apportionment_row(row: &Value) {
    let document_item = match column(row, "_itemsol") {
        "-" => column(row, "_itempd"),
        item => item,
    };
    println!(
        "  {:<6} {:<4} {:>7}%  {:<12} {:<24} {}",
        document_item,
        column(row, "_item"),
        column(row, "_perc"),
        column(row, "_cc"),
        column(row, "ctt_desc01"),
        column(row, "_conta").dimmed(),
    );
}

/// Pretty-prints a raw JSON payload passed through from the server.
pub fn json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{}", text),
        Err(_) => println!("{}", value),
    }
}
