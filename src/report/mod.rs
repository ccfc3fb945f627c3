//! Fetch → aggregate → print.
//!
//! [`collect`] walks the workspace list in API order, fetching `/meta` for
//! each one. A workspace whose metadata cannot be fetched or decoded is
//! logged and left out of every table. [`render`] then writes the
//! per-workspace and/or totals tables.

pub mod aggregate;
pub mod table;

use std::io::Write;

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Deserialize;
use tracing::{debug, error, info};

use crate::admin::AdminClient;
use aggregate::Counts;
use table::{Align, Table};

/// Counters shown in the per-workspace table. Other keys only reach the
/// totals table.
pub const WORKSPACE_COLUMNS: [&str; 5] = ["plugins", "targets", "services", "routes", "upstreams"];

/// Label of the synthetic totals row carrying the number of rendered workspaces.
pub const WORKSPACES_ROW: &str = "Workspaces";

// ─── Options ─────────────────────────────────────────────────────────────────

/// Which table(s) to print.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetaView {
    /// Per-workspace counts only
    Workspace,
    /// Totals across all workspaces only
    #[default]
    Counts,
    /// Both tables
    All,
}

impl MetaView {
    fn shows_workspaces(self) -> bool {
        matches!(self, MetaView::Workspace | MetaView::All)
    }

    fn shows_totals(self) -> bool {
        matches!(self, MetaView::Counts | MetaView::All)
    }
}

/// Row order of the totals table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// First-seen counter order, `Workspaces` last
    #[default]
    Insertion,
    /// Ascending by count, `Workspaces` included
    Count,
}

// ─── Collection ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct WorkspaceCounts {
    pub name:   String,
    pub counts: Counts,
}

impl WorkspaceCounts {
    fn get(&self, field: &str) -> i64 {
        self.counts.get(field).copied().unwrap_or(0)
    }
}

/// Everything the tables need: one entry per successfully fetched
/// workspace, and the running totals over exactly those entries.
#[derive(Debug, Default)]
pub struct Inventory {
    pub workspaces: Vec<WorkspaceCounts>,
    pub totals:     Counts,
}

impl Inventory {
    pub fn record(&mut self, name: &str, counts: Counts) {
        aggregate::merge(&mut self.totals, &counts);
        self.workspaces.push(WorkspaceCounts { name: name.to_string(), counts });
    }

    /// Totals rows plus the synthetic `Workspaces` row, ordered per `sort`.
    pub fn total_rows(&self, sort: SortOrder) -> Vec<(String, i64)> {
        let mut rows: Vec<(String, i64)> =
            self.totals.iter().map(|(k, v)| (k.clone(), *v)).collect();
        rows.push((WORKSPACES_ROW.to_string(), self.workspaces.len() as i64));
        if sort == SortOrder::Count {
            rows.sort_by_key(|(_, count)| *count);
        }
        rows
    }
}

/// Fetch the workspace list, then each workspace's counts.
///
/// Only the list fetch is fatal.
pub fn collect(client: &AdminClient) -> Result<Inventory> {
    let workspaces = client
        .list_workspaces()
        .context("Error getting workspaces")?;
    info!(count = workspaces.len(), base_url = client.base_url(), "listed workspaces");

    let mut inventory = Inventory::default();
    for workspace in &workspaces {
        let url = client.meta_url(&workspace.name);
        debug!(workspace = %workspace.name, id = %workspace.id, "fetching metadata");
        let meta = match client.fetch_metadata(&url) {
            Ok(m) => m,
            Err(e) => {
                error!(workspace = %workspace.name, "Error getting metadata for workspace: {e}");
                continue;
            }
        };
        inventory.record(&workspace.name, aggregate::flatten(&meta.counts));
    }

    info!(
        fetched = inventory.workspaces.len(),
        skipped = workspaces.len() - inventory.workspaces.len(),
        "collected workspace metadata"
    );
    Ok(inventory)
}

// ─── Rendering ───────────────────────────────────────────────────────────────

pub fn workspace_table(inventory: &Inventory) -> Table {
    let mut table = Table::new(&["Workspace", "Plugins", "Targets", "Services", "Routes", "Upstreams"]);
    for column in 1..=WORKSPACE_COLUMNS.len() {
        table = table.align(column, Align::Right);
    }
    for ws in &inventory.workspaces {
        let mut row = vec![ws.name.clone()];
        row.extend(WORKSPACE_COLUMNS.iter().map(|f| ws.get(f).to_string()));
        table.push_row(row);
    }
    table
}

pub fn totals_table(inventory: &Inventory, sort: SortOrder) -> Table {
    let mut table = Table::new(&["Meta Field", "Count"]).align(1, Align::Right);
    for (field, count) in inventory.total_rows(sort) {
        table.push_row(vec![field, count.to_string()]);
    }
    table
}

pub fn render<W: Write>(
    inventory: &Inventory,
    view: MetaView,
    sort: SortOrder,
    out: &mut W,
) -> std::io::Result<()> {
    if view.shows_workspaces() {
        writeln!(out, "Individual Workspace Metadata:")?;
        write!(out, "{}", workspace_table(inventory).render())?;
    }
    if view.shows_totals() {
        writeln!(out, "Total Entity Counts:")?;
        write!(out, "{}", totals_table(inventory, sort).render())?;
    }
    Ok(())
}
