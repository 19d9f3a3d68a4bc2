//! Conflict Resolver
//!
//! Gatekeeper between a proposed table name and the store. When the name is
//! already taken, a [`ConflictResolver`] decides whether to overwrite, rename
//! or skip.

use crate::database::catalog;
use crate::database::connection::Store;
use crate::error::Result;
use std::collections::VecDeque;

/// Outcome of a name collision
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Drop the existing table and reuse the name
    Overwrite,
    /// Load into a different table
    RenameTo(String),
    /// Abandon the load
    Skip,
}

/// Capability that decides what to do about an existing table
pub trait ConflictResolver {
    /// Decide how to handle a load into the existing table `table`
    fn resolve(&mut self, table: &str) -> Decision;
}

/// Resolver that replays a fixed list of decisions.
///
/// Once the list runs out every further conflict is skipped.
#[derive(Debug, Clone, Default)]
pub struct ScriptedResolver {
    decisions: VecDeque<Decision>,
    asked: Vec<String>,
}

impl ScriptedResolver {
    /// Create a resolver from canned decisions
    pub fn new(decisions: impl IntoIterator<Item = Decision>) -> Self {
        Self {
            decisions: decisions.into_iter().collect(),
            asked: Vec::new(),
        }
    }

    /// Table names the resolver was asked about, in order
    pub fn asked(&self) -> &[String] {
        &self.asked
    }
}

impl ConflictResolver for ScriptedResolver {
    fn resolve(&mut self, table: &str) -> Decision {
        self.asked.push(table.to_string());
        self.decisions.pop_front().unwrap_or(Decision::Skip)
    }
}

/// Resolve the table a load should write into.
///
/// Returns `None` when the load should be abandoned. A rename target is
/// checked again, so the returned name is always free or was explicitly
/// overwritten.
pub async fn resolve_table_name(
    store: &Store,
    table: &str,
    resolver: &mut dyn ConflictResolver,
) -> Result<Option<String>> {
    let mut name = table.to_string();

    loop {
        if !catalog::table_exists(store, &name).await? {
            return Ok(Some(name));
        }

        match resolver.resolve(&name) {
            Decision::Overwrite => {
                catalog::drop_table(store, &name).await?;
                return Ok(Some(name));
            }
            Decision::RenameTo(new_name) => {
                let new_name = new_name.trim();
                if new_name.is_empty() {
                    tracing::warn!(table = %name, "empty rename target, skipping load");
                    return Ok(None);
                }
                tracing::info!(from = %name, to = new_name, "renamed load target");
                name = new_name.to_string();
            }
            Decision::Skip => {
                tracing::info!(table = %name, "skipped load into existing table");
                return Ok(None);
            }
        }
    }
}
