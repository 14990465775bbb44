//! Temporary variable allocation.
//!
//! Temporaries are named `$__N`. Each program or function-like body owns one
//! scope; names still allocated when the scope is popped must be declared at
//! the top of that body.

use std::collections::BTreeSet;
use tracing::trace;

pub const TEMP_VAR_PREFIX: &str = "$__";

#[derive(Debug, Default)]
pub struct TempVarAllocator {
    next_id: u32,
    /// Released ids, handed out again lowest first.
    free: BTreeSet<u32>,
    scopes: Vec<Vec<u32>>,
}

impl TempVarAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(Vec::new());
    }

    /// Pop the innermost scope and return the names it still holds, in
    /// allocation order.
    pub fn pop_scope(&mut self) -> Vec<String> {
        self.scopes
            .pop()
            .unwrap_or_default()
            .into_iter()
            .map(temp_name)
            .collect()
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Allocate a temporary in the innermost scope.
    pub fn add_temp_var(&mut self) -> String {
        let id = match self.free.pop_first() {
            Some(id) => id,
            None => {
                let id = self.next_id;
                self.next_id += 1;
                id
            }
        };
        if let Some(scope) = self.scopes.last_mut() {
            scope.push(id);
        }
        let name = temp_name(id);
        trace!(name = %name, depth = self.scopes.len(), "allocated temp var");
        name
    }

    /// Release `name` from the innermost scope. Returns `false` if it is not a
    /// temporary held there.
    pub fn remove_temp_var(&mut self, name: &str) -> bool {
        let Some(id) = parse_temp_name(name) else {
            return false;
        };
        let Some(scope) = self.scopes.last_mut() else {
            return false;
        };
        let Some(pos) = scope.iter().position(|&held| held == id) else {
            return false;
        };
        scope.remove(pos);
        self.free.insert(id);
        trace!(name, "released temp var");
        true
    }
}

fn temp_name(id: u32) -> String {
    format!("{TEMP_VAR_PREFIX}{id}")
}

fn parse_temp_name(name: &str) -> Option<u32> {
    name.strip_prefix(TEMP_VAR_PREFIX)?.parse().ok()
}

#[cfg(test)]
#[path = "../tests/temp_vars.rs"]
mod tests;
