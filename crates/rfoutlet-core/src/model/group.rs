// ── Group domain type ──

use serde::{Deserialize, Serialize};

use super::outlet::Outlet;

/// A named collection of outlets controllable together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub name: String,
    /// Outlets in server order. Empty when the group has none.
    pub outlets: Vec<Outlet>,
}

impl Group {
    pub fn outlet(&self, id: &str) -> Option<&Outlet> {
        self.outlets.iter().find(|o| o.id == id)
    }
}
