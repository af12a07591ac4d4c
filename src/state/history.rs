//! Back/forward history over in-app addresses

use super::address::Route;

/// Browser-style history: a list of visited routes and a cursor.
/// Visiting a new route drops everything ahead of the cursor.
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<Route>,
    cursor: usize,
}

impl History {
    pub fn new(initial: Route) -> Self {
        Self {
            entries: vec![initial],
            cursor: 0,
        }
    }

    /// The route currently on screen
    pub fn current(&self) -> &Route {
        &self.entries[self.cursor]
    }

    /// Visit `route`. Visiting the current route again is a no-op.
    /// Returns whether anything changed.
    pub fn push(&mut self, route: Route) -> bool {
        if *self.current() == route {
            return false;
        }
        self.entries.truncate(self.cursor + 1);
        self.entries.push(route);
        self.cursor += 1;
        true
    }

    pub fn can_go_back(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_go_forward(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    pub fn back(&mut self) -> Option<&Route> {
        if !self.can_go_back() {
            return None;
        }
        self.cursor -= 1;
        Some(self.current())
    }

    pub fn forward(&mut self) -> Option<&Route> {
        if !self.can_go_forward() {
            return None;
        }
        self.cursor += 1;
        Some(self.current())
    }
}
