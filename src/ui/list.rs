// src/ui/list.rs
// DOCUMENTATION: Results list
// PURPOSE: One row per result, bound to results store snapshots

use std::io::{self, Write};

use crate::services::ResultsSnapshot;

/// List widget showing the current results
pub trait ResultsView: Send {
    /// Heading above the rows (locality and postal code)
    fn set_title(&mut self, title: &str);

    /// Redraw every row from a snapshot
    fn reload(&mut self, snapshot: &ResultsSnapshot);
}

/// Results list written to a terminal or any other writer
pub struct TerminalList<W: Write + Send> {
    out: W,
    title: Option<String>,
    rows: Vec<String>,
}

impl<W: Write + Send> TerminalList<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            title: None,
            rows: Vec::new(),
        }
    }

    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn render(&mut self) -> io::Result<()> {
        if let Some(title) = &self.title {
            writeln!(self.out, "== {} ==", title)?;
        }
        if self.rows.is_empty() {
            writeln!(self.out, "  (no results)")?;
        }
        for (idx, row) in self.rows.iter().enumerate() {
            writeln!(self.out, "  {}. {}", idx + 1, row)?;
        }
        self.out.flush()
    }
}

impl<W: Write + Send> ResultsView for TerminalList<W> {
    fn set_title(&mut self, title: &str) {
        self.title = Some(title.to_string());
    }

    fn reload(&mut self, snapshot: &ResultsSnapshot) {
        self.rows = snapshot.names();
        if let Err(e) = self.render() {
            log::warn!("Failed to render results list: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Coordinate, PlaceResult};
    use crate::services::ResultsStore;

    #[test]
    fn test_rows_follow_snapshot() {
        let store = ResultsStore::new();
        let mut list = TerminalList::new(Vec::new());
        list.set_title("Salt Lake City - 84111");

        let coordinate = Coordinate::new(40.76, -111.89).unwrap();
        let snapshot = store.replace(vec![
            PlaceResult::new("Pie Hole", coordinate),
            PlaceResult::new("Settebello Pizzeria", coordinate),
        ]);
        list.reload(&snapshot);
        assert_eq!(list.rows(), &["Pie Hole", "Settebello Pizzeria"]);

        list.reload(&store.replace(Vec::new()));
        assert!(list.rows().is_empty());

        let output = String::from_utf8(list.into_inner()).unwrap();
        assert!(output.contains("== Salt Lake City - 84111 =="));
        assert!(output.contains("  2. Settebello Pizzeria"));
        assert!(output.contains("  (no results)"));
    }
}
