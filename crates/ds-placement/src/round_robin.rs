//! Largest-type round-robin.
//!
//! Built once per session from the catalog: find the first server with the
//! most cores, collect every server of that server's type in catalog order,
//! then hand them out in strict rotation. The cursor advances on every call
//! and wraps to zero.

use ds_core::Catalog;

#[derive(Debug, Clone, Default)]
pub struct LargestRoundRobin {
    /// Catalog positions of the largest-type servers, in catalog order.
    servers: Vec<usize>,
    cursor: usize,
}

impl LargestRoundRobin {
    pub fn new(catalog: &Catalog) -> Self {
        let mut largest: Option<(&str, i64)> = None;
        for server in catalog {
            let cores = server.total().cores;
            if largest.is_none_or(|(_, max)| cores > max) {
                largest = Some((server.kind(), cores));
            }
        }

        let servers = match largest {
            Some((kind, _)) => catalog
                .iter()
                .enumerate()
                .filter(|(_, s)| s.kind() == kind)
                .map(|(pos, _)| pos)
                .collect(),
            None => Vec::new(),
        };

        Self { servers, cursor: 0 }
    }

    /// Select the next server position, advancing the cursor.
    ///
    /// Returns `None` if the catalog was empty.
    pub fn next(&mut self) -> Option<usize> {
        let pos = *self.servers.get(self.cursor)?;
        self.cursor = (self.cursor + 1) % self.servers.len();
        Some(pos)
    }

    /// Catalog positions in rotation order.
    pub fn servers(&self) -> &[usize] {
        &self.servers
    }

    /// Index into [`servers`](Self::servers) that the next call will use.
    pub fn cursor(&self) -> usize {
        self.cursor
    }
}
