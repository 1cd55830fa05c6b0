//! The ordered server catalog for one session.
//!
//! The catalog is filled once from the simulator's `GETS All` reply and
//! keeps the simulator's order: first-fit style placement walks it front to
//! back. Positions are stable for the catalog's lifetime.

use std::collections::HashMap;

use crate::server::{Server, ServerId};

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    servers: Vec<Server>,
    by_id: HashMap<ServerId, usize>,
}

impl Catalog {
    /// Build a catalog from servers in simulator order.
    ///
    /// If two servers share an id, lookups by id resolve to the first one.
    pub fn new(servers: Vec<Server>) -> Self {
        let mut by_id = HashMap::with_capacity(servers.len());
        for (pos, server) in servers.iter().enumerate() {
            by_id.entry(server.id().clone()).or_insert(pos);
        }
        Self { servers, by_id }
    }

    pub fn len(&self) -> usize {
        self.servers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Server> {
        self.servers.iter()
    }

    pub fn get(&self, pos: usize) -> Option<&Server> {
        self.servers.get(pos)
    }

    pub fn get_mut(&mut self, pos: usize) -> Option<&mut Server> {
        self.servers.get_mut(pos)
    }

    /// Catalog position of the server with this id.
    pub fn position(&self, id: &ServerId) -> Option<usize> {
        self.by_id.get(id).copied()
    }

    pub fn find(&self, id: &ServerId) -> Option<&Server> {
        self.position(id).and_then(|pos| self.servers.get(pos))
    }

    pub fn find_mut(&mut self, id: &ServerId) -> Option<&mut Server> {
        let pos = self.position(id)?;
        self.servers.get_mut(pos)
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Server;
    type IntoIter = std::slice::Iter<'a, Server>;

    fn into_iter(self) -> Self::IntoIter {
        self.servers.iter()
    }
}
