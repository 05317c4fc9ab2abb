use std::{collections::BTreeMap, sync::Arc};

use crate::{connection::link::Link, LinkId};

/// The peers of a Synchronizer, each paired with per-peer state `P`.
/// Iteration follows Link creation order.
pub struct LinkSet<P> {
    links: BTreeMap<LinkId, (Arc<Link>, P)>,
}

impl<P> LinkSet<P> {
    pub fn new() -> Self {
        Self {
            links: BTreeMap::new(),
        }
    }

    /// Adds a peer. Returns false, leaving the existing state untouched, if
    /// the Link is already present.
    pub fn insert(&mut self, link: Arc<Link>, state: P) -> bool {
        let link_id = link.id();
        if self.links.contains_key(&link_id) {
            return false;
        }
        self.links.insert(link_id, (link, state));
        true
    }

    pub fn remove(&mut self, link_id: &LinkId) -> Option<(Arc<Link>, P)> {
        self.links.remove(link_id)
    }

    pub fn contains(&self, link_id: &LinkId) -> bool {
        self.links.contains_key(link_id)
    }

    pub fn get(&self, link_id: &LinkId) -> Option<&P> {
        self.links.get(link_id).map(|(_, state)| state)
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Arc<Link>, &P)> {
        self.links.values().map(|(link, state)| (link, state))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&Arc<Link>, &mut P)> {
        self.links.values_mut().map(|(link, state)| (&*link, state))
    }

    /// Removes and returns every peer whose Link reports disconnected
    pub fn prune_disconnected(&mut self) -> Vec<(Arc<Link>, P)> {
        let gone: Vec<LinkId> = self
            .links
            .iter()
            .filter(|(_, (link, _))| !link.is_connected())
            .map(|(link_id, _)| *link_id)
            .collect();

        gone.iter()
            .filter_map(|link_id| self.links.remove(link_id))
            .collect()
    }
}

impl<P> Default for LinkSet<P> {
    fn default() -> Self {
        Self::new()
    }
}
