//! Parent/child inference between snapshots.
//!
//! Nodes live in an arena indexed by their position after sorting by `utime`.
//! A parent always precedes its children in that order, so the owned forest can
//! be materialized back-to-front without recursion.

use std::collections::HashMap;

use debugbar_types::{RequestNode, SnapshotRecord};

/// Maximum gap, in seconds, between a redirect response and the request that follows it.
pub const NAVIGATION_WINDOW_SECS: f64 = 5.0;

/// Why a snapshot was attached to its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParentLink {
    /// The parent redirected (`location`) to the child's URL shortly before it.
    Navigation,
    /// The child's `referer` is the parent's URL within the same session.
    Referral,
}

/// Snapshots in ascending `utime` order together with their inferred parents.
#[derive(Debug)]
pub struct RequestArena {
    records: Vec<SnapshotRecord>,
    parents: Vec<Option<(usize, ParentLink)>>,
}

impl RequestArena {
    /// Deduplicate by id, sort by time and link every record to at most one parent.
    ///
    /// On id collisions the later record replaces the earlier one.
    pub fn new(records: Vec<SnapshotRecord>) -> Self {
        let mut records = dedupe_by_id(records);
        records.sort_by(|a, b| a.utime.total_cmp(&b.utime));

        let parents = (0..records.len())
            .map(|child| find_parent(&records, child))
            .collect();

        Self { records, parents }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[SnapshotRecord] {
        &self.records
    }

    /// Parent id and link kind for the record with `id`, if it was attached.
    pub fn parent_of(&self, id: &str) -> Option<(&str, ParentLink)> {
        let index = self.records.iter().position(|r| r.id == id)?;
        self.parents[index].map(|(parent, link)| (self.records[parent].id.as_str(), link))
    }

    /// Consume the arena into owned trees, newest root first.
    ///
    /// Roots with equal `utime` keep their ascending-time order.
    pub fn into_forest(self) -> Vec<RequestNode> {
        let len = self.records.len();
        let mut children: Vec<Vec<usize>> = vec![Vec::new(); len];
        let mut roots = Vec::new();

        for (index, parent) in self.parents.iter().enumerate() {
            match parent {
                Some((parent, _)) => children[*parent].push(index),
                None => roots.push(index),
            }
        }

        let utimes: Vec<f64> = self.records.iter().map(|r| r.utime).collect();
        roots.sort_by(|&a, &b| utimes[b].total_cmp(&utimes[a]));

        let mut built: Vec<Option<RequestNode>> = Vec::with_capacity(len);
        built.resize_with(len, || None);

        // Children sort strictly after their parent, so they are built first.
        for (index, record) in self.records.into_iter().enumerate().rev() {
            let node_children = children[index]
                .iter()
                .filter_map(|&child| built[child].take())
                .collect();
            built[index] = Some(RequestNode {
                record,
                children: node_children,
            });
        }

        roots
            .into_iter()
            .filter_map(|root| built[root].take())
            .collect()
    }
}

/// Build the request forest for a batch of snapshots.
pub fn build_request_tree(records: Vec<SnapshotRecord>) -> Vec<RequestNode> {
    RequestArena::new(records).into_forest()
}

fn dedupe_by_id(records: Vec<SnapshotRecord>) -> Vec<SnapshotRecord> {
    let mut slots: HashMap<String, usize> = HashMap::new();
    let mut unique: Vec<SnapshotRecord> = Vec::with_capacity(records.len());

    for record in records {
        match slots.get(&record.id) {
            Some(&slot) => unique[slot] = record,
            None => {
                slots.insert(record.id.clone(), unique.len());
                unique.push(record);
            }
        }
    }

    unique
}

// Candidates are visited once in ascending time; the first one with either
// kind of evidence wins, navigation checked before referral.
fn find_parent(records: &[SnapshotRecord], child: usize) -> Option<(usize, ParentLink)> {
    let current = &records[child];

    records
        .iter()
        .enumerate()
        .filter(|(index, parent)| *index != child && parent.utime < current.utime)
        .find_map(|(index, parent)| {
            if is_navigation(parent, current) {
                Some((index, ParentLink::Navigation))
            } else if is_referral(parent, current) {
                Some((index, ParentLink::Referral))
            } else {
                None
            }
        })
}

fn is_navigation(parent: &SnapshotRecord, child: &SnapshotRecord) -> bool {
    !parent.location.is_empty()
        && parent.location == child.url
        && child.utime - parent.utime < NAVIGATION_WINDOW_SECS
}

fn is_referral(parent: &SnapshotRecord, child: &SnapshotRecord) -> bool {
    !child.referer.is_empty()
        && child.referer == parent.url
        && (child.session_token.is_empty() || child.session_token == parent.session_token)
}
