//! Instrumentation hook for the search tree.
//!
//! Observers only watch: nothing they do can change the value or the move a
//! search returns.

use std::fmt;
use std::io::{self, Write};

use serde::{Serialize, Serializer};

/// Role of a node in the search tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Max,
    Min,
    Chance,
}

/// Position of a node as the child indices taken from the root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct NodeId {
    path: Vec<u8>,
}

impl NodeId {
    pub fn root() -> Self {
        NodeId::default()
    }

    pub fn child(&self, index: usize) -> Self {
        let mut path = Vec::with_capacity(self.path.len() + 1);
        path.extend_from_slice(&self.path);
        path.push(index as u8);
        NodeId { path }
    }

    pub fn path(&self) -> &[u8] {
        &self.path
    }

    pub fn is_root(&self) -> bool {
        self.path.is_empty()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("root")?;
        for index in &self.path {
            write!(f, ".{index}")?;
        }
        Ok(())
    }
}

impl Serialize for NodeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A node being entered.
#[derive(Debug, Clone, Copy)]
pub struct NodeVisit<'a> {
    pub id: &'a NodeId,
    pub level: usize,
    pub kind: NodeKind,
    pub alpha: f64,
    pub beta: f64,
}

/// Callbacks fired while the tree is explored. All methods default to
/// doing nothing.
pub trait SearchObserver {
    fn on_visit(&mut self, _visit: &NodeVisit<'_>) {}

    /// Bounds after a child of `id` was folded in (`value` is the node's
    /// running best).
    fn on_bounds(&mut self, _id: &NodeId, _alpha: f64, _beta: f64, _value: f64) {}

    /// Remaining children of `id` were cut off.
    fn on_prune(&mut self, _id: &NodeId) {}

    fn on_return(&mut self, _id: &NodeId, _value: f64) {}
}

/// Owned form of an observer callback.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NodeEvent {
    Visit {
        id: NodeId,
        level: usize,
        kind: NodeKind,
        alpha: f64,
        beta: f64,
    },
    Update {
        id: NodeId,
        alpha: f64,
        beta: f64,
        value: f64,
    },
    Prune {
        id: NodeId,
    },
    Return {
        id: NodeId,
        score: f64,
    },
}

impl NodeEvent {
    fn visit(visit: &NodeVisit<'_>) -> Self {
        NodeEvent::Visit {
            id: visit.id.clone(),
            level: visit.level,
            kind: visit.kind,
            alpha: visit.alpha,
            beta: visit.beta,
        }
    }
}

/// Keeps every event in memory.
#[derive(Debug, Default)]
pub struct TraceRecorder {
    events: Vec<NodeEvent>,
}

impl TraceRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[NodeEvent] {
        &self.events
    }

    pub fn into_events(self) -> Vec<NodeEvent> {
        self.events
    }
}

impl SearchObserver for TraceRecorder {
    fn on_visit(&mut self, visit: &NodeVisit<'_>) {
        self.events.push(NodeEvent::visit(visit));
    }

    fn on_bounds(&mut self, id: &NodeId, alpha: f64, beta: f64, value: f64) {
        self.events.push(NodeEvent::Update {
            id: id.clone(),
            alpha,
            beta,
            value,
        });
    }

    fn on_prune(&mut self, id: &NodeId) {
        self.events.push(NodeEvent::Prune { id: id.clone() });
    }

    fn on_return(&mut self, id: &NodeId, value: f64) {
        self.events.push(NodeEvent::Return {
            id: id.clone(),
            score: value,
        });
    }
}

/// Streams events as one JSON object per line. Infinite bounds are written
/// as `null`.
///
/// Write failures cannot interrupt the search, so the first one is kept and
/// reported by [`JsonLinesObserver::finish`]; later events are dropped.
pub struct JsonLinesObserver<W: Write> {
    writer: W,
    error: Option<io::Error>,
}

impl<W: Write> JsonLinesObserver<W> {
    pub fn new(writer: W) -> Self {
        JsonLinesObserver { writer, error: None }
    }

    fn emit(&mut self, event: &NodeEvent) {
        if self.error.is_some() {
            return;
        }
        let result = serde_json::to_writer(&mut self.writer, event)
            .map_err(io::Error::from)
            .and_then(|()| self.writer.write_all(b"\n"));
        if let Err(err) = result {
            self.error = Some(err);
        }
    }

    /// Flush and hand back the writer, or the first write error.
    pub fn finish(mut self) -> io::Result<W> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }
        self.writer.flush()?;
        Ok(self.writer)
    }
}

impl<W: Write> SearchObserver for JsonLinesObserver<W> {
    fn on_visit(&mut self, visit: &NodeVisit<'_>) {
        self.emit(&NodeEvent::visit(visit));
    }

    fn on_bounds(&mut self, id: &NodeId, alpha: f64, beta: f64, value: f64) {
        self.emit(&NodeEvent::Update {
            id: id.clone(),
            alpha,
            beta,
            value,
        });
    }

    fn on_prune(&mut self, id: &NodeId) {
        self.emit(&NodeEvent::Prune { id: id.clone() });
    }

    fn on_return(&mut self, id: &NodeId, value: f64) {
        self.emit(&NodeEvent::Return {
            id: id.clone(),
            score: value,
        });
    }
}
