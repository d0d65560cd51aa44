use std::fmt;
use std::str::FromStr;
use std::sync::mpsc::{self, Receiver, Sender};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::{trace, warn};

use crate::error::{ChartError, ChartResult};
use crate::interaction::PointMark;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventKind {
    ElementClick,
    ElementMouseover,
    ElementMouseout,
    RenderEnd,
}

impl EventKind {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::ElementClick => "elementClick",
            Self::ElementMouseover => "elementMouseover",
            Self::ElementMouseout => "elementMouseout",
            Self::RenderEnd => "renderEnd",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EventKind {
    type Err = ChartError;

    fn from_str(s: &str) -> ChartResult<Self> {
        [
            Self::ElementClick,
            Self::ElementMouseover,
            Self::ElementMouseout,
            Self::RenderEnd,
        ]
        .into_iter()
        .find(|kind| kind.name() == s)
        .ok_or_else(|| ChartError::InvalidData(format!("unknown event type `{s}`")))
    }
}

/// Payload of a chart event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "type", content = "element")]
pub enum ChartEvent {
    ElementClick(PointMark),
    ElementMouseover(PointMark),
    ElementMouseout(PointMark),
    RenderEnd,
}

impl ChartEvent {
    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self {
            Self::ElementClick(_) => EventKind::ElementClick,
            Self::ElementMouseover(_) => EventKind::ElementMouseover,
            Self::ElementMouseout(_) => EventKind::ElementMouseout,
            Self::RenderEnd => EventKind::RenderEnd,
        }
    }

    #[must_use]
    pub fn element(&self) -> Option<&PointMark> {
        match self {
            Self::ElementClick(mark) | Self::ElementMouseover(mark) | Self::ElementMouseout(mark) => {
                Some(mark)
            }
            Self::RenderEnd => None,
        }
    }
}

pub type EventHandler = Box<dyn FnMut(&ChartEvent) + Send>;

/// Named event dispatcher.
///
/// Handlers are registered under `type` or `type.name`; registering the same
/// type name again replaces the previous handler. Channel subscribers get a
/// copy of every event.
pub struct Dispatcher {
    kinds: SmallVec<[EventKind; 4]>,
    handlers: IndexMap<String, (EventKind, EventHandler)>,
    subscribers: Vec<Sender<ChartEvent>>,
}

impl Dispatcher {
    #[must_use]
    pub fn new(kinds: &[EventKind]) -> Self {
        Self {
            kinds: kinds.iter().copied().collect(),
            handlers: IndexMap::new(),
            subscribers: Vec::new(),
        }
    }

    #[must_use]
    pub fn supports(&self, kind: EventKind) -> bool {
        self.kinds.contains(&kind)
    }

    pub fn kinds(&self) -> impl Iterator<Item = EventKind> + '_ {
        self.kinds.iter().copied()
    }

    /// Registers `handler` for `typename` (`"elementClick"` or `"elementClick.tooltip"`).
    pub fn on<F>(&mut self, typename: &str, handler: F) -> ChartResult<()>
    where
        F: FnMut(&ChartEvent) + Send + 'static,
    {
        let kind = self.parse_typename(typename)?;
        self.handlers
            .insert(typename.to_owned(), (kind, Box::new(handler)));
        Ok(())
    }

    /// Removes the handler registered under `typename`.
    pub fn off(&mut self, typename: &str) -> bool {
        self.handlers.shift_remove(typename).is_some()
    }

    /// Opens a channel that receives every event emitted from now on.
    pub fn subscribe(&mut self) -> Receiver<ChartEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    pub fn emit(&mut self, event: ChartEvent) {
        let kind = event.kind();
        if !self.supports(kind) {
            warn!(event = %kind, "dropping event not declared by this dispatcher");
            return;
        }

        trace!(event = %kind, "dispatch");
        for (handler_kind, handler) in self.handlers.values_mut() {
            if *handler_kind == kind {
                handler(&event);
            }
        }
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    fn parse_typename(&self, typename: &str) -> ChartResult<EventKind> {
        let kind: EventKind = typename
            .split_once('.')
            .map_or(typename, |(kind, _)| kind)
            .parse()?;
        if !self.supports(kind) {
            return Err(ChartError::InvalidData(format!(
                "event type `{kind}` is not dispatched here"
            )));
        }
        Ok(kind)
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("kinds", &self.kinds)
            .field("handlers", &self.handlers.keys().collect::<Vec<_>>())
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
