use crossbeam_channel::{unbounded, Receiver, Sender};
use lineage_core::PersonId;
use serde::{Deserialize, Serialize};

/// Input coming from the interaction layer. Pointer coordinates are in
/// canvas pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    // Rendering
    FocusPerson {
        id: PersonId,
    },
    ShowWholeForest,

    // Viewport
    ResetZoom,
    PanBy {
        dx: f32,
        dy: f32,
    },
    ZoomAt {
        x: f32,
        y: f32,
        delta: f32,
    },
    ViewportResized {
        width: f32,
        height: f32,
    },

    // Pointer
    PointerDown {
        x: f32,
        y: f32,
    },
    PointerMove {
        x: f32,
        y: f32,
    },
    PointerUp,
    /// Released without (or after) a drag; may select a person card.
    Click {
        x: f32,
        y: f32,
    },
}

#[derive(Clone)]
pub struct EventBus {
    tx: Sender<Event>,
    rx: Receiver<Event>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx }
    }

    pub fn sender(&self) -> Sender<Event> {
        self.tx.clone()
    }

    pub fn receiver(&self) -> Receiver<Event> {
        self.rx.clone()
    }

    pub fn publish(&self, event: Event) {
        if self.tx.send(event).is_err() {
            tracing::warn!("Event bus has no receiver; dropping event");
        }
    }

    /// Dispatch all pending events to a listener, in publish order.
    pub fn dispatch_to<L: EventListener>(&self, listener: &mut L) -> usize {
        let mut handled = 0;
        while let Ok(event) = self.rx.try_recv() {
            listener.handle_event(&event);
            handled += 1;
        }
        handled
    }
}

/// Trait for components that respond to events.
/// Implement this to receive events from the EventBus.
pub trait EventListener {
    fn handle_event(&mut self, event: &Event);
}
