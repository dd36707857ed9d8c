use brm_types::{InputResult, PlayState};

use crate::event::Event;

/// Observer of session changes. Every method defaults to a no-op.
pub trait EngineListener {
    fn on_play_state_changed(&mut self, _old: PlayState, _new: PlayState) {}
    fn on_event_added(&mut self, _event: &Event) {}
    fn on_event_removed(&mut self, _event: &Event) {}
    fn on_input_received(&mut self, _result: &InputResult) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Listener registry owned by a session. Listeners stay registered until
/// explicitly unsubscribed.
#[derive(Default)]
pub struct Listeners {
    next_id: u64,
    entries: Vec<(ListenerId, Box<dyn EngineListener>)>,
}

impl Listeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: Box<dyn EngineListener>) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, listener));
        id
    }

    /// Removes and returns the listener, if still registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> Option<Box<dyn EngineListener>> {
        let index = self.entries.iter().position(|(entry, _)| *entry == id)?;
        Some(self.entries.remove(index).1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Calls `f` on each listener in subscription order.
    pub fn notify<F>(&mut self, mut f: F)
    where
        F: FnMut(&mut dyn EngineListener),
    {
        for (_, listener) in &mut self.entries {
            f(listener.as_mut());
        }
    }
}

impl std::fmt::Debug for Listeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listeners")
            .field("count", &self.entries.len())
            .finish()
    }
}
