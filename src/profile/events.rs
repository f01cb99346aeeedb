//! Change notifications
//!
//! Each publisher (the profile manager, every preference node) owns its own
//! [`EventBus`]. Subscribers are plain callbacks; they never own the
//! publisher, so events carry the IDs a subscriber needs to look things up
//! afterwards.

use std::fmt;

use super::ProfileId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub struct EventBus<E> {
    next_id: u64,
    subscribers: Vec<(SubscriptionId, Box<dyn FnMut(&E)>)>,
}

impl<E> EventBus<E> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            subscribers: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, callback: impl FnMut(&E) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Returns false if `id` was not subscribed
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub, _)| *sub != id);
        self.subscribers.len() != before
    }

    pub fn publish(&mut self, event: &E) {
        for (_, callback) in self.subscribers.iter_mut() {
            callback(event);
        }
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for EventBus<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileEventKind {
    SelectionChanged,
    ProfileDeleted,
    ProfileRenamed,
    ProfileCreated,
    SettingsChanged,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileEvent {
    SelectionChanged { selected: ProfileId },
    ProfileDeleted { deleted: ProfileId },
    ProfileRenamed { old_id: ProfileId, new_id: ProfileId },
    ProfileCreated { created: ProfileId },
    SettingsChanged { profile: ProfileId },
}

impl ProfileEvent {
    pub fn kind(&self) -> ProfileEventKind {
        match self {
            ProfileEvent::SelectionChanged { .. } => ProfileEventKind::SelectionChanged,
            ProfileEvent::ProfileDeleted { .. } => ProfileEventKind::ProfileDeleted,
            ProfileEvent::ProfileRenamed { .. } => ProfileEventKind::ProfileRenamed,
            ProfileEvent::ProfileCreated { .. } => ProfileEventKind::ProfileCreated,
            ProfileEvent::SettingsChanged { .. } => ProfileEventKind::SettingsChanged,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_publish_reaches_all_subscribers() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut bus: EventBus<u32> = EventBus::new();

        let a = Rc::clone(&seen);
        bus.subscribe(move |e| a.borrow_mut().push(("a", *e)));
        let b = Rc::clone(&seen);
        bus.subscribe(move |e| b.borrow_mut().push(("b", *e)));

        bus.publish(&7);
        assert_eq!(*seen.borrow(), vec![("a", 7), ("b", 7)]);
    }

    #[test]
    fn test_unsubscribe() {
        let count = Rc::new(RefCell::new(0));
        let mut bus: EventBus<()> = EventBus::new();
        let c = Rc::clone(&count);
        let id = bus.subscribe(move |_| *c.borrow_mut() += 1);

        bus.publish(&());
        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        bus.publish(&());
        assert_eq!(*count.borrow(), 1);
        assert!(bus.is_empty());
    }
}
