//! Session change notifications
//!
//! Listeners register with the session and are called synchronously, in
//! registration order, right after each state change.

use std::collections::BTreeSet;
use std::fmt;

use image::RgbaImage;

use crate::model::Rect;
use crate::settings::Settings;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    AtlasChanged,
    DataChanged,
    SelectionChanged,
    RectUpdated,
    ScaleChanged,
    SettingsChanged,
}

/// A change notification borrowing the committed state it describes.
#[derive(Clone, Copy, Debug)]
pub enum SessionEvent<'a> {
    AtlasChanged(Option<&'a RgbaImage>),
    DataChanged(&'a [Rect]),
    SelectionChanged(&'a BTreeSet<usize>),
    RectUpdated { index: usize, rect: &'a Rect },
    ScaleChanged(f32),
    SettingsChanged(&'a Settings),
}

impl SessionEvent<'_> {
    pub fn kind(&self) -> EventKind {
        match self {
            SessionEvent::AtlasChanged(_) => EventKind::AtlasChanged,
            SessionEvent::DataChanged(_) => EventKind::DataChanged,
            SessionEvent::SelectionChanged(_) => EventKind::SelectionChanged,
            SessionEvent::RectUpdated { .. } => EventKind::RectUpdated,
            SessionEvent::ScaleChanged(_) => EventKind::ScaleChanged,
            SessionEvent::SettingsChanged(_) => EventKind::SettingsChanged,
        }
    }
}

type Listener = Box<dyn FnMut(&SessionEvent<'_>)>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct Subscription {
    id: SubscriptionId,
    kind: Option<EventKind>,
    listener: Listener,
}

#[derive(Default)]
pub struct EventBus {
    subscriptions: Vec<Subscription>,
    next_id: u64,
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriptions", &self.subscriptions.len())
            .finish()
    }
}

impl EventBus {
    /// `kind == None` receives every event.
    pub fn subscribe(
        &mut self,
        kind: Option<EventKind>,
        listener: impl FnMut(&SessionEvent<'_>) + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscriptions.push(Subscription {
            id,
            kind,
            listener: Box::new(listener),
        });
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|s| s.id != id);
        self.subscriptions.len() != before
    }

    pub fn emit(&mut self, event: &SessionEvent<'_>) {
        let kind = event.kind();
        for subscription in &mut self.subscriptions {
            if subscription.kind.map_or(true, |k| k == kind) {
                (subscription.listener)(event);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn listeners_run_in_registration_order_with_filters() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::default();

        let first = log.clone();
        bus.subscribe(
            None,
            move |e: &SessionEvent<'_>| first.borrow_mut().push(format!("all:{:?}", e.kind())),
        );
        let second = log.clone();
        bus.subscribe(
            Some(EventKind::ScaleChanged),
            move |e: &SessionEvent<'_>| second.borrow_mut().push(format!("scale:{:?}", e.kind())),
        );

        bus.emit(&SessionEvent::ScaleChanged(2.0));
        bus.emit(&SessionEvent::DataChanged(&[]));

        assert_eq!(
            *log.borrow(),
            vec![
                "all:ScaleChanged".to_string(),
                "scale:ScaleChanged".to_string(),
                "all:DataChanged".to_string(),
            ]
        );
    }

    #[test]
    fn unsubscribed_listeners_stop_receiving() {
        let count = Rc::new(RefCell::new(0));
        let mut bus = EventBus::default();
        let counter = count.clone();
        let id = bus.subscribe(None, move |_: &SessionEvent<'_>| *counter.borrow_mut() += 1);

        bus.emit(&SessionEvent::ScaleChanged(1.0));
        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        bus.emit(&SessionEvent::ScaleChanged(1.0));

        assert_eq!(*count.borrow(), 1);
        assert!(bus.is_empty());
    }
}
