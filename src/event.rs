use crate::model::{Task, TaskId};

/// Notification fired after each successful mutation. Add and update carry
/// the raw task record the host should persist; delete carries only the id,
/// which no longer resolves by the time the event fires.
#[derive(Debug, Clone, PartialEq)]
pub enum GanttEvent {
    TaskAdded(Task),
    TaskUpdated(Task),
    TaskDeleted(TaskId),
}

/// A registered host callback.
pub type EventListener = Box<dyn FnMut(&GanttEvent)>;

/// Host callbacks, invoked in registration order. These are the widget's
/// only notification channel; it persists nothing itself.
#[derive(Default)]
pub struct Listeners {
    callbacks: Vec<EventListener>,
}

impl Listeners {
    pub fn register(&mut self, listener: impl FnMut(&GanttEvent) + 'static) {
        self.callbacks.push(Box::new(listener));
    }

    pub fn notify(&mut self, event: &GanttEvent) {
        for callback in &mut self.callbacks {
            callback(event);
        }
    }
}
