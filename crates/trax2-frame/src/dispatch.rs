//! Per-category handler table.
//!
//! At most one handler per [`FrameCategory`]. Registering again replaces
//! the previous handler. Frames whose category has no handler are handed
//! back to the caller rather than dropped.

use crate::response::{DecodedFrame, FrameCategory};

type Handler<'a> = Box<dyn FnMut(&DecodedFrame) + 'a>;

pub struct Handlers<'a> {
    slots: [Option<Handler<'a>>; FrameCategory::COUNT],
}

impl Default for Handlers<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Handlers<'a> {
    /// An empty table.
    pub fn new() -> Self {
        Self {
            slots: std::array::from_fn(|_| None),
        }
    }

    /// Builder form of [`Handlers::set`].
    pub fn on<F>(mut self, category: FrameCategory, handler: F) -> Self
    where
        F: FnMut(&DecodedFrame) + 'a,
    {
        self.set(category, handler);
        self
    }

    /// Register `handler` for `category`, replacing any earlier one.
    pub fn set<F>(&mut self, category: FrameCategory, handler: F)
    where
        F: FnMut(&DecodedFrame) + 'a,
    {
        self.slots[category.index()] = Some(Box::new(handler));
    }

    /// Unregister the handler for `category`. Returns whether one was set.
    pub fn remove(&mut self, category: FrameCategory) -> bool {
        self.slots[category.index()].take().is_some()
    }

    pub fn is_registered(&self, category: FrameCategory) -> bool {
        self.slots[category.index()].is_some()
    }

    /// Hand `frame` to its category's handler.
    ///
    /// Returns the frame untouched when no handler is registered.
    pub fn dispatch(&mut self, frame: DecodedFrame) -> Option<DecodedFrame> {
        match self.slots[frame.category().index()].as_mut() {
            Some(handler) => {
                handler(&frame);
                None
            }
            None => {
                tracing::trace!(category = %frame.category(), "no handler registered");
                Some(frame)
            }
        }
    }
}

impl std::fmt::Debug for Handlers<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let registered: Vec<_> = FrameCategory::ALL
            .iter()
            .filter(|category| self.is_registered(**category))
            .collect();
        f.debug_struct("Handlers")
            .field("registered", &registered)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::protocol::FrameId;
    use crate::response::Response;

    fn frame(id: FrameId, response: Response) -> DecodedFrame {
        DecodedFrame {
            id,
            length: 5,
            crc16_expected: 0,
            crc16_error_status: false,
            response,
        }
    }

    #[test]
    fn dispatches_to_matching_category() {
        let mut done = 0;
        let mut modes = Vec::new();
        {
            let mut handlers = Handlers::new()
                .on(FrameCategory::SetConfigDone, |_| done += 1)
                .on(FrameCategory::FunctionalMode, |f| modes.push(f.response.clone()));

            assert!(handlers
                .dispatch(frame(FrameId::SetConfigDone, Response::SetConfigDone))
                .is_none());
            assert!(handlers
                .dispatch(frame(
                    FrameId::GetFunctionalModeResp,
                    Response::FunctionalMode { ahrs: true },
                ))
                .is_none());
            assert!(handlers
                .dispatch(frame(FrameId::SetConfigDone, Response::SetConfigDone))
                .is_none());
        }
        assert_eq!(done, 2);
        assert_eq!(modes, vec![Response::FunctionalMode { ahrs: true }]);
    }

    #[test]
    fn unregistered_category_returns_frame() {
        let mut handlers = Handlers::new();
        let f = frame(FrameId::SetAcqParamsDone, Response::SetAcqParamsDone);
        assert_eq!(handlers.dispatch(f.clone()), Some(f));
    }

    #[test]
    fn replace_and_remove() {
        let hits = RefCell::new(Vec::new());
        {
            let mut handlers = Handlers::new();
            handlers.set(FrameCategory::SetConfigDone, |_| hits.borrow_mut().push("first"));
            handlers.set(FrameCategory::SetConfigDone, |_| hits.borrow_mut().push("second"));
            assert!(handlers.is_registered(FrameCategory::SetConfigDone));
            assert!(!handlers.is_registered(FrameCategory::Data));

            handlers.dispatch(frame(FrameId::SetConfigDone, Response::SetConfigDone));
            assert!(handlers.remove(FrameCategory::SetConfigDone));
            assert!(!handlers.remove(FrameCategory::SetConfigDone));
            assert!(handlers
                .dispatch(frame(FrameId::SetConfigDone, Response::SetConfigDone))
                .is_some());
        }
        assert_eq!(hits.into_inner(), vec!["second"]);
    }

    #[test]
    fn debug_lists_registered_categories() {
        let handlers = Handlers::new().on(FrameCategory::Data, |_| {});
        assert_eq!(format!("{handlers:?}"), "Handlers { registered: [Data] }");
    }
}
