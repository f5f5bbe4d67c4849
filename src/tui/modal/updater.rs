use crate::model::{Payload, XBlockInfo};

/// Runs after an update was applied.
pub type OnSave = Box<dyn FnOnce()>;

/// Carries an aggregate update for one record to wherever records live.
///
/// Completion is reported only through `on_success`; failures stay with the
/// implementation. The caller does not wait for either.
pub trait XBlockUpdater {
    fn update_fields(&mut self, record: &XBlockInfo, payload: Payload, on_success: OnSave);
}
