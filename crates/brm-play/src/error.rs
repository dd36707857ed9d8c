use brm_timing::TimingError;
use thiserror::Error;

use crate::event::EventId;

#[derive(Debug, Error, PartialEq)]
pub enum PlayError {
    #[error("event {0} is not part of this session")]
    EventNotFound(EventId),

    #[error("event {0} is already part of this session")]
    DuplicateEvent(EventId),

    #[error(transparent)]
    Timing(#[from] TimingError),
}
