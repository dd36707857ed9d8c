// Shared value types: play state, bounds, input judgments, event payloads, score

mod bounds;
mod event_kind;
mod input;
mod play_state;
mod score;

pub use bounds::Bounds;
pub use event_kind::{BgImage, Deploy, EventKind, ExpectedInput, SongInfo, Spotlight, TextBox};
pub use input::{InputResult, InputType, JudgmentTier};
pub use play_state::{PlayState, PlaybackCompletion};
pub use score::{ResultsText, Score};
