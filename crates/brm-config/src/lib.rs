// Session settings and the JSON chart file format

mod chart_file;
mod session;

pub use chart_file::{CHART_VERSION, ChartFile, EventSpec, MusicSettings};
pub use session::SessionConfig;
