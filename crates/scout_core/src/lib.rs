//! Scout core: panels, request bookkeeping, and the pure front-end state machine.
mod effect;
mod error;
mod msg;
mod panel;
pub mod query;
mod request;
mod state;
mod tabs;
mod update;
mod view_model;

pub use effect::Effect;
pub use error::RequestError;
pub use msg::Msg;
pub use panel::Panel;
pub use query::{QueryError, RepoQuery};
pub use request::{CallId, LoadingVisual, PanelRequestState, RequestTable, Started};
pub use state::AppState;
pub use tabs::{TabController, TabSwitch};
pub use update::update;
pub use view_model::{AppViewModel, CharCountLevel};
