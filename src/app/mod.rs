//! UI-facing state: events, routes and the folder explorer.

pub mod events;
pub mod explorer;
pub mod route;

pub use events::{EventBus, Notice, NoticeKind, UiEvent};
pub use explorer::{Breadcrumb, FolderExplorer, RenameOutcome, ROOT_NAME};
pub use route::{Navigator, Route};
