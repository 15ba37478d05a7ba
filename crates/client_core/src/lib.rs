//! Client-side coordination for uploading a document to a remote indexing
//! service and asking questions about it.

pub mod config;
pub mod coordinator;
pub mod document;
pub mod error;
pub mod remote;
pub mod session;
pub mod timeline;

pub use config::{load_settings, ClientSettings, Mode};
pub use coordinator::{Coordinator, RequestGuard, RequestLock, SessionSnapshot};
pub use document::DocumentFile;
pub use error::{ClientError, SessionError};
pub use remote::{HttpRemoteClient, RemoteClient};
pub use session::SessionState;
pub use timeline::{ConversationEvent, Timeline};
