//! GA monitor engine: HTTP boundary, job launch/poll/stop and effect execution.
mod api;
mod cancel;
mod engine;
mod launcher;
mod poller;
mod session;
mod settings;
mod token;
mod types;
mod wire;

pub use api::{ApiRequest, ApiTransport, LoginRedirect, Method, NoLoginRedirect, ReqwestApiClient, RequestBody};
pub use cancel::{CancellationController, StopOutcome};
pub use engine::{ChannelEventSink, EngineEvent, EventSink, MonitorHandle};
pub use launcher::{JobLauncher, LaunchParams};
pub use poller::{PollingLoop, SnapshotStream};
pub use session::{JobHandle, JobSession};
pub use settings::{ApiSettings, MonitorSettings, DEFAULT_BASE_URL};
pub use token::{Credentials, FileTokenStore, MemoryTokenStore, TokenStore, TokenStoreError};
pub use types::{ApiError, ApiFailureKind, MonitorError};
