//! Domain model for the host platform adapter.
//!
//! The domain covers static platform metadata, sender and command identity,
//! the permission fallback policy, command argument tokens, and the states of
//! tick subscriptions and the plugin lifecycle. Host and core infrastructure
//! remain outside this boundary.

mod arguments;
mod error;
mod ids;
mod info;
mod sender;
mod state;

pub use arguments::CommandArguments;
pub use error::{ParsePermissionPolicyError, ParsePlatformKindError, PlatformDomainError};
pub use ids::{CommandName, ConnectionId, SenderId};
pub use info::{PlatformInfo, PlatformKind};
pub use sender::{PermissionPolicy, SenderKind};
pub use state::{PluginState, SubscriptionState, TickPhase};
