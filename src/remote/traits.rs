use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;

// =============================================================================
// Startable - Uniform session lifecycle trait
// =============================================================================

/// Trait for long-running sessions that can be started/stopped uniformly.
/// The binary and the tests drive a remote session only through this.
#[async_trait]
pub trait Startable: Send + Sync {
    /// Session name for logs (e.g., "vlc")
    fn name(&self) -> &'static str;

    /// Start the session. No-op if already running.
    async fn start(&self) -> Result<()>;

    /// Stop the session gracefully.
    async fn stop(&self);

    /// Whether this session can be started.
    /// Default: true.
    async fn can_start(&self) -> bool {
        true
    }
}

/// Macro to implement Startable with minimal boilerplate.
///
/// Types must implement:
/// - `async fn start_internal(&self) -> Result<()>`
/// - `async fn stop_internal(&self)`
/// - Optionally: custom `can_start` method (pass as third arg)
///
/// Usage:
/// ```ignore
/// impl_startable!(VlcRemote, "vlc");
/// impl_startable!(VlcRemote, "vlc", has_credentials);  // custom can_start
/// ```
#[macro_export]
macro_rules! impl_startable {
    ($session:ty, $name:literal, $can_start:ident) => {
        #[async_trait::async_trait]
        impl $crate::remote::Startable for $session {
            fn name(&self) -> &'static str {
                $name
            }

            async fn start(&self) -> anyhow::Result<()> {
                self.start_internal().await
            }

            async fn stop(&self) {
                self.stop_internal().await
            }

            async fn can_start(&self) -> bool {
                self.$can_start().await
            }
        }
    };
    ($session:ty, $name:literal) => {
        #[async_trait::async_trait]
        impl $crate::remote::Startable for $session {
            fn name(&self) -> &'static str {
                $name
            }

            async fn start(&self) -> anyhow::Result<()> {
                self.start_internal().await
            }

            async fn stop(&self) {
                self.stop_internal().await
            }
        }
    };
}

/// Result of a dispatched intent
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CommandResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn failed(error: impl ToString) -> Self {
        Self {
            success: false,
            error: Some(error.to_string()),
        }
    }
}
