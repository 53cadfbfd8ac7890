//! Service control engine.
//!
//! Entry point for the four logical operations. Each call opens its own
//! session, runs its commands sequentially and closes the session on every
//! exit path.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::Settings;
use crate::control::{self, ControlOutcome, ServiceAction};
use crate::error::DaemonResult;
use crate::executor::PrivilegedExecutor;
use crate::inventory::{self, ServiceRecord};
use crate::lifecycle::{self, LifecycleOutcome, UnitDefinition};
use crate::session::{RemoteSession, SessionProvider, SshSessionProvider};
use crate::validation::UnitName;

/// Runs service operations against the managed host.
pub struct ServiceManager {
    provider: Arc<dyn SessionProvider>,
    executor: PrivilegedExecutor,
}

impl ServiceManager {
    pub fn new(provider: Arc<dyn SessionProvider>, elevation_secret: impl Into<String>) -> Self {
        Self {
            provider,
            executor: PrivilegedExecutor::new(elevation_secret),
        }
    }

    /// Build an SSH-backed manager from loaded settings.
    pub fn from_settings(settings: &Settings) -> DaemonResult<Self> {
        let credentials = settings.credentials();
        let secret = credentials.secret.clone();
        let provider =
            SshSessionProvider::new(credentials)?.with_command_timeout(settings.command_timeout());
        Ok(Self::new(Arc::new(provider), secret))
    }

    pub async fn list_services(&self) -> DaemonResult<Vec<ServiceRecord>> {
        let mut session = self.provider.open().await?;
        let result = inventory::list_services(session.as_mut(), &self.executor).await;
        release(session).await;
        result
    }

    /// Apply `action` to the named service. The action is checked before a
    /// session is opened.
    pub async fn control_service(&self, name: &str, action: &str) -> DaemonResult<ControlOutcome> {
        let action: ServiceAction = action.parse()?;
        let unit = UnitName::sanitize(name)?;
        debug!(unit = %unit, action = %action, "Control requested");

        let mut session = self.provider.open().await?;
        let result = control::apply(session.as_mut(), &self.executor, &unit, action).await;
        release(session).await;
        result
    }

    pub async fn create_unit(&self, definition: &UnitDefinition) -> DaemonResult<LifecycleOutcome> {
        let mut session = self.provider.open().await?;
        let result = lifecycle::create_unit(session.as_mut(), &self.executor, definition).await;
        release(session).await;
        result
    }

    pub async fn delete_unit(&self, name: &str) -> DaemonResult<LifecycleOutcome> {
        let mut session = self.provider.open().await?;
        let result = lifecycle::delete_unit(session.as_mut(), &self.executor, name).await;
        release(session).await;
        result
    }
}

/// Close a session. A close failure never replaces the operation's result.
async fn release(mut session: Box<dyn RemoteSession>) {
    if let Err(e) = session.close().await {
        warn!(error = %e, "Failed to close session");
    }
}
