//! services/api/src/adapters/identity.rs
//!
//! An `IdentityProvider` for a single-user local deployment. It signs in as the
//! profile given in the configuration.

use async_trait::async_trait;
use idea_ranker_core::domain::Session;
use idea_ranker_core::ports::{IdentityProvider, PortError, PortResult, SessionChangeStream};
use tracing::debug;

pub struct ProfileIdentityProvider {
    profile: Session,
}

impl ProfileIdentityProvider {
    pub fn new(profile: Session) -> Self {
        Self { profile }
    }
}

#[async_trait]
impl IdentityProvider for ProfileIdentityProvider {
    async fn sign_in(&self) -> PortResult<Session> {
        if self.profile.uid.trim().is_empty() {
            return Err(PortError::Unauthorized);
        }
        debug!("Profile sign-in for {}", self.profile.uid);
        Ok(self.profile.clone())
    }

    async fn sign_out(&self) -> PortResult<()> {
        Ok(())
    }

    /// A local profile never expires or changes by itself, so the stream ends at once.
    fn session_changes(&self) -> SessionChangeStream {
        Box::pin(futures::stream::empty())
    }
}
