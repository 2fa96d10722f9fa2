//! Configuration for the vote-card client.

use {
    crate::program::{Deployment, CREATE_FEE_LAMPORTS, VOTE_FEE_LAMPORTS},
    solana_commitment_config::CommitmentConfig,
    std::time::Duration,
};

/// Tunables of [`VoteCardClient`](crate::client::VoteCardClient).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Program address and account layout to talk to.
    pub deployment: Deployment,

    /// Durability level writes are confirmed at and reads are served from.
    pub commitment: CommitmentConfig,

    /// Minimum balance checked before `create_card` is submitted.
    pub create_min_balance: u64,

    /// Minimum balance checked before `cast_vote` is submitted.
    pub vote_min_balance: u64,

    /// How many times a freshly created card is read back before giving up.
    pub visibility_attempts: u32,

    /// Delay between read-back attempts.
    pub visibility_retry_delay: Duration,

    /// Delay between signature status polls while confirming.
    pub confirm_poll_interval: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            deployment: Deployment::default(),
            commitment: CommitmentConfig::confirmed(),
            create_min_balance: CREATE_FEE_LAMPORTS,
            vote_min_balance: VOTE_FEE_LAMPORTS,
            visibility_attempts: 10,
            visibility_retry_delay: Duration::from_secs(2),
            confirm_poll_interval: Duration::from_millis(500),
        }
    }
}

impl ClientConfig {
    /// Config with no waits between retries, for tests against a local ledger.
    #[cfg(any(test, feature = "dev-context-only-utils"))]
    pub fn dev_default() -> Self {
        Self {
            visibility_retry_delay: Duration::ZERO,
            confirm_poll_interval: Duration::ZERO,
            ..Self::default()
        }
    }

    pub fn with_deployment(mut self, deployment: Deployment) -> Self {
        self.deployment = deployment;
        self
    }

    /// Upper bound on the time `create_card` spends waiting for visibility.
    pub fn max_visibility_wait(&self) -> Duration {
        self.visibility_retry_delay
            .saturating_mul(self.visibility_attempts.saturating_sub(1))
    }
}
