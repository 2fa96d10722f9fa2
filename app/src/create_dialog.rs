//! The "create vote" form.

use {
    crate::toast::{Outcome, Toast},
    log::*,
    solana_pubkey::Pubkey,
    std::sync::Arc,
    votecard_client::{
        program::{MAX_DESCRIPTION_LEN, MAX_TITLE_LEN},
        ValidationError, VoteCardError, VoteService, WalletAdapter,
    },
};

pub const CREATE_INSUFFICIENT_BALANCE: &str =
    "Insufficient balance, creating a vote requires 0.01 SOL";

/// Keep at most `max_chars` characters, the way an input's `maxlength` does.
fn truncate_chars(value: &str, max_chars: usize) -> String {
    value.chars().take(max_chars).collect()
}

/// Form state of the creation dialog.
///
/// The length limits here only shape the input; the program re-validates
/// everything it receives.
pub struct CreateVoteDialog {
    service: Arc<dyn VoteService>,
    open: bool,
    title: String,
    description: String,
    loading: bool,
    toast: Option<Toast>,
    alert: Option<String>,
    created: Option<Pubkey>,
}

impl CreateVoteDialog {
    pub fn new(service: Arc<dyn VoteService>) -> Self {
        Self {
            service,
            open: false,
            title: String::new(),
            description: String::new(),
            loading: false,
            toast: None,
            alert: None,
            created: None,
        }
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    /// Close without clearing the fields.
    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn set_title(&mut self, title: &str) {
        self.title = truncate_chars(title, MAX_TITLE_LEN);
    }

    pub fn set_description(&mut self, description: &str) {
        self.description = truncate_chars(description, MAX_DESCRIPTION_LEN);
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn toast(&self) -> Option<&Toast> {
        self.toast.as_ref()
    }

    pub fn dismiss_toast(&mut self) {
        self.toast = None;
    }

    /// The blocking alert raised by the last submit, if any.
    pub fn take_alert(&mut self) -> Option<String> {
        self.alert.take()
    }

    /// Address of the card the last successful submit created.
    pub fn created(&self) -> Option<Pubkey> {
        self.created
    }

    fn required_fields(&self) -> Result<(), ValidationError> {
        if self.title.is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        if self.description.is_empty() {
            return Err(ValidationError::EmptyDescription);
        }
        Ok(())
    }

    pub async fn submit(&mut self, wallet: Option<&WalletAdapter>) -> Outcome {
        let Some(wallet) = wallet else {
            return Outcome::Unchanged;
        };
        if let Err(err) = self.required_fields() {
            self.toast = Some(Toast::error(err.to_string()));
            return Outcome::Unchanged;
        }

        self.loading = true;
        let result = self
            .service
            .create_card(wallet, &self.title, &self.description)
            .await;
        self.loading = false;

        match result {
            Ok(address) => {
                self.created = Some(address);
                self.open = false;
                self.title.clear();
                self.description.clear();
                Outcome::RefreshRequested
            }
            Err(VoteCardError::InsufficientBalance { required, balance }) => {
                debug!("create needs {required} lamports, wallet holds {balance}");
                self.toast = Some(Toast::error(CREATE_INSUFFICIENT_BALANCE));
                Outcome::Unchanged
            }
            Err(err) => {
                warn!("create vote failed: {err}");
                self.alert = Some(format!("Failed to create vote: {err}"));
                Outcome::Unchanged
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::test_utils::{funded_wallet, Fixture},
        solana_native_token::LAMPORTS_PER_SOL,
        test_case::test_case,
        votecard_client::program::CREATE_FEE_LAMPORTS,
    };

    #[test_case("abc", 5, "abc"; "shorter")]
    #[test_case("abcdef", 3, "abc"; "longer")]
    #[test_case("ééééé", 2, "éé"; "multibyte")]
    fn test_truncate_chars(value: &str, max_chars: usize, expected: &str) {
        assert_eq!(truncate_chars(value, max_chars), expected);
    }

    #[tokio::test]
    async fn test_input_limits() {
        let fixture = Fixture::initialized().await;
        let mut dialog = CreateVoteDialog::new(fixture.service());
        dialog.set_title(&"t".repeat(60));
        dialog.set_description(&"d".repeat(300));
        assert_eq!(dialog.title().chars().count(), MAX_TITLE_LEN);
        assert_eq!(dialog.description().chars().count(), MAX_DESCRIPTION_LEN);
    }

    #[tokio::test]
    async fn test_submit_success_clears_and_closes() {
        let fixture = Fixture::initialized().await;
        let author = funded_wallet(&fixture.ledger, LAMPORTS_PER_SOL);
        let mut dialog = CreateVoteDialog::new(fixture.service());
        dialog.open();
        dialog.set_title("Budget 2025");
        dialog.set_description("Allocate funds");

        assert_eq!(dialog.submit(Some(&author)).await, Outcome::RefreshRequested);
        assert!(!dialog.is_open());
        assert_eq!(dialog.title(), "");
        assert_eq!(dialog.description(), "");
        assert!(dialog.created().is_some());
        assert_eq!(dialog.take_alert(), None);
    }

    #[tokio::test]
    async fn test_submit_requires_fields() {
        let fixture = Fixture::initialized().await;
        let author = funded_wallet(&fixture.ledger, LAMPORTS_PER_SOL);
        let mut dialog = CreateVoteDialog::new(fixture.service());
        dialog.open();
        dialog.set_description("Allocate funds");

        assert_eq!(dialog.submit(Some(&author)).await, Outcome::Unchanged);
        assert_eq!(dialog.toast(), Some(&Toast::error("title is required")));
        assert!(dialog.is_open());
        assert_eq!(fixture.ledger.transaction_count(), 1);
    }

    #[tokio::test]
    async fn test_submit_insufficient_balance() {
        let fixture = Fixture::initialized().await;
        let author = funded_wallet(&fixture.ledger, CREATE_FEE_LAMPORTS / 2);
        let mut dialog = CreateVoteDialog::new(fixture.service());
        dialog.open();
        dialog.set_title("Budget 2025");
        dialog.set_description("Allocate funds");

        assert_eq!(dialog.submit(Some(&author)).await, Outcome::Unchanged);
        assert_eq!(dialog.toast(), Some(&Toast::error(CREATE_INSUFFICIENT_BALANCE)));
        assert!(dialog.is_open());
        assert_eq!(dialog.title(), "Budget 2025");
    }

    #[tokio::test]
    async fn test_submit_failure_raises_alert() {
        let fixture = Fixture::initialized().await;
        let author = funded_wallet(&fixture.ledger, LAMPORTS_PER_SOL);
        let mut dialog = CreateVoteDialog::new(fixture.service());
        dialog.open();
        // Fits the input limit but not the address seed.
        dialog.set_title(&"t".repeat(40));
        dialog.set_description("Allocate funds");

        assert_eq!(dialog.submit(Some(&author)).await, Outcome::Unchanged);
        let alert = dialog.take_alert().unwrap();
        assert!(alert.starts_with("Failed to create vote: "));
        assert_eq!(dialog.take_alert(), None);
    }

    #[tokio::test]
    async fn test_submit_without_wallet() {
        let fixture = Fixture::initialized().await;
        let mut dialog = CreateVoteDialog::new(fixture.service());
        dialog.set_title("Budget 2025");
        dialog.set_description("Allocate funds");
        assert_eq!(dialog.submit(None).await, Outcome::Unchanged);
        assert_eq!(dialog.toast(), None);
    }
}
