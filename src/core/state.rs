//! Form state and its transitions
//!
//! Every change to the form is a [`FormEvent`] applied by [`FormState::reduce`],
//! which consumes the old state and returns the new one. The reducer never
//! performs I/O; fetching and timing belong to the controller.

use serde::Serialize;
use tracing::debug;

use super::account::{Account, find_account};
use super::conversion::{ConversionResult, convert};
use super::error::{FetchError, FormError};
use super::rates::RateTable;
use super::validation::validate;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum FetchStatus {
    #[default]
    NotStarted,
    Pending,
    Loaded,
    Failed,
}

#[derive(Debug, Clone)]
pub enum FormEvent {
    LoadStarted,
    AccountsLoaded(Vec<Account>),
    AccountsFailed(FetchError),
    RatesLoaded(RateTable),
    RatesFailed(FetchError),
    FromAccountSelected(String),
    ToAccountSelected(String),
    AmountEdited(String),
    Evaluated(Result<ConversionResult, FormError>),
}

impl FormEvent {
    /// Input edits are the events that restart the debounce window.
    pub fn is_input(&self) -> bool {
        matches!(
            self,
            FormEvent::FromAccountSelected(_)
                | FormEvent::ToAccountSelected(_)
                | FormEvent::AmountEdited(_)
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FormState {
    pub from_account_id: String,
    pub to_account_id: String,
    pub amount_text: String,
    pub loading: bool,
    #[serde(serialize_with = "serialize_error")]
    pub error: Option<FormError>,
    pub result: Option<ConversionResult>,
    pub accounts: Vec<Account>,
    pub rates: RateTable,
    pub accounts_status: FetchStatus,
    pub rates_status: FetchStatus,
}

fn serialize_error<S: serde::Serializer>(
    error: &Option<FormError>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match error {
        Some(e) => serializer.serialize_some(&e.to_string()),
        None => serializer.serialize_none(),
    }
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inputs are disabled while either fetch is outstanding.
    pub fn inputs_enabled(&self) -> bool {
        !self.loading
    }

    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(ToString::to_string)
    }

    pub fn from_account(&self) -> Option<&Account> {
        find_account(&self.accounts, &self.from_account_id)
    }

    pub fn to_account(&self) -> Option<&Account> {
        find_account(&self.accounts, &self.to_account_id)
    }

    pub fn reduce(self, event: FormEvent) -> FormState {
        if event.is_input() && self.loading {
            debug!(?event, "Ignoring input while loading");
            return self;
        }

        let mut next = self;
        match event {
            FormEvent::LoadStarted => {
                next.accounts_status = FetchStatus::Pending;
                next.rates_status = FetchStatus::Pending;
            }
            FormEvent::AccountsLoaded(accounts) => {
                next.accounts = accounts;
                next.accounts_status = FetchStatus::Loaded;
            }
            FormEvent::RatesLoaded(rates) => {
                next.rates = rates;
                next.rates_status = FetchStatus::Loaded;
            }
            FormEvent::AccountsFailed(err) => {
                next.accounts_status = FetchStatus::Failed;
                next.fail(err.into());
            }
            FormEvent::RatesFailed(err) => {
                next.rates_status = FetchStatus::Failed;
                next.fail(err.into());
            }
            FormEvent::FromAccountSelected(id) => {
                next.from_account_id = id;
                next.result = None;
            }
            FormEvent::ToAccountSelected(id) => {
                next.to_account_id = id;
                next.result = None;
            }
            FormEvent::AmountEdited(text) => {
                next.amount_text = text;
                next.result = None;
            }
            FormEvent::Evaluated(Ok(result)) => {
                next.error = None;
                next.result = Some(result);
            }
            FormEvent::Evaluated(Err(err)) => next.fail(err),
        }
        next.loading = next.accounts_status == FetchStatus::Pending
            || next.rates_status == FetchStatus::Pending;
        next
    }

    fn fail(&mut self, err: FormError) {
        self.result = None;
        self.error = Some(err);
    }

    /// Runs the validator and, when it passes, the conversion engine against
    /// the current accounts and rate table.
    pub fn evaluate(&self) -> Result<ConversionResult, FormError> {
        let input = validate(
            &self.from_account_id,
            &self.to_account_id,
            &self.amount_text,
            &self.accounts,
        )?;
        Ok(convert(
            input.amount,
            &input.from.currency,
            &input.to.currency,
            &self.rates,
        )?)
    }
}
