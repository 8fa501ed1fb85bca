//! Form state controller
//!
//! Owns the [`FormState`] and is the only place it changes. Inputs schedule a
//! debounced evaluation; the controller settles it once the window elapses
//! without another input.

use anyhow::Result;
use std::pin::pin;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time::{Instant, sleep_until};
use tracing::{debug, info, instrument, warn};

use crate::core::debounce::{DebouncedTrigger, TimerHandle};
use crate::core::error::FetchError;
use crate::core::state::{FetchStatus, FormEvent, FormState};
use crate::core::{Account, AccountSource, RateSource, RateTable};

/// A user interaction delivered to [`FormController::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormInput {
    FromAccount(String),
    ToAccount(String),
    Amount(String),
    Submit,
}

pub struct FormController {
    state: FormState,
    account_source: Arc<dyn AccountSource>,
    rate_source: Arc<dyn RateSource>,
    trigger: DebouncedTrigger,
    evaluations: usize,
}

impl FormController {
    pub fn new(
        account_source: Arc<dyn AccountSource>,
        rate_source: Arc<dyn RateSource>,
        debounce: Duration,
    ) -> Self {
        Self {
            state: FormState::new(),
            account_source,
            rate_source,
            trigger: DebouncedTrigger::new(debounce),
            evaluations: 0,
        }
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn trigger(&self) -> &DebouncedTrigger {
        &self.trigger
    }

    /// Number of evaluations run so far, debounced or submitted.
    pub fn evaluations(&self) -> usize {
        self.evaluations
    }

    fn apply(&mut self, event: FormEvent) {
        let state = std::mem::take(&mut self.state);
        self.state = state.reduce(event);
    }

    /// Fetches accounts and rates concurrently. Each result is merged as soon
    /// as it arrives; failures are recorded in the state and never returned.
    /// Sources are fetched at most once per controller; later calls do nothing.
    #[instrument(name = "FormInit", skip(self))]
    pub async fn initialize(&mut self) {
        if self.state.accounts_status != FetchStatus::NotStarted {
            debug!("Sources already fetched");
            return;
        }
        info!("Loading accounts and exchange rates");
        self.apply(FormEvent::LoadStarted);

        let account_source = Arc::clone(&self.account_source);
        let rate_source = Arc::clone(&self.rate_source);
        let mut accounts_fetch = pin!(async move { fetch_accounts(account_source.as_ref()).await });
        let mut rates_fetch = pin!(async move { fetch_rates(rate_source.as_ref()).await });
        let (mut accounts_done, mut rates_done) = (false, false);

        while !(accounts_done && rates_done) {
            tokio::select! {
                result = &mut accounts_fetch, if !accounts_done => {
                    accounts_done = true;
                    let event = match result {
                        Ok(accounts) => {
                            info!(count = accounts.len(), "Accounts loaded");
                            FormEvent::AccountsLoaded(accounts)
                        }
                        Err(e) => {
                            warn!(error = %e, "Account fetch failed");
                            FormEvent::AccountsFailed(FetchError::Accounts(format!("{e:#}")))
                        }
                    };
                    self.apply(event);
                }
                result = &mut rates_fetch, if !rates_done => {
                    rates_done = true;
                    let event = match result {
                        Ok(rates) => {
                            info!(count = rates.len(), "Exchange rates loaded");
                            FormEvent::RatesLoaded(rates)
                        }
                        Err(e) => {
                            warn!(error = %e, "Rate fetch failed");
                            FormEvent::RatesFailed(FetchError::Rates(format!("{e:#}")))
                        }
                    };
                    self.apply(event);
                }
            }
        }
        debug!(loading = self.state.loading, "Initialization finished");
    }

    pub fn set_from_account(&mut self, id: &str) -> Option<TimerHandle> {
        self.edit(FormEvent::FromAccountSelected(id.to_string()))
    }

    pub fn set_to_account(&mut self, id: &str) -> Option<TimerHandle> {
        self.edit(FormEvent::ToAccountSelected(id.to_string()))
    }

    pub fn set_amount(&mut self, text: &str) -> Option<TimerHandle> {
        self.edit(FormEvent::AmountEdited(text.to_string()))
    }

    fn edit(&mut self, event: FormEvent) -> Option<TimerHandle> {
        if !self.state.inputs_enabled() {
            debug!(?event, "Inputs disabled while loading");
            return None;
        }
        self.apply(event);
        Some(self.trigger.schedule(Instant::now()))
    }

    /// Evaluates the current inputs immediately. Any pending debounced
    /// evaluation is cancelled since it would see the same inputs.
    pub fn submit(&mut self) -> &FormState {
        if let Some(handle) = self.trigger.cancel() {
            debug!(timer = handle.id(), "Submit replaces pending evaluation");
        }
        if self.state.inputs_enabled() {
            self.evaluate();
        } else {
            debug!("Submit ignored while loading");
        }
        &self.state
    }

    /// Waits for the pending timer and settles it. Returns false when nothing
    /// was pending.
    pub async fn settle_pending(&mut self) -> bool {
        let Some(handle) = self.trigger.pending() else {
            return false;
        };
        sleep_until(handle.deadline()).await;
        self.fire(handle)
    }

    fn fire(&mut self, handle: TimerHandle) -> bool {
        if !self.trigger.fire(handle, Instant::now()) {
            return false;
        }
        self.evaluate();
        true
    }

    fn evaluate(&mut self) {
        self.evaluations += 1;
        let outcome = self.state.evaluate();
        match &outcome {
            Ok(result) => info!(
                from = %self.state.from_account_id,
                to = %self.state.to_account_id,
                from_amount = %result.from_amount,
                to_amount = %result.to_amount,
                rate = %result.rate,
                fee = %result.fee,
                "Conversion simulated"
            ),
            Err(e) => info!(error = %e, "Evaluation rejected"),
        }
        self.apply(FormEvent::Evaluated(outcome));
    }

    pub fn handle(&mut self, input: FormInput) {
        debug!(?input, "Form input");
        match input {
            FormInput::FromAccount(id) => {
                self.set_from_account(&id);
            }
            FormInput::ToAccount(id) => {
                self.set_to_account(&id);
            }
            FormInput::Amount(text) => {
                self.set_amount(&text);
            }
            FormInput::Submit => {
                self.submit();
            }
        }
    }

    /// Processes inputs until the channel closes, settling the debounce timer
    /// in between and publishing the state after every step. A pending
    /// evaluation is dropped when the channel closes.
    pub async fn run(
        &mut self,
        mut inputs: mpsc::Receiver<FormInput>,
        updates: watch::Sender<FormState>,
    ) {
        info!("Form event loop started");
        updates.send_replace(self.state.clone());

        loop {
            let pending = self.trigger.pending();
            let deadline = pending.map_or_else(Instant::now, |h| h.deadline());

            tokio::select! {
                biased;

                input = inputs.recv() => match input {
                    Some(input) => self.handle(input),
                    None => break,
                },
                () = sleep_until(deadline), if pending.is_some() => {
                    if let Some(handle) = pending {
                        self.fire(handle);
                    }
                }
            }
            updates.send_replace(self.state.clone());
        }

        if let Some(handle) = self.trigger.cancel() {
            debug!(timer = handle.id(), "Dropping pending evaluation on shutdown");
        }
        info!("Form event loop stopped");
    }
}

async fn fetch_accounts(source: &dyn AccountSource) -> Result<Vec<Account>> {
    let accounts = source.fetch().await?;
    for account in &accounts {
        account.check()?;
    }
    Ok(accounts)
}

async fn fetch_rates(source: &dyn RateSource) -> Result<RateTable> {
    let rates = source.fetch().await?;
    rates.check()?;
    Ok(rates)
}
