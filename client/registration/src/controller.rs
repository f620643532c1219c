//! Registration form controller.
//!
//! Owns the draft, roster, receipt and payment details, and drives the
//! submission state machine:
//!
//! ```text
//! Idle ──begin_submit──▶ Submitting ──complete──▶ Succeeded | Failed(reason)
//!   ▲                                                   │
//!   └──────────── next begin_submit is accepted ────────┘
//! ```
//!
//! A submission is split into [`RegistrationController::begin_submit`], the
//! network round trip ([`PendingSubmission::send`]) and
//! [`RegistrationController::complete`], so the form stays editable while a
//! request is in flight. [`RegistrationController::submit`] runs all three.
//!
//! The pending request and its outcome carry a ticket. If either is dropped
//! before reaching `complete` (a cancelled future, a discarded handle), the
//! controller reads as `Idle` again and accepts a new submission.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::attachment::{AttachmentSlot, PreviewId, PreviewStore, ReceiptFile};
use crate::draft::{DraftField, MemberField, PaymentDetails, RegistrationDraft, TeamSize};
use crate::errors::{RegistrationError, Result};
use crate::notify::{Notifier, Severity};
use crate::payload::{total_fee, RegistrationPayload};
use crate::transport::Transport;
use crate::validation::{self, FormView, ValidationError};

pub const SUCCESS_MESSAGE: &str = "Registration successful!";
pub const GENERIC_FAILURE: &str = "Registration failed. Please try again.";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    Failed(String),
}

/// What the presentation layer should do once a submission resolves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitReport {
    /// Close the form and invite the team to the community channel.
    Registered { community_link: String },
    /// Keep the form open; everything entered is still there.
    Failed { reason: String },
}

/// Marks one submission as live. Cleared on drop.
#[derive(Debug)]
struct SubmissionTicket(Arc<AtomicBool>);

impl SubmissionTicket {
    fn issue() -> (Self, Arc<AtomicBool>) {
        let live = Arc::new(AtomicBool::new(true));
        (Self(Arc::clone(&live)), live)
    }

    fn is_for(&self, live: &Arc<AtomicBool>) -> bool {
        Arc::ptr_eq(&self.0, live)
    }
}

impl Drop for SubmissionTicket {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// A validated registration waiting to be sent.
#[derive(Debug)]
pub struct PendingSubmission {
    payload: RegistrationPayload,
    ticket: SubmissionTicket,
}

impl PendingSubmission {
    pub fn payload(&self) -> &RegistrationPayload {
        &self.payload
    }

    pub async fn send<T: Transport>(self, transport: &T) -> SubmissionOutcome {
        let PendingSubmission { payload, ticket } = self;
        let result = transport.send(payload).await;
        SubmissionOutcome { result, ticket }
    }
}

/// Transport result for a [`PendingSubmission`].
#[derive(Debug)]
pub struct SubmissionOutcome {
    result: Result<()>,
    ticket: SubmissionTicket,
}

pub struct RegistrationController<N: Notifier> {
    draft: RegistrationDraft,
    payment: PaymentDetails,
    attachment: AttachmentSlot,
    state: SubmissionState,
    in_flight: Option<Arc<AtomicBool>>,
    notifier: N,
    community_link: String,
}

impl<N: Notifier> RegistrationController<N> {
    pub fn new(
        previews: Arc<dyn PreviewStore>,
        notifier: N,
        community_link: impl Into<String>,
    ) -> Self {
        Self {
            draft: RegistrationDraft::default(),
            payment: PaymentDetails::default(),
            attachment: AttachmentSlot::new(previews),
            state: SubmissionState::Idle,
            in_flight: None,
            notifier,
            community_link: community_link.into(),
        }
    }

    // ─────────────────────────────────────────────────────────
    // Read access
    // ─────────────────────────────────────────────────────────

    pub fn draft(&self) -> &RegistrationDraft {
        &self.draft
    }

    pub fn payment(&self) -> &PaymentDetails {
        &self.payment
    }

    pub fn receipt(&self) -> Option<&ReceiptFile> {
        self.attachment.file()
    }

    pub fn preview(&self) -> Option<PreviewId> {
        self.attachment.preview()
    }

    /// An abandoned submission reads as `Idle`.
    pub fn state(&self) -> SubmissionState {
        if self.is_abandoned() {
            SubmissionState::Idle
        } else {
            self.state.clone()
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.state == SubmissionState::Submitting && !self.is_abandoned()
    }

    /// `Submitting`, but the pending request or its outcome was dropped.
    fn is_abandoned(&self) -> bool {
        self.state == SubmissionState::Submitting
            && !self
                .in_flight
                .as_ref()
                .is_some_and(|live| live.load(Ordering::Acquire))
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Fee for the current team size, in INR.
    pub fn total_fee(&self) -> u32 {
        total_fee(self.draft.team_size())
    }

    pub fn form(&self) -> FormView<'_> {
        FormView {
            draft: &self.draft,
            receipt: self.attachment.file(),
            payment: &self.payment,
        }
    }

    pub fn validation_errors(&self) -> Vec<ValidationError> {
        validation::validate(self.form())
    }

    // ─────────────────────────────────────────────────────────
    // Edits
    // ─────────────────────────────────────────────────────────

    pub fn set_field(&mut self, field: DraftField, value: impl Into<String>) {
        self.draft.set_field(field, value);
    }

    pub fn set_team_size(&mut self, n: i64) -> TeamSize {
        self.draft.set_team_size(n)
    }

    pub fn set_member_field(
        &mut self,
        index: usize,
        field: MemberField,
        value: impl Into<String>,
    ) -> bool {
        self.draft.set_member_field(index, field, value)
    }

    pub fn set_upi_id(&mut self, value: impl Into<String>) {
        self.payment.upi_id = value.into();
    }

    pub fn set_transaction_id(&mut self, value: impl Into<String>) {
        self.payment.transaction_id = value.into();
    }

    /// Attach a receipt. A disallowed media type is reported to the user once
    /// and leaves the current receipt in place.
    pub fn attach(&mut self, file: ReceiptFile) -> Result<()> {
        let name = file.file_name.clone();
        match self.attachment.attach(file) {
            Ok(()) => {
                debug!("attached receipt {name}");
                Ok(())
            }
            Err(e) => {
                self.notifier
                    .notify(Severity::Error, &ValidationError::UnsupportedReceipt.to_string());
                Err(e)
            }
        }
    }

    /// File-picker change: `None` means the selection was emptied.
    pub fn select_file(&mut self, file: Option<ReceiptFile>) -> Result<()> {
        match file {
            Some(file) => self.attach(file),
            None => {
                self.clear_attachment();
                Ok(())
            }
        }
    }

    pub fn clear_attachment(&mut self) {
        self.attachment.clear();
    }

    // ─────────────────────────────────────────────────────────
    // Submission
    // ─────────────────────────────────────────────────────────

    /// Validate and enter `Submitting`. Fails without side effects while a
    /// submission is in flight; a validation failure is also shown to the user.
    pub fn begin_submit(&mut self) -> Result<PendingSubmission> {
        if self.is_abandoned() {
            warn!("previous submission was dropped before it resolved");
            self.state = SubmissionState::Idle;
            self.in_flight = None;
        }
        if self.is_submitting() {
            debug!("submit ignored; a registration is already in flight");
            return Err(RegistrationError::SubmissionInFlight);
        }

        if let Some(failure) = validation::first_failure(self.form()) {
            self.notifier.notify(Severity::Error, &failure.to_string());
            return Err(failure.into());
        }

        // Validation passed, so the receipt is present.
        let receipt = self
            .attachment
            .file()
            .ok_or(ValidationError::MissingReceipt)?;
        let payload = RegistrationPayload::new(&self.draft, &self.payment, receipt);

        info!(
            "submitting registration for team of {} (total fee {})",
            payload.team_size.get(),
            payload.total_fee
        );
        let (ticket, live) = SubmissionTicket::issue();
        self.state = SubmissionState::Submitting;
        self.in_flight = Some(live);
        Ok(PendingSubmission { payload, ticket })
    }

    /// Resolve the in-flight submission.
    pub fn complete(&mut self, outcome: SubmissionOutcome) -> SubmitReport {
        let SubmissionOutcome { result, ticket } = outcome;
        if !self.in_flight.as_ref().is_some_and(|live| ticket.is_for(live)) {
            warn!("ignoring outcome of a submission this form did not start");
            return SubmitReport::Failed {
                reason: GENERIC_FAILURE.to_string(),
            };
        }
        self.in_flight = None;
        match result {
            Ok(()) => {
                info!("registration succeeded");
                self.draft = RegistrationDraft::default();
                self.payment = PaymentDetails::default();
                self.attachment.clear();
                self.state = SubmissionState::Succeeded;
                self.notifier.notify(Severity::Success, SUCCESS_MESSAGE);
                SubmitReport::Registered {
                    community_link: self.community_link.clone(),
                }
            }
            Err(e) => {
                error!("registration error: {e}");
                let reason = e
                    .backend_message()
                    .unwrap_or(GENERIC_FAILURE)
                    .to_string();
                self.state = SubmissionState::Failed(reason.clone());
                self.notifier.notify(Severity::Error, &reason);
                SubmitReport::Failed { reason }
            }
        }
    }

    /// Validate, send through `transport` and resolve, in one go.
    pub async fn submit<T: Transport>(&mut self, transport: &T) -> Result<SubmitReport> {
        let pending = self.begin_submit()?;
        let outcome = pending.send(transport).await;
        Ok(self.complete(outcome))
    }
}
