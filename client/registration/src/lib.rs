//! HackForge 2.0 registration client.
//!
//! The [`controller::RegistrationController`] holds a team's registration
//! draft, keeps its roster sized to the chosen team size, manages the payment
//! receipt and its preview, validates the form and submits it to the backend
//! as `multipart/form-data` through a [`transport::Transport`].

pub mod attachment;
pub mod catalog;
pub mod config;
pub mod controller;
pub mod draft;
pub mod errors;
pub mod notify;
pub mod payload;
pub mod transport;
pub mod validation;

pub use attachment::{PreviewRegistry, PreviewStore, ReceiptFile};
pub use config::Config;
pub use controller::{RegistrationController, SubmissionState, SubmitReport};
pub use draft::{DraftField, MemberField, PaymentDetails, RegistrationDraft, TeamMember, TeamSize};
pub use errors::{RegistrationError, Result};
pub use notify::{LogNotifier, Notifier, Severity};
pub use payload::RegistrationPayload;
pub use transport::{HttpTransport, Transport};
pub use validation::ValidationError;
