//! Form lifecycle: `Draft -> Active <-> Closed`.
//!
//! A form never returns to `Draft`. Only `Active` forms accept submissions.

use std::fmt;

use tracing::info;

use form_model::{Form, FormError, FormStatus, Result};

/// Operator action that moves a form between lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transition {
    Publish,
    Close,
}

impl Transition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Transition::Publish => "publish",
            Transition::Close => "close",
        }
    }

    pub fn target(&self) -> FormStatus {
        match self {
            Transition::Publish => FormStatus::Active,
            Transition::Close => FormStatus::Closed,
        }
    }

    pub fn allowed_from(&self, from: FormStatus) -> bool {
        match self {
            Transition::Publish => matches!(from, FormStatus::Draft | FormStatus::Closed),
            Transition::Close => matches!(from, FormStatus::Active),
        }
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status reached by applying `transition` to `from`.
///
/// # Errors
///
/// `Conflict` when the transition is not permitted from `from`.
pub fn next_status(from: FormStatus, transition: Transition) -> Result<FormStatus> {
    if transition.allowed_from(from) {
        Ok(transition.target())
    } else {
        Err(FormError::conflict(format!(
            "cannot {transition} a form that is {from}"
        )))
    }
}

pub fn apply(form: &mut Form, transition: Transition) -> Result<FormStatus> {
    let from = form.status;
    let to = next_status(from, transition)?;
    form.status = to;
    info!(form_id = %form.id, %transition, %from, %to, "form status changed");
    Ok(to)
}

/// Make the form available for public submission.
pub fn publish(form: &mut Form) -> Result<()> {
    apply(form, Transition::Publish).map(|_| ())
}

/// Stop accepting submissions.
pub fn close(form: &mut Form) -> Result<()> {
    apply(form, Transition::Close).map(|_| ())
}

/// Reject submissions to forms that are not active.
pub fn ensure_accepting(form: &Form) -> Result<()> {
    if form.accepts_responses() {
        Ok(())
    } else {
        Err(FormError::conflict(format!(
            "form is not accepting responses (status: {})",
            form.status
        )))
    }
}

/// What the public collaborator renders for a form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublicView {
    /// Form can be filled in and submitted.
    Open,
    /// Not published yet; keep polling.
    Waiting,
    /// Closed; show "not accepting responses".
    NotAccepting,
}

impl PublicView {
    pub fn message(&self) -> &'static str {
        match self {
            PublicView::Open => "accepting responses",
            PublicView::Waiting => "not available yet",
            PublicView::NotAccepting => "not accepting responses",
        }
    }
}

pub fn public_view(status: FormStatus) -> PublicView {
    match status {
        FormStatus::Active => PublicView::Open,
        FormStatus::Draft => PublicView::Waiting,
        FormStatus::Closed => PublicView::NotAccepting,
    }
}
