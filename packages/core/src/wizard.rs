//! Booking wizard state machine.
//!
//! [`WizardState`] is an immutable aggregate of everything a customer has
//! entered across the six booking steps. [`WizardState::apply`] is a pure
//! reducer: it consumes an action and returns the next state, leaving the
//! old one untouched, so callers can keep one state value per session and
//! thread it explicitly. Forward navigation is gated on step completion;
//! backward navigation is always allowed.

use std::collections::BTreeSet;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::booking::{
    HeavyWastePercentage, HeavyWasteType, NewBooking, PlasterboardPercentage, WasteType,
};
use crate::catalog::{self, SkipOffer};

/// The six booking steps, numbered 1 through 6 on the wire.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(into = "u8", try_from = "u8")]
pub enum Step {
    #[default]
    Postcode = 1,
    WasteType = 2,
    SelectSkip = 3,
    PermitCheck = 4,
    ChooseDate = 5,
    Payment = 6,
}

impl Step {
    pub const FIRST: Self = Self::Postcode;
    pub const LAST: Self = Self::Payment;
    pub const ALL: [Self; 6] = [
        Self::Postcode,
        Self::WasteType,
        Self::SelectSkip,
        Self::PermitCheck,
        Self::ChooseDate,
        Self::Payment,
    ];

    /// The 1-based step number shown in the progress header.
    #[must_use]
    pub fn number(self) -> u8 {
        self as u8
    }

    /// Human-readable step label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Postcode => "Postcode",
            Self::WasteType => "Waste Type",
            Self::SelectSkip => "Select Skip",
            Self::PermitCheck => "Permit Check",
            Self::ChooseDate => "Choose Date",
            Self::Payment => "Payment",
        }
    }

    /// The following step, or `None` from the last one.
    #[must_use]
    pub fn next(self) -> Option<Self> {
        Self::try_from(self.number() + 1).ok()
    }

    /// The preceding step, or `None` from the first one.
    #[must_use]
    pub fn back(self) -> Option<Self> {
        self.number().checked_sub(1).and_then(|n| Self::try_from(n).ok())
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<Step> for u8 {
    fn from(step: Step) -> Self {
        step.number()
    }
}

impl TryFrom<u8> for Step {
    type Error = WizardError;

    fn try_from(number: u8) -> Result<Self, WizardError> {
        match number {
            1 => Ok(Self::Postcode),
            2 => Ok(Self::WasteType),
            3 => Ok(Self::SelectSkip),
            4 => Ok(Self::PermitCheck),
            5 => Ok(Self::ChooseDate),
            6 => Ok(Self::Payment),
            other => Err(WizardError::InvalidStep(other)),
        }
    }
}

/// A wizard transition was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WizardError {
    /// A step number outside 1..=6 arrived from the wire.
    #[error("step {0} is out of range (steps run 1 to 6)")]
    InvalidStep(u8),
    /// Forward navigation or submission hit a step whose inputs are missing.
    #[error("step \"{0}\" is not complete")]
    IncompleteStep(Step),
}

/// Customer contact details captured on the payment step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Contact {
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl Contact {
    /// True when every field has a non-blank value.
    #[must_use]
    pub fn is_filled(&self) -> bool {
        !self.name.trim().is_empty()
            && !self.email.trim().is_empty()
            && !self.phone.trim().is_empty()
    }
}

/// One customer input or navigation event.
///
/// Toggles flip set membership and touch nothing else; `Set*` variants
/// replace the field wholesale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardAction {
    GotoStep(Step),
    SetPostcode(String),
    ToggleWasteType(WasteType),
    ToggleHeavyWasteType(HeavyWasteType),
    SetHeavyWastePercentage(HeavyWastePercentage),
    SetPlasterboardPercentage(PlasterboardPercentage),
    /// Records the chosen catalog entry by its size label.
    SelectSkip(String),
    SetPermitRequired(bool),
    SetDeliveryDate(NaiveDate),
    SetContact(Contact),
    CompletePayment,
}

/// Everything entered so far, plus the step the customer is on.
///
/// Serializes camelCase; missing fields deserialize to their defaults so a
/// partial snapshot (say, from session storage) still loads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase", default)]
pub struct WizardState {
    pub current_step: Step,
    pub postcode: String,
    pub selected_waste_types: BTreeSet<WasteType>,
    pub heavy_waste_types: BTreeSet<HeavyWasteType>,
    pub heavy_waste_percentage: HeavyWastePercentage,
    pub plasterboard_percentage: PlasterboardPercentage,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub skip_size: Option<String>,
    pub permit_required: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub delivery_date: Option<NaiveDate>,
    pub contact: Contact,
    pub payment_completed: bool,
}

impl WizardState {
    /// A fresh wizard on the postcode step with nothing entered.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Heavy waste is active only when a percentage above "No heavy waste"
    /// is declared *and* at least one heavy-waste type is picked. Either
    /// signal alone does nothing.
    #[must_use]
    pub fn heavy_waste_active(&self) -> bool {
        self.heavy_waste_percentage.declares_heavy_waste() && !self.heavy_waste_types.is_empty()
    }

    /// Whether the inputs a step asks for have been provided.
    #[must_use]
    pub fn is_step_complete(&self, step: Step) -> bool {
        match step {
            Step::Postcode => !self.postcode.trim().is_empty(),
            // Selecting waste types is recommended, not enforced.
            Step::WasteType => true,
            Step::SelectSkip => self.skip_size.is_some(),
            // `permit_required` defaults to a valid answer.
            Step::PermitCheck => true,
            Step::ChooseDate => self.delivery_date.is_some(),
            Step::Payment => self.payment_completed && self.contact.is_filled(),
        }
    }

    /// The earliest step still missing input, or `None` when the whole
    /// wizard is ready to submit.
    #[must_use]
    pub fn first_incomplete_step(&self) -> Option<Step> {
        Step::ALL.into_iter().find(|step| !self.is_step_complete(*step))
    }

    /// The offers this wizard's heavy-waste declaration allows, in catalog
    /// order. See [`catalog::eligible_skips`].
    #[must_use]
    pub fn eligible_skips<'a>(&self, offers: &'a [SkipOffer]) -> Vec<&'a SkipOffer> {
        catalog::eligible_skips(offers, self.heavy_waste_percentage, &self.heavy_waste_types)
    }

    /// Applies one action and returns the next state.
    ///
    /// # Errors
    ///
    /// [`WizardError::IncompleteStep`] when `GotoStep` would jump forward
    /// over a step whose inputs are missing. Every other action is
    /// infallible.
    pub fn apply(&self, action: WizardAction) -> Result<Self, WizardError> {
        let mut next = self.clone();
        match action {
            WizardAction::GotoStep(target) => {
                self.check_forward(target)?;
                tracing::debug!(from = %self.current_step, to = %target, "wizard step change");
                next.current_step = target;
            }
            WizardAction::SetPostcode(postcode) => next.postcode = postcode,
            WizardAction::ToggleWasteType(waste) => {
                if !next.selected_waste_types.remove(&waste) {
                    next.selected_waste_types.insert(waste);
                }
            }
            WizardAction::ToggleHeavyWasteType(heavy) => {
                if !next.heavy_waste_types.remove(&heavy) {
                    next.heavy_waste_types.insert(heavy);
                }
            }
            WizardAction::SetHeavyWastePercentage(percentage) => {
                next.heavy_waste_percentage = percentage;
            }
            WizardAction::SetPlasterboardPercentage(percentage) => {
                next.plasterboard_percentage = percentage;
            }
            WizardAction::SelectSkip(size) => next.skip_size = Some(size),
            WizardAction::SetPermitRequired(required) => next.permit_required = required,
            WizardAction::SetDeliveryDate(date) => next.delivery_date = Some(date),
            WizardAction::SetContact(contact) => next.contact = contact,
            WizardAction::CompletePayment => next.payment_completed = true,
        }
        Ok(next)
    }

    /// Converts a finished wizard into the payload the booking store accepts.
    ///
    /// Text fields are trimmed. Heavy-waste fields are carried only while
    /// [`heavy_waste_active`](Self::heavy_waste_active) holds; a percentage
    /// without types (or vice versa) submits as no heavy waste.
    ///
    /// # Errors
    ///
    /// [`WizardError::IncompleteStep`] naming the earliest unfinished step.
    pub fn submission(&self) -> Result<NewBooking, WizardError> {
        if let Some(step) = self.first_incomplete_step() {
            return Err(WizardError::IncompleteStep(step));
        }
        let heavy_load = self.heavy_waste_active();
        Ok(NewBooking {
            user_id: None,
            postcode: self.postcode.trim().to_string(),
            waste_types: self.selected_waste_types.iter().copied().collect(),
            heavy_waste_types: heavy_load
                .then(|| self.heavy_waste_types.iter().copied().collect()),
            heavy_waste_percentage: heavy_load.then_some(self.heavy_waste_percentage),
            skip_size: self.skip_size.clone(),
            permit_required: self.permit_required,
            delivery_date: self.delivery_date,
            contact_name: self.contact.name.trim().to_string(),
            contact_email: self.contact.email.trim().to_string(),
            contact_phone: self.contact.phone.trim().to_string(),
            payment_completed: self.payment_completed,
        })
    }

    fn check_forward(&self, target: Step) -> Result<(), WizardError> {
        for number in self.current_step.number()..target.number() {
            let step = Step::try_from(number)?;
            if !self.is_step_complete(step) {
                return Err(WizardError::IncompleteStep(step));
            }
        }
        Ok(())
    }
}
