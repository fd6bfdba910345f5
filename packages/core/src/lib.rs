//! Skip-hire core: booking wizard state machine, booking schema, and skip
//! catalog rules.

pub mod booking;
pub mod catalog;
pub mod wizard;

pub use booking::{
    Booking, BookingPatch, HeavyWastePercentage, HeavyWasteType, NewBooking,
    PlasterboardPercentage, ValidationError, WasteType,
};
pub use catalog::{eligible_skips, SkipOffer, HEAVY_WASTE_MAX_YARDS};
pub use wizard::{Contact, Step, WizardAction, WizardError, WizardState};
