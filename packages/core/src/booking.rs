//! Booking record schema and validation.
//!
//! These types are the REST wire format: structs use
//! `#[serde(rename_all = "camelCase")]` and the enums carry the exact
//! strings the booking flow has always exchanged, so stored records and
//! API payloads stay byte-compatible across backends.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

// ---------------------------------------------------------------------------
// Double-Option helper for nullable + optional fields
// ---------------------------------------------------------------------------

/// Deserializes a patch field that is both optional (may be absent) and
/// nullable (may be `null`).
///
/// - Absent field -> `None` (outer Option): leave the stored value alone.
/// - Present `null` -> `Some(None)`: clear the stored value.
/// - Present value -> `Some(Some(value))`: replace the stored value.
///
/// Plain `Option<T>` collapses `null` into the outer `None`, which would make
/// "don't touch" and "clear" indistinguishable in a PATCH body.
#[allow(clippy::option_option)]
fn deserialize_double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Ok(Some(Option::deserialize(deserializer)?))
}

/// Deserializes a patch field whose record counterpart is required.
///
/// The field may be absent (leave the stored value alone), but a present
/// `null` is a type error. Without this, serde folds `null` into the outer
/// `None` and a clear attempt would be silently ignored instead of rejected.
fn deserialize_required<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Broad waste category selected on the wizard's waste-type step.
///
/// Lowercase wire strings (`"garden"`, ...) are the stored format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum WasteType {
    Household,
    Construction,
    Garden,
    Commercial,
}

/// Heavy material kinds that affect which skips may be offered.
///
/// Wire strings are the capitalized variant names (`"Soil"`, `"Rubble"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum HeavyWasteType {
    Soil,
    Concrete,
    Bricks,
    Tiles,
    Sand,
    Gravel,
    Rubble,
}

/// Declared share of heavy material in the load.
///
/// The wire strings are human-readable labels; they are stored verbatim on
/// booking records, so the renames here must never change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum HeavyWastePercentage {
    #[default]
    #[serde(rename = "No heavy waste")]
    NoHeavyWaste,
    #[serde(rename = "Up to 5%")]
    UpToFivePercent,
    #[serde(rename = "5-20%")]
    FiveToTwentyPercent,
    #[serde(rename = "Over 20%")]
    OverTwentyPercent,
}

impl HeavyWastePercentage {
    /// True when the declared share is anything above "No heavy waste".
    #[must_use]
    pub fn declares_heavy_waste(self) -> bool {
        self != Self::NoHeavyWaste
    }
}

/// Declared share of plasterboard in the load.
///
/// Tracked during the wizard for disposal guidance; booking records do not
/// store it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum PlasterboardPercentage {
    #[default]
    #[serde(rename = "No plasterboard")]
    NoPlasterboard,
    #[serde(rename = "Up to 5%")]
    UpToFivePercent,
    #[serde(rename = "5-20%")]
    FiveToTwentyPercent,
    #[serde(rename = "more than 20%")]
    MoreThanTwentyPercent,
    #[serde(rename = "I will dispose of it myself")]
    SelfDisposal,
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// A stored booking, as returned by every read endpoint.
///
/// `id` and `created_at` are assigned by the repository on create and are
/// immutable afterwards; [`BookingPatch`] has no fields for them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: i64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub user_id: Option<i64>,
    pub postcode: String,
    pub waste_types: Vec<WasteType>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub heavy_waste_types: Option<Vec<HeavyWasteType>>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub heavy_waste_percentage: Option<HeavyWastePercentage>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub skip_size: Option<String>,
    pub permit_required: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub delivery_date: Option<NaiveDate>,
    pub contact_name: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub payment_completed: bool,
    pub created_at: DateTime<Utc>,
}

/// Fields a client supplies to create a booking.
///
/// `postcode`, `waste_types`, and the three contact fields are required;
/// everything else defaults. The repository turns this into a [`Booking`] by
/// assigning the id and creation timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct NewBooking {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub user_id: Option<i64>,
    pub postcode: String,
    pub waste_types: Vec<WasteType>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub heavy_waste_types: Option<Vec<HeavyWasteType>>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub heavy_waste_percentage: Option<HeavyWastePercentage>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub skip_size: Option<String>,
    #[serde(default)]
    pub permit_required: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub delivery_date: Option<NaiveDate>,
    pub contact_name: String,
    pub contact_email: String,
    pub contact_phone: String,
    #[serde(default)]
    pub payment_completed: bool,
}

/// A partial update to a booking.
///
/// Every field is optional. Nullable record fields use the double-Option
/// encoding (see [`deserialize_double_option`]): absent leaves the stored
/// value, `null` clears it. Required record fields go through
/// [`deserialize_required`], which makes `null` a type error, so they can be
/// replaced but never cleared. Unknown keys (including `id` and `createdAt`)
/// are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
#[allow(clippy::option_option)]
pub struct BookingPatch {
    #[serde(
        skip_serializing_if = "Option::is_none",
        default,
        deserialize_with = "deserialize_double_option"
    )]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<i64>))]
    pub user_id: Option<Option<i64>>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        default,
        deserialize_with = "deserialize_required"
    )]
    pub postcode: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        default,
        deserialize_with = "deserialize_required"
    )]
    pub waste_types: Option<Vec<WasteType>>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        default,
        deserialize_with = "deserialize_double_option"
    )]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<Vec<HeavyWasteType>>))]
    pub heavy_waste_types: Option<Option<Vec<HeavyWasteType>>>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        default,
        deserialize_with = "deserialize_double_option"
    )]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<HeavyWastePercentage>))]
    pub heavy_waste_percentage: Option<Option<HeavyWastePercentage>>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        default,
        deserialize_with = "deserialize_double_option"
    )]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>))]
    pub skip_size: Option<Option<String>>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        default,
        deserialize_with = "deserialize_required"
    )]
    pub permit_required: Option<bool>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        default,
        deserialize_with = "deserialize_double_option"
    )]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<NaiveDate>))]
    pub delivery_date: Option<Option<NaiveDate>>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        default,
        deserialize_with = "deserialize_required"
    )]
    pub contact_name: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        default,
        deserialize_with = "deserialize_required"
    )]
    pub contact_email: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        default,
        deserialize_with = "deserialize_required"
    )]
    pub contact_phone: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        default,
        deserialize_with = "deserialize_required"
    )]
    pub payment_completed: Option<bool>,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// One or more required fields are missing or blank.
///
/// Field names in the message use the wire spelling (`contactName`), since
/// the message travels back to API clients.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("missing or blank required fields: {}", .fields.join(", "))]
pub struct ValidationError {
    pub fields: Vec<&'static str>,
}

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

fn check_required(
    postcode: &str,
    contact_name: &str,
    contact_email: &str,
    contact_phone: &str,
) -> Result<(), ValidationError> {
    let mut fields = Vec::new();
    if is_blank(postcode) {
        fields.push("postcode");
    }
    if is_blank(contact_name) {
        fields.push("contactName");
    }
    if is_blank(contact_email) {
        fields.push("contactEmail");
    }
    if is_blank(contact_phone) {
        fields.push("contactPhone");
    }
    if fields.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { fields })
    }
}

impl NewBooking {
    /// Checks that all required fields are present with non-blank values.
    ///
    /// Type and presence errors are already caught by deserialization; this
    /// rejects the whitespace-only strings serde happily accepts.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] listing every offending field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_required(
            &self.postcode,
            &self.contact_name,
            &self.contact_email,
            &self.contact_phone,
        )
    }
}

impl Booking {
    /// Builds the stored record from validated client input.
    #[must_use]
    pub fn from_new(new: NewBooking, id: i64, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            user_id: new.user_id,
            postcode: new.postcode,
            waste_types: new.waste_types,
            heavy_waste_types: new.heavy_waste_types,
            heavy_waste_percentage: new.heavy_waste_percentage,
            skip_size: new.skip_size,
            permit_required: new.permit_required,
            delivery_date: new.delivery_date,
            contact_name: new.contact_name,
            contact_email: new.contact_email,
            contact_phone: new.contact_phone,
            payment_completed: new.payment_completed,
            created_at,
        }
    }

    /// Returns a copy with the patch merged in. `id` and `created_at` are
    /// untouchable; the merge is shallow (arrays replace wholesale).
    ///
    /// The caller must re-validate the result before storing it, so a patch
    /// cannot blank out a required field.
    #[must_use]
    pub fn apply_patch(&self, patch: &BookingPatch) -> Self {
        let mut merged = self.clone();
        if let Some(user_id) = &patch.user_id {
            merged.user_id = *user_id;
        }
        if let Some(postcode) = &patch.postcode {
            merged.postcode = postcode.clone();
        }
        if let Some(waste_types) = &patch.waste_types {
            merged.waste_types = waste_types.clone();
        }
        if let Some(heavy_waste_types) = &patch.heavy_waste_types {
            merged.heavy_waste_types = heavy_waste_types.clone();
        }
        if let Some(heavy_waste_percentage) = &patch.heavy_waste_percentage {
            merged.heavy_waste_percentage = *heavy_waste_percentage;
        }
        if let Some(skip_size) = &patch.skip_size {
            merged.skip_size = skip_size.clone();
        }
        if let Some(permit_required) = patch.permit_required {
            merged.permit_required = permit_required;
        }
        if let Some(delivery_date) = &patch.delivery_date {
            merged.delivery_date = *delivery_date;
        }
        if let Some(contact_name) = &patch.contact_name {
            merged.contact_name = contact_name.clone();
        }
        if let Some(contact_email) = &patch.contact_email {
            merged.contact_email = contact_email.clone();
        }
        if let Some(contact_phone) = &patch.contact_phone {
            merged.contact_phone = contact_phone.clone();
        }
        if let Some(payment_completed) = patch.payment_completed {
            merged.payment_completed = payment_completed;
        }
        merged
    }

    /// Re-checks the required-field rules on a (possibly patched) record.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] listing every offending field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_required(
            &self.postcode,
            &self.contact_name,
            &self.contact_email,
            &self.contact_phone,
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
