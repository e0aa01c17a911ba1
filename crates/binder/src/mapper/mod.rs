//! Mapping of parsed form data onto destination records.
//!
//! A destination record describes itself through [`FormRecord::form_fields`], a table of
//! [`FieldDescriptor`]s listing each field's name, its form key and a mutable [`FieldSlot`]
//! into the field. The table is normally generated with `#[derive(FormRecord)]`:
//!
//! ```
//! use micro_binder::{FileHeader, FormRecord};
//!
//! #[derive(FormRecord, Default)]
//! struct Address {
//!     #[form(key = "city")]
//!     city: String,
//! }
//!
//! #[derive(FormRecord, Default)]
//! struct Profile {
//!     #[form(key = "name")]
//!     name: String,
//!     #[form(key = "age")]
//!     age: u8,
//!     #[form(key = "tags")]
//!     tags: Vec<String>,
//!     #[form(key = "avatar")]
//!     avatar: Option<FileHeader>,
//!     // nested records are always walked, with or without a key
//!     address: Address,
//!     // fields without a key are ignored
//!     note: String,
//! }
//! ```
//!
//! [`map_form`] then walks the table:
//! - `Record` slots are recursed into with the same form data
//! - fields without a key are skipped
//! - text values are converted with [`convert`] into scalar and `Vec` slots
//! - uploaded files are assigned to `Option<FileHeader>` and `Vec<FileHeader>` slots
//! - a text value for a slot that cannot hold text fails with [`BindError::UnknownFieldType`]

mod scalar;

pub use scalar::convert;
pub use scalar::FormScalar;
pub use scalar::ScalarKind;

use tracing::trace;

use crate::form::{FileHeader, FormData};
use crate::{BindError, ConversionError};

/// A record that can be populated from form data.
pub trait FormRecord {
    /// Describes the record's fields in declaration order.
    fn form_fields(&mut self) -> Vec<FieldDescriptor<'_>>;
}

/// One entry of a record's field table.
#[derive(Debug)]
pub struct FieldDescriptor<'a> {
    name: &'static str,
    key: Option<&'static str>,
    slot: FieldSlot<'a>,
}

impl<'a> FieldDescriptor<'a> {
    pub fn new(name: &'static str, key: Option<&'static str>, slot: FieldSlot<'a>) -> Self {
        Self { name, key, slot }
    }

    /// The field's name in the record.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The form key the field is bound from, `None` if the field carries no key.
    pub fn key(&self) -> Option<&'static str> {
        self.key
    }

    pub fn slot(&self) -> &FieldSlot<'a> {
        &self.slot
    }
}

/// A mutable view into a record field, typed by what the field can hold.
pub enum FieldSlot<'a> {
    /// a scalar or a `Vec` of scalars
    Text(&'a mut dyn TextSlot),
    /// a single uploaded file
    File(&'a mut Option<FileHeader>),
    /// every uploaded file of a key
    Files(&'a mut Vec<FileHeader>),
    /// a nested record
    Record(&'a mut dyn FormRecord),
    /// a field of a type that cannot be bound, carrying the type name
    Unsupported(&'static str),
}

impl FieldSlot<'_> {
    fn type_name(&self) -> &'static str {
        match self {
            FieldSlot::Text(_) => "text",
            FieldSlot::File(_) => std::any::type_name::<Option<FileHeader>>(),
            FieldSlot::Files(_) => std::any::type_name::<Vec<FileHeader>>(),
            FieldSlot::Record(_) => "record",
            FieldSlot::Unsupported(type_name) => type_name,
        }
    }
}

impl std::fmt::Debug for FieldSlot<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldSlot::Text(slot) => f.debug_tuple("Text").field(&slot.kind()).finish(),
            FieldSlot::File(file) => f.debug_tuple("File").field(file).finish(),
            FieldSlot::Files(files) => f.debug_tuple("Files").field(files).finish(),
            FieldSlot::Record(_) => f.write_str("Record"),
            FieldSlot::Unsupported(type_name) => f.debug_tuple("Unsupported").field(type_name).finish(),
        }
    }
}

/// A field that accepts the text values of a form key.
pub trait TextSlot {
    /// The scalar kind of the field, or of its elements for a sequence.
    fn kind(&self) -> ScalarKind;

    /// Assigns the values matched for the field's key.
    ///
    /// Single-value fields take the first value, sequences convert every value and replace their
    /// contents only once all of them converted.
    fn assign(&mut self, values: &[String]) -> Result<(), ConversionError>;
}

/// Conversion of a record field into its [`FieldSlot`].
///
/// The default method reports the field as unsupported, so a type that should be carried on a
/// record without ever being bound only needs an empty impl:
///
/// ```
/// use micro_binder::IntoFieldSlot;
///
/// struct Opaque;
///
/// impl IntoFieldSlot for Opaque {}
/// ```
pub trait IntoFieldSlot {
    fn field_slot(&mut self) -> FieldSlot<'_> {
        FieldSlot::Unsupported(std::any::type_name::<Self>())
    }
}

macro_rules! impl_scalar_slots {
    ($($ty:ty),* $(,)?) => {
        $(
        impl TextSlot for $ty {
            fn kind(&self) -> ScalarKind {
                <$ty as FormScalar>::KIND
            }

            fn assign(&mut self, values: &[String]) -> Result<(), ConversionError> {
                if let Some(first) = values.first() {
                    *self = convert::<$ty>(first)?;
                }
                Ok(())
            }
        }

        impl TextSlot for Vec<$ty> {
            fn kind(&self) -> ScalarKind {
                <$ty as FormScalar>::KIND
            }

            fn assign(&mut self, values: &[String]) -> Result<(), ConversionError> {
                *self = values.iter().map(|value| convert::<$ty>(value)).collect::<Result<_, _>>()?;
                Ok(())
            }
        }

        impl IntoFieldSlot for $ty {
            fn field_slot(&mut self) -> FieldSlot<'_> {
                FieldSlot::Text(self)
            }
        }

        impl IntoFieldSlot for Vec<$ty> {
            fn field_slot(&mut self) -> FieldSlot<'_> {
                FieldSlot::Text(self)
            }
        }
        )*
    };
}

impl_scalar_slots!(String, bool, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl IntoFieldSlot for Option<FileHeader> {
    fn field_slot(&mut self) -> FieldSlot<'_> {
        FieldSlot::File(self)
    }
}

impl IntoFieldSlot for Vec<FileHeader> {
    fn field_slot(&mut self) -> FieldSlot<'_> {
        FieldSlot::Files(self)
    }
}

impl IntoFieldSlot for char {}
impl IntoFieldSlot for i128 {}
impl IntoFieldSlot for u128 {}
impl IntoFieldSlot for () {}

/// Populates `record` from `form`, recursing into nested records.
///
/// Fields processed before a failing one keep their new values.
pub fn map_form<R>(form: &FormData, record: &mut R) -> Result<(), BindError>
where
    R: FormRecord + ?Sized,
{
    for field in record.form_fields() {
        map_field(form, field)?;
    }
    Ok(())
}

fn map_field(form: &FormData, field: FieldDescriptor<'_>) -> Result<(), BindError> {
    let FieldDescriptor { name, key, mut slot } = field;

    if let FieldSlot::Record(nested) = slot {
        return map_form(form, nested);
    }

    let Some(key) = key else {
        trace!(field = name, "field has no form key, skip");
        return Ok(());
    };

    if let Some(values) = form.values(key) {
        let FieldSlot::Text(text) = &mut slot else {
            return Err(BindError::unknown_field_type(name, slot.type_name()));
        };
        text.assign(values)?;
    }

    if let Some(files) = form.files(key) {
        match slot {
            FieldSlot::File(file) => {
                if let Some(first) = files.first() {
                    *file = Some(first.clone());
                }
            }
            FieldSlot::Files(all) => {
                if !files.is_empty() {
                    *all = files.to_vec();
                }
            }
            _ => {}
        }
    }

    Ok(())
}
