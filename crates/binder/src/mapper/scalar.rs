//! String to scalar conversion used by the form mapper.
//!
//! Every supported kind converts the empty string to its zero value, so a field that is present
//! but blank never fails. Non-empty values are parsed with the exact width of the target type.

use std::fmt;

use crate::ConversionError;

/// The scalar kinds a form value can be converted into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    String,
    Bool,
    I8,
    I16,
    I32,
    I64,
    Isize,
    U8,
    U16,
    U32,
    U64,
    Usize,
    F32,
    F64,
}

impl ScalarKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScalarKind::String => "string",
            ScalarKind::Bool => "bool",
            ScalarKind::I8 => "i8",
            ScalarKind::I16 => "i16",
            ScalarKind::I32 => "i32",
            ScalarKind::I64 => "i64",
            ScalarKind::Isize => "isize",
            ScalarKind::U8 => "u8",
            ScalarKind::U16 => "u16",
            ScalarKind::U32 => "u32",
            ScalarKind::U64 => "u64",
            ScalarKind::Usize => "usize",
            ScalarKind::F32 => "f32",
            ScalarKind::F64 => "f64",
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A type a single form value can be converted into.
///
/// `Default::default()` is the zero value produced for an empty input.
pub trait FormScalar: Sized + Default {
    const KIND: ScalarKind;

    /// Parses a non-empty raw value, returning the failure reason on error.
    fn parse_scalar(raw: &str) -> Result<Self, String>;
}

/// Converts `raw` into `T`, mapping the empty string to the zero value.
pub fn convert<T: FormScalar>(raw: &str) -> Result<T, ConversionError> {
    if raw.is_empty() {
        return Ok(T::default());
    }

    T::parse_scalar(raw).map_err(|reason| ConversionError::new(T::KIND, raw, reason))
}

impl FormScalar for String {
    const KIND: ScalarKind = ScalarKind::String;

    fn parse_scalar(raw: &str) -> Result<Self, String> {
        Ok(raw.to_owned())
    }
}

impl FormScalar for bool {
    const KIND: ScalarKind = ScalarKind::Bool;

    fn parse_scalar(raw: &str) -> Result<Self, String> {
        match raw {
            "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
            "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
            _ => Err("invalid boolean syntax".to_owned()),
        }
    }
}

macro_rules! impl_integer_scalar {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
        impl FormScalar for $ty {
            const KIND: ScalarKind = ScalarKind::$kind;

            fn parse_scalar(raw: &str) -> Result<Self, String> {
                raw.parse::<$ty>().map_err(|e| e.to_string())
            }
        }
        )*
    };
}

impl_integer_scalar! {
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    isize => Isize,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    usize => Usize,
}

macro_rules! impl_float_scalar {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
        impl FormScalar for $ty {
            const KIND: ScalarKind = ScalarKind::$kind;

            fn parse_scalar(raw: &str) -> Result<Self, String> {
                let value = raw.parse::<$ty>().map_err(|e| e.to_string())?;
                // std saturates to infinity where a width-checked parse reports a range error
                if value.is_infinite() && !is_infinity_literal(raw) {
                    return Err("value out of range".to_owned());
                }
                Ok(value)
            }
        }
        )*
    };
}

impl_float_scalar! {
    f32 => F32,
    f64 => F64,
}

fn is_infinity_literal(raw: &str) -> bool {
    let unsigned = raw.strip_prefix(['+', '-']).unwrap_or(raw);
    unsigned.eq_ignore_ascii_case("inf") || unsigned.eq_ignore_ascii_case("infinity")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_empty_is_zero<T: FormScalar + PartialEq + fmt::Debug>() {
        assert_eq!(convert::<T>("").unwrap(), T::default(), "kind {}", T::KIND);
    }

    #[test]
    fn empty_string_is_zero_for_every_kind() {
        assert_empty_is_zero::<String>();
        assert_empty_is_zero::<bool>();
        assert_empty_is_zero::<i8>();
        assert_empty_is_zero::<i16>();
        assert_empty_is_zero::<i32>();
        assert_empty_is_zero::<i64>();
        assert_empty_is_zero::<isize>();
        assert_empty_is_zero::<u8>();
        assert_empty_is_zero::<u16>();
        assert_empty_is_zero::<u32>();
        assert_empty_is_zero::<u64>();
        assert_empty_is_zero::<usize>();
        assert_empty_is_zero::<f32>();
        assert_empty_is_zero::<f64>();
    }

    #[test]
    fn string_is_identity() {
        assert_eq!(convert::<String>(" a b ").unwrap(), " a b ");
    }

    #[test]
    fn bool_spellings() {
        for raw in ["1", "t", "T", "TRUE", "true", "True"] {
            assert!(convert::<bool>(raw).unwrap(), "{raw}");
        }
        for raw in ["0", "f", "F", "FALSE", "false", "False"] {
            assert!(!convert::<bool>(raw).unwrap(), "{raw}");
        }

        let err = convert::<bool>("yes").unwrap_err();
        assert_eq!(err.kind(), ScalarKind::Bool);
        assert_eq!(err.value(), "yes");
    }

    #[test]
    fn integer_width_is_checked() {
        assert_eq!(convert::<i8>("127").unwrap(), 127);
        assert_eq!(convert::<i8>("-128").unwrap(), -128);
        assert!(convert::<i8>("128").is_err());
        assert!(convert::<i8>("-129").is_err());

        assert_eq!(convert::<u8>("255").unwrap(), 255);
        assert!(convert::<u8>("256").is_err());
        assert!(convert::<u16>("-1").is_err());

        assert_eq!(convert::<i64>("-9223372036854775808").unwrap(), i64::MIN);
        assert_eq!(convert::<u64>("18446744073709551615").unwrap(), u64::MAX);
    }

    #[test]
    fn integer_rejects_non_decimal() {
        let err = convert::<i32>("foo").unwrap_err();
        assert_eq!(err.kind(), ScalarKind::I32);
        assert_eq!(err.value(), "foo");
        assert_eq!(err.to_string(), r#"parsing "foo" as i32: invalid digit found in string"#);

        assert!(convert::<i32>("1.5").is_err());
        assert!(convert::<i32>("0x10").is_err());
    }

    #[test]
    fn float_width_is_checked() {
        assert_eq!(convert::<f32>("1.9").unwrap(), 1.9_f32);
        assert_eq!(convert::<f64>("2.5").unwrap(), 2.5_f64);

        let err = convert::<f32>("1e40").unwrap_err();
        assert_eq!(err.kind(), ScalarKind::F32);
        assert_eq!(err.reason(), "value out of range");

        assert_eq!(convert::<f64>("1e40").unwrap(), 1e40_f64);
        assert!(convert::<f64>("1e400").is_err());
    }

    #[test]
    fn float_accepts_explicit_infinity() {
        assert_eq!(convert::<f32>("inf").unwrap(), f32::INFINITY);
        assert_eq!(convert::<f64>("-Infinity").unwrap(), f64::NEG_INFINITY);
        assert!(convert::<f64>("NaN").unwrap().is_nan());
    }
}
