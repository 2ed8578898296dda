//! Enumerations, carried as their integer ordinal.

/// Declare a C-like enum with an explicit integer representation and
/// implement [`Bind`](crate::binder::Bind) for it.
///
/// The enum encodes as its discriminant and decodes through the integer
/// codec of the declared representation, so a `u8` enum rejects `300` and
/// an `i64` enum accepts anything in the safe integer range. Ordinals that
/// name no variant are rejected.
///
/// ```
/// use feather_core::{from_str, json_enum, to_string, CodecOptions};
///
/// json_enum! {
///     #[derive(Debug, Clone, Copy, PartialEq)]
///     pub enum Level: u8 {
///         Low = 1,
///         High = 5,
///     }
/// }
///
/// let options = CodecOptions::compact();
/// assert_eq!(to_string(&Level::High, &options).unwrap(), "5");
/// assert_eq!(from_str::<Level>("1", &options).unwrap(), Level::Low);
/// assert!(from_str::<Level>("2", &options).is_err());
/// ```
#[macro_export]
macro_rules! json_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident : $repr:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $disc:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[repr($repr)]
        $vis enum $name {
            $( $(#[$vmeta])* $variant = $disc ),+
        }

        impl $name {
            /// Every discriminant, in declaration order.
            pub const ORDINALS: &'static [$repr] = &[$($disc),+];

            pub fn ordinal(&self) -> $repr {
                match self {
                    $( Self::$variant => $disc ),+
                }
            }

            pub fn from_ordinal(ordinal: $repr) -> ::core::option::Option<Self> {
                $(
                    if ordinal == $disc {
                        return ::core::option::Option::Some(Self::$variant);
                    }
                )+
                ::core::option::Option::None
            }
        }

        impl $crate::binder::Bind for $name {
            fn to_tree(
                &self,
                binder: &mut $crate::binder::Binder,
            ) -> $crate::Result<$crate::JsonValue> {
                binder.bind(&self.ordinal())
            }

            fn from_tree(
                tree: &$crate::JsonValue,
                options: &$crate::CodecOptions,
            ) -> $crate::Result<Self> {
                let ordinal = <$repr as $crate::binder::Bind>::from_tree(tree, options)?;
                Self::from_ordinal(ordinal).ok_or_else(|| $crate::FeatherError::InvalidScalar {
                    kind: "enum",
                    message: format!("{} is not a {} ordinal", ordinal, stringify!($name)),
                })
            }

            /// The variant with ordinal 0, or the first declared one.
            fn empty() -> $crate::Result<Self> {
                Self::from_ordinal(0)
                    .or_else(|| Self::from_ordinal(Self::ORDINALS[0]))
                    .ok_or($crate::FeatherError::UnsupportedType {
                        type_name: stringify!($name),
                    })
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::binder::{from_tree, to_tree, Bind};
    use crate::error::FeatherError;
    use crate::options::CodecOptions;
    use crate::types::JsonValue;

    crate::json_enum! {
        #[derive(Debug, PartialEq)]
        enum Signed: i16 {
            Minus = -300,
            Plus = 300,
        }
    }

    crate::json_enum! {
        #[derive(Debug, PartialEq)]
        enum Small: u8 {
            One = 1,
            Two = 2,
        }
    }

    #[test]
    fn test_true_repr_width() {
        let opts = CodecOptions::default();
        assert_eq!(to_tree(&Signed::Minus, &opts).unwrap(), JsonValue::Number(-300.0));
        assert_eq!(
            from_tree::<Signed>(&JsonValue::Number(300.0), &opts).unwrap(),
            Signed::Plus
        );
        // -300 does not fit the u8 repr before the ordinal lookup happens
        let err = from_tree::<Small>(&JsonValue::Number(-300.0), &opts).unwrap_err();
        assert!(matches!(err, FeatherError::InvalidScalar { kind: "integer", .. }));
    }

    #[test]
    fn test_unknown_ordinal() {
        let err = from_tree::<Small>(&JsonValue::Number(3.0), &CodecOptions::default()).unwrap_err();
        assert!(matches!(err, FeatherError::InvalidScalar { kind: "enum", .. }));
    }

    #[test]
    fn test_empty_falls_back_to_first_variant() {
        assert_eq!(Small::empty().unwrap(), Small::One);
        assert_eq!(Small::ORDINALS, &[1, 2]);
    }
}
