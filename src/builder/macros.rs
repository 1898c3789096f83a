//! Macros for declaring state enums.

/// Declare an enum of state tags and implement [`State`](crate::core::State) for it.
///
/// # Example
///
/// ```
/// use statecraft::core::State;
/// use statecraft::state_enum;
///
/// state_enum! {
///     pub enum Light {
///         Red,
///         Yellow,
///         Green,
///         Broken,
///     }
///     final: [Broken]
/// }
///
/// assert_eq!(Light::Yellow.name(), "Yellow");
/// assert!(Light::Broken.is_final());
/// ```
#[macro_export]
macro_rules! state_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }

        $(final: [$($final:ident),* $(,)?])?
    ) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Debug, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::State for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }

            fn is_final(&self) -> bool {
                match self {
                    $($(Self::$final => true,)*)?
                    #[allow(unreachable_patterns)]
                    _ => false,
                }
            }
        }
    };
}
