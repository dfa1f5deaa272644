/// Creates an enum whose variants are backed by string values, as the Pluto api sends them. The
/// syntax is like specifying an enum with numeric discriminants, just with strings instead.
/// Every created enum gets an additional `Custom(String)` variant which holds any value the api
/// returns but this crate does not know (yet), so a new value never fails deserialization.
///
/// The generated enum implements [`std::fmt::Display`], [`Default`] (`<name>::Custom("")`),
/// [`From<String>`] and [`serde::Serialize`] / [`serde::Deserialize`].
macro_rules! enum_values {
    ($(#[$attribute:meta])* $v:vis enum $name:ident { $($(#[$field_attribute:meta])* $field:ident = $value:expr)* }) => {
        $(
            #[$attribute]
        )*
        $v enum $name {
            $(
                $(
                    #[$field_attribute]
                )*
                $field
            ),*,
            /// Value which has no dedicated variant.
            Custom(String)
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                let value = match self {
                    $(
                        $name::$field => $value
                    ),*,
                    $name::Custom(raw) => raw.as_str()
                };
                write!(f, "{}", value)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name::Custom("".to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                match value.as_str() {
                    $(
                        $value => $name::$field
                    ),*,
                    _ => $name::Custom(value)
                }
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
                where D: serde::Deserializer<'de>
            {
                Ok(Self::from(String::deserialize(deserializer)?))
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> where S: serde::ser::Serializer {
                serializer.serialize_str(self.to_string().as_str())
            }
        }
    };
}

pub(crate) use enum_values;
