/// Builds a [`Value`](crate::Value) with JSON-like syntax.
///
/// Objects become dictionaries (keys must be string literals) and arrays become
/// arrays. Any other expression is converted with [`to_value`](crate::to_value),
/// falling back to `Null` if it cannot be represented.
///
/// ```rust
/// use serde_textplist::{plist, Value};
///
/// let value = plist!({
///     "name": "Alice",
///     "tags": ["admin", "ops"],
///     "active": true,
///     "manager": null
/// });
/// let dict = value.as_dict().unwrap();
/// assert_eq!(dict.get("manager"), Some(&Value::Null));
/// ```
#[macro_export]
macro_rules! plist {
    (null) => {
        $crate::Value::Null
    };

    (true) => {
        $crate::Value::Bool(true)
    };

    (false) => {
        $crate::Value::Bool(false)
    };

    ([]) => {
        $crate::Value::Array(vec![])
    };

    ([ $($elem:tt),* $(,)? ]) => {
        $crate::Value::Array(vec![$($crate::plist!($elem)),*])
    };

    ({}) => {
        $crate::Value::Dict($crate::PlistMap::new())
    };

    ({ $($key:literal : $value:tt),* $(,)? }) => {{
        let mut dict = $crate::PlistMap::new();
        $(
            dict.insert($key.to_string(), $crate::plist!($value));
        )*
        $crate::Value::Dict(dict)
    }};

    ($other:expr) => {{
        $crate::to_value(&$other).unwrap_or($crate::Value::Null)
    }};
}
