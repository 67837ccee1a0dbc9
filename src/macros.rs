/// Builds a [`Value`](crate::Value) from a literal, JSON-like syntax.
///
/// Tables use `{ "key": value }`, arrays use `[a, b]`, and any other
/// expression goes through `Value::from`.
///
/// ```rust
/// use serde_tomlite::{toml, Value};
///
/// let owner = toml!({ "name": "Tom", "admin": true, "ports": [80, 443] });
/// assert_eq!(owner.as_table().and_then(|t| t.get("admin")), Some(&Value::Boolean(true)));
/// ```
#[macro_export]
macro_rules! toml {
    (true) => {
        $crate::Value::Boolean(true)
    };

    (false) => {
        $crate::Value::Boolean(false)
    };

    ([]) => {
        $crate::Value::Array(vec![])
    };

    ([ $($elem:tt),* $(,)? ]) => {
        $crate::Value::Array(vec![$($crate::toml!($elem)),*])
    };

    ({}) => {
        $crate::Value::Table($crate::Document::new())
    };

    ({ $($key:literal : $value:tt),* $(,)? }) => {{
        let mut table = $crate::Document::new();
        $(
            table.insert($key.to_string(), $crate::toml!($value));
        )*
        $crate::Value::Table(table)
    }};

    ($other:expr) => {
        $crate::Value::from($other)
    };
}

#[cfg(test)]
mod tests {
    use crate::{Document, Value};

    #[test]
    fn test_toml_macro_scalars() {
        assert_eq!(toml!(true), Value::Boolean(true));
        assert_eq!(toml!(42), Value::Integer(42));
        assert_eq!(toml!(-7), Value::Integer(-7));
        assert_eq!(toml!(2.5), Value::Float(2.5));
        assert_eq!(toml!("hello"), Value::String("hello".to_string()));
    }

    #[test]
    fn test_toml_macro_nested() {
        let value = toml!({
            "title": "example",
            "owner": { "age": 27 },
            "matrix": [[1, 2], [3]]
        });

        let mut owner = Document::new();
        owner.insert("age".to_string(), Value::Integer(27));

        let table = value.as_table().unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.get("owner"), Some(&Value::Table(owner)));
        assert_eq!(
            table.get("matrix"),
            Some(&Value::Array(vec![
                Value::Array(vec![Value::Integer(1), Value::Integer(2)]),
                Value::Array(vec![Value::Integer(3)]),
            ]))
        );
    }

    #[test]
    fn test_toml_macro_matches_parser() {
        let parsed = crate::parse("[owner]\nname = \"Tom\"\ntags = [\"a\", \"b\"]").unwrap();
        let built = toml!({ "owner": { "name": "Tom", "tags": ["a", "b"] } });
        assert_eq!(Value::Table(parsed), built);
    }
}
