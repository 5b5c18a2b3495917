/// Builds an argument array of [`Value`](crate::Value)s.
///
/// Each argument is converted with `Value::from`, so anything with a
/// `From` conversion can be passed directly.
///
/// ```
/// use logtemplate::{values, Value};
///
/// let args = values!["alice", 42, vec![1, 2], None::<&str>];
/// assert_eq!(args.len(), 4);
/// assert_eq!(args[3], Value::Null);
///
/// let none = values![];
/// assert!(none.is_empty());
/// ```
#[macro_export]
macro_rules! values {
    () => {{
        let values: [$crate::Value; 0] = [];
        values
    }};
    ($($value:expr),+ $(,)?) => {
        [$($crate::Value::from($value)),+]
    };
}
