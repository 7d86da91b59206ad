//! Attachment helper macros

/// Bind arguments by name, in declaration order
///
/// Each identifier becomes an [`ArgumentBinding`](crate::ArgumentBinding)
/// named after itself, positioned by its place in the list and rendered
/// with `Display`.
///
/// # Example
///
/// ```
/// # use calltrail_core::arguments;
/// let first_argument = 42;
/// let second_argument = "UnitTest";
/// let bindings = arguments![first_argument, second_argument];
///
/// assert_eq!(bindings[0].name, "first_argument");
/// assert_eq!(bindings[1].value, "UnitTest");
/// assert_eq!(bindings[1].position, 1);
/// ```
#[macro_export]
macro_rules! arguments {
    () => {
        ::std::vec::Vec::<$crate::ArgumentBinding>::new()
    };
    ($($arg:ident),+ $(,)?) => {{
        let names: &[&str] = &[$(stringify!($arg)),+];
        let values: &[&dyn ::std::fmt::Display] = &[$(&$arg),+];
        names
            .iter()
            .zip(values.iter())
            .enumerate()
            .map(|(position, (name, value))| $crate::ArgumentBinding::new(*name, position, *value))
            .collect::<::std::vec::Vec<_>>()
    }};
}

/// Identity of a method on `$ty`, counting the listed parameters
///
/// # Example
///
/// ```
/// # use calltrail_core::method_identity;
/// struct Ledger;
/// let identity = method_identity!(Ledger, post(account, amount));
///
/// assert_eq!(identity.method_name(), "post");
/// assert_eq!(identity.parameter_count(), 2);
/// ```
#[macro_export]
macro_rules! method_identity {
    ($ty:ty, $method:ident($($param:ident),* $(,)?)) => {
        $crate::MethodIdentity::of::<$ty>(
            stringify!($method),
            <[&str]>::len(&[$(stringify!($param)),*]),
        )
    };
}
