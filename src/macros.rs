// src/macros.rs

/// String shorthand.
/// `s!()` is an empty `String`, `s!(x)` is `String::from(x)`.
#[macro_export]
macro_rules! s {
    () => {
        ::std::string::String::new()
    };
    ($expr:expr) => {
        ::std::string::String::from($expr)
    };
}

/// Concatenate `Display` pieces into one owned `String`: `join!(uid, "_fans.csv")`.
#[macro_export]
macro_rules! join {
    ($($part:expr),+ $(,)?) => {{
        use ::std::fmt::Write as _;
        let mut out = ::std::string::String::new();
        $(
            let _ = write!(out, "{}", $part);
        )+
        out
    }};
}
