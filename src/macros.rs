// src/macros.rs

/// Compile a CSS selector once and hand out a `&'static Selector`.
#[macro_export]
macro_rules! selector {
    ($e: expr) => {{
        use ::once_cell::sync::Lazy;
        use ::scraper::Selector;
        static SELECTOR: Lazy<Selector> =
            Lazy::new(|| Selector::parse($e).expect("selector literal should parse"));
        &*SELECTOR
    }};
}

/// Compile a regex once and hand out a `&'static Regex`.
#[macro_export]
macro_rules! regex {
    ($e: expr) => {{
        use ::once_cell::sync::Lazy;
        use ::regex::Regex;
        static PATTERN: Lazy<Regex> =
            Lazy::new(|| Regex::new($e).expect("regex literal should compile"));
        &*PATTERN
    }};
}
