//! Constants shared across the crate

/// Name of the configuration file looked up by [`Config::discover`](super::Config::discover)
pub const CONFIG_FILE_NAME: &str = "curly.toml";

/// Default marker symbols
pub mod markers {
    pub const START: &str = "{{";

    pub const END: &str = "}}";

    /// Escaped start symbol, rendered as a literal start symbol
    pub const ESCAPED_START: &str = "{{{{";

    /// Escaped end symbol, rendered as a literal end symbol
    pub const ESCAPED_END: &str = "}}}}";
}
