use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// HTTP verb tags accepted by route declarations
///
/// The string form is the upper-case tag (`"GET"`, `"DEL"`, ...). `DELITE` is a
/// misspelled alias kept for callers that still declare routes with it; it is
/// registered as a delete route, same as `DEL`.
///
/// # Example
/// ```
/// use route_mapping::HttpMethod;
///
/// let method: HttpMethod = "PATCH".parse().unwrap();
/// assert_eq!(method, HttpMethod::Patch);
/// assert_eq!(method.router_method(), "patch");
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
)]
#[strum(serialize_all = "UPPERCASE")]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Head,
    Options,
    Put,
    Patch,
    /// Legacy misspelling of `DEL`.
    Delite,
    Del,
    All,
    /// Reserved tag for REST resource routes. Not expanded by this crate.
    Resources,
}

impl HttpMethod {
    /// Lower-case name of the host router operation this verb registers through
    pub fn router_method(self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
            HttpMethod::Head => "head",
            HttpMethod::Options => "options",
            HttpMethod::Put => "put",
            HttpMethod::Patch => "patch",
            HttpMethod::Delite => "delite",
            HttpMethod::Del => "del",
            HttpMethod::All => "all",
            HttpMethod::Resources => "resources",
        }
    }

    /// True for `DEL` and its legacy alias
    pub fn is_delete(self) -> bool {
        matches!(self, HttpMethod::Del | HttpMethod::Delite)
    }
}
