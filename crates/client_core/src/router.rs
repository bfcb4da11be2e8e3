//! Navigation table: `/` is the operator listing, `/<identifier>` the detail page.
//!
//! There is no fallback entry: unmatched locations yield [`RouteError::Unmatched`].

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use thiserror::Error;

/// Characters escaped when an identifier is written into a path segment.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Listing,
    Detail,
}

/// Input bound to the detail view, extracted once by the router.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailProps {
    pub identifier: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Listing,
    Detail(DetailProps),
}

impl Route {
    pub fn detail(identifier: impl Into<String>) -> Self {
        Self::Detail(DetailProps {
            identifier: identifier.into(),
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Listing => "home",
            Self::Detail(_) => "detail",
        }
    }

    pub fn view(&self) -> View {
        match self {
            Self::Listing => View::Listing,
            Self::Detail(_) => View::Detail,
        }
    }

    /// Canonical path for this route, with the identifier percent-encoded.
    pub fn path(&self) -> String {
        match self {
            Self::Listing => "/".to_string(),
            Self::Detail(props) => {
                format!("/{}", utf8_percent_encode(&props.identifier, SEGMENT))
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteDefinition {
    pub name: &'static str,
    pub pattern: &'static str,
    pub view: View,
}

pub const ROUTES: [RouteDefinition; 2] = [
    RouteDefinition {
        name: "home",
        pattern: "/",
        view: View::Listing,
    },
    RouteDefinition {
        name: "detail",
        pattern: "/:identifier",
        view: View::Detail,
    },
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("no route matches path '{path}'")]
    Unmatched { path: String },
}

/// Resolves a location (path with optional query and fragment) to a route.
///
/// The identifier segment is percent-decoded, so `/12.345.678%2F0001-90`
/// binds `12.345.678/0001-90`.
pub fn resolve(location: &str) -> Result<Route, RouteError> {
    let unmatched = || RouteError::Unmatched {
        path: location.to_string(),
    };

    let path = location.split(['?', '#']).next().unwrap_or_default();
    if path == "/" {
        return Ok(Route::Listing);
    }

    let rest = path.strip_prefix('/').ok_or_else(unmatched)?;
    let segment = rest.strip_suffix('/').unwrap_or(rest);
    if segment.is_empty() || segment.contains('/') {
        return Err(unmatched());
    }

    let identifier = percent_decode_str(segment)
        .decode_utf8()
        .map_err(|_| unmatched())?;
    Ok(Route::detail(identifier))
}

#[cfg(test)]
#[path = "tests/router_tests.rs"]
mod tests;
