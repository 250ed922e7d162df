//! Mutation actions and how they are read off a request URL.
//!
//! The instruction travels in the request's own query string:
//!
//! ```text
//! GET /api/edge?action=set-query-param&name=b&value=2
//! ```
//!
//! `action` selects an [`ActionKind`]; `name` and `value` are its arguments.
//! A missing or empty `action` means "leave the request alone".

use std::fmt;
use std::str::FromStr;

use crate::error::MutationError;
use crate::request::Request;

/// The query parameter naming the action.
pub const ACTION_PARAM: &str = "action";
/// The query parameter carrying the target name (query key, cookie, header).
pub const NAME_PARAM: &str = "name";
/// The query parameter carrying the value to set.
pub const VALUE_PARAM: &str = "value";

/// A recognised `action` value.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ActionKind {
    SetQueryParam,
    DeleteQueryParam,
    SetCookie,
    DeleteCookie,
    SetHeader,
}

impl ActionKind {
    /// Returns the wire representation (e.g. `"set-query-param"`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SetQueryParam    => "set-query-param",
            Self::DeleteQueryParam => "delete-query-param",
            Self::SetCookie        => "set-cookie",
            Self::DeleteCookie     => "delete-cookie",
            Self::SetHeader        => "set-header",
        }
    }

    /// Whether the action needs a `value` in addition to a `name`.
    pub fn needs_value(self) -> bool {
        matches!(self, Self::SetQueryParam | Self::SetCookie | Self::SetHeader)
    }

    pub(crate) fn requirement(self) -> &'static str {
        if self.needs_value() { "name and value" } else { "name" }
    }

    pub(crate) fn describe(self) -> &'static str {
        match self {
            Self::SetQueryParam    => "set a query param",
            Self::DeleteQueryParam => "delete a query param",
            Self::SetCookie        => "set a cookie",
            Self::DeleteCookie     => "delete a cookie",
            Self::SetHeader        => "add a header",
        }
    }
}

/// Parses a wire action string. Case-sensitive.
impl FromStr for ActionKind {
    type Err = MutationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "set-query-param"    => Ok(Self::SetQueryParam),
            "delete-query-param" => Ok(Self::DeleteQueryParam),
            "set-cookie"         => Ok(Self::SetCookie),
            "delete-cookie"      => Ok(Self::DeleteCookie),
            "set-header"         => Ok(Self::SetHeader),
            other                => Err(MutationError::UnrecognizedAction { action: other.to_owned() }),
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An action argument that can be missing.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Field {
    Name,
    Value,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Name  => NAME_PARAM,
            Self::Value => VALUE_PARAM,
        })
    }
}

/// One requested change to a request.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum MutationAction {
    SetQueryParam { name: String, value: String },
    DeleteQueryParam { name: String },
    SetCookie { name: String, value: String },
    DeleteCookie { name: String },
    SetHeader { name: String, value: String },
    /// No action requested.
    None,
}

impl MutationAction {
    /// Reads `action`, `name` and `value` from the query string of `request`.
    ///
    /// The first occurrence of each parameter wins. Empty strings count as
    /// missing, so `?action=set-header&name=x&value=` is rejected rather than
    /// quietly setting an empty header.
    pub fn from_request(request: &Request) -> Result<Self, MutationError> {
        let param = |key: &str| request.query(key).filter(|v| !v.is_empty());
        let Some(action) = param(ACTION_PARAM) else {
            return Ok(Self::None);
        };
        let kind: ActionKind = action.parse()?;
        Self::build(kind, param(NAME_PARAM), param(VALUE_PARAM))
    }

    /// Assembles an action of `kind`, rejecting missing or empty arguments.
    pub fn build(
        kind: ActionKind,
        name: Option<String>,
        value: Option<String>,
    ) -> Result<Self, MutationError> {
        let name = required(kind, Field::Name, name)?;
        let action = match kind {
            ActionKind::DeleteQueryParam => Self::DeleteQueryParam { name },
            ActionKind::DeleteCookie     => Self::DeleteCookie { name },
            ActionKind::SetQueryParam    => Self::SetQueryParam { name, value: required(kind, Field::Value, value)? },
            ActionKind::SetCookie        => Self::SetCookie { name, value: required(kind, Field::Value, value)? },
            ActionKind::SetHeader        => Self::SetHeader { name, value: required(kind, Field::Value, value)? },
        };
        Ok(action)
    }

    /// The kind of this action, or `None` for [`MutationAction::None`].
    pub fn kind(&self) -> Option<ActionKind> {
        match self {
            Self::SetQueryParam { .. }    => Some(ActionKind::SetQueryParam),
            Self::DeleteQueryParam { .. } => Some(ActionKind::DeleteQueryParam),
            Self::SetCookie { .. }        => Some(ActionKind::SetCookie),
            Self::DeleteCookie { .. }     => Some(ActionKind::DeleteCookie),
            Self::SetHeader { .. }        => Some(ActionKind::SetHeader),
            Self::None                    => None,
        }
    }

    /// Re-checks the non-empty constraints on an already constructed action.
    pub(crate) fn validate(&self) -> Result<(), MutationError> {
        let Some(kind) = self.kind() else {
            return Ok(());
        };
        let (name, value) = match self {
            Self::SetQueryParam { name, value }
            | Self::SetCookie { name, value }
            | Self::SetHeader { name, value } => (name, Some(value)),
            Self::DeleteQueryParam { name } | Self::DeleteCookie { name } => (name, None),
            Self::None => return Ok(()),
        };
        if name.is_empty() {
            return Err(MutationError::InvalidInput { action: kind, missing_field: Field::Name });
        }
        if value.is_some_and(String::is_empty) {
            return Err(MutationError::InvalidInput { action: kind, missing_field: Field::Value });
        }
        Ok(())
    }
}

fn required(kind: ActionKind, field: Field, value: Option<String>) -> Result<String, MutationError> {
    value
        .filter(|v| !v.is_empty())
        .ok_or(MutationError::InvalidInput { action: kind, missing_field: field })
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use pretty_assertions::assert_eq;

    use super::*;

    fn parse(url: &str) -> Result<MutationAction, MutationError> {
        let req = http::Request::builder().uri(url).body(Bytes::new()).unwrap();
        MutationAction::from_request(&Request::try_from(req).unwrap())
    }

    #[test]
    fn no_action_means_none() {
        assert_eq!(parse("https://example.com/?a=1").unwrap(), MutationAction::None);
        assert_eq!(parse("https://example.com/?action=").unwrap(), MutationAction::None);
    }

    #[test]
    fn set_query_param_is_read_from_the_query_string() {
        let action = parse("https://example.com/?action=set-query-param&name=b&value=2").unwrap();
        assert_eq!(
            action,
            MutationAction::SetQueryParam { name: "b".into(), value: "2".into() }
        );
    }

    #[test]
    fn first_occurrence_of_a_parameter_wins() {
        let action = parse("https://example.com/?action=delete-cookie&name=sid&name=other").unwrap();
        assert_eq!(action, MutationAction::DeleteCookie { name: "sid".into() });
    }

    #[test]
    fn values_are_percent_decoded() {
        let action = parse("https://example.com/?action=set-header&name=x-note&value=hello%20world").unwrap();
        assert_eq!(
            action,
            MutationAction::SetHeader { name: "x-note".into(), value: "hello world".into() }
        );
    }

    #[test]
    fn unknown_action_is_rejected() {
        let err = parse("https://example.com/?action=bogus-action").unwrap_err();
        assert_eq!(err, MutationError::UnrecognizedAction { action: "bogus-action".into() });
    }

    #[test]
    fn missing_value_for_set_header_is_rejected() {
        let err = parse("https://example.com/?action=set-header&name=x-test").unwrap_err();
        assert_eq!(
            err,
            MutationError::InvalidInput { action: ActionKind::SetHeader, missing_field: Field::Value }
        );
        assert_eq!(err.to_string(), "must set name and value to add a header");
    }

    #[test]
    fn empty_name_counts_as_missing() {
        let err = parse("https://example.com/?action=delete-query-param&name=").unwrap_err();
        assert_eq!(
            err,
            MutationError::InvalidInput { action: ActionKind::DeleteQueryParam, missing_field: Field::Name }
        );
        assert_eq!(err.to_string(), "must set name to delete a query param");
    }

    #[test]
    fn delete_actions_ignore_value() {
        let action = parse("https://example.com/?action=delete-query-param&name=a&value=ignored").unwrap();
        assert_eq!(action, MutationAction::DeleteQueryParam { name: "a".into() });
    }

    #[test]
    fn wire_names_round_trip() {
        for kind in [
            ActionKind::SetQueryParam,
            ActionKind::DeleteQueryParam,
            ActionKind::SetCookie,
            ActionKind::DeleteCookie,
            ActionKind::SetHeader,
        ] {
            assert_eq!(kind.as_str().parse::<ActionKind>().unwrap(), kind);
        }
        assert!("SET-COOKIE".parse::<ActionKind>().is_err());
    }

    #[test]
    fn validate_catches_hand_built_empty_fields() {
        let action = MutationAction::SetCookie { name: "sid".into(), value: String::new() };
        assert_eq!(
            action.validate(),
            Err(MutationError::InvalidInput { action: ActionKind::SetCookie, missing_field: Field::Value })
        );
        assert_eq!(MutationAction::None.validate(), Ok(()));
    }
}
