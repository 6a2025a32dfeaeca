//! Top-level field-name declarations for each message shape.
//!
//! A [`KeySpec`] lists every field a shape allows together with whether it is
//! required. Matching is exact: all required fields must be present and no
//! field outside the declaration is tolerated.

use crate::keys;

/// Whether a declared field must appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    Required,
    Optional,
}

impl Requirement {
    pub fn is_required(&self) -> bool {
        matches!(self, Requirement::Required)
    }
}

/// Declaration of a shape's allowed field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeySpec {
    name: &'static str,
    fields: &'static [(&'static str, Requirement)],
}

impl KeySpec {
    pub const fn new(name: &'static str, fields: &'static [(&'static str, Requirement)]) -> Self {
        Self { name, fields }
    }

    /// Human-readable name of the shape, used in diagnostics.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Requirement for `field`, or `None` if the shape does not allow it.
    pub fn requirement(&self, field: &str) -> Option<Requirement> {
        self.fields
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, requirement)| *requirement)
    }

    pub fn required(&self) -> impl Iterator<Item = &'static str> {
        self.fields
            .iter()
            .filter(|(_, requirement)| requirement.is_required())
            .map(|(name, _)| *name)
    }

    /// Exact-set match of `observed` field names against this declaration.
    ///
    /// Duplicate names in `observed` are tolerated; they count once.
    pub fn matches<'a, I>(&self, observed: I) -> bool
    where
        I: IntoIterator<Item = &'a str>,
        I::IntoIter: Clone,
    {
        let observed = observed.into_iter();

        let all_required_present = self
            .required()
            .all(|required| observed.clone().any(|name| name == required));
        if !all_required_present {
            return false;
        }

        observed.into_iter().all(|name| self.requirement(name).is_some())
    }

    /// Like [`KeySpec::matches`] but ignores fields outside the declaration.
    pub fn matches_required<'a, I>(&self, observed: I) -> bool
    where
        I: IntoIterator<Item = &'a str>,
        I::IntoIter: Clone,
    {
        let observed = observed.into_iter();
        self.required()
            .all(|required| observed.clone().any(|name| name == required))
    }
}

use Requirement::{Optional, Required};

pub const NOTIFICATION: KeySpec = KeySpec::new(
    "notification",
    &[
        (keys::VERSION, Required),
        (keys::METHOD, Required),
        (keys::PARAMS, Optional),
    ],
);

pub const REQUEST: KeySpec = KeySpec::new(
    "request",
    &[
        (keys::VERSION, Required),
        (keys::METHOD, Required),
        (keys::PARAMS, Optional),
        (keys::ID, Required),
    ],
);

pub const ERROR_RESPONSE: KeySpec = KeySpec::new(
    "error response",
    &[
        (keys::VERSION, Required),
        (keys::ERROR, Required),
        (keys::ID, Required),
    ],
);

pub const RESULT_RESPONSE: KeySpec = KeySpec::new(
    "result response",
    &[
        (keys::VERSION, Required),
        (keys::RESULT, Required),
        (keys::ID, Required),
    ],
);

/// Fields of the object carried in an error response's `error` member.
pub const ERROR_OBJECT: KeySpec = KeySpec::new(
    "error object",
    &[
        (keys::ERROR_CODE, Required),
        (keys::ERROR_MESSAGE, Required),
        (keys::ERROR_DATA, Optional),
    ],
);
