//! # Reference Resolver
//!
//! Turns the compact locator syntax into a structured [`Locator`]:
//!
//! ```text
//! [<remote>/]<owner>/<module>[:<ref>]
//!
//! bufbuild/registry              owner + module
//! buf.build/bufbuild/registry    remote + owner + module
//! bufbuild/registry:main         owner + module + ref
//! ```
//!
//! Parsing is purely structural. Name rules (length, charset) belong to a
//! [`ValidationRuleSet`]; the resolver reports its verdict unchanged. Whether a
//! ref names a commit or a label is only known after asking the remote.

use std::fmt;

/// A parsed locator. `reference` is `None` when no `:` was present.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locator {
    pub remote: Option<String>,
    pub owner: String,
    pub module: String,
    pub reference: Option<String>,
}

impl Locator {
    pub fn new(owner: impl Into<String>, module: impl Into<String>) -> Self {
        Self {
            remote: None,
            owner: owner.into(),
            module: module.into(),
            reference: None,
        }
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    pub fn with_remote(mut self, remote: impl Into<String>) -> Self {
        self.remote = Some(remote.into());
        self
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(remote) = &self.remote {
            write!(f, "{remote}/")?;
        }
        write!(f, "{}/{}", self.owner, self.module)?;
        if let Some(reference) = &self.reference {
            write!(f, ":{reference}")?;
        }
        Ok(())
    }
}

/// Which part of a locator a rule rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Remote,
    Owner,
    Module,
    Reference,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Remote => "remote",
            Field::Owner => "owner",
            Field::Module => "module",
            Field::Reference => "ref",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: Field,
    pub reason: String,
}

impl ValidationError {
    fn new(field: Field, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {}: {}", self.field, self.reason)
    }
}

impl std::error::Error for ValidationError {}

/// Errors from [`resolve`]. Both variants are recoverable input errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocatorError {
    /// The text does not match `[<remote>/]<owner>/<module>[:<ref>]`.
    Syntax(String),
    /// The text parsed, but the rule set rejected a name.
    Validation(ValidationError),
}

impl fmt::Display for LocatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocatorError::Syntax(msg) => write!(f, "syntax error: {msg}"),
            LocatorError::Validation(e) => write!(f, "validation error: {e}"),
        }
    }
}

impl std::error::Error for LocatorError {}

impl From<ValidationError> for LocatorError {
    fn from(e: ValidationError) -> Self {
        LocatorError::Validation(e)
    }
}

/// Structural rules for names, supplied to the resolver.
pub trait ValidationRuleSet: Send + Sync {
    fn validate(&self, locator: &Locator) -> Result<(), ValidationError>;

    /// Rules for an owner name submitted on its own (no module).
    fn validate_owner(&self, owner: &str) -> Result<(), ValidationError>;
}

pub const MAX_OWNER_LEN: usize = 32;
pub const MIN_MODULE_LEN: usize = 2;
pub const MAX_MODULE_LEN: usize = 100;
pub const MAX_REF_LEN: usize = 250;

/// The registry's name rules.
///
/// - owner: 1..=32 chars of `[A-Za-z0-9-]`
/// - module: 2..=100 chars of `[A-Za-z0-9_-]`
/// - ref: 1..=250 chars, no whitespace or control characters
/// - remote: non-empty, no whitespace (hostnames are not checked further)
#[derive(Debug, Clone, Copy, Default)]
pub struct RegistryRules;

impl RegistryRules {
    fn check_owner(owner: &str) -> Result<(), ValidationError> {
        let len = owner.chars().count();
        if len == 0 {
            return Err(ValidationError::new(Field::Owner, "must not be empty"));
        }
        if len > MAX_OWNER_LEN {
            return Err(ValidationError::new(
                Field::Owner,
                format!("must be at most {MAX_OWNER_LEN} characters, got {len}"),
            ));
        }
        if let Some(c) = owner.chars().find(|c| !(c.is_ascii_alphanumeric() || *c == '-')) {
            return Err(ValidationError::new(
                Field::Owner,
                format!("unexpected character {c:?}"),
            ));
        }
        Ok(())
    }

    fn check_module(module: &str) -> Result<(), ValidationError> {
        let len = module.chars().count();
        if !(MIN_MODULE_LEN..=MAX_MODULE_LEN).contains(&len) {
            return Err(ValidationError::new(
                Field::Module,
                format!("must be {MIN_MODULE_LEN} to {MAX_MODULE_LEN} characters, got {len}"),
            ));
        }
        if let Some(c) = module
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
        {
            return Err(ValidationError::new(
                Field::Module,
                format!("unexpected character {c:?}"),
            ));
        }
        Ok(())
    }

    fn check_reference(reference: &str) -> Result<(), ValidationError> {
        let len = reference.chars().count();
        if len == 0 {
            return Err(ValidationError::new(Field::Reference, "must not be empty"));
        }
        if len > MAX_REF_LEN {
            return Err(ValidationError::new(
                Field::Reference,
                format!("must be at most {MAX_REF_LEN} characters, got {len}"),
            ));
        }
        if reference.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(ValidationError::new(
                Field::Reference,
                "must not contain whitespace",
            ));
        }
        Ok(())
    }

    fn check_remote(remote: &str) -> Result<(), ValidationError> {
        if remote.is_empty() {
            return Err(ValidationError::new(Field::Remote, "must not be empty"));
        }
        if remote.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(ValidationError::new(
                Field::Remote,
                "must not contain whitespace",
            ));
        }
        Ok(())
    }
}

impl ValidationRuleSet for RegistryRules {
    fn validate(&self, locator: &Locator) -> Result<(), ValidationError> {
        if let Some(remote) = &locator.remote {
            Self::check_remote(remote)?;
        }
        Self::check_owner(&locator.owner)?;
        Self::check_module(&locator.module)?;
        if let Some(reference) = &locator.reference {
            Self::check_reference(reference)?;
        }
        Ok(())
    }

    fn validate_owner(&self, owner: &str) -> Result<(), ValidationError> {
        Self::check_owner(owner)
    }
}

/// Parse `text` into a [`Locator`].
///
/// `""` is valid and yields `Ok(None)`, meaning "browse by owner only".
/// Input is taken verbatim: no trimming, no case folding.
pub fn resolve(
    text: &str,
    rules: &dyn ValidationRuleSet,
) -> Result<Option<Locator>, LocatorError> {
    if text.is_empty() {
        return Ok(None);
    }

    let colons = text.matches(':').count();
    if colons > 1 {
        return Err(LocatorError::Syntax(format!(
            "expecting {{<remote>/}}<owner>/<module>{{:<ref>}}, got multiple \":\" in {text}"
        )));
    }

    let (path, reference) = match text.split_once(':') {
        Some((path, reference)) => (path, Some(reference)),
        None => (text, None),
    };

    let segments: Vec<&str> = path.split('/').collect();
    let (remote, owner, module) = match segments.as_slice() {
        [owner, module] => (None, *owner, *module),
        [remote, owner, module] => (Some(*remote), *owner, *module),
        _ => {
            return Err(LocatorError::Syntax(format!(
                "expecting {{<remote>/}}<owner>/<module>{{:<ref>}}, got {text}"
            )));
        }
    };

    let locator = Locator {
        remote: remote.map(str::to_string),
        owner: owner.to_string(),
        module: module.to_string(),
        reference: reference.map(str::to_string),
    };
    rules.validate(&locator)?;
    Ok(Some(locator))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<Option<Locator>, LocatorError> {
        resolve(text, &RegistryRules)
    }

    #[test]
    fn test_empty_input_is_no_locator() {
        assert_eq!(parse(""), Ok(None));
    }

    #[test]
    fn test_owner_and_module() {
        let locator = parse("bufbuild/registry").unwrap().unwrap();
        assert_eq!(locator, Locator::new("bufbuild", "registry"));
    }

    #[test]
    fn test_remote_owner_and_module() {
        let locator = parse("buf.build/bufbuild/registry").unwrap().unwrap();
        assert_eq!(locator.remote.as_deref(), Some("buf.build"));
        assert_eq!(locator.owner, "bufbuild");
        assert_eq!(locator.module, "registry");
        assert_eq!(locator.reference, None);
    }

    #[test]
    fn test_reference_after_colon() {
        let locator = parse("buf.build/bufbuild/registry:569d290ee4cc4ed38499daf2c4fe39e6")
            .unwrap()
            .unwrap();
        assert_eq!(
            locator.reference.as_deref(),
            Some("569d290ee4cc4ed38499daf2c4fe39e6")
        );
    }

    #[test]
    fn test_remote_is_not_checked_as_hostname() {
        let locator = parse("bufbuild/bufbuild/registry:main").unwrap().unwrap();
        assert_eq!(locator.remote.as_deref(), Some("bufbuild"));
    }

    #[test]
    fn test_slash_counts_outside_one_or_two_are_syntax_errors() {
        for text in ["bufbuild", "a/b/c/d", "https://buf.build/bufbuild/registry:abc"] {
            assert!(
                matches!(parse(text), Err(LocatorError::Syntax(_))),
                "{text} should be a syntax error"
            );
        }
    }

    #[test]
    fn test_multiple_colons_are_syntax_errors() {
        assert!(matches!(
            parse("bufbuild/registry:a:b"),
            Err(LocatorError::Syntax(_))
        ));
    }

    #[test]
    fn test_slash_inside_reference_counts_toward_path() {
        // Only the pre-colon segment is split on '/'.
        let locator = parse("bufbuild/registry:feature/x").unwrap().unwrap();
        assert_eq!(locator.reference.as_deref(), Some("feature/x"));
    }

    #[test]
    fn test_owner_too_long_is_validation_error() {
        let text = format!("{}/abc", "a".repeat(33));
        match parse(&text) {
            Err(LocatorError::Validation(e)) => assert_eq!(e.field, Field::Owner),
            other => panic!("expected owner validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_module_too_short_is_validation_error() {
        match parse("abc/a") {
            Err(LocatorError::Validation(e)) => assert_eq!(e.field, Field::Module),
            other => panic!("expected module validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_owner_and_empty_ref_are_rejected() {
        assert!(matches!(parse("/registry"), Err(LocatorError::Validation(_))));
        match parse("bufbuild/registry:") {
            Err(LocatorError::Validation(e)) => assert_eq!(e.field, Field::Reference),
            other => panic!("expected ref validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_input_is_not_trimmed() {
        assert!(matches!(
            parse(" bufbuild/registry"),
            Err(LocatorError::Validation(_))
        ));
    }

    #[test]
    fn test_format_round_trip_without_remote() {
        let cases = [
            Locator::new("bufbuild", "registry"),
            Locator::new("acme", "petapis").with_reference("main"),
            Locator::new("a-b", "c_d").with_reference("0123abcd"),
        ];
        for locator in cases {
            assert_eq!(parse(&locator.to_string()), Ok(Some(locator.clone())));
        }
    }

    #[test]
    fn test_display_includes_remote() {
        let locator = Locator::new("bufbuild", "registry")
            .with_remote("buf.build")
            .with_reference("main");
        assert_eq!(locator.to_string(), "buf.build/bufbuild/registry:main");
    }

    #[test]
    fn test_resolve_is_idempotent() {
        for text in ["bufbuild/registry:abc123", "x", "a/b/c/d", "abc/a"] {
            assert_eq!(parse(text), parse(text));
        }
    }

    /// Rule set that rejects everything, to show verdicts pass through unchanged.
    struct RejectAll;

    impl ValidationRuleSet for RejectAll {
        fn validate(&self, _locator: &Locator) -> Result<(), ValidationError> {
            Err(ValidationError::new(Field::Module, "rejected"))
        }

        fn validate_owner(&self, _owner: &str) -> Result<(), ValidationError> {
            Err(ValidationError::new(Field::Owner, "rejected"))
        }
    }

    #[test]
    fn test_rule_set_verdict_is_surfaced_unchanged() {
        assert_eq!(
            resolve("bufbuild/registry", &RejectAll),
            Err(LocatorError::Validation(ValidationError::new(
                Field::Module,
                "rejected"
            )))
        );
    }

    #[test]
    fn test_validate_owner() {
        assert!(RegistryRules.validate_owner("bufbuild").is_ok());
        assert!(RegistryRules.validate_owner("buf build").is_err());
        assert!(RegistryRules.validate_owner("").is_err());
    }
}
