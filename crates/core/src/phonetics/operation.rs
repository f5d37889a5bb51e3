//! The conversion-operation abstraction: one rewrite step of the pipeline.

use std::sync::Arc;

use fancy_regex::Regex;

use crate::error::{QuranError, Result};
use crate::moshaf::MoshafAttributes;

/// How much of the chain an operation runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Only the operation's own rewrite.
    Inference,
    /// The listed prerequisites first, then the operation itself.
    Test,
}

/// One rewrite step over Uthmani text.
///
/// Operations are stateless once built: `forward` is a pure function of the
/// text and the moshaf.
pub trait ConversionOperation: Send + Sync {
    /// Stable identifier, used for logging and catalog lookup.
    fn name(&self) -> &'static str;

    /// Operations whose output this one assumes, in pipeline order.
    fn prerequisites(&self) -> &[Arc<dyn ConversionOperation>];

    /// The operation's own rewrite.
    fn forward(&self, text: &str, moshaf: &MoshafAttributes) -> Result<String>;

    fn apply(&self, text: &str, moshaf: &MoshafAttributes, mode: Mode) -> Result<String> {
        if mode == Mode::Inference {
            return self.forward(text, moshaf);
        }
        let mut text = text.to_string();
        for op in self.prerequisites() {
            text = op.forward(&text, moshaf)?;
        }
        self.forward(&text, moshaf)
    }
}

/// A compiled `(pattern, replacement)` pair. Replacements use `${n}` group
/// references.
#[derive(Debug)]
pub struct RegexRule {
    regex: Regex,
    replacement: String,
}

impl RegexRule {
    pub fn new(operation: &'static str, pattern: &str, replacement: &str) -> Result<Self> {
        let regex = Regex::new(pattern).map_err(|e| QuranError::InvalidRule {
            operation,
            pattern: pattern.to_string(),
            source: Box::new(e),
        })?;
        Ok(Self {
            regex,
            replacement: replacement.to_string(),
        })
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    pub fn apply(&self, text: &str) -> Result<String> {
        Ok(self
            .regex
            .try_replacen(text, 0, self.replacement.as_str())?
            .into_owned())
    }
}

/// An operation made only of sequential regex substitutions.
pub struct RegexOperation {
    name: &'static str,
    rules: Vec<RegexRule>,
    prerequisites: Vec<Arc<dyn ConversionOperation>>,
}

impl RegexOperation {
    pub fn new(
        name: &'static str,
        pairs: &[(String, String)],
        prerequisites: Vec<Arc<dyn ConversionOperation>>,
    ) -> Result<Self> {
        let rules = pairs
            .iter()
            .map(|(pattern, replacement)| RegexRule::new(name, pattern, replacement))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            name,
            rules,
            prerequisites,
        })
    }
}

impl ConversionOperation for RegexOperation {
    fn name(&self) -> &'static str {
        self.name
    }

    fn prerequisites(&self) -> &[Arc<dyn ConversionOperation>] {
        &self.prerequisites
    }

    fn forward(&self, text: &str, _moshaf: &MoshafAttributes) -> Result<String> {
        let mut out = text.to_string();
        for rule in &self.rules {
            out = rule.apply(&out)?;
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(p: &str, r: &str) -> (String, String) {
        (p.to_string(), r.to_string())
    }

    #[test]
    fn test_rules_apply_sequentially() {
        let op = RegexOperation::new(
            "Chain",
            &[pair("a", "b"), pair("b(?=c)", "${0}x")],
            vec![],
        )
        .unwrap();
        let out = op.forward("ac", &MoshafAttributes::default()).unwrap();
        assert_eq!(out, "bxc");
    }

    #[test]
    fn test_invalid_pattern_fails_at_construction() {
        let err = RegexOperation::new("Broken", &[pair("(a", "")], vec![]).err().unwrap();
        assert!(matches!(err, QuranError::InvalidRule { operation: "Broken", .. }));
    }

    #[test]
    fn test_mode_test_runs_prerequisites() {
        let first: Arc<dyn ConversionOperation> =
            Arc::new(RegexOperation::new("First", &[pair("x", "y")], vec![]).unwrap());
        let second =
            RegexOperation::new("Second", &[pair("y", "z")], vec![first]).unwrap();
        let moshaf = MoshafAttributes::default();
        assert_eq!(second.apply("x", &moshaf, Mode::Inference).unwrap(), "x");
        assert_eq!(second.apply("x", &moshaf, Mode::Test).unwrap(), "z");
    }
}
