use crate::domain::model::MigrationRules;
use crate::utils::error::Result;
use regex::{Captures, Regex};

/// Rewrites `{ params }: { params: { ...fields } }` into
/// `{ params }: { params: Promise<{ ...fields }> }`.
///
/// The field list must not contain nested braces. An annotation that is
/// already wrapped never matches, so the rewrite is idempotent.
pub struct SignatureRewriter {
    pattern: Regex,
    param: String,
    wrapper: String,
}

impl SignatureRewriter {
    pub fn new(rules: &MigrationRules) -> Result<Self> {
        let param = regex::escape(&rules.param_name);
        let pattern = Regex::new(&format!(
            r"\{{\s*{param}\s*\}}\s*:\s*\{{\s*{param}\s*:\s*(\{{[^}}]+\}})\s*\}}"
        ))?;

        Ok(Self {
            pattern,
            param: rules.param_name.clone(),
            wrapper: rules.wrapper.clone(),
        })
    }

    /// Returns the rewritten text and the number of annotations wrapped.
    pub fn rewrite(&self, text: &str) -> (String, usize) {
        let mut count = 0;
        let rewritten = self.pattern.replace_all(text, |caps: &Captures| {
            count += 1;
            format!(
                "{{ {p} }}: {{ {p}: {w}<{fields}> }}",
                p = self.param,
                w = self.wrapper,
                fields = &caps[1]
            )
        });

        (rewritten.into_owned(), count)
    }
}
