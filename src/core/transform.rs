use crate::core::injector::ResolutionInjector;
use crate::core::references::ReferenceRewriter;
use crate::core::signature::SignatureRewriter;
use crate::domain::model::{MigrationRules, TransformOutput, TransformStats};
use crate::utils::error::Result;

/// Signature rewrite, resolution injection and reference rewrite, in that
/// order. Pure text in, text out.
pub struct Transformer {
    signatures: SignatureRewriter,
    injector: ResolutionInjector,
    references: ReferenceRewriter,
}

impl Transformer {
    pub fn new(rules: &MigrationRules) -> Result<Self> {
        Ok(Self {
            signatures: SignatureRewriter::new(rules)?,
            injector: ResolutionInjector::new(rules)?,
            references: ReferenceRewriter::new(rules)?,
        })
    }

    pub fn transform(&self, text: &str) -> TransformOutput {
        let (text, signatures_rewritten) = self.signatures.rewrite(text);
        let (text, injection) = self.injector.inject(&text);
        let (text, references_rewritten) = self.references.rewrite(&text);

        TransformOutput {
            text,
            stats: TransformStats {
                signatures_rewritten,
                resolutions_inserted: injection.inserted,
                already_resolved: injection.already_resolved,
                unanchored: injection.unanchored,
                references_rewritten,
            },
        }
    }
}
