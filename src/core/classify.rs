use crate::domain::model::MigrationRules;
use crate::utils::error::Result;
use regex::Regex;

/// Shape of a single source line as far as the insertion heuristic cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// The resolution statement this tool inserts, or any other line that
    /// binds `await params` (`const { id } = await params;`).
    Resolution,
    HandlerDeclaration,
    Blank,
    Comment,
    OpeningBrace,
    /// Call to a backing-service bootstrap such as `connectDB()`.
    Bootstrap,
    /// `try {`, `} catch (e) {`, `finally {`.
    ErrorBoundary,
    /// Line starting with a declaration, a `return` or an `if`.
    Statement,
    Other,
}

pub struct LineClassifier {
    resolution_marker: String,
    awaited_param: Regex,
    declaration: Regex,
    bootstrap: Option<Regex>,
    error_boundary: Regex,
    statement: Regex,
}

impl LineClassifier {
    pub fn new(rules: &MigrationRules) -> Result<Self> {
        let methods = rules
            .methods
            .iter()
            .map(|m| regex::escape(m))
            .collect::<Vec<_>>()
            .join("|");
        let declaration = Regex::new(&format!(
            r"^\s*export\s+(?:async\s+function|function|const|let)\s+(?P<method>{methods})\b"
        ))?;

        let bootstrap = if rules.bootstrap_calls.is_empty() {
            None
        } else {
            let calls = rules
                .bootstrap_calls
                .iter()
                .map(|c| regex::escape(c))
                .collect::<Vec<_>>()
                .join("|");
            Some(Regex::new(&format!(r"(?:^|[^\w$.])(?:{calls})\s*\("))?)
        };

        Ok(Self {
            resolution_marker: format!("{} = await {}", rules.resolved_name, rules.param_name),
            awaited_param: Regex::new(&format!(
                r"=\s*await\s+{}\s*;?$",
                regex::escape(&rules.param_name)
            ))?,
            declaration,
            bootstrap,
            error_boundary: Regex::new(r"^(?:\}\s*)?(?:try|catch|finally)\b")?,
            statement: Regex::new(r"^(?:const|let|var|return|if)\b")?,
        })
    }

    /// Returns the request method if `line` declares a route handler.
    pub fn handler_method<'l>(&self, line: &'l str) -> Option<&'l str> {
        self.declaration
            .captures(line)
            .and_then(|caps| caps.name("method"))
            .map(|m| m.as_str())
    }

    /// True for the inserted resolution statement and for hand-written
    /// bindings of the awaited bag.
    pub fn is_resolution(&self, line: &str) -> bool {
        line.contains(&self.resolution_marker) || self.awaited_param.is_match(line.trim_end())
    }

    /// Precedence follows the order of the checks below.
    pub fn classify(&self, line: &str) -> LineKind {
        let trimmed = line.trim();

        if self.is_resolution(trimmed) {
            return LineKind::Resolution;
        }
        if self.handler_method(line).is_some() {
            return LineKind::HandlerDeclaration;
        }
        if trimmed.is_empty() {
            return LineKind::Blank;
        }
        if trimmed.starts_with("//") || trimmed.starts_with("/*") || trimmed.starts_with('*') {
            return LineKind::Comment;
        }
        if trimmed == "{" {
            return LineKind::OpeningBrace;
        }
        if self
            .bootstrap
            .as_ref()
            .is_some_and(|re| re.is_match(trimmed))
        {
            return LineKind::Bootstrap;
        }
        if self.error_boundary.is_match(trimmed) {
            return LineKind::ErrorBoundary;
        }
        if self.statement.is_match(trimmed) {
            return LineKind::Statement;
        }
        LineKind::Other
    }
}

/// Leading whitespace of `line`, copied verbatim.
pub fn indentation(line: &str) -> &str {
    let trimmed = line.trim_start_matches(|c: char| c == ' ' || c == '\t');
    &line[..line.len() - trimmed.len()]
}
