use crate::domain::model::MigrationRules;
use crate::utils::error::Result;
use regex::Regex;

/// Rewrites uses of the parameter bag to the resolved binding:
/// `params.id` -> `resolvedParams.id` and `= params;` -> `= resolvedParams;`.
///
/// Works one line at a time. Lines holding the wrapped signature or the
/// resolution statement are left alone, as are matches inside string literals.
pub struct ReferenceRewriter {
    identifier: Regex,
    resolved: String,
    wrapped_marker: String,
    resolution_marker: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lexical {
    Code,
    Single,
    Double,
    Template,
}

/// Marks every byte of `line` that sits inside a string or template literal.
/// `${...}` interpolations inside templates count as code.
fn literal_mask(line: &str) -> Vec<bool> {
    let bytes = line.as_bytes();
    let mut mask = vec![false; bytes.len()];
    // Code frames above a Template track the brace depth of an interpolation.
    let mut stack: Vec<(Lexical, usize)> = vec![(Lexical::Code, 0)];
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        let nested = stack.len() > 1;
        let Some(&(state, depth)) = stack.last() else {
            break;
        };

        match state {
            Lexical::Code => match b {
                b'\'' => stack.push((Lexical::Single, 0)),
                b'"' => stack.push((Lexical::Double, 0)),
                b'`' => stack.push((Lexical::Template, 0)),
                b'{' => set_depth(&mut stack, depth + 1),
                b'}' if nested && depth == 0 => {
                    stack.pop();
                    mask[i] = true;
                }
                b'}' => set_depth(&mut stack, depth.saturating_sub(1)),
                _ => {}
            },
            Lexical::Single | Lexical::Double | Lexical::Template => {
                mask[i] = true;
                let close = match state {
                    Lexical::Single => b'\'',
                    Lexical::Double => b'"',
                    _ => b'`',
                };
                if b == b'\\' {
                    if i + 1 < bytes.len() {
                        mask[i + 1] = true;
                    }
                    i += 2;
                    continue;
                }
                if b == close {
                    stack.pop();
                } else if state == Lexical::Template && b == b'$' && bytes.get(i + 1) == Some(&b'{')
                {
                    mask[i + 1] = true;
                    stack.push((Lexical::Code, 0));
                    i += 2;
                    continue;
                }
            }
        }
        i += 1;
    }

    mask
}

fn set_depth(stack: &mut [(Lexical, usize)], depth: usize) {
    if let Some(top) = stack.last_mut() {
        top.1 = depth;
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$'
}

impl ReferenceRewriter {
    pub fn new(rules: &MigrationRules) -> Result<Self> {
        Ok(Self {
            identifier: Regex::new(&format!(r"\b{}\b", regex::escape(&rules.param_name)))?,
            resolved: rules.resolved_name.clone(),
            wrapped_marker: rules.wrapped_marker(),
            resolution_marker: format!("{} = await {}", rules.resolved_name, rules.param_name),
        })
    }

    pub fn rewrite(&self, text: &str) -> (String, usize) {
        let mut total = 0;
        let lines: Vec<String> = text
            .split('\n')
            .map(|line| {
                let (rewritten, count) = self.rewrite_line(line);
                total += count;
                rewritten
            })
            .collect();

        (lines.join("\n"), total)
    }

    pub fn rewrite_line(&self, line: &str) -> (String, usize) {
        if line.contains(&self.wrapped_marker) || line.contains(&self.resolution_marker) {
            return (line.to_string(), 0);
        }

        let mut mask: Option<Vec<bool>> = None;
        let mut out = String::with_capacity(line.len() + 8);
        let mut last = 0;
        let mut count = 0;

        for m in self.identifier.find_iter(line) {
            if !self.is_rewritable(line, m.start(), m.end()) {
                continue;
            }
            let mask = mask.get_or_insert_with(|| literal_mask(line));
            if mask[m.start()] {
                continue;
            }

            out.push_str(&line[last..m.start()]);
            out.push_str(&self.resolved);
            last = m.end();
            count += 1;
        }

        if count == 0 {
            return (line.to_string(), 0);
        }
        out.push_str(&line[last..]);
        (out, count)
    }

    fn is_rewritable(&self, line: &str, start: usize, end: usize) -> bool {
        let before = &line[..start];
        if before.ends_with(&['.', '$'][..]) {
            return false;
        }

        let after = &line[end..];
        if let Some(field) = after.strip_prefix('.') {
            return field.chars().next().is_some_and(is_ident_start);
        }

        if after.trim_start().starts_with(';') {
            let lhs = before.trim_end();
            return lhs.ends_with('=') && !lhs[..lhs.len() - 1].ends_with(&['=', '!', '<', '>'][..]);
        }

        false
    }
}
