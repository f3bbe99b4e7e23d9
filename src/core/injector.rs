use crate::core::classify::{indentation, LineClassifier, LineKind};
use crate::domain::model::{HandlerDeclaration, InsertionPoint, MigrationRules, Placement};
use crate::utils::error::Result;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanAction {
    /// The body already binds the resolved value.
    Resolved,
    /// The window ran into the next handler.
    End,
    Anchor(Placement),
}

/// Line kinds the body scan reacts to. Anchor precedence is the order of the
/// `Anchor` entries: a bootstrap call anywhere in the window beats a
/// declaration, `return` or `if`. Unlisted kinds are passed over.
const SCAN_RULES: &[(LineKind, ScanAction)] = &[
    (LineKind::Resolution, ScanAction::Resolved),
    (LineKind::HandlerDeclaration, ScanAction::End),
    (LineKind::Bootstrap, ScanAction::Anchor(Placement::After)),
    (LineKind::Statement, ScanAction::Anchor(Placement::Before)),
];

fn rule_for(kind: LineKind) -> Option<(usize, ScanAction)> {
    SCAN_RULES
        .iter()
        .position(|(k, _)| *k == kind)
        .map(|rank| (rank, SCAN_RULES[rank].1))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    Anchor(InsertionPoint),
    AlreadyResolved,
    NoAnchor,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InjectionStats {
    pub inserted: usize,
    pub already_resolved: usize,
    /// 1-based declaration lines left untouched for lack of an anchor.
    pub unanchored: Vec<usize>,
}

pub struct ResolutionInjector {
    classifier: LineClassifier,
    statement: String,
    wrapped_marker: String,
    signature_lookahead: usize,
    scan_window: usize,
}

impl ResolutionInjector {
    pub fn new(rules: &MigrationRules) -> Result<Self> {
        Ok(Self {
            classifier: LineClassifier::new(rules)?,
            statement: rules.resolution_statement(),
            wrapped_marker: rules.wrapped_marker(),
            signature_lookahead: rules.signature_lookahead,
            scan_window: rules.scan_window,
        })
    }

    pub fn declarations(&self, lines: &[&str]) -> Vec<HandlerDeclaration> {
        lines
            .iter()
            .enumerate()
            .filter_map(|(i, line)| {
                let method = self.classifier.handler_method(line)?;
                let end = (i + self.signature_lookahead).min(lines.len());
                let deferred = lines[i..end]
                    .iter()
                    .any(|l| l.contains(&self.wrapped_marker));

                Some(HandlerDeclaration {
                    line: i,
                    method: method.to_string(),
                    deferred,
                })
            })
            .collect()
    }

    /// Scans the lines following `decl` (bounded by the scan window) for the
    /// best insertion anchor.
    pub fn locate(&self, lines: &[&str], decl: usize) -> ScanOutcome {
        let end = (decl + self.scan_window).min(lines.len());
        let mut best: Option<(usize, InsertionPoint)> = None;

        for (j, line) in lines.iter().enumerate().take(end).skip(decl + 1) {
            let Some((rank, action)) = rule_for(self.classifier.classify(line)) else {
                continue;
            };

            match action {
                ScanAction::Resolved => return ScanOutcome::AlreadyResolved,
                ScanAction::End => break,
                ScanAction::Anchor(placement) => {
                    if best.as_ref().is_some_and(|(r, _)| *r <= rank) {
                        continue;
                    }
                    best = Some((
                        rank,
                        InsertionPoint {
                            line: j,
                            placement,
                            indent: indentation(line).to_string(),
                        },
                    ));
                    if placement == Placement::After && self.resolved_after(lines, j) {
                        return ScanOutcome::AlreadyResolved;
                    }
                }
            }
        }

        match best {
            Some((_, point)) => ScanOutcome::Anchor(point),
            None => ScanOutcome::NoAnchor,
        }
    }

    /// True when the first non-blank line after `line` is the resolution
    /// statement, which may sit just past the scan window.
    fn resolved_after(&self, lines: &[&str], line: usize) -> bool {
        lines
            .iter()
            .skip(line + 1)
            .find(|l| !l.trim().is_empty())
            .is_some_and(|l| self.classifier.is_resolution(l))
    }

    fn statement_for(&self, point: &InsertionPoint, anchor: &str) -> String {
        let eol = if anchor.ends_with('\r') { "\r" } else { "" };
        format!("{}{}{}", point.indent, self.statement, eol)
    }

    pub fn inject(&self, text: &str) -> (String, InjectionStats) {
        let lines: Vec<&str> = text.split('\n').collect();
        let mut stats = InjectionStats::default();
        let mut points: HashMap<usize, InsertionPoint> = HashMap::new();

        for decl in self.declarations(&lines).into_iter().filter(|d| d.deferred) {
            match self.locate(&lines, decl.line) {
                ScanOutcome::Anchor(point) => {
                    tracing::debug!(
                        "{} handler at line {}: inserting resolution {:?} line {}",
                        decl.method,
                        decl.line + 1,
                        point.placement,
                        point.line + 1
                    );
                    points.insert(point.line, point);
                    stats.inserted += 1;
                }
                ScanOutcome::AlreadyResolved => {
                    tracing::debug!(
                        "{} handler at line {} already resolves its params",
                        decl.method,
                        decl.line + 1
                    );
                    stats.already_resolved += 1;
                }
                ScanOutcome::NoAnchor => {
                    tracing::warn!(
                        "{} handler at line {}: no insertion point within {} lines, left unchanged",
                        decl.method,
                        decl.line + 1,
                        self.scan_window
                    );
                    stats.unanchored.push(decl.line + 1);
                }
            }
        }

        if points.is_empty() {
            return (text.to_string(), stats);
        }

        let mut out: Vec<String> = Vec::with_capacity(lines.len() + points.len());
        for (idx, line) in lines.iter().enumerate() {
            match points.get(&idx) {
                Some(point) if point.placement == Placement::Before => {
                    out.push(self.statement_for(point, line));
                    out.push(line.to_string());
                }
                Some(point) => {
                    out.push(line.to_string());
                    out.push(self.statement_for(point, line));
                }
                None => out.push(line.to_string()),
            }
        }

        (out.join("\n"), stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WRAPPED: &str =
        "export async function GET(request: Request, { params }: { params: Promise<{ id: string }> }) {";

    fn injector() -> ResolutionInjector {
        ResolutionInjector::new(&MigrationRules::default()).unwrap()
    }

    fn source(body: &[&str]) -> String {
        let mut lines = vec![WRAPPED];
        lines.extend_from_slice(body);
        lines.join("\n")
    }

    #[test]
    fn test_inserts_after_bootstrap_call() {
        let input = source(&[
            "  try {",
            "    await connectDB();",
            "    const data = await Model.find();",
            "  } catch (e) {}",
            "}",
        ]);
        let (output, stats) = injector().inject(&input);

        let expected = source(&[
            "  try {",
            "    await connectDB();",
            "    const resolvedParams = await params;",
            "    const data = await Model.find();",
            "  } catch (e) {}",
            "}",
        ]);
        assert_eq!(output, expected);
        assert_eq!(stats.inserted, 1);
    }

    #[test]
    fn test_inserts_before_first_statement() {
        let input = source(&[
            "  // fetch the record",
            "",
            "  const item = await db.item.findUnique({ where: { id: params.id } });",
            "  return Response.json(item);",
            "}",
        ]);
        let (output, _) = injector().inject(&input);

        let expected = source(&[
            "  // fetch the record",
            "",
            "  const resolvedParams = await params;",
            "  const item = await db.item.findUnique({ where: { id: params.id } });",
            "  return Response.json(item);",
            "}",
        ]);
        assert_eq!(output, expected);
    }

    #[test]
    fn test_bootstrap_beats_earlier_statement() {
        let input = source(&[
            "  const session = await auth();",
            "  await connectDB();",
            "  return Response.json({});",
            "}",
        ]);
        let lines: Vec<&str> = input.split('\n').collect();

        match injector().locate(&lines, 0) {
            ScanOutcome::Anchor(point) => {
                assert_eq!(point.line, 2);
                assert_eq!(point.placement, Placement::After);
                assert_eq!(point.indent, "  ");
            }
            other => panic!("expected an anchor, got {:?}", other),
        }
    }

    #[test]
    fn test_multiline_signature_is_passed_over() {
        let input = [
            "export async function DELETE(",
            "  request: NextRequest,",
            "  { params }: { params: Promise<{ id: string }> }",
            ") {",
            "  if (!request) {",
            "    return null;",
            "  }",
            "}",
        ]
        .join("\n");
        let (output, stats) = injector().inject(&input);

        assert_eq!(stats.inserted, 1);
        let lines: Vec<&str> = output.split('\n').collect();
        assert_eq!(lines[4], "  const resolvedParams = await params;");
        assert_eq!(lines[5], "  if (!request) {");
    }

    #[test]
    fn test_no_anchor_within_window_is_left_alone() {
        let mut body = vec!["  try {"];
        body.extend(std::iter::repeat("    await Model.touch();").take(12));
        body.push("    return Response.json({});");
        body.push("  } catch (e) {}");
        body.push("}");
        let input = source(&body);

        let (output, stats) = injector().inject(&input);

        assert_eq!(output, input);
        assert_eq!(stats.inserted, 0);
        assert_eq!(stats.unanchored, vec![1]);
    }

    #[test]
    fn test_signature_lookahead_covers_three_lines_after_declaration() {
        let handler = |padding: usize| {
            let mut lines = vec!["export async function GET("];
            lines.extend(std::iter::repeat("  request: Request,").take(padding));
            lines.push("  { params }: { params: Promise<{ id: string }> }");
            lines.push(") {");
            lines.push("  return Response.json(params.id);");
            lines.push("}");
            lines.join("\n")
        };

        for padding in 0..=2 {
            let input = handler(padding);
            let lines: Vec<&str> = input.split('\n').collect();
            assert!(injector().declarations(&lines)[0].deferred);
            assert_eq!(injector().inject(&input).1.inserted, 1);
        }

        // Marker on decl+4 falls outside the lookahead.
        let input = handler(3);
        let lines: Vec<&str> = input.split('\n').collect();
        assert!(!injector().declarations(&lines)[0].deferred);
        let (output, stats) = injector().inject(&input);
        assert_eq!(output, input);
        assert_eq!(stats, InjectionStats::default());
    }

    #[test]
    fn test_scan_window_reaches_ninth_body_line() {
        let handler = |filler: usize, anchor: &'static str| {
            let mut body: Vec<&str> = std::iter::repeat("  await step();").take(filler).collect();
            body.push(anchor);
            body.push("}");
            source(&body)
        };

        for anchor in ["  return Response.json({});", "  await connectDB();"] {
            // Anchor on decl+9.
            let (_, stats) = injector().inject(&handler(8, anchor));
            assert_eq!(stats.inserted, 1, "{anchor}");

            // Anchor on decl+10.
            let input = handler(9, anchor);
            let (output, stats) = injector().inject(&input);
            assert_eq!(output, input, "{anchor}");
            assert_eq!(stats.inserted, 0);
            assert_eq!(stats.unanchored, vec![1]);
        }
    }

    #[test]
    fn test_hand_resolved_handler_is_left_alone() {
        let inputs = [
            source(&["  const { id } = await params;", "  return Response.json(id);", "}"]),
            source(&[
                "  await connectDB();",
                "  const { id } = await params;",
                "  return Response.json(id);",
                "}",
            ]),
        ];

        for input in inputs {
            let (output, stats) = injector().inject(&input);
            assert_eq!(output, input);
            assert_eq!(stats.inserted, 0);
            assert_eq!(stats.already_resolved, 1);
        }
    }

    #[test]
    fn test_unwrapped_handlers_are_skipped() {
        let input = [
            "export async function GET(request: Request) {",
            "  await connectDB();",
            "  return Response.json([]);",
            "}",
        ]
        .join("\n");
        let (output, stats) = injector().inject(&input);

        assert_eq!(output, input);
        assert_eq!(stats, InjectionStats::default());
    }

    #[test]
    fn test_existing_resolution_is_not_duplicated() {
        let after_bootstrap = source(&[
            "  await connectDB();",
            "  const resolvedParams = await params;",
            "  return Response.json(resolvedParams.id);",
            "}",
        ]);
        let before_statement = source(&[
            "  const resolvedParams = await params;",
            "  const id = resolvedParams.id;",
            "}",
        ]);

        for input in [after_bootstrap, before_statement] {
            let (output, stats) = injector().inject(&input);
            assert_eq!(output, input);
            assert_eq!(stats.already_resolved, 1);
        }
    }

    #[test]
    fn test_scan_stops_at_next_handler() {
        let input = [
            WRAPPED,
            "}",
            "",
            "export async function POST(request: Request, { params }: { params: Promise<{ id: string }> }) {",
            "  await connectDB();",
            "}",
        ]
        .join("\n");
        let (output, stats) = injector().inject(&input);

        assert_eq!(stats.inserted, 1);
        assert_eq!(stats.unanchored, vec![1]);
        assert_eq!(output.matches("const resolvedParams = await params;").count(), 1);
        assert!(output.contains("  await connectDB();\n  const resolvedParams = await params;\n}"));
    }

    #[test]
    fn test_crlf_line_endings_are_preserved() {
        let input = source(&["  await connectDB();", "}"]).replace('\n', "\r\n");
        let (output, _) = injector().inject(&input);

        assert!(output.contains("  await connectDB();\r\n  const resolvedParams = await params;\r\n}"));
    }
}
