use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::heuristics::scanner::{matching_close, skip_whitespace, statement_end};
use crate::known::{self, CASE_LITERAL_LABEL, DEFAULT_LABEL, Discriminator, STRING_LITERAL};

/// Snippet bound; the adapter trims handler sources, this is the local
/// backstop.
pub const MAX_SNIPPET_BYTES: usize = 16 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionKind {
    IfWithoutElse,
    SwitchWithoutDefault,
}

/// One flagged structurally-incomplete conditional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub handler: String,
    pub kind: DetectionKind,
    pub discriminator: Discriminator,
    /// Byte offset of the flagged keyword within the (bounded) snippet.
    pub offset: usize,
    /// Condition text, trimmed for display.
    pub excerpt: String,
}

/// Scan one handler's source for incomplete selector filtering.
pub fn scan_handler(handler: &str, source: &str) -> Vec<Detection> {
    let bytes = &source.as_bytes()[..source.len().min(MAX_SNIPPET_BYTES)];

    let mut detections = scan_if_statements(handler, bytes);
    detections.extend(scan_switch_statements(handler, bytes));
    detections
}

/// `if (` whose condition tests a selector against a string literal,
/// with no `else` after the statement.
///
/// The literal requirement matters: a selector mention alone is not
/// "filtering"; comparison against a literal is.
fn scan_if_statements(handler: &str, bytes: &[u8]) -> Vec<Detection> {
    let mut detections = Vec::new();
    let mut from = 0;

    while let Some(pos) = find_keyword(bytes, b"if", from) {
        let open = skip_whitespace(bytes, pos + 2);
        if bytes.get(open) != Some(&b'(') {
            from = pos + 2;
            continue;
        }
        let Some(close) = matching_close(bytes, open) else {
            // Unbalanced condition: truncated snippet, stop looking.
            trace!(handler, pos, "unbalanced if-condition, aborting scan");
            break;
        };

        let condition = String::from_utf8_lossy(&bytes[open + 1..close]);
        if let Some(discriminator) = known::discriminator_in(&condition) {
            if STRING_LITERAL.is_match(&condition) {
                let Some(end) = statement_end(bytes, close + 1) else {
                    break;
                };
                let after = skip_whitespace(bytes, end + 1);
                if !keyword_at(bytes, after, b"else") {
                    detections.push(Detection {
                        handler: handler.to_string(),
                        kind: DetectionKind::IfWithoutElse,
                        discriminator,
                        offset: pos,
                        excerpt: excerpt_of(&condition),
                    });
                }
            }
        }
        from = close + 1;
    }
    detections
}

/// `switch (` on a selector whose block has string-literal case labels
/// and no `default:`.
fn scan_switch_statements(handler: &str, bytes: &[u8]) -> Vec<Detection> {
    let mut detections = Vec::new();
    let mut from = 0;

    while let Some(pos) = find_keyword(bytes, b"switch", from) {
        let open = skip_whitespace(bytes, pos + 6);
        if bytes.get(open) != Some(&b'(') {
            from = pos + 6;
            continue;
        }
        let Some(close) = matching_close(bytes, open) else {
            trace!(handler, pos, "unbalanced switch-condition, aborting scan");
            break;
        };

        let condition = String::from_utf8_lossy(&bytes[open + 1..close]);
        let Some(discriminator) = known::discriminator_in(&condition) else {
            from = close + 1;
            continue;
        };

        let brace = skip_whitespace(bytes, close + 1);
        if bytes.get(brace) != Some(&b'{') {
            from = close + 1;
            continue;
        }
        let Some(block_end) = matching_close(bytes, brace) else {
            trace!(handler, pos, "unbalanced switch-block, aborting scan");
            break;
        };

        let block = String::from_utf8_lossy(&bytes[brace + 1..block_end]);
        if CASE_LITERAL_LABEL.is_match(&block) && !DEFAULT_LABEL.is_match(&block) {
            detections.push(Detection {
                handler: handler.to_string(),
                kind: DetectionKind::SwitchWithoutDefault,
                discriminator,
                offset: pos,
                excerpt: excerpt_of(&condition),
            });
        }
        from = block_end + 1;
    }
    detections
}

/// Next occurrence of `keyword` at or after `from`, with identifier
/// boundaries on both sides.
fn find_keyword(bytes: &[u8], keyword: &[u8], from: usize) -> Option<usize> {
    let mut i = from;
    while i + keyword.len() <= bytes.len() {
        if &bytes[i..i + keyword.len()] == keyword
            && (i == 0 || !is_ident_byte(bytes[i - 1]))
            && bytes
                .get(i + keyword.len())
                .is_none_or(|&b| !is_ident_byte(b))
        {
            return Some(i);
        }
        i += 1;
    }
    None
}

fn keyword_at(bytes: &[u8], at: usize, keyword: &[u8]) -> bool {
    at + keyword.len() <= bytes.len()
        && &bytes[at..at + keyword.len()] == keyword
        && (at == 0 || !is_ident_byte(bytes[at - 1]))
        && bytes
            .get(at + keyword.len())
            .is_none_or(|&b| !is_ident_byte(b))
}

fn is_ident_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'$'
}

fn excerpt_of(condition: &str) -> String {
    let trimmed = condition.trim();
    if trimmed.len() <= 120 {
        trimmed.to_string()
    } else {
        let mut cut = 120;
        while !trimmed.is_char_boundary(cut) {
            cut -= 1;
        }
        format!("{}…", &trimmed[..cut])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn if_on_payment_method_without_else_is_flagged() {
        let detections = scan_handler(
            "onSubmit",
            r#"if (paymentMethod.type === "applepay") { x(); }"#,
        );

        assert_eq!(detections.len(), 1);
        assert_eq!(detections[0].kind, DetectionKind::IfWithoutElse);
        assert_eq!(detections[0].discriminator, Discriminator::PaymentMethod);
        assert_eq!(detections[0].handler, "onSubmit");
    }

    #[test]
    fn trailing_else_suppresses_the_flag() {
        let detections = scan_handler(
            "onSubmit",
            r#"if (paymentMethod.type === "applepay") { x(); } else { y(); }"#,
        );
        assert!(detections.is_empty());
    }

    #[test]
    fn else_if_chains_follow_the_final_branch() {
        let flagged = scan_handler(
            "onSubmit",
            r#"if (paymentMethod.type === 'card') { a(); } else if (paymentMethod.type === 'ideal') { b(); }"#,
        );
        // The first if has an else; the second does not.
        assert_eq!(flagged.len(), 1);

        let complete = scan_handler(
            "onSubmit",
            r#"if (paymentMethod.type === 'card') { a(); } else { b(); }"#,
        );
        assert!(complete.is_empty());
    }

    #[test]
    fn selector_without_literal_is_not_filtering() {
        let detections = scan_handler(
            "onSubmit",
            "if (paymentMethod.type) { record(paymentMethod.type); }",
        );
        assert!(detections.is_empty());
    }

    #[test]
    fn literal_without_selector_is_ignored() {
        let detections =
            scan_handler("onSubmit", r#"if (mode === "fast") { x(); }"#);
        assert!(detections.is_empty());
    }

    #[test]
    fn braceless_if_body_is_handled() {
        let detections = scan_handler(
            "onPaymentCompleted",
            "if (result.resultCode === 'Authorised') done();\nnext();",
        );
        assert_eq!(detections.len(), 1);
        assert_eq!(detections[0].discriminator, Discriminator::Outcome);
    }

    #[test]
    fn switch_on_result_code_without_default_is_flagged() {
        let source = r#"
            switch (result.resultCode) {
                case "Authorised": success(); break;
                case "Refused": refuse(); break;
            }
        "#;
        let detections = scan_handler("onPaymentCompleted", source);

        assert_eq!(detections.len(), 1);
        assert_eq!(detections[0].kind, DetectionKind::SwitchWithoutDefault);
        assert_eq!(detections[0].discriminator, Discriminator::Outcome);
    }

    #[test]
    fn switch_with_default_is_not_flagged() {
        let source = r#"
            switch (result.resultCode) {
                case "Authorised": success(); break;
                default: handle(result);
            }
        "#;
        assert!(scan_handler("onPaymentCompleted", source).is_empty());
    }

    #[test]
    fn switch_without_literal_cases_is_not_flagged() {
        let source = "switch (result.resultCode) { case CODES.OK: success(); }";
        assert!(scan_handler("onPaymentCompleted", source).is_empty());
    }

    #[test]
    fn switch_on_unrelated_variable_is_ignored() {
        let source = r#"switch (mode) { case "fast": x(); }"#;
        assert!(scan_handler("h", source).is_empty());
    }

    #[test]
    fn unbalanced_parenthesis_aborts_without_findings() {
        let detections = scan_handler(
            "onSubmit",
            r#"if (paymentMethod.type === "applepay" { x(); }"#,
        );
        assert!(detections.is_empty());
    }

    #[test]
    fn unbalanced_switch_block_aborts_without_findings() {
        let detections = scan_handler(
            "onPaymentCompleted",
            r#"switch (result.resultCode) { case "Authorised": x();"#,
        );
        assert!(detections.is_empty());
    }

    #[test]
    fn identifier_boundaries_are_respected() {
        // `gift` contains `if`; `switcher(` must not match `switch (`.
        let source = r#"gift(paymentMethod.type === "x"); switcher(resultCode);"#;
        assert!(scan_handler("h", source).is_empty());
    }

    #[test]
    fn oversized_snippets_are_truncated_not_errored() {
        let mut source = String::from("var pad = 1;\n".repeat(MAX_SNIPPET_BYTES / 13 + 1));
        source.push_str(r#"if (paymentMethod.type === "applepay") { x(); }"#);
        // The interesting part fell outside the bound: silently missed.
        assert!(scan_handler("onSubmit", &source).is_empty());
    }

    #[test]
    fn multiple_handlers_accumulate_independent_offsets() {
        let source = r#"
            if (paymentMethod.type === "card") { a(); }
            if (paymentMethod.type === "ideal") { b(); }
        "#;
        let detections = scan_handler("onSubmit", source);
        assert_eq!(detections.len(), 2);
        assert!(detections[0].offset < detections[1].offset);
    }
}
