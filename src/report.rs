//! Plain-text report for `--print` mode.

use std::fmt::Write;

use crate::diagnostics::{Marker, MARKER_SOURCE};
use crate::session::{AnalysisSession, AssistState};

/// Tokens, rendered tree and diagnostic of `session`, one section each.
pub fn format_report(session: &AnalysisSession, assist: &AssistState) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "dialect: {}", session.dialect());

    let tokens = session.tokens();
    let _ = writeln!(out, "tokens ({}):", tokens.len());
    for token in tokens {
        let _ = writeln!(
            out,
            "  {}:{}  {}: {}",
            token.line, token.column, token.token_type, token.value
        );
    }

    let _ = writeln!(out, "tree:");
    match session.ast() {
        Some(ast) => {
            for line in crate::render::render_with_assist(ast, assist).to_treeviz().lines() {
                let _ = writeln!(out, "  {line}");
            }
        }
        None => {
            let _ = writeln!(out, "  (none)");
        }
    }

    match session.current_error() {
        Some(error) => {
            let marker = Marker::for_error(&error);
            let _ = writeln!(
                out,
                "diagnostic [{MARKER_SOURCE}]: {}:{}-{}:{} {}",
                marker.start_line,
                marker.start_column,
                marker.end_line,
                marker.end_column,
                marker.message
            );
        }
        None => {
            let _ = writeln!(out, "diagnostic: none");
        }
    }
    out
}
