//! Commit message templates
//!
//! Templates reference PR fields with brace tokens, e.g.
//! `"Merge: {TITLE} (#{NUMBER})"`. `{{` and `}}` produce literal braces.

use crate::types::PullRequest;
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{|\}\}|\{([^{}]*)\}|[{}]").expect("token regex is valid")
});

/// Template rendering failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// Template used a token that doesn't exist
    #[error("unknown token `{{{token}}}` in commit message template `{template}`")]
    UnknownToken {
        /// The unknown token name
        token: String,
        /// The template
        template: String,
    },

    /// A lone `{` or `}`
    #[error("unbalanced brace in commit message template `{template}`")]
    UnbalancedBrace {
        /// The template
        template: String,
    },
}

/// Render a commit message template for a PR.
///
/// Supported tokens: `TITLE`, `NUMBER`, `AUTHOR_USERNAME`, `AUTHOR_NAME`.
pub fn render_commit_message(template: &str, pr: &PullRequest) -> Result<String, FormatError> {
    let mut out = String::with_capacity(template.len());
    let mut last = 0;

    for caps in TOKEN_RE.captures_iter(template) {
        let Some(whole) = caps.get(0) else { continue };
        out.push_str(&template[last..whole.start()]);
        last = whole.end();

        match whole.as_str() {
            "{{" => out.push('{'),
            "}}" => out.push('}'),
            "{" | "}" => {
                return Err(FormatError::UnbalancedBrace {
                    template: template.to_string(),
                });
            }
            _ => {
                let token = caps.get(1).map_or("", |m| m.as_str());
                match token {
                    "TITLE" => out.push_str(&pr.title),
                    "NUMBER" => out.push_str(&pr.number.to_string()),
                    "AUTHOR_USERNAME" => out.push_str(&pr.author_username),
                    "AUTHOR_NAME" => out.push_str(&pr.author_display_name),
                    other => {
                        return Err(FormatError::UnknownToken {
                            token: other.to_string(),
                            template: template.to_string(),
                        });
                    }
                }
            }
        }
    }

    out.push_str(&template[last..]);
    Ok(out)
}
