//! Processing policy for the source normalizer.
//!
//! A [`ProcessingPolicy`] is four independent axes. Every combination is
//! valid; the axes never interact beyond the lexical context they govern.
//!
//! | Axis | Governs |
//! |------|---------|
//! | [`WhitespacePolicy`] | whitespace runs outside strings and comments |
//! | [`ContentPolicy`] | ordinary code characters outside strings and comments |
//! | [`StringPolicy`] | the interior of quoted literals |
//! | [`CommentPolicy`] | line and block comments |
//!
//! # Examples
//!
//! ```rust
//! use canonical::{CommentPolicy, ProcessingPolicy, StringPolicy, WhitespacePolicy};
//!
//! let policy = ProcessingPolicy::minify()
//!     .with_strings(StringPolicy::DropContent)
//!     .with_comments(CommentPolicy::Remove);
//! assert_eq!(policy.whitespace, WhitespacePolicy::Collapse);
//! ```
//!
//! Each axis also parses from its kebab-case name, which is what the YAML
//! configuration and the command line use:
//!
//! ```rust
//! use canonical::ContentPolicy;
//!
//! let content: ContentPolicy = "obscure-collapse".parse().unwrap();
//! assert_eq!(content, ContentPolicy::ObscureCollapse);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PolicyError;

/// Treatment of whitespace runs outside literals and comments.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum WhitespacePolicy {
    /// Whitespace is ordinary content.
    #[default]
    Keep,
    /// A run between two identifier characters becomes one space; any other
    /// run is dropped.
    Collapse,
}

/// Treatment of ordinary code characters.
///
/// "Identifier" characters are letters, digits and `_`; "content" means any
/// non-whitespace character.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum ContentPolicy {
    #[default]
    Keep,
    /// Replace every identifier character with `_`.
    ObscureIdentifiers,
    /// Replace every non-whitespace character with `_`.
    Obscure,
    /// One `_` per maximal run of identifier characters.
    ObscureCollapseIdentifiers,
    /// One `_` per maximal run of non-whitespace characters.
    ObscureCollapse,
    /// Drop identifier characters.
    DropIdentifiers,
    /// Drop every non-whitespace character.
    DropAll,
}

/// Treatment of quoted literal interiors. Quotes themselves always survive.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum StringPolicy {
    #[default]
    Keep,
    /// Drop the interior of double-quoted and raw literals. Character
    /// literals keep their interior.
    DropContent,
}

/// Treatment of `//` and `/* */` comments.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum CommentPolicy {
    #[default]
    Keep,
    /// Keep the delimiters, drop the body.
    DropContent,
    /// Drop delimiters and body. A line comment also swallows its newline.
    Remove,
}

macro_rules! policy_names {
    ($ty:ident, $axis:literal, { $($variant:ident => $name:literal),+ $(,)? }) => {
        impl $ty {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$ty] = &[$($ty::$variant),+];

            /// Kebab-case name used by configuration files and the CLI.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $($ty::$variant => $name),+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = PolicyError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim();
                $ty::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(wanted))
                    .ok_or_else(|| PolicyError::UnknownVariant {
                        axis: $axis,
                        value: wanted.to_string(),
                        expected: concat!($($name, " "),+),
                    })
            }
        }
    };
}

policy_names!(WhitespacePolicy, "whitespace", {
    Keep => "keep",
    Collapse => "collapse",
});

policy_names!(ContentPolicy, "content", {
    Keep => "keep",
    ObscureIdentifiers => "obscure-identifiers",
    Obscure => "obscure",
    ObscureCollapseIdentifiers => "obscure-collapse-identifiers",
    ObscureCollapse => "obscure-collapse",
    DropIdentifiers => "drop-identifiers",
    DropAll => "drop-all",
});

policy_names!(StringPolicy, "string", {
    Keep => "keep",
    DropContent => "drop-content",
});

policy_names!(CommentPolicy, "comment", {
    Keep => "keep",
    DropContent => "drop-content",
    Remove => "remove",
});

/// Immutable normalization policy.
///
/// The default keeps everything, so [`normalize`](crate::normalize) only
/// composes Unicode and unifies line endings.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(default)]
pub struct ProcessingPolicy {
    pub whitespace: WhitespacePolicy,
    pub content: ContentPolicy,
    pub strings: StringPolicy,
    pub comments: CommentPolicy,
}

impl ProcessingPolicy {
    pub const fn new(
        whitespace: WhitespacePolicy,
        content: ContentPolicy,
        strings: StringPolicy,
        comments: CommentPolicy,
    ) -> Self {
        Self {
            whitespace,
            content,
            strings,
            comments,
        }
    }

    /// Collapse whitespace, keep everything else.
    pub const fn minify() -> Self {
        Self::new(
            WhitespacePolicy::Collapse,
            ContentPolicy::Keep,
            StringPolicy::Keep,
            CommentPolicy::Keep,
        )
    }

    /// Aggressive preset: only the shape of the code survives.
    pub const fn strict() -> Self {
        Self::new(
            WhitespacePolicy::Collapse,
            ContentPolicy::ObscureCollapse,
            StringPolicy::DropContent,
            CommentPolicy::Remove,
        )
    }

    pub fn with_whitespace(mut self, whitespace: WhitespacePolicy) -> Self {
        self.whitespace = whitespace;
        self
    }

    pub fn with_content(mut self, content: ContentPolicy) -> Self {
        self.content = content;
        self
    }

    pub fn with_strings(mut self, strings: StringPolicy) -> Self {
        self.strings = strings;
        self
    }

    pub fn with_comments(mut self, comments: CommentPolicy) -> Self {
        self.comments = comments;
        self
    }
}

impl fmt::Display for ProcessingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "whitespace={} content={} strings={} comments={}",
            self.whitespace, self.content, self.strings, self.comments
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_keeps_everything() {
        let policy = ProcessingPolicy::default();
        assert_eq!(policy.whitespace, WhitespacePolicy::Keep);
        assert_eq!(policy.content, ContentPolicy::Keep);
        assert_eq!(policy.strings, StringPolicy::Keep);
        assert_eq!(policy.comments, CommentPolicy::Keep);
    }

    #[test]
    fn builder_chain() {
        let policy = ProcessingPolicy::default()
            .with_whitespace(WhitespacePolicy::Collapse)
            .with_content(ContentPolicy::DropAll)
            .with_strings(StringPolicy::DropContent)
            .with_comments(CommentPolicy::Remove);
        assert_eq!(
            policy,
            ProcessingPolicy::new(
                WhitespacePolicy::Collapse,
                ContentPolicy::DropAll,
                StringPolicy::DropContent,
                CommentPolicy::Remove,
            )
        );
    }

    #[test]
    fn names_parse_back() {
        for v in ContentPolicy::ALL {
            assert_eq!(v.as_str().parse::<ContentPolicy>(), Ok(*v));
        }
        for v in CommentPolicy::ALL {
            assert_eq!(v.to_string().parse::<CommentPolicy>(), Ok(*v));
        }
        assert_eq!("COLLAPSE".parse(), Ok(WhitespacePolicy::Collapse));
        assert_eq!(" drop-content ".parse(), Ok(StringPolicy::DropContent));
    }

    #[test]
    fn unknown_name_rejected() {
        let err = "squash".parse::<WhitespacePolicy>().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("whitespace"));
        assert!(msg.contains("squash"));
        assert!(msg.contains("collapse"));
    }

    #[test]
    fn serde_uses_kebab_case() {
        let json = serde_json::to_string(&ProcessingPolicy::strict()).unwrap();
        assert!(json.contains("\"obscure-collapse\""));
        assert!(json.contains("\"drop-content\""));

        let partial: ProcessingPolicy = serde_json::from_str(r#"{"comments":"remove"}"#).unwrap();
        assert_eq!(partial.comments, CommentPolicy::Remove);
        assert_eq!(partial.content, ContentPolicy::Keep);
    }
}
