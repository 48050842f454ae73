//! Rewrites internal stylesheet references to their hashed form.
//!
//! Matching is regex based. Escaped quotes inside `url()` or references in
//! comments are not understood and get no special treatment.

use std::collections::HashMap;

use regex::{Captures, Regex};

use crate::util::hash::add_hash_to_filepath;
use crate::util::path::{clean_path, dirname, normalize_url_path};

const UNTOUCHED_PREFIXES: &[&str] = &["#", "http:", "https:", "data:", "//"];

#[derive(Debug)]
pub struct CssPass {
    pattern: Regex,
    opener: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CssReference {
    /// Fragment-only or externally hosted, left byte-identical.
    External,
    /// Resolves outside the mount.
    Unresolvable,
    Local { logical_path: String, url: SplitUrl },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitUrl {
    pub path: String,
    pub query: String,
    pub fragment: String,
}

impl SplitUrl {
    pub fn parse(url: &str) -> Self {
        let (rest, fragment) = url.split_once('#').unwrap_or((url, ""));
        let (path, query) = rest.split_once('?').unwrap_or((rest, ""));
        SplitUrl {
            path: path.to_string(),
            query: query.to_string(),
            fragment: fragment.to_string(),
        }
    }
}

#[derive(Debug)]
pub struct CssRewriter {
    url_prefix: String,
    passes: Vec<CssPass>,
}

impl CssRewriter {
    /// `url_prefix` is the mount's URL prefix with leading and trailing `/`.
    pub fn new(url_prefix: &str) -> Result<Self, regex::Error> {
        Ok(CssRewriter {
            url_prefix: url_prefix.to_string(),
            passes: vec![
                CssPass {
                    pattern: Regex::new(r#"(?i)url\(['"]?\s*(.*?)["']?\)"#)?,
                    opener: "url(\"",
                },
                CssPass {
                    pattern: Regex::new(r#"(?i)@import\s*["']\s*(.*?)["']"#)?,
                    opener: "@import url(\"",
                },
            ],
        })
    }

    /// Passes must run in order, each over the previous pass's output.
    pub fn passes(&self) -> &[CssPass] {
        &self.passes
    }

    /// Classify a reference found in the stylesheet served at `stylesheet_url`.
    pub fn reference(&self, css_url: &str, stylesheet_url: &str) -> CssReference {
        if UNTOUCHED_PREFIXES.iter().any(|p| css_url.starts_with(p)) {
            return CssReference::External;
        }
        let url = SplitUrl::parse(css_url);
        let absolute = if url.path.starts_with('/') {
            normalize_url_path(&url.path)
        } else {
            normalize_url_path(&format!("{}/{}", dirname(stylesheet_url), url.path))
        };
        match absolute.strip_prefix(&self.url_prefix) {
            Some(inner) => CssReference::Local {
                logical_path: clean_path(inner),
                url,
            },
            None => CssReference::Unresolvable,
        }
    }

    /// Logical paths referenced by one pass, deduplicated, in order of appearance.
    pub fn targets(&self, pass: &CssPass, css: &str, stylesheet_url: &str) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for caps in pass.pattern.captures_iter(css) {
            if let CssReference::Local { logical_path, .. } = self.reference(&caps[1], stylesheet_url) {
                if !out.contains(&logical_path) {
                    out.push(logical_path);
                }
            }
        }
        out
    }

    /// Substitute every match of `pass`. `hashes` maps logical paths to
    /// their content hash; a missing entry means the file does not exist.
    pub fn apply(
        &self,
        pass: &CssPass,
        css: &str,
        stylesheet_url: &str,
        hashes: &HashMap<String, String>,
    ) -> String {
        pass.pattern
            .replace_all(css, |caps: &Captures| {
                let css_url = &caps[1];
                let hashed = match self.reference(css_url, stylesheet_url) {
                    CssReference::External => return caps[0].to_string(),
                    CssReference::Unresolvable => not_found(&SplitUrl::parse(css_url).path),
                    CssReference::Local { logical_path, url } => match hashes.get(&logical_path) {
                        Some(hash) => hashed_url(css_url, &url, hash),
                        None => not_found(&url.path),
                    },
                };
                format!("{}{}\")", pass.opener, hashed)
            })
            .into_owned()
    }
}

fn not_found(path: &str) -> String {
    format!("NOT FOUND: \"{path}\"")
}

fn hashed_url(original: &str, url: &SplitUrl, hash: &str) -> String {
    let mut out = add_hash_to_filepath(&url.path, hash);
    if !url.query.is_empty() {
        out.push('?');
        out.push_str(&url.query);
    } else if original.contains("?#") {
        // keep `font.eot?#iefix` working for old IE
        out.push('?');
    }
    if !url.fragment.is_empty() {
        out.push('#');
        out.push_str(&url.fragment);
    }
    out
}
