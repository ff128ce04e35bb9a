//! Single-pass tokenize-and-classify scan.
//!
//! The engine walks document text left to right exactly once per
//! invocation, extracting word-boundary-delimited barewords and classifying
//! each against the registry. Findings come out as a lazy iterator in
//! source order; no scan state is shared across calls, so a scan is
//! restartable simply by invoking it again.

use camino::Utf8PathBuf;
use rustc_hash::FxHashSet;

use beian_core::{
    Finding, FindingKind, GuardConfig, IdentifierPattern, Registry, ScanTarget, SourceSpan,
};

/// Settings the engine needs for one scan, extracted from [`GuardConfig`].
///
/// Configuration is always passed in explicitly; the engine never reads
/// settings ambiently.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Which identifier spellings are candidates.
    pub pattern: IdentifierPattern,

    /// Spellings exempt from checking.
    pub ignore: FxHashSet<String>,

    /// Message template for unregistered identifiers (`{typeName}` token).
    pub error_not_registered: String,

    /// Message template for tampered entries (`{typeName}` token).
    pub error_tampered: String,

    /// Label attached to produced findings.
    pub source: String,

    /// Configured relative registry path, used for self-reference
    /// exclusion by suffix match.
    pub registry_relative_path: Utf8PathBuf,
}

impl ScanOptions {
    /// Builds scan options from the guard configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use beian_core::GuardConfig;
    /// use beian_scanner::ScanOptions;
    ///
    /// let options = ScanOptions::from_config(&GuardConfig::default());
    /// assert_eq!(options.source, "beian");
    /// ```
    #[must_use]
    pub fn from_config(config: &GuardConfig) -> Self {
        Self {
            pattern: config.identifier_pattern,
            ignore: config.ignore_keywords.iter().cloned().collect(),
            error_not_registered: config.error_not_registered.clone(),
            error_tampered: config.error_tampered.clone(),
            source: config.diagnostic_source.clone(),
            registry_relative_path: config.config_file_path.clone(),
        }
    }
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self::from_config(&GuardConfig::default())
    }
}

/// The tokenize-and-classify scan engine.
///
/// Stateless; both entry points take everything they need as arguments.
/// Scanning has no failure mode: it runs on arbitrary text without
/// erroring, since interrupting the editing flow is the one thing this
/// system must never do outside the deliberate blocking mechanism.
#[derive(Debug, Clone, Copy)]
pub struct ScanEngine;

impl ScanEngine {
    /// Scans a document against a registry, lazily.
    ///
    /// Returns a finite, restartable iterator of findings in source order.
    /// Documents that are not file-backed, and the registry's own file
    /// (identified by suffix match against the configured registry path),
    /// yield no findings regardless of content.
    #[must_use]
    pub fn scan<'a>(
        target: &'a ScanTarget,
        registry: &'a Registry,
        options: &'a ScanOptions,
    ) -> Findings<'a> {
        let text = if Self::is_scannable(target, options) {
            target.text.as_str()
        } else {
            ""
        };
        Findings {
            text,
            pos: 0,
            registry,
            options,
        }
    }

    /// Scans a document and collects all findings.
    #[must_use]
    pub fn scan_to_vec(
        target: &ScanTarget,
        registry: &Registry,
        options: &ScanOptions,
    ) -> Vec<Finding> {
        Self::scan(target, registry, options).collect()
    }

    /// Self-reference exclusion and untitled-document skip.
    ///
    /// The registry must never audit itself: without this check, every
    /// registered name inside the registry file would show up as a
    /// finding the moment the pattern matched it.
    fn is_scannable(target: &ScanTarget, options: &ScanOptions) -> bool {
        let Some(path) = target.id.path() else {
            return false;
        };
        if path == target.registry_path {
            return false;
        }
        // Component-anchored: `beian.json` must not match `my-beian.json`.
        let suffix = &options.registry_relative_path;
        if !suffix.as_str().is_empty() && path.ends_with(suffix) {
            return false;
        }
        true
    }
}

/// Lazy iterator over the findings of one scan pass.
///
/// Produced by [`ScanEngine::scan`]. Each call to `next` resumes the
/// single left-to-right pass from where the previous finding left off.
#[derive(Debug)]
pub struct Findings<'a> {
    text: &'a str,
    pos: usize,
    registry: &'a Registry,
    options: &'a ScanOptions,
}

/// Word characters for tokenization: `[A-Za-z0-9_]`.
///
/// Non-ASCII bytes are word boundaries, so spans always start and end on
/// character boundaries.
#[inline]
const fn is_word_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_'
}

impl Findings<'_> {
    fn classify(&self, word: &str, span: SourceSpan) -> Option<Finding> {
        if self.options.ignore.contains(word) {
            return None;
        }

        let (kind, template) = match self.registry.find(word) {
            Some(entry) if entry.is_intact() => return None,
            Some(_) => (FindingKind::Tampered, &self.options.error_tampered),
            None => (FindingKind::Unregistered, &self.options.error_not_registered),
        };

        Some(Finding {
            identifier: word.to_owned(),
            span,
            kind,
            message: template.replace("{typeName}", word),
            source: self.options.source.clone(),
        })
    }
}

impl Iterator for Findings<'_> {
    type Item = Finding;

    fn next(&mut self) -> Option<Finding> {
        let bytes = self.text.as_bytes();

        while self.pos < bytes.len() {
            if !is_word_byte(bytes[self.pos]) {
                self.pos += 1;
                continue;
            }

            // Consume the whole word run, then decide whether it is a
            // candidate bareword.
            let start = self.pos;
            let mut end = start;
            while end < bytes.len() && is_word_byte(bytes[end]) {
                end += 1;
            }
            self.pos = end;

            let first = bytes[start];
            if first.is_ascii_digit() {
                continue;
            }
            if self.options.pattern == IdentifierPattern::CapitalizedOnly
                && !first.is_ascii_uppercase()
            {
                continue;
            }

            let word = &self.text[start..end];
            if let Some(finding) = self.classify(word, SourceSpan::new(start, end)) {
                return Some(finding);
            }
        }

        None
    }
}
