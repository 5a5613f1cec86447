use crate::engine::{self, BucketHit, CandidateStrategy, CompiledRules, DocumentFrequency, QueryMetrics, SelectionPath};
use crate::error::Result;
use crate::placeholders::PlaceholderRegistry;
use crate::rules::{RuleRecord, RuleSource};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

/// Runtime context a response is resolved against.
///
/// The matcher never owns a context: callers pass one per query, and every
/// placeholder function reads from it through this trait.
pub trait Context {
    /// Value of a named attribute (`"player_name"`, `"world_seed"`, ...).
    fn attribute(&self, name: &str) -> Option<String>;

    /// Reference instant for time placeholders.
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A plain attribute map, optionally pinned to a fixed instant.
///
/// # Example
/// ```
/// use phrasebook::{Attributes, Context};
///
/// let ctx = Attributes::new().with("player_name", "Alice");
/// assert_eq!(ctx.attribute("player_name").as_deref(), Some("Alice"));
/// assert_eq!(ctx.attribute("player_ip"), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Attributes {
    values: HashMap<String, String>,
    now: Option<DateTime<Utc>>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Pin `now()` to `instant` (deterministic time placeholders).
    pub fn at(mut self, instant: DateTime<Utc>) -> Self {
        self.now = Some(instant);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Context for Attributes {
    fn attribute(&self, name: &str) -> Option<String> {
        self.values.get(name).cloned()
    }

    fn now(&self) -> DateTime<Utc> {
        self.now.unwrap_or_else(Utc::now)
    }
}

/// Options that affect a single query.
#[derive(Debug, Clone, Default)]
pub struct Options {
    pub strategy: CandidateStrategy,
}

/// Additional details returned by [`Matcher::match_verbose_with`].
///
/// Compact on purpose: enough to see why a response did or did not fire
/// without dumping the index.
#[derive(Debug, Clone)]
pub struct MatchDetails {
    /// Distinct input tokens, in input order.
    pub tokens: Vec<String>,
    /// Buckets hit by the input, smallest first.
    pub buckets: Vec<BucketHit>,
    pub path: SelectionPath,
    /// Number of candidates evaluated, fallback included.
    pub candidates: usize,
    /// How many candidates came from the fallback bucket.
    pub fallback: usize,
    /// Phrases whose pattern matched, in response order.
    pub matched_phrases: Vec<String>,
    pub metrics: QueryMetrics,
}

/// Result from [`Matcher::match_verbose_with`].
#[derive(Debug, Clone)]
pub struct MatchResultVerbose {
    pub input: String,
    pub responses: Vec<String>,
    pub elapsed: Duration,
    pub details: MatchDetails,
}

/// Indexed phrase matcher.
///
/// Built once from rule records and a placeholder registry, then queried
/// through `&self`. A `Matcher` is immutable and `Send + Sync`; share it
/// behind an `Arc` or use [`ReloadableMatcher`] to swap in a rebuilt one.
///
/// # Example
/// ```
/// use phrasebook::{Attributes, Matcher, PlaceholderRegistry, RuleRecord};
///
/// let rules = vec![RuleRecord::new(["what is my name"], "You are {player_name}.")];
/// let mut registry = PlaceholderRegistry::new();
/// registry.register("player_name", |ctx| ctx.attribute("player_name").unwrap_or_default()).unwrap();
///
/// let matcher = Matcher::new(&rules, registry).unwrap();
/// let ctx = Attributes::new().with("player_name", "Alice");
/// assert_eq!(matcher.match_input(&ctx, "so... what is my name?"), ["You are Alice."]);
/// ```
#[derive(Debug)]
pub struct Matcher {
    compiled: CompiledRules,
    registry: PlaceholderRegistry,
}

impl Matcher {
    /// Index `records`. Fails only when a phrase cannot be compiled.
    pub fn new(records: &[RuleRecord], registry: PlaceholderRegistry) -> Result<Self> {
        Ok(Matcher { compiled: CompiledRules::new(records)?, registry })
    }

    /// Load every record from `source` and index them.
    pub fn from_source<S: RuleSource + ?Sized>(source: &S, registry: PlaceholderRegistry) -> Result<Self> {
        Self::new(&source.load_rules(), registry)
    }

    /// Match `input` with default [`Options`].
    pub fn match_input(&self, context: &dyn Context, input: &str) -> Vec<String> {
        self.match_with(context, input, &Options::default())
    }

    /// Match `input` and return every resolved response, in evaluation order.
    pub fn match_with(&self, context: &dyn Context, input: &str, options: &Options) -> Vec<String> {
        engine::Query::new(input, &self.compiled, options.strategy).run(context, &self.registry)
    }

    /// Match `input` and return selection details and timings alongside the
    /// responses. The plain [`Matcher::match_with`] path does not collect
    /// matched phrases.
    pub fn match_verbose_with(&self, context: &dyn Context, input: &str, options: &Options) -> MatchResultVerbose {
        let run = engine::Query::new(input, &self.compiled, options.strategy)
            .run_with_metrics(context, &self.registry);

        let matched_phrases = run.matched.iter().map(|&id| self.compiled.entry(id).phrase.clone()).collect();
        let details = MatchDetails {
            tokens: run.tokens,
            buckets: run.selection.buckets,
            path: run.selection.path,
            candidates: run.selection.candidates.len(),
            fallback: run.selection.fallback,
            matched_phrases,
            metrics: run.metrics,
        };

        let elapsed = details.metrics.total;
        MatchResultVerbose { input: input.to_string(), responses: run.responses, elapsed, details }
    }

    /// Number of rule records indexed.
    pub fn rule_count(&self) -> usize {
        self.compiled.rule_count
    }

    /// Number of compiled phrases.
    pub fn entry_count(&self) -> usize {
        self.compiled.entries.len()
    }

    pub fn bucket_count(&self) -> usize {
        self.compiled.index.bucket_count()
    }

    pub fn frequencies(&self) -> &DocumentFrequency {
        &self.compiled.frequencies
    }

    pub fn registry(&self) -> &PlaceholderRegistry {
        &self.registry
    }
}

/// A [`Matcher`] that can be rebuilt and swapped while queries run.
///
/// Readers take a snapshot (`Arc` clone) and query it without holding the
/// lock; `reload` builds the replacement before taking the write lock.
#[derive(Debug)]
pub struct ReloadableMatcher {
    current: RwLock<Arc<Matcher>>,
}

impl ReloadableMatcher {
    pub fn new(matcher: Matcher) -> Self {
        ReloadableMatcher { current: RwLock::new(Arc::new(matcher)) }
    }

    /// The matcher currently in service.
    pub fn snapshot(&self) -> Arc<Matcher> {
        let current = self.current.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&*current)
    }

    /// Swap in `matcher`, returning the one it replaces.
    pub fn replace(&self, matcher: Matcher) -> Arc<Matcher> {
        let mut current = self.current.write().unwrap_or_else(|e| e.into_inner());
        std::mem::replace(&mut *current, Arc::new(matcher))
    }

    /// Rebuild from `source` and swap on success.
    ///
    /// On failure the current matcher stays in service and the error is
    /// returned.
    pub fn reload(&self, source: &dyn RuleSource, registry: PlaceholderRegistry) -> Result<()> {
        let matcher = Matcher::from_source(source, registry)?;
        log::info!("Reloaded {} rules ({} phrases).", matcher.rule_count(), matcher.entry_count());
        self.replace(matcher);
        Ok(())
    }

    pub fn match_input(&self, context: &dyn Context, input: &str) -> Vec<String> {
        self.snapshot().match_input(context, input)
    }

    pub fn match_with(&self, context: &dyn Context, input: &str, options: &Options) -> Vec<String> {
        self.snapshot().match_with(context, input, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placeholders::Categories;
    use crate::rules::{StaticRuleSource, defaults};
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn greeter() -> Matcher {
        let records = vec![
            RuleRecord::new(["hello world", "hi there"], "Hello, {player_name}!"),
            RuleRecord::new(["what time"], "It is {time_utc}."),
        ];
        Matcher::new(&records, PlaceholderRegistry::builtin(Categories::ACTOR | Categories::TIME)).unwrap()
    }

    #[test]
    fn match_input_resolves_against_context() {
        let matcher = greeter();
        let ctx = Attributes::new().with("player_name", "Alice");
        assert_eq!(matcher.match_input(&ctx, "Hi there!"), ["Hello, Alice!"]);
        assert_eq!(matcher.match_input(&Attributes::new(), "hello big world"), ["Hello, unknown!"]);
        assert!(matcher.match_input(&ctx, "goodbye").is_empty());
    }

    #[test]
    fn pinned_time_is_used_for_time_placeholders() {
        let matcher = greeter();
        let ctx = Attributes::new().at(Utc.with_ymd_and_hms(2013, 2, 12, 4, 30, 0).unwrap());
        assert_eq!(matcher.match_input(&ctx, "what time is it"), ["It is 2013-02-12 04:30:00."]);
    }

    #[test]
    fn counts_reflect_the_index() {
        let matcher = greeter();
        assert_eq!(matcher.rule_count(), 2);
        assert_eq!(matcher.entry_count(), 3);
        // Anchors: "hello", "hi", "what".
        assert_eq!(matcher.bucket_count(), 3);
        assert_eq!(matcher.frequencies().get("world"), 1);
    }

    #[test]
    fn verbose_reports_selection_and_matches() {
        let matcher = greeter();
        let res = matcher.match_verbose_with(&Attributes::new(), "  hello world  ", &Options::default());

        assert_eq!(res.input, "  hello world  ");
        assert_eq!(res.responses, ["Hello, unknown!"]);
        assert_eq!(res.details.tokens, ["hello", "world"]);
        assert_eq!(res.details.buckets, vec![BucketHit { token: "hello".into(), size: 1 }]);
        assert_eq!(res.details.path, SelectionPath::Union);
        assert_eq!(res.details.candidates, 1);
        assert_eq!(res.details.fallback, 0);
        assert_eq!(res.details.matched_phrases, ["hello world"]);
        assert_eq!(res.elapsed, res.details.metrics.total);
    }

    #[test]
    fn default_corpus_builds() {
        let source = StaticRuleSource::new(defaults::records());
        let matcher = Matcher::from_source(&source, PlaceholderRegistry::builtin(Categories::all())).unwrap();
        assert!(matcher.rule_count() > 0);
        assert!(matcher.entry_count() >= matcher.rule_count());
    }

    #[test]
    fn reload_swaps_in_new_rules() {
        let reloadable = ReloadableMatcher::new(greeter());
        let before = reloadable.snapshot();

        let source = StaticRuleSource::new(vec![RuleRecord::new(["ping"], "pong")]);
        reloadable.reload(&source, PlaceholderRegistry::new()).unwrap();

        let ctx = Attributes::new();
        assert_eq!(reloadable.match_input(&ctx, "ping"), ["pong"]);
        assert!(reloadable.match_input(&ctx, "hello world").is_empty());
        // Snapshots taken earlier keep answering with the old rules.
        assert_eq!(before.match_input(&ctx, "hello world"), ["Hello, unknown!"]);
    }

    #[test]
    fn failed_reload_keeps_current_matcher() {
        let reloadable = ReloadableMatcher::new(greeter());
        // Far beyond the regex size limit.
        let oversized = vec!["x"; 200_000].join(" ");
        let source = StaticRuleSource::new(vec![RuleRecord::new([oversized], "never")]);

        assert!(reloadable.reload(&source, PlaceholderRegistry::new()).is_err());
        assert_eq!(reloadable.match_input(&Attributes::new(), "hi there"), ["Hello, unknown!"]);
    }

    #[test]
    fn matcher_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Matcher>();
        assert_send_sync::<ReloadableMatcher>();
    }
}
