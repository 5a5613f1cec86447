use super::timezone;
use crate::Context;
use crate::error::{Error, Result};
use std::collections::HashSet;

/// Function producing a placeholder value from the current context.
pub type ValueFn = Box<dyn Fn(&dyn Context) -> String + Send + Sync>;

/// Ordered registry of `{name}` placeholders.
///
/// Values are computed on every resolution; nothing is cached, so a template
/// always reflects the context it is resolved against.
#[derive(Default)]
pub struct PlaceholderRegistry {
    entries: Vec<(String, ValueFn)>,
    names: HashSet<String>,
}

impl std::fmt::Debug for PlaceholderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaceholderRegistry").field("names", &self.names()).finish()
    }
}

impl PlaceholderRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `name` (with or without the surrounding braces).
    ///
    /// Names are case-sensitive and must be unique.
    pub fn register<F>(&mut self, name: &str, value: F) -> Result<()>
    where
        F: Fn(&dyn Context) -> String + Send + Sync + 'static,
    {
        let key = delimited(name);
        if !self.names.insert(key.clone()) {
            return Err(Error::DuplicatePlaceholder(key));
        }
        self.entries.push((key, Box::new(value)));
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(&delimited(name))
    }

    /// Registered names (delimited) in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Substitute every registered placeholder in `template`.
    ///
    /// Each name present in the template is evaluated once and every
    /// occurrence gets that value. Offset placeholders such as
    /// `{time_utc_plus_05_30}` are swept afterwards. Unknown names are left
    /// as they are.
    pub fn resolve(&self, template: &str, context: &dyn Context) -> String {
        let mut out = template.to_string();

        for (name, value) in &self.entries {
            if out.contains(name.as_str()) {
                let v = value(context);
                out = out.replace(name.as_str(), &v);
            }
        }

        if timezone::has_offset_placeholder(&out) {
            out = timezone::replace_offsets(&out, context.now());
        }

        if log::log_enabled!(log::Level::Debug) {
            for m in regex!(r"\{[A-Za-z0-9_]+\}").find_iter(&out) {
                log::debug!("Unresolved placeholder {} in response {:?}", m.as_str(), template);
            }
        }

        out
    }
}

fn delimited(name: &str) -> String {
    if name.starts_with('{') && name.ends_with('}') { name.to_string() } else { format!("{{{name}}}") }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Attributes;
    use chrono::{TimeZone, Utc};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn replaces_registered_and_keeps_unknown() {
        let mut registry = PlaceholderRegistry::new();
        registry.register("x", |_| "42".to_string()).unwrap();

        let out = registry.resolve("You are at {x}, not {y}", &Attributes::new());
        assert_eq!(out, "You are at 42, not {y}");
    }

    #[test]
    fn reads_current_context_each_time() {
        let mut registry = PlaceholderRegistry::new();
        registry.register("{player_name}", |ctx| ctx.attribute("player_name").unwrap_or_default()).unwrap();

        let alice = Attributes::new().with("player_name", "Alice");
        let bob = Attributes::new().with("player_name", "Bob");
        assert_eq!(registry.resolve("hi {player_name}", &alice), "hi Alice");
        assert_eq!(registry.resolve("hi {player_name}", &bob), "hi Bob");
    }

    #[test]
    fn evaluates_each_name_once_per_resolution() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let mut registry = PlaceholderRegistry::new();
        registry
            .register("n", move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                "v".to_string()
            })
            .unwrap();
        registry.register("unused", |_| unreachable!("not in template")).unwrap();

        assert_eq!(registry.resolve("{n} {n} {n}", &Attributes::new()), "v v v");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut registry = PlaceholderRegistry::new();
        registry.register("x", |_| String::new()).unwrap();
        let err = registry.register("{x}", |_| String::new()).unwrap_err();
        assert!(matches!(err, Error::DuplicatePlaceholder(name) if name == "{x}"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn names_are_case_sensitive() {
        let mut registry = PlaceholderRegistry::new();
        registry.register("x", |_| "1".to_string()).unwrap();
        assert!(!registry.contains("X"));
        assert_eq!(registry.resolve("{X}", &Attributes::new()), "{X}");
    }

    #[test]
    fn sweeps_offsets_after_static_names() {
        let now = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
        let ctx = Attributes::new().at(now);
        let registry = PlaceholderRegistry::new();
        assert_eq!(registry.resolve("GMT+7: {time_gmt_plus_07_00}", &ctx), "GMT+7: 2024-01-15 19:00:00");
    }
}
