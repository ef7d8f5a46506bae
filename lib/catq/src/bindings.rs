use std::collections::BTreeMap;
use std::fmt;

/// Variable bindings in the order they were supplied on the command line.
///
/// Bindings are resolved with [`Bindings::resolve`], where a later binding for a name replaces any
/// earlier one.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Bindings {
    pairs: Vec<(String, String)>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a binding.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((name.into(), value.into()));
    }

    /// The bindings as supplied, including overridden ones.
    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Folds the supplied pairs into a mapping sorted by name.
    ///
    /// The last value supplied for a name wins. Every override is reported with a warning.
    pub fn resolve(&self) -> ResolvedBindings {
        let mut resolved = BTreeMap::new();
        for (name, value) in &self.pairs {
            if let Some(previous) = resolved.insert(name.clone(), value.clone()) {
                tracing::warn!(
                    name = name.as_str(),
                    previous = previous.as_str(),
                    value = value.as_str(),
                    "Binding supplied more than once, the last value is used"
                );
            }
        }
        ResolvedBindings(resolved)
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for Bindings {
    fn from_iter<T: IntoIterator<Item = (N, V)>>(iter: T) -> Self {
        Self {
            pairs: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }
}

/// Bindings after duplicate names have been collapsed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResolvedBindings(BTreeMap<String, String>);

impl ResolvedBindings {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &BTreeMap<String, String> {
        &self.0
    }
}

impl fmt::Display for ResolvedBindings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (name, value)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{name}={value:?}")?;
        }
        f.write_str("}")
    }
}
