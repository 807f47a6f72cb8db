//! Atom Registry

use crate::{AtomDescriptor, RegistryError};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::{debug, info};

/// On-disk shape of a declarative atom table
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AtomTable {
    pub atoms: Vec<AtomDescriptor>,
}

/// Read-only lookup of atom descriptors by call name and by wire tag
#[derive(Debug, Clone, Default)]
pub struct AtomRegistry {
    atoms: Vec<AtomDescriptor>,
    by_call: HashMap<String, usize>,
    by_tag: HashMap<String, usize>,
}

impl AtomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_atom(mut self, atom: AtomDescriptor) -> Result<Self, RegistryError> {
        self.register(atom)?;
        Ok(self)
    }

    pub fn register(&mut self, atom: AtomDescriptor) -> Result<(), RegistryError> {
        atom.validate()?;
        if self.by_call.contains_key(&atom.call_name) {
            return Err(RegistryError::DuplicateCallName(atom.call_name));
        }
        if self.by_tag.contains_key(&atom.wire_tag) {
            return Err(RegistryError::DuplicateWireTag(atom.wire_tag));
        }
        let index = self.atoms.len();
        self.by_call.insert(atom.call_name.clone(), index);
        self.by_tag.insert(atom.wire_tag.clone(), index);
        self.atoms.push(atom);
        Ok(())
    }

    pub fn from_descriptors(
        atoms: impl IntoIterator<Item = AtomDescriptor>,
    ) -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        for atom in atoms {
            registry.register(atom)?;
        }
        Ok(registry)
    }

    /// Build from a JSON atom table: `{"atoms": [...]}`
    pub fn from_json_str(text: &str) -> Result<Self, RegistryError> {
        let table: AtomTable = serde_json::from_str(text)?;
        let registry = Self::from_descriptors(table.atoms)?;
        debug!(atoms = registry.len(), "atom table parsed");
        Ok(registry)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| RegistryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let registry = Self::from_json_str(&text)?;
        info!(path = %path.display(), atoms = registry.len(), "atom table loaded");
        Ok(registry)
    }

    pub fn to_table(&self) -> AtomTable {
        AtomTable { atoms: self.atoms.clone() }
    }

    pub fn resolve_call(&self, name: &str) -> Option<&AtomDescriptor> {
        self.by_call.get(name).map(|&i| &self.atoms[i])
    }

    pub fn resolve_tag(&self, tag: &str) -> Option<&AtomDescriptor> {
        self.by_tag.get(tag).map(|&i| &self.atoms[i])
    }

    pub fn is_call(&self, name: &str) -> bool {
        self.by_call.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    /// All descriptors, sorted by call name
    pub fn atoms(&self) -> Vec<&AtomDescriptor> {
        let mut atoms: Vec<&AtomDescriptor> = self.atoms.iter().collect();
        atoms.sort_by(|a, b| a.call_name.cmp(&b.call_name));
        atoms
    }

    /// Call names similar to `name`, best match first (for error suggestions)
    pub fn similar_names(&self, name: &str) -> Vec<&str> {
        let query = name.to_lowercase();
        let mut matches: Vec<(&str, usize)> = self.by_call.keys()
            .filter_map(|call| {
                let score = Self::similarity_score(&query, &call.to_lowercase());
                if score >= 10 {
                    Some((call.as_str(), score))
                } else {
                    None
                }
            })
            .collect();

        matches.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        matches.into_iter().map(|(call, _)| call).collect()
    }

    fn similarity_score(query: &str, candidate: &str) -> usize {
        if query.is_empty() {
            return 0;
        }
        let mut score = 0;

        if candidate == query {
            score += 200;
        } else if candidate.starts_with(query) {
            score += 100;
        } else if candidate.contains(query) {
            score += 50;
        } else if query.contains(candidate) {
            score += 30;
        }

        let query_chars: HashSet<char> = query.chars().collect();
        let candidate_chars: HashSet<char> = candidate.chars().collect();
        let common = query_chars.intersection(&candidate_chars).count();
        let union = query_chars.union(&candidate_chars).count().max(1);
        // Share of distinct letters in common, scaled to 0..=20
        score += common * 20 / union;

        score
    }

    /// Help record for one atom, looked up by call name or wire tag
    pub fn describe(&self, name: &str) -> Option<JsonValue> {
        self.resolve_call(name)
            .or_else(|| self.resolve_tag(name))
            .map(describe_atom)
    }

    /// Summary of every atom, optionally restricted to one category
    pub fn list(&self, category: Option<&str>) -> Vec<JsonValue> {
        self.atoms()
            .into_iter()
            .filter(|a| category.map_or(true, |c| a.category == c))
            .map(|a| json!({
                "name": a.call_name,
                "tag": a.wire_tag,
                "usage": a.usage(),
                "category": a.category,
            }))
            .collect()
    }

    pub fn categories(&self) -> Vec<&str> {
        let mut cats: Vec<&str> = self.atoms.iter()
            .map(|a| a.category.as_str())
            .filter(|c| !c.is_empty())
            .collect();
        cats.sort_unstable();
        cats.dedup();
        cats
    }
}

fn describe_atom(atom: &AtomDescriptor) -> JsonValue {
    json!({
        "name": atom.call_name,
        "tag": atom.wire_tag,
        "usage": atom.usage(),
        "description": atom.description,
        "category": atom.category,
        "fields": atom.fields.iter().map(|f| json!({
            "key": f.key,
            "kind": f.kind.name(),
            "base": f.base.map(|b| b.name()),
            "optional": f.optional,
            "rest": f.rest,
            "description": f.description,
        })).collect::<Vec<_>>(),
    })
}
