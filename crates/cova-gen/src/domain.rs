//! Factor domains and their flattened form
//!
//! A [`FactorDomain`] is the nested description of every input factor a test
//! suite varies. Interior nodes are named groups, leaves are ordered level
//! lists. Flattening joins the keys on the way down with `.` and produces a
//! [`FlatDomain`], whose declaration order becomes the column order of every
//! generated test case.
//!
//! ```
//! use cova_gen::FactorDomain;
//!
//! let domain = FactorDomain::new()
//!     .group("Given", |g| {
//!         g.group("Student", |s| {
//!             s.factor("Course", ["Bachelor", "Master"])
//!                 .factor("Grade", ["1", "2", "3"])
//!         })
//!     })
//!     .factor("Then", ["Pass", "Fail"]);
//!
//! let flat = domain.flatten().unwrap();
//! let paths: Vec<&str> = flat.paths().collect();
//! assert_eq!(paths, ["Given.Student.Course", "Given.Student.Grade", "Then"]);
//! ```

use crate::assignment::{ID_FIELD, PERSPECTIVE_FIELD};
use crate::error::{Error, Result};
use serde::de::{self, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{SerializeMap, SerializeSeq, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Node of a factor domain or defaults tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainNode {
    /// Named children, in declaration order
    Group(Vec<(String, DomainNode)>),
    /// Ordered level list of a factor
    Levels(Vec<String>),
    /// A single chosen level (defaults trees) or a one-level factor
    Value(String),
}

/// Nested factor schema, key order preserved
///
/// The same type describes a defaults tree: there, every leaf is a
/// [`DomainNode::Value`] holding the chosen level.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FactorDomain {
    entries: Vec<(String, DomainNode)>,
}

impl FactorDomain {
    /// Create an empty domain
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Add a factor with its ordered levels
    #[must_use]
    pub fn factor<I, S>(mut self, name: impl Into<String>, levels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let levels = levels.into_iter().map(Into::into).collect();
        self.entries
            .push((name.into(), DomainNode::Levels(levels)));
        self
    }

    /// Add a nested group built by `build`
    #[must_use]
    pub fn group(mut self, name: impl Into<String>, build: impl FnOnce(Self) -> Self) -> Self {
        let child = build(Self::new());
        self.entries
            .push((name.into(), DomainNode::Group(child.entries)));
        self
    }

    /// Add a single-value leaf (used when describing defaults)
    #[must_use]
    pub fn value(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries
            .push((name.into(), DomainNode::Value(value.into())));
        self
    }

    /// Top-level entries in declaration order
    #[must_use]
    pub fn entries(&self) -> &[(String, DomainNode)] {
        &self.entries
    }

    /// True if the domain declares nothing
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Flatten into a dotted-path → levels mapping
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicatePath`] when two branches flatten to the same
    /// path, and [`Error::InvalidDomain`] for empty or repeated levels, paths
    /// that are both a factor and a group prefix, or reserved field names.
    pub fn flatten(&self) -> Result<FlatDomain> {
        let mut flat = FlatDomain::default();
        walk_leaves(&self.entries, "", &mut |path: String, node: &DomainNode| match node {
            DomainNode::Levels(levels) => flat.insert(path, levels.clone()),
            DomainNode::Value(level) => flat.insert(path, vec![level.clone()]),
            DomainNode::Group(_) => Ok(()),
        })?;
        flat.check_prefixes()?;
        Ok(flat)
    }
}

/// Join a parent path and a key with `.`
#[must_use]
pub fn join_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{parent}.{key}")
    }
}

/// Depth-first walk calling `visit` on every leaf with its dotted path
pub(crate) fn walk_leaves<F>(entries: &[(String, DomainNode)], parent: &str, visit: &mut F) -> Result<()>
where
    F: FnMut(String, &DomainNode) -> Result<()>,
{
    for (key, node) in entries {
        let path = join_path(parent, key);
        match node {
            DomainNode::Group(children) => walk_leaves(children, &path, visit)?,
            leaf => visit(path, leaf)?,
        }
    }
    Ok(())
}

/// A single flattened factor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Factor {
    /// Dotted path
    pub path: String,
    /// Ordered levels
    pub levels: Vec<String>,
}

impl Factor {
    /// True if `level` is one of this factor's levels
    #[must_use]
    pub fn has_level(&self, level: &str) -> bool {
        self.levels.iter().any(|l| l == level)
    }
}

/// Flattened domain: dotted path → ordered levels, in declaration order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlatDomain {
    factors: Vec<Factor>,
    index: HashMap<String, usize>,
}

impl FlatDomain {
    /// Register a factor
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicatePath`] if `path` is already registered and
    /// [`Error::InvalidDomain`] for empty/repeated levels or reserved names.
    pub fn insert(&mut self, path: String, levels: Vec<String>) -> Result<()> {
        if self.index.contains_key(&path) {
            return Err(Error::DuplicatePath(path));
        }
        if path == ID_FIELD || path == PERSPECTIVE_FIELD {
            return Err(Error::InvalidDomain(format!(
                "'{path}' is a reserved field name"
            )));
        }
        if levels.is_empty() {
            return Err(Error::InvalidDomain(format!(
                "factor '{path}' has no levels"
            )));
        }
        for (i, level) in levels.iter().enumerate() {
            if levels[..i].contains(level) {
                return Err(Error::InvalidDomain(format!(
                    "factor '{path}' repeats level '{level}'"
                )));
            }
        }
        self.index.insert(path.clone(), self.factors.len());
        self.factors.push(Factor { path, levels });
        Ok(())
    }

    /// A path is either a factor or a group, never both
    fn check_prefixes(&self) -> Result<()> {
        for factor in &self.factors {
            let prefix = format!("{}.", factor.path);
            if let Some(nested) = self.factors.iter().find(|f| f.path.starts_with(&prefix)) {
                return Err(Error::InvalidDomain(format!(
                    "'{}' is a factor but '{}' nests under it",
                    factor.path, nested.path
                )));
            }
        }
        Ok(())
    }

    /// Levels of the factor at `path`
    #[must_use]
    pub fn levels(&self, path: &str) -> Option<&[String]> {
        self.factor(path).map(|f| f.levels.as_slice())
    }

    /// Factor at `path`
    #[must_use]
    pub fn factor(&self, path: &str) -> Option<&Factor> {
        self.index.get(path).map(|&i| &self.factors[i])
    }

    /// True if `path` names a factor
    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.index.contains_key(path)
    }

    /// Paths in declaration order
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.factors.iter().map(|f| f.path.as_str())
    }

    /// Factors in declaration order
    pub fn iter(&self) -> std::slice::Iter<'_, Factor> {
        self.factors.iter()
    }

    /// Number of factors
    #[must_use]
    pub fn len(&self) -> usize {
        self.factors.len()
    }

    /// True if there are no factors
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }
}

impl<'a> IntoIterator for &'a FlatDomain {
    type Item = &'a Factor;
    type IntoIter = std::slice::Iter<'a, Factor>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Serialize for FlatDomain {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.factors.len()))?;
        for factor in &self.factors {
            map.serialize_entry(&factor.path, &factor.levels)?;
        }
        map.end()
    }
}

/// A scalar read from YAML/JSON as a string
///
/// Lets suite files write `Grade: 3` instead of `Grade: "3"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Scalar(pub String);

impl Scalar {
    /// Unwrap into the string value
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

struct ScalarVisitor;

impl Visitor<'_> for ScalarVisitor {
    type Value = Scalar;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string, number or boolean")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Scalar, E> {
        Ok(Scalar(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> std::result::Result<Scalar, E> {
        Ok(Scalar(v))
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> std::result::Result<Scalar, E> {
        Ok(Scalar(v.to_string()))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Scalar, E> {
        Ok(Scalar(v.to_string()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Scalar, E> {
        Ok(Scalar(v.to_string()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<Scalar, E> {
        Ok(Scalar(v.to_string()))
    }
}

impl<'de> Deserialize<'de> for Scalar {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_any(ScalarVisitor)
    }
}

struct NodeVisitor;

impl<'de> Visitor<'de> for NodeVisitor {
    type Value = DomainNode;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a group mapping, a level list, or a single level")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<DomainNode, A::Error> {
        let mut entries = Vec::new();
        while let Some(Scalar(key)) = map.next_key()? {
            let node: DomainNode = map.next_value()?;
            entries.push((key, node));
        }
        Ok(DomainNode::Group(entries))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> std::result::Result<DomainNode, A::Error> {
        let mut levels = Vec::new();
        while let Some(Scalar(level)) = seq.next_element()? {
            levels.push(level);
        }
        Ok(DomainNode::Levels(levels))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<DomainNode, E> {
        Ok(DomainNode::Value(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> std::result::Result<DomainNode, E> {
        Ok(DomainNode::Value(v))
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> std::result::Result<DomainNode, E> {
        Ok(DomainNode::Value(v.to_string()))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<DomainNode, E> {
        Ok(DomainNode::Value(v.to_string()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<DomainNode, E> {
        Ok(DomainNode::Value(v.to_string()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<DomainNode, E> {
        Ok(DomainNode::Value(v.to_string()))
    }
}

impl<'de> Deserialize<'de> for DomainNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_any(NodeVisitor)
    }
}

impl Serialize for DomainNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Group(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, node) in entries {
                    map.serialize_entry(key, node)?;
                }
                map.end()
            }
            Self::Levels(levels) => {
                let mut seq = serializer.serialize_seq(Some(levels.len()))?;
                for level in levels {
                    seq.serialize_element(level)?;
                }
                seq.end()
            }
            Self::Value(value) => serializer.serialize_str(value),
        }
    }
}

impl<'de> Deserialize<'de> for FactorDomain {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        match DomainNode::deserialize(deserializer)? {
            DomainNode::Group(entries) => Ok(Self { entries }),
            _ => Err(de::Error::custom("domain root must be a mapping of groups and factors")),
        }
    }
}

impl Serialize for FactorDomain {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, node) in &self.entries {
            map.serialize_entry(key, node)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student_domain() -> FactorDomain {
        FactorDomain::new()
            .group("Given", |g| {
                g.group("Student", |s| {
                    s.factor("Course", ["Bachelor", "Master", "Doctor"])
                        .factor("Grade", ["1", "2", "3", "4"])
                })
            })
            .factor("When", ["Try to login"])
            .factor("Then", ["Pass", "Fail", "Any"])
    }

    #[test]
    fn test_flatten_preserves_declaration_order() {
        let flat = student_domain().flatten().expect("flatten");
        let paths: Vec<&str> = flat.paths().collect();
        assert_eq!(
            paths,
            [
                "Given.Student.Course",
                "Given.Student.Grade",
                "When",
                "Then"
            ]
        );
        assert_eq!(
            flat.levels("Given.Student.Grade").expect("grade"),
            ["1", "2", "3", "4"]
        );
    }

    #[test]
    fn test_flatten_duplicate_path() {
        let domain = FactorDomain::new()
            .group("A", |g| g.factor("B", ["x"]))
            .factor("A.B", ["y"]);
        let err = domain.flatten().unwrap_err();
        assert!(matches!(err, Error::DuplicatePath(ref p) if p == "A.B"));
    }

    #[test]
    fn test_flatten_same_key_twice() {
        let domain = FactorDomain::new().factor("A", ["x"]).factor("A", ["y"]);
        assert!(matches!(domain.flatten(), Err(Error::DuplicatePath(_))));
    }

    #[test]
    fn test_flatten_rejects_empty_levels() {
        let domain = FactorDomain::new().factor("A", Vec::<String>::new());
        assert!(matches!(domain.flatten(), Err(Error::InvalidDomain(_))));
    }

    #[test]
    fn test_flatten_rejects_repeated_level() {
        let domain = FactorDomain::new().factor("A", ["x", "y", "x"]);
        let err = domain.flatten().unwrap_err();
        assert!(err.to_string().contains("repeats level 'x'"));
    }

    #[test]
    fn test_flatten_rejects_factor_and_group() {
        let domain = FactorDomain::new()
            .factor("A", ["x"])
            .factor("A.B", ["y"]);
        assert!(matches!(domain.flatten(), Err(Error::InvalidDomain(_))));
    }

    #[test]
    fn test_flatten_rejects_reserved_names() {
        let domain = FactorDomain::new().factor("ID", ["1"]);
        assert!(matches!(domain.flatten(), Err(Error::InvalidDomain(_))));
        let domain = FactorDomain::new().factor("Perspective", ["p"]);
        assert!(matches!(domain.flatten(), Err(Error::InvalidDomain(_))));
    }

    #[test]
    fn test_value_leaf_is_single_level() {
        let domain = FactorDomain::new().value("When", "Try to login");
        let flat = domain.flatten().expect("flatten");
        assert_eq!(flat.levels("When").expect("when"), ["Try to login"]);
    }

    #[test]
    fn test_empty_group_contributes_nothing() {
        let domain = FactorDomain::new().group("Given", |g| g).factor("A", ["x"]);
        let flat = domain.flatten().expect("flatten");
        assert_eq!(flat.len(), 1);
    }

    #[test]
    fn test_join_path() {
        assert_eq!(join_path("", "A"), "A");
        assert_eq!(join_path("A", "B"), "A.B");
    }

    #[test]
    fn test_deserialize_yaml_preserves_order() {
        let yaml = r#"
Zeta:
  Second: [b1, b2]
  First: [a1]
Alpha:
  - 1
  - 2
"#;
        let domain: FactorDomain = serde_yaml::from_str(yaml).expect("parse");
        let flat = domain.flatten().expect("flatten");
        let paths: Vec<&str> = flat.paths().collect();
        assert_eq!(paths, ["Zeta.Second", "Zeta.First", "Alpha"]);
        assert_eq!(flat.levels("Alpha").expect("alpha"), ["1", "2"]);
    }

    #[test]
    fn test_deserialize_rejects_non_mapping_root() {
        let result: std::result::Result<FactorDomain, _> = serde_yaml::from_str("[a, b]");
        assert!(result.is_err());
    }

    #[test]
    fn test_serialize_roundtrip_json() {
        let domain = student_domain();
        let json = serde_json::to_string(&domain).expect("serialize");
        assert!(json.starts_with(r#"{"Given":{"Student":{"Course":["Bachelor""#));
        let back: FactorDomain = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, domain);
    }

    #[test]
    fn test_flat_domain_serializes_in_order() {
        let flat = student_domain().flatten().expect("flatten");
        let json = serde_json::to_string(&flat).expect("serialize");
        let course = json.find("Given.Student.Course").expect("course");
        let then = json.find("\"Then\"").expect("then");
        assert!(course < then);
    }

    #[test]
    fn test_factor_has_level() {
        let flat = student_domain().flatten().expect("flatten");
        let factor = flat.factor("Then").expect("then");
        assert!(factor.has_level("Any"));
        assert!(!factor.has_level("Maybe"));
    }
}
