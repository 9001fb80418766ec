//! Hierarchical node tree and module container for compiled VCG rules
//!
//! A rule body compiles to a tree of sequence-of-alternatives nodes: the
//! `children` of a node are the alternatives of a group, the `next` link is
//! concatenation within one alternative, and the repeat bounds say how many
//! times the node may match. A node with children is a group and its `value`
//! is only a placeholder.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Sentinel for an unbounded repeat maximum (`*`, `+`, `{n,}`)
pub const UNBOUNDED_REPEAT: u32 = u32::MAX;

/// One node of a compiled rule tree.
///
/// Reading: repeat, between `min_repeat` and `max_repeat` times, either the
/// literal `value` (leaf) or one of the `children` alternatives (group); then
/// continue with `next`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchicalNode {
    /// Literal token text for leaves; placeholder (`"("`) for groups
    pub value: String,
    /// Alternatives of a group, in source order
    pub children: Vec<HierarchicalNode>,
    /// Right-linked continuation of the same alternative
    pub next: Option<Box<HierarchicalNode>>,
    /// Minimum repeat count (0 ≤ min ≤ max)
    pub min_repeat: u32,
    /// Maximum repeat count (≥ 1; UNBOUNDED_REPEAT for no limit)
    pub max_repeat: u32,
}

impl HierarchicalNode {
    /// Create a leaf node with the default (1,1) repeat
    pub fn leaf(value: impl Into<String>) -> Self {
        let value = value.into();
        debug_assert!(!value.is_empty(), "node values must be non-empty");
        Self {
            value,
            children: Vec::new(),
            next: None,
            min_repeat: 1,
            max_repeat: 1,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn is_group(&self) -> bool {
        !self.children.is_empty()
    }

    /// Whether this node is an optional group (`[ … ]`)
    pub fn is_optional_group(&self) -> bool {
        self.is_group() && self.min_repeat == 0 && self.max_repeat == 1
    }

    pub fn has_default_repeat(&self) -> bool {
        self.min_repeat == 1 && self.max_repeat == 1
    }

    /// Verify the structural invariants over the whole tree
    pub fn check_invariants(&self) -> bool {
        if self.value.is_empty() {
            return false;
        }
        if self.min_repeat > self.max_repeat || self.max_repeat < 1 {
            return false;
        }
        if !self.children.iter().all(|c| c.check_invariants()) {
            return false;
        }
        match &self.next {
            Some(next) => next.check_invariants(),
            None => true,
        }
    }

    /// Total node count over children and next links
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(|c| c.node_count()).sum::<usize>()
            + self.next.as_ref().map(|n| n.node_count()).unwrap_or(0)
    }

    fn repeat_suffix(&self) -> String {
        // Optional groups render their (0,1) through the brackets themselves
        if self.is_optional_group() {
            return String::new();
        }
        match (self.min_repeat, self.max_repeat) {
            (1, 1) => String::new(),
            (0, UNBOUNDED_REPEAT) => "*".to_string(),
            (1, UNBOUNDED_REPEAT) => "+".to_string(),
            (n, m) if n == m => format!("{{{}}}", n),
            (n, UNBOUNDED_REPEAT) => format!("{{{},}}", n),
            (n, m) => format!("{{{},{}}}", n, m),
        }
    }
}

impl fmt::Display for HierarchicalNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_group() {
            let (open, close) = if self.is_optional_group() {
                ("[", "]")
            } else {
                ("(", ")")
            };
            write!(f, "{}", open)?;
            for (i, child) in self.children.iter().enumerate() {
                if i > 0 {
                    write!(f, " | ")?;
                }
                write!(f, "{}", child)?;
            }
            write!(f, "{}", close)?;
        } else {
            write!(f, "{}", self.value)?;
        }

        write!(f, "{}", self.repeat_suffix())?;

        if let Some(next) = &self.next {
            write!(f, " {}", next)?;
        }
        Ok(())
    }
}

/// One imported package: optional alias and the static marker
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ImportEntry {
    /// Alias from `as name`; empty when absent
    pub alias: String,
    /// Whether the import was marked `static`
    pub is_static: bool,
}

impl ImportEntry {
    pub fn new(alias: impl Into<String>, is_static: bool) -> Self {
        Self {
            alias: alias.into(),
            is_static,
        }
    }
}

/// The compiled output of one VCG source file.
///
/// Map iteration follows source order of the import statements and rule
/// headers respectively.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VcgModule {
    /// Dot-joined package path of the module itself
    pub package_path: String,
    /// Source file name (without directory)
    pub file_name: String,
    /// Same-stem companion script, when one exists beside the source
    pub companion_path: Option<PathBuf>,
    /// package name -> (alias, is_static)
    pub imports: IndexMap<String, ImportEntry>,
    /// rule name (without `$`) -> compiled root node
    pub rules: IndexMap<String, HierarchicalNode>,
    /// rule name -> `@callback` name, for rules that declared one
    pub callbacks: IndexMap<String, String>,
}

impl VcgModule {
    pub fn new(package_path: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            package_path: package_path.into(),
            file_name: file_name.into(),
            ..Default::default()
        }
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    pub fn import_count(&self) -> usize {
        self.imports.len()
    }

    /// Callback declared for a rule, if any
    pub fn callback_for(&self, rule_name: &str) -> Option<&str> {
        self.callbacks.get(rule_name).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(values: &[&str]) -> HierarchicalNode {
        let mut nodes: Vec<HierarchicalNode> =
            values.iter().map(|v| HierarchicalNode::leaf(*v)).collect();
        while nodes.len() > 1 {
            let tail = nodes.pop().unwrap();
            nodes.last_mut().unwrap().next = Some(Box::new(tail));
        }
        nodes.pop().unwrap()
    }

    fn group(children: Vec<HierarchicalNode>) -> HierarchicalNode {
        let mut node = HierarchicalNode::leaf("(");
        node.children = children;
        node
    }

    #[test]
    fn test_leaf_defaults() {
        let node = HierarchicalNode::leaf("hello");
        assert!(node.is_leaf());
        assert!(node.has_default_repeat());
        assert!(node.check_invariants());
        assert_eq!(node.to_string(), "hello");
    }

    #[test]
    fn test_sequence_rendering() {
        assert_eq!(chain(&["a", "b", "c"]).to_string(), "a b c");
    }

    #[test]
    fn test_group_rendering() {
        let node = group(vec![chain(&["a", "b"]), HierarchicalNode::leaf("c")]);
        assert_eq!(node.to_string(), "(a b | c)");
    }

    #[test]
    fn test_optional_group_rendering() {
        let mut node = group(vec![HierarchicalNode::leaf("maybe")]);
        node.min_repeat = 0;
        node.max_repeat = 1;
        assert!(node.is_optional_group());
        assert_eq!(node.to_string(), "[maybe]");
    }

    #[test]
    fn test_repeat_suffixes() {
        let mut star = HierarchicalNode::leaf("a");
        star.min_repeat = 0;
        star.max_repeat = UNBOUNDED_REPEAT;
        assert_eq!(star.to_string(), "a*");

        let mut plus = HierarchicalNode::leaf("a");
        plus.min_repeat = 1;
        plus.max_repeat = UNBOUNDED_REPEAT;
        assert_eq!(plus.to_string(), "a+");

        let mut exact = HierarchicalNode::leaf("a");
        exact.min_repeat = 3;
        exact.max_repeat = 3;
        assert_eq!(exact.to_string(), "a{3}");

        let mut at_least = HierarchicalNode::leaf("a");
        at_least.min_repeat = 3;
        at_least.max_repeat = UNBOUNDED_REPEAT;
        assert_eq!(at_least.to_string(), "a{3,}");

        let mut range = HierarchicalNode::leaf("a");
        range.min_repeat = 2;
        range.max_repeat = 9;
        assert_eq!(range.to_string(), "a{2,9}");
    }

    #[test]
    fn test_invariant_checks() {
        let mut node = HierarchicalNode::leaf("a");
        assert!(node.check_invariants());

        node.min_repeat = 2;
        node.max_repeat = 1;
        assert!(!node.check_invariants());

        let mut zero_max = HierarchicalNode::leaf("a");
        zero_max.min_repeat = 0;
        zero_max.max_repeat = 0;
        assert!(!zero_max.check_invariants());
    }

    #[test]
    fn test_node_count() {
        let node = group(vec![chain(&["a", "b"]), HierarchicalNode::leaf("c")]);
        // group + a + b + c
        assert_eq!(node.node_count(), 4);
    }

    #[test]
    fn test_module_accessors() {
        let mut module = VcgModule::new("pkg.sub", "commands.vcg");
        module
            .imports
            .insert("other.pkg".to_string(), ImportEntry::new("", true));
        module
            .rules
            .insert("go".to_string(), HierarchicalNode::leaf("go"));
        module
            .callbacks
            .insert("go".to_string(), "on_go".to_string());

        assert_eq!(module.import_count(), 1);
        assert_eq!(module.rule_count(), 1);
        assert_eq!(module.callback_for("go"), Some("on_go"));
        assert_eq!(module.callback_for("stop"), None);
    }

    #[test]
    fn test_module_preserves_insertion_order() {
        let mut module = VcgModule::new("", "m.vcg");
        for name in ["zeta", "alpha", "mid"] {
            module
                .rules
                .insert(name.to_string(), HierarchicalNode::leaf(name));
        }
        let order: Vec<&String> = module.rules.keys().collect();
        assert_eq!(order, vec!["zeta", "alpha", "mid"]);
    }
}
