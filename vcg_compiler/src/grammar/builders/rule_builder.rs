//! Incremental assembler for rule bodies
//!
//! The parser drives a `RuleBuilder` through `BuildEvent`s while it recognizes
//! a rule body; the builder owns the nodes in progress in an index-addressed
//! arena and releases them as an owned `HierarchicalNode` tree on `finish()`.
//!
//! Two stacks carry the assembly state:
//! - `choice_stack`: group nodes currently open (pushed on `(`/`[`, popped on
//!   the matching close),
//! - `chain_stack`: nodes still extendable by a `next` link; the top is "the
//!   most recent node" that a quantifier applies to.
//!
//! `add_to_choice_as_child` routes the next emitted node: as a new alternative
//! of the open group (after `(`/`[`/`|`), or as the `next` of the chain top.

use crate::grammar::ast::nodes::HierarchicalNode;
use crate::logging::codes;

/// Builder protocol events emitted by the parser
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildEvent {
    /// Literal word or quoted phrase
    Word(String),
    /// `$name` variable reference
    Variable(String),
    /// `(` opened
    GroupStart,
    /// `[` opened
    OptionalStart,
    /// `|` between alternatives
    Pipe,
    /// `)` closed
    GroupEnd,
    /// `]` closed; applies (0,1) to the group
    OptionalEnd,
    /// Quantifier applied to the most recent node
    Repeat { min: u32, max: u32 },
}

/// Violations of the builder event protocol
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuilderError {
    #[error("Group close without a matching open")]
    UnbalancedGroup,

    #[error("Node emitted with no open group or chain to attach to")]
    MissingAttachPoint,

    #[error("Repeat quantifier without a target node")]
    RepeatWithoutTarget,

    #[error("Repeat quantifier already applied to this node")]
    RepeatAlreadyApplied,

    #[error("Rule body is empty")]
    EmptyRule,

    #[error("Rule ended with {count} unclosed group(s)")]
    UnclosedGroups { count: usize },
}

impl BuilderError {
    pub fn error_code(&self) -> crate::logging::Code {
        codes::compile::BUILDER_PROTOCOL
    }
}

/// Arena-resident node under construction
#[derive(Debug, Clone)]
struct BuilderNode {
    value: String,
    children: Vec<usize>,
    next: Option<usize>,
    min_repeat: u32,
    max_repeat: u32,
    repeat_set: bool,
}

impl BuilderNode {
    fn leaf(value: String) -> Self {
        Self {
            value,
            children: Vec::new(),
            next: None,
            min_repeat: 1,
            max_repeat: 1,
            repeat_set: false,
        }
    }

    fn group() -> Self {
        Self::leaf("(".to_string())
    }
}

/// Stateful assembler consuming builder events for one rule
#[derive(Debug)]
pub struct RuleBuilder {
    rule_name: String,
    callback: String,
    nodes: Vec<BuilderNode>,
    choice_stack: Vec<usize>,
    chain_stack: Vec<usize>,
    add_to_choice_as_child: bool,
}

impl RuleBuilder {
    /// Create a builder for the named rule.
    ///
    /// A dummy root is pushed onto the chain stack so `next`-attachment is
    /// always well-defined; `finish()` returns the dummy's successor.
    pub fn new(rule_name: impl Into<String>) -> Self {
        Self {
            rule_name: rule_name.into(),
            callback: String::new(),
            nodes: vec![BuilderNode::leaf("<root>".to_string())],
            choice_stack: Vec::new(),
            chain_stack: vec![0],
            add_to_choice_as_child: false,
        }
    }

    pub fn rule_name(&self) -> &str {
        &self.rule_name
    }

    /// Record the `@callback` name from the rule header
    pub fn set_callback(&mut self, name: impl Into<String>) {
        self.callback = name.into();
    }

    pub fn callback(&self) -> &str {
        &self.callback
    }

    /// Apply one builder event
    pub fn apply(&mut self, event: BuildEvent) -> Result<(), BuilderError> {
        match event {
            BuildEvent::Word(text) | BuildEvent::Variable(text) => self.add_leaf(text),
            BuildEvent::GroupStart | BuildEvent::OptionalStart => self.open_group(),
            BuildEvent::Pipe => {
                self.chain_stack.pop();
                self.add_to_choice_as_child = true;
                Ok(())
            }
            BuildEvent::GroupEnd => self.close_group(false),
            BuildEvent::OptionalEnd => self.close_group(true),
            BuildEvent::Repeat { min, max } => self.set_range(min, max),
        }
    }

    /// Release the finished tree, consuming the builder.
    pub fn finish(self) -> Result<HierarchicalNode, BuilderError> {
        if !self.choice_stack.is_empty() {
            return Err(BuilderError::UnclosedGroups {
                count: self.choice_stack.len(),
            });
        }

        match self.nodes[0].next {
            Some(first) => Ok(self.reify(first)),
            None => Err(BuilderError::EmptyRule),
        }
    }

    // ========================================================================
    // Event handlers
    // ========================================================================

    fn add_leaf(&mut self, text: String) -> Result<(), BuilderError> {
        let id = self.alloc(BuilderNode::leaf(text));
        self.attach(id)?;
        self.chain_stack.pop();
        self.chain_stack.push(id);
        self.add_to_choice_as_child = false;
        Ok(())
    }

    fn open_group(&mut self) -> Result<(), BuilderError> {
        let id = self.alloc(BuilderNode::group());
        self.attach(id)?;
        self.choice_stack.push(id);
        self.add_to_choice_as_child = true;
        self.chain_stack.pop();
        Ok(())
    }

    fn close_group(&mut self, optional: bool) -> Result<(), BuilderError> {
        let group = self.choice_stack.pop().ok_or(BuilderError::UnbalancedGroup)?;
        self.chain_stack.pop();
        self.chain_stack.push(group);

        if optional {
            let node = &mut self.nodes[group];
            node.min_repeat = 0;
            node.max_repeat = 1;
            node.repeat_set = true;
        }
        Ok(())
    }

    fn set_range(&mut self, min: u32, max: u32) -> Result<(), BuilderError> {
        debug_assert!(min <= max && max >= 1, "parser validates range bounds");

        let top = *self
            .chain_stack
            .last()
            .ok_or(BuilderError::RepeatWithoutTarget)?;
        let node = &mut self.nodes[top];
        if node.repeat_set {
            return Err(BuilderError::RepeatAlreadyApplied);
        }
        node.min_repeat = min;
        node.max_repeat = max;
        node.repeat_set = true;
        Ok(())
    }

    // ========================================================================
    // Arena plumbing
    // ========================================================================

    fn alloc(&mut self, node: BuilderNode) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    /// Route a freshly created node per the attachment flag
    fn attach(&mut self, id: usize) -> Result<(), BuilderError> {
        if self.add_to_choice_as_child {
            let group = *self
                .choice_stack
                .last()
                .ok_or(BuilderError::MissingAttachPoint)?;
            self.nodes[group].children.push(id);
        } else {
            let top = *self
                .chain_stack
                .last()
                .ok_or(BuilderError::MissingAttachPoint)?;
            self.nodes[top].next = Some(id);
        }
        Ok(())
    }

    /// Convert arena indices into an owned tree rooted at `index`
    fn reify(&self, index: usize) -> HierarchicalNode {
        let node = &self.nodes[index];
        HierarchicalNode {
            value: node.value.clone(),
            children: node.children.iter().map(|&c| self.reify(c)).collect(),
            next: node.next.map(|n| Box::new(self.reify(n))),
            min_repeat: node.min_repeat,
            max_repeat: node.max_repeat,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::ast::nodes::UNBOUNDED_REPEAT;

    fn word(text: &str) -> BuildEvent {
        BuildEvent::Word(text.to_string())
    }

    fn build(events: Vec<BuildEvent>) -> Result<HierarchicalNode, BuilderError> {
        let mut builder = RuleBuilder::new("test");
        for event in events {
            builder.apply(event)?;
        }
        builder.finish()
    }

    #[test]
    fn test_word_chain() {
        let root = build(vec![word("a"), word("b"), word("c")]).unwrap();
        assert_eq!(root.to_string(), "a b c");
        assert!(root.check_invariants());
    }

    #[test]
    fn test_group_alternatives() {
        let root = build(vec![
            BuildEvent::GroupStart,
            word("a"),
            word("b"),
            BuildEvent::Pipe,
            word("c"),
            BuildEvent::GroupEnd,
        ])
        .unwrap();
        assert_eq!(root.to_string(), "(a b | c)");
    }

    #[test]
    fn test_optional_sets_zero_one() {
        let root = build(vec![
            BuildEvent::OptionalStart,
            word("maybe"),
            BuildEvent::OptionalEnd,
        ])
        .unwrap();
        assert_eq!(root.min_repeat, 0);
        assert_eq!(root.max_repeat, 1);
        assert_eq!(root.to_string(), "[maybe]");
    }

    #[test]
    fn test_group_then_continuation() {
        // (a | b) c — the closed group is still extendable by next
        let root = build(vec![
            BuildEvent::GroupStart,
            word("a"),
            BuildEvent::Pipe,
            word("b"),
            BuildEvent::GroupEnd,
            word("c"),
        ])
        .unwrap();
        assert_eq!(root.to_string(), "(a | b) c");
    }

    #[test]
    fn test_nested_groups() {
        // a (b (c) d)
        let root = build(vec![
            word("a"),
            BuildEvent::GroupStart,
            word("b"),
            BuildEvent::GroupStart,
            word("c"),
            BuildEvent::GroupEnd,
            word("d"),
            BuildEvent::GroupEnd,
        ])
        .unwrap();
        assert_eq!(root.to_string(), "a (b (c) d)");
    }

    #[test]
    fn test_immediately_nested_groups() {
        // ((g)) — inner group is the sole alternative of the outer one
        let root = build(vec![
            BuildEvent::GroupStart,
            BuildEvent::GroupStart,
            word("g"),
            BuildEvent::GroupEnd,
            BuildEvent::GroupEnd,
        ])
        .unwrap();
        assert_eq!(root.to_string(), "((g))");
        assert_eq!(root.children.len(), 1);
        assert_eq!(root.children[0].children.len(), 1);
    }

    #[test]
    fn test_quantifier_applies_to_most_recent_node() {
        let root = build(vec![
            word("a"),
            word("b"),
            BuildEvent::Repeat { min: 3, max: 3 },
        ])
        .unwrap();
        assert_eq!(root.to_string(), "a b{3}");
    }

    #[test]
    fn test_quantifier_on_closed_group() {
        let root = build(vec![
            BuildEvent::GroupStart,
            word("a"),
            BuildEvent::GroupEnd,
            BuildEvent::Repeat {
                min: 0,
                max: UNBOUNDED_REPEAT,
            },
        ])
        .unwrap();
        assert_eq!(root.to_string(), "(a)*");
    }

    #[test]
    fn test_variable_leaf() {
        let root = build(vec![BuildEvent::Variable("target".to_string())]).unwrap();
        assert!(root.is_leaf());
        assert_eq!(root.value, "target");
    }

    #[test]
    fn test_repeat_twice_is_rejected() {
        let mut builder = RuleBuilder::new("test");
        builder.apply(word("a")).unwrap();
        builder.apply(BuildEvent::Repeat { min: 2, max: 2 }).unwrap();
        assert_eq!(
            builder.apply(BuildEvent::Repeat { min: 3, max: 3 }),
            Err(BuilderError::RepeatAlreadyApplied)
        );
    }

    #[test]
    fn test_repeat_after_optional_close_is_rejected() {
        // [x]{2}: the close already applied (0,1)
        let mut builder = RuleBuilder::new("test");
        builder.apply(BuildEvent::OptionalStart).unwrap();
        builder.apply(word("x")).unwrap();
        builder.apply(BuildEvent::OptionalEnd).unwrap();
        assert_eq!(
            builder.apply(BuildEvent::Repeat { min: 2, max: 2 }),
            Err(BuilderError::RepeatAlreadyApplied)
        );
    }

    #[test]
    fn test_unbalanced_close_is_rejected() {
        let mut builder = RuleBuilder::new("test");
        builder.apply(word("a")).unwrap();
        assert_eq!(
            builder.apply(BuildEvent::GroupEnd),
            Err(BuilderError::UnbalancedGroup)
        );
    }

    #[test]
    fn test_finish_with_open_group_is_rejected() {
        let mut builder = RuleBuilder::new("test");
        builder.apply(BuildEvent::GroupStart).unwrap();
        builder.apply(word("a")).unwrap();
        assert_eq!(
            builder.finish(),
            Err(BuilderError::UnclosedGroups { count: 1 })
        );
    }

    #[test]
    fn test_finish_empty_is_rejected() {
        let builder = RuleBuilder::new("test");
        assert_eq!(builder.finish(), Err(BuilderError::EmptyRule));
    }

    #[test]
    fn test_callback_recording() {
        let mut builder = RuleBuilder::new("rule");
        assert_eq!(builder.callback(), "");
        builder.set_callback("on_match");
        assert_eq!(builder.callback(), "on_match");
        assert_eq!(builder.rule_name(), "rule");
    }

    #[test]
    fn test_deep_alternation_mix() {
        // a* (b{3} c+ | (d | e{2,9}) [f]) ((g)) h{3,}
        let root = build(vec![
            word("a"),
            BuildEvent::Repeat {
                min: 0,
                max: UNBOUNDED_REPEAT,
            },
            BuildEvent::GroupStart,
            word("b"),
            BuildEvent::Repeat { min: 3, max: 3 },
            word("c"),
            BuildEvent::Repeat {
                min: 1,
                max: UNBOUNDED_REPEAT,
            },
            BuildEvent::Pipe,
            BuildEvent::GroupStart,
            word("d"),
            BuildEvent::Pipe,
            word("e"),
            BuildEvent::Repeat { min: 2, max: 9 },
            BuildEvent::GroupEnd,
            BuildEvent::OptionalStart,
            word("f"),
            BuildEvent::OptionalEnd,
            BuildEvent::GroupEnd,
            BuildEvent::GroupStart,
            BuildEvent::GroupStart,
            word("g"),
            BuildEvent::GroupEnd,
            BuildEvent::GroupEnd,
            word("h"),
            BuildEvent::Repeat {
                min: 3,
                max: UNBOUNDED_REPEAT,
            },
        ])
        .unwrap();

        assert_eq!(
            root.to_string(),
            "a* (b{3} c+ | (d | e{2,9}) [f]) ((g)) h{3,}"
        );
        assert!(root.check_invariants());
    }
}
