//! Arena-backed document tree.
//!
//! Nodes live in a single `Vec` owned by [`Document`] and refer to each other by
//! [`NodeId`]. A node's children are owned through that arena; the parent link is a
//! plain index used for upward walks only. Index 0 is always the root.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Ordered,
    Unordered,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FootnoteKind {
    /// `[fn:label]`, content comes from a definition elsewhere.
    Numbered,
    /// `[fn::text]`
    InlineAnonymous,
    /// `[fn:label:text]`
    InlineLabeled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Headline {
    /// Number of leading asterisks, 1 through 6.
    pub depth: usize,
    pub keyword: Option<String>,
    pub priority: Option<char>,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GreaterBlock {
    /// Upper-cased block name, `SRC` for `#+BEGIN_src`.
    pub name: String,
    /// Only set for `SRC` blocks.
    pub language: Option<String>,
    /// Everything after the name on the BEGIN line, trimmed.
    pub parameters: String,
    /// Verbatim body, starting with the BEGIN line's newline.
    pub value: String,
}

impl GreaterBlock {
    /// Blocks whose body is kept verbatim and never parsed.
    pub fn is_verbatim(&self) -> bool {
        matches!(self.name.as_str(), "SRC" | "EXAMPLE" | "EXPORT" | "COMMENT")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Root,
    Section,
    Headline(Headline),
    Paragraph,
    List(ListKind),
    ListItem,
    Table,
    TableRow { is_rule: bool },
    TableCell,
    GreaterBlock(GreaterBlock),
    FixedWidth { value: String },
    Keyword { key: String, value: String },
    HorizontalRule,
    Link { target: String },
    FootnoteReference { label: String, kind: FootnoteKind },
    FootnoteDefinition { label: String },
    Text(String),
    Bold,
    Italic,
    Verbatim,
    Code,
    Underline,
    Strikethrough,
    EnDash,
    MDash,
}

impl NodeKind {
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Root => "Root",
            NodeKind::Section => "Section",
            NodeKind::Headline(_) => "Headline",
            NodeKind::Paragraph => "Paragraph",
            NodeKind::List(_) => "List",
            NodeKind::ListItem => "ListItem",
            NodeKind::Table => "Table",
            NodeKind::TableRow { .. } => "TableRow",
            NodeKind::TableCell => "TableCell",
            NodeKind::GreaterBlock(_) => "GreaterBlock",
            NodeKind::FixedWidth { .. } => "FixedWidth",
            NodeKind::Keyword { .. } => "Keyword",
            NodeKind::HorizontalRule => "HorizontalRule",
            NodeKind::Link { .. } => "Link",
            NodeKind::FootnoteReference { .. } => "FootnoteReference",
            NodeKind::FootnoteDefinition { .. } => "FootnoteDefinition",
            NodeKind::Text(_) => "Text",
            NodeKind::Bold => "Bold",
            NodeKind::Italic => "Italic",
            NodeKind::Verbatim => "Verbatim",
            NodeKind::Code => "Code",
            NodeKind::Underline => "Underline",
            NodeKind::Strikethrough => "Strikethrough",
            NodeKind::EnDash => "EnDash",
            NodeKind::MDash => "MDash",
        }
    }

    /// Inline spans, as opposed to line-granular blocks.
    pub fn is_inline(&self) -> bool {
        matches!(
            self,
            NodeKind::Text(_)
                | NodeKind::Bold
                | NodeKind::Italic
                | NodeKind::Verbatim
                | NodeKind::Code
                | NodeKind::Underline
                | NodeKind::Strikethrough
                | NodeKind::EnDash
                | NodeKind::MDash
                | NodeKind::Link { .. }
                | NodeKind::FootnoteReference { .. }
        )
    }

    /// Nodes whose non-headline content is wrapped in a `Section`.
    pub fn holds_sections(&self) -> bool {
        matches!(self, NodeKind::Root | NodeKind::Headline(_))
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())?;
        match self {
            NodeKind::Headline(h) => {
                write!(f, " depth={}", h.depth)?;
                if let Some(keyword) = &h.keyword {
                    write!(f, " keyword={keyword}")?;
                }
                if let Some(priority) = h.priority {
                    write!(f, " priority={priority}")?;
                }
                if !h.tags.is_empty() {
                    write!(f, " tags={}", h.tags.join(":"))?;
                }
                Ok(())
            }
            NodeKind::List(kind) => write!(f, " {kind:?}"),
            NodeKind::TableRow { is_rule: true } => f.write_str(" rule"),
            NodeKind::GreaterBlock(block) => {
                write!(f, " {}", block.name)?;
                if let Some(language) = &block.language {
                    write!(f, " language={language}")?;
                }
                write!(f, " {:?}", block.value)
            }
            NodeKind::FixedWidth { value } => write!(f, " {value:?}"),
            NodeKind::Keyword { key, value } => write!(f, " {key} {value:?}"),
            NodeKind::Link { target } => write!(f, " {target:?}"),
            NodeKind::FootnoteReference { label, kind } => write!(f, " {label:?} {kind:?}"),
            NodeKind::FootnoteDefinition { label } => write!(f, " {label:?}"),
            NodeKind::Text(text) => write!(f, " {text:?}"),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// A parsed document. Owns every node; dropping it drops the whole tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    nodes: Vec<NodeData>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            nodes: vec![NodeData {
                kind: NodeKind::Root,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    pub fn root_id(&self) -> NodeId {
        NodeId(0)
    }

    pub fn root(&self) -> NodeRef<'_> {
        self.node(self.root_id())
    }

    pub fn node(&self, id: NodeId) -> NodeRef<'_> {
        NodeRef { doc: self, id }
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.0].kind
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].children.last().copied()
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes[0].children.is_empty()
    }

    /// Appends a new node as the last child of `parent` and returns its id.
    pub fn append(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        debug_assert!(parent.0 < self.nodes.len(), "append to unknown node");
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            kind,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    pub fn append_text(&mut self, parent: NodeId, text: impl Into<String>) -> NodeId {
        self.append(parent, NodeKind::Text(text.into()))
    }

    /// Structural outline of the tree, one node per line, two spaces per level.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        self.dump_node(self.root_id(), 0, &mut out);
        out
    }

    fn dump_node(&self, id: NodeId, level: usize, out: &mut String) {
        out.push_str(&"  ".repeat(level));
        out.push_str(&self.kind(id).to_string());
        out.push('\n');
        for &child in self.children(id) {
            self.dump_node(child, level + 1, out);
        }
    }
}

/// Borrowed view of a node for read-only traversal.
#[derive(Clone, Copy)]
pub struct NodeRef<'d> {
    doc: &'d Document,
    id: NodeId,
}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.kind(), self.id.0)
    }
}

impl PartialEq for NodeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.doc, other.doc) && self.id == other.id
    }
}

impl<'d> NodeRef<'d> {
    pub fn id(self) -> NodeId {
        self.id
    }

    pub fn document(self) -> &'d Document {
        self.doc
    }

    pub fn kind(self) -> &'d NodeKind {
        self.doc.kind(self.id)
    }

    pub fn parent(self) -> Option<NodeRef<'d>> {
        self.doc.parent(self.id).map(|id| self.doc.node(id))
    }

    pub fn children(self) -> impl DoubleEndedIterator<Item = NodeRef<'d>> + 'd {
        let doc = self.doc;
        doc.children(self.id).iter().map(move |&id| doc.node(id))
    }

    pub fn first_child(self) -> Option<NodeRef<'d>> {
        self.children().next()
    }

    /// Parent, grandparent and so on up to the root.
    pub fn ancestors(self) -> impl Iterator<Item = NodeRef<'d>> + 'd {
        std::iter::successors(self.parent(), |node| node.parent())
    }

    /// Every node below this one in document (pre-)order.
    pub fn descendants(self) -> Vec<NodeRef<'d>> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeRef<'d>> = self.children().rev().collect();
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(node.children().rev());
        }
        out
    }

    /// Leading inline children of a headline.
    pub fn title(self) -> impl Iterator<Item = NodeRef<'d>> + 'd {
        self.children().take_while(|child| child.kind().is_inline())
    }

    /// Non-title children: nested sections and headlines for a headline, every child
    /// for other nodes.
    pub fn body(self) -> impl Iterator<Item = NodeRef<'d>> + 'd {
        let skip_title = matches!(self.kind(), NodeKind::Headline(_));
        self.children()
            .skip_while(move |child| skip_title && child.kind().is_inline())
    }

    /// Concatenated leaf text of this subtree, in document order.
    pub fn raw_text(self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self.kind() {
            NodeKind::Text(text) => out.push_str(text),
            NodeKind::EnDash => out.push_str("--"),
            NodeKind::MDash => out.push_str("---"),
            NodeKind::GreaterBlock(block) => out.push_str(&block.value),
            NodeKind::FixedWidth { value } | NodeKind::Keyword { value, .. } => {
                out.push_str(value)
            }
            NodeKind::Link { target } if self.doc.children(self.id).is_empty() => {
                out.push_str(target)
            }
            _ => {
                for child in self.children() {
                    child.collect_text(out);
                }
            }
        }
    }
}
