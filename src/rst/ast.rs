//! Abstract Syntax Tree definitions for rST documents
//!
//!     The tree is stored in an arena. Every node is registered exactly once with the
//!     [Registrar], which hands out a [NodeId] in construction order and records the parent
//!     link of every child it is given. Children are owned by their parent's child list; the
//!     parent link is a plain id used only for upward and sibling lookups.
//!
//!     Construction is bottom-up: a parser builds the children first, then registers the
//!     parent with those ids. So ids reflect construction order, which is close to document
//!     order but not equal to it (children always have lower ids than their parent).
//!
//! Node kinds
//!
//!     [NodeKind] is a closed sum type. Each variant carries only its own payload (see
//!     [elements]); the shared envelope (id, span, children, parent) lives on [Node].
//!     Consumers dispatch with an exhaustive `match`, so adding a kind is a compile-time
//!     checked change.
//!
//!     Some payloads point at nodes that are also in the child list, e.g. the term of a
//!     definition list item or the config field list of a directive. The rule is that a
//!     node's child list always holds every node it owns, in document order; payload ids
//!     only tag the role a child plays.
//!
//! Traversal
//!
//!     [Document] answers document-order questions: [Document::next_in_tree] and
//!     [Document::prev_in_tree] walk the flattened pre-order sequence, crossing out of a
//!     subtree into the ancestors' siblings. The root is a sentinel: nothing comes after
//!     the last leaf and nothing comes before the root.

pub mod elements;
pub mod node;
pub mod registrar;
pub mod snapshot;
pub mod span;
pub mod traits;

pub use elements::{
    is_sequential_bullet, CitationDef, CommandOption, Comment, DefinitionListItem, Directive,
    DoctestBlock, DocumentRoot, EnumeratedList, EnumeratedListType, FieldListItem,
    FootnoteDef, FootnoteLabel, HyperlinkRef, HyperlinkTarget, InlineText, InterpretedText,
    ListItem, LiteralBlock, OptionListItem, Section, SubstitutionDef, Table, TableCell,
    TableRow,
};
pub use node::{Node, NodeId, NodeKind, NodeType};
pub use registrar::{Document, Registrar};
pub use snapshot::{snapshot_from_document, snapshot_node, AstSnapshot};
pub use span::Span;
pub use traits::{walk, Visitor};
