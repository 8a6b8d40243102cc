//! Node-kind-specific payloads
//!
//! Every struct here is carried by one [NodeKind](super::NodeKind) variant. Shared fields
//! (identity, span, children, parent) are not repeated; they live on [Node](super::Node).
//! Payload fields of type [NodeId](super::NodeId) tag the role of a node that is already in
//! the owner's child list.

pub mod blocks;
pub mod explicit;
pub mod inlines;
pub mod lists;
pub mod tables;

pub use blocks::{DoctestBlock, DocumentRoot, LiteralBlock, Section};
pub use explicit::{
    CitationDef, Comment, Directive, FootnoteDef, FootnoteLabel, HyperlinkTarget,
    SubstitutionDef,
};
pub use inlines::{HyperlinkRef, InlineText, InterpretedText};
pub use lists::{
    is_sequential_bullet, CommandOption, DefinitionListItem, EnumeratedList,
    EnumeratedListType, FieldListItem, ListItem, OptionListItem,
};
pub use tables::{Table, TableCell, TableRow};
