//! Block classification and the abstract-class emission policy.

use crate::config::TagConfig;
use crate::scanner::DocBlock;

/// Classification of a completed block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    /// Carries the namespace tag.
    Namespace,
    /// Carries both the class and abstract tags.
    AbstractClass,
    /// Carries the class tag without the abstract tag.
    PlainClass,
    /// Anything else; assumed to document a member of the current class.
    Member,
}

impl BlockKind {
    /// Classify block text. The namespace tag wins over the class tag.
    #[must_use]
    pub fn of(text: &str, tags: &TagConfig) -> Self {
        if text.contains(&tags.namespace) {
            Self::Namespace
        } else if text.contains(&tags.class) {
            if text.contains(&tags.abstract_marker) {
                Self::AbstractClass
            } else {
                Self::PlainClass
            }
        } else {
            Self::Member
        }
    }
}

/// Blocks selected for output by a single classification step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Emission {
    Nothing,
    Block(DocBlock),
    /// An abstract class preceded by its pending namespace block.
    WithNamespace { namespace: DocBlock, class: DocBlock },
}

impl Emission {
    /// The selected blocks, in output order.
    pub fn into_blocks(self) -> impl Iterator<Item = DocBlock> {
        let pair = match self {
            Self::Nothing => [None, None],
            Self::Block(block) => [Some(block), None],
            Self::WithNamespace { namespace, class } => [Some(namespace), Some(class)],
        };
        pair.into_iter().flatten()
    }
}

/// Class context carried between blocks: whether the most recent class block
/// was abstract, and the namespace block waiting for one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassContext {
    in_abstract_class: bool,
    pending_namespace: Option<DocBlock>,
}

impl ClassContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn in_abstract_class(&self) -> bool {
        self.in_abstract_class
    }

    #[must_use]
    pub fn pending_namespace(&self) -> Option<&DocBlock> {
        self.pending_namespace.as_ref()
    }

    /// Classify `block`, update the context, and return what to emit.
    pub fn accept(&mut self, block: DocBlock, tags: &TagConfig) -> Emission {
        match BlockKind::of(&block.text, tags) {
            BlockKind::Namespace => {
                self.pending_namespace = Some(block);
                self.in_abstract_class = false;
                Emission::Nothing
            }
            BlockKind::AbstractClass => {
                self.in_abstract_class = true;
                match self.pending_namespace.take() {
                    Some(namespace) => Emission::WithNamespace {
                        namespace,
                        class: block,
                    },
                    None => Emission::Block(block),
                }
            }
            BlockKind::PlainClass => {
                self.in_abstract_class = false;
                Emission::Nothing
            }
            BlockKind::Member if self.in_abstract_class => Emission::Block(block),
            BlockKind::Member => Emission::Nothing,
        }
    }
}
