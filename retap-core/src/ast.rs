//! Statement model for callback bodies
//!
//! The callback body is lowered into a flat arena of statement nodes addressed
//! by index. Two shapes are recognized: a null-guard conditional on one of the
//! two callback parameters, and everything else. Classification then assigns
//! every node to exactly one of three buckets.

/// Index of a statement in a [`StmtArena`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StmtId(pub usize);

/// Which callback parameter a guard compares against null
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Param {
    /// The success parameter (first lambda parameter)
    Value,
    /// The error parameter (second lambda parameter)
    Error,
}

/// Direction of the null comparison in a guard condition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    /// `param != null`
    NotNull,
    /// `param == null`
    IsNull,
}

/// A recognized statement shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    /// Any statement that is not a recognized guard conditional.
    /// Reference flags are precomputed against the parameter bindings.
    Plain { refs_value: bool, refs_error: bool },
    /// `if` statement whose condition is a direct null comparison on one of
    /// the two callback parameters. Branch statements are always `Plain`.
    Guard {
        param: Param,
        polarity: Polarity,
        then_branch: Vec<StmtId>,
        else_branch: Option<Vec<StmtId>>,
    },
}

/// A statement node: shape plus the byte range it covers in the source
#[derive(Debug, Clone)]
pub struct StmtNode {
    pub stmt: Stmt,
    /// Start byte offset in the original source
    pub start: usize,
    /// End byte offset (exclusive)
    pub end: usize,
}

/// Arena of statement nodes for one callback body
#[derive(Debug, Default)]
pub struct StmtArena {
    nodes: Vec<StmtNode>,
}

impl StmtArena {
    pub fn new() -> Self {
        StmtArena { nodes: Vec::new() }
    }

    pub fn alloc(&mut self, node: StmtNode) -> StmtId {
        let id = StmtId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    pub fn get(&self, id: StmtId) -> &StmtNode {
        &self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// One of the three disjoint statement-list targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    Value,
    Error,
    Finally,
}

/// The classifier's output: three ordered statement lists
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Buckets {
    pub value: Vec<StmtId>,
    pub error: Vec<StmtId>,
    pub finally: Vec<StmtId>,
}

impl Buckets {
    pub fn new() -> Self {
        Buckets::default()
    }

    pub fn push(&mut self, bucket: Bucket, id: StmtId) {
        match bucket {
            Bucket::Value => self.value.push(id),
            Bucket::Error => self.error.push(id),
            Bucket::Finally => self.finally.push(id),
        }
    }

    /// Total number of statements across all three buckets
    pub fn total(&self) -> usize {
        self.value.len() + self.error.len() + self.finally.len()
    }
}
