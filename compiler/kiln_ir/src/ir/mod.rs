//! Statement IR of compiled functions.
//!
//! A [`FunctionIr`] owns two arenas: statements and terminals. Statements
//! reference terminals and other statements (jump targets, inline
//! statements) by index only. Execution order is given by
//! `linear_execution`, a list of per-node statement groups.
//!
//! # Architecture
//!
//! ```text
//! UnitIr ── functions: [FunctionIr]
//!              ├─ statements: [Statement]   ← StmtId
//!              ├─ terms:      [Terminal]    ← TermId
//!              └─ linear_execution: [NodeStatements { statements: [StmtId] }]
//! ```

use smallvec::SmallVec;

use crate::{FieldId, FunctionId, Name, TypeId, Value, ValueType};

index_newtype! {
    /// Index into a function's statement arena.
    StmtId
}

index_newtype! {
    /// Index into a function's terminal arena.
    TermId
}

// Statements

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum StatementKind {
    Nop,
    Call,
    CallDelegate,
    Assign,
    AssignOnPersistentFrame,
    CompileError(String),
    PushState,
    Return,
    EndOfThread,
    EndOfThreadIfNot,
    UnconditionalGoto,
    GotoIfNot,
    ComputedGoto,
    GotoReturn,
    GotoReturnIfNot,
    DynamicCast,
    MetaCast,
    ObjectToInterface,
    InterfaceToObject,
    InterfaceToInterface,
    ObjectToBool,
    AddMulticastDelegate,
    RemoveMulticastDelegate,
    ClearMulticastDelegate,
    BindDelegate,
    CreateContainer,
    SwitchOnValue,
    Comment(String),
    DebugSite,
    WireTraceSite,
}

impl StatementKind {
    /// Kind name used in diagnostics.
    pub fn label(&self) -> &'static str {
        match self {
            StatementKind::Nop => "Nop",
            StatementKind::Call => "Call",
            StatementKind::CallDelegate => "CallDelegate",
            StatementKind::Assign => "Assign",
            StatementKind::AssignOnPersistentFrame => "AssignOnPersistentFrame",
            StatementKind::CompileError(_) => "CompileError",
            StatementKind::PushState => "PushState",
            StatementKind::Return => "Return",
            StatementKind::EndOfThread => "EndOfThread",
            StatementKind::EndOfThreadIfNot => "EndOfThreadIfNot",
            StatementKind::UnconditionalGoto => "UnconditionalGoto",
            StatementKind::GotoIfNot => "GotoIfNot",
            StatementKind::ComputedGoto => "ComputedGoto",
            StatementKind::GotoReturn => "GotoReturn",
            StatementKind::GotoReturnIfNot => "GotoReturnIfNot",
            StatementKind::DynamicCast => "DynamicCast",
            StatementKind::MetaCast => "MetaCast",
            StatementKind::ObjectToInterface => "ObjectToInterface",
            StatementKind::InterfaceToObject => "InterfaceToObject",
            StatementKind::InterfaceToInterface => "InterfaceToInterface",
            StatementKind::ObjectToBool => "ObjectToBool",
            StatementKind::AddMulticastDelegate => "AddMulticastDelegate",
            StatementKind::RemoveMulticastDelegate => "RemoveMulticastDelegate",
            StatementKind::ClearMulticastDelegate => "ClearMulticastDelegate",
            StatementKind::BindDelegate => "BindDelegate",
            StatementKind::CreateContainer => "CreateContainer",
            StatementKind::SwitchOnValue => "SwitchOnValue",
            StatementKind::Comment(_) => "Comment",
            StatementKind::DebugSite => "DebugSite",
            StatementKind::WireTraceSite => "WireTraceSite",
        }
    }

    /// Transfers control somewhere other than the next statement.
    pub fn is_jump(&self) -> bool {
        matches!(
            self,
            StatementKind::UnconditionalGoto
                | StatementKind::GotoIfNot
                | StatementKind::ComputedGoto
                | StatementKind::GotoReturn
                | StatementKind::GotoReturnIfNot
                | StatementKind::PushState
                | StatementKind::EndOfThread
                | StatementKind::EndOfThreadIfNot
        )
    }

    /// Needs the explicit execution stack.
    pub fn uses_flow_stack(&self) -> bool {
        matches!(
            self,
            StatementKind::PushState | StatementKind::EndOfThread | StatementKind::EndOfThreadIfNot
        )
    }
}

#[derive(Clone, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Statement {
    pub kind: StatementKind,
    pub lhs: Option<TermId>,
    pub rhs: SmallVec<[TermId; 4]>,
    /// Object a call is made on, or the delegate being broadcast.
    pub context: Option<TermId>,
    pub function: Option<FunctionId>,
    /// Jump target in the same function; for calls into the ubergraph, the
    /// entry label in the ubergraph.
    pub target: Option<StmtId>,
    pub is_jump_target: bool,
    pub is_parent_call: bool,
    /// Argument of a call that receives the resume state.
    pub ubergraph_call_index: Option<usize>,
}

impl Statement {
    pub fn new(kind: StatementKind) -> Self {
        Self {
            kind,
            lhs: None,
            rhs: SmallVec::new(),
            context: None,
            function: None,
            target: None,
            is_jump_target: false,
            is_parent_call: false,
            ubergraph_call_index: None,
        }
    }

    #[must_use]
    pub fn lhs(mut self, term: TermId) -> Self {
        self.lhs = Some(term);
        self
    }

    #[must_use]
    pub fn rhs(mut self, terms: impl IntoIterator<Item = TermId>) -> Self {
        self.rhs = terms.into_iter().collect();
        self
    }

    #[must_use]
    pub fn context(mut self, term: TermId) -> Self {
        self.context = Some(term);
        self
    }

    #[must_use]
    pub fn function(mut self, func: FunctionId) -> Self {
        self.function = Some(func);
        self
    }

    #[must_use]
    pub fn target(mut self, stmt: StmtId) -> Self {
        self.target = Some(stmt);
        self
    }

    #[must_use]
    pub fn jump_target(mut self) -> Self {
        self.is_jump_target = true;
        self
    }

    #[must_use]
    pub fn parent_call(mut self) -> Self {
        self.is_parent_call = true;
        self
    }

    #[must_use]
    pub fn ubergraph_call_index(mut self, index: usize) -> Self {
        self.ubergraph_call_index = Some(index);
        self
    }
}

// Terminals

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum TerminalKind {
    Literal(Value),
    /// A field, or a local variable when `field` is `None`.
    Reference { field: Option<FieldId> },
    /// Value of a nested statement rendered as an expression.
    Inline(StmtId),
    SelfRef,
}

#[derive(Clone, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Terminal {
    pub kind: TerminalKind,
    pub ty: ValueType,
    /// Emitted name of the field or local.
    pub name: Name,
    /// Object or struct the reference is read from.
    pub context: Option<TermId>,
}

impl Terminal {
    #[inline]
    pub fn is_self(&self) -> bool {
        matches!(self.kind, TerminalKind::SelfRef)
    }

    #[inline]
    pub fn is_literal(&self) -> bool {
        matches!(self.kind, TerminalKind::Literal(_))
    }
}

// Functions

/// Statements produced for one graph node.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeStatements {
    pub statements: Vec<StmtId>,
}

#[derive(Clone, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct LocalDecl {
    pub name: Name,
    pub ty: ValueType,
}

#[derive(Clone, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct FunctionIr {
    pub name: Name,
    /// Declared signature on the owning class.
    pub function: FunctionId,
    pub is_ubergraph: bool,
    pub statements: Vec<Statement>,
    pub terms: Vec<Terminal>,
    pub locals: Vec<LocalDecl>,
    pub linear_execution: Vec<NodeStatements>,
}

impl FunctionIr {
    pub fn new(name: Name, function: FunctionId) -> Self {
        Self {
            name,
            function,
            is_ubergraph: false,
            statements: Vec::new(),
            terms: Vec::new(),
            locals: Vec::new(),
            linear_execution: Vec::new(),
        }
    }

    #[inline]
    pub fn stmt(&self, id: StmtId) -> &Statement {
        &self.statements[id.index()]
    }

    #[inline]
    pub fn term(&self, id: TermId) -> &Terminal {
        &self.terms[id.index()]
    }

    /// Allocate a statement without scheduling it.
    ///
    /// # Panics
    /// Panics if the statement arena outgrows `u32`.
    pub fn alloc_stmt(&mut self, stmt: Statement) -> StmtId {
        let id = StmtId::from_usize(self.statements.len());
        self.statements.push(stmt);
        id
    }

    /// # Panics
    /// Panics if the terminal arena outgrows `u32`.
    pub fn alloc_term(&mut self, term: Terminal) -> TermId {
        let id = TermId::from_usize(self.terms.len());
        self.terms.push(term);
        id
    }

    /// Schedule a node's statements at the end of the execution list.
    pub fn push_node(&mut self, statements: Vec<StmtId>) {
        self.linear_execution.push(NodeStatements { statements });
    }

    /// Allocate a statement and schedule it as its own node.
    pub fn push_stmt(&mut self, stmt: Statement) -> StmtId {
        let id = self.alloc_stmt(stmt);
        self.push_node(vec![id]);
        id
    }

    /// Statements in execution order.
    pub fn execution_order(&self) -> impl Iterator<Item = StmtId> + '_ {
        self.linear_execution
            .iter()
            .flat_map(|node| node.statements.iter().copied())
    }

    pub fn literal(&mut self, ty: ValueType, value: Value) -> TermId {
        self.alloc_term(Terminal {
            kind: TerminalKind::Literal(value),
            ty,
            name: Name::EMPTY,
            context: None,
        })
    }

    pub fn field_ref(
        &mut self,
        field: FieldId,
        name: Name,
        ty: ValueType,
        context: Option<TermId>,
    ) -> TermId {
        self.alloc_term(Terminal {
            kind: TerminalKind::Reference { field: Some(field) },
            ty,
            name,
            context,
        })
    }

    /// Reference to a local, declared once in `locals`.
    pub fn local(&mut self, name: Name, ty: ValueType) -> TermId {
        if !self.locals.iter().any(|l| l.name == name) {
            self.locals.push(LocalDecl { name, ty });
        }
        self.alloc_term(Terminal {
            kind: TerminalKind::Reference { field: None },
            ty,
            name,
            context: None,
        })
    }

    pub fn self_ref(&mut self, class: TypeId) -> TermId {
        self.alloc_term(Terminal {
            kind: TerminalKind::SelfRef,
            ty: ValueType::self_ref(class),
            name: Name::EMPTY,
            context: None,
        })
    }

    pub fn inline(&mut self, stmt: StmtId, ty: ValueType) -> TermId {
        self.alloc_term(Terminal {
            kind: TerminalKind::Inline(stmt),
            ty,
            name: Name::EMPTY,
            context: None,
        })
    }
}

/// One compilation unit: a type and the functions compiled for it.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitIr {
    pub ty: TypeId,
    pub functions: Vec<FunctionIr>,
}

impl UnitIr {
    pub fn new(ty: TypeId) -> Self {
        Self {
            ty,
            functions: Vec::new(),
        }
    }

    pub fn ubergraph(&self) -> Option<&FunctionIr> {
        self.functions.iter().find(|f| f.is_ubergraph)
    }
}
