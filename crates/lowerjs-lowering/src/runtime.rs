//! Names of the runtime helpers that lowered code calls into.

use lowerjs_ast::{NodeArena, NodeIndex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeHelper {
    /// `createClass(members, superClassOrNull, hasConstructor, hasExtends)`
    CreateClass,
    /// `superCall(receiver, classRef, memberName, args)`
    SuperCall,
    /// `superGet(receiver, classRef, memberName)`
    SuperGet,
    /// `superSet(receiver, classRef, memberName, value)`
    SuperSet,
}

impl RuntimeHelper {
    pub const fn name(self) -> &'static str {
        match self {
            RuntimeHelper::CreateClass => "createClass",
            RuntimeHelper::SuperCall => "superCall",
            RuntimeHelper::SuperGet => "superGet",
            RuntimeHelper::SuperSet => "superSet",
        }
    }
}

/// The runtime helper namespace, e.g. `$runtime`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Runtime {
    namespace: String,
}

impl Runtime {
    pub fn new(namespace: impl Into<String>) -> Self {
        Runtime {
            namespace: namespace.into(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Build `<namespace>.<helper>`.
    pub fn helper(&self, arena: &mut NodeArena, helper: RuntimeHelper) -> NodeIndex {
        let namespace = arena.id(self.namespace.as_str());
        arena.member(namespace, helper.name())
    }
}
