//! Registry of completed analyses
//!
//! One [`MethodAnalysis`] per method, registered once and queried many times. The pool is an
//! ordinary value, so callers decide its lifetime and how it is shared; nothing here is global.
//! Methods are keyed within their class by name plus descriptor, so overloads never collide.

use crate::analysis::MethodAnalysis;
use crate::bytecode::{MethodRef, RenderDescriptor};
use crate::errors::{AnalysisError, Result};
use crate::graph::{BasicBlockGraph, ControlFlowGraph};
use std::collections::HashMap;

/// Key of a method within its class: the name immediately followed by the descriptor
pub fn method_key(method: &MethodRef) -> String {
    format!("{}{}", method.method_name, method.descriptor.render())
}

#[derive(Default)]
pub struct AnalysisPool {
    by_class: HashMap<String, HashMap<String, MethodAnalysis>>,
}

impl AnalysisPool {
    pub fn new() -> AnalysisPool {
        AnalysisPool::default()
    }

    /// Stores a completed analysis. Registration is write-once: a second analysis for the same
    /// method is rejected and the first one stays.
    pub fn register(&mut self, analysis: MethodAnalysis) -> Result<()> {
        let class_name = analysis.method().class_name.clone();
        let key = method_key(analysis.method());
        let methods = self.by_class.entry(class_name).or_default();
        if methods.contains_key(&key) {
            return Err(AnalysisError::AlreadyRegistered {
                class_name: analysis.method().class_name.clone(),
                method_name: key,
            });
        }
        log::trace!("registered analysis of {}", analysis.method());
        methods.insert(key, analysis);
        Ok(())
    }

    pub fn get(&self, class_name: &str, method: &str) -> Option<&MethodAnalysis> {
        self.by_class.get(class_name)?.get(method)
    }

    pub fn get_for(&self, method: &MethodRef) -> Option<&MethodAnalysis> {
        self.get(&method.class_name, &method_key(method))
    }

    pub fn contains(&self, method: &MethodRef) -> bool {
        self.get_for(method).is_some()
    }

    /// Control-flow graph of a registered method
    pub fn cfg(&self, class_name: &str, method: &str) -> Option<&ControlFlowGraph> {
        self.get(class_name, method).map(MethodAnalysis::cfg)
    }

    /// Basic-block graph of a registered method
    pub fn block_graph(&self, class_name: &str, method: &str) -> Option<&BasicBlockGraph> {
        self.get(class_name, method).map(MethodAnalysis::blocks)
    }

    pub fn len(&self) -> usize {
        self.by_class.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_class.values().all(HashMap::is_empty)
    }

    /// Drops every registered analysis
    pub fn clear(&mut self) {
        self.by_class.clear();
    }

    /// Drops all analyses of one class; reports how many there were
    pub fn clear_class(&mut self, class_name: &str) -> usize {
        self.by_class
            .remove(class_name)
            .map(|methods| methods.len())
            .unwrap_or(0)
    }

    /// Drops a single analysis; `false` when none was registered
    pub fn clear_method(&mut self, class_name: &str, method: &str) -> bool {
        match self.by_class.get_mut(class_name) {
            Some(methods) => methods.remove(method).is_some(),
            None => false,
        }
    }
}
