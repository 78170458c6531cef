//! Namespace tree construction.
//!
//! Function identifiers such as `users/get.js:byId` are split into path
//! segments (`Users`, `Get`, `ById`). All but the last segment are nested
//! containers; the last is the function binding.

use crate::naming::capitalize;
use crate::rust::functions::FunctionBinding;
use convexgen_schema::{Catalog, FunctionDescriptor, FunctionKind};
use indexmap::IndexMap;
use std::cmp::Reverse;
use tracing::debug;

/// Name of the root namespace.
pub const ROOT_NAMESPACE: &str = "Api";

/// A namespace: functions first, then nested namespaces.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Namespace {
    /// Capitalized path segment.
    pub name: String,
    /// Functions in schema order.
    pub functions: Vec<FunctionBinding>,
    /// Child namespaces in creation order.
    pub namespaces: Vec<Namespace>,
}

impl Namespace {
    /// Returns the number of functions in this namespace and below.
    #[must_use]
    pub fn function_count(&self) -> usize {
        self.functions.len()
            + self
                .namespaces
                .iter()
                .map(Namespace::function_count)
                .sum::<usize>()
    }

    /// Returns the child namespace called `name`.
    #[must_use]
    pub fn namespace(&self, name: &str) -> Option<&Namespace> {
        self.namespaces.iter().find(|child| child.name == name)
    }

    /// Returns the function called `name`.
    #[must_use]
    pub fn function(&self, name: &str) -> Option<&FunctionBinding> {
        self.functions.iter().find(|function| function.name == name)
    }
}

/// Container under construction.
struct Node {
    name: String,
    parent: Option<usize>,
    depth: usize,
    functions: Vec<FunctionBinding>,
    namespaces: Vec<Namespace>,
}

/// The namespace hierarchy of all public functions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceTree {
    /// Root namespace.
    pub root: Namespace,
}

impl NamespaceTree {
    /// Builds the tree from public RPC descriptors.
    ///
    /// Internal functions and HTTP actions are skipped.
    pub fn build<'a>(descriptors: impl IntoIterator<Item = &'a FunctionDescriptor>) -> Self {
        let mut arena: IndexMap<String, Node> = IndexMap::new();
        let mut root_functions = Vec::new();

        for descriptor in descriptors {
            if !descriptor.is_public() || descriptor.kind == FunctionKind::HttpAction {
                continue;
            }
            let segments = path_segments(&descriptor.identifier);
            let Some((leaf, containers)) = segments.split_last() else {
                continue;
            };

            let mut parent = None;
            for (depth, segment) in containers.iter().enumerate() {
                let key = containers[..=depth].join(".");
                let index = match arena.get_index_of(&key) {
                    Some(index) => index,
                    None => {
                        let node = Node {
                            name: segment.clone(),
                            parent,
                            depth,
                            functions: Vec::new(),
                            namespaces: Vec::new(),
                        };
                        arena.insert_full(key, node).0
                    }
                };
                parent = Some(index);
            }

            debug!(identifier = %descriptor.identifier, kind = descriptor.kind.as_str(), "binding function");
            let binding = FunctionBinding::synthesize(leaf.clone(), descriptor);
            match parent {
                Some(index) => arena[index].functions.push(binding),
                None => root_functions.push(binding),
            }
        }

        let mut root = Namespace {
            name: ROOT_NAMESPACE.to_string(),
            functions: root_functions,
            namespaces: Vec::new(),
        };

        // Deepest first, so every container is complete before its parent.
        let depths: Vec<usize> = arena.values().map(|node| node.depth).collect();
        let mut nodes: Vec<Option<Node>> = arena.into_values().map(Some).collect();
        let mut order: Vec<usize> = (0..nodes.len()).collect();
        order.sort_by_key(|&index| Reverse(depths[index]));

        for index in order {
            let Some(node) = nodes[index].take() else {
                continue;
            };
            let namespace = Namespace {
                name: node.name,
                functions: node.functions,
                namespaces: node.namespaces,
            };
            match node.parent.and_then(|parent| nodes[parent].as_mut()) {
                Some(parent) => parent.namespaces.push(namespace),
                None => root.namespaces.push(namespace),
            }
        }

        Self { root }
    }

    /// Builds the tree from a fetched catalog.
    #[must_use]
    pub fn from_catalog(catalog: &Catalog) -> Self {
        Self::build(catalog.descriptors())
    }

    /// Returns the number of bound functions.
    #[must_use]
    pub fn function_count(&self) -> usize {
        self.root.function_count()
    }
}

/// Splits a function identifier into capitalized path segments.
///
/// `users/get.js:byId` yields `["Users", "Get", "ById"]`.
#[must_use]
pub fn path_segments(identifier: &str) -> Vec<String> {
    let (module, function) = match identifier.split_once(':') {
        Some((module, function)) => (module, Some(function)),
        None => (identifier, None),
    };
    let module = module.strip_suffix(".js").unwrap_or(module);
    module
        .split('/')
        .chain(function)
        .filter(|segment| !segment.is_empty())
        .map(capitalize)
        .collect()
}
