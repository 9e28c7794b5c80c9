use crate::compile::parse::tree::Node;

/// A compiled [`Template`] that can be rendered with a `Context`.
///
/// A `Template` is never modified after it is created, so one instance may
/// be rendered any number of times, from any number of threads.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    /// The Abstract Syntax Tree generated during compilation.
    pub nodes: Vec<Node>,
}

impl Template {
    /// Create a new [`Template`] from parsed nodes.
    #[inline]
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }
}
