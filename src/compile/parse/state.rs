use crate::{
    compile::parse::tree::{Argument, Block, Body, Node},
    region::Region,
};

/// An open block that the `Parser` is collecting nodes for.
#[derive(Debug)]
pub struct State {
    /// Name of the tag that opened the block.
    pub name: String,
    /// Arguments of the opening tag.
    pub args: Vec<Argument>,
    /// Region of the opening tag.
    pub region: Region,
    /// Nodes before `else`.
    pub nodes: Vec<Node>,
    /// Nodes after `else`, once it has been seen.
    pub alternate: Option<Vec<Node>>,
    /// True if this block was opened by `elsif` and closes with its parent.
    pub chained: bool,
}

impl State {
    /// Create a new [`State`] for a block opened with the given tag.
    pub fn new(name: String, args: Vec<Argument>, region: Region, chained: bool) -> Self {
        Self {
            name,
            args,
            region,
            nodes: vec![],
            alternate: None,
            chained,
        }
    }

    /// Return the nodes that new nodes are currently added to.
    pub fn target(&mut self) -> &mut Vec<Node> {
        match &mut self.alternate {
            Some(alternate) => alternate,
            None => &mut self.nodes,
        }
    }

    /// Close the block at the given [`Region`] of the end tag.
    pub fn into_block(self, end: Region) -> Block {
        Block {
            name: self.name,
            args: self.args,
            body: Body {
                nodes: self.nodes,
                alternate: self.alternate,
            },
            region: self.region.combine(end),
        }
    }
}
