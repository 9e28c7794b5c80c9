use crate::{
    compile::parse::tree::{Argument, Block},
    region::Region,
};

/// Represents a fragment of a larger block, one tag between `{%` and `%}`.
#[derive(Debug)]
pub enum Fragment {
    /// The opening tag of a block, which is closed by `end<name>`.
    Open {
        name: String,
        args: Vec<Argument>,
        region: Region,
    },
    /// A tag without a body.
    Inline(Block),
    /// Splits the body of the open block.
    Else { region: Region },
    /// An `else` followed by a nested "if" block with the arguments.
    ElseIf { args: Vec<Argument>, region: Region },
    /// Closes the open block with the name.
    End { name: String, region: Region },
}
