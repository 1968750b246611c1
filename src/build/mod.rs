mod chain;
mod factory;

pub use chain::{ChainState, FlowGraphBuilder};
pub use factory::NodeFactory;
