use std::sync::Arc;

use flowforge::{GraphAssembler, IntentSpec, StaticCatalog};

fn main() {
    let text = include_str!("./intent.json");

    let intent = IntentSpec::from_json(text).unwrap();

    let assembler = GraphAssembler::new(Arc::new(StaticCatalog::builtin()));
    let output = assembler.assemble(&intent).unwrap();

    for diagnostic in &output.diagnostics {
        println!("diagnostic: {:?}", diagnostic);
    }

    let stats = output.graph.stats();
    println!("nodes: {}, connections: {}", stats.node_count, stats.connection_count);

    println!("{}", output.graph.to_json().unwrap());
}
