//! Guarded Counter
//!
//! This example demonstrates context updates from actions, guards reading
//! props, priority tie-breaking and a table loaded from JSON.
//!
//! Run with: cargo run --example counter

use serde_json::json;
use statecraft::builder::MachineConfig;
use statecraft::core::{Message, Snapshot};

const TABLE: &str = r#"{
    "id": "counter",
    "initial": "idle",
    "context": { "count": 0 },
    "props": { "max": 3 },
    "transitions": [
        { "from": "idle", "event": "START", "to": "counting" },
        { "from": "counting", "event": "INC", "to": "full", "guard": "atLimit", "action": "increment", "priority": 1 },
        { "from": "counting", "event": "INC", "to": "counting", "action": "increment" },
        { "from": "*", "event": "RESET", "to": "idle", "action": "clear" }
    ]
}"#;

fn main() {
    tracing_subscriber::fmt().with_max_level(tracing::Level::DEBUG).init();

    println!("=== Guarded Counter ===\n");

    let machine = MachineConfig::<String>::from_json(TABLE)
        .unwrap()
        .into_builder::<Message>()
        .guard("atLimit", |args| {
            let count = args.context["count"].as_i64().unwrap_or(0);
            let max = args.props["max"].as_i64().unwrap_or(0);
            count + 1 >= max
        })
        .action("increment", |args| {
            let count = args.context["count"].as_i64().unwrap_or(0);
            json!({ "count": count + 1 }).as_object().cloned()
        })
        .action("clear", |_| json!({ "count": 0 }).as_object().cloned())
        .strict()
        .build()
        .unwrap();

    machine.subscribe(|state: &String, context: &Snapshot, props: &Snapshot| {
        println!("  {state:<9} count={} max={}", context["count"], props["max"]);
    });

    machine.start();
    machine.send(Message::new("START")).unwrap();
    for _ in 0..4 {
        machine.send(Message::new("INC")).unwrap();
    }

    println!("\nRaising the limit through props:");
    machine.sync_props(json!({ "max": 5 }).as_object().cloned().unwrap());
    machine.send(Message::new("RESET")).unwrap();
    machine.send(Message::new("START")).unwrap();
    machine.send(Message::new("INC")).unwrap();

    println!("\nPath: {:?}", machine.history().get_path());

    println!("\n=== Example Complete ===");
}
