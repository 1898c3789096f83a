//! Traffic Light State Machine
//!
//! This example demonstrates a simple cyclic machine with a wildcard
//! transition and a subscriber.
//!
//! Key concepts:
//! - Cyclic state transitions (states repeat)
//! - Wildcard source matching any state
//! - Subscribers receiving every change
//!
//! Run with: cargo run --example traffic_light

use statecraft::builder::{simple_transition, wildcard_transition, MachineBuilder};
use statecraft::core::{Snapshot, State};
use statecraft::state_enum;

state_enum! {
    enum TrafficLight {
        Red,
        Yellow,
        Green,
        Flashing,
    }
}

fn main() {
    tracing_subscriber::fmt::init();

    println!("=== Traffic Light State Machine ===\n");

    let machine = MachineBuilder::<TrafficLight, &'static str>::new()
        .id("crossing")
        .initial(TrafficLight::Red)
        .transitions(vec![
            simple_transition(TrafficLight::Red, "TIMER", TrafficLight::Green),
            simple_transition(TrafficLight::Green, "TIMER", TrafficLight::Yellow),
            simple_transition(TrafficLight::Yellow, "TIMER", TrafficLight::Red),
            wildcard_transition("FAULT", TrafficLight::Flashing),
        ])
        .build()
        .unwrap();

    let subscription = machine.subscribe(|state: &TrafficLight, _: &Snapshot, _: &Snapshot| {
        println!("  light is now {}", state.name());
    });

    machine.start();
    for _ in 0..4 {
        machine.send("TIMER").unwrap();
    }

    println!("\nA fault overrides every state:");
    machine.send("FAULT").unwrap();
    machine.send("TIMER").unwrap();

    subscription.unsubscribe();
    println!("\nFinal state: {:?}", machine.get_state());
    println!("Transitions taken: {}", machine.history().len());

    println!("\n=== Example Complete ===");
}
